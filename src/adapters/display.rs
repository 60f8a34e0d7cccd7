//! Log-based display adapter.
//!
//! Implements [`DisplayPort`] by writing each screen's text to the logger
//! (UART / USB-CDC in production).  Used on the bench before the panel is
//! wired, and on the host.  It remembers what it last drew so a console
//! or test can ask.

use log::info;

use crate::app::ports::DisplayPort;
use crate::display::Screen;
use crate::error::DisplayError;

#[derive(Debug, Default)]
pub struct LogDisplay {
    current: Option<Screen>,
    draws: u32,
}

impl LogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Screen> {
        self.current
    }

    /// Screens drawn since construction.
    pub fn draws(&self) -> u32 {
        self.draws
    }
}

impl DisplayPort for LogDisplay {
    fn draw(&mut self, screen: Screen) -> Result<(), DisplayError> {
        let layout = screen.layout();
        if layout.lines.is_empty() {
            info!("DISPLAY | {:?} | bg=#{:06X}", screen, layout.background);
        } else {
            let mut text = String::new();
            for (i, line) in layout.lines.iter().enumerate() {
                if i > 0 {
                    text.push(' ');
                }
                text.push_str(line.text);
            }
            info!(
                "DISPLAY | {:?} | bg=#{:06X} fg=#{:06X} | {}",
                screen, layout.background, layout.foreground, text
            );
        }
        self.current = Some(screen);
        self.draws = self.draws.saturating_add(1);
        Ok(())
    }
}
