fn main() {
    // Only the ESP-IDF build needs the linker/sysroot environment from embuild.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
