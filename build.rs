fn main() {
    println!("cargo:rerun-if-env-changed=BECKVIEW_CONFIG");

    // Host builds (tests, simulation) have no ESP-IDF toolchain to link.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
