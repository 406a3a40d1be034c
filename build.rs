fn main() {
    // Device builds need the ESP-IDF sysenv exported; host builds never
    // link against ESP-IDF. Feature flags reach build scripts as env
    // vars, not cfg.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
