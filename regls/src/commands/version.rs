/// Get the version string for regls and libregls
pub fn get_version_string() -> String {
    format!(
        "regls {}\nlibregls {}",
        env!("CARGO_PKG_VERSION"),
        libregls::version()
    )
}

/// Print version information to stdout
pub fn print_version() {
    println!("{}", get_version_string());
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
