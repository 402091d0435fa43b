// Build script for battstat - embeds version at compile time

fn main() {
    // Release builds may stamp their own version; otherwise use Cargo.toml
    let version =
        std::env::var("BATTSTAT_VERSION").unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=BATTSTAT_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=BATTSTAT_VERSION");
}
