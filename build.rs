use std::env;

fn main() {
    // Version string shown by --version and sent as the User-Agent
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "unknown".to_string());
    let version = match env::var("LISTING_DL_BUILD") {
        Ok(build) if !build.is_empty() => format!("{version}+{build}"),
        _ => version,
    };
    println!("cargo:rustc-env=LISTING_DL_VERSION={version}");

    println!("cargo:rerun-if-env-changed=LISTING_DL_BUILD");
    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
