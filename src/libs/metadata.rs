//! Application metadata generated by `build.rs`.
//!
//! Exposes the package name and version, the `[package.metadata]` table of
//! `Cargo.toml` (currently just `owner`) and the key material of the secret
//! store as `APP_METADATA_*` constants.

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

/// `User-Agent` sent with every API request, e.g. `wsbar/0.1.0`.
pub fn user_agent() -> String {
    format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION)
}
