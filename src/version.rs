// Package identity baked in at build time

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// `name vX.Y.Z`, used for the root route and the startup log line.
pub fn banner() -> String {
    format!("{} v{}", NAME, VERSION)
}
