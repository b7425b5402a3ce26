// Service name and version, baked in from Cargo metadata

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Plain-text banner served at GET /.
pub fn banner() -> String {
    format!("{NAME} {VERSION}: host metrics over WebSocket at /ws")
}
