/// HTTP API module for the artcanvas daemon
///
/// Provides the endpoints clients talk to:
/// - POST /api/generate — art generation with hidden authentication
/// - GET /api/process — the encrypted configuration channel
/// - GET /health — liveness check

pub mod handlers;
pub mod responses;
pub mod server;

pub use handlers::AppState;
pub use responses::*;
pub use server::ApiServer;
