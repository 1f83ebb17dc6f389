/// artcanvas daemon library
///
/// This crate provides the HTTP service that fronts the art generator:
/// the visible art endpoint, the encrypted configuration channel and the
/// health check.

pub mod api;

pub use api::ApiServer;
