pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigError, ServiceConfig};
pub use error::{ArtCanvasError, Result};
pub use types::{
    ArtParameters, ArtValidation, HiddenAuth, OutboundDescriptor, ProxyNode, RegionGroup,
};
