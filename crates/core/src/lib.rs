pub mod art;
pub mod codec;
pub mod favicon;
pub mod fetch;
pub mod pipeline;
pub mod region;
pub mod stego;
pub mod subscribe;
pub mod template;

pub use codec::{CodecError, EnvelopeCodec};
pub use favicon::{encode_favicon_for_art, fetch_favicon, FaviconResult};
pub use fetch::{fetch_many, fetch_with_retry, FetchOutcome, FetchPolicy};
pub use pipeline::{run_subscription_pipeline, PipelineOutput};
pub use region::{build_region_groups, classify};
pub use stego::{extract_hidden_auth, normalize_art_params, validate_art_params};
pub use subscribe::{params_to_urls, parse_nodes, translate_nodes};
pub use template::{merge_into_template, resolve_tag_conflicts, TemplateError, TemplateStore};
