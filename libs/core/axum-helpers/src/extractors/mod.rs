//! Custom extractors that reject with the standard [`ErrorResponse`](crate::ErrorResponse) body.

pub mod id_path;
pub mod validated_json;

pub use id_path::IdPath;
pub use validated_json::ValidatedJson;
