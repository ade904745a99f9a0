//! Custom request extractors.

mod validated_json;
mod validated_multipart;
mod validated_parts;

pub use validated_json::ValidatedJson;
pub(crate) use validated_json::format_validation_errors;
pub use validated_multipart::ValidatedMultipart;
pub use validated_parts::{ValidatedPath, ValidatedQuery};
