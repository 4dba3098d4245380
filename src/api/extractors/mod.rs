//! Request extractors that reject with `AppError` JSON bodies.

mod query;
mod validated_json;

pub use query::{QueryParams, ValidatedQuery};
pub use validated_json::ValidatedJson;
