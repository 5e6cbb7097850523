//! Request extractors: API-key check and validated JSON / query / path.

mod api_key;
mod validated;
pub use api_key::ApiKey;
pub use validated::{ValidJson, ValidPath, ValidQuery};
