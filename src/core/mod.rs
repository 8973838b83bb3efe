pub mod error;
pub mod params;
pub mod record;

pub use error::{ApiError, Result};
pub use params::ParamMap;
pub use record::{Resource, Tag, upsert_tag};
