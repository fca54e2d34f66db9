pub mod error;
pub mod record;
pub mod value;

pub use error::{AdminError, FieldError, Result, ValidationErrors};
pub use record::{DynamicRecord, Record, RecordId, id_from_json};
pub use value::{DATE_FORMAT, FieldValue};
