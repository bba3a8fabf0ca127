pub mod auth_state;
pub mod extractor;
pub mod file_magic;
pub mod parameter_error_handler;
pub mod secret;
pub mod token;
pub mod validate;

pub use extractor::{SafeAssignmentIdI64, SafeIDI64};
pub use file_magic::validate_magic_bytes;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
