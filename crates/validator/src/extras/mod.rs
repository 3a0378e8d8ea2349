mod length;
mod required;
mod url;

pub use self::length::validate_length;
pub use self::required::{is_present, is_present_opt};
pub use self::url::validate_url;
