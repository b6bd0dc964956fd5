pub mod validation;

pub use validation::{optional_value, parse_integer, require_value};
