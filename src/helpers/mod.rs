mod cookie;
pub(crate) mod json;

pub use cookie::*;
pub use json::*;
