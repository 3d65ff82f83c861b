mod f_bearer;
mod f_cookie;

pub use f_bearer::{extract_bearer_token, try_bearer};
pub use f_cookie::try_cookie;
