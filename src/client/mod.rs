//! Consumer side of the admin session lifecycle: credential storage, the
//! response guard, a typed API client and the background validator.

mod api;
mod credentials;
mod error;
mod guard;
mod validator;

pub use api::*;
pub use credentials::*;
pub use error::*;
pub use guard::*;
pub use validator::*;
