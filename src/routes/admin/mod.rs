mod login;
mod logout;
mod sessions;
mod validate;

pub use login::*;
pub use logout::*;
pub use sessions::*;
pub use validate::*;
