//! Credential codec, session registry and admin directory.

mod directory;
mod errors;
mod registry;
mod token;

pub use directory::*;
pub use errors::*;
pub use registry::*;
pub use token::*;
