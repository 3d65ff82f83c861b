pub mod admin;
pub mod health_checks;

pub use health_checks::*;
