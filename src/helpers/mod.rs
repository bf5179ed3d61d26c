pub(crate) mod json;
pub mod jwt;
pub mod password;

pub use json::*;
