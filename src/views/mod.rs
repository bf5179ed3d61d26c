mod catalog;
mod movie;
mod user;

pub use catalog::*;
pub use movie::*;
pub use user::*;
