mod company;
mod credits;
mod genre;
mod movie;
mod person;
pub mod user;

pub use company::*;
pub use credits::*;
pub use genre::*;
pub use movie::*;
pub use person::*;
pub use user::*;
