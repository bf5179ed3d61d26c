pub mod company;
pub mod genre;
pub mod listing;
pub mod movie;
pub mod person;
pub mod user;

pub use company::*;
pub use genre::*;
pub use listing::*;
pub use movie::*;
pub use person::*;
pub use user::*;
