pub mod organization;
pub mod team;
pub mod user;
