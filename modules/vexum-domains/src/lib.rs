pub mod access;
pub mod broadcasts;
pub mod capture;
pub mod clients;
pub mod dashboard;
pub mod meetings;
pub mod organizations;
pub mod radar;
pub mod shared;
pub mod strategy;
pub mod tracking;
