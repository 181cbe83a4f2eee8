pub mod broadcast;
pub mod consumption;
