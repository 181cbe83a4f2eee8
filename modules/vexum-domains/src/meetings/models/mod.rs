pub mod agenda_item;
pub mod link;
pub mod meeting;
pub mod participant;
