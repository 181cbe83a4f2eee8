pub mod action;
pub mod check_in;
pub mod decision;
pub mod issue;
