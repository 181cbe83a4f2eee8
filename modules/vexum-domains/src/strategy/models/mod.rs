pub mod allocation;
pub mod not_doing;
pub mod priority;
pub mod rule_update;
