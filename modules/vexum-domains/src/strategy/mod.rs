pub mod models;

pub use models::allocation::{NewAllocation, StrategyAllocation};
pub use models::not_doing::{NewNotDoing, StrategyNotDoing};
pub use models::priority::{PrioritySubmission, StrategyPriority};
pub use models::rule_update::{NewRuleUpdate, RuleUpdate};
