pub mod models;

pub use models::action::{
    Action, ActionFilters, ActionPatch, ActionWithNames, NewAction, TriageAction, TriageUpdate,
};
pub use models::check_in::{CheckIn, CheckInSubmission, CheckInWithUser};
pub use models::decision::{Decision, DecisionPatch, DecisionWithNames, NewDecision};
pub use models::issue::{Issue, IssueFilters, IssuePatch, IssueWithNames, NewIssue};
