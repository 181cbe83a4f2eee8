pub mod patch;
pub mod scope;

pub use patch::nullable;
pub use scope::{ensure_meeting_in_org, MeetingScope};
