pub mod detail;
pub mod models;

pub use detail::{MeetingBoard, MeetingDetail};
pub use models::agenda_item::{AgendaItem, AgendaItemPatch, NewAgendaItem};
pub use models::link::{Link, NewLink};
pub use models::meeting::{Meeting, MeetingFilters, MeetingPatch, MeetingWithTeam, NewMeeting};
pub use models::participant::{NewParticipant, Participant};
