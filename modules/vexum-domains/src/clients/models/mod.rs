pub mod client;
pub mod initiative;
pub mod proposal_seed;
pub mod weekly_summary;
