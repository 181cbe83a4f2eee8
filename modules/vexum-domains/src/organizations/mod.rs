pub mod models;

pub use models::organization::Organization;
pub use models::team::Team;
pub use models::user::{hash_password, User};
