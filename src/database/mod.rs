pub mod manager;
pub mod models;
pub mod repository;

pub use manager::{connect, DatabaseError};
pub use models::{Project, User};
pub use repository::{PgStore, Store};
