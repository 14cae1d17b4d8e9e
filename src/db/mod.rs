pub mod provider;
pub mod repository;

pub use provider::{ConnectionProvider, DbError, ScopedConnection};
pub use repository::{DeleteOutcome, Repository, Store, UpdateOutcome};
