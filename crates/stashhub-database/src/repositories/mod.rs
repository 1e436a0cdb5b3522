//! Repository traits and their PostgreSQL implementations.
//!
//! One trait per remote table, mirroring the filtered CRUD surface the
//! synchronization core needs. Every call returns `AppResult`, so remote
//! failures surface as `Database` errors and never panic. A unique-index
//! violation from a concurrent writer (the documented check-then-insert
//! race) surfaces as `Duplicate`.

pub mod activity;
pub mod container;
pub mod environment;
pub mod item;
pub mod notification;
pub mod profile;
pub mod share;

pub use activity::{ActivityLogRepository, PgActivityLogRepository};
pub use container::{ContainerRepository, PgContainerRepository};
pub use environment::{EnvironmentRepository, PgEnvironmentRepository};
pub use item::{ItemRepository, PgItemRepository};
pub use notification::{NotificationRepository, PgNotificationRepository};
pub use profile::{PgProfileRepository, ProfileRepository};
pub use share::{PgShareRepository, ShareRepository};

use stashhub_core::error::{AppError, ErrorKind};

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Map an sqlx error into an [`AppError`], classifying unique-index
/// violations as `Duplicate` and everything else as `Database`.
pub(crate) fn map_db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let duplicate = matches!(
            &e,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
        );
        let kind = if duplicate {
            ErrorKind::Duplicate
        } else {
            ErrorKind::Database
        };
        AppError::with_source(kind, message, e)
    }
}
