//! Domain entities - the core business objects.

mod post;
mod user;

pub use post::{Post, TITLE_MAX_CHARS};
pub use user::User;

/// Entities that carry their own primary key.
///
/// Storage uses this to tell an insert from an update when saving.
pub trait Identifiable<ID> {
    fn id(&self) -> ID;
}
