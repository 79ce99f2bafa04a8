//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod render;
mod repository;

pub use auth::{AccessToken, AuthError, PasswordService, TokenClaims, TokenService};
pub use clock::{Clock, SystemClock};
pub use render::{PageRenderer, RenderError};
pub use repository::{BaseRepository, PostRepository, UserRepository};
