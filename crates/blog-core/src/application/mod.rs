//! Request flows behind the blog pages and account management.
//!
//! Handlers here never touch HTTP. They return an [`Outcome`] naming the page
//! to render or the route to redirect to, and the server turns that into a
//! response.

mod accounts;
mod outcome;
mod posts;

pub use accounts::AccountService;
pub use outcome::{Outcome, Page, Route};
pub use posts::PostService;

#[cfg(test)]
pub(crate) mod testing;
