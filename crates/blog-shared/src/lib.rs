//! # Blog Shared
//!
//! Wire types of the JSON API, kept free of server dependencies so clients
//! can reuse them.

pub mod dto;
pub mod response;

pub use response::{Envelope, Problem};
