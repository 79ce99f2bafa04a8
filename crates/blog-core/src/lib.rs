//! # Blog Core
//!
//! The domain layer of the blog.
//! Entities, the post form, the request flows for the post pages and the
//! ports that infrastructure has to provide. No database or HTTP types here.

pub mod application;
pub mod domain;
pub mod error;
pub mod forms;
pub mod ports;

pub use error::DomainError;
