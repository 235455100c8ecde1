//! Core types and the booking filter engine for courtbook.
//!
//! This crate is deliberately free of HTTP and terminal dependencies. The
//! console binary depends on it; it depends on nothing proprietary.

pub mod booking;
pub mod derive;
pub mod error;
pub mod facet;
pub mod member;
pub mod predicate;
pub mod settings;
pub mod source;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
