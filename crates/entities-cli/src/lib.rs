//! Command-line front end for entities-core.
//!
//! The `entities` binary parses arguments and sets up logging; everything
//! it runs lives here so it can be tested without a process boundary.

pub mod commands;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
