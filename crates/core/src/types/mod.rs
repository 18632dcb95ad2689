//! Core types for the YourChurch site.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod identity;

pub use email::{Email, EmailError};
pub use identity::AdminIdentity;
