//! YourChurch Core - Shared types library.
//!
//! This crate provides common types used across the YourChurch site
//! components:
//! - `admin` - Content-management admin panel and its authentication API
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for emails and admin identities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
