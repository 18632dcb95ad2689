//! YourChurch Admin library.
//!
//! This crate provides the admin authentication and session API as a
//! library, allowing it to be tested and reused.
//!
//! # Security
//!
//! This crate guards the privileged content-management surface:
//! - Admin login against a configured allow-list
//! - Stateless HMAC-signed session cookies
//! - Extractors gating privileged routes
//!
//! Sessions are self-contained tokens: logout deletes the cookie
//! client-side only, and a copied token stays valid until its 7-day
//! expiry. There is no server-side revocation list.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
