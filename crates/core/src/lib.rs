//! MyMenu Core - Kitchen inventory types and rules.
//!
//! This crate provides the logic shared by every MyMenu screen and tool:
//! - `kitchen` - services over the hosted store
//! - `cli` - command-line tools for scans and list management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no async,
//! no HTTP clients. Each rule lives here exactly once so that the pantry,
//! recipe and shopping list views cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Records, typed IDs, storage buckets and validation errors
//! - [`date`] - Typed-date formatting and strict calendar parsing
//! - [`expiry`] - Days-left arithmetic, urgency and at-most-once alerts
//! - [`suggest`] - Ingredient matching, recipe suggestions and missing ingredients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod date;
pub mod expiry;
pub mod suggest;
pub mod types;

pub use types::*;
