//! MyMenu kitchen services.
//!
//! Wires the pure engines from `mymenu-core` to a persistence backend:
//!
//! - [`store`] - the [`KitchenStore`] collaborator interface with an
//!   in-memory implementation and a Supabase (`PostgREST`) client
//! - [`notify`] - fire-and-forget local notifications
//! - [`services`] - expiry scans, pantry, shopping list and recipe suggestions
//! - [`config`] - environment configuration
//! - [`error`] - the application error taxonomy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod store;

pub use config::{ConfigError, KitchenConfig, SupabaseConfig};
pub use error::AppError;
pub use notify::{LogNotifier, Notifier};
pub use store::{InMemoryStore, KitchenStore, StoreError, SupabaseStore};
