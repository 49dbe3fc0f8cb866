//! CLI command implementations.
//!
//! Output goes through `tracing` so it lands in the same stream as the
//! service logs (and in JSON when `MYMENU_LOG_JSON` is set).

pub mod pantry;
pub mod recipes;
pub mod scan;
pub mod shopping;

use std::sync::Arc;

use mymenu_core::UserId;
use mymenu_core::date::{format_typed_date, typed_to_storage_date};
use mymenu_kitchen::{KitchenConfig, StoreError, SupabaseStore};
use tracing::info;

/// Everything a command needs: the backend and whom to act for.
pub struct Kitchen {
    pub store: Arc<SupabaseStore>,
    pub config: KitchenConfig,
    pub user_id: UserId,
}

impl Kitchen {
    /// Build the Supabase client for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the HTTP client cannot be built.
    pub fn connect(config: KitchenConfig, user_id: UserId) -> Result<Self, StoreError> {
        let store = Arc::new(SupabaseStore::new(&config.supabase)?);
        Ok(Self {
            store,
            config,
            user_id,
        })
    }
}

/// `format-date`: show how typed digits are displayed and stored.
pub fn format_date(raw: &str) {
    let formatted = format_typed_date(raw);
    let stored = typed_to_storage_date(&formatted);
    info!(
        stored = stored.as_ref().map_or("", |d| d.as_str()),
        "{formatted}"
    );
}
