//! Expiry scan service.
//!
//! A scan fetches a user's food items, raises one notification per item that
//! is about to expire and has not been announced yet, and persists
//! `notified = true` for each. Scans are serialized behind one in-process
//! guard shared by every clone of the service, and each scan fetches its
//! snapshot only after acquiring it, so two triggers cannot both see the
//! same item as unannounced.

use std::sync::Arc;

use chrono::NaiveDate;
use mymenu_core::expiry::{ExpiryAlert, scan_snapshot};
use mymenu_core::{FoodItemId, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::AppError;
use crate::notify::Notifier;
use crate::store::KitchenStore;

/// A `notified` write that failed after its notification was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub item_id: FoodItemId,
    pub error: String,
}

/// Outcome of one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Items in the fetched snapshot.
    pub scanned: usize,
    /// Alerts raised, in snapshot order.
    pub alerts: Vec<ExpiryAlert>,
    /// Alerts whose `notified` flag could not be saved. Not retried; the item
    /// will alert again on a later scan.
    pub persist_failures: Vec<PersistFailure>,
}

impl ScanReport {
    /// Number of notifications shown.
    #[must_use]
    pub fn notified(&self) -> usize {
        self.alerts.len()
    }
}

/// Runs expiry scans against a store and a notifier.
pub struct ExpiryScanService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    in_flight: Arc<Mutex<()>>,
}

impl<S, N> Clone for ExpiryScanService<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S: KitchenStore, N: Notifier> ExpiryScanService<S, N> {
    /// Create a new expiry scan service.
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Scan every bucket of `user_id` as of `today`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Store` if the snapshot cannot be fetched; nothing is
    /// notified in that case. Failed `notified` writes are reported in the
    /// [`ScanReport`] instead.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn scan(&self, user_id: UserId, today: NaiveDate) -> Result<ScanReport, AppError> {
        let _guard = self.in_flight.lock().await;

        let mut snapshot = self.store.fetch_food_items(user_id, None).await?;
        let alerts = scan_snapshot(&mut snapshot, today);
        debug!(scanned = snapshot.len(), alerts = alerts.len(), "Snapshot scanned");

        let mut persist_failures = Vec::new();
        for alert in &alerts {
            self.notifier.notify(&alert.notification);

            if let Err(e) = self.store.update_food_item(alert.item_id, &alert.update).await {
                warn!(
                    item_id = %alert.item_id,
                    error = %e,
                    "Failed to persist notified flag"
                );
                persist_failures.push(PersistFailure {
                    item_id: alert.item_id,
                    error: e.to_string(),
                });
            }
        }

        if !alerts.is_empty() {
            info!(
                notified = alerts.len(),
                failed = persist_failures.len(),
                "Expiry alerts raised"
            );
        }

        Ok(ScanReport {
            scanned: snapshot.len(),
            alerts,
            persist_failures,
        })
    }
}
