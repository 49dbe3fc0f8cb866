//! Expiry scan command.

use std::sync::Arc;

use chrono::NaiveDate;
use mymenu_core::date::local_today;
use mymenu_kitchen::services::ExpiryScanService;
use mymenu_kitchen::{AppError, LogNotifier};
use tracing::{info, warn};

use super::Kitchen;

/// Scan every bucket and raise alerts through the log.
///
/// # Errors
///
/// Returns `AppError` if the food items cannot be fetched.
pub async fn run(kitchen: &Kitchen, today: Option<NaiveDate>) -> Result<(), AppError> {
    let today = today.unwrap_or_else(local_today);
    let service = ExpiryScanService::new(Arc::clone(&kitchen.store), Arc::new(LogNotifier));

    let report = service.scan(kitchen.user_id, today).await?;
    for failure in &report.persist_failures {
        warn!(item_id = %failure.item_id, "Not marked as notified: {}", failure.error);
    }
    info!(
        %today,
        scanned = report.scanned,
        notified = report.notified(),
        "Scan complete"
    );
    Ok(())
}
