//! Local notifications.
//!
//! Delivery is best-effort: there is no acknowledgement, no queue and no
//! retry. A notifier that cannot show something simply drops it.

use mymenu_core::expiry::Notification;
use tracing::info;

/// Something that can show a notification to the user.
pub trait Notifier: Send + Sync {
    /// Show `notification`. Fire-and-forget.
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the log instead of a device.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            title = %notification.title,
            body = %notification.body,
            "Notification"
        );
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}
