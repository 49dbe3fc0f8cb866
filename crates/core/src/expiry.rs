//! Expiry tracking: days left, urgency and at-most-once alerts.
//!
//! Every screen classifies items through [`classify_urgency`], and the alert
//! rule in [`should_notify`] is defined in terms of the same classification,
//! so a badge and a notification can never disagree about an item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{FoodItem, FoodItemId, FoodItemUpdate, StorageBucket};

/// Items expiring within this many days (or already expired) raise an alert.
pub const ALERT_WINDOW_DAYS: i64 = 3;

/// Items expiring within this many days are flagged as a warning.
pub const WARNING_WINDOW_DAYS: i64 = 7;

/// Title used for every expiry notification.
pub const ALERT_TITLE: &str = "Expiry alert";

/// Whole calendar days from `today` until `expiry`.
///
/// `None` means expiry is not tracked. The result is `0` for an item expiring
/// today, negative once expired and positive for future dates. Only calendar
/// dates are compared, so neither time of day nor a DST transition can change
/// the result.
#[must_use]
pub fn days_until_expiry(expiry: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    expiry.map(|date| date.signed_duration_since(today).num_days())
}

/// How urgently an item needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Expiry date today or in the past.
    Expired,
    /// One to three days left.
    Critical,
    /// Four to seven days left.
    Warning,
    /// More than a week left.
    Normal,
    /// No expiry date tracked.
    Untracked,
}

impl Urgency {
    /// Whether an item at this urgency should raise an expiry alert.
    #[must_use]
    pub const fn is_alertable(self) -> bool {
        matches!(self, Self::Expired | Self::Critical)
    }
}

/// Classify a days-left value. Boundaries belong to the more urgent bucket.
#[must_use]
pub const fn classify_urgency(days_left: Option<i64>) -> Urgency {
    match days_left {
        None => Urgency::Untracked,
        Some(days) if days <= 0 => Urgency::Expired,
        Some(days) if days <= ALERT_WINDOW_DAYS => Urgency::Critical,
        Some(days) if days <= WARNING_WINDOW_DAYS => Urgency::Warning,
        Some(_) => Urgency::Normal,
    }
}

/// Badge text for a days-left value: `Expired`, `{n}d`, or nothing.
#[must_use]
pub fn badge_label(days_left: Option<i64>) -> Option<String> {
    let days = days_left?;
    match classify_urgency(Some(days)) {
        Urgency::Expired => Some("Expired".to_string()),
        _ => Some(format!("{days}d")),
    }
}

/// Whether `item` should raise its one-time expiry alert.
///
/// True only for items not yet notified whose expiry is tracked and at most
/// [`ALERT_WINDOW_DAYS`] away. Editing an item never clears `notified` here;
/// the store layer decides that.
#[must_use]
pub fn should_notify(item: &FoodItem, today: NaiveDate) -> bool {
    !item.notified && item.urgency(today).is_alertable()
}

/// A local notification to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Everything one expiring item asks of the outside world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryAlert {
    pub item_id: FoodItemId,
    pub days_left: i64,
    pub urgency: Urgency,
    pub notification: Notification,
    /// Always `{ notified: true }`; replaying it is harmless.
    pub update: FoodItemUpdate,
}

impl ExpiryAlert {
    fn for_item(item: &FoodItem, days_left: i64) -> Self {
        Self {
            item_id: item.id,
            days_left,
            urgency: classify_urgency(Some(days_left)),
            notification: Notification {
                title: ALERT_TITLE.to_string(),
                body: alert_body(&item.name, item.bucket, days_left),
            },
            update: FoodItemUpdate::mark_notified(),
        }
    }
}

fn alert_body(name: &str, bucket: StorageBucket, days_left: i64) -> String {
    let place = bucket.label();
    match days_left {
        0 => format!("\"{name}\" in the {place} expires today."),
        d if d < 0 => format!("\"{name}\" in the {place} expired {} day(s) ago.", -d),
        d => format!("\"{name}\" in the {place} expires in {d} day(s)."),
    }
}

/// Run the expiry check over a fetched snapshot.
///
/// Returns one alert per item that [`should_notify`], in snapshot order, and
/// marks those items `notified` in the snapshot itself so a second pass over
/// the same snapshot emits nothing.
pub fn scan_snapshot(items: &mut [FoodItem], today: NaiveDate) -> Vec<ExpiryAlert> {
    let mut alerts = Vec::new();
    for item in items.iter_mut() {
        if !should_notify(item, today) {
            continue;
        }
        let Some(days_left) = item.days_left(today) else {
            continue;
        };
        alerts.push(ExpiryAlert::for_item(item, days_left));
        item.notified = true;
    }
    alerts
}

/// Sort items soonest-expiring first; untracked and unreadable dates go last.
///
/// The sort is stable, so items sharing a date keep their fetched order.
pub fn order_by_expiry(items: &mut [FoodItem]) {
    items.sort_by_key(|item| {
        let date = item.expiry_calendar_date();
        (date.is_none(), date)
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{ExpiryDate, UserId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn item_expiring_in(id: i64, days: Option<i64>, notified: bool) -> FoodItem {
        FoodItem {
            id: FoodItemId::new(id),
            user_id: UserId::random(),
            name: format!("item-{id}"),
            quantity: None,
            expiry_date: days.map(|d| ExpiryDate::from(today() + chrono::TimeDelta::days(d))),
            bucket: StorageBucket::Pantry,
            notified,
        }
    }

    #[test]
    fn test_days_until_expiry() {
        assert_eq!(days_until_expiry(Some(today()), today()), Some(0));
        let yesterday = today().pred_opt().unwrap();
        assert_eq!(days_until_expiry(Some(yesterday), today()), Some(-1));
        let next_week = today() + chrono::Days::new(7);
        assert_eq!(days_until_expiry(Some(next_week), today()), Some(7));
        assert_eq!(days_until_expiry(None, today()), None);
    }

    #[test]
    fn test_days_until_expiry_across_dst_change() {
        // Europe switches clocks on the last Sunday of March and October.
        let before = NaiveDate::from_ymd_opt(2025, 3, 29).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(days_until_expiry(Some(after), before), Some(2));

        let before = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        let after = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
        assert_eq!(days_until_expiry(Some(after), before), Some(2));
    }

    #[test]
    fn test_classify_urgency_boundaries() {
        let cases = [
            (-5, Urgency::Expired),
            (0, Urgency::Expired),
            (1, Urgency::Critical),
            (3, Urgency::Critical),
            (4, Urgency::Warning),
            (7, Urgency::Warning),
            (8, Urgency::Normal),
        ];
        for (days, expected) in cases {
            assert_eq!(classify_urgency(Some(days)), expected, "days = {days}");
        }
        assert_eq!(classify_urgency(None), Urgency::Untracked);
    }

    #[test]
    fn test_badge_label() {
        assert_eq!(badge_label(None), None);
        assert_eq!(badge_label(Some(-2)).as_deref(), Some("Expired"));
        assert_eq!(badge_label(Some(0)).as_deref(), Some("Expired"));
        assert_eq!(badge_label(Some(3)).as_deref(), Some("3d"));
        assert_eq!(badge_label(Some(12)).as_deref(), Some("12d"));
    }

    #[test]
    fn test_should_notify() {
        assert!(should_notify(&item_expiring_in(1, Some(3), false), today()));
        assert!(!should_notify(&item_expiring_in(1, Some(3), true), today()));
        assert!(!should_notify(&item_expiring_in(1, Some(4), false), today()));
        assert!(should_notify(&item_expiring_in(1, Some(-10), false), today()));
        assert!(!should_notify(&item_expiring_in(1, None, false), today()));
    }

    #[test]
    fn test_should_notify_agrees_with_urgency() {
        for days in -3..=10 {
            let item = item_expiring_in(1, Some(days), false);
            assert_eq!(
                should_notify(&item, today()),
                item.urgency(today()).is_alertable(),
                "days = {days}"
            );
        }
    }

    #[test]
    fn test_scan_snapshot_emits_once() {
        let mut snapshot = vec![
            item_expiring_in(1, Some(2), false),
            item_expiring_in(2, Some(10), false),
            item_expiring_in(3, Some(-1), true),
            item_expiring_in(4, None, false),
            item_expiring_in(5, Some(0), false),
        ];

        let alerts = scan_snapshot(&mut snapshot, today());
        let ids: Vec<_> = alerts.iter().map(|a| a.item_id.as_i64()).collect();
        assert_eq!(ids, vec![1, 5]);
        assert!(alerts.iter().all(|a| a.update == FoodItemUpdate::mark_notified()));
        assert!(snapshot[0].notified);
        assert!(!snapshot[1].notified);

        let second = scan_snapshot(&mut snapshot, today());
        assert!(second.is_empty());
    }

    #[test]
    fn test_alert_text() {
        let mut snapshot = vec![item_expiring_in(1, Some(2), false)];
        snapshot[0].name = "Leche".to_string();
        snapshot[0].bucket = StorageBucket::Refrigerator;
        let alert = scan_snapshot(&mut snapshot, today()).remove(0);
        assert_eq!(alert.notification.title, ALERT_TITLE);
        assert_eq!(
            alert.notification.body,
            "\"Leche\" in the refrigerator expires in 2 day(s)."
        );
        assert_eq!(alert.urgency, Urgency::Critical);

        assert_eq!(
            alert_body("Pan", StorageBucket::Pantry, 0),
            "\"Pan\" in the pantry expires today."
        );
        assert_eq!(
            alert_body("Pan", StorageBucket::Pantry, -3),
            "\"Pan\" in the pantry expired 3 day(s) ago."
        );
    }

    #[test]
    fn test_order_by_expiry() {
        let mut items = vec![
            item_expiring_in(1, None, false),
            item_expiring_in(2, Some(5), false),
            item_expiring_in(3, Some(-1), false),
            item_expiring_in(4, Some(5), false),
        ];
        items[0].expiry_date = Some(ExpiryDate::new("not-a-date"));
        items.push(item_expiring_in(5, None, false));

        order_by_expiry(&mut items);
        let ids: Vec<_> = items.iter().map(|i| i.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 2, 4, 1, 5]);
    }
}
