//! Calendar date helpers shared by the pantry screens.
//!
//! Dates are typed by users as `DD/MM/YYYY` and stored by the backend as
//! `YYYY-MM-DD`. Both forms are plain wall-clock dates: they are never turned
//! into an instant, so the local UTC offset can't shift them by a day.
//!
//! Entry is permissive and use is strict. [`format_typed_date`] and
//! [`typed_to_storage_date`] accept anything that looks like digits, and only
//! [`parse_storage_date`] decides whether the result is a real calendar date.

use chrono::{Local, NaiveDate};

use crate::types::ExpiryDate;

/// Maximum number of digits kept while typing a date (`DDMMYYYY`).
pub const TYPED_DATE_DIGITS: usize = 8;

/// Reformat free text typed into a date field as `DD/MM/YYYY`.
///
/// Strips every non-digit, keeps at most eight digits and inserts `/` after
/// the day and month digits once they exist. No calendar validation happens
/// here, so `31/02/9999` is accepted as typed.
///
/// ```
/// use mymenu_core::date::format_typed_date;
///
/// assert_eq!(format_typed_date("2512"), "25/12");
/// assert_eq!(format_typed_date("25-12-2025 extra 99"), "25/12/2025");
/// ```
#[must_use]
pub fn format_typed_date(raw: &str) -> String {
    let mut formatted = String::with_capacity(TYPED_DATE_DIGITS + 2);
    for (i, digit) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(TYPED_DATE_DIGITS)
        .enumerate()
    {
        if i == 2 || i == 4 {
            formatted.push('/');
        }
        formatted.push(digit);
    }
    formatted
}

/// Convert a typed `DD/MM/YYYY` date into the stored `YYYY-MM-DD` form.
///
/// The `/`-separated parts are reversed and joined with `-`. Blank input
/// means "no expiry tracked" and yields `None`.
#[must_use]
pub fn typed_to_storage_date(typed: &str) -> Option<ExpiryDate> {
    let typed = typed.trim();
    if typed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = typed.split('/').rev().collect();
    Some(ExpiryDate::new(parts.join("-")))
}

/// Parse a stored `YYYY-MM-DD` date.
///
/// Returns `None` unless the input has exactly three numeric parts forming a
/// real calendar date.
#[must_use]
pub fn parse_storage_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return None;
    };

    NaiveDate::from_ymd_opt(
        year.trim().parse().ok()?,
        month.trim().parse().ok()?,
        day.trim().parse().ok()?,
    )
}

/// Format a calendar date the way users type it (`DD/MM/YYYY`).
#[must_use]
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Today's date on the device's local calendar.
#[must_use]
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
