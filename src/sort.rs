//! Orders posts newest-first by their `DD-Mon-YYYY` dates. Posts whose date
//! doesn't parse are treated as older than any post with a valid date; the
//! relative order of two such posts is unspecified.

use std::cmp::Ordering;

use chrono::NaiveDate;
use tracing::warn;

use crate::post::Post;

/// The `chrono` format for post dates, e.g. `22-Dec-2024`.
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Parses a post date in [`DATE_FORMAT`]. The date must have exactly the
/// `DD-Mon-YYYY` shape: a two-digit day, a three-letter month, and a
/// four-digit year. Returns `None` for anything else.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    if !has_date_shape(date.as_bytes()) {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

// chrono accepts one-digit days and short years for `%d` and `%Y`, so the
// layout is checked byte by byte first.
fn has_date_shape(b: &[u8]) -> bool {
    b.len() == 11
        && b[2] == b'-'
        && b[6] == b'-'
        && b[..2].iter().all(u8::is_ascii_digit)
        && b[3..6].iter().all(u8::is_ascii_alphabetic)
        && b[7..].iter().all(u8::is_ascii_digit)
}

/// Compares two posts for newest-first ordering. Returns [`Ordering::Less`]
/// when `a` should come before `b`.
pub fn compare(a: &Post, b: &Post) -> Ordering {
    match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(date_a), Some(date_b)) => date_b.cmp(&date_a),
        (date_a, date_b) => {
            warn!(
                "invalid date format for `{}` or `{}`",
                &a.date, &b.date
            );
            match (date_a.is_some(), date_b.is_some()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => Ordering::Equal,
            }
        }
    }
}

/// Sorts `posts` in place, most recent first. See [`compare`].
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(compare);
}
