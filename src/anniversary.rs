//! Anniversary tracking: elapsed whole days since a reference date.

use chrono::NaiveDate;

/// The stored reference date + label pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnniversarySetting {
    /// Reference date as `YYYY-MM-DD`
    pub date: String,
    /// Free-text label, e.g. "我们相识"
    pub title: String,
}

impl AnniversarySetting {
    /// Days elapsed as of `today`; see [`elapsed_days`].
    pub fn elapsed_days(&self, today: NaiveDate) -> Option<i64> {
        elapsed_days(&self.date, today)
    }
}

/// Computes whole days from the reference date to `today`.
///
/// Both dates compare at midnight, so partial days never count. A future
/// reference date clamps to 0 rather than going negative. Returns `None`
/// when no parseable reference date is set.
pub fn elapsed_days(reference: &str, today: NaiveDate) -> Option<i64> {
    let start = NaiveDate::parse_from_str(reference.trim(), "%Y-%m-%d").ok()?;
    Some((today - start).num_days().max(0))
}
