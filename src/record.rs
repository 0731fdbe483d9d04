//! The journal record type.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::Category;

/// Title given to every quick note.
pub const QUICK_NOTE_TITLE: &str = "随手记";

/// Represents a single journal entry.
///
/// Serialized field names match the original backup schema, including the
/// camelCase presentation fields, so old exports import cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique, stable identifier; assigned at creation, never reassigned
    pub id: String,
    /// Display title
    pub title: String,
    /// Record classification
    pub category: Category,
    /// Free text body
    pub content: String,
    /// Optional embedded image as a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Creation timestamp in milliseconds since the epoch; immutable
    pub date: i64,
    /// Background color, populated only for quick notes
    #[serde(rename = "bgColor", default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Sticker emoji, populated only for quick notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker: Option<String>,
}

impl Record {
    /// Creates a new gallery record stamped with the current time.
    ///
    /// The id is the creation millis rendered as a decimal string; callers
    /// inserting into a collection are responsible for bumping it on the
    /// rare same-millisecond collision.
    pub fn new(title: String, category: Category, content: String, image: Option<String>) -> Self {
        let now = Utc::now().timestamp_millis();

        Record {
            id: now.to_string(),
            title,
            category,
            content,
            image,
            date: now,
            bg_color: None,
            sticker: None,
        }
    }

    /// Creates a quick note carrying its presentation metadata.
    pub fn quick_note(content: String, bg_color: String, sticker: String) -> Self {
        let now = Utc::now().timestamp_millis();

        Record {
            id: now.to_string(),
            title: QUICK_NOTE_TITLE.to_string(),
            category: Category::Memo,
            content,
            image: None,
            date: now,
            bg_color: Some(bg_color),
            sticker: Some(sticker),
        }
    }

    /// Whether this record is a quick note rather than a gallery item.
    pub fn is_quick_note(&self) -> bool {
        self.category == Category::Memo
    }
}
