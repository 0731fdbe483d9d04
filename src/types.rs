//! Core data structures for the lulu-journal application.
//!
//! This module contains the shared types used throughout the application:
//! the record category enumeration, ephemeral chat types, and the CLI
//! command surface.

use std::fmt;
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::JournalError;

/// A specialized Result type for lulu-journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Closed set of record classifications.
///
/// The serialized values are the original Chinese labels so exported and
/// imported JSON stays byte-compatible with existing backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum Category {
    #[serde(rename = "美食")]
    Food,
    #[serde(rename = "爱好")]
    Hobbies,
    #[serde(rename = "愿望清单")]
    Wishlist,
    #[serde(rename = "目标规划")]
    Goals,
    #[default]
    #[serde(rename = "日常")]
    Daily,
    #[serde(rename = "纪念日")]
    Anniversary,
    /// Reserved for quick notes; excluded from the main gallery.
    #[serde(rename = "随手记")]
    Memo,
    #[serde(rename = "其他")]
    Other,
}

impl Category {
    /// The label stored in JSON and shown in the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => "美食",
            Category::Hobbies => "爱好",
            Category::Wishlist => "愿望清单",
            Category::Goals => "目标规划",
            Category::Daily => "日常",
            Category::Anniversary => "纪念日",
            Category::Memo => "随手记",
            Category::Other => "其他",
        }
    }

    /// Parses a stored label back into a category.
    pub fn from_label(label: &str) -> Option<Category> {
        DISPLAY_CATEGORIES
            .iter()
            .chain(std::iter::once(&Category::Memo))
            .copied()
            .find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gallery category order. `Memo` is deliberately absent: quick notes
/// live in their own view.
pub const DISPLAY_CATEGORIES: [Category; 7] = [
    Category::Food,
    Category::Hobbies,
    Category::Wishlist,
    Category::Goals,
    Category::Daily,
    Category::Anniversary,
    Category::Other,
];

/// Background colors available for quick notes.
pub const NOTE_COLORS: [&str; 8] = [
    "#FEF9C3", // Yellow
    "#D1FAE5", // Green
    "#DBEAFE", // Blue
    "#FCE7F3", // Pink
    "#F3E8FF", // Purple
    "#FFEDD5", // Orange
    "#E0F2F1", // Teal
    "#F5F5F5", // Grey
];

/// Stickers available for quick notes.
pub const NOTE_STICKERS: [&str; 50] = [
    "🥰", "🤔", "🎉", "🌟", "💪", "🍦", "🌸", "🎵", "👀", "💤", //
    "🚀", "🎨", "📚", "🏃", "🌈", "🔥", "🏄", "🏖️", "🍂", "❄️", //
    "💖", "🍰", "🐶", "🐱", "🐰", "🐸", "🐷", "🐣", "🦋", "🌻", //
    "🍀", "🍄", "🍎", "🍓", "🍑", "🥑", "🍔", "🍕", "🍿", "🥤", //
    "🎈", "🎁", "💡", "📷", "🎮", "🧩", "🧸", "🛁", "🛌", "💌",
];

/// Behavior profile for a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChatMode {
    /// Baseline reasoning model.
    Pro,
    /// Low-latency model.
    Fast,
    /// Web-grounded answers with citations.
    Search,
    /// Maps-grounded answers, optionally anchored to a location.
    Maps,
}

/// Width:height presets for AI image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectRatio {
    #[value(name = "1:1")]
    Square,
    #[value(name = "3:4")]
    Portrait3x4,
    #[value(name = "4:3")]
    Landscape4x3,
    #[value(name = "9:16")]
    Portrait9x16,
    #[value(name = "16:9")]
    Landscape16x9,
    #[value(name = "21:9")]
    Wide21x9,
    #[value(name = "2:3")]
    Standard2x3,
    #[value(name = "3:2")]
    Standard3x2,
}

impl AspectRatio {
    /// The value the image API expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Wide21x9 => "21:9",
            AspectRatio::Standard2x3 => "2:3",
            AspectRatio::Standard3x2 => "3:2",
        }
    }
}

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

/// Source citations attached to a grounded chat reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One citation chunk; either a web page or a maps place.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundingChunk {
    #[serde(default)]
    pub web: Option<GroundingSource>,
    #[serde(default)]
    pub maps: Option<GroundingSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundingSource {
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// A single chat exchange entry. Session-only, never persisted.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub is_error: bool,
    pub grounding: Option<GroundingMetadata>,
}

impl ChatMessage {
    pub fn user(text: String) -> Self {
        ChatMessage {
            role: ChatRole::User,
            text,
            is_error: false,
            grounding: None,
        }
    }

    pub fn model(text: String, grounding: Option<GroundingMetadata>) -> Self {
        ChatMessage {
            role: ChatRole::Model,
            text,
            is_error: false,
            grounding,
        }
    }

    /// A failure rendered in the transcript instead of aborting it.
    pub fn error(text: String) -> Self {
        ChatMessage {
            role: ChatRole::Model,
            text,
            is_error: true,
            grounding: None,
        }
    }
}

/// A latitude/longitude pair for maps-grounded chat.
#[derive(Debug, Clone, Copy)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Available subcommands for the lulu-journal application.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new journal record
    Add {
        /// Title of the record
        #[clap(short = 'T', long)]
        title: String,

        /// Category for the record
        #[clap(short, long, value_enum, default_value = "daily")]
        category: Category,

        /// Free text body of the record
        #[clap(short = 'C', long, default_value = "")]
        content: String,

        /// Path to an image file to embed as a data URI
        #[clap(short, long)]
        image: Option<PathBuf>,
    },

    /// Edit an existing record (id and creation date are preserved)
    Edit {
        /// ID of the record to edit
        id: String,

        /// New title
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// New category
        #[clap(short, long, value_enum)]
        category: Option<Category>,

        /// New content
        #[clap(short = 'C', long)]
        content: Option<String>,

        /// Path to a new image file, or "none" to remove the image
        #[clap(short, long)]
        image: Option<String>,
    },

    /// Delete a record by ID
    Delete {
        /// ID of the record to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// List gallery records with optional filtering
    List {
        /// Filter by category
        #[clap(short, long, value_enum)]
        category: Option<Category>,

        /// Case-insensitive search over title and content
        #[clap(short, long)]
        search: Option<String>,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// List quick notes
    Notes {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Jot down a quick note
    Note {
        /// The note text
        content: String,

        /// Background color (hex)
        #[clap(long)]
        color: Option<String>,

        /// Sticker emoji
        #[clap(long)]
        sticker: Option<String>,
    },

    /// Show the most frequent words across all records
    Cloud,

    /// Show how many days have passed since the anniversary
    Days,

    /// Set the anniversary date and title
    Anniversary {
        /// Date in YYYY-MM-DD format
        date: String,

        /// Label for the anniversary
        #[clap(short = 'T', long)]
        title: Option<String>,
    },

    /// Export all records
    Export {
        /// Export format
        #[clap(short, long, value_parser = ["json", "csv"], default_value = "json")]
        format: String,

        /// Output path (defaults to a date-stamped file in the current directory)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Import records from a JSON backup, replacing the current collection
    Import {
        /// Path to the backup file
        file: PathBuf,
    },

    /// Tap the wooden fish
    Tap {
        /// Number of taps
        #[clap(short = 'n', long, default_value_t = 1)]
        count: u64,
    },

    /// Chat with the AI assistant
    Chat {
        /// The message to send
        message: String,

        /// Behavior profile
        #[clap(short, long, value_enum, default_value = "pro")]
        mode: ChatMode,

        /// Latitude for maps mode
        #[clap(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude for maps mode
        #[clap(long, requires = "lat")]
        lng: Option<f64>,
    },

    /// Generate an image from a prompt
    Imagine {
        /// The image prompt
        prompt: String,

        /// Aspect ratio preset
        #[clap(short, long, value_enum, default_value = "1:1")]
        aspect_ratio: AspectRatio,

        /// Where to write the generated PNG
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Edit an existing image with a prompt
    Retouch {
        /// Path to the source image
        image: PathBuf,

        /// The edit prompt
        prompt: String,

        /// Where to write the edited PNG
        #[clap(short, long)]
        output: PathBuf,
    },

    /// Describe an image for use as journal content
    Describe {
        /// Path to the image
        image: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_message_constructors_set_roles() {
        let user = ChatMessage::user("hi".to_string());
        assert_eq!(user.role, ChatRole::User);
        assert!(!user.is_error);

        let answer = ChatMessage::model("hello".to_string(), None);
        assert_eq!(answer.role, ChatRole::Model);
        assert!(!answer.is_error);

        let failure = ChatMessage::error("no luck".to_string());
        assert_eq!(failure.role, ChatRole::Model);
        assert!(failure.is_error);
        assert!(failure.grounding.is_none());
    }

    #[test]
    fn category_labels_round_trip() {
        for category in DISPLAY_CATEGORIES {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("随手记"), Some(Category::Memo));
        assert_eq!(Category::from_label("nope"), None);
    }
}
