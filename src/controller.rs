//! Orchestration layer owning the in-memory session state.
//!
//! `JournalApp` routes user intents to store mutations and recomputes the
//! derived views on demand. Every mutation persists eagerly; a failed
//! save is reported once and the in-memory collection is kept as-is, a
//! deliberate availability-over-consistency tradeoff for a single-user
//! local-first app.

use chrono::NaiveDate;
use log::{info, warn};

use crate::{
    home_view, notes_view, AnniversarySetting, Category, CategoryFilter, JournalError, Record,
    RecordStore, Result, NOTE_COLORS, NOTE_STICKERS,
};

/// Editable fields of a record, as collected by the full form.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    pub title: String,
    pub category: Category,
    pub content: String,
    pub image: Option<String>,
    pub bg_color: Option<String>,
    pub sticker: Option<String>,
}

/// Application controller: session state plus the store behind it.
pub struct JournalApp {
    store: RecordStore,

    /// The full collection, insertion order, newest first
    records: Vec<Record>,

    /// Home-gallery category constraint
    filter: CategoryFilter,

    /// Home-gallery search query
    search: String,

    /// Record id awaiting delete confirmation
    pending_delete: Option<String>,

    /// Anniversary reference date + label
    anniversary: AnniversarySetting,

    /// Wooden-fish tap counter
    merit: u64,
}

impl JournalApp {
    /// Loads all session state from the store. Record-load failures
    /// degrade to an empty collection inside the store; settings get
    /// their defaults on first run.
    pub fn new(store: RecordStore) -> Result<Self> {
        let records = store.load();
        let (date, title) = store.load_anniversary()?;
        let merit = store.load_merit();

        Ok(Self {
            store,
            records,
            filter: CategoryFilter::All,
            search: String::new(),
            pending_delete: None,
            anniversary: AnniversarySetting { date, title },
            merit,
        })
    }

    /// The full collection, newest first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, query: String) {
        self.search = query;
    }

    /// The filtered home-gallery view under the current filter state.
    pub fn home_records(&self) -> Vec<&Record> {
        home_view(&self.records, &self.filter, &self.search)
    }

    /// The quick-note wall.
    pub fn note_records(&self) -> Vec<&Record> {
        notes_view(&self.records)
    }

    /// Saves a record from the full form.
    ///
    /// With `editing_id` the matching record keeps its id and creation
    /// date and all other fields are replaced; without it a new record is
    /// prepended with a fresh unique id. Returns the affected id.
    pub fn save_record(&mut self, draft: RecordDraft, editing_id: Option<&str>) -> Result<String> {
        if draft.title.trim().is_empty() {
            return Err(JournalError::ApplicationError {
                message: "Title must not be empty".to_string(),
            });
        }

        let id = match editing_id {
            Some(id) => {
                let record = self
                    .records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or_else(|| JournalError::RecordNotFound { id: id.to_string() })?;

                record.title = draft.title;
                record.category = draft.category;
                record.content = draft.content;
                record.image = draft.image;
                record.bg_color = draft.bg_color;
                record.sticker = draft.sticker;
                info!("Edited record {}", id);
                id.to_string()
            }
            None => {
                let mut record =
                    Record::new(draft.title, draft.category, draft.content, draft.image);
                record.bg_color = draft.bg_color;
                record.sticker = draft.sticker;
                self.ensure_unique_id(&mut record);
                let id = record.id.clone();
                self.records.insert(0, record);
                info!("Created record {}", id);
                id
            }
        };

        self.persist()?;
        Ok(id)
    }

    /// Saves a quick note. Whitespace-only content is a silent no-op;
    /// otherwise returns the new record's id.
    pub fn save_quick_note(
        &mut self,
        content: String,
        bg_color: Option<String>,
        sticker: Option<String>,
    ) -> Result<Option<String>> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let mut record = Record::quick_note(
            content,
            bg_color.unwrap_or_else(|| NOTE_COLORS[0].to_string()),
            sticker.unwrap_or_else(|| NOTE_STICKERS[0].to_string()),
        );
        self.ensure_unique_id(&mut record);
        let id = record.id.clone();
        self.records.insert(0, record);
        info!("Created quick note {}", id);

        self.persist()?;
        Ok(Some(id))
    }

    /// Ids are millis strings; bump on the rare same-millisecond clash so
    /// the uniqueness invariant holds.
    fn ensure_unique_id(&self, record: &mut Record) {
        let mut millis = record.date;
        while self.records.iter().any(|r| r.id == record.id) {
            millis += 1;
            record.id = millis.to_string();
        }
    }

    /// Marks a record for deletion, pending explicit confirmation.
    pub fn request_delete(&mut self, id: &str) -> Result<()> {
        if !self.records.iter().any(|r| r.id == id) {
            return Err(JournalError::RecordNotFound { id: id.to_string() });
        }
        self.pending_delete = Some(id.to_string());
        Ok(())
    }

    /// Deletes the pending record, leaving all others and their relative
    /// order untouched. Returns the removed id.
    pub fn confirm_delete(&mut self) -> Result<String> {
        let id = self
            .pending_delete
            .take()
            .ok_or_else(|| JournalError::ApplicationError {
                message: "No deletion pending".to_string(),
            })?;

        self.records.retain(|r| r.id != id);
        info!("Deleted record {}", id);
        self.persist()?;
        Ok(id)
    }

    /// Clears a pending deletion without touching the collection.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Replaces the whole collection from an imported JSON backup.
    /// On failure nothing changes, in memory or on disk.
    pub fn import(&mut self, bytes: &[u8]) -> Result<usize> {
        let records = self.store.import_json(bytes)?;
        let count = records.len();
        self.records = records;
        Ok(count)
    }

    /// Writes the pretty-printed JSON backup of the current collection.
    pub fn export_json(&self, output: &std::path::Path) -> Result<()> {
        self.store.export_json(&self.records, output)
    }

    /// Writes the lossy CSV summary of the current collection.
    pub fn export_csv(&self, output: &std::path::Path) -> Result<()> {
        self.store.export_csv(&self.records, output)
    }

    pub fn anniversary(&self) -> &AnniversarySetting {
        &self.anniversary
    }

    /// Persists a new anniversary date + label together.
    pub fn set_anniversary(&mut self, date: String, title: String) -> Result<()> {
        if NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").is_err() {
            return Err(JournalError::ApplicationError {
                message: format!("'{}' is not a YYYY-MM-DD date", date),
            });
        }

        self.store.save_anniversary(&date, &title)?;
        self.anniversary = AnniversarySetting { date, title };
        Ok(())
    }

    /// Days elapsed since the anniversary as of `today`.
    pub fn days_since_anniversary(&self, today: NaiveDate) -> Option<i64> {
        self.anniversary.elapsed_days(today)
    }

    pub fn merit(&self) -> u64 {
        self.merit
    }

    /// Taps the wooden fish `count` times and persists the new total.
    pub fn tap_merit(&mut self, count: u64) -> Result<u64> {
        self.merit = self.merit.saturating_add(count);
        self.store.save_merit(self.merit)?;
        Ok(self.merit)
    }

    /// Writes the collection through to the store. The in-memory state is
    /// kept on failure; the caller reports the warning once.
    fn persist(&self) -> Result<()> {
        if let Err(e) = self.store.save(&self.records) {
            warn!("Failed to persist records: {}", e);
            return Err(e);
        }
        Ok(())
    }
}
