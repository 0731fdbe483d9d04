//! Integration tests for lulu-journal
//!
//! These tests verify end-to-end functionality including:
//! - Record CRUD through the controller
//! - Persistence round trips across sessions
//! - Export/import workflows

use std::fs;

use lulu_journal::{
    elapsed_days, summarize, Category, CategoryFilter, JournalApp, RecordDraft, RecordStore,
};
use tempfile::TempDir;

/// Helper to create a journal in a scratch data directory
fn create_test_journal() -> (JournalApp, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = RecordStore::new(temp_dir.path().to_path_buf()).unwrap();
    let journal = JournalApp::new(store).unwrap();

    (journal, temp_dir)
}

fn reopen(temp_dir: &TempDir) -> JournalApp {
    let store = RecordStore::new(temp_dir.path().to_path_buf()).unwrap();
    JournalApp::new(store).unwrap()
}

fn draft(title: &str, content: &str, category: Category) -> RecordDraft {
    RecordDraft {
        title: title.to_string(),
        category,
        content: content.to_string(),
        ..RecordDraft::default()
    }
}

#[test]
fn record_lifecycle_survives_restarts() {
    let (mut journal, temp) = create_test_journal();

    let ramen = journal
        .save_record(draft("拉面", "一碗很好吃的豚骨拉面", Category::Food), None)
        .unwrap();
    let hike = journal
        .save_record(draft("Sunrise hike", "up before dawn", Category::Goals), None)
        .unwrap();
    journal
        .save_quick_note("buy film for the camera".to_string(), None, None)
        .unwrap()
        .unwrap();

    // Reopen: everything is back, newest first, quick note on its own wall
    let journal = reopen(&temp);
    assert_eq!(journal.records().len(), 3);
    assert_eq!(journal.home_records().len(), 2);
    assert_eq!(journal.home_records()[0].id, hike);
    assert_eq!(journal.note_records().len(), 1);

    // Edit keeps identity, delete removes exactly one
    let mut journal = reopen(&temp);
    let date_before = journal
        .records()
        .iter()
        .find(|r| r.id == ramen)
        .unwrap()
        .date;
    journal
        .save_record(draft("拉面 2.0", "second visit", Category::Food), Some(&ramen))
        .unwrap();
    let edited = journal.records().iter().find(|r| r.id == ramen).unwrap();
    assert_eq!(edited.date, date_before);
    assert_eq!(edited.title, "拉面 2.0");

    journal.request_delete(&hike).unwrap();
    journal.confirm_delete().unwrap();

    let journal = reopen(&temp);
    assert_eq!(journal.records().len(), 2);
    assert!(journal.records().iter().all(|r| r.id != hike));
}

#[test]
fn export_then_import_round_trips_the_collection() {
    let (mut journal, temp) = create_test_journal();
    journal
        .save_record(draft("Sunset", "golden hour", Category::Daily), None)
        .unwrap();
    journal
        .save_quick_note("an idea".to_string(), Some("#DBEAFE".to_string()), Some("💡".to_string()))
        .unwrap();

    let backup = temp.path().join("backup.json");
    journal.export_json(&backup).unwrap();

    // Restore into a fresh, empty journal
    let import_bytes = fs::read(&backup).unwrap();
    let (mut other, _other_temp) = create_test_journal();

    let count = other.import(&import_bytes).unwrap();
    assert_eq!(count, 2);
    assert_eq!(other.records(), journal.records());

    let note = other.note_records()[0];
    assert_eq!(note.bg_color.as_deref(), Some("#DBEAFE"));
    assert_eq!(note.sticker.as_deref(), Some("💡"));
}

#[test]
fn csv_export_is_spreadsheet_friendly() {
    let (mut journal, temp) = create_test_journal();
    journal
        .save_record(
            draft("say \"cheese\"", "photo day", Category::Hobbies),
            None,
        )
        .unwrap();

    let csv_path = temp.path().join("records.csv");
    journal.export_csv(&csv_path).unwrap();

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with('\u{FEFF}'));
    assert!(csv.contains("ID,Date,Title,Category,Content,ImageURL"));
    assert!(csv.contains(r#""say ""cheese""""#));
    assert!(csv.contains("爱好"));
}

#[test]
fn malformed_import_changes_nothing_anywhere() {
    let (mut journal, temp) = create_test_journal();
    journal
        .save_record(draft("keep", "me", Category::Daily), None)
        .unwrap();

    assert!(journal.import(b"{\"top\":\"object\"}").is_err());
    assert!(journal.import(b"[{\"id\":42}]").is_err());

    assert_eq!(journal.records().len(), 1);
    let journal = reopen(&temp);
    assert_eq!(journal.records().len(), 1);
    assert_eq!(journal.records()[0].title, "keep");
}

#[test]
fn filters_search_and_summary_work_together() {
    let (mut journal, _temp) = create_test_journal();
    journal
        .save_record(draft("Ramen night", "ramen ramen ramen", Category::Food), None)
        .unwrap();
    journal
        .save_record(draft("Gym", "leg day", Category::Goals), None)
        .unwrap();

    journal.set_filter(CategoryFilter::Only(Category::Food));
    journal.set_search("RAMEN".to_string());
    assert_eq!(journal.home_records().len(), 1);

    let ranked = summarize(journal.records());
    assert_eq!(ranked[0].0, "ramen");
    assert_eq!(ranked[0].1, 3);
}

#[test]
fn anniversary_and_merit_are_independent_of_records() {
    let (mut journal, temp) = create_test_journal();

    // Defaults applied on first run
    assert_eq!(journal.anniversary().date, "2025-12-28");
    assert_eq!(journal.anniversary().title, "我们相识");

    journal
        .set_anniversary("2026-02-14".to_string(), "第一次约会".to_string())
        .unwrap();
    journal.tap_merit(7).unwrap();

    let journal = reopen(&temp);
    assert_eq!(journal.anniversary().date, "2026-02-14");
    assert_eq!(journal.merit(), 7);

    let today = chrono::NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
    assert_eq!(journal.days_since_anniversary(today), Some(6));
    assert_eq!(elapsed_days("2026-02-14", today), Some(6));
}
