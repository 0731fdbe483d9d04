//! Pure view-derivation functions over the in-memory record collection.
//!
//! Both views preserve the source order (insertion order, newest first)
//! and have no side effects; the controller recomputes them whenever the
//! collection or the filter state changes.

use crate::{Category, Record};

/// Category constraint for the home gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sentinel: category is unconstrained.
    #[default]
    All,
    /// Equality match on one category.
    Only(Category),
}

impl CategoryFilter {
    fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

/// Computes the home-gallery subset.
///
/// Quick notes (category `Memo`) never appear here. The category filter
/// and the search predicate combine with AND; the search itself is a
/// case-insensitive substring match against title OR content.
pub fn home_view<'a>(
    records: &'a [Record],
    filter: &CategoryFilter,
    query: &str,
) -> Vec<&'a Record> {
    let needle = query.to_lowercase();

    records
        .iter()
        .filter(|record| {
            if record.is_quick_note() {
                return false;
            }

            let match_category = filter.matches(record.category);
            let match_search = record.title.to_lowercase().contains(&needle)
                || record.content.to_lowercase().contains(&needle);

            match_category && match_search
        })
        .collect()
}

/// Computes the quick-note subset: exactly the `Memo` records.
pub fn notes_view(records: &[Record]) -> Vec<&Record> {
    records.iter().filter(|record| record.is_quick_note()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, content: &str, category: Category) -> Record {
        Record {
            id: id.to_string(),
            title: title.to_string(),
            category,
            content: content.to_string(),
            image: None,
            date: 0,
            bg_color: None,
            sticker: None,
        }
    }

    fn fixture() -> Vec<Record> {
        vec![
            record("4", "Sunset walk", "golden hour by the river", Category::Daily),
            record("3", "拉面", "一碗很好吃的豚骨拉面", Category::Food),
            record("2", "idea", "try the new park", Category::Memo),
            record("1", "Trip plan", "sunrise hike next month", Category::Goals),
        ]
    }

    #[test]
    fn home_view_excludes_quick_notes() {
        let records = fixture();
        let view = home_view(&records, &CategoryFilter::All, "");
        assert!(view.iter().all(|r| r.category != Category::Memo));
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn views_partition_the_collection_when_unfiltered() {
        let records = fixture();
        let home = home_view(&records, &CategoryFilter::All, "");
        let notes = notes_view(&records);
        assert_eq!(home.len() + notes.len(), records.len());
        for record in &records {
            let in_home = home.iter().any(|r| r.id == record.id);
            let in_notes = notes.iter().any(|r| r.id == record.id);
            assert!(in_home != in_notes, "record {} must be in exactly one view", record.id);
        }
    }

    #[test]
    fn search_is_case_insensitive_and_matches_title_or_content() {
        let records = fixture();

        // "sun" hits "Sunset walk" via title and "Trip plan" via content
        let view = home_view(&records, &CategoryFilter::All, "sun");
        let ids: Vec<&str> = view.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "1"]);

        let view = home_view(&records, &CategoryFilter::All, "SUNSET");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "4");
    }

    #[test]
    fn category_and_search_combine_with_and() {
        let records = fixture();
        let view = home_view(&records, &CategoryFilter::Only(Category::Goals), "sun");
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "1");

        let view = home_view(&records, &CategoryFilter::Only(Category::Food), "sun");
        assert!(view.is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let records = fixture();
        let view = home_view(&records, &CategoryFilter::All, "");
        let ids: Vec<&str> = view.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "1"]);
    }

    #[test]
    fn notes_view_only_contains_memos() {
        let records = fixture();
        let notes = notes_view(&records);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "2");
    }

    #[test]
    fn empty_query_matches_everything() {
        let records = fixture();
        let view = home_view(&records, &CategoryFilter::All, "");
        assert_eq!(view.len(), 3);
    }
}
