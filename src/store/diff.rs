//! Snapshot comparison engine.
//!
//! Reports items that appeared between two snapshots:
//! - Matches items by id only, content changes are not reported
//! - Removed items are not reported
//! - Orders additions by first available date, undated items first

use chrono::NaiveDate;

use crate::catalog::{CatalogSnapshot, ItemRecord};

/// Sort key derived from an item's first lifespan.
///
/// `Undated` orders before every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DateKey {
    Undated,
    Dated(NaiveDate),
}

/// An item present in the current snapshot but not the previous one
#[derive(Debug, Clone, Copy)]
pub struct NewAddition<'a> {
    pub id: &'a str,
    pub record: ItemRecord<'a>,
}

impl NewAddition<'_> {
    pub fn date_key(&self) -> DateKey {
        date_key(&self.record)
    }
}

/// Calendar date portion of the first lifespan start, if it is a valid date.
///
/// Returns the raw text before the `T` separator so display matches the source.
pub fn first_available<'a>(record: &ItemRecord<'a>) -> Option<(&'a str, NaiveDate)> {
    let start = record.first_lifespan_start()?;
    let date_part = start.split('T').next().unwrap_or(start);
    // chrono tolerates a sign or leading whitespace before the year
    let year = date_part.get(..4)?;
    if !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .map(|date| (date_part, date))
}

pub fn date_key(record: &ItemRecord<'_>) -> DateKey {
    match first_available(record) {
        Some((_, date)) => DateKey::Dated(date),
        None => DateKey::Undated,
    }
}

/// Items whose id is in `current` but not in `previous`, ordered by date key.
///
/// The sort is stable: items sharing a key keep `current`'s document order.
pub fn new_additions<'a>(
    current: &'a CatalogSnapshot,
    previous: &CatalogSnapshot,
) -> Vec<NewAddition<'a>> {
    let mut additions: Vec<NewAddition<'a>> = current
        .iter()
        .filter(|(id, _)| !previous.contains(id))
        .map(|(id, record)| NewAddition { id, record })
        .collect();

    additions.sort_by_key(|addition| addition.date_key());
    additions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn snapshot(body: &str) -> CatalogSnapshot {
        catalog::parse(body).unwrap()
    }

    fn ids<'a>(additions: &[NewAddition<'a>]) -> Vec<&'a str> {
        additions.iter().map(|a| a.id).collect()
    }

    fn dated(start: &str) -> String {
        format!(r#"{{"categoryLifespans": {{"cat": [{{"start": "{start}"}}]}}}}"#)
    }

    #[test]
    fn only_new_ids_reported() {
        let previous = snapshot(r#"{"1": {}, "2": {}, "gone": {}}"#);
        let current = snapshot(r#"{"1": {}, "3": {}, "2": {}, "4": {}}"#);

        let result = new_additions(&current, &previous);
        assert_eq!(ids(&result), vec!["3", "4"]);
    }

    #[test]
    fn content_change_is_not_an_addition() {
        let previous = snapshot(r#"{"1": {"name": "Old"}}"#);
        let current = snapshot(r#"{"1": {"name": "New", "imageHash": "x"}}"#);

        assert!(new_additions(&current, &previous).is_empty());
    }

    #[test]
    fn subset_yields_empty() {
        let previous = snapshot(r#"{"1": {}, "2": {}}"#);
        let current = snapshot(r#"{"2": {}}"#);

        assert!(new_additions(&current, &previous).is_empty());
    }

    #[test]
    fn empty_previous_reports_everything_in_order() {
        let current = snapshot(r#"{"b": {}, "a": {}, "c": {}}"#);
        let result = new_additions(&current, &CatalogSnapshot::default());
        assert_eq!(ids(&result), vec!["b", "a", "c"]);
    }

    #[test]
    fn sorted_undated_first_and_stable_on_ties() {
        let current = snapshot(&format!(
            r#"{{"march": {}, "x": {}, "undated": {{}}, "y": {}}}"#,
            dated("2024-03-01T00:00:00"),
            dated("2024-01-15T08:00:00"),
            dated("2024-01-15T23:59:59"),
        ));

        let result = new_additions(&current, &CatalogSnapshot::default());
        assert_eq!(ids(&result), vec!["undated", "x", "y", "march"]);
    }

    #[test]
    fn sentinel_ties_keep_document_order() {
        let current = snapshot(&format!(
            r#"{{"late": {}, "u1": {{}}, "bad": {}, "u2": {{"categoryLifespans": {{}}}}}}"#,
            dated("2030-01-01T00:00:00"),
            dated("not-a-date"),
        ));

        let result = new_additions(&current, &CatalogSnapshot::default());
        assert_eq!(ids(&result), vec!["u1", "bad", "u2", "late"]);
    }

    #[test]
    fn malformed_start_degrades_to_undated() {
        for start in ["not-a-date", "+2024-05-01T00:00:00", " 2024-05-01T00:00:00", "24-05-01"] {
            let raw = serde_json::json!({"categoryLifespans": {"c": [{"start": start}]}});
            let record = ItemRecord::new(&raw);
            assert_eq!(date_key(&record), DateKey::Undated, "start {start:?}");
            assert_eq!(first_available(&record), None, "start {start:?}");
        }
    }

    #[test]
    fn missing_start_or_empty_intervals_are_undated() {
        let no_start = serde_json::json!({"categoryLifespans": {"c": [{"end": "2024-01-01T00:00:00"}]}});
        let empty = serde_json::json!({"categoryLifespans": {"c": [], "d": []}});
        assert_eq!(date_key(&ItemRecord::new(&no_start)), DateKey::Undated);
        assert_eq!(date_key(&ItemRecord::new(&empty)), DateKey::Undated);
    }

    #[test]
    fn date_without_time_part_is_accepted() {
        let raw = serde_json::json!({"categoryLifespans": {"c": [{"start": "2024-05-01"}]}});
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(date_key(&ItemRecord::new(&raw)), DateKey::Dated(expected));
    }

    #[test]
    fn undated_sorts_before_any_date() {
        let ancient = NaiveDate::from_ymd_opt(1, 1, 1).unwrap();
        assert!(DateKey::Undated < DateKey::Dated(ancient));
    }

    #[test]
    fn inputs_are_untouched() {
        let previous = snapshot(r#"{"1": {}}"#);
        let current = snapshot(r#"{"2": {"name": "x"}, "1": {}}"#);
        let (before_prev, before_cur) = (previous.clone(), current.clone());

        let _ = new_additions(&current, &previous);
        assert_eq!(previous, before_prev);
        assert_eq!(current, before_cur);
    }
}
