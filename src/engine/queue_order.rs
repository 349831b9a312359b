//! Ordering rules for a doctor's waiting line.
//!
//! Two orderings are in use and they intentionally differ:
//! - [`priority_order`] is what the doctor sees: emergencies first, then
//!   arrival order.
//! - [`chronological_rank`] is what a patient is told as their position:
//!   arrival order only, emergencies are not moved ahead.

use std::cmp::Ordering;

/// Anything that sits in a waiting line
pub trait Queued {
    fn is_emergency(&self) -> bool;
    /// Stored fixed-width RFC 3339 timestamp; text order is time order
    fn joined_at(&self) -> &str;
    /// Insertion sequence, used to break ties between identical timestamps
    fn sequence(&self) -> i64;
}

fn by_arrival<T: Queued>(a: &T, b: &T) -> Ordering {
    a.joined_at()
        .cmp(b.joined_at())
        .then_with(|| a.sequence().cmp(&b.sequence()))
}

/// Sort emergencies ahead of everyone else, each group in arrival order
pub fn priority_order<T: Queued>(entries: &mut [T]) {
    entries.sort_by(|a, b| {
        b.is_emergency()
            .cmp(&a.is_emergency())
            .then_with(|| by_arrival(a, b))
    });
}

/// 1-based arrival rank of the entry with `sequence` among `entries`
pub fn chronological_rank<T: Queued>(entries: &[T], sequence: i64) -> Option<usize> {
    let mut ordered: Vec<&T> = entries.iter().collect();
    ordered.sort_by(|a, b| by_arrival(*a, *b));
    ordered
        .iter()
        .position(|e| e.sequence() == sequence)
        .map(|idx| idx + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Entry {
        id: i64,
        joined_at: &'static str,
        emergency: bool,
    }

    impl Queued for Entry {
        fn is_emergency(&self) -> bool {
            self.emergency
        }
        fn joined_at(&self) -> &str {
            self.joined_at
        }
        fn sequence(&self) -> i64 {
            self.id
        }
    }

    fn entry(id: i64, joined_at: &'static str, emergency: bool) -> Entry {
        Entry {
            id,
            joined_at,
            emergency,
        }
    }

    fn ids(entries: &[Entry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_emergency_first_then_arrival() {
        let mut line = vec![
            entry(1, "2024-03-01T09:00:00.000000Z", false),
            entry(2, "2024-03-01T09:05:00.000000Z", true),
            entry(3, "2024-03-01T09:10:00.000000Z", false),
        ];
        priority_order(&mut line);
        assert_eq!(ids(&line), vec![2, 1, 3]);
    }

    #[test]
    fn test_multiple_emergencies_keep_arrival_order() {
        let mut line = vec![
            entry(1, "2024-03-01T09:20:00.000000Z", true),
            entry(2, "2024-03-01T09:00:00.000000Z", false),
            entry(3, "2024-03-01T09:10:00.000000Z", true),
        ];
        priority_order(&mut line);
        assert_eq!(ids(&line), vec![3, 1, 2]);
    }

    #[test]
    fn test_identical_timestamps_fall_back_to_sequence() {
        let mut line = vec![
            entry(7, "2024-03-01T09:00:00.000000Z", false),
            entry(4, "2024-03-01T09:00:00.000000Z", false),
        ];
        priority_order(&mut line);
        assert_eq!(ids(&line), vec![4, 7]);
    }

    #[test]
    fn test_rank_ignores_emergency_flag() {
        let line = vec![
            entry(1, "2024-03-01T09:00:00.000000Z", false),
            entry(2, "2024-03-01T09:05:00.000000Z", true),
            entry(3, "2024-03-01T09:10:00.000000Z", false),
        ];
        assert_eq!(chronological_rank(&line, 1), Some(1));
        assert_eq!(chronological_rank(&line, 2), Some(2));
        assert_eq!(chronological_rank(&line, 3), Some(3));
        assert_eq!(chronological_rank(&line, 99), None);
    }

    #[test]
    fn test_empty_line() {
        let mut line: Vec<Entry> = Vec::new();
        priority_order(&mut line);
        assert!(line.is_empty());
        assert_eq!(chronological_rank(&line, 1), None);
    }
}
