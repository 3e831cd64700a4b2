use crate::models::DateInterval;

/// Inclusive-bound overlap: a shared boundary day counts as a conflict.
pub fn overlaps(a: &DateInterval, b: &DateInterval) -> bool {
    a.start <= b.end && b.start <= a.end
}

/// First interval in `existing` that overlaps `candidate`.
pub fn first_overlap<'a, T, F>(candidate: &DateInterval, existing: &'a [T], interval_of: F) -> Option<&'a T>
where
    F: Fn(&T) -> DateInterval,
{
    existing.iter().find(|item| overlaps(candidate, &interval_of(item)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn span(a: (u32, u32), b: (u32, u32)) -> DateInterval {
        DateInterval::new(day(2025, a.0, a.1), day(2025, b.0, b.1))
    }

    #[test]
    fn test_shared_boundary_day_conflicts() {
        let a = span((1, 1), (1, 5));
        let b = span((1, 5), (1, 10));
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_adjacent_intervals_do_not_conflict() {
        let a = span((1, 1), (1, 5));
        let b = span((1, 6), (1, 10));
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let samples = [
            span((1, 1), (1, 5)),
            span((1, 5), (1, 10)),
            span((1, 6), (1, 10)),
            span((1, 3), (1, 3)),
            span((2, 1), (3, 1)),
            span((1, 1), (12, 31)),
        ];

        for a in &samples {
            for b in &samples {
                assert_eq!(overlaps(a, b), overlaps(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_interval_overlaps_itself() {
        for interval in [span((1, 1), (1, 5)), span((7, 4), (7, 4)), span((3, 1), (9, 30))] {
            assert!(overlaps(&interval, &interval));
        }
    }

    #[test]
    fn test_single_day_interval() {
        let single = DateInterval::single_day(day(2025, 3, 10));

        assert!(overlaps(&single, &span((3, 1), (3, 10))));
        assert!(overlaps(&single, &span((3, 10), (3, 20))));
        assert!(overlaps(&single, &span((3, 5), (3, 15))));
        assert!(!overlaps(&single, &span((3, 11), (3, 20))));
        assert!(!overlaps(&single, &span((3, 1), (3, 9))));
        assert!(!overlaps(&single, &DateInterval::single_day(day(2025, 3, 11))));
    }

    #[test]
    fn test_containment_conflicts() {
        let outer = span((1, 1), (1, 31));
        let inner = span((1, 10), (1, 12));
        assert!(overlaps(&outer, &inner));
    }

    #[test]
    fn test_first_overlap_returns_earliest_match() {
        let existing = vec![
            span((1, 1), (1, 2)),
            span((1, 8), (1, 9)),
            span((1, 9), (1, 20)),
        ];
        let candidate = span((1, 9), (1, 9));

        let hit = first_overlap(&candidate, &existing, |i| *i);
        assert_eq!(hit, Some(&existing[1]));
        assert_eq!(first_overlap(&span((2, 1), (2, 2)), &existing, |i| *i), None);
    }
}
