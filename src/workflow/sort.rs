//! Latency tie-break among standby links.

use std::cmp::Ordering;
use std::time::Duration;

use crate::connection::ConnectionHealthyResult;

/// Reorder only the elements matching `should_sort`, leaving every other element in place.
///
/// The sort is stable: equal elements keep their relative input order.
pub fn sort_specific_elements<T, P, C>(items: &[T], should_sort: P, compare: C) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
    C: FnMut(&T, &T) -> Ordering,
{
    let mut sortable: Vec<T> = items.iter().filter(|item| should_sort(*item)).cloned().collect();
    sortable.sort_by(compare);

    let mut sorted = sortable.into_iter();
    items
        .iter()
        .map(|item| {
            if should_sort(item) {
                sorted.next().unwrap_or_else(|| item.clone())
            } else {
                item.clone()
            }
        })
        .collect()
}

fn is_standby(result: &Option<ConnectionHealthyResult>) -> bool {
    result.map_or(false, |r| r.connection_type.is_standby())
}

/// Healthy before unhealthy, then fastest first.
fn standby_key(result: &Option<ConnectionHealthyResult>) -> Option<(bool, Duration)> {
    result.map(|r| (!r.healthy, r.check_resolved_in))
}

/// Reorder the BACKUP/FALLBACK slots: healthy standbys first, fastest-responding first among them.
///
/// A dead standby never outranks a healthy one, however fast it failed.
/// PRIMARY, NONE and missing (`None`) entries never move.
pub fn sorted_connection_check(
    results: &[Option<ConnectionHealthyResult>],
) -> Vec<Option<ConnectionHealthyResult>> {
    sort_specific_elements(results, is_standby, |a, b| standby_key(a).cmp(&standby_key(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionType;

    fn result(connection_type: ConnectionType, ms: u64) -> Option<ConnectionHealthyResult> {
        Some(ConnectionHealthyResult::new(connection_type, true, Duration::from_millis(ms)))
    }

    fn types(results: &[Option<ConnectionHealthyResult>]) -> Vec<Option<ConnectionType>> {
        results.iter().map(|r| r.map(|r| r.connection_type)).collect()
    }

    #[test]
    fn test_sort_specific_elements_keeps_fixed_positions() {
        let sorted = sort_specific_elements(&[9, 4, 7, 2, 5], |n| n % 2 == 1, |a, b| a.cmp(b));
        assert_eq!(sorted, vec![5, 4, 7, 2, 9]);
    }

    #[test]
    fn test_fastest_standby_first() {
        let input = [
            result(ConnectionType::Backup, 80),
            result(ConnectionType::Fallback, 15),
            result(ConnectionType::Primary, 1),
        ];
        let sorted = sorted_connection_check(&input);
        assert_eq!(
            types(&sorted),
            vec![
                Some(ConnectionType::Fallback),
                Some(ConnectionType::Backup),
                Some(ConnectionType::Primary)
            ]
        );
    }

    #[test]
    fn test_primary_never_moves() {
        let input = [
            result(ConnectionType::Primary, 500),
            result(ConnectionType::Backup, 30),
            result(ConnectionType::Fallback, 10),
        ];
        let sorted = sorted_connection_check(&input);
        assert_eq!(sorted[0], input[0]);
        assert_eq!(sorted[1], input[2]);
        assert_eq!(sorted[2], input[1]);

        let input = [
            result(ConnectionType::Backup, 30),
            result(ConnectionType::Primary, 0),
            result(ConnectionType::Fallback, 10),
        ];
        let sorted = sorted_connection_check(&input);
        assert_eq!(
            types(&sorted),
            vec![
                Some(ConnectionType::Fallback),
                Some(ConnectionType::Primary),
                Some(ConnectionType::Backup)
            ]
        );
    }

    #[test]
    fn test_missing_entries_stay_in_place() {
        let input = [result(ConnectionType::Backup, 10), None, result(ConnectionType::Primary, 3)];
        let sorted = sorted_connection_check(&input);
        assert_eq!(sorted, input.to_vec());
    }

    #[test]
    fn test_unhealthy_standby_never_outranks_healthy_one() {
        let dead_fallback = Some(ConnectionHealthyResult::new(
            ConnectionType::Fallback,
            false,
            Duration::from_millis(100),
        ));
        let input = [result(ConnectionType::Backup, 300), dead_fallback, result(ConnectionType::Primary, 1)];
        assert_eq!(sorted_connection_check(&input), input.to_vec());

        let input = [dead_fallback, result(ConnectionType::Primary, 1000), result(ConnectionType::Backup, 200)];
        assert_eq!(
            types(&sorted_connection_check(&input)),
            vec![
                Some(ConnectionType::Backup),
                Some(ConnectionType::Primary),
                Some(ConnectionType::Fallback)
            ]
        );
    }

    #[test]
    fn test_ties_are_stable() {
        let input = [
            result(ConnectionType::Backup, 20),
            result(ConnectionType::Fallback, 20),
            result(ConnectionType::Primary, 20),
        ];
        assert_eq!(sorted_connection_check(&input), input.to_vec());
    }
}
