//! Group-by aggregation with percentage shares

use crate::structs::{AggregateRow, Aggregation, KeyOrder, Selection};
use std::collections::BTreeMap;

/// Group `items` by `key_fn`, reduce `value_fn` per group, and attach each
/// group's share of the result's total.
///
/// With `KeyOrder::Natural` only keys actually present are emitted, in
/// ascending key order. With `KeyOrder::Reindex` exactly the listed keys are
/// emitted in list order; absent keys get a zero row and unlisted keys are
/// dropped. Percentages are relative to the emitted rows and are all zero when
/// their total is zero.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate<'a, T, K, I, FK, FV>(
    items: I,
    key_fn: FK,
    value_fn: FV,
    aggregation: Aggregation,
    order: &KeyOrder<K>,
) -> Vec<AggregateRow<K>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Ord + Clone,
    FK: Fn(&T) -> K,
    FV: Fn(&T) -> f64,
{
    let mut groups: BTreeMap<K, (usize, f64)> = BTreeMap::new();
    for item in items {
        let entry = groups.entry(key_fn(item)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += value_fn(item);
    }

    let reduce = |(n, sum): (usize, f64)| match aggregation {
        Aggregation::Sum => sum,
        Aggregation::Mean if n == 0 => 0.0,
        Aggregation::Mean => sum / n as f64,
    };

    let mut rows: Vec<AggregateRow<K>> = match order {
        KeyOrder::Natural => groups
            .into_iter()
            .map(|(key, acc)| AggregateRow {
                key,
                records: acc.0,
                value: reduce(acc),
                percentage: 0.0,
            })
            .collect(),
        KeyOrder::Reindex(keys) => {
            let mut rows: Vec<AggregateRow<K>> = Vec::with_capacity(keys.len());
            for key in keys {
                if rows.iter().any(|r| &r.key == key) {
                    continue;
                }
                let acc = groups.get(key).copied().unwrap_or((0, 0.0));
                rows.push(AggregateRow {
                    key: key.clone(),
                    records: acc.0,
                    value: reduce(acc),
                    percentage: 0.0,
                });
            }
            rows
        }
    };

    let total: f64 = rows.iter().map(|r| r.value).sum();
    if total != 0.0 && total.is_finite() {
        for row in &mut rows {
            row.percentage = 100.0 * row.value / total;
        }
    }

    rows
}

impl<K: Ord + Clone> KeyOrder<K> {
    /// Drop requested keys the selection excludes, so deselected groups
    /// don't reappear as zero rows
    #[must_use]
    pub fn restricted_to(&self, selection: &Selection<K>) -> Self {
        match self {
            Self::Natural => Self::Natural,
            Self::Reindex(keys) => Self::Reindex(
                keys.iter()
                    .filter(|k| selection.matches(k))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::DayType;
    use std::collections::BTreeSet;

    fn sum_by_day(rows: &[(DayType, f64)], order: &KeyOrder<DayType>) -> Vec<AggregateRow<DayType>> {
        aggregate(rows, |r: &(DayType, f64)| r.0, |r: &(DayType, f64)| r.1, Aggregation::Sum, order)
    }

    #[test]
    fn test_sum_with_percentages() {
        let rows = [
            (DayType::Working, 100.0),
            (DayType::NonWorking, 50.0),
            (DayType::NonWorking, 50.0),
        ];
        let result = sum_by_day(&rows, &KeyOrder::Natural);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, DayType::NonWorking);
        assert_eq!(result[0].records, 2);
        assert!((result[0].value - 100.0).abs() < 1e-9);
        assert!((result[0].percentage - 50.0).abs() < 1e-9);
        assert!((result[1].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentages_sum_to_hundred() {
        let rows: Vec<(u32, f64)> = (0..97).map(|i| (i % 7, f64::from(i * 13 % 101))).collect();
        let result = aggregate(&rows, |r: &(u32, f64)| r.0, |r: &(u32, f64)| r.1, Aggregation::Sum, &KeyOrder::Natural);

        let total: f64 = result.iter().map(|r| r.percentage).sum();
        assert_eq!(result.len(), 7);
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_mean() {
        let rows = [(1u8, 10.0), (1, 20.0), (2, 40.0)];
        let result = aggregate(&rows, |r: &(u8, f64)| r.0, |r: &(u8, f64)| r.1, Aggregation::Mean, &KeyOrder::Natural);

        assert!((result[0].value - 15.0).abs() < 1e-9);
        assert!((result[1].value - 40.0).abs() < 1e-9);
        let total: f64 = result.iter().map(|r| r.percentage).sum();
        assert!((total - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_reindex_fills_missing_key_with_zero() {
        let rows = [(DayType::Working, 120.0)];
        let order = KeyOrder::Reindex(vec![DayType::Working, DayType::NonWorking]);
        let result = sum_by_day(&rows, &order);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].key, DayType::Working);
        assert!((result[0].percentage - 100.0).abs() < 1e-9);
        assert_eq!(result[1].key, DayType::NonWorking);
        assert_eq!(result[1].records, 0);
        assert_eq!(result[1].value, 0.0);
        assert_eq!(result[1].percentage, 0.0);
    }

    #[test]
    fn test_natural_order_omits_missing_key() {
        let rows = [(DayType::Working, 120.0)];
        let result = sum_by_day(&rows, &KeyOrder::Natural);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_reindex_drops_unlisted_keys_from_denominator() {
        let rows = [(DayType::Working, 30.0), (DayType::NonWorking, 70.0)];
        let result = sum_by_day(&rows, &KeyOrder::Reindex(vec![DayType::Working]));

        assert_eq!(result.len(), 1);
        assert!((result[0].percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        let rows: [(DayType, f64); 0] = [];
        assert!(sum_by_day(&rows, &KeyOrder::Natural).is_empty());

        let order = KeyOrder::Reindex(vec![DayType::NonWorking, DayType::Working]);
        let result = sum_by_day(&rows, &order);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|r| r.value == 0.0 && r.percentage == 0.0));
    }

    #[test]
    fn test_idempotent() {
        let rows = [
            (DayType::Working, 3.5),
            (DayType::NonWorking, 1.25),
            (DayType::Working, 7.0),
        ];
        let order = KeyOrder::Reindex(vec![DayType::NonWorking, DayType::Working]);
        let first = format!("{:?}", sum_by_day(&rows, &order));
        let second = format!("{:?}", sum_by_day(&rows, &order));
        assert_eq!(first, second);
    }

    #[test]
    fn test_restricted_order() {
        let order = KeyOrder::Reindex(vec![DayType::NonWorking, DayType::Working]);
        let only_working = Selection::Only(BTreeSet::from([DayType::Working]));

        assert_eq!(
            order.restricted_to(&only_working),
            KeyOrder::Reindex(vec![DayType::Working])
        );
        assert_eq!(order.restricted_to(&Selection::All), order);
    }
}
