use std::collections::HashSet;

use proptest::prelude::*;
use weather_now::domain::{
    forecast::{DayReference, build_daily_summaries, group_by_day, summarize_day},
    weather::{Condition, IntervalRecord},
};

const CONDITIONS: &[&str] = &["Clear", "Clouds", "Rain", "Snow", "Drizzle", "Haze"];

fn record_strategy() -> impl Strategy<Value = IntervalRecord> {
    (
        0i64..2_000_000_000,
        -60.0f64..60.0,
        0usize..CONDITIONS.len(),
    )
        .prop_map(|(timestamp, temperature, condition)| {
            IntervalRecord::new(timestamp, temperature, Condition::from_api(CONDITIONS[condition]))
        })
}

fn offset_strategy() -> impl Strategy<Value = DayReference> {
    prop_oneof![
        Just(DayReference::Utc),
        (-12i32..=14).prop_map(|hours| DayReference::from_offset_seconds(hours * 3600)),
    ]
}

proptest! {
    #[test]
    fn grouping_partitions_records_in_order(
        records in prop::collection::vec(record_strategy(), 0..60),
        reference in offset_strategy(),
    ) {
        let groups = group_by_day(&records, reference).expect("valid timestamps");

        let total: usize = groups.iter().map(|(_, bucket)| bucket.len()).sum();
        prop_assert_eq!(total, records.len());

        let keys: HashSet<_> = groups.iter().map(|(key, _)| *key).collect();
        prop_assert_eq!(keys.len(), groups.len());

        for (key, bucket) in &groups {
            prop_assert!(!bucket.is_empty());
            for record in bucket {
                prop_assert_eq!(reference.day_of(record.timestamp).expect("valid"), *key);
            }
            let expected: Vec<_> = records
                .iter()
                .filter(|record| reference.day_of(record.timestamp).expect("valid") == *key)
                .cloned()
                .collect();
            prop_assert_eq!(bucket, &expected);
        }

        let mut first_seen = Vec::new();
        for record in &records {
            let day = reference.day_of(record.timestamp).expect("valid");
            if !first_seen.contains(&day) {
                first_seen.push(day);
            }
        }
        let order: Vec<_> = groups.iter().map(|(key, _)| *key).collect();
        prop_assert_eq!(order, first_seen);
    }

    #[test]
    fn summaries_respect_bounds_and_counts(
        records in prop::collection::vec(record_strategy(), 1..40),
    ) {
        for (date, bucket) in group_by_day(&records, DayReference::Utc).expect("valid") {
            let summary = summarize_day(date, &bucket).expect("non-empty bucket");
            prop_assert!(summary.min_temperature <= summary.max_temperature);
            prop_assert!(bucket.iter().all(|r| r.temperature.round() as i64 >= summary.min_temperature));
            prop_assert!(bucket.iter().all(|r| r.temperature.round() as i64 <= summary.max_temperature));
            prop_assert_eq!(summary.representative_timestamp, bucket[bucket.len() / 2].timestamp);

            let count = |condition: &Condition| bucket.iter().filter(|r| &r.condition == condition).count();
            let dominant = count(&summary.dominant_condition);
            let first_index = bucket
                .iter()
                .position(|r| r.condition == summary.dominant_condition)
                .expect("dominant comes from the bucket");
            for (index, record) in bucket.iter().enumerate() {
                let other = count(&record.condition);
                prop_assert!(other <= dominant);
                if other == dominant {
                    let other_first = bucket
                        .iter()
                        .position(|r| r.condition == record.condition)
                        .expect("present");
                    prop_assert!(first_index <= other_first, "tie at {} went to a later condition", index);
                }
            }
        }
    }

    #[test]
    fn summaries_are_deterministic(
        records in prop::collection::vec(record_strategy(), 0..30),
    ) {
        let first = build_daily_summaries(&records, DayReference::Utc).expect("valid");
        let second = build_daily_summaries(&records, DayReference::Utc).expect("valid");
        prop_assert_eq!(first, second);
    }
}
