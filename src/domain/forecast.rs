//! Daily bucketing of 3-hour forecast records.
//!
//! Records are grouped by the calendar date of their timestamp under an
//! explicit [`DayReference`], then each day is reduced to a
//! [`DailySummary`]. Day order is the order in which dates first appear in
//! the input; the aggregator never sorts.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use thiserror::Error;

use crate::domain::weather::{Condition, IntervalRecord, round_temp};

pub type DayKey = NaiveDate;

/// Clock used to turn a unix timestamp into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayReference {
    #[default]
    Utc,
    Offset(FixedOffset),
}

impl DayReference {
    /// Offsets outside +/-24h fall back to UTC.
    #[must_use]
    pub fn from_offset_seconds(seconds: i32) -> Self {
        FixedOffset::east_opt(seconds).map_or(Self::Utc, Self::Offset)
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        match self {
            Self::Utc => Utc.fix(),
            Self::Offset(offset) => *offset,
        }
    }

    pub fn day_of(&self, timestamp: i64) -> Result<DayKey, AggregateError> {
        if timestamp < 0 {
            return Err(AggregateError::InvalidTimestamp(timestamp));
        }
        let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)
            .ok_or(AggregateError::InvalidTimestamp(timestamp))?;
        Ok(match self {
            Self::Utc => utc.date_naive(),
            Self::Offset(offset) => utc.with_timezone(offset).date_naive(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("forecast record has an invalid timestamp: {0}")]
    InvalidTimestamp(i64),
    #[error("cannot summarize a day without forecast records")]
    EmptyBucket,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: DayKey,
    pub min_temperature: i64,
    pub max_temperature: i64,
    pub dominant_condition: Condition,
    pub icon: String,
    pub description: String,
    pub representative_timestamp: i64,
}

/// A day's summary together with the records it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub summary: DailySummary,
    pub records: Vec<IntervalRecord>,
}

/// Buckets records by calendar date, keeping input order within and across days.
pub fn group_by_day(
    records: &[IntervalRecord],
    reference: DayReference,
) -> Result<Vec<(DayKey, Vec<IntervalRecord>)>, AggregateError> {
    let mut buckets: Vec<(DayKey, Vec<IntervalRecord>)> = Vec::new();
    let mut index: HashMap<DayKey, usize> = HashMap::new();

    for record in records {
        let day = reference.day_of(record.timestamp)?;
        match index.get(&day) {
            Some(&slot) => buckets[slot].1.push(record.clone()),
            None => {
                index.insert(day, buckets.len());
                buckets.push((day, vec![record.clone()]));
            }
        }
    }

    Ok(buckets)
}

/// Reduces one day's records to its summary.
///
/// The dominant condition is the one with the highest count; on a tie the
/// condition seen first in the bucket wins. Icon and description come from
/// the first record with that condition, and the representative timestamp
/// is the record at index `len / 2`.
pub fn summarize_day(
    date: DayKey,
    bucket: &[IntervalRecord],
) -> Result<DailySummary, AggregateError> {
    let first = bucket.first().ok_or(AggregateError::EmptyBucket)?;

    let (min, max) = bucket.iter().fold(
        (first.temperature, first.temperature),
        |(min, max), record| (min.min(record.temperature), max.max(record.temperature)),
    );

    let dominant = dominant_condition(bucket).ok_or(AggregateError::EmptyBucket)?;
    let representative = bucket
        .iter()
        .find(|record| record.condition == *dominant)
        .unwrap_or(first);
    let middle = &bucket[bucket.len() / 2];

    Ok(DailySummary {
        date,
        min_temperature: round_temp(min),
        max_temperature: round_temp(max),
        dominant_condition: dominant.clone(),
        icon: representative.icon.clone(),
        description: representative.description.clone(),
        representative_timestamp: middle.timestamp,
    })
}

pub fn build_daily_summaries(
    records: &[IntervalRecord],
    reference: DayReference,
) -> Result<Vec<DailySummary>, AggregateError> {
    group_by_day(records, reference)?
        .into_iter()
        .map(|(date, bucket)| summarize_day(date, &bucket))
        .collect()
}

pub fn build_daily_forecasts(
    records: &[IntervalRecord],
    reference: DayReference,
) -> Result<Vec<DailyForecast>, AggregateError> {
    group_by_day(records, reference)?
        .into_iter()
        .map(|(date, bucket)| {
            Ok(DailyForecast {
                summary: summarize_day(date, &bucket)?,
                records: bucket,
            })
        })
        .collect()
}

fn dominant_condition(bucket: &[IntervalRecord]) -> Option<&Condition> {
    let mut counts: Vec<(&Condition, usize)> = Vec::new();
    for record in bucket {
        match counts
            .iter_mut()
            .find(|(condition, _)| **condition == record.condition)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((&record.condition, 1)),
        }
    }

    let mut best: Option<(&Condition, usize)> = None;
    for (condition, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((condition, count));
        }
    }
    best.map(|(condition, _)| condition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    fn ts(value: &str) -> i64 {
        let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("valid fixture");
        Utc.from_utc_datetime(&naive).timestamp()
    }

    fn record(at: &str, temperature: f64, condition: &str) -> IntervalRecord {
        let mut record = IntervalRecord::new(ts(at), temperature, Condition::from_api(condition));
        record.icon = format!("{}-icon", condition.to_lowercase());
        record
    }

    fn day(value: &str) -> DayKey {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date fixture")
    }

    #[test]
    fn three_record_day_summarizes_as_expected() {
        let bucket = vec![
            record("2026-03-10T09:00", 10.0, "Clouds"),
            record("2026-03-10T12:00", 15.0, "Rain"),
            record("2026-03-10T15:00", 12.0, "Rain"),
        ];

        let summaries = build_daily_summaries(&bucket, DayReference::Utc).expect("summaries");
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.date, day("2026-03-10"));
        assert_eq!(summary.min_temperature, 10);
        assert_eq!(summary.max_temperature, 15);
        assert_eq!(summary.dominant_condition, Condition::Rain);
        assert_eq!(summary.icon, "rain-icon");
        assert_eq!(summary.representative_timestamp, ts("2026-03-10T12:00"));
    }

    #[test]
    fn tie_goes_to_first_seen_condition() {
        let bucket = vec![
            record("2026-03-10T00:00", 1.0, "Rain"),
            record("2026-03-10T03:00", 1.0, "Clouds"),
            record("2026-03-10T06:00", 1.0, "Rain"),
            record("2026-03-10T09:00", 1.0, "Clouds"),
        ];
        for _ in 0..10 {
            let summary = summarize_day(day("2026-03-10"), &bucket).expect("summary");
            assert_eq!(summary.dominant_condition, Condition::Rain);
        }

        let reversed: Vec<_> = [1, 0, 3, 2].iter().map(|&i| bucket[i].clone()).collect();
        let summary = summarize_day(day("2026-03-10"), &reversed).expect("summary");
        assert_eq!(summary.dominant_condition, Condition::Clouds);
    }

    #[test]
    fn strict_majority_beats_first_seen() {
        let bucket = vec![
            record("2026-03-10T00:00", 1.0, "Clear"),
            record("2026-03-10T03:00", 1.0, "Snow"),
            record("2026-03-10T06:00", 1.0, "Snow"),
        ];
        let summary = summarize_day(day("2026-03-10"), &bucket).expect("summary");
        assert_eq!(summary.dominant_condition, Condition::Snow);
        assert_eq!(summary.icon, "snow-icon");
    }

    #[test]
    fn representative_fields_come_from_first_dominant_record() {
        let mut first_rain = record("2026-03-10T03:00", 4.0, "Rain");
        first_rain.description = "light rain".to_string();
        first_rain.icon = "10d".to_string();
        let mut second_rain = record("2026-03-10T06:00", 5.0, "Rain");
        second_rain.description = "heavy intensity rain".to_string();
        second_rain.icon = "10n".to_string();
        let bucket = vec![record("2026-03-10T00:00", 3.0, "Clouds"), first_rain, second_rain];

        let summary = summarize_day(day("2026-03-10"), &bucket).expect("summary");
        assert_eq!(summary.description, "light rain");
        assert_eq!(summary.icon, "10d");
    }

    #[test]
    fn representative_timestamp_is_middle_index() {
        let bucket = vec![
            record("2026-03-10T00:00", 1.0, "Clear"),
            record("2026-03-10T03:00", 1.0, "Clear"),
            record("2026-03-10T06:00", 1.0, "Clear"),
            record("2026-03-10T09:00", 1.0, "Clear"),
        ];
        let summary = summarize_day(day("2026-03-10"), &bucket).expect("summary");
        assert_eq!(summary.representative_timestamp, ts("2026-03-10T06:00"));

        let single = summarize_day(day("2026-03-10"), &bucket[..1]).expect("summary");
        assert_eq!(single.representative_timestamp, ts("2026-03-10T00:00"));
    }

    #[test]
    fn temperatures_round_half_away_from_zero() {
        let bucket = vec![
            record("2026-01-05T00:00", -2.5, "Snow"),
            record("2026-01-05T03:00", 0.5, "Snow"),
        ];
        let summary = summarize_day(day("2026-01-05"), &bucket).expect("summary");
        assert_eq!(summary.min_temperature, -3);
        assert_eq!(summary.max_temperature, 1);
    }

    #[test]
    fn empty_bucket_is_rejected() {
        assert_eq!(
            summarize_day(day("2026-03-10"), &[]),
            Err(AggregateError::EmptyBucket)
        );
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert!(group_by_day(&[], DayReference::Utc).expect("grouping").is_empty());
        assert!(
            build_daily_summaries(&[], DayReference::Utc)
                .expect("summaries")
                .is_empty()
        );
    }

    #[test]
    fn negative_timestamp_is_invalid() {
        let mut bad = record("2026-03-10T00:00", 1.0, "Clear");
        bad.timestamp = -1;
        assert_eq!(
            group_by_day(&[bad], DayReference::Utc),
            Err(AggregateError::InvalidTimestamp(-1))
        );
    }

    #[test]
    fn unrepresentable_timestamp_is_invalid() {
        let mut bad = record("2026-03-10T00:00", 1.0, "Clear");
        bad.timestamp = i64::MAX;
        assert_eq!(
            build_daily_summaries(&[bad], DayReference::Utc),
            Err(AggregateError::InvalidTimestamp(i64::MAX))
        );
    }

    #[test]
    fn grouping_keeps_first_occurrence_order_without_sorting() {
        let records = vec![
            record("2026-03-11T00:00", 1.0, "Clear"),
            record("2026-03-10T21:00", 2.0, "Clear"),
            record("2026-03-11T03:00", 3.0, "Clear"),
        ];
        let groups = group_by_day(&records, DayReference::Utc).expect("grouping");
        let keys: Vec<_> = groups.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec![day("2026-03-11"), day("2026-03-10")]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[1].temperature, 3.0);
    }

    #[test]
    fn day_boundary_follows_reference_offset() {
        let records = vec![
            record("2026-03-10T21:00", 1.0, "Clear"),
            record("2026-03-11T00:00", 2.0, "Clear"),
        ];

        let utc = group_by_day(&records, DayReference::Utc).expect("utc grouping");
        assert_eq!(utc.len(), 2);

        let tokyo = group_by_day(&records, DayReference::from_offset_seconds(9 * 3600))
            .expect("offset grouping");
        assert_eq!(tokyo.len(), 1);
        assert_eq!(tokyo[0].0, day("2026-03-11"));
    }

    #[test]
    fn invalid_offset_falls_back_to_utc() {
        assert_eq!(
            DayReference::from_offset_seconds(90_000),
            DayReference::Utc
        );
    }

    #[test]
    fn daily_forecasts_carry_their_records() {
        let records = vec![
            record("2026-03-10T18:00", 1.0, "Clear"),
            record("2026-03-10T21:00", 2.0, "Clouds"),
            record("2026-03-11T00:00", 3.0, "Rain"),
        ];
        let daily = build_daily_forecasts(&records, DayReference::Utc).expect("daily");
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].records.len(), 2);
        assert_eq!(daily[1].summary.dominant_condition, Condition::Rain);
        assert_eq!(daily[1].records[0].temperature, 3.0);
    }
}
