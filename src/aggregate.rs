use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{event::Event, rating::Rating};

fn rounded_mean(values: &[i16]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: f64 = values.iter().copied().map(f64::from).sum();
    ((sum / values.len() as f64) * 10.0).round() / 10.0
}

/// Arithmetic mean of the rating values, rounded to one decimal. An empty
/// list averages to 0.
pub fn average_rating(ratings: &[Rating]) -> f64 {
    rounded_mean(&ratings.iter().map(|r| r.rating).collect::<Vec<_>>())
}

/// Average over the subset of `ratings` belonging to `tutor_id`.
pub fn tutor_average(tutor_id: Uuid, ratings: &[Rating]) -> f64 {
    rounded_mean(
        &ratings
            .iter()
            .filter(|r| r.tutor_id == tutor_id)
            .map(|r| r.rating)
            .collect::<Vec<_>>(),
    )
}

/// Group events into calendar-date buckets keyed by the UTC day of each
/// event's `date`, preserving input order within a bucket. Events whose
/// `date` does not parse are skipped.
pub fn events_by_date(events: &[Event]) -> BTreeMap<NaiveDate, Vec<Event>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();

    for event in events {
        match DateTime::parse_from_rfc3339(&event.date) {
            Ok(timestamp) => {
                let day = timestamp.with_timezone(&Utc).date_naive();
                buckets.entry(day).or_default().push(event.clone());
            }
            Err(e) => {
                tracing::warn!(
                    "Skipping event '{}' with unparsable date '{}': {}",
                    event.title,
                    event.date,
                    e
                );
            }
        }
    }

    buckets
}
