use chrono::{NaiveDate, Utc};
use tutor_hub::aggregate::{average_rating, events_by_date, tutor_average};
use tutor_hub::models::{event::Event, rating::Rating};
use uuid::Uuid;

fn rating(tutor_id: Uuid, value: i16) -> Rating {
    Rating {
        id: Uuid::new_v4(),
        tutor_id,
        user_id: Uuid::new_v4(),
        rating: value,
        comment: None,
        subject: None,
        created_at: Utc::now(),
    }
}

fn event(title: &str, date: &str) -> Event {
    Event {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        title: title.into(),
        date: date.into(),
        event_type: "exam".into(),
        description: String::new(),
        created_at: Utc::now(),
    }
}

fn day(year: i32, month: u32, day_of_month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day_of_month).unwrap()
}

#[test]
fn test_average_of_empty_list_is_zero() {
    assert_eq!(average_rating(&[]), 0.0);
}

#[test]
fn test_average_of_four_and_two_is_three() {
    let tutor = Uuid::new_v4();
    let ratings = vec![rating(tutor, 4), rating(tutor, 2)];

    assert_eq!(average_rating(&ratings), 3.0);
}

#[test]
fn test_average_rounds_to_one_decimal() {
    let tutor = Uuid::new_v4();

    // 13 / 3 = 4.333...
    let ratings = vec![rating(tutor, 5), rating(tutor, 4), rating(tutor, 4)];
    assert_eq!(average_rating(&ratings), 4.3);

    // 14 / 3 = 4.666...
    let ratings = vec![rating(tutor, 5), rating(tutor, 5), rating(tutor, 4)];
    assert_eq!(average_rating(&ratings), 4.7);
}

#[test]
fn test_average_is_order_invariant() {
    let tutor = Uuid::new_v4();
    let mut ratings = vec![
        rating(tutor, 1),
        rating(tutor, 5),
        rating(tutor, 3),
        rating(tutor, 4),
    ];

    let forward = average_rating(&ratings);
    ratings.reverse();
    assert_eq!(average_rating(&ratings), forward);
}

#[test]
fn test_tutor_average_filters_by_tutor() {
    let t1 = Uuid::new_v4();
    let t2 = Uuid::new_v4();
    let ratings = vec![rating(t1, 4), rating(t2, 5), rating(t1, 2)];

    assert_eq!(tutor_average(t1, &ratings), 3.0);
    assert_eq!(tutor_average(t2, &ratings), 5.0);
    assert_eq!(tutor_average(Uuid::new_v4(), &ratings), 0.0);
}

#[test]
fn test_events_bucket_by_calendar_date() {
    let events = vec![
        event("Midterm", "2024-03-01T10:00:00Z"),
        event("Study group", "2024-03-01T18:00:00Z"),
        event("Essay due", "2024-03-02T00:00:00Z"),
    ];

    let buckets = events_by_date(&events);
    assert_eq!(buckets.len(), 2);

    let first = &buckets[&day(2024, 3, 1)];
    assert_eq!(first.len(), 2);
    // Input order is preserved within a bucket
    assert_eq!(first[0].title, "Midterm");
    assert_eq!(first[1].title, "Study group");

    let second = &buckets[&day(2024, 3, 2)];
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].title, "Essay due");
}

#[test]
fn test_every_event_lands_in_exactly_one_bucket() {
    let events = vec![
        event("a", "2024-05-10T08:00:00Z"),
        event("b", "2024-05-11T08:00:00Z"),
        event("c", "2024-05-10T22:30:00Z"),
        event("d", "2024-06-01T00:00:00Z"),
    ];

    let buckets = events_by_date(&events);
    let total: usize = buckets.values().map(|bucket| bucket.len()).sum();
    assert_eq!(total, events.len());

    for original in &events {
        let hits = buckets
            .values()
            .flatten()
            .filter(|bucketed| bucketed.id == original.id)
            .count();
        assert_eq!(hits, 1);
    }
}

#[test]
fn test_unparsable_dates_are_skipped() {
    let events = vec![
        event("good", "2024-03-01T10:00:00Z"),
        event("bad", "not-a-date"),
        event("empty", ""),
    ];

    let buckets = events_by_date(&events);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[&day(2024, 3, 1)].len(), 1);
    assert_eq!(buckets[&day(2024, 3, 1)][0].title, "good");
}

#[test]
fn test_offset_timestamps_bucket_by_utc_day() {
    // 23:30 at +02:00 is 21:30 UTC, still the same day
    let events = vec![event("late", "2024-03-01T23:30:00+02:00")];

    let buckets = events_by_date(&events);
    assert_eq!(buckets[&day(2024, 3, 1)].len(), 1);
}
