//! Pure reshaping helpers used by the listing pages.
//!
//! Everything here is plain list processing over rows that were already loaded, so the
//! same "now" can be applied to every bucket computed for one request.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which side of "now" a show falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShowBucket {
    Upcoming,
    Past,
}

/// Classifies a start time against `now`.
///
/// A show starting exactly at `now` is neither upcoming nor past and yields `None`.
pub fn bucket_for(start_time: DateTime<Utc>, now: DateTime<Utc>) -> Option<ShowBucket> {
    if start_time > now {
        Some(ShowBucket::Upcoming)
    } else if start_time < now {
        Some(ShowBucket::Past)
    } else {
        None
    }
}

/// Counts upcoming shows per key, e.g. per venue id.
///
/// Keys without any upcoming show are absent from the map.
pub fn count_upcoming_by<K, I>(shows: I, now: DateTime<Utc>) -> HashMap<K, usize>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, DateTime<Utc>)>,
{
    let mut counts = HashMap::new();
    for (key, start_time) in shows {
        if bucket_for(start_time, now) == Some(ShowBucket::Upcoming) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedShows<T> {
    pub upcoming: Vec<T>,
    pub past: Vec<T>,
}

/// Splits items into upcoming and past, keeping their relative order.
pub fn partition_shows<T, I, F>(items: I, now: DateTime<Utc>, start_time: F) -> PartitionedShows<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> DateTime<Utc>,
{
    let mut upcoming = Vec::new();
    let mut past = Vec::new();

    for item in items {
        match bucket_for(start_time(&item), now) {
            Some(ShowBucket::Upcoming) => upcoming.push(item),
            Some(ShowBucket::Past) => past.push(item),
            None => {}
        }
    }

    PartitionedShows { upcoming, past }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

/// Venues sharing one (city, state) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<EntitySummary>,
}

/// Groups venues by (city, state).
///
/// Areas come out in order of the first venue seen for each pair, and venues keep scan
/// order inside their area.
pub fn group_by_area<I>(venues: I) -> Vec<Area>
where
    I: IntoIterator<Item = (String, String, EntitySummary)>,
{
    let mut areas: Vec<Area> = Vec::new();

    for (city, state, summary) in venues {
        match areas
            .iter_mut()
            .find(|area| area.city == city && area.state == state)
        {
            Some(area) => area.venues.push(summary),
            None => areas.push(Area {
                city,
                state,
                venues: vec![summary],
            }),
        }
    }

    areas
}

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a start time the way listing items carry it, e.g. `2019-05-21 21:30:00`.
pub fn format_start_time(start_time: DateTime<Utc>) -> String {
    start_time.format(START_TIME_FORMAT).to_string()
}
