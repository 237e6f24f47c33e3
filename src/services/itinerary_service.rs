use chrono::{DateTime, Duration, NaiveDate};
use log::{debug, warn};
use std::collections::HashMap;

use crate::models::itinerary::{DayKey, ItineraryDay, TripDate};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
const LABEL_FORMAT: &str = "%a, %b %-d, %Y";
const EXTRA_DAY_PREFIX: &str = "Extra Day";

/// Parse a form date. Accepts `YYYY-MM-DD` and full RFC 3339 timestamps.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub fn format_label(date: NaiveDate) -> String {
    date.format(LABEL_FORMAT).to_string()
}

/// Contiguous calendar days from `start` to `end` inclusive. Missing or
/// unparseable bounds and reversed ranges give an empty list.
pub fn trip_dates(start: Option<&str>, end: Option<&str>) -> Vec<TripDate> {
    let (Some(start_raw), Some(end_raw)) = (start, end) else {
        return Vec::new();
    };
    if start_raw.trim().is_empty() || end_raw.trim().is_empty() {
        return Vec::new();
    }

    let (start, end) = match (parse_date(start_raw), parse_date(end_raw)) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            warn!(
                "Could not parse trip dates ({:?}, {:?}), itinerary left empty",
                start_raw, end_raw
            );
            return Vec::new();
        }
    };

    let days_count = (end - start).num_days() + 1;
    if days_count <= 0 {
        debug!("End date {} is before start date {}", end, start);
        return Vec::new();
    }

    (0..days_count)
        .map(|offset| {
            let date = start + Duration::days(offset);
            TripDate {
                iso_date: date.format(ISO_DATE_FORMAT).to_string(),
                label: format_label(date),
            }
        })
        .collect()
}

pub fn default_day_title(day: u32, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("Day {} - {}", day, label),
        None => format!("Day {}", day),
    }
}

/// Extra labels that still name a day of their own. A label equal to a trip
/// date or to an earlier extra label is dropped, so every day key is unique.
pub fn distinct_extra_dates(trip: &[TripDate], extra_dates: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(extra_dates.len());
    for label in extra_dates {
        let clashes = trip.iter().any(|date| date.iso_date == *label) || kept.contains(label);
        if clashes {
            warn!("Extra day {:?} duplicates another day, dropped", label);
        } else {
            kept.push(label.clone());
        }
    }
    kept
}

/// Rebuild the day list for `trip dates ++ extra dates`, carrying over content
/// from `previous` by date key and renumbering days 1..N in position order.
/// Extra labels that duplicate an earlier day key are skipped.
pub fn reconcile(
    start: Option<&str>,
    end: Option<&str>,
    extra_dates: &[String],
    previous: &[ItineraryDay],
) -> Vec<ItineraryDay> {
    let trip = trip_dates(start, end);
    let extras = distinct_extra_dates(&trip, extra_dates);

    // Later duplicates overwrite earlier ones
    let existing: HashMap<DayKey, &ItineraryDay> =
        previous.iter().map(|day| (day.key(), day)).collect();

    let keys = trip
        .iter()
        .map(|date| (DayKey::new(date.iso_date.clone()), Some(date.label.as_str())))
        .chain(extras.iter().map(|extra| (DayKey::new(extra.clone()), None)));

    let days: Vec<ItineraryDay> = keys
        .enumerate()
        .map(|(index, (key, label))| {
            let day = index as u32 + 1;
            match existing.get(&key) {
                Some(prev) => ItineraryDay {
                    day,
                    date: key.date,
                    title: prev.title.clone(),
                    overview: prev.overview.clone(),
                    stops: prev.stops.clone(),
                    completed: prev.completed,
                },
                None => ItineraryDay {
                    day,
                    date: key.date,
                    title: default_day_title(day, label),
                    overview: String::new(),
                    stops: Vec::new(),
                    completed: false,
                },
            }
        })
        .collect();

    debug!(
        "Reconciled itinerary: {} trip day(s), {} extra day(s)",
        trip.len(),
        extras.len()
    );

    days
}

/// Next unused "Extra Day K" label.
pub fn next_extra_label(trip: &[TripDate], extra_dates: &[String]) -> String {
    let mut k = extra_dates.len() + 1;
    loop {
        let candidate = format!("{} {}", EXTRA_DAY_PREFIX, k);
        let taken = extra_dates.iter().any(|label| *label == candidate)
            || trip.iter().any(|date| date.iso_date == candidate);
        if !taken {
            return candidate;
        }
        k += 1;
    }
}
