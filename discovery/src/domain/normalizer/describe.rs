//! Synthesised descriptions for provider listings.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

use crate::domain::ports::{OpeningHours, PeriodBoundary, PlaceDetail, RawPlace};

const MINUTES_PER_DAY: u32 = 24 * 60;
const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

/// Open-status label used whenever the live check cannot be evaluated.
pub const HOURS_VARY: &str = "Hours vary";

/// The live open check could not be evaluated for this response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenCheckUnavailable;

/// Compose the one-line summary and category paragraph for a listing.
///
/// The summary reads `rating • review count • open status`; the paragraph is
/// chosen by the listing's type tags.
pub fn describe(place: &RawPlace, detail: Option<&PlaceDetail>, now: DateTime<Utc>) -> String {
    let rating = match place.rating {
        Some(rating) if rating > 0.0 => format!("{rating} stars"),
        _ => "No rating".to_owned(),
    };
    let reviews = match place.user_ratings_total {
        Some(count) if count > 0 => format!("{count} reviews"),
        _ => "No reviews".to_owned(),
    };
    let status = open_status(detail, now);

    format!(
        "{rating} • {reviews} • {status}\n\n{paragraph}",
        paragraph = category_paragraph(&place.types)
    )
}

/// Live open-status label for a detail record.
pub fn open_status(detail: Option<&PlaceDetail>, now: DateTime<Utc>) -> &'static str {
    let Some(detail) = detail else {
        return HOURS_VARY;
    };
    let Some(hours) = detail.opening_hours.as_ref() else {
        return HOURS_VARY;
    };
    match is_open_at(hours, detail.utc_offset_minutes, now) {
        Ok(true) => "Currently open",
        Ok(false) => "Currently closed",
        Err(OpenCheckUnavailable) => HOURS_VARY,
    }
}

fn category_paragraph(types: &[String]) -> &'static str {
    let joined = types.join(" ");
    if joined.contains("clothing_store") {
        "Specializing in clothing, shoes, and accessories."
    } else if joined.contains("furniture_store") {
        "Furniture, home decor, and household items."
    } else if joined.contains("book_store") {
        "Books, media, and educational materials."
    } else {
        "General merchandise, clothing, household items, and more."
    }
}

/// Evaluate opening hours at `now`.
///
/// The weekly periods are preferred when the place's UTC offset is known;
/// otherwise the provider's `open_now` flag is used. When neither is usable
/// the check is unavailable.
pub fn is_open_at(
    hours: &OpeningHours,
    utc_offset_minutes: Option<i32>,
    now: DateTime<Utc>,
) -> Result<bool, OpenCheckUnavailable> {
    match (hours.periods.is_empty(), utc_offset_minutes) {
        (false, Some(offset)) => open_by_periods(hours, offset, now),
        _ => hours.open_now.ok_or(OpenCheckUnavailable),
    }
}

fn open_by_periods(
    hours: &OpeningHours,
    utc_offset_minutes: i32,
    now: DateTime<Utc>,
) -> Result<bool, OpenCheckUnavailable> {
    let local = now + Duration::minutes(i64::from(utc_offset_minutes));
    let current =
        local.weekday().num_days_from_sunday() * MINUTES_PER_DAY + local.hour() * 60 + local.minute();

    for period in &hours.periods {
        let open = minute_of_week(&period.open)?;
        let Some(close) = period.close.as_ref() else {
            // A lone Sunday-midnight opening means open around the clock.
            return Ok(open == 0);
        };
        let mut close = minute_of_week(close)?;
        if close <= open {
            close += MINUTES_PER_WEEK;
        }
        let wrapped = current + MINUTES_PER_WEEK;
        if (open..close).contains(&current) || (open..close).contains(&wrapped) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn minute_of_week(boundary: &PeriodBoundary) -> Result<u32, OpenCheckUnavailable> {
    if boundary.day > 6 || boundary.time.len() != 4 {
        return Err(OpenCheckUnavailable);
    }
    let clock: u32 = boundary.time.parse().map_err(|_| OpenCheckUnavailable)?;
    let (hour, minute) = (clock / 100, clock % 100);
    if hour > 24 || minute > 59 {
        return Err(OpenCheckUnavailable);
    }
    Ok(u32::from(boundary.day) * MINUTES_PER_DAY + hour * 60 + minute)
}
