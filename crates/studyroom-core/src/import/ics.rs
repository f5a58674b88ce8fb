//! ICS -> internal event normalization using the icalendar crate's parser.
//!
//! Only SUMMARY, DTSTART and DESCRIPTION are read; every other property is
//! ignored. Re-importing the same file yields a second, independent set of
//! events: ids are freshly generated, never derived from content.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use icalendar::parser::{read_calendar, unfold, Component, Property};
use icalendar::{CalendarDateTime, DatePerhapsTime};

use crate::error::ParseError;
use crate::planner::{Event, EventKind, EventSource};

/// Description given to imported events that carry none.
pub const IMPORT_PLACEHOLDER: &str = "Imported from calendar";

/// Convert calendar file contents into events.
///
/// All-or-nothing: any malformed component fails the whole import.
///
/// # Errors
/// Returns a [`ParseError`] if the input is not an iCalendar file, violates
/// the grammar, or contains a VEVENT without a usable SUMMARY or DTSTART.
pub fn normalize_import(contents: &str) -> Result<Vec<Event>, ParseError> {
    let unfolded = uppercase_delimiters(&unfold(contents));
    if !unfolded
        .lines()
        .any(|line| line.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR"))
    {
        return Err(ParseError::NotACalendar);
    }

    let calendar = read_calendar(&unfolded).map_err(|e| ParseError::Malformed(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name.as_ref().eq_ignore_ascii_case("VEVENT"))
        .enumerate()
        .map(|(index, vevent)| normalize_component(index, vevent))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = events.len(), "normalized calendar import");
    Ok(events)
}

fn normalize_component(index: usize, vevent: &Component<'_>) -> Result<Event, ParseError> {
    let title = find_prop(vevent, "SUMMARY")
        .map(|p| p.val.to_string())
        .ok_or(ParseError::MissingProperty {
            index,
            property: "SUMMARY",
        })?;

    let start_prop = find_prop(vevent, "DTSTART").ok_or(ParseError::MissingProperty {
        index,
        property: "DTSTART",
    })?;
    let start = DatePerhapsTime::try_from(start_prop).map_err(|_| ParseError::InvalidStart {
        index,
        value: start_prop.val.to_string(),
    })?;
    let date = to_local_instant(start).ok_or_else(|| ParseError::InvalidStart {
        index,
        value: start_prop.val.to_string(),
    })?;

    let description = find_prop(vevent, "DESCRIPTION")
        .map(|p| p.val.to_string())
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| IMPORT_PLACEHOLDER.to_string());

    Ok(Event {
        id: format!("import-{}", uuid::Uuid::new_v4()),
        title,
        date,
        kind: EventKind::Event,
        subject: None,
        description: Some(description),
        source: EventSource::Import,
    })
}

/// Component and property names are case-insensitive.
fn find_prop<'a, 'c>(component: &'a Component<'c>, name: &str) -> Option<&'a Property<'c>> {
    component
        .properties
        .iter()
        .find(|p| p.name.as_ref().eq_ignore_ascii_case(name))
}

/// Upper-case `BEGIN:`/`END:` lines so the parser sees canonical component
/// delimiters regardless of how the file spells them.
fn uppercase_delimiters(contents: &str) -> String {
    contents
        .lines()
        .map(|line| match line.split_once(':') {
            Some((tag, _)) if tag.eq_ignore_ascii_case("BEGIN") || tag.eq_ignore_ascii_case("END") => {
                line.to_ascii_uppercase()
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolve a DTSTART to an instant. Floating and TZID-qualified times are
/// read as local machine time; all-day dates become local midnight.
fn to_local_instant(start: DatePerhapsTime) -> Option<DateTime<Utc>> {
    match start {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => local_to_utc(naive),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, .. }) => {
            local_to_utc(date_time)
        }
        DatePerhapsTime::Date(date) => local_to_utc(date.and_hms_opt(0, 0, 0)?),
    }
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    // `earliest` picks the first instant when DST makes the time ambiguous.
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
