//! Date -> term/week resolution.
//!
//! Weeks are counted from the first Monday on or after the term start. A
//! term that opens mid-week (often a staff-only week) folds those first days
//! into week 1.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::table::{Region, Term, TermCalendar};

/// Where a date sits inside a term. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfo {
    pub term: Term,
    /// 1-based week of term.
    pub week: u32,
    pub weeks_total: u32,
    pub region: Region,
}

impl TermInfo {
    pub fn weeks_remaining(&self) -> u32 {
        self.weeks_total.saturating_sub(self.week)
    }
}

impl fmt::Display for TermInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Week {} of {}",
            self.term.label, self.week, self.weeks_total
        )
    }
}

/// Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Reference Monday for week counting: the start itself when it is a
/// Monday, otherwise the Monday of the following week.
pub fn week_anchor(term: &Term) -> NaiveDate {
    if term.start.weekday() == Weekday::Mon {
        term.start
    } else {
        monday_of(term.start) + Duration::weeks(1)
    }
}

fn week_number(anchor: NaiveDate, date: NaiveDate) -> u32 {
    let days = (monday_of(date) - anchor).num_days();
    if days < 0 {
        1
    } else {
        u32::try_from(days / 7).map_or(u32::MAX, |w| w.saturating_add(1))
    }
}

impl TermCalendar {
    /// Term and week containing `date`, or `None` during holidays.
    pub fn resolve(&self, date: NaiveDate, region: Region) -> Option<TermInfo> {
        let term = self.terms(region).iter().find(|t| t.contains(date))?;
        let anchor = week_anchor(term);
        Some(TermInfo {
            term: term.clone(),
            week: week_number(anchor, date),
            weeks_total: week_number(anchor, term.end),
            region,
        })
    }

    /// Earliest term starting strictly after `date`.
    pub fn next_term(&self, date: NaiveDate, region: Region) -> Option<&Term> {
        self.terms(region).iter().find(|t| t.start > date)
    }
}

/// Resolve `date` against the built-in calendar.
///
/// Returns `None` for holidays and for region codes without data.
pub fn resolve_term(date: NaiveDate, region: &str) -> Option<TermInfo> {
    let region = region.parse::<Region>().ok()?;
    TermCalendar::builtin().resolve(date, region)
}

/// Next term in the built-in calendar, or `None` past the end of the table.
pub fn next_term(date: NaiveDate, region: &str) -> Option<Term> {
    let region = region.parse::<Region>().ok()?;
    TermCalendar::builtin().next_term(date, region).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn monday_of_week() {
        assert_eq!(monday_of(d(2025, 2, 4)), d(2025, 2, 3));
        assert_eq!(monday_of(d(2025, 2, 3)), d(2025, 2, 3));
        assert_eq!(monday_of(d(2025, 2, 9)), d(2025, 2, 3));
    }

    #[test]
    fn tuesday_start_anchors_on_following_monday() {
        // NSW Term 1 2025 opens on Tuesday 4 Feb.
        let info = resolve_term(d(2025, 2, 4), "nsw").unwrap();
        assert_eq!(week_anchor(&info.term), d(2025, 2, 10));
        assert_eq!(info.week, 1);
        assert_eq!(resolve_term(d(2025, 2, 7), "nsw").unwrap().week, 1);
        assert_eq!(resolve_term(d(2025, 2, 10), "nsw").unwrap().week, 1);
        assert_eq!(resolve_term(d(2025, 2, 17), "nsw").unwrap().week, 2);
        assert_eq!(info.weeks_total, 9);
        assert_eq!(resolve_term(d(2025, 4, 11), "nsw").unwrap().week, 9);
    }

    #[test]
    fn monday_start_is_week_one() {
        // NSW Term 2 2025 opens on Monday 28 Apr, ends Friday 4 Jul.
        let info = resolve_term(d(2025, 4, 28), "nsw").unwrap();
        assert_eq!(info.term.id, 2);
        assert_eq!(info.week, 1);
        assert_eq!(info.weeks_total, 10);
        assert_eq!(info.weeks_remaining(), 9);
        assert_eq!(info.to_string(), "Term 2, Week 1 of 10");
    }

    #[test]
    fn holiday_gap_is_none() {
        assert!(resolve_term(d(2025, 4, 15), "nsw").is_none());
        assert!(resolve_term(d(2025, 12, 25), "vic").is_none());
    }

    #[test]
    fn term_bounds_are_inclusive() {
        assert!(resolve_term(d(2025, 4, 11), "nsw").is_some());
        assert!(resolve_term(d(2025, 4, 12), "nsw").is_none());
        assert!(resolve_term(d(2025, 2, 3), "nsw").is_none());
    }

    #[test]
    fn unknown_region_is_none() {
        assert!(resolve_term(d(2025, 3, 3), "narnia").is_none());
        assert!(next_term(d(2025, 3, 3), "narnia").is_none());
    }

    #[test]
    fn next_term_is_strictly_after() {
        let next = next_term(d(2025, 4, 15), "nsw").unwrap();
        assert_eq!((next.year, next.id), (2025, 2));

        // On a start date, the next term is the one after it.
        let next = next_term(d(2025, 4, 28), "nsw").unwrap();
        assert_eq!((next.year, next.id), (2025, 3));

        let next = next_term(d(2025, 12, 20), "qld").unwrap();
        assert_eq!((next.year, next.id), (2026, 1));

        assert!(next_term(d(2026, 12, 31), "wa").is_none());
    }

    #[test]
    fn term_ending_before_anchor_has_one_week() {
        let short = Term {
            id: 1,
            year: 2030,
            label: "Term 1".into(),
            start: d(2030, 1, 2), // Wednesday
            end: d(2030, 1, 4),
        };
        let cal = TermCalendar::new()
            .with_region(Region::Sa, vec![short])
            .unwrap();
        let info = cal.resolve(d(2030, 1, 3), Region::Sa).unwrap();
        assert_eq!((info.week, info.weeks_total), (1, 1));
    }
}
