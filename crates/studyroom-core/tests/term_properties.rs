//! Property tests for term/week resolution over the built-in calendar.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use studyroom_core::term::{resolve_term, Region, TermCalendar};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(offset)
}

fn region() -> impl Strategy<Value = Region> {
    prop::sample::select(Region::ALL.to_vec())
}

proptest! {
    #[test]
    fn week_stays_within_term(offset in 0i64..730, region in region()) {
        let date = day(offset);
        if let Some(info) = TermCalendar::builtin().resolve(date, region) {
            prop_assert!(info.term.contains(date));
            prop_assert!(info.week >= 1);
            prop_assert!(info.week <= info.weeks_total);
            prop_assert_eq!(info.region, region);
        }
    }

    #[test]
    fn week_never_decreases_within_a_term(offset in 0i64..729, region in region()) {
        let calendar = TermCalendar::builtin();
        let (a, b) = (day(offset), day(offset + 1));
        if let (Some(x), Some(y)) = (calendar.resolve(a, region), calendar.resolve(b, region)) {
            if x.term == y.term {
                prop_assert!(y.week >= x.week);
                prop_assert!(y.week - x.week <= 1);
            }
        }
    }

    #[test]
    fn dates_outside_every_term_resolve_to_none(offset in 0i64..730, region in region()) {
        let date = day(offset);
        let inside = TermCalendar::builtin().terms(region).iter().any(|t| t.contains(date));
        prop_assert_eq!(TermCalendar::builtin().resolve(date, region).is_some(), inside);
    }

    #[test]
    fn region_codes_are_case_insensitive(offset in 0i64..730, region in region()) {
        let date = day(offset);
        let lower = resolve_term(date, region.code());
        let upper = resolve_term(date, &region.code().to_uppercase());
        prop_assert_eq!(lower, upper);
    }
}

#[test]
fn every_builtin_region_has_eight_ordered_terms() {
    let calendar = TermCalendar::builtin();
    for region in Region::ALL {
        let terms = calendar.terms(region);
        assert_eq!(terms.len(), 8, "{region}");
        for pair in terms.windows(2) {
            assert!(pair[0].end < pair[1].start, "{region}: {} overlaps {}", pair[0].label, pair[1].label);
        }
        for term in terms {
            assert!(term.start <= term.end);
            assert!((1..=4).contains(&term.id));
        }
    }
}

#[test]
fn unknown_region_resolves_to_none() {
    let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    assert!(resolve_term(date, "tas").is_none());
    assert!(resolve_term(date, "").is_none());
}
