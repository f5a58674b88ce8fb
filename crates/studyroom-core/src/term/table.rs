//! Static term calendars per school region.
//!
//! Each region carries four terms per school year. Gaps between the end of
//! one term and the start of the next are holidays.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A jurisdiction with its own academic-term calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::Nsw, Region::Vic, Region::Qld, Region::Sa, Region::Wa];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Nsw => "nsw",
            Region::Vic => "vic",
            Region::Qld => "qld",
            Region::Sa => "sa",
            Region::Wa => "wa",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Nsw => "New South Wales",
            Region::Vic => "Victoria",
            Region::Qld => "Queensland",
            Region::Sa => "South Australia",
            Region::Wa => "Western Australia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownRegion(s.to_string()))
    }
}

/// A contiguous block of the school year, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Term number within its school year (1-4).
    pub id: u32,
    pub year: i32,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Term {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Ordered, non-overlapping term lists keyed by region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCalendar {
    regions: BTreeMap<Region, Vec<Term>>,
}

impl TermCalendar {
    /// Empty calendar; add regions with [`TermCalendar::with_region`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in calendar shipped with the crate.
    pub fn builtin() -> &'static TermCalendar {
        static BUILTIN: OnceLock<TermCalendar> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let regions = Region::ALL
                .into_iter()
                .map(|region| (region, builtin_terms(region)))
                .collect();
            TermCalendar { regions }
        })
    }

    /// Add (or replace) one region's term list after validating it.
    ///
    /// # Errors
    /// Returns an error if a term ends before it starts, or if terms are not
    /// in chronological order with no overlap.
    pub fn with_region(mut self, region: Region, terms: Vec<Term>) -> Result<Self, ValidationError> {
        validate(region, &terms)?;
        self.regions.insert(region, terms);
        Ok(self)
    }

    pub fn terms(&self, region: Region) -> &[Term] {
        self.regions.get(&region).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Term list for a region code. `None` for codes the calendar has no data for.
    pub fn lookup(&self, code: &str) -> Option<&[Term]> {
        let region = code.parse::<Region>().ok()?;
        self.regions.get(&region).map(Vec::as_slice)
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.regions.keys().copied()
    }
}

fn validate(region: Region, terms: &[Term]) -> Result<(), ValidationError> {
    if let Some(term) = terms.iter().find(|t| t.end < t.start) {
        return Err(ValidationError::InvertedTerm {
            region: region.to_string(),
            label: term.label.clone(),
        });
    }
    for pair in terms.windows(2) {
        if pair[1].start <= pair[0].end {
            return Err(ValidationError::OverlappingTerms {
                region: region.to_string(),
                earlier: format!("{} {}", pair[0].label, pair[0].year),
                later: format!("{} {}", pair[1].label, pair[1].year),
            });
        }
    }
    Ok(())
}

type MonthDay = (u32, u32);

/// One school year: four (start, end) pairs.
struct SchoolYear {
    year: i32,
    terms: [(MonthDay, MonthDay); 4],
}

const NSW: &[SchoolYear] = &[
    SchoolYear {
        year: 2025,
        terms: [((2, 4), (4, 11)), ((4, 28), (7, 4)), ((7, 21), (9, 26)), ((10, 13), (12, 19))],
    },
    SchoolYear {
        year: 2026,
        terms: [((2, 2), (4, 2)), ((4, 20), (7, 3)), ((7, 20), (9, 25)), ((10, 12), (12, 17))],
    },
];

const VIC: &[SchoolYear] = &[
    SchoolYear {
        year: 2025,
        terms: [((1, 28), (4, 4)), ((4, 22), (7, 4)), ((7, 21), (9, 19)), ((10, 6), (12, 19))],
    },
    SchoolYear {
        year: 2026,
        terms: [((1, 27), (4, 2)), ((4, 20), (6, 26)), ((7, 13), (9, 18)), ((10, 5), (12, 18))],
    },
];

const QLD: &[SchoolYear] = &[
    SchoolYear {
        year: 2025,
        terms: [((1, 28), (4, 4)), ((4, 22), (6, 27)), ((7, 14), (9, 19)), ((10, 7), (12, 12))],
    },
    SchoolYear {
        year: 2026,
        terms: [((1, 27), (4, 2)), ((4, 20), (6, 26)), ((7, 13), (9, 18)), ((10, 6), (12, 10))],
    },
];

const SA: &[SchoolYear] = &[
    SchoolYear {
        year: 2025,
        terms: [((1, 28), (4, 11)), ((4, 28), (7, 4)), ((7, 21), (9, 26)), ((10, 13), (12, 12))],
    },
    SchoolYear {
        year: 2026,
        terms: [((1, 27), (4, 10)), ((4, 27), (7, 3)), ((7, 20), (9, 25)), ((10, 12), (12, 11))],
    },
];

const WA: &[SchoolYear] = &[
    SchoolYear {
        year: 2025,
        terms: [((2, 3), (4, 11)), ((4, 28), (7, 4)), ((7, 21), (9, 26)), ((10, 13), (12, 18))],
    },
    SchoolYear {
        year: 2026,
        terms: [((2, 2), (4, 2)), ((4, 20), (7, 3)), ((7, 20), (9, 25)), ((10, 12), (12, 17))],
    },
];

fn builtin_terms(region: Region) -> Vec<Term> {
    let years = match region {
        Region::Nsw => NSW,
        Region::Vic => VIC,
        Region::Qld => QLD,
        Region::Sa => SA,
        Region::Wa => WA,
    };

    years
        .iter()
        .flat_map(|sy| {
            sy.terms
                .iter()
                .zip(1u32..)
                .filter_map(move |(&((sm, sd), (em, ed)), id)| {
                    Some(Term {
                        id,
                        year: sy.year,
                        label: format!("Term {id}"),
                        start: NaiveDate::from_ymd_opt(sy.year, sm, sd)?,
                        end: NaiveDate::from_ymd_opt(sy.year, em, ed)?,
                    })
                })
        })
        .collect()
}
