//! Calendar-file import.
//!
//! Turns the VEVENTs of an iCalendar file into [`Event`](crate::planner::Event)s.
//! Pure transform: no I/O, no persistence.

mod ics;

pub use ics::{normalize_import, IMPORT_PLACEHOLDER};
