//! Academic term calendar and week-of-term resolution.

mod resolver;
mod table;

pub use resolver::{monday_of, next_term, resolve_term, week_anchor, TermInfo};
pub use table::{Region, Term, TermCalendar};
