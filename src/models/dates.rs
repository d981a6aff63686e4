//! Date presentation helpers shared by the derived fields

use chrono::{Datelike, NaiveDate};

use crate::validation::DATE_FORMAT;

/// Medium format, e.g. `Dec 16, 1775`. Empty when absent.
pub fn medium(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `YYYY-MM-DD`, as expected by date inputs. Empty when absent.
pub fn iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Completed years between two dates, in either order
pub fn whole_years_between(a: NaiveDate, b: NaiveDate) -> u32 {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years.max(0) as u32
}
