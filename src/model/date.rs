//! Lenient date parsing for the two date formats the dashboard deals with: `DD/MM/YYYY` in the
//! sheet and `YYYY-MM-DD` in date-range inputs.
//!
//! Each component is read as a leading integer (`"15x"` is `15`). A missing, non-numeric or zero
//! component, or a combination that is not a real calendar day (`31/02/2024`), yields `None`.
//! Such days are not rolled over into the next month.

use chrono::NaiveDate;

/// The format used to display dates, e.g. `31/01/2024`.
pub const PT_BR_FORMAT: &str = "%d/%m/%Y";

/// Parses `DD/MM/YYYY`.
pub fn parse_date_pt_br(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('/');
    let day = parts.next().and_then(leading_int)?;
    let month = parts.next().and_then(leading_int)?;
    let year = parts.next().and_then(leading_int)?;
    to_date(year, month, day)
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date_iso(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split('-');
    let year = parts.next().and_then(leading_int)?;
    let month = parts.next().and_then(leading_int)?;
    let day = parts.next().and_then(leading_int)?;
    to_date(year, month, day)
}

/// Formats `date` as `DD/MM/YYYY`.
pub fn format_date_pt_br(date: NaiveDate) -> String {
    date.format(PT_BR_FORMAT).to_string()
}

fn to_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    if year == 0 || month == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// Reads an optionally signed integer from the start of `s`, ignoring leading whitespace.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let digits = unsigned.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let sign_len = s.len() - unsigned.len();
    s[..sign_len + digits].parse().ok()
}
