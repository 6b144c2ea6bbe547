// Cell normalization helpers.
//
// This module centralizes all the "dirty" spreadsheet handling (currency
// text in cost columns, serial dates, locale date strings, empty cells) so
// the rest of the code can assume clean, typed values.
use calamine::Data;
use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use num_format::{Locale, ToFormattedString};

/// Sentinels meaning "no target date"; they never trigger a status override.
const DATE_SENTINELS: [&str; 3] = ["", "NA", "Not started"];

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Turn a cost/progress cell into a number, never failing.
///
/// - Numeric cells come back unchanged (non-finite values become 0).
/// - Date cells yield their serial.
/// - Text keeps only ASCII digits and `.` and the longest decimal prefix
///   of what is left is parsed. Thousands separators, currency marks and
///   unit labels disappear, and so does any minus sign.
/// - Everything else is 0.
pub fn normalize_number(cell: &Data) -> f64 {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::DateTime(dt) => dt.as_f64(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => normalize_number_text(s),
        Data::Bool(_) | Data::Error(_) | Data::Empty => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Text half of [`normalize_number`].
///
/// `"₹1,234.50 Cr"` gives `1234.5`. A dot that belongs to an abbreviation
/// survives the strip, so `"Rs. 12,34.5 Cr"` becomes `".1234.5"` and parses
/// as `0.1234`. A dot is always read as a decimal point.
pub fn normalize_number_text(s: &str) -> f64 {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    // Stop at the second dot: "1.2.3" reads as 1.2.
    let prefix = match cleaned.match_indices('.').nth(1) {
        Some((idx, _)) => &cleaned[..idx],
        None => cleaned.as_str(),
    };
    prefix.parse::<f64>().unwrap_or(0.0)
}

/// Whether a cell counts as "nothing there" for text fields.
///
/// Zero and `false` are blank too, which is how the source sheets leave
/// unfilled date and remarks columns.
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.is_empty(),
        Data::Float(f) => *f == 0.0 || f.is_nan(),
        Data::Int(i) => *i == 0,
        Data::Bool(b) => !*b,
        Data::DateTime(dt) => dt.as_f64() == 0.0,
    }
}

/// Render a cell as display text.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        // `Display` for f64 already drops a trailing ".0".
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match serial_to_datetime(dt.as_f64()) {
            Some(when) => when.format("%d-%m-%Y").to_string(),
            None => dt.as_f64().to_string(),
        },
    }
}

/// Cell text with a fallback for blank cells.
pub fn text_or(cell: Option<&Data>, default: &str) -> String {
    match cell {
        Some(c) if !is_blank(c) => cell_text(c),
        _ => default.to_string(),
    }
}

/// Convert a spreadsheet day serial (1900 date system, epoch 1899-12-30)
/// into a timestamp with millisecond precision.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = (serial * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)
}

/// Parse a target-completion text into a point in time.
///
/// Returns `None` for the sentinels and for anything that does not land on
/// a real calendar date.
pub fn parse_target_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if DATE_SENTINELS.contains(&text) {
        return None;
    }

    if let Some(year) = bare_year(text) {
        return NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(NaiveTime::MIN));
    }
    if is_decimal(text) {
        return serial_to_datetime(text.parse::<f64>().ok()?);
    }

    let parts: Vec<&str> = text.split(['-', '/', '.']).collect();
    if parts.len() == 3 {
        return day_month_year(&parts).map(|d| d.and_time(NaiveTime::MIN));
    }

    parse_long_form(text).map(|d| d.and_time(NaiveTime::MIN))
}

fn is_decimal(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text.chars().all(|c| c.is_ascii_digit() || c == '.')
        && text.matches('.').count() <= 1
}

// A four-digit year is never a plausible serial for a target date.
fn bare_year(text: &str) -> Option<i32> {
    if text.len() != 4 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = text.parse::<i32>().ok()?;
    (1900..=2200).contains(&year).then_some(year)
}

fn day_month_year(parts: &[&str]) -> Option<NaiveDate> {
    let day = parts[0].trim().parse::<u32>().ok()?;
    let month_text = parts[1].trim();
    let month = match month_text.parse::<u32>() {
        Ok(m) => m,
        Err(_) => month_text.parse::<Month>().ok()?.number_from_month(),
    };
    let mut year = parts[2].trim().parse::<i32>().ok()?;
    if (0..100).contains(&year) {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_long_form(text: &str) -> Option<NaiveDate> {
    // chrono's %B also accepts abbreviations when parsing.
    const FORMATS: [&str; 3] = ["%d %B %Y", "%B %d %Y", "%B %d, %Y"];
    let squeezed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    // Month-year first: "%B %d %Y" would read "Dec 2030" as the 20th of Dec 0030.
    NaiveDate::parse_from_str(&format!("1 {}", squeezed), "%d %B %Y")
        .ok()
        .or_else(|| {
            FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&squeezed, fmt).ok())
        })
        .filter(|d| d.year() >= 1000)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `1,234,567.89` style grouping.
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
