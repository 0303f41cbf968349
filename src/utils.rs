use crate::regex::Regex;
use chrono::NaiveDate;
use std::sync::LazyLock;

static ISO_DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/](\d{1,2})[-/](\d{1,2})(?:[T ]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$")
        .unwrap()
});

static NUMERIC_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})([/.-])(\d{1,2})([/.-])(\d{4})$").unwrap());

static DAY_MONTH_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\.?,?\s+(\d{4})$").unwrap());

static MONTH_NAME_DAY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$").unwrap());

static PUBMED_DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})\s+([A-Za-z]+)\s+(\d{1,2})$").unwrap());

/// Parses a date written in any of the spellings found in the source datasets.
///
/// Recognized forms:
/// - `2020-01-01`, `2020/01/01`, optionally followed by a time (`2020-01-01T00:00:00`)
/// - `05/25/2020`, `25-05-2020`, `25.05.2020`: month first when that is a valid
///   date, day first otherwise (`01/03/2020` is 3 January, `25/05/2020` is 25 May)
/// - `1 January 2020`, `1st Jan 2020`
/// - `January 1, 2020`
/// - `2020 Jan 1` (PubMed)
///
/// Returns `None` for anything else, including impossible calendar dates.
///
/// # Arguments
///
/// * `date_str` - The date string to parse
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();

    if date_str.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE_REGEX.captures(date_str) {
        return ymd(&caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = NUMERIC_DATE_REGEX.captures(date_str) {
        // mixed separators such as "01/02-2020" are not a date
        if caps[2] != caps[4] {
            return None;
        }
        return ymd(&caps[5], &caps[1], &caps[3]).or_else(|| ymd(&caps[5], &caps[3], &caps[1]));
    }

    if let Some(caps) = DAY_MONTH_NAME_REGEX.captures(date_str) {
        let month = parse_month_name(&caps[2])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }

    if let Some(caps) = MONTH_NAME_DAY_REGEX.captures(date_str) {
        let month = parse_month_name(&caps[1])?;
        return NaiveDate::from_ymd_opt(caps[3].parse().ok()?, month, caps[2].parse().ok()?);
    }

    if let Some(caps) = PUBMED_DATE_REGEX.captures(date_str) {
        let month = parse_month_name(&caps[2])?;
        return NaiveDate::from_ymd_opt(caps[1].parse().ok()?, month, caps[3].parse().ok()?);
    }

    None
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Helper function to parse month names to month numbers
fn parse_month_name(month_str: &str) -> Option<u32> {
    match month_str.to_lowercase().as_str() {
        "jan" | "january" => Some(1),
        "feb" | "february" => Some(2),
        "mar" | "march" => Some(3),
        "apr" | "april" => Some(4),
        "may" => Some(5),
        "jun" | "june" => Some(6),
        "jul" | "july" => Some(7),
        "aug" | "august" => Some(8),
        "sep" | "sept" | "september" => Some(9),
        "oct" | "october" => Some(10),
        "nov" | "november" => Some(11),
        "dec" | "december" => Some(12),
        _ => None,
    }
}

/// get the newline delimiter (e.g. CRLF for Windows, LF for Linux). of multi-line text.
pub(crate) fn newline_delimiter_of(text: &str) -> &'static str {
    // find the first '\n', then check whether the character before it is '\r'
    if text
        .find('\n')
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| text.get(i..i + 1))
        .is_some_and(|x| x == "\r")
    {
        "\r\n"
    } else {
        "\n"
    }
}
