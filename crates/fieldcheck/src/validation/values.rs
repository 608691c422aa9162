//! Predicates for single field values.
//!
//! Every function here is pure and answers with `bool` (or, for EDTF, with a
//! message describing why the value failed). Invalid user data is never an
//! error at this level; callers decide whether a `false` is fatal.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Language codes accepted by the repository backend.
pub const LANGUAGE_CODES: &[&str] = &[
    "af", "am", "ar", "ast", "az", "be", "bg", "bn", "bo", "bs", "ca", "cs", "cy", "da", "de",
    "dz", "el", "en", "en-x-simple", "eo", "es", "et", "eu", "fa", "fi", "fil", "fo", "fr", "fy",
    "ga", "gd", "gl", "gsw-berne", "gu", "he", "hi", "hr", "ht", "hu", "hy", "id", "is", "it",
    "ja", "jv", "ka", "kk", "km", "kn", "ko", "ku", "ky", "lo", "lt", "lv", "mg", "mk", "ml",
    "mn", "mr", "ms", "my", "ne", "nl", "nb", "nn", "oc", "pa", "pl", "pt-pt", "pt-br", "ro",
    "ru", "sco", "se", "si", "sk", "sl", "sq", "sr", "sv", "sw", "ta", "ta-lk", "te", "th", "tr",
    "tyv", "ug", "uk", "ur", "vi", "xx-lolspeak", "zh-hans", "zh-hant",
];

static LATLONG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[-+]?([1-8]?\d(\.\d+)?|90(\.0+)?),\s*[-+]?(180(\.0+)?|((1[0-7]\d)|([1-9]?\d))(\.\d+)?)$",
    )
    .unwrap()
});

static CREATED_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d\d-\d\dT\d\d:\d\d:\d\d[+-]\d\d:\d\d$").unwrap());

static UTC_OFFSET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+-]\d\d:\d\d$").unwrap());

static EDTF_DATE_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d\d-\d\d)(T(\d\d:\d\d:\d\d))?$").unwrap());

static EDTF_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}(-\d\d(-\d\d)?)?$").unwrap());

static EDTF_SET_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.|,").unwrap());

/// Returns true if `langcode` is a recognized language code.
///
/// Matching is exact: `"ES"` is not `"es"`.
pub fn validate_language_code(langcode: &str) -> bool {
    LANGUAGE_CODES.contains(&langcode)
}

/// Returns true if `latlong` is a `lat,lng` pair in decimal degrees.
///
/// Latitude must lie within ±90 and longitude within ±180. A leading
/// backslash left over from spreadsheet escaping is ignored.
pub fn validate_latlong_value(latlong: &str) -> bool {
    LATLONG.is_match(latlong.trim_start_matches('\\'))
}

/// Returns true if `value` looks like `2020-11-15T23:49:22+00:00`.
pub fn validate_node_created_date_string(value: &str) -> bool {
    CREATED_DATE.is_match(value)
}

/// Returns true if a well-formed created date lies after `now`.
///
/// The UTC offset is ignored, as the backend interprets the local part.
/// Values that cannot be parsed are never reported as future dates.
pub fn created_date_is_in_future(value: &str, now: NaiveDateTime) -> bool {
    let local = UTC_OFFSET.replace(value, "");
    match NaiveDateTime::parse_from_str(&local, "%Y-%m-%dT%H:%M:%S") {
        Ok(created) => created > now,
        Err(_) => false,
    }
}

/// Returns true if `value` is `YYYY`, `YYYY-MM` or `YYYY-MM-DD` and names a
/// real Gregorian date.
///
/// The year may have any number of digits as long as it falls in 1..=9999;
/// missing month and day default to 1.
pub fn validate_calendar_date(value: &str) -> bool {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() > 3 || parts.iter().any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit())) {
        return false;
    }

    let number = |idx: usize| -> Option<u32> {
        match parts.get(idx) {
            Some(part) => part.parse().ok(),
            None => Some(1),
        }
    };

    let (Some(year), Some(month), Some(day)) = (number(0), number(1), number(2)) else {
        return false;
    };

    (1..=9999).contains(&year) && NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
}

/// Validate an EDTF value: a single date, an interval (`1964/2008`) or a set
/// (`[1667,1668,1670..1672]`).
///
/// Returns a description of the first problem found.
pub fn validate_edtf_value(edtf: &str) -> Result<(), String> {
    let edtf = edtf.trim();

    if edtf.contains('/') {
        for interval_date in edtf.splitn(2, '/') {
            validate_single_edtf_date(interval_date).map_err(|message| {
                format!("Interval date \"{interval_date}\" does not validate. {message}")
            })?;
        }
        return Ok(());
    }

    if edtf.matches('.').count() == 2 || edtf.contains(',') {
        if !(edtf.starts_with('[') && edtf.ends_with(']')) {
            return Err(format!(
                "Date set \"{edtf}\" does not contain a leading [ and/or trailing ]."
            ));
        }

        let members = edtf.trim_start_matches('[').trim_end_matches(']');
        let set_error =
            |date: &str, message: String| format!("Set date \"{date}\" does not validate. {message}");

        // Open-ended sets: ..1760-12-03 or 1760-12-03..
        if let Some(date) = members.strip_prefix("..") {
            return validate_single_edtf_date(date).map_err(|m| set_error(date, m));
        }
        if let Some(date) = members.strip_suffix("..") {
            return validate_single_edtf_date(date).map_err(|m| set_error(date, m));
        }

        for date in EDTF_SET_SEPARATOR.split(members) {
            validate_single_edtf_date(date).map_err(|m| set_error(date, m))?;
        }
        return Ok(());
    }

    validate_single_edtf_date(edtf)
        .map_err(|message| format!("EDTF date \"{edtf}\" does not validate. {message}"))
}

/// Validate one EDTF date, optionally qualified or carrying a local time.
///
/// Qualifiers are `?` (uncertain) on the year, `~` (approximate) on the month
/// and `%` (both) on the day.
pub fn validate_single_edtf_date(single_edtf: &str) -> Result<(), String> {
    if single_edtf.contains('T') {
        let valid = EDTF_DATE_TIME.captures(single_edtf).is_some_and(|caps| {
            let date_ok = validate_calendar_date(&caps[1]);
            let time_ok = caps
                .get(3)
                .is_none_or(|t| NaiveTime::parse_from_str(t.as_str(), "%H:%M:%S").is_ok());
            date_ok && time_ok
        });
        if valid {
            return Ok(());
        }
        return Err(format!(
            "\"{single_edtf}\" is an invalid EDTF date and local time value."
        ));
    }

    let mut date = single_edtf.to_string();
    if single_edtf.contains(&['?', '~', '%'][..]) {
        let parts: Vec<&str> = single_edtf.split('-').collect();
        if parts[0].contains(&['~', '%'][..]) {
            return Err(format!("Invalid date qualifier in \"{}\", must be a ?.", parts[0]));
        }
        if parts.len() == 2 && parts[1].contains(&['?', '%'][..]) {
            return Err(format!("Invalid date qualifier in \"{}\", must be a ~.", parts[1]));
        }
        if parts.len() == 3 && parts[2].contains(&['?', '~'][..]) {
            return Err(format!("Invalid date qualifier in \"{}\", must be a %.", parts[2]));
        }
        date.retain(|c| !matches!(c, '?' | '~' | '%'));
    }

    if !EDTF_DATE.is_match(&date) {
        return Err(format!("{date} is not a valid EDTF date value."));
    }
    if !validate_calendar_date(&date) {
        return Err(format!("\"{date}\" is not a valid calendar date."));
    }

    Ok(())
}
