//! Formatting and strict parsing with chrono strftime patterns.
//!
//! See [`chrono::format::strftime`] for the pattern syntax.
//! Month and weekday names (`%B %b %h %A %a`) come from the locale when it has [`CalendarNames`].

use std::{borrow::Cow, fmt::Write as _};

use chrono::{
    Days, NaiveDate, NaiveTime,
    format::{Fixed, Item, Parsed, StrftimeItems},
};

use crate::{CalendarNames, Instant, LocaleData};

/// Format `instant` with a strftime `pattern`.
///
/// Without a locale (or with a locale without names) chrono's English names are used.
/// A pattern chrono does not understand formats as the empty string.
pub fn format_date(instant: Instant, pattern: &str, locale: Option<&LocaleData>) -> String {
    let pattern = match locale.and_then(|locale| locale.names.as_ref()) {
        Some(names) => Cow::Owned(localize_pattern(pattern, instant, names)),
        None => Cow::Borrowed(pattern),
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(&pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        log::warn!("Invalid date format pattern {pattern:?}");
        return String::new();
    }

    let mut formatted = String::new();
    if write!(formatted, "{}", instant.naive().format_with_items(items.iter())).is_err() {
        log::warn!("Date format pattern {pattern:?} needs fields a local date-time does not have");
        return String::new();
    }
    formatted
}

/// Format with the first of `formats`, or the empty string if there is nothing to format.
pub fn safe_date_format<S: AsRef<str>>(
    instant: Option<Instant>,
    formats: &[S],
    locale: Option<&LocaleData>,
) -> String {
    match (instant, formats.first()) {
        (Some(instant), Some(pattern)) => format_date(instant, pattern.as_ref(), locale),
        _ => String::new(),
    }
}

/// Parse `text` with each of `formats` in turn.
///
/// A format only matches if formatting the result with that same format reproduces `text`
/// exactly, which rules out lenient partial parses such as `"1/2/2020"` for `"%m/%d/%Y"`.
/// Date fields the format lacks are taken from `reference`: a missing year is its year,
/// a format without any date part gives its day, and a month or year without a day
/// means its first day.
/// A missing time of day is midnight.
///
/// Returns the first match, or `None` if no format matches or the result is not
/// [valid](Instant::is_valid).
///
/// ```
/// # use edate::{Instant, format::parse_date};
/// let reference = Instant::from_ymd(2020, 6, 1).unwrap();
/// let formats = ["%m/%d/%Y", "%Y-%m-%d"];
/// assert_eq!(parse_date("2015-12-20", &formats, None, reference), Instant::from_ymd(2015, 12, 20));
/// assert_eq!(parse_date("13/20/2015", &formats, None, reference), None);
/// assert_eq!(parse_date("1/2/2020", &formats, None, reference), None);
/// ```
pub fn parse_date<S: AsRef<str>>(
    text: &str,
    formats: &[S],
    locale: Option<&LocaleData>,
    reference: Instant,
) -> Option<Instant> {
    formats
        .iter()
        .find_map(|format| parse_with(text, format.as_ref(), locale, reference))
}

fn parse_with(
    text: &str,
    format: &str,
    locale: Option<&LocaleData>,
    reference: Instant,
) -> Option<Instant> {
    let delocalized = match locale.and_then(|locale| locale.names.as_ref()) {
        Some(names) => Cow::Owned(delocalize(text, format, names)),
        None => Cow::Borrowed(text),
    };

    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, &delocalized, StrftimeItems::new(format)).ok()?;
    let date = match parsed.to_naive_date() {
        Ok(date) => date,
        Err(_) => {
            fill_missing_date(&mut parsed, reference)?;
            parsed.to_naive_date().ok()?
        }
    };
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);

    let instant = Instant::new(date.and_time(time));
    (instant.is_valid() && format_date(instant, format, locale) == text).then_some(instant)
}

/// Complete the date fields `parsed` lacks: the year comes from `reference`, the whole
/// date too if no date field was parsed, and a parsed month or year starts on its first day.
fn fill_missing_date(parsed: &mut Parsed, reference: Instant) -> Option<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some()
        || parsed.isoyear().is_some();
    let has_day_of_year = parsed.day().is_some()
        || parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();

    if !has_year {
        parsed.set_year(i64::from(reference.year())).ok()?;
    }
    match (parsed.month(), has_day_of_year) {
        (None, false) if has_year => {
            parsed.set_month(1).ok()?;
            parsed.set_day(1).ok()?;
        }
        (None, false) => {
            parsed.set_month(i64::from(reference.month())).ok()?;
            parsed.set_day(i64::from(reference.day())).ok()?;
        }
        (Some(_), false) => parsed.set_day(1).ok()?,
        (_, true) => {}
    }
    Some(())
}

/// Replace the name specifiers of `pattern` with the (escaped) localized names for `instant`.
fn localize_pattern(pattern: &str, instant: Instant, names: &CalendarNames) -> String {
    let month0 = instant.month0() as usize;
    let weekday = instant.weekday();

    let mut localized = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            localized.push(c);
            continue;
        }
        let Some(spec) = chars.next() else {
            localized.push('%');
            break;
        };
        let name = match spec {
            'A' => Some(names.weekday(weekday)),
            'a' => Some(names.weekday_short(weekday)),
            'B' => Some(names.months[month0].as_str()),
            'b' | 'h' => Some(names.months_short[month0].as_str()),
            _ => None,
        };
        match name {
            Some(name) => localized.push_str(&name.replace('%', "%%")),
            None => {
                // Also covers "%%" and padding modifiers, whose target is copied on the next turn.
                localized.push('%');
                localized.push(spec);
            }
        }
    }
    localized
}

/// Replace the localized month and weekday names in `text` with the English names chrono
/// parses. Only the kinds of names `format` contains are replaced, so that a short month
/// name equal to a short weekday name is read as whichever the format expects.
fn delocalize(text: &str, format: &str, names: &CalendarNames) -> String {
    let wanted: Vec<Fixed> = StrftimeItems::new(format)
        .filter_map(|item| match item {
            Item::Fixed(fixed) => Some(fixed),
            _ => None,
        })
        .collect();

    let mut replacements: Vec<(&str, String)> = Vec::with_capacity(2 * (12 + 7));
    for month0 in 0..12 {
        let Some(first) = NaiveDate::from_ymd_opt(2000, month0 as u32 + 1, 1) else {
            continue;
        };
        if wanted.contains(&Fixed::LongMonthName) {
            replacements.push((names.months[month0].as_str(), first.format("%B").to_string()));
        }
        if wanted.contains(&Fixed::ShortMonthName) {
            replacements
                .push((names.months_short[month0].as_str(), first.format("%b").to_string()));
        }
    }
    // 2024-01-01 is a Monday, matching the order of the weekday arrays.
    if let Some(monday) = NaiveDate::from_ymd_opt(2024, 1, 1) {
        for offset in 0..7 {
            let Some(day) = monday.checked_add_days(Days::new(offset as u64)) else {
                continue;
            };
            if wanted.contains(&Fixed::LongWeekdayName) {
                replacements.push((names.weekdays[offset].as_str(), day.format("%A").to_string()));
            }
            if wanted.contains(&Fixed::ShortWeekdayName) {
                replacements
                    .push((names.weekdays_short[offset].as_str(), day.format("%a").to_string()));
            }
        }
    }
    replacements.retain(|(local, _)| !local.is_empty());
    // Longest first, so that a short name never matches the start of a longer one.
    replacements.sort_by_key(|(local, _)| std::cmp::Reverse(local.len()));

    let mut delocalized = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while let Some(c) = rest.chars().next() {
        for (local, english) in &replacements {
            if let Some(after) = rest.strip_prefix(local) {
                delocalized.push_str(english);
                rest = after;
                continue 'outer;
            }
        }
        delocalized.push(c);
        rest = &rest[c.len_utf8()..];
    }
    delocalized
}

// ----------------------------------------------------------------------------
