//! The grid of days, years and times a date picker panel shows.

use chrono::{NaiveDate, Timelike as _};

use crate::{Instant, Span, WeekRules, locale::week_of_year};

/// How many years a year picker shows per page.
pub const DEFAULT_YEAR_ITEM_NUMBER: i32 = 12;

/// One row of a month view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Week {
    /// Week number of the first day, according to the [`WeekRules`] the month was laid out with.
    pub number: u32,

    /// Always seven consecutive days, starting on the locale's first day of the week.
    pub days: Vec<Instant>,
}

/// The weeks covering the given month (1-12), including the leading and trailing days
/// of the neighbouring months needed to fill whole weeks.
pub fn month_weeks(year: i32, month: u32, rules: WeekRules) -> Vec<Week> {
    let Some(first) = Instant::from_ymd(year, month, 1) else {
        return vec![];
    };
    let week_start = rules.week_starts_on;
    let week_end = week_start.pred();

    let mut day = first.start_of_week(week_start);
    let mut weeks = vec![];
    let mut week = vec![];
    while day < first || day.month() == first.month() || day.weekday() != week_start {
        week.push(day);

        if day.weekday() == week_end {
            weeks.push(Week {
                number: week_of_year(week[0], rules),
                days: std::mem::take(&mut week),
            });
        }
        let Some(next) = day.checked_add(Span::days(1)) else {
            break;
        };
        day = next;
    }

    weeks
}

/// Number of days in the given month (1-12).
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    (29..=31)
        .rev()
        .find(|&day| NaiveDate::from_ymd_opt(year, month, day).is_some())
        .unwrap_or(28)
}

/// A page of years in a year picker, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct YearsPeriod {
    pub start: i32,
    pub end: i32,
}

/// The page of `item_count` years containing `instant`.
///
/// Pages are aligned so that they end on a multiple of `item_count`:
///
/// ```
/// # use edate::{Instant, calendar::{years_period, YearsPeriod}};
/// let day = Instant::from_ymd(2021, 6, 1).unwrap();
/// assert_eq!(years_period(day, 12), YearsPeriod { start: 2017, end: 2028 });
/// ```
pub fn years_period(instant: Instant, item_count: i32) -> YearsPeriod {
    let item_count = item_count.max(1);
    let end = (instant.year() + item_count - 1).div_euclid(item_count) * item_count;
    YearsPeriod {
        start: end - (item_count - 1),
        end,
    }
}

/// Which of `injected` times fall strictly between the time slot `current`
/// (the `multiplier`th slot of `interval_minutes` after `start_of_day`) and the next slot.
pub fn times_to_inject_after(
    start_of_day: Instant,
    current: Instant,
    multiplier: i64,
    interval_minutes: i64,
    injected: &[Instant],
) -> Vec<Instant> {
    let Some(next) = start_of_day.checked_add(Span::minutes((multiplier + 1) * interval_minutes))
    else {
        return vec![];
    };
    injected
        .iter()
        .copied()
        .filter(|time| {
            project_onto(start_of_day, *time)
                .is_some_and(|projected| projected.is_after(&current) && projected.is_before(&next))
        })
        .collect()
}

/// All selectable times of `day`: one every `interval_minutes`, with the `injected` times
/// (projected onto `day`) slotted in where they belong.
pub fn time_slots(day: Instant, interval_minutes: i64, injected: &[Instant]) -> Vec<Instant> {
    if interval_minutes <= 0 {
        log::warn!("Time interval must be positive, got {interval_minutes}");
        return vec![];
    }
    let base = day.start_of_day();
    let mut slots = vec![];
    for multiplier in 0..(24 * 60) / interval_minutes {
        let Some(current) = base.checked_add(Span::minutes(multiplier * interval_minutes)) else {
            break;
        };
        slots.push(current);
        slots.extend(
            times_to_inject_after(base, current, multiplier, interval_minutes, injected)
                .into_iter()
                .filter_map(|time| project_onto(base, time)),
        );
    }
    slots
}

fn project_onto(day: Instant, time: Instant) -> Option<Instant> {
    let time = time.time();
    day.with_time(time.hour(), time.minute(), 0)
}

// ----------------------------------------------------------------------------
