use chrono::{
    Datelike as _, Days, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike as _,
    Weekday,
};

use crate::calendar::last_day_of_month;

/// Formats accepted by [`Instant::parse_iso`], tried in order before the date-only form.
const ISO_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// An immutable point in (wall-clock) time.
///
/// All setters and arithmetic return a new [`Instant`]; nothing is ever mutated in place.
///
/// An [`Instant`] is only considered [valid](Self::is_valid) when it lies strictly after
/// `1000-01-01T00:00`. Everything before that is treated as parser garbage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instant(NaiveDateTime);

impl Instant {
    #[inline]
    pub fn new(date_time: NaiveDateTime) -> Self {
        Self(date_time)
    }

    /// The current local wall-clock time.
    pub fn now() -> Self {
        Self(chrono::Local::now().naive_local())
    }

    /// Midnight of the given day, or `None` if that day does not exist or is not [valid](Self::is_valid).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        Self::from_ymd_hms(year, month, day, 0, 0, 0)
    }

    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        let date_time = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
        Some(Self(date_time)).filter(Self::is_valid)
    }

    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DDTHH:MM:SS[.fff]`.
    ///
    /// ```
    /// # use edate::Instant;
    /// let instant = Instant::parse_iso("2015-12-20T10:30").unwrap();
    /// assert_eq!((instant.year(), instant.month(), instant.hour()), (2015, 12, 10));
    /// assert!(Instant::parse_iso("0999-01-01").is_none());
    /// ```
    pub fn parse_iso(text: &str) -> Option<Self> {
        let date_time = ISO_DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })?;
        Some(Self(date_time)).filter(Self::is_valid)
    }

    /// Is this a real calendar point strictly after the year 1000 sentinel?
    pub fn is_valid(&self) -> bool {
        NaiveDate::from_ymd_opt(1000, 1, 1)
            .is_some_and(|floor| self.0 > floor.and_time(NaiveTime::MIN))
    }

    #[inline]
    pub fn naive(&self) -> NaiveDateTime {
        self.0
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    #[inline]
    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    // ------------------------------------------------------------------------
    // Getters

    #[inline]
    pub fn second(&self) -> u32 {
        self.0.second()
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    #[inline]
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    #[inline]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Day of the month, starting at 1.
    #[inline]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    #[inline]
    pub fn iso_week(&self) -> u32 {
        self.0.iso_week().week()
    }

    /// Month of the year, starting at 1.
    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Month of the year, starting at 0.
    #[inline]
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Quarter of the year, 1-4.
    #[inline]
    pub fn quarter(&self) -> u32 {
        self.0.month0() / 3 + 1
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    // ------------------------------------------------------------------------
    // Setters

    /// Same day, with the time of day replaced.
    pub fn with_time(self, hour: u32, minute: u32, second: u32) -> Option<Self> {
        let time = NaiveTime::from_hms_opt(hour, minute, second)?;
        Some(Self(self.0.date().and_time(time)))
    }

    pub fn with_hour(self, hour: u32) -> Option<Self> {
        self.0.with_hour(hour).map(Self)
    }

    pub fn with_minute(self, minute: u32) -> Option<Self> {
        self.0.with_minute(minute).map(Self)
    }

    pub fn with_second(self, second: u32) -> Option<Self> {
        self.0.with_second(second).map(Self)
    }

    /// Move to another month of the same year.
    ///
    /// The day of the month is clamped, so Jan 31 becomes Feb 28 (or 29).
    pub fn with_month0(self, month0: u32) -> Option<Self> {
        self.with_year_month(self.year(), month0.checked_add(1)?)
    }

    /// Move to another quarter of the same year, keeping the month offset within the quarter.
    pub fn with_quarter(self, quarter: u32) -> Option<Self> {
        if !(1..=4).contains(&quarter) {
            return None;
        }
        self.with_month0((quarter - 1) * 3 + self.month0() % 3)
    }

    /// Move to another year. Feb 29 becomes Feb 28 in non-leap years.
    pub fn with_year(self, year: i32) -> Option<Self> {
        self.with_year_month(year, self.month())
    }

    fn with_year_month(self, year: i32, month: u32) -> Option<Self> {
        let day = self.day().min(last_day_of_month(year, month));
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self(date.and_time(self.time())))
    }

    // ------------------------------------------------------------------------
    // Arithmetic

    /// Add a calendar [`Span`].
    ///
    /// Years and months are applied first (clamping the day of month), then weeks and days,
    /// then hours, minutes and seconds. Returns `None` on overflow.
    pub fn checked_add(self, span: Span) -> Option<Self> {
        let months = i64::from(span.years) * 12 + i64::from(span.months);
        let mut date_time = self.0;
        if months > 0 {
            date_time = date_time.checked_add_months(Months::new(u32::try_from(months).ok()?))?;
        } else if months < 0 {
            date_time = date_time.checked_sub_months(Months::new(u32::try_from(-months).ok()?))?;
        }

        let days = span.weeks.checked_mul(7)?.checked_add(span.days)?;
        date_time = date_time.checked_add_signed(TimeDelta::try_days(days)?)?;

        let seconds = span
            .hours
            .checked_mul(3600)?
            .checked_add(span.minutes.checked_mul(60)?)?
            .checked_add(span.seconds)?;
        date_time = date_time.checked_add_signed(TimeDelta::try_seconds(seconds)?)?;

        Some(Self(date_time))
    }

    // ------------------------------------------------------------------------
    // Truncation

    pub fn start_of_day(self) -> Self {
        Self(self.0.date().and_time(NaiveTime::MIN))
    }

    /// The last millisecond of the day.
    pub fn end_of_day(self) -> Self {
        Self(self.0.date().and_time(end_of_day_time()))
    }

    /// Start of the week containing this instant, for weeks beginning on `week_start`.
    ///
    /// Weeks cut by the representable range start at [`NaiveDate::MIN`].
    pub fn start_of_week(self, week_start: Weekday) -> Self {
        let back = (self.weekday().num_days_from_sunday() + 7 - week_start.num_days_from_sunday()) % 7;
        let start = self.0.date().checked_sub_days(Days::new(u64::from(back)));
        Self(start.unwrap_or(NaiveDate::MIN).and_time(NaiveTime::MIN))
    }

    /// Weeks cut by the representable range end at [`NaiveDate::MAX`].
    pub fn end_of_week(self, week_start: Weekday) -> Self {
        let start = self.start_of_week(week_start).0.date();
        let end = start.checked_add_days(Days::new(6));
        Self(end.unwrap_or(NaiveDate::MAX).and_time(end_of_day_time()))
    }

    pub fn start_of_month(self) -> Self {
        Self(first_of_month(self.0.date()).and_time(NaiveTime::MIN))
    }

    pub fn end_of_month(self) -> Self {
        let first = first_of_month(self.0.date());
        let last = first + Days::new(u64::from(last_day_of_month(self.year(), self.month()) - 1));
        Self(last.and_time(end_of_day_time()))
    }

    pub fn start_of_quarter(self) -> Self {
        let first = first_of_month(self.0.date()) - Months::new(self.month0() % 3);
        Self(first.and_time(NaiveTime::MIN))
    }

    pub fn end_of_quarter(self) -> Self {
        let last_month = self.start_of_quarter().0.date() + Months::new(2);
        Self(last_month.and_time(NaiveTime::MIN)).end_of_month()
    }

    pub fn start_of_year(self) -> Self {
        let date = self.0.date();
        Self((date - Days::new(u64::from(date.ordinal0()))).and_time(NaiveTime::MIN))
    }

    pub fn end_of_year(self) -> Self {
        let first = self.start_of_year().0.date();
        let days_in_year = if first.leap_year() { 366 } else { 365 };
        Self((first + Days::new(days_in_year - 1)).and_time(end_of_day_time()))
    }

    // ------------------------------------------------------------------------
    // Comparison

    #[inline]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    #[inline]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }
}

impl From<NaiveDateTime> for Instant {
    #[inline]
    fn from(date_time: NaiveDateTime) -> Self {
        Self(date_time)
    }
}

impl From<NaiveDate> for Instant {
    #[inline]
    fn from(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl std::fmt::Display for Instant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default()
}

// ----------------------------------------------------------------------------

/// A calendar-aware amount of time, used with [`Instant::checked_add`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Span {
    pub years: i32,
    pub months: i32,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Span {
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        weeks: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    #[inline]
    pub const fn years(years: i32) -> Self {
        Self { years, ..Self::ZERO }
    }

    #[inline]
    pub const fn months(months: i32) -> Self {
        Self { months, ..Self::ZERO }
    }

    #[inline]
    pub const fn weeks(weeks: i64) -> Self {
        Self { weeks, ..Self::ZERO }
    }

    #[inline]
    pub const fn days(days: i64) -> Self {
        Self { days, ..Self::ZERO }
    }

    #[inline]
    pub const fn hours(hours: i64) -> Self {
        Self { hours, ..Self::ZERO }
    }

    #[inline]
    pub const fn minutes(minutes: i64) -> Self {
        Self { minutes, ..Self::ZERO }
    }
}

// ----------------------------------------------------------------------------
// Null-safe comparison: two absent values are equal, a present value never equals an absent one.

fn same_by<K: PartialEq>(a: Option<Instant>, b: Option<Instant>, key: impl Fn(Instant) -> K) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => key(a) == key(b),
        (None, None) => true,
        _ => false,
    }
}

pub fn is_equal(a: Option<Instant>, b: Option<Instant>) -> bool {
    same_by(a, b, |instant| instant)
}

pub fn is_same_day(a: Option<Instant>, b: Option<Instant>) -> bool {
    same_by(a, b, |instant| instant.date())
}

pub fn is_same_month(a: Option<Instant>, b: Option<Instant>) -> bool {
    same_by(a, b, |instant| (instant.year(), instant.month()))
}

pub fn is_same_quarter(a: Option<Instant>, b: Option<Instant>) -> bool {
    same_by(a, b, |instant| (instant.year(), instant.quarter()))
}

pub fn is_same_year(a: Option<Instant>, b: Option<Instant>) -> bool {
    same_by(a, b, |instant| instant.year())
}

/// Inclusive containment. A malformed interval (`end` before `start`) contains nothing.
pub fn within(instant: Instant, start: Instant, end: Instant) -> bool {
    if end < start {
        return false;
    }
    start <= instant && instant <= end
}

/// Is `day` between the start of `start`'s day and the end of `end`'s day?
pub fn is_day_in_range(day: Instant, start: Instant, end: Instant) -> bool {
    within(day, start.start_of_day(), end.end_of_day())
}

/// Number of calendar days from `b` to `a` (`a - b`), ignoring time of day.
pub fn days_between(a: Instant, b: Instant) -> i64 {
    a.date().signed_duration_since(b.date()).num_days()
}

/// Number of calendar months from `b` to `a` (`a - b`), ignoring day of month.
pub fn months_between(a: Instant, b: Instant) -> i32 {
    (a.year() - b.year()) * 12 + a.month() as i32 - b.month() as i32
}

/// Number of calendar years from `b` to `a` (`a - b`).
pub fn years_between(a: Instant, b: Instant) -> i32 {
    a.year() - b.year()
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> Instant {
        Instant::parse_iso(text).unwrap()
    }

    #[test]
    fn week_bounds_saturate_at_the_end_of_time() {
        let last = Instant::new(NaiveDateTime::MAX);
        assert!(last.is_valid());
        for week_start in [Weekday::Sun, Weekday::Mon, Weekday::Sat] {
            let end = last.end_of_week(week_start);
            assert_eq!(end.naive().date(), NaiveDate::MAX);
            assert!(!last.start_of_week(week_start).is_after(&end));
        }
        let first = Instant::new(NaiveDateTime::MIN);
        assert_eq!(first.start_of_week(Weekday::Mon).naive().date(), NaiveDate::MIN);
    }

    #[test]
    fn validity_floor() {
        assert!(Instant::from_ymd(1000, 1, 2).is_some());
        assert!(Instant::from_ymd(1000, 1, 1).is_none());
        assert!(Instant::from_ymd(999, 12, 31).is_none());
        assert!(Instant::from_ymd(2021, 2, 29).is_none());
        assert!(!Instant::new(NaiveDate::from_ymd_opt(1000, 1, 1).unwrap().and_time(NaiveTime::MIN)).is_valid());
    }

    #[test]
    fn parse_iso_forms() {
        assert_eq!(at("2015-12-20"), Instant::from_ymd(2015, 12, 20).unwrap());
        assert_eq!(at("2015-12-20T10:30").minute(), 30);
        assert_eq!(at("2015-12-20T10:30:15").second(), 15);
        assert_eq!(at("2015-12-20 10:30:15.250").second(), 15);
        assert!(Instant::parse_iso("2015-13-20").is_none());
        assert!(Instant::parse_iso("garbage").is_none());
    }

    #[test]
    fn getters() {
        let instant = at("2022-11-05T08:09:10");
        assert_eq!(instant.year(), 2022);
        assert_eq!(instant.month(), 11);
        assert_eq!(instant.month0(), 10);
        assert_eq!(instant.quarter(), 4);
        assert_eq!(instant.day(), 5);
        assert_eq!(instant.weekday(), Weekday::Sat);
        assert_eq!((instant.hour(), instant.minute(), instant.second()), (8, 9, 10));
        assert_eq!(at("2021-01-01").iso_week(), 53);
    }

    #[test]
    fn setters_clamp_day_of_month() {
        assert_eq!(at("2021-01-31").with_month0(1).unwrap(), at("2021-02-28"));
        assert_eq!(at("2020-02-29").with_year(2021).unwrap(), at("2021-02-28"));
        assert_eq!(at("2021-05-15").with_quarter(1).unwrap(), at("2021-02-15"));
        assert!(at("2021-05-15").with_quarter(5).is_none());
        assert_eq!(
            at("2021-05-15T01:02:03").with_time(13, 14, 15).unwrap(),
            at("2021-05-15T13:14:15")
        );
        assert!(at("2021-05-15").with_hour(24).is_none());
    }

    #[test]
    fn add_spans() {
        let jan31 = at("2021-01-31T12:00");
        assert_eq!(jan31.checked_add(Span::months(1)).unwrap(), at("2021-02-28T12:00"));
        assert_eq!(jan31.checked_add(Span::months(-2)).unwrap(), at("2020-11-30T12:00"));
        assert_eq!(jan31.checked_add(Span::days(1)).unwrap(), at("2021-02-01T12:00"));
        assert_eq!(jan31.checked_add(Span::weeks(-1)).unwrap(), at("2021-01-24T12:00"));
        assert_eq!(at("2020-02-29").checked_add(Span::years(1)).unwrap(), at("2021-02-28"));
        assert_eq!(jan31.checked_add(Span::minutes(90)).unwrap(), at("2021-01-31T13:30"));
        assert!(jan31.checked_add(Span::years(i32::MAX)).is_none());
    }

    #[test]
    fn truncation() {
        let instant = at("2021-08-18T13:45:00");
        assert_eq!(instant.start_of_day(), at("2021-08-18"));
        assert_eq!(instant.end_of_day(), at("2021-08-18T23:59:59.999"));
        assert_eq!(instant.start_of_month(), at("2021-08-01"));
        assert_eq!(instant.end_of_month(), at("2021-08-31T23:59:59.999"));
        assert_eq!(instant.start_of_quarter(), at("2021-07-01"));
        assert_eq!(instant.end_of_quarter(), at("2021-09-30T23:59:59.999"));
        assert_eq!(instant.start_of_year(), at("2021-01-01"));
        assert_eq!(instant.end_of_year(), at("2021-12-31T23:59:59.999"));
        assert_eq!(at("2020-02-10").end_of_month(), at("2020-02-29T23:59:59.999"));
    }

    #[test]
    fn week_truncation_depends_on_week_start() {
        // 2021-08-18 is a Wednesday.
        let instant = at("2021-08-18T13:45:00");
        assert_eq!(instant.start_of_week(Weekday::Sun), at("2021-08-15"));
        assert_eq!(instant.start_of_week(Weekday::Mon), at("2021-08-16"));
        assert_eq!(instant.start_of_week(Weekday::Wed), at("2021-08-18"));
        assert_eq!(instant.end_of_week(Weekday::Mon), at("2021-08-22T23:59:59.999"));
    }

    #[test]
    fn null_safe_comparison() {
        let a = at("2021-08-18T10:00");
        let b = at("2021-08-18T11:00");
        assert!(is_equal(None, None));
        assert!(!is_equal(Some(a), None));
        assert!(!is_equal(None, Some(a)));
        assert!(!is_equal(Some(a), Some(b)));
        assert!(is_same_day(Some(a), Some(b)));
        assert!(is_same_day(None, None));
        assert!(!is_same_day(None, Some(b)));
        assert!(is_same_month(Some(a), Some(at("2021-08-01"))));
        assert!(!is_same_month(Some(a), Some(at("2020-08-18"))));
        assert!(is_same_quarter(Some(a), Some(at("2021-07-01"))));
        assert!(!is_same_quarter(Some(a), Some(at("2021-10-01"))));
        assert!(is_same_year(Some(a), Some(at("2021-01-01"))));
    }

    #[test]
    fn within_fails_closed_on_malformed_interval() {
        let start = at("2021-08-01");
        let end = at("2021-08-31");
        assert!(within(at("2021-08-01"), start, end));
        assert!(within(at("2021-08-31"), start, end));
        assert!(!within(at("2021-09-01"), start, end));
        assert!(!within(at("2021-08-15"), end, start));
        assert!(is_day_in_range(at("2021-08-31T23:00"), start, end));
    }

    #[test]
    fn calendar_differences() {
        assert_eq!(days_between(at("2021-01-01T00:01"), at("2020-12-31T23:59")), 1);
        assert_eq!(days_between(at("2020-12-31"), at("2021-01-01")), -1);
        assert_eq!(months_between(at("2021-01-01"), at("2020-12-31")), 1);
        assert_eq!(months_between(at("2020-03-31"), at("2021-02-01")), -11);
        assert_eq!(years_between(at("2021-01-01"), at("2020-12-31")), 1);
    }
}
