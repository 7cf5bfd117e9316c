//! Locale data and the registry that resolves locale identifiers to it.
//!
//! Locale tables are supplied by the host application; this crate only knows how to use them.
//! [`LocaleResolver::global`] is a process-wide convenience instance, but any number of
//! independent resolvers can be constructed and injected where needed.

use std::sync::{Arc, LazyLock};

use ahash::HashMap;
use chrono::Weekday;
use parking_lot::RwLock;

use crate::{Instant, format, instant::days_between};

/// How weeks are laid out and numbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WeekRules {
    /// The first day of a week.
    pub week_starts_on: Weekday,

    /// The day of January (1-7) that is always part of week 1.
    ///
    /// `1` means the week containing January 1st is week 1 (US style),
    /// `4` gives ISO-8601 week numbers when combined with a Monday week start.
    pub first_week_contains_date: u8,
}

impl Default for WeekRules {
    /// Weeks start on Sunday and week 1 contains January 1st.
    fn default() -> Self {
        Self {
            week_starts_on: Weekday::Sun,
            first_week_contains_date: 1,
        }
    }
}

impl WeekRules {
    /// ISO-8601: weeks start on Monday, week 1 contains January 4th.
    pub const ISO: Self = Self {
        week_starts_on: Weekday::Mon,
        first_week_contains_date: 4,
    };

    pub fn new(week_starts_on: Weekday, first_week_contains_date: u8) -> Self {
        Self {
            week_starts_on,
            first_week_contains_date: first_week_contains_date.clamp(1, 7),
        }
    }
}

/// The week number of `day`, according to `rules`.
///
/// The week-numbering year may differ from the calendar year around New Year:
///
/// ```
/// # use edate::{Instant, WeekRules, locale::week_of_year};
/// let day = Instant::from_ymd(2021, 1, 1).unwrap();
/// assert_eq!(week_of_year(day, WeekRules::ISO), 53);
/// assert_eq!(week_of_year(day, WeekRules::default()), 1);
/// ```
pub fn week_of_year(day: Instant, rules: WeekRules) -> u32 {
    let week_start = day.start_of_week(rules.week_starts_on);
    let year_start = first_week_start(week_year(day, rules), rules).unwrap_or(week_start);
    u32::try_from(days_between(week_start, year_start).div_euclid(7) + 1).unwrap_or(1)
}

/// The year whose week numbering `day` belongs to.
pub fn week_year(day: Instant, rules: WeekRules) -> i32 {
    let year = day.year();
    if first_week_start(year + 1, rules).is_some_and(|start| day >= start) {
        year + 1
    } else if first_week_start(year, rules).is_some_and(|start| day >= start) {
        year
    } else {
        year - 1
    }
}

fn first_week_start(year: i32, rules: WeekRules) -> Option<Instant> {
    Instant::from_ymd(year, 1, u32::from(rules.first_week_contains_date))
        .map(|day| day.start_of_week(rules.week_starts_on))
}

// ----------------------------------------------------------------------------

/// Localized names of months and weekdays.
///
/// Weekday arrays start on Monday.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CalendarNames {
    pub months: [String; 12],
    pub months_short: [String; 12],
    pub weekdays: [String; 7],
    pub weekdays_short: [String; 7],
    pub weekdays_min: [String; 7],
    pub quarters_short: [String; 4],
}

impl CalendarNames {
    pub fn new(
        months: [&str; 12],
        months_short: [&str; 12],
        weekdays: [&str; 7],
        weekdays_short: [&str; 7],
        weekdays_min: [&str; 7],
    ) -> Self {
        Self {
            months: months.map(str::to_owned),
            months_short: months_short.map(str::to_owned),
            weekdays: weekdays.map(str::to_owned),
            weekdays_short: weekdays_short.map(str::to_owned),
            weekdays_min: weekdays_min.map(str::to_owned),
            quarters_short: ["Q1", "Q2", "Q3", "Q4"].map(str::to_owned),
        }
    }

    #[inline]
    pub fn quarters_short(mut self, quarters_short: [&str; 4]) -> Self {
        self.quarters_short = quarters_short.map(str::to_owned);
        self
    }

    #[inline]
    pub fn weekday(&self, weekday: Weekday) -> &str {
        &self.weekdays[weekday.num_days_from_monday() as usize]
    }

    #[inline]
    pub fn weekday_short(&self, weekday: Weekday) -> &str {
        &self.weekdays_short[weekday.num_days_from_monday() as usize]
    }

    #[inline]
    pub fn weekday_min(&self, weekday: Weekday) -> &str {
        &self.weekdays_min[weekday.num_days_from_monday() as usize]
    }
}

/// Everything locale-specific the picker needs.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct LocaleData {
    /// E.g. `"fi"` or `"en-GB"`. Informational only; registration decides the lookup key.
    pub code: String,

    pub week_rules: WeekRules,

    /// `None` means chrono's English names.
    pub names: Option<CalendarNames>,
}

impl LocaleData {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            week_rules: WeekRules::default(),
            names: None,
        }
    }

    #[inline]
    pub fn week_rules(mut self, week_rules: WeekRules) -> Self {
        self.week_rules = week_rules;
        self
    }

    #[inline]
    pub fn names(mut self, names: CalendarNames) -> Self {
        self.names = Some(names);
        self
    }
}

/// Either a registered locale identifier, or locale data used as-is without registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LocaleSpec {
    Id(String),
    Data(Arc<LocaleData>),
}

impl From<&str> for LocaleSpec {
    fn from(id: &str) -> Self {
        Self::Id(id.to_owned())
    }
}

impl From<String> for LocaleSpec {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<LocaleData> for LocaleSpec {
    fn from(data: LocaleData) -> Self {
        Self::Data(Arc::new(data))
    }
}

impl From<Arc<LocaleData>> for LocaleSpec {
    fn from(data: Arc<LocaleData>) -> Self {
        Self::Data(data)
    }
}

// ----------------------------------------------------------------------------

static GLOBAL: LazyLock<Arc<LocaleResolver>> = LazyLock::new(Default::default);

/// Maps locale identifiers to [`LocaleData`], and remembers a default locale.
///
/// Registration is an upsert: the last registration of an identifier wins.
/// The same goes for the default locale. There is no teardown.
///
/// All locale-aware calendar operations go through a resolver so that a missing or unknown
/// locale falls back to the default locale, and then to the locale-independent behavior
/// (English names, weeks starting on Sunday).
#[derive(Debug, Default)]
pub struct LocaleResolver {
    registry: RwLock<HashMap<String, Arc<LocaleData>>>,
    default_locale: RwLock<Option<String>>,
}

impl LocaleResolver {
    /// The process-wide resolver.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn register(&self, id: impl Into<String>, data: LocaleData) {
        let id = id.into();
        log::debug!("Registering locale {id:?}");
        self.registry.write().insert(id, Arc::new(data));
    }

    pub fn set_default_locale(&self, id: impl Into<String>) {
        *self.default_locale.write() = Some(id.into());
    }

    pub fn clear_default_locale(&self) {
        *self.default_locale.write() = None;
    }

    pub fn default_locale(&self) -> Option<String> {
        self.default_locale.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<Arc<LocaleData>> {
        self.registry.read().get(id).cloned()
    }

    /// Look up an identifier, or pass raw locale data through.
    pub fn resolve(&self, spec: &LocaleSpec) -> Option<Arc<LocaleData>> {
        match spec {
            LocaleSpec::Id(id) => self.get(id),
            LocaleSpec::Data(data) => Some(Arc::clone(data)),
        }
    }

    /// Resolve `spec`, falling back to the default locale if `spec` is missing or unknown.
    pub fn resolve_or_default(&self, spec: Option<&LocaleSpec>) -> Option<Arc<LocaleData>> {
        spec.and_then(|spec| self.resolve(spec)).or_else(|| {
            let default_id = self.default_locale()?;
            self.get(&default_id)
        })
    }

    pub fn week_rules(&self, spec: Option<&LocaleSpec>) -> WeekRules {
        self.resolve_or_default(spec)
            .map(|locale| locale.week_rules)
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------------

    /// Format with a chrono strftime pattern, see [`format::format_date`].
    pub fn format(&self, instant: Instant, pattern: &str, spec: Option<&LocaleSpec>) -> String {
        format::format_date(instant, pattern, self.resolve_or_default(spec).as_deref())
    }

    /// Parse with the first of `formats` that round-trips, see [`format::parse_date`].
    pub fn parse<S: AsRef<str>>(
        &self,
        text: &str,
        formats: &[S],
        spec: Option<&LocaleSpec>,
        reference: Instant,
    ) -> Option<Instant> {
        format::parse_date(text, formats, self.resolve_or_default(spec).as_deref(), reference)
    }

    /// Format with the first of `formats`, or the empty string if there is nothing to format.
    pub fn safe_format<S: AsRef<str>>(
        &self,
        instant: Option<Instant>,
        formats: &[S],
        spec: Option<&LocaleSpec>,
    ) -> String {
        format::safe_date_format(instant, formats, self.resolve_or_default(spec).as_deref())
    }

    pub fn week_of_year(&self, day: Instant, spec: Option<&LocaleSpec>) -> u32 {
        week_of_year(day, self.week_rules(spec))
    }

    pub fn start_of_week(&self, day: Instant, spec: Option<&LocaleSpec>) -> Instant {
        day.start_of_week(self.week_rules(spec).week_starts_on)
    }

    pub fn end_of_week(&self, day: Instant, spec: Option<&LocaleSpec>) -> Instant {
        day.end_of_week(self.week_rules(spec).week_starts_on)
    }

    /// Short weekday name, used as a stable per-day code.
    pub fn day_of_week_code(&self, day: Instant, spec: Option<&LocaleSpec>) -> String {
        self.format(day, "%a", spec)
    }

    pub fn weekday_name(&self, day: Instant, spec: Option<&LocaleSpec>) -> String {
        self.format(day, "%A", spec)
    }

    /// The full weekday name, passed through `f` (e.g. to take the first letter).
    pub fn formatted_weekday(
        &self,
        day: Instant,
        spec: Option<&LocaleSpec>,
        f: impl FnOnce(&str) -> String,
    ) -> String {
        f(&self.weekday_name(day, spec))
    }

    pub fn weekday_short(&self, day: Instant, spec: Option<&LocaleSpec>) -> String {
        self.format(day, "%a", spec)
    }

    /// The shortest weekday name, e.g. `"Mo"`.
    pub fn weekday_min(&self, day: Instant, spec: Option<&LocaleSpec>) -> String {
        let locale = self.resolve_or_default(spec);
        match locale.as_deref().and_then(|locale| locale.names.as_ref()) {
            Some(names) => names.weekday_min(day.weekday()).to_owned(),
            None => format::format_date(day, "%a", None).chars().take(2).collect(),
        }
    }

    /// Full name of the month with the given 0-based index.
    pub fn month_name(&self, month0: u32, spec: Option<&LocaleSpec>) -> String {
        month_reference(month0)
            .map(|day| self.format(day, "%B", spec))
            .unwrap_or_default()
    }

    pub fn month_short(&self, month0: u32, spec: Option<&LocaleSpec>) -> String {
        month_reference(month0)
            .map(|day| self.format(day, "%b", spec))
            .unwrap_or_default()
    }

    /// Short name of the quarter (1-4), e.g. `"Q3"`.
    pub fn quarter_short(&self, quarter: u32, spec: Option<&LocaleSpec>) -> String {
        if !(1..=4).contains(&quarter) {
            return String::new();
        }
        self.resolve_or_default(spec)
            .and_then(|locale| {
                let names = locale.names.as_ref()?;
                Some(names.quarters_short[quarter as usize - 1].clone())
            })
            .unwrap_or_else(|| format!("Q{quarter}"))
    }
}

fn month_reference(month0: u32) -> Option<Instant> {
    Instant::from_ymd(2000, month0.checked_add(1)?, 1)
}

/// Register a locale with the [global](LocaleResolver::global) resolver.
pub fn register_locale(id: impl Into<String>, data: LocaleData) {
    LocaleResolver::global().register(id, data);
}

/// Set the default locale of the [global](LocaleResolver::global) resolver.
pub fn set_default_locale(id: impl Into<String>) {
    LocaleResolver::global().set_default_locale(id);
}

/// The default locale of the [global](LocaleResolver::global) resolver.
pub fn default_locale() -> Option<String> {
    LocaleResolver::global().default_locale()
}

// ----------------------------------------------------------------------------
