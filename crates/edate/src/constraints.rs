use std::sync::Arc;

use crate::{
    Instant, Span,
    instant::{days_between, months_between, within, years_between},
};

/// A host-supplied predicate over an [`Instant`]. Returning `false` rejects it.
pub type DateFilter = Arc<dyn Fn(&Instant) -> bool + Send + Sync>;

/// Misconfigured [`Constraints`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintsError {
    #[error("both min_time and max_time are required to restrict the time of day")]
    MissingTimeBound,
}

/// Business rules deciding which days, months, quarters, years and times can be picked.
///
/// All predicates are total: malformed bounds (e.g. `max_date` before `min_date`) give an
/// answer, never a panic. The one exception is a half-specified time range, which is reported
/// as [`ConstraintsError::MissingTimeBound`] since it means the host assembled an invalid
/// configuration.
#[derive(Clone, Default)]
pub struct Constraints {
    /// Earliest selectable day (inclusive, day granularity).
    pub min_date: Option<Instant>,

    /// Latest selectable day (inclusive, day granularity).
    pub max_date: Option<Instant>,

    /// Days that can never be selected.
    pub exclude_dates: Vec<Instant>,

    pub filter_date: Option<DateFilter>,

    pub filter_time: Option<DateFilter>,

    /// Earliest selectable time of day. Only hour and minute are used.
    pub min_time: Option<Instant>,

    /// Latest selectable time of day. Only hour and minute are used.
    pub max_time: Option<Instant>,
}

impl std::fmt::Debug for Constraints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraints")
            .field("min_date", &self.min_date)
            .field("max_date", &self.max_date)
            .field("exclude_dates", &self.exclude_dates)
            .field("filter_date", &self.filter_date.as_ref().map(|_| "<fn>"))
            .field("filter_time", &self.filter_time.as_ref().map(|_| "<fn>"))
            .field("min_time", &self.min_time)
            .field("max_time", &self.max_time)
            .finish()
    }
}

impl Constraints {
    #[inline]
    pub fn min_date(mut self, min_date: Instant) -> Self {
        self.min_date = Some(min_date);
        self
    }

    #[inline]
    pub fn max_date(mut self, max_date: Instant) -> Self {
        self.max_date = Some(max_date);
        self
    }

    #[inline]
    pub fn exclude_dates(mut self, exclude_dates: impl IntoIterator<Item = Instant>) -> Self {
        self.exclude_dates = exclude_dates.into_iter().collect();
        self
    }

    /// Only days for which `filter` returns `true` can be selected.
    #[inline]
    pub fn filter_date(mut self, filter: impl Fn(&Instant) -> bool + Send + Sync + 'static) -> Self {
        self.filter_date = Some(Arc::new(filter));
        self
    }

    /// Only times for which `filter` returns `true` can be selected.
    #[inline]
    pub fn filter_time(mut self, filter: impl Fn(&Instant) -> bool + Send + Sync + 'static) -> Self {
        self.filter_time = Some(Arc::new(filter));
        self
    }

    /// Restrict the time of day to `min_time..=max_time`.
    #[inline]
    pub fn time_range(mut self, min_time: Instant, max_time: Instant) -> Self {
        self.min_time = Some(min_time);
        self.max_time = Some(max_time);
        self
    }

    /// Check the configuration for contract violations.
    ///
    /// # Errors
    /// [`ConstraintsError::MissingTimeBound`] if exactly one of `min_time` and `max_time` is set.
    pub fn validate(&self) -> Result<(), ConstraintsError> {
        if self.min_time.is_some() != self.max_time.is_some() {
            return Err(ConstraintsError::MissingTimeBound);
        }
        if let (Some(min), Some(max)) = (self.min_date, self.max_date)
            && days_between(max, min) < 0
        {
            log::warn!("max_date {max} is before min_date {min}: every day is out of bounds");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Days

    /// Is `day` before `min_date` or after `max_date`, comparing whole calendar days?
    pub fn is_out_of_bounds(&self, day: Instant) -> bool {
        self.min_date.is_some_and(|min| days_between(day, min) < 0)
            || self.max_date.is_some_and(|max| days_between(day, max) > 0)
    }

    pub fn is_day_excluded(&self, day: Instant) -> bool {
        self.exclude_dates
            .iter()
            .any(|excluded| excluded.date() == day.date())
    }

    pub fn is_day_disabled(&self, day: Instant) -> bool {
        self.is_out_of_bounds(day) || self.is_day_excluded(day) || self.rejected_by_filter(day)
    }

    fn rejected_by_filter(&self, instant: Instant) -> bool {
        self.filter_date
            .as_ref()
            .is_some_and(|filter| !filter(&instant))
    }

    // ------------------------------------------------------------------------
    // Months, quarters, years

    /// Bounds and filter check of the instant standing in for a month in a month picker.
    pub fn is_month_disabled(&self, month: Instant) -> bool {
        self.is_out_of_bounds(month) || self.rejected_by_filter(month)
    }

    /// Bounds and filter check of the instant standing in for a quarter in a quarter picker.
    pub fn is_quarter_disabled(&self, quarter: Instant) -> bool {
        self.is_out_of_bounds(quarter) || self.rejected_by_filter(quarter)
    }

    /// Bounds check of January 1st of `year`. Years before the validity floor are always disabled.
    pub fn is_year_disabled(&self, year: i32) -> bool {
        Instant::from_ymd(year, 1, 1).is_none_or(|first| self.is_out_of_bounds(first))
    }

    /// Would stepping one month back from `day` leave the bounds?
    pub fn month_disabled_before(&self, day: Instant) -> bool {
        self.min_date.is_some_and(|min| {
            day.checked_add(Span::months(-1))
                .is_none_or(|previous| months_between(min, previous) > 0)
        })
    }

    /// Would stepping one month forward from `day` leave the bounds?
    pub fn month_disabled_after(&self, day: Instant) -> bool {
        self.max_date.is_some_and(|max| {
            day.checked_add(Span::months(1))
                .is_none_or(|next| months_between(next, max) > 0)
        })
    }

    /// Would stepping one year back from `day` leave the bounds?
    pub fn year_disabled_before(&self, day: Instant) -> bool {
        self.min_date.is_some_and(|min| {
            day.checked_add(Span::years(-1))
                .is_none_or(|previous| years_between(min, previous) > 0)
        })
    }

    /// Would stepping one year forward from `day` leave the bounds?
    pub fn year_disabled_after(&self, day: Instant) -> bool {
        self.max_date.is_some_and(|max| {
            day.checked_add(Span::years(1))
                .is_none_or(|next| years_between(next, max) > 0)
        })
    }

    // ------------------------------------------------------------------------
    // Time of day

    pub fn is_time_disabled(&self, time: Instant) -> bool {
        self.filter_time
            .as_ref()
            .is_some_and(|filter| !filter(&time))
    }

    /// Is the time of day of `time` outside `min_time..=max_time`?
    ///
    /// Only hour and minute take part. A malformed range (`max_time` before `min_time`)
    /// disables nothing.
    ///
    /// # Errors
    /// [`ConstraintsError::MissingTimeBound`] unless both `min_time` and `max_time` are set.
    pub fn is_time_in_disabled_range(&self, time: Instant) -> Result<bool, ConstraintsError> {
        let (Some(min_time), Some(max_time)) = (self.min_time, self.max_time) else {
            return Err(ConstraintsError::MissingTimeBound);
        };
        let (Some(time), Some(min), Some(max)) = (
            on_reference_day(time),
            on_reference_day(min_time),
            on_reference_day(max_time),
        ) else {
            return Ok(false);
        };
        if max < min {
            return Ok(false);
        }
        Ok(!within(time, min, max))
    }

    /// Can `time` be picked from a time list?
    ///
    /// # Errors
    /// [`ConstraintsError::MissingTimeBound`] if exactly one of `min_time` and `max_time` is set.
    pub fn is_time_selectable(&self, time: Instant) -> Result<bool, ConstraintsError> {
        if self.is_time_disabled(time) {
            return Ok(false);
        }
        if self.min_time.is_none() && self.max_time.is_none() {
            return Ok(true);
        }
        Ok(!self.is_time_in_disabled_range(time)?)
    }
}

/// The hour and minute of `time` on one fixed day, so that only time of day is compared.
fn on_reference_day(time: Instant) -> Option<Instant> {
    Instant::from_ymd(2000, 1, 1)?.with_time(time.hour(), time.minute(), 0)
}

// ----------------------------------------------------------------------------

/// Is the month with 0-based index `month0`, in the year of `reference_day`,
/// within the months spanned by `start..=end`?
///
/// A month index alone is ambiguous across multi-year ranges, hence the reference day.
///
/// ```
/// # use edate::{Instant, is_month_in_range};
/// let start = Instant::from_ymd(2022, 11, 1).unwrap();
/// let end = Instant::from_ymd(2023, 2, 1).unwrap();
/// let in_2023 = Instant::from_ymd(2023, 6, 1).unwrap();
/// assert!(is_month_in_range(start, end, 0, in_2023));
/// assert!(!is_month_in_range(start, end, 5, in_2023));
/// ```
pub fn is_month_in_range(start: Instant, end: Instant, month0: u32, reference_day: Instant) -> bool {
    unit_in_range(
        (start.year(), start.month0()),
        (end.year(), end.month0()),
        month0,
        reference_day.year(),
    )
}

/// Like [`is_month_in_range`], for quarters (1-4).
pub fn is_quarter_in_range(start: Instant, end: Instant, quarter: u32, reference_day: Instant) -> bool {
    unit_in_range(
        (start.year(), start.quarter()),
        (end.year(), end.quarter()),
        quarter,
        reference_day.year(),
    )
}

fn unit_in_range((start_year, start_unit): (i32, u32), (end_year, end_unit): (i32, u32), unit: u32, year: i32) -> bool {
    if start_year == end_year && start_year == year {
        start_unit <= unit && unit <= end_unit
    } else if start_year < end_year {
        (year == start_year && start_unit <= unit)
            || (year == end_year && unit <= end_unit)
            || (start_year < year && year < end_year)
    } else {
        false
    }
}

// ----------------------------------------------------------------------------
