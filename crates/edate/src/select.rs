//! Turning a candidate day into a new selection.

use crate::{
    Constraints, Instant,
    instant::{is_day_in_range, is_equal},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

/// What the user has picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Selection {
    Single(Option<Instant>),

    /// `end` is only ever set together with a `start` on or before it.
    Range {
        start: Option<Instant>,
        end: Option<Instant>,
    },
}

impl Default for Selection {
    fn default() -> Self {
        Self::Single(None)
    }
}

impl Selection {
    pub fn empty(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => Self::Single(None),
            SelectionMode::Range => Self::Range {
                start: None,
                end: None,
            },
        }
    }

    pub fn mode(&self) -> SelectionMode {
        match self {
            Self::Single(_) => SelectionMode::Single,
            Self::Range { .. } => SelectionMode::Range,
        }
    }

    /// The selected value of a single selection.
    pub fn single(&self) -> Option<Instant> {
        match *self {
            Self::Single(value) => value,
            Self::Range { .. } => None,
        }
    }

    /// Start and end of a range selection.
    pub fn range(&self) -> (Option<Instant>, Option<Instant>) {
        match *self {
            Self::Single(_) => (None, None),
            Self::Range { start, end } => (start, end),
        }
    }

    /// The value the calendar should open at: the single value, or the start of the range.
    pub fn anchor(&self) -> Option<Instant> {
        match *self {
            Self::Single(value) => value,
            Self::Range { start, .. } => start,
        }
    }

    pub fn is_empty(&self) -> bool {
        match *self {
            Self::Single(value) => value.is_none(),
            Self::Range { start, end } => start.is_none() && end.is_none(),
        }
    }

    /// A range with a start but no end yet.
    pub fn is_range_open(&self) -> bool {
        matches!(self, Self::Range { start: Some(_), end: None })
    }

    pub fn is_range_filled(&self) -> bool {
        matches!(self, Self::Range { start: Some(_), end: Some(_) })
    }

    /// Should `day` be drawn as selected?
    pub fn contains_day(&self, day: Instant) -> bool {
        match *self {
            Self::Single(value) => value.is_some_and(|value| value.date() == day.date()),
            Self::Range {
                start: Some(start),
                end: Some(end),
            } => is_day_in_range(day, start, end),
            Self::Range {
                start: Some(start),
                end: None,
            } => start.date() == day.date(),
            Self::Range { start: None, .. } => false,
        }
    }
}

// ----------------------------------------------------------------------------

/// Where a candidate came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommitSource {
    /// A click on a day, or Enter on the cursor.
    Pick,

    /// Text typed into the input field.
    TextInput,
}

/// The parts of the picker configuration that affect committing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitOptions {
    pub mode: SelectionMode,

    /// Emit a change even when a single selection is picked again.
    pub allow_same_day: bool,

    /// A time of day can be chosen, so typed times must be kept.
    pub time_select: bool,
}

/// The outcome of [`commit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Commit {
    /// The candidate is a disabled day. Nothing changes.
    Rejected,

    /// The candidate equals the current single selection. Nothing changes.
    Suppressed,

    Changed {
        selection: Selection,

        /// The candidate after time adjustments.
        candidate: Option<Instant>,

        /// The range was completed, so the panel should close.
        close_panel: bool,
    },
}

impl Commit {
    /// Should the host be notified?
    #[inline]
    pub fn emit(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    pub fn selection(&self) -> Option<&Selection> {
        match self {
            Self::Changed { selection, .. } => Some(selection),
            Self::Rejected | Self::Suppressed => None,
        }
    }
}

/// Offer `candidate` (`None` clears) to the current selection `prior`.
///
/// In single mode the candidate replaces the selection, keeping the time of day of the
/// previous value unless the user just typed a time. In range mode the candidate starts
/// a new range, or completes the open one when it is not before its start.
///
/// ```
/// # use edate::{commit, Commit, CommitOptions, CommitSource, Constraints, Instant, Selection, SelectionMode};
/// let options = CommitOptions { mode: SelectionMode::Range, ..Default::default() };
/// let (d1, d2) = (Instant::from_ymd(2021, 8, 1), Instant::from_ymd(2021, 8, 9));
/// let open = Selection::Range { start: d1, end: None };
/// let commit = commit(d2, CommitSource::Pick, &open, &options, &Constraints::default());
/// assert_eq!(commit.selection(), Some(&Selection::Range { start: d1, end: d2 }));
/// ```
pub fn commit(
    candidate: Option<Instant>,
    source: CommitSource,
    prior: &Selection,
    options: &CommitOptions,
    constraints: &Constraints,
) -> Commit {
    if candidate.is_some_and(|day| constraints.is_day_disabled(day)) {
        return Commit::Rejected;
    }

    match options.mode {
        SelectionMode::Single => {
            let previous = prior.single();
            if !options.allow_same_day && is_equal(previous, candidate) {
                return Commit::Suppressed;
            }
            let candidate = candidate.map(|day| keep_time_of_day(day, previous, source, options));
            Commit::Changed {
                selection: Selection::Single(candidate),
                candidate,
                close_panel: false,
            }
        }
        SelectionMode::Range => {
            let (start, end, close_panel) = match (prior.range(), candidate) {
                (_, None) => (None, None, false),
                ((Some(start), None), Some(day)) if !day.is_before(&start) => {
                    (Some(start), Some(day), true)
                }
                // Nothing selected, a filled range, or a candidate before the open start.
                (_, Some(day)) => (Some(day), None, false),
            };
            Commit::Changed {
                selection: Selection::Range { start, end },
                candidate,
                close_panel,
            }
        }
    }
}

/// Sticky time: a picked day inherits the time of day of the previous selection.
fn keep_time_of_day(
    day: Instant,
    previous: Option<Instant>,
    source: CommitSource,
    options: &CommitOptions,
) -> Instant {
    let Some(previous) = previous else {
        return day;
    };
    if source == CommitSource::TextInput && options.time_select {
        return day;
    }
    day.with_time(previous.hour(), previous.minute(), previous.second())
        .unwrap_or(day)
}

/// A pick from the time list: the day of `prior` (or `fallback`) at the hour and minute
/// of `time`, with seconds zeroed.
pub fn commit_time(time: Instant, prior: Option<Instant>, fallback: Instant) -> Option<Instant> {
    prior
        .unwrap_or(fallback)
        .with_time(time.hour(), time.minute(), 0)
}

// ----------------------------------------------------------------------------
