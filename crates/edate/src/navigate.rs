//! Keyboard movement of the cursor (the "pre-selection") over the calendar.

use crate::{Clock, Constraints, Instant, Span};

/// A cursor movement bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum NavCommand {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
}

impl NavCommand {
    pub const ALL: [Self; 8] = [
        Self::ArrowLeft,
        Self::ArrowRight,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::PageUp,
        Self::PageDown,
        Self::Home,
        Self::End,
    ];

    /// Parse a DOM-style key name, e.g. `"ArrowLeft"` or `"PageDown"`.
    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.key_name() == name)
    }

    pub fn key_name(self) -> &'static str {
        match self {
            Self::ArrowLeft => "ArrowLeft",
            Self::ArrowRight => "ArrowRight",
            Self::ArrowUp => "ArrowUp",
            Self::ArrowDown => "ArrowDown",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Home => "Home",
            Self::End => "End",
        }
    }

    /// How far this command moves the cursor.
    pub fn offset(self) -> Span {
        match self {
            Self::ArrowLeft => Span::days(-1),
            Self::ArrowRight => Span::days(1),
            Self::ArrowUp => Span::weeks(-1),
            Self::ArrowDown => Span::weeks(1),
            Self::PageUp => Span::months(-1),
            Self::PageDown => Span::months(1),
            Self::Home => Span::years(-1),
            Self::End => Span::years(1),
        }
    }
}

/// A key press, as far as the picker cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
    Navigate(NavCommand),
    Unrecognized,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" => Self::Enter,
            "Escape" => Self::Escape,
            _ => NavCommand::from_key_name(name).map_or(Self::Unrecognized, Self::Navigate),
        }
    }
}

// ----------------------------------------------------------------------------

/// What happened to the cursor during its last change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Provenance {
    /// Moved with the keyboard or reset by opening the panel.
    #[default]
    Navigate,

    /// Moved by typing into the text input.
    Input,
}

/// The cursor over the calendar, which is not (yet) a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PreSelection {
    pub cursor: Instant,
    pub provenance: Provenance,
}

impl PreSelection {
    #[inline]
    pub fn moved_by_navigation(cursor: Instant) -> Self {
        Self {
            cursor,
            provenance: Provenance::Navigate,
        }
    }

    #[inline]
    pub fn moved_by_input(cursor: Instant) -> Self {
        Self {
            cursor,
            provenance: Provenance::Input,
        }
    }

    /// Should pressing Enter select the cursor?
    ///
    /// Only a cursor moved by navigation is committed: after typing, the text input
    /// already committed whatever it could parse.
    #[inline]
    pub fn commits_on_enter(&self) -> bool {
        self.cursor.is_valid() && self.provenance == Provenance::Navigate
    }
}

// ----------------------------------------------------------------------------

/// The outcome of [`navigate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// The cursor moved here.
    Moved(Instant),

    /// The cursor stays put, since `candidate` is before `min_date` or after `max_date`.
    OutOfBounds { candidate: Instant },

    /// The cursor stays put, since the movement left the representable range.
    Overflow,
}

impl Navigation {
    /// The new cursor position, if the cursor moved.
    #[inline]
    pub fn moved_to(self) -> Option<Instant> {
        match self {
            Self::Moved(cursor) => Some(cursor),
            Self::OutOfBounds { .. } | Self::Overflow => None,
        }
    }

    /// What to report to the host, if anything.
    pub fn input_error(self) -> Option<InputError> {
        match self {
            Self::Moved(_) => None,
            Self::OutOfBounds { .. } => Some(InputError::new(InputErrorKind::OutOfBounds)),
            Self::Overflow => Some(InputError::new(InputErrorKind::InvalidDate)),
        }
    }
}

/// Move `cursor` by `command`, unless that leaves the bounds of `constraints`.
///
/// Only `min_date` and `max_date` are checked, at day granularity: the cursor may rest
/// on excluded or filtered days, it just cannot select them.
pub fn navigate(cursor: Instant, command: NavCommand, constraints: &Constraints) -> Navigation {
    let Some(candidate) = cursor.checked_add(command.offset()) else {
        return Navigation::Overflow;
    };
    if !candidate.is_valid() {
        Navigation::Overflow
    } else if constraints.is_out_of_bounds(candidate) {
        Navigation::OutOfBounds { candidate }
    } else {
        Navigation::Moved(candidate)
    }
}

/// Where the cursor starts when there is no selection to start from:
/// `open_to_date` (or now), clamped into `min_date..=max_date`.
pub fn initial_pre_selection(
    open_to_date: Option<Instant>,
    constraints: &Constraints,
    clock: &dyn Clock,
) -> Instant {
    let preferred = open_to_date.unwrap_or_else(|| clock.now());
    match (constraints.min_date, constraints.max_date) {
        (Some(min), _) if preferred.is_before(&min) => min,
        (_, Some(max)) if preferred.is_after(&max) => max,
        _ => preferred,
    }
}

/// Does moving from `previous` to `next` show a different month?
///
/// Two absent values are unchanged; appearing or disappearing is a change.
pub fn has_pre_selection_changed(previous: Option<Instant>, next: Option<Instant>) -> bool {
    match (previous, next) {
        (Some(previous), Some(next)) => {
            previous.month() != next.month() || previous.year() != next.year()
        }
        (previous, next) => previous != next,
    }
}

// ----------------------------------------------------------------------------

/// Why an input was rejected. See [`InputError::code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum InputErrorKind {
    InvalidDate,
    OutOfBounds,
}

/// Reported to the host when a key press can not be acted upon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InputError {
    pub kind: InputErrorKind,
}

impl InputError {
    #[inline]
    pub fn new(kind: InputErrorKind) -> Self {
        Self { kind }
    }

    /// Stable numeric code: 1 for an invalid date, 2 for a date out of bounds.
    pub fn code(&self) -> u8 {
        match self.kind {
            InputErrorKind::InvalidDate => 1,
            InputErrorKind::OutOfBounds => 2,
        }
    }

    pub fn message(&self) -> &'static str {
        match self.kind {
            InputErrorKind::InvalidDate => "Date input not valid.",
            InputErrorKind::OutOfBounds => "Date is out of bounds.",
        }
    }
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for InputError {}

impl From<InputErrorKind> for InputError {
    #[inline]
    fn from(kind: InputErrorKind) -> Self {
        Self::new(kind)
    }
}

// ----------------------------------------------------------------------------
