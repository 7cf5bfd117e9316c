//! `edate`: the date reasoning behind a GUI date picker, without the GUI.
//!
//! It answers the questions a calendar widget asks while it is being drawn and used:
//! which days can be picked ([`Constraints`]), where the keyboard cursor goes next
//! ([`navigate()`]), what a click does to the selection ([`commit()`]), and how dates are
//! formatted, parsed and laid out in weeks for a locale ([`LocaleResolver`], [`calendar`]).
//!
//! [`DatePicker`] ties these together into the state of one interactive picker.
//!
//! All values are local wall-clock date-times ([`Instant`]); there are no time zones.
//!
//! ## Feature flags
#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]
//!

#![forbid(unsafe_code)]

pub mod calendar;
mod clock;
mod constraints;
pub mod format;
mod highlight;
pub mod instant;
pub mod locale;
mod navigate;
mod options;
mod select;
mod session;

pub use crate::{
    clock::{Clock, FixedClock, SystemClock},
    constraints::{
        Constraints, ConstraintsError, DateFilter, is_month_in_range, is_quarter_in_range,
    },
    highlight::{DEFAULT_HIGHLIGHT_LABEL, DayKey, HighlightEntry, HighlightIndex},
    instant::{Instant, Span},
    locale::{
        CalendarNames, LocaleData, LocaleResolver, LocaleSpec, WeekRules, default_locale,
        register_locale, set_default_locale,
    },
    navigate::{
        InputError, InputErrorKind, Key, NavCommand, Navigation, PreSelection, Provenance,
        has_pre_selection_changed, initial_pre_selection, navigate,
    },
    options::PickerOptions,
    select::{Commit, CommitOptions, CommitSource, Selection, SelectionMode, commit, commit_time},
    session::{DatePicker, PickerEvent},
};
