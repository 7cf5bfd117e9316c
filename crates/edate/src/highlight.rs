use ahash::HashMap;
use chrono::NaiveDate;

use crate::Instant;

/// Label given to highlighted days that do not come with one.
pub const DEFAULT_HIGHLIGHT_LABEL: &str = "highlighted";

/// A calendar day, used as key in a [`HighlightIndex`].
///
/// Displays as `MM.DD.YYYY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DayKey(NaiveDate);

impl DayKey {
    #[inline]
    pub fn of(day: Instant) -> Self {
        Self(day.date())
    }

    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<Instant> for DayKey {
    #[inline]
    fn from(day: Instant) -> Self {
        Self::of(day)
    }
}

impl std::fmt::Display for DayKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%m.%d.%Y"))
    }
}

/// Input to [`HighlightIndex::build`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum HighlightEntry {
    /// Highlight one day with the default label.
    Date(Instant),

    /// Highlight several days with the same label, e.g. a CSS class name.
    Labeled { label: String, dates: Vec<Instant> },
}

impl HighlightEntry {
    pub fn labeled(label: impl Into<String>, dates: impl IntoIterator<Item = Instant>) -> Self {
        Self::Labeled {
            label: label.into(),
            dates: dates.into_iter().collect(),
        }
    }
}

impl From<Instant> for HighlightEntry {
    #[inline]
    fn from(day: Instant) -> Self {
        Self::Date(day)
    }
}

/// Labels per calendar day, for O(1) lookup while rendering a month.
///
/// Labels accumulate: a day named by several entries carries all of their labels,
/// in entry order, without duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HighlightIndex {
    days: HashMap<DayKey, Vec<String>>,
}

impl HighlightIndex {
    /// Index `entries`, labelling plain dates with [`DEFAULT_HIGHLIGHT_LABEL`].
    pub fn new(entries: &[HighlightEntry]) -> Self {
        Self::build(entries, DEFAULT_HIGHLIGHT_LABEL)
    }

    pub fn build(entries: &[HighlightEntry], default_label: &str) -> Self {
        let mut index = Self::default();
        for entry in entries {
            match entry {
                HighlightEntry::Date(day) => index.add(*day, default_label),
                HighlightEntry::Labeled { label, dates } => {
                    for day in dates {
                        index.add(*day, label);
                    }
                }
            }
        }
        index
    }

    fn add(&mut self, day: Instant, label: &str) {
        if !day.is_valid() {
            log::debug!("Ignoring invalid highlighted date {day}");
            return;
        }
        let labels = self.days.entry(DayKey::of(day)).or_default();
        if !labels.iter().any(|existing| existing == label) {
            labels.push(label.to_owned());
        }
    }

    /// The labels of `day`, empty if it is not highlighted.
    pub fn labels(&self, day: Instant) -> &[String] {
        self.days
            .get(&DayKey::of(day))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_highlighted(&self, day: Instant) -> bool {
        self.days.contains_key(&DayKey::of(day))
    }

    /// Number of highlighted days.
    #[inline]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &[String])> + '_ {
        self.days
            .iter()
            .map(|(day, labels)| (*day, labels.as_slice()))
    }
}
