use crate::{CommitOptions, Instant, SelectionMode, calendar::DEFAULT_YEAR_ITEM_NUMBER};

/// How a [`crate::DatePicker`] behaves.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PickerOptions {
    pub selects_range: bool,
    pub allow_same_day: bool,
    pub show_time_select: bool,
    pub show_time_select_only: bool,
    pub inline: bool,
    pub start_open: bool,
    pub disabled: bool,
    pub read_only: bool,

    /// Accepted input formats. The first one is used for display.
    pub date_formats: Vec<String>,

    /// Format of the month caption above the day grid.
    pub calendar_format: String,

    /// Format of the entries of the time list.
    pub time_format: String,

    pub time_interval_minutes: i64,

    /// Extra entries in the time list. Only their time of day is used.
    pub injected_times: Vec<Instant>,

    /// Where the calendar opens when nothing is selected. (Default: now)
    pub open_to_date: Option<Instant>,

    pub year_item_number: i32,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            selects_range: false,
            allow_same_day: false,
            show_time_select: false,
            show_time_select_only: false,
            inline: false,
            start_open: false,
            disabled: false,
            read_only: false,
            date_formats: vec!["%m/%d/%Y".to_owned()],
            calendar_format: "%B %Y".to_owned(),
            time_format: "%H:%M".to_owned(),
            time_interval_minutes: 30,
            injected_times: vec![],
            open_to_date: None,
            year_item_number: DEFAULT_YEAR_ITEM_NUMBER,
        }
    }
}

impl PickerOptions {
    /// Select a start and an end day instead of a single day. (Default: false)
    #[inline]
    pub fn selects_range(mut self, selects_range: bool) -> Self {
        self.selects_range = selects_range;
        self
    }

    /// Report a change even when the selected day is picked again. (Default: false)
    #[inline]
    pub fn allow_same_day(mut self, allow_same_day: bool) -> Self {
        self.allow_same_day = allow_same_day;
        self
    }

    /// Show a time list next to the calendar. (Default: false)
    #[inline]
    pub fn show_time_select(mut self, show_time_select: bool) -> Self {
        self.show_time_select = show_time_select;
        self
    }

    /// Show only a time list. (Default: false)
    #[inline]
    pub fn show_time_select_only(mut self, show_time_select_only: bool) -> Self {
        self.show_time_select_only = show_time_select_only;
        self
    }

    /// The calendar is always shown and never closes. (Default: false)
    #[inline]
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    #[inline]
    pub fn start_open(mut self, start_open: bool) -> Self {
        self.start_open = start_open;
        self
    }

    #[inline]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[inline]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Change the formats accepted in the text input. (Default: %m/%d/%Y)
    /// See [`chrono::format::strftime`] for valid formats.
    #[inline]
    pub fn date_formats(mut self, date_formats: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.date_formats = date_formats.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for a single input format.
    #[inline]
    pub fn date_format(self, date_format: impl Into<String>) -> Self {
        self.date_formats([date_format])
    }

    /// (Default: %B %Y)
    #[inline]
    pub fn calendar_format(mut self, calendar_format: impl Into<String>) -> Self {
        self.calendar_format = calendar_format.into();
        self
    }

    /// (Default: %H:%M)
    #[inline]
    pub fn time_format(mut self, time_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self
    }

    /// Minutes between two entries of the time list. (Default: 30)
    #[inline]
    pub fn time_interval_minutes(mut self, time_interval_minutes: i64) -> Self {
        self.time_interval_minutes = time_interval_minutes;
        self
    }

    #[inline]
    pub fn injected_times(mut self, injected_times: impl IntoIterator<Item = Instant>) -> Self {
        self.injected_times = injected_times.into_iter().collect();
        self
    }

    #[inline]
    pub fn open_to_date(mut self, open_to_date: Instant) -> Self {
        self.open_to_date = Some(open_to_date);
        self
    }

    /// Years per page of the year picker. (Default: 12)
    #[inline]
    pub fn year_item_number(mut self, year_item_number: i32) -> Self {
        self.year_item_number = year_item_number;
        self
    }

    pub fn mode(&self) -> SelectionMode {
        if self.selects_range {
            SelectionMode::Range
        } else {
            SelectionMode::Single
        }
    }

    /// Can a time of day be chosen?
    pub fn time_select(&self) -> bool {
        self.show_time_select || self.show_time_select_only
    }

    pub fn commit_options(&self) -> CommitOptions {
        CommitOptions {
            mode: self.mode(),
            allow_same_day: self.allow_same_day,
            time_select: self.time_select(),
        }
    }
}
