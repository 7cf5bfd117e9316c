use std::sync::Arc;

use crate::{
    Clock, Commit, CommitSource, Constraints, ConstraintsError, HighlightEntry, HighlightIndex,
    InputError, InputErrorKind, Instant, Key, LocaleResolver, LocaleSpec, NavCommand, Navigation,
    PickerOptions, PreSelection, Provenance, Selection, SystemClock,
    calendar::{self, Week, YearsPeriod},
    commit, commit_time, has_pre_selection_changed, initial_pre_selection,
    instant::is_equal,
    navigate,
};

/// A notification for the host, returned by the [`DatePicker`] handlers in the order
/// the host should see them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    /// The selection changed.
    Change(Selection),

    /// A day was clicked (or chosen with Enter), whether or not it changed the selection.
    Select(Option<Instant>),

    InputError(InputError),

    CalendarOpen,

    CalendarClose,
}

/// The state of one date picker: what is selected, where the keyboard cursor is, and
/// whether the calendar panel is open.
///
/// Feed it user input through the `handle_*` methods and forward the returned
/// [`PickerEvent`]s to your application.
///
/// ```
/// # use edate::{DatePicker, FixedClock, Instant, PickerEvent, PickerOptions, Selection};
/// # use std::sync::Arc;
/// let now = Instant::from_ymd(2021, 8, 18).unwrap();
/// let mut picker = DatePicker::with_clock(PickerOptions::default(), Arc::new(FixedClock(now)));
///
/// picker.handle_key("ArrowDown"); // opens the calendar
/// picker.handle_key("ArrowRight");
/// let events = picker.handle_key("Enter");
///
/// let selected = Instant::from_ymd(2021, 8, 19);
/// assert_eq!(events[0], PickerEvent::Change(Selection::Single(selected)));
/// assert!(!picker.is_calendar_open());
/// ```
pub struct DatePicker {
    options: PickerOptions,
    constraints: Constraints,
    locale: Option<LocaleSpec>,
    resolver: Arc<LocaleResolver>,
    clock: Arc<dyn Clock>,
    highlights: HighlightIndex,

    selection: Selection,
    pre_selection: PreSelection,
    open: bool,
    focused: bool,

    /// What the user is typing, until it is committed or abandoned.
    input_value: Option<String>,
}

impl std::fmt::Debug for DatePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatePicker")
            .field("options", &self.options)
            .field("constraints", &self.constraints)
            .field("locale", &self.locale)
            .field("selection", &self.selection)
            .field("pre_selection", &self.pre_selection)
            .field("open", &self.open)
            .field("input_value", &self.input_value)
            .finish_non_exhaustive()
    }
}

impl DatePicker {
    pub fn new(options: PickerOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    pub fn with_clock(options: PickerOptions, clock: Arc<dyn Clock>) -> Self {
        let constraints = Constraints::default();
        let cursor = initial_pre_selection(options.open_to_date, &constraints, clock.as_ref());
        Self {
            selection: Selection::empty(options.mode()),
            pre_selection: PreSelection::moved_by_navigation(cursor),
            open: options.start_open,
            focused: false,
            input_value: None,
            highlights: HighlightIndex::default(),
            locale: None,
            resolver: LocaleResolver::global(),
            constraints,
            options,
            clock,
        }
    }

    /// # Errors
    /// If the constraints are misconfigured, see [`Constraints::validate`].
    pub fn with_constraints(mut self, constraints: Constraints) -> Result<Self, ConstraintsError> {
        self.set_constraints(constraints)?;
        Ok(self)
    }

    /// Use the given locale instead of the resolver's default one.
    #[inline]
    pub fn with_locale(mut self, locale: impl Into<LocaleSpec>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Resolve locales with `resolver` instead of [`LocaleResolver::global`].
    #[inline]
    pub fn with_resolver(mut self, resolver: Arc<LocaleResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    #[inline]
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self.pre_selection = PreSelection::moved_by_navigation(self.default_cursor());
        self
    }

    #[inline]
    pub fn with_highlight_dates(mut self, entries: &[HighlightEntry]) -> Self {
        self.set_highlight_dates(entries);
        self
    }

    // ------------------------------------------------------------------------
    // Accessors

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn pre_selection(&self) -> PreSelection {
        self.pre_selection
    }

    pub fn highlights(&self) -> &HighlightIndex {
        &self.highlights
    }

    /// Is the calendar panel showing?
    pub fn is_calendar_open(&self) -> bool {
        self.options.inline || (self.open && !self.options.disabled && !self.options.read_only)
    }

    /// The text the input field should show: what the user is typing,
    /// or else the selection formatted with the first date format.
    pub fn input_text(&self) -> String {
        match &self.input_value {
            Some(text) => text.clone(),
            None => self.resolver.safe_format(
                self.selection.anchor(),
                &self.options.date_formats,
                self.locale.as_ref(),
            ),
        }
    }

    /// The caption of the month under the cursor, e.g. "August 2021".
    pub fn calendar_caption(&self) -> String {
        self.resolver.format(
            self.pre_selection.cursor,
            &self.options.calendar_format,
            self.locale.as_ref(),
        )
    }

    /// The weeks of the month under the cursor, laid out for the current locale.
    pub fn visible_weeks(&self) -> Vec<Week> {
        let cursor = self.pre_selection.cursor;
        calendar::month_weeks(
            cursor.year(),
            cursor.month(),
            self.resolver.week_rules(self.locale.as_ref()),
        )
    }

    /// The page of the year picker containing the cursor.
    pub fn visible_years(&self) -> YearsPeriod {
        calendar::years_period(self.pre_selection.cursor, self.options.year_item_number)
    }

    /// The entries of the time list for the day under the cursor.
    pub fn time_slots(&self) -> Vec<Instant> {
        calendar::time_slots(
            self.pre_selection.cursor,
            self.options.time_interval_minutes,
            &self.options.injected_times,
        )
    }

    /// The time list entries as the host should label them.
    pub fn formatted_time_slots(&self) -> Vec<String> {
        self.time_slots()
            .into_iter()
            .map(|slot| self.resolver.format(slot, &self.options.time_format, self.locale.as_ref()))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Host-driven updates

    /// # Errors
    /// If the constraints are misconfigured, see [`Constraints::validate`].
    pub fn set_constraints(&mut self, constraints: Constraints) -> Result<(), ConstraintsError> {
        constraints.validate()?;
        self.constraints = constraints;
        self.reclamp_cursor();
        Ok(())
    }

    pub fn set_open_to_date(&mut self, open_to_date: Option<Instant>) {
        self.options.open_to_date = open_to_date;
        self.reclamp_cursor();
    }

    pub fn set_highlight_dates(&mut self, entries: &[HighlightEntry]) {
        self.highlights = HighlightIndex::new(entries);
    }

    /// Replace the selection from outside, e.g. when the application state changed.
    pub fn set_selection(&mut self, selection: Selection) {
        let previous = self.selection.anchor();
        let next = selection.anchor();
        self.selection = selection;

        if !self.focused && !is_equal(previous, next) {
            self.input_value = None;
        }
        if self.options.inline
            && has_pre_selection_changed(previous, next)
            && let Some(next) = next
        {
            self.move_cursor(next, Provenance::Navigate);
        }
    }

    fn reclamp_cursor(&mut self) {
        if self.selection.anchor().is_none() {
            self.pre_selection = PreSelection::moved_by_navigation(self.default_cursor());
        }
    }

    fn default_cursor(&self) -> Instant {
        self.selection.anchor().unwrap_or_else(|| {
            initial_pre_selection(self.options.open_to_date, &self.constraints, self.clock.as_ref())
        })
    }

    /// Move the cursor unless `cursor` is out of bounds.
    fn move_cursor(&mut self, cursor: Instant, provenance: Provenance) -> bool {
        if !cursor.is_valid() || self.constraints.is_out_of_bounds(cursor) {
            log::trace!("Cursor stays at {}, {cursor} is out of bounds", self.pre_selection.cursor);
            return false;
        }
        self.pre_selection = PreSelection { cursor, provenance };
        true
    }

    // ------------------------------------------------------------------------
    // Panel

    /// Open or close the calendar. Either way the cursor counts as moved by navigation,
    /// and opening a closed calendar puts the cursor back on the selection.
    pub fn set_open(&mut self, open: bool) -> Vec<PickerEvent> {
        let was_open = self.open;
        let cursor = if open && was_open {
            self.pre_selection.cursor
        } else {
            self.default_cursor()
        };
        self.pre_selection = PreSelection::moved_by_navigation(cursor);
        self.open = open;

        let mut events = vec![];
        if open && !was_open {
            log::debug!("Calendar opened at {cursor}");
            events.push(PickerEvent::CalendarOpen);
        } else if !open {
            self.input_value = None;
            if was_open {
                log::debug!("Calendar closed");
                events.push(PickerEvent::CalendarClose);
            }
        }
        events
    }

    /// A click on the input field.
    pub fn open_calendar(&mut self) -> Vec<PickerEvent> {
        if self.options.disabled || self.options.read_only {
            return vec![];
        }
        self.set_open(true)
    }

    /// A click outside of the picker.
    pub fn close_calendar(&mut self) -> Vec<PickerEvent> {
        if self.options.inline {
            return vec![];
        }
        self.set_open(false)
    }

    pub fn handle_focus(&mut self) -> Vec<PickerEvent> {
        self.focused = true;
        self.open_calendar()
    }

    pub fn handle_blur(&mut self) {
        self.focused = false;
    }

    // ------------------------------------------------------------------------
    // Selection

    /// The text of the input field changed.
    ///
    /// Text that parses with one of the date formats (or empty text, which clears)
    /// is committed right away. Anything else waits for more typing.
    pub fn handle_input_change(&mut self, text: &str) -> Vec<PickerEvent> {
        self.input_value = Some(text.to_owned());
        self.pre_selection.provenance = Provenance::Input;

        let parsed = self.resolver.parse(
            text,
            &self.options.date_formats,
            self.locale.as_ref(),
            self.clock.now(),
        );
        if parsed.is_none() && !text.is_empty() {
            log::trace!("{text:?} is not a date (yet)");
            return vec![];
        }
        self.set_selected(parsed, CommitSource::TextInput)
    }

    /// A click on a day.
    pub fn handle_select(&mut self, day: Instant) -> Vec<PickerEvent> {
        let mut events = self.set_selected(Some(day), CommitSource::Pick);
        if self.options.show_time_select {
            self.move_cursor(day, self.pre_selection.provenance);
        } else if !self.options.inline && !self.options.selects_range {
            events.extend(self.set_open(false));
        }
        events
    }

    /// A pick from the time list. Only the hour and minute of `time` are used.
    ///
    /// Nothing changes if the resulting value falls on a disabled day or at a time
    /// the constraints do not allow.
    pub fn handle_time_change(&mut self, time: Instant) -> Vec<PickerEvent> {
        if self.options.selects_range {
            log::warn!("Ignoring time change of a range selection");
            return vec![];
        }
        let fallback = self.options.open_to_date.unwrap_or_else(|| self.clock.now());
        let Some(changed) = commit_time(time, self.selection.single(), fallback) else {
            return vec![PickerEvent::InputError(InputErrorKind::InvalidDate.into())];
        };
        if self.constraints.is_day_disabled(changed) {
            log::trace!("Rejected time {changed} on a disabled day");
            return vec![];
        }
        match self.constraints.is_time_selectable(changed) {
            Ok(true) => {}
            Ok(false) => {
                log::trace!("Rejected disabled time {changed}");
                return vec![];
            }
            Err(err) => {
                log::warn!("Rejected time {changed}: {err}");
                return vec![];
            }
        }
        log::debug!("Time changed to {changed}");
        self.selection = Selection::Single(Some(changed));
        self.pre_selection.cursor = changed;

        let mut events = vec![PickerEvent::Change(self.selection)];
        events.extend(self.close_calendar());
        self.input_value = None;
        events
    }

    /// Clear the selection, e.g. from a clear button.
    pub fn clear(&mut self) -> Vec<PickerEvent> {
        self.selection = Selection::empty(self.options.mode());
        self.input_value = None;
        log::debug!("Selection cleared");
        vec![PickerEvent::Change(self.selection)]
    }

    fn set_selected(&mut self, candidate: Option<Instant>, source: CommitSource) -> Vec<PickerEvent> {
        let mut events = vec![];
        let commit = commit(
            candidate,
            source,
            &self.selection,
            &self.options.commit_options(),
            &self.constraints,
        );
        let selected = match commit {
            Commit::Rejected => {
                log::trace!("Rejected disabled day {candidate:?}");
                return events;
            }
            Commit::Suppressed => candidate,
            Commit::Changed {
                selection,
                candidate,
                close_panel,
            } => {
                if let Some(candidate) = candidate
                    && !self.options.inline
                {
                    self.pre_selection = PreSelection {
                        cursor: candidate,
                        provenance: match source {
                            CommitSource::TextInput => Provenance::Input,
                            CommitSource::Pick => self.pre_selection.provenance,
                        },
                    };
                }
                log::debug!("Selection changed to {selection:?}");
                self.selection = selection;
                events.push(PickerEvent::Change(selection));
                if close_panel {
                    events.extend(self.set_open(false));
                }
                candidate
            }
        };

        if source == CommitSource::Pick {
            self.input_value = None;
            events.push(PickerEvent::Select(selected));
        }
        events
    }

    // ------------------------------------------------------------------------
    // Keyboard

    /// A key press in the input field or the calendar, by DOM-style key name.
    pub fn handle_key(&mut self, name: &str) -> Vec<PickerEvent> {
        let key = Key::from_name(name);

        if !self.is_calendar_open() {
            return match key {
                Key::Enter | Key::Navigate(NavCommand::ArrowUp | NavCommand::ArrowDown) => {
                    self.open_calendar()
                }
                Key::Escape | Key::Navigate(_) | Key::Unrecognized => vec![],
            };
        }

        match key {
            Key::Enter => {
                if self.pre_selection.commits_on_enter() {
                    let cursor = self.pre_selection.cursor;
                    self.handle_select(cursor)
                } else {
                    self.set_open(false)
                }
            }
            Key::Escape => {
                let cursor_valid = self.pre_selection.cursor.is_valid();
                let mut events = self.set_open(false);
                if !cursor_valid {
                    events.push(PickerEvent::InputError(InputErrorKind::InvalidDate.into()));
                }
                events
            }
            Key::Navigate(command) => {
                match navigate(self.pre_selection.cursor, command, &self.constraints) {
                    Navigation::Moved(cursor) => {
                        self.pre_selection = PreSelection::moved_by_navigation(cursor);
                        vec![]
                    }
                    blocked => {
                        log::trace!("{command:?} blocked: {blocked:?}");
                        blocked
                            .input_error()
                            .map(PickerEvent::InputError)
                            .into_iter()
                            .collect()
                    }
                }
            }
            Key::Unrecognized => {
                vec![PickerEvent::InputError(InputErrorKind::InvalidDate.into())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;

    fn at(text: &str) -> Instant {
        Instant::parse_iso(text).unwrap()
    }

    fn picker(options: PickerOptions) -> DatePicker {
        DatePicker::with_clock(options, Arc::new(FixedClock(at("2021-08-18T12:00"))))
            .with_resolver(Arc::new(LocaleResolver::default()))
    }

    #[test]
    fn opening_puts_cursor_on_selection() {
        let mut picker =
            picker(PickerOptions::default()).with_selection(Selection::Single(Some(at("2021-03-05"))));
        picker.handle_key("ArrowDown");
        assert!(picker.is_calendar_open());
        assert_eq!(picker.pre_selection().cursor, at("2021-03-05"));
        picker.handle_key("ArrowDown");
        assert_eq!(picker.pre_selection().cursor, at("2021-03-12"));

        // Re-opening an open calendar keeps the cursor.
        assert!(picker.set_open(true).is_empty());
        assert_eq!(picker.pre_selection().cursor, at("2021-03-12"));
    }

    #[test]
    fn disabled_picker_does_not_open() {
        let mut picker = picker(PickerOptions::default().disabled(true));
        assert!(picker.handle_key("Enter").is_empty());
        assert!(picker.handle_focus().is_empty());
        assert!(!picker.is_calendar_open());
    }

    #[test]
    fn inline_calendar_follows_host_selection() {
        let mut picker = picker(PickerOptions::default().inline(true));
        assert!(picker.is_calendar_open());
        picker.set_selection(Selection::Single(Some(at("2022-01-10"))));
        assert_eq!(picker.pre_selection().cursor, at("2022-01-10"));

        // Same month: the cursor stays where the user left it.
        picker.handle_key("ArrowRight");
        picker.set_selection(Selection::Single(Some(at("2022-01-20"))));
        assert_eq!(picker.pre_selection().cursor, at("2022-01-11"));
    }

    #[test]
    fn time_list() {
        let mut picker = picker(PickerOptions::default().show_time_select(true).time_interval_minutes(60));
        assert_eq!(picker.time_slots().len(), 24);
        assert_eq!(picker.formatted_time_slots()[13], "13:00");

        picker.set_open(true);
        let events = picker.handle_time_change(at("2000-01-01T14:30"));
        assert_eq!(
            events,
            vec![
                PickerEvent::Change(Selection::Single(Some(at("2021-08-18T14:30")))),
                PickerEvent::CalendarClose,
            ]
        );
    }

    #[test]
    fn time_list_respects_constraints() {
        let constraints = Constraints::default()
            .time_range(at("2000-01-01T09:00"), at("2000-01-01T17:00"))
            .filter_time(|time| time.minute() == 0);
        let mut picker = picker(PickerOptions::default().show_time_select(true))
            .with_constraints(constraints)
            .unwrap();
        picker.set_open(true);

        assert!(picker.handle_time_change(at("2000-01-01T20:00")).is_empty());
        assert!(picker.handle_time_change(at("2000-01-01T10:30")).is_empty());
        assert_eq!(*picker.selection(), Selection::Single(None));
        assert!(picker.is_calendar_open());

        let events = picker.handle_time_change(at("2000-01-01T17:00"));
        assert_eq!(events[0], PickerEvent::Change(Selection::Single(Some(at("2021-08-18T17:00")))));
    }

    #[test]
    fn layout_follows_cursor() {
        let picker = picker(PickerOptions::default());
        assert_eq!(picker.calendar_caption(), "August 2021");
        let weeks = picker.visible_weeks();
        assert_eq!(weeks[0].days[0], at("2021-08-01"));
        assert_eq!(picker.visible_years(), YearsPeriod { start: 2017, end: 2028 });
    }
}
