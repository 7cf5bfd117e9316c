use std::sync::Arc;

use edate::{
    CalendarNames, Constraints, ConstraintsError, DatePicker, FixedClock, HighlightEntry,
    InputError, InputErrorKind, Instant, LocaleData, LocaleResolver, PickerEvent, PickerOptions,
    Selection, Span, WeekRules,
};

fn at(text: &str) -> Instant {
    Instant::parse_iso(text).unwrap()
}

const TODAY: &str = "2021-08-18T12:00";

fn new_picker(options: PickerOptions) -> DatePicker {
    DatePicker::with_clock(options, Arc::new(FixedClock(at(TODAY))))
        .with_resolver(Arc::new(LocaleResolver::default()))
}

fn out_of_bounds() -> PickerEvent {
    PickerEvent::InputError(InputError::new(InputErrorKind::OutOfBounds))
}

fn german() -> LocaleData {
    LocaleData::new("de")
        .week_rules(WeekRules::ISO)
        .names(CalendarNames::new(
            [
                "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August",
                "September", "Oktober", "November", "Dezember",
            ],
            [
                "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.",
                "Nov.", "Dez.",
            ],
            [
                "Montag",
                "Dienstag",
                "Mittwoch",
                "Donnerstag",
                "Freitag",
                "Samstag",
                "Sonntag",
            ],
            ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."],
            ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"],
        ))
}

#[test]
fn keyboard_selection_of_a_single_day() {
    let mut picker = new_picker(PickerOptions::default());
    assert!(!picker.is_calendar_open());

    assert_eq!(picker.handle_key("ArrowDown"), vec![PickerEvent::CalendarOpen]);
    assert_eq!(picker.pre_selection().cursor, at(TODAY));

    assert!(picker.handle_key("ArrowDown").is_empty());
    assert!(picker.handle_key("PageDown").is_empty());
    assert!(picker.handle_key("ArrowLeft").is_empty());
    assert_eq!(picker.pre_selection().cursor, at("2021-09-24T12:00"));

    // Moving the cursor does not select anything.
    assert_eq!(*picker.selection(), Selection::Single(None));

    let events = picker.handle_key("Enter");
    let selected = Some(at("2021-09-24T12:00"));
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Single(selected)),
            PickerEvent::Select(selected),
            PickerEvent::CalendarClose,
        ]
    );
    assert_eq!(picker.input_text(), "09/24/2021");
}

#[test]
fn navigation_is_clamped_at_min_date() {
    let min_date = at(TODAY).checked_add(Span::days(5)).unwrap();
    let mut picker = new_picker(PickerOptions::default())
        .with_constraints(Constraints::default().min_date(min_date))
        .unwrap();

    picker.handle_key("Enter");
    assert!(picker.is_calendar_open());
    assert_eq!(picker.pre_selection().cursor, min_date);

    assert_eq!(picker.handle_key("ArrowLeft"), vec![out_of_bounds()]);
    assert_eq!(picker.pre_selection().cursor, min_date);
    assert_eq!(picker.handle_key("PageUp"), vec![out_of_bounds()]);
    assert_eq!(picker.pre_selection().cursor, min_date);

    assert!(picker.handle_key("ArrowRight").is_empty());
    assert_eq!(picker.pre_selection().cursor, at("2021-08-24T12:00"));
}

#[test]
fn unknown_keys_report_invalid_input() {
    let mut picker = new_picker(PickerOptions::default().start_open(true));
    assert_eq!(
        picker.handle_key("Tab"),
        vec![PickerEvent::InputError(InputError::new(InputErrorKind::InvalidDate))]
    );
    assert_eq!(InputError::new(InputErrorKind::InvalidDate).code(), 1);
    assert_eq!(picker.handle_key("Escape"), vec![PickerEvent::CalendarClose]);

    // A closed calendar ignores everything but opening keys.
    assert!(picker.handle_key("Tab").is_empty());
    assert!(picker.handle_key("ArrowLeft").is_empty());
}

#[test]
fn typing_commits_but_enter_does_not_recommit() {
    let mut picker = new_picker(PickerOptions::default().date_formats(["%Y-%m-%d", "%m/%d/%Y"]));
    picker.open_calendar();

    // Incomplete input is kept but not committed.
    assert!(picker.handle_input_change("2021-09").is_empty());
    assert_eq!(picker.input_text(), "2021-09");

    let events = picker.handle_input_change("2021-09-03");
    assert_eq!(events, vec![PickerEvent::Change(Selection::Single(Some(at("2021-09-03"))))]);
    assert_eq!(picker.pre_selection().cursor, at("2021-09-03"));
    assert_eq!(picker.input_text(), "2021-09-03");

    // The cursor came from typing, so Enter only closes the calendar.
    assert_eq!(picker.handle_key("Enter"), vec![PickerEvent::CalendarClose]);
    assert_eq!(*picker.selection(), Selection::Single(Some(at("2021-09-03"))));
    assert_eq!(picker.input_text(), "2021-09-03");

    // Clearing the text clears the selection.
    let events = picker.handle_input_change("");
    assert_eq!(events, vec![PickerEvent::Change(Selection::Single(None))]);
}

#[test]
fn typed_dates_respect_constraints() {
    let mut picker = new_picker(PickerOptions::default())
        .with_constraints(Constraints::default().exclude_dates([at("2021-09-03")]))
        .unwrap();
    assert!(picker.handle_input_change("09/03/2021").is_empty());
    assert_eq!(*picker.selection(), Selection::Single(None));
}

#[test]
fn range_selection_by_clicking() {
    let (d1, d2, d3) = (at("2021-08-01"), at("2021-08-09"), at("2021-08-20"));
    let mut picker = new_picker(PickerOptions::default().selects_range(true));
    picker.open_calendar();

    let events = picker.handle_select(d1);
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Range { start: Some(d1), end: None }),
            PickerEvent::Select(Some(d1)),
        ]
    );
    assert!(picker.is_calendar_open());

    let events = picker.handle_select(d2);
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Range { start: Some(d1), end: Some(d2) }),
            PickerEvent::CalendarClose,
            PickerEvent::Select(Some(d2)),
        ]
    );
    assert!(!picker.is_calendar_open());

    picker.open_calendar();
    assert_eq!(picker.pre_selection().cursor, d1);
    picker.handle_select(d3);
    assert_eq!(*picker.selection(), Selection::Range { start: Some(d3), end: None });
}

#[test]
fn clicking_a_disabled_day_changes_nothing() {
    let mut picker = new_picker(PickerOptions::default())
        .with_constraints(Constraints::default().max_date(at("2021-08-20")))
        .unwrap();
    picker.open_calendar();
    let events = picker.handle_select(at("2021-08-25"));
    assert!(!events.iter().any(|event| matches!(event, PickerEvent::Change(_))));
    assert_eq!(*picker.selection(), Selection::Single(None));
}

#[test]
fn picking_again_keeps_time_of_day() {
    let mut picker = new_picker(PickerOptions::default())
        .with_selection(Selection::Single(Some(at("2021-08-10T09:45"))));
    picker.open_calendar();

    let events = picker.handle_select(at("2021-08-12"));
    assert_eq!(events[0], PickerEvent::Change(Selection::Single(Some(at("2021-08-12T09:45")))));

    // Picking the same value again is not a change.
    picker.open_calendar();
    let events = picker.handle_select(at("2021-08-12T09:45"));
    assert_eq!(
        events,
        vec![PickerEvent::Select(Some(at("2021-08-12T09:45"))), PickerEvent::CalendarClose]
    );
}

#[test]
fn constraints_reclamp_cursor_without_selection() {
    let mut picker = new_picker(PickerOptions::default());
    picker.set_constraints(Constraints::default().max_date(at("2021-05-01"))).unwrap();
    assert_eq!(picker.pre_selection().cursor, at("2021-05-01"));

    picker.set_open_to_date(Some(at("2021-03-03")));
    assert_eq!(picker.pre_selection().cursor, at("2021-03-03"));

    let mut half = Constraints::default();
    half.max_time = Some(at("2021-01-01T17:00"));
    assert_eq!(picker.set_constraints(half), Err(ConstraintsError::MissingTimeBound));
    // The previous constraints stay in place.
    assert_eq!(picker.constraints().max_date, Some(at("2021-05-01")));
}

#[test]
fn localized_session() {
    let resolver = Arc::new(LocaleResolver::default());
    resolver.register("de", german());
    let mut picker = DatePicker::with_clock(
        PickerOptions::default().date_format("%-d. %B %Y"),
        Arc::new(FixedClock(at(TODAY))),
    )
    .with_resolver(Arc::clone(&resolver))
    .with_locale("de");

    assert_eq!(picker.calendar_caption(), "August 2021");
    // ISO weeks start on Monday.
    assert_eq!(picker.visible_weeks()[0].days[0], at("2021-07-26"));
    assert_eq!(picker.visible_weeks()[0].number, 30);

    let events = picker.handle_input_change("3. März 2021");
    assert_eq!(events, vec![PickerEvent::Change(Selection::Single(Some(at("2021-03-03"))))]);
    picker.handle_blur();
    picker.close_calendar();
    assert_eq!(picker.input_text(), "3. März 2021");
}

#[test]
fn default_locale_of_injected_resolver() {
    let resolver = Arc::new(LocaleResolver::default());
    resolver.register("de", german());
    resolver.set_default_locale("de");

    let picker = DatePicker::with_clock(
        PickerOptions::default().calendar_format("%B"),
        Arc::new(FixedClock(at("2021-03-01"))),
    )
    .with_resolver(Arc::clone(&resolver));
    assert_eq!(picker.calendar_caption(), "März");

    let value = at("2021-10-04");
    assert_eq!(
        resolver.format(value, "%A %-d. %b", None),
        resolver.format(value, "%A %-d. %b", Some(&"de".into()))
    );
}

#[test]
fn highlighted_days() {
    let d1 = at("2021-08-05");
    let picker = new_picker(PickerOptions::default()).with_highlight_dates(&[
        HighlightEntry::Date(d1),
        HighlightEntry::labeled("a", [d1]),
        HighlightEntry::Date(d1),
    ]);
    assert_eq!(picker.highlights().labels(at("2021-08-05T18:00")), ["highlighted", "a"]);
    assert!(!picker.highlights().is_highlighted(at("2021-08-06")));
}

#[test]
fn clear_and_time_selection() {
    let mut picker = new_picker(PickerOptions::default().show_time_select(true))
        .with_selection(Selection::Single(Some(at("2021-08-10T09:45"))));

    picker.open_calendar();
    // With a time list the calendar stays open after a day click.
    let events = picker.handle_select(at("2021-08-12"));
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Single(Some(at("2021-08-12T09:45")))),
            PickerEvent::Select(Some(at("2021-08-12T09:45"))),
        ]
    );
    assert!(picker.is_calendar_open());

    let events = picker.handle_time_change(at("2000-01-01T16:30"));
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Single(Some(at("2021-08-12T16:30")))),
            PickerEvent::CalendarClose,
        ]
    );

    assert_eq!(picker.clear(), vec![PickerEvent::Change(Selection::Single(None))]);
    assert_eq!(picker.input_text(), "");
}

#[test]
fn read_only_picker_stays_closed() {
    let mut picker = new_picker(PickerOptions::default().read_only(true).start_open(true));
    assert!(!picker.is_calendar_open());
    assert!(picker.open_calendar().is_empty());
    assert!(picker.handle_key("ArrowDown").is_empty());
}

#[test]
fn time_list_cannot_pick_disabled_values() {
    let constraints = Constraints::default()
        .min_date(at("2021-08-25"))
        .time_range(at("2000-01-01T09:00"), at("2000-01-01T17:00"));
    let mut picker = new_picker(PickerOptions::default().show_time_select(true))
        .with_constraints(constraints)
        .unwrap();
    picker.open_calendar();

    // Without a selection the time lands on today, which is before min_date.
    assert!(picker.handle_time_change(at("2000-01-01T10:00")).is_empty());
    assert_eq!(*picker.selection(), Selection::Single(None));

    picker.handle_select(at("2021-08-26"));
    // Outside of the time range.
    assert!(picker.handle_time_change(at("2000-01-01T20:00")).is_empty());
    assert_eq!(*picker.selection(), Selection::Single(Some(at("2021-08-26"))));

    let events = picker.handle_time_change(at("2000-01-01T16:30"));
    assert_eq!(
        events,
        vec![
            PickerEvent::Change(Selection::Single(Some(at("2021-08-26T16:30")))),
            PickerEvent::CalendarClose,
        ]
    );
}

#[test]
fn typing_a_time_in_time_only_mode() {
    let mut picker =
        new_picker(PickerOptions::default().show_time_select_only(true).date_format("%H:%M"));

    let events = picker.handle_input_change("14:30");
    assert_eq!(events, vec![PickerEvent::Change(Selection::Single(Some(at("2021-08-18T14:30"))))]);

    assert!(picker.handle_input_change("14:3").is_empty());
    assert!(picker.handle_input_change("24:00").is_empty());
    assert_eq!(*picker.selection(), Selection::Single(Some(at("2021-08-18T14:30"))));
}
