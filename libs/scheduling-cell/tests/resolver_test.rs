use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use organization_cell::models::{DateException, OrganizationHours};
use professional_cell::models::ProfessionalAvailability;
use scheduling_cell::models::{ClosedReason, DayWindow};
use scheduling_cell::services::resolver::{resolve_window, weekday_index};

// 2025-03-10 is a Monday
const MONDAY: &str = "2025-03-10";
const SUNDAY: &str = "2025-03-09";

fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn weekly_row(day_of_week: i32, start: &str, end: &str) -> ProfessionalAvailability {
    ProfessionalAvailability {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        professional_id: Uuid::new_v4(),
        day_of_week,
        start_time: time(start),
        end_time: time(end),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn closed_exception(on: &str, professional_id: Option<Uuid>) -> DateException {
    DateException {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        professional_id,
        date: date(on),
        is_closed: true,
        special_open: None,
        special_close: None,
        reason: None,
        created_at: Utc::now(),
    }
}

fn special_hours_exception(
    on: &str,
    professional_id: Option<Uuid>,
    open: &str,
    close: &str,
) -> DateException {
    DateException {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        professional_id,
        date: date(on),
        is_closed: false,
        special_open: Some(time(open)),
        special_close: Some(time(close)),
        reason: None,
        created_at: Utc::now(),
    }
}

/// 09:00-18:00 Monday through Friday, closed on weekends.
fn weekday_hours() -> OrganizationHours {
    let nine = Some(time("09:00"));
    let eighteen = Some(time("18:00"));
    OrganizationHours {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        timezone: "America/Sao_Paulo".to_string(),
        sunday_open: None,
        sunday_close: None,
        monday_open: nine,
        monday_close: eighteen,
        tuesday_open: nine,
        tuesday_close: eighteen,
        wednesday_open: nine,
        wednesday_close: eighteen,
        thursday_open: nine,
        thursday_close: eighteen,
        friday_open: nine,
        friday_close: eighteen,
        saturday_open: None,
        saturday_close: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn weekday_index_follows_sunday_zero_convention() {
    assert_eq!(weekday_index(date(SUNDAY)), 0);
    assert_eq!(weekday_index(date(MONDAY)), 1);
    assert_eq!(weekday_index(date("2025-03-15")), 6);
}

#[test]
fn open_day_intersects_weekly_schedule_with_org_hours() {
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("10:00"),
            closes_at: time("16:00"),
        }
    );
}

#[test]
fn intersection_takes_latest_open_and_earliest_close() {
    let weekly = vec![weekly_row(1, "08:00", "14:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("09:00"),
            closes_at: time("14:00"),
        }
    );
}

#[test]
fn professional_day_off_wins_over_everything() {
    let professional_id = Uuid::new_v4();
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    // Even an org-wide exception opening special hours cannot override the
    // professional's own day off
    let exceptions = vec![
        special_hours_exception(MONDAY, None, "08:00", "20:00"),
        closed_exception(MONDAY, Some(professional_id)),
    ];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::ProfessionalDayOff,
        }
    );
}

#[test]
fn professional_special_window_overrides_org_holiday() {
    let professional_id = Uuid::new_v4();
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let exceptions = vec![
        closed_exception(MONDAY, None),
        special_hours_exception(MONDAY, Some(professional_id), "11:00", "15:00"),
    ];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("11:00"),
            closes_at: time("15:00"),
        }
    );
}

#[test]
fn org_holiday_closes_a_scheduled_professional() {
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let exceptions = vec![closed_exception(MONDAY, None)];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::OrganizationHoliday,
        }
    );
}

#[test]
fn org_special_hours_apply_as_given() {
    // The special window replaces the day's hours outright; the weekly
    // schedule does not shrink it further
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let exceptions = vec![special_hours_exception(MONDAY, None, "09:30", "14:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("09:30"),
            closes_at: time("14:00"),
        }
    );
}

#[test]
fn no_weekly_row_means_not_scheduled() {
    let weekly = vec![weekly_row(2, "10:00", "16:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::ProfessionalNotScheduled,
        }
    );
}

#[test]
fn org_closed_weekday_closes_the_day() {
    // Professional would work Sundays, but the salon never opens then
    let weekly = vec![weekly_row(0, "10:00", "16:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(SUNDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::OrganizationClosed,
        }
    );
}

#[test]
fn missing_hours_row_never_defaults_open() {
    let weekly = vec![weekly_row(1, "10:00", "16:00")];

    let window = resolve_window(date(MONDAY), &weekly, &[], None);

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::HoursNotConfigured,
        }
    );
}

#[test]
fn disjoint_windows_close_the_day() {
    let weekly = vec![weekly_row(1, "19:00", "22:00")];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Closed {
            reason: ClosedReason::ProfessionalNotScheduled,
        }
    );
}

#[test]
fn duplicate_weekday_rows_collapse_to_earliest_start() {
    let weekly = vec![
        weekly_row(1, "11:00", "17:00"),
        weekly_row(1, "10:00", "16:00"),
    ];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &[], Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("10:00"),
            closes_at: time("16:00"),
        }
    );
}

#[test]
fn exceptions_on_other_dates_are_ignored() {
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let exceptions = vec![closed_exception("2025-03-11", None)];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert!(window.is_open());
}

#[test]
fn malformed_open_exception_falls_through() {
    // is_closed = false but no special window: treated as absent
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let exceptions = vec![DateException {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        professional_id: None,
        date: date(MONDAY),
        is_closed: false,
        special_open: None,
        special_close: None,
        reason: None,
        created_at: Utc::now(),
    }];
    let hours = weekday_hours();

    let window = resolve_window(date(MONDAY), &weekly, &exceptions, Some(&hours));

    assert_eq!(
        window,
        DayWindow::Open {
            opens_at: time("10:00"),
            closes_at: time("16:00"),
        }
    );
}

#[test]
fn exception_precedence_ignores_input_order() {
    let professional_id = Uuid::new_v4();
    let weekly = vec![weekly_row(1, "10:00", "16:00")];
    let hours = weekday_hours();

    let forward = vec![
        closed_exception(MONDAY, None),
        special_hours_exception(MONDAY, Some(professional_id), "11:00", "15:00"),
    ];
    let mut reversed = forward.clone();
    reversed.reverse();

    let first = resolve_window(date(MONDAY), &weekly, &forward, Some(&hours));
    let second = resolve_window(date(MONDAY), &weekly, &reversed, Some(&hours));

    assert_eq!(first, second);
    assert_eq!(
        first,
        DayWindow::Open {
            opens_at: time("11:00"),
            closes_at: time("15:00"),
        }
    );
}
