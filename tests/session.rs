use std::time::{Duration, Instant};

use solar_economics_toolbox::{
    economics::{EconomicsError, InputBounds, InputPolicy, SolarConstants, SolarInput},
    i18n::Translator,
    session::{CalculatorSession, NarrativeState},
};

const DELAY: Duration = Duration::from_millis(2000);

fn session() -> CalculatorSession {
    CalculatorSession::new(
        SolarInput::default(),
        InputPolicy::Reject,
        InputBounds::default(),
        SolarConstants::spain(),
        DELAY,
    )
}

#[test]
fn report_appears_only_after_delay() {
    let tr = Translator::new("en");
    let mut s = session();
    let t0 = Instant::now();
    assert!(s.request_report(t0));
    assert!(!s.can_request_report());
    assert!(!s.poll(t0 + Duration::from_millis(1999), &tr));
    assert!(s.report().is_none());
    assert_eq!(s.remaining(t0 + Duration::from_millis(500)), Some(Duration::from_millis(1500)));
    assert!(s.poll(t0 + DELAY, &tr));
    let report = s.report().expect("report ready");
    assert!(report.summary.contains("6.8 kWp"));
}

#[test]
fn input_change_during_delay_discards_pending_report() {
    let tr = Translator::new("en");
    let mut s = session();
    let t0 = Instant::now();
    s.request_report(t0);
    s.set_monthly_bill(300.0);
    assert_eq!(s.narrative(), &NarrativeState::Idle);
    assert!(!s.poll(t0 + DELAY * 2, &tr));
    assert!(s.report().is_none());
    assert!(s.can_request_report());
}

#[test]
fn setting_same_value_keeps_report() {
    let tr = Translator::new("en");
    let mut s = session();
    let t0 = Instant::now();
    s.request_report(t0);
    s.poll(t0 + DELAY, &tr);
    let generation = s.generation();
    s.set_monthly_bill(150.0);
    s.set_sun_hours(5.0);
    assert_eq!(s.generation(), generation);
    assert!(s.report().is_some());
}

#[test]
fn rejected_input_blocks_report_until_fixed() {
    let mut s = session();
    s.set_sun_hours(0.0);
    assert!(matches!(
        s.result(),
        Err(EconomicsError::NonPositiveInput { field: "daily_sun_hours", .. })
    ));
    assert!(!s.request_report(Instant::now()));
    s.set_sun_hours(4.0);
    assert!(s.result().is_ok());
    assert!(s.request_report(Instant::now()));
}

#[test]
fn report_uses_result_current_at_completion() {
    let tr = Translator::new("en");
    let mut s = session();
    let t0 = Instant::now();
    s.set_monthly_bill(300.0);
    s.request_report(t0);
    s.poll(t0 + DELAY, &tr);
    let report = s.report().expect("report ready");
    assert!(report.summary.contains("300€"));
}
