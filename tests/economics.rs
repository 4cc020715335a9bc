use approx::assert_relative_eq;
use solar_economics_toolbox::{
    economics::{
        bill_sweep, compute, format_one_decimal, monthly_loan_payment, narrate, EconomicsError,
        EconomicsResult, InputBounds, Report, ReportFigures, SolarConstants, SolarInput, Verdict,
    },
    i18n::Translator,
};

fn input(bill: f64, sun: f64) -> SolarInput {
    SolarInput {
        monthly_bill_amount: bill,
        daily_sun_hours: sun,
    }
}

fn spain(bill: f64, sun: f64) -> EconomicsResult {
    compute(input(bill, sun), &SolarConstants::spain()).expect("valid input")
}

fn bill_grid() -> impl Iterator<Item = f64> {
    (0..=55).map(|i| 50.0 + 10.0 * f64::from(i))
}

fn sun_grid() -> impl Iterator<Item = f64> {
    (0..=14).map(|i| 3.0 + 0.5 * f64::from(i))
}

#[test]
fn spain_reference_scenario() {
    let r = spain(150.0, 5.0);
    assert_eq!(r.panel_count, 15);
    assert_relative_eq!(r.system_size_kw, 6.75, max_relative = 1e-12);
    assert_relative_eq!(r.total_system_cost, 7425.0, max_relative = 1e-12);
    assert_relative_eq!(r.initial_annual_savings, 1800.0, max_relative = 1e-12);
    assert_relative_eq!(r.payback_years, 4.125, max_relative = 1e-12);
    assert_relative_eq!(r.roi_percent, 506.060_606_06, max_relative = 1e-9);
    assert_relative_eq!(r.annual_co2_saved_kg, 2700.0, max_relative = 1e-12);
    assert_relative_eq!(r.annual_trees_equivalent, 121.5, max_relative = 1e-12);
    assert_relative_eq!(
        r.net_monthly_cash_flow,
        r.initial_monthly_savings - r.monthly_loan_payment,
        max_relative = 1e-12
    );
}

#[test]
fn identical_inputs_give_bit_identical_results() {
    for bill in bill_grid() {
        let a = spain(bill, 4.5);
        let b = spain(bill, 4.5);
        assert_eq!(a, b);
        assert_eq!(a.roi_percent.to_bits(), b.roi_percent.to_bits());
        assert_eq!(a.monthly_loan_payment.to_bits(), b.monthly_loan_payment.to_bits());
    }
}

#[test]
fn panel_count_is_smallest_covering_integer() {
    let c = SolarConstants::spain();
    for bill in bill_grid() {
        for sun in sun_grid() {
            let r = spain(bill, sun);
            let needed_w = r.required_capacity_kw * 1000.0;
            let n = f64::from(r.panel_count);
            assert!(n * c.panel_rated_wattage >= needed_w - 1e-9, "bill={bill} sun={sun}");
            assert!((n - 1.0) * c.panel_rated_wattage < needed_w, "bill={bill} sun={sun}");
            assert!(r.system_size_kw + 1e-12 >= r.required_capacity_kw);
        }
    }
}

#[test]
fn larger_bill_never_shrinks_the_system() {
    for sun in sun_grid() {
        let mut prev: Option<EconomicsResult> = None;
        for bill in bill_grid() {
            let r = spain(bill, sun);
            if let Some(p) = &prev {
                assert!(r.panel_count >= p.panel_count, "bill={bill} sun={sun}");
                assert!(r.total_system_cost >= p.total_system_cost);
                assert!(r.initial_annual_savings > p.initial_annual_savings);
                assert!(r.annual_co2_saved_kg > p.annual_co2_saved_kg);
            }
            prev = Some(r);
        }
    }
}

#[test]
fn more_sun_never_grows_the_system() {
    for bill in bill_grid() {
        let mut prev: Option<EconomicsResult> = None;
        for sun in sun_grid() {
            let r = spain(bill, sun);
            if let Some(p) = &prev {
                assert!(r.panel_count <= p.panel_count, "bill={bill} sun={sun}");
                assert!(r.required_capacity_kw < p.required_capacity_kw);
                assert_eq!(r.initial_annual_savings, p.initial_annual_savings);
            }
            prev = Some(r);
        }
    }
}

#[test]
fn zero_rate_spreads_cost_evenly_over_term() {
    let c = SolarConstants {
        annual_financing_rate: 0.0,
        ..SolarConstants::spain()
    };
    let r = compute(input(150.0, 5.0), &c).unwrap();
    assert_eq!(r.monthly_loan_payment, r.total_system_cost / 120.0);
    assert!(r.monthly_loan_payment.is_finite());
}

#[test]
fn loan_payment_repays_principal_with_interest() {
    let r = spain(300.0, 5.0);
    let paid = r.monthly_loan_payment * 120.0;
    assert!(paid > r.total_system_cost);
    assert_relative_eq!(
        r.monthly_loan_payment,
        monthly_loan_payment(r.total_system_cost, 0.065, 10),
        max_relative = 1e-12
    );
}

#[test]
fn verdict_thresholds() {
    assert_eq!(Verdict::classify(0.5), Verdict::Excellent);
    assert_eq!(Verdict::classify(4.999_999), Verdict::Excellent);
    assert_eq!(Verdict::classify(5.0), Verdict::VeryGood);
    assert_eq!(Verdict::classify(7.999), Verdict::VeryGood);
    assert_eq!(Verdict::classify(8.0), Verdict::Good);
    assert_eq!(Verdict::classify(25.0), Verdict::Good);
    assert_eq!(Verdict::classify(f64::NAN), Verdict::Good);
}

#[test]
fn spain_scenario_verdict_is_excellent() {
    let tr = Translator::new("en");
    let report = narrate(&spain(150.0, 5.0), "€", &tr);
    assert_eq!(report.verdict, Verdict::Excellent);
    assert_eq!(report.verdict_label, "Excellent investment");
}

#[test]
fn report_figures_stay_within_rounding_of_raw_values() {
    for bill in bill_grid() {
        for sun in sun_grid() {
            let r = spain(bill, sun);
            let f = ReportFigures::from_result(&r);
            assert!((f.roi_percent as f64 - r.roi_percent).abs() <= 0.5);
            assert!((f.monthly_loan_payment as f64 - r.monthly_loan_payment).abs() <= 0.5);
            assert!((f.initial_monthly_savings as f64 - r.initial_monthly_savings).abs() <= 0.5);
            assert!((f.co2_tonnes as f64 - r.annual_co2_saved_kg / 1000.0).abs() <= 0.5);
            assert!((f.trees as f64 - r.annual_trees_equivalent).abs() <= 0.5);
            assert!((f.payback_years - r.payback_years).abs() <= 0.05 + 1e-9);
            assert!((f.system_size_kw - r.system_size_kw).abs() <= 0.05 + 1e-9);
        }
    }
}

#[test]
fn report_details_follow_cash_flow_environment_payback_order() {
    let tr = Translator::new("en");
    let report = narrate(&spain(150.0, 5.0), "€", &tr);
    assert!(report.details[Report::CASH_FLOW].contains("/month"));
    assert!(report.details[Report::ENVIRONMENT].contains("CO₂"));
    assert!(report.details[Report::PAYBACK].contains("4.1 years"));
    assert!(report.summary.contains("506%"));
}

#[test]
fn sweep_rows_match_single_computations() {
    let bounds = InputBounds::default();
    let rows = bill_sweep(5.0, &bounds, 50.0, &SolarConstants::spain()).unwrap();
    assert_eq!(rows.first().map(|r| r.monthly_bill_amount), Some(50.0));
    assert_eq!(rows.last().map(|r| r.monthly_bill_amount), Some(600.0));
    for row in &rows {
        assert_eq!(row.result, spain(row.monthly_bill_amount, 5.0));
    }
}

#[test]
fn extreme_positive_inputs_either_cover_demand_or_fail_typed() {
    let c = SolarConstants::spain();
    let bills = [1e-300, 1e-9, 1.0, 1e6, 1e9, 4.0e10, 1e12, 1e300, f64::MAX];
    let suns = [5e-324, 1e-300, 1e-6, 0.5, 5.0, 24.0, 1e300];
    for bill in bills {
        for sun in suns {
            match compute(input(bill, sun), &c) {
                Ok(r) => {
                    let n = f64::from(r.panel_count);
                    assert!(r.panel_count >= 1, "bill={bill} sun={sun}");
                    assert!(
                        n * c.panel_rated_wattage >= r.required_capacity_kw * 1000.0 - 1e-9,
                        "bill={bill} sun={sun}"
                    );
                    assert!(r.system_size_kw.is_finite());
                    assert!(r.total_system_cost.is_finite());
                }
                Err(e) => assert!(
                    matches!(e, EconomicsError::CapacityOutOfRange { .. }),
                    "bill={bill} sun={sun} err={e}"
                ),
            }
        }
    }
}

#[test]
fn vanishing_sun_hours_overflow_to_typed_error() {
    let r = compute(input(150.0, 5e-324), &SolarConstants::spain());
    assert!(matches!(r, Err(EconomicsError::CapacityOutOfRange { required_kw }) if required_kw.is_infinite()));
}

#[test]
fn microscopic_bill_gets_single_panel() {
    let r = spain(1e-300, 5.0);
    assert_eq!(r.panel_count, 1);
    assert!(r.payback_years.is_infinite() || r.payback_years > 1e200);
    assert_eq!(Verdict::classify(r.payback_years), Verdict::Good);
}

#[test]
fn bill_beyond_panel_count_range_is_rejected() {
    assert!(matches!(
        compute(input(1e12, 5.0), &SolarConstants::spain()),
        Err(EconomicsError::CapacityOutOfRange { .. })
    ));
}

#[test]
fn report_one_decimal_figures_match_display_formatting() {
    let tr = Translator::new("en");
    for bill in bill_grid() {
        for sun in sun_grid() {
            let r = spain(bill, sun);
            let report = narrate(&r, "€", &tr);
            let size = format!("{} kWp", format_one_decimal(r.system_size_kw));
            assert!(report.summary.contains(&size), "{} / {size}", report.summary);
        }
    }
    let r = spain(50.0, 3.5);
    assert!(narrate(&r, "€", &tr).summary.contains("3.1 kWp"));
}

#[test]
fn sweep_rejects_step_too_fine_to_finish() {
    let bounds = InputBounds::default();
    assert!(matches!(
        bill_sweep(5.0, &bounds, 1e-300, &SolarConstants::spain()),
        Err(EconomicsError::SweepStepTooSmall { .. })
    ));
}
