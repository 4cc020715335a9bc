use super::constants::SolarConstants;
use super::engine::{compute, EconomicsError, EconomicsResult, InputBounds, SolarInput};

/// 비교표 최대 행 수(상한 행 제외).
pub const MAX_SWEEP_ROWS: usize = 10_000;

/// 비교표 한 행.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub monthly_bill_amount: f64,
    pub result: EconomicsResult,
}

/// 일사 시간을 고정하고 요금 범위 전체를 `step` 간격으로 다시 계산한다.
/// 상한값은 간격에 맞지 않아도 마지막 행으로 포함한다.
pub fn bill_sweep(
    daily_sun_hours: f64,
    bounds: &InputBounds,
    step: f64,
    constants: &SolarConstants,
) -> Result<Vec<SweepRow>, EconomicsError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(EconomicsError::NonPositiveInput {
            field: "sweep_step",
            value: step,
        });
    }
    let span = (bounds.bill_max - bounds.bill_min).max(0.0);
    let intervals = (span / step).floor();
    if !intervals.is_finite()
        || intervals >= MAX_SWEEP_ROWS as f64
        || bounds.bill_min + step == bounds.bill_min
    {
        return Err(EconomicsError::SweepStepTooSmall {
            step,
            max_rows: MAX_SWEEP_ROWS,
        });
    }
    let mut rows = Vec::with_capacity(intervals as usize + 2);
    for i in 0..=intervals as u32 {
        let bill = bounds.bill_min + step * f64::from(i);
        if bill > bounds.bill_max {
            break;
        }
        rows.push(row(bill, daily_sun_hours, constants)?);
    }
    let last_is_max = rows
        .last()
        .map(|r| (r.monthly_bill_amount - bounds.bill_max).abs() < 1e-9)
        .unwrap_or(false);
    if !last_is_max && bounds.bill_max >= bounds.bill_min {
        rows.push(row(bounds.bill_max, daily_sun_hours, constants)?);
    }
    Ok(rows)
}

fn row(
    bill: f64,
    daily_sun_hours: f64,
    constants: &SolarConstants,
) -> Result<SweepRow, EconomicsError> {
    let result = compute(
        SolarInput {
            monthly_bill_amount: bill,
            daily_sun_hours,
        },
        constants,
    )?;
    Ok(SweepRow {
        monthly_bill_amount: bill,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_range_inclusive() {
        let rows = bill_sweep(5.0, &InputBounds::default(), 50.0, &SolarConstants::spain()).unwrap();
        assert_eq!(rows.len(), 12);
        assert_eq!(rows.first().unwrap().monthly_bill_amount, 50.0);
        assert_eq!(rows.last().unwrap().monthly_bill_amount, 600.0);
    }

    #[test]
    fn uneven_step_still_ends_at_maximum() {
        let rows = bill_sweep(5.0, &InputBounds::default(), 100.0, &SolarConstants::spain()).unwrap();
        let bills: Vec<f64> = rows.iter().map(|r| r.monthly_bill_amount).collect();
        assert_eq!(bills, vec![50.0, 150.0, 250.0, 350.0, 450.0, 550.0, 600.0]);
    }

    #[test]
    fn zero_step_is_rejected() {
        assert!(bill_sweep(5.0, &InputBounds::default(), 0.0, &SolarConstants::spain()).is_err());
    }

    #[test]
    fn step_too_small_to_advance_is_rejected() {
        let c = SolarConstants::spain();
        let bounds = InputBounds::default();
        for step in [1e-300, 1e-3, 0.05] {
            assert!(matches!(
                bill_sweep(5.0, &bounds, step, &c),
                Err(EconomicsError::SweepStepTooSmall { .. })
            ));
        }
    }

    #[test]
    fn step_that_does_not_change_bill_is_rejected() {
        let bounds = InputBounds {
            bill_min: 1e20,
            bill_max: 1e20,
            ..InputBounds::default()
        };
        assert!(matches!(
            bill_sweep(5.0, &bounds, 1.0, &SolarConstants::spain()),
            Err(EconomicsError::SweepStepTooSmall { .. })
        ));
    }

    #[test]
    fn finest_allowed_step_stays_under_row_cap() {
        let rows = bill_sweep(5.0, &InputBounds::default(), 0.1, &SolarConstants::spain()).unwrap();
        assert!(rows.len() <= MAX_SWEEP_ROWS + 1);
        assert!((rows.last().unwrap().monthly_bill_amount - 600.0).abs() < 1e-9);
    }
}
