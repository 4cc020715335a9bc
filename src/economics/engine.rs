use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::amortization::monthly_loan_payment;
use super::constants::SolarConstants;

/// 경제성 계산 중 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EconomicsError {
    /// NaN 또는 무한대 입력
    #[error("{field} must be a finite number (got {value})")]
    NonFiniteInput { field: &'static str, value: f64 },
    /// 0 이하 입력
    #[error("{field} must be greater than 0 (got {value})")]
    NonPositiveInput { field: &'static str, value: f64 },
    /// 상수 테이블 오류
    #[error("invalid constant {field}: {reason}")]
    InvalidConstant {
        field: &'static str,
        reason: &'static str,
    },
    /// 필요 용량이 패널 장수(u32)로 표현할 수 없을 만큼 큼
    #[error("required capacity {required_kw} kWp exceeds the supported panel count")]
    CapacityOutOfRange { required_kw: f64 },
    /// 비교표 간격이 너무 작아 행 수가 한도를 넘음
    #[error("sweep step {step} is too small (at most {max_rows} rows)")]
    SweepStepTooSmall { step: f64, max_rows: usize },
}

/// 사용자 입력 두 가지.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarInput {
    /// 월 전기요금 [통화]
    pub monthly_bill_amount: f64,
    /// 일평균 일사 시간 [h/day]
    pub daily_sun_hours: f64,
}

impl Default for SolarInput {
    fn default() -> Self {
        Self {
            monthly_bill_amount: 150.0,
            daily_sun_hours: 5.0,
        }
    }
}

/// 범위를 벗어난 입력을 어떻게 다룰지 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputPolicy {
    /// 0 이하/비유한 입력을 오류로 거부한다.
    Reject,
    /// 최소값(슬라이더 하한)으로 끌어올린 뒤 계산한다.
    Clamp,
}

impl Default for InputPolicy {
    fn default() -> Self {
        InputPolicy::Reject
    }
}

/// 입력 슬라이더 범위와 간격.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBounds {
    pub bill_min: f64,
    pub bill_max: f64,
    pub bill_step: f64,
    pub sun_min: f64,
    pub sun_max: f64,
    pub sun_step: f64,
}

impl Default for InputBounds {
    fn default() -> Self {
        Self {
            bill_min: 50.0,
            bill_max: 600.0,
            bill_step: 10.0,
            sun_min: 3.0,
            sun_max: 10.0,
            sun_step: 0.5,
        }
    }
}

impl InputBounds {
    /// 하한 미만 값은 하한으로, NaN은 하한으로, +∞는 상한으로 보정한다.
    /// 상한을 넘는 유한값은 유효 입력이므로 그대로 둔다.
    pub fn clamp(&self, input: SolarInput) -> SolarInput {
        SolarInput {
            monthly_bill_amount: clamp_low(input.monthly_bill_amount, self.bill_min, self.bill_max),
            daily_sun_hours: clamp_low(input.daily_sun_hours, self.sun_min, self.sun_max),
        }
    }
}

fn clamp_low(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else if value == f64::INFINITY {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// 경제성 계산 결과. 입력과 상수의 순수 함수이며 매 계산마다 통째로 교체된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicsResult {
    /// 계산에 실제로 사용된 입력
    pub input: SolarInput,
    /// 월 사용량 [kWh]
    pub monthly_kwh: f64,
    /// 연 사용량 [kWh]
    pub annual_kwh: f64,
    /// 필요 설비 용량 [kWp]
    pub required_capacity_kw: f64,
    /// 패널 장수(올림)
    pub panel_count: u32,
    /// 설비 용량 [kWp], 패널 장수에서 유도
    pub system_size_kw: f64,
    /// 총 설치비 [통화]
    pub total_system_cost: f64,
    /// 월 대출 상환액 [통화]
    pub monthly_loan_payment: f64,
    /// 1년차 연간 절감액 [통화]
    pub initial_annual_savings: f64,
    /// 1년차 월 절감액 [통화]
    pub initial_monthly_savings: f64,
    /// 월 순현금흐름(음수 가능)
    pub net_monthly_cash_flow: f64,
    /// 단순 회수기간 [년]
    pub payback_years: f64,
    /// 평가 기간 ROI [%]
    pub roi_percent: f64,
    /// 연간 CO₂ 감축량 [kg]
    pub annual_co2_saved_kg: f64,
    /// 연간 나무 환산 그루 수
    pub annual_trees_equivalent: f64,
}

/// 월 전기요금과 일사 시간으로 설비 규모, 금융, 회수기간, ROI, 환경 효과를 계산한다.
///
/// 절감액/회수기간/ROI는 1년차(열화 미반영) 발전량을 그대로 쓴다.
/// 계산 순서는 기준 결과와 비트 단위로 일치하도록 고정되어 있다.
pub fn compute(
    input: SolarInput,
    constants: &SolarConstants,
) -> Result<EconomicsResult, EconomicsError> {
    validate_input("monthly_bill_amount", input.monthly_bill_amount)?;
    validate_input("daily_sun_hours", input.daily_sun_hours)?;
    constants.validate()?;

    let c = constants;
    // 1~2. 사용량
    let monthly_kwh = input.monthly_bill_amount / c.electricity_unit_price;
    let annual_kwh = monthly_kwh * 12.0;

    // 3~5. 설비 사이징 (패널 단위 올림)
    let required_capacity_kw =
        annual_kwh / (input.daily_sun_hours * 365.0 * c.system_derating_factor);
    let panel_count = panel_count(required_capacity_kw, c.panel_rated_wattage)?;
    let system_size_kw = f64::from(panel_count) * c.panel_rated_wattage / 1000.0;

    // 6~7. 비용과 금융
    let total_system_cost = system_size_kw * c.installed_cost_per_kw;
    let monthly_loan_payment = monthly_loan_payment(
        total_system_cost,
        c.annual_financing_rate,
        c.financing_term_years,
    );

    // 8~11. 절감액, 회수기간, ROI
    let initial_annual_savings = annual_kwh * c.electricity_unit_price;
    let initial_monthly_savings = initial_annual_savings / 12.0;
    let net_monthly_cash_flow = initial_monthly_savings - monthly_loan_payment;
    let payback_years = total_system_cost / initial_annual_savings;
    let horizon = f64::from(c.evaluation_horizon_years);
    let roi_percent =
        ((initial_annual_savings * horizon - total_system_cost) / total_system_cost) * 100.0;

    // 12~13. 환경 효과
    let annual_co2_saved_kg = annual_kwh * c.co2_per_kwh;
    let annual_trees_equivalent = (annual_co2_saved_kg / 1000.0) * c.trees_per_ton_co2;

    Ok(EconomicsResult {
        input,
        monthly_kwh,
        annual_kwh,
        required_capacity_kw,
        panel_count,
        system_size_kw,
        total_system_cost,
        monthly_loan_payment,
        initial_annual_savings,
        initial_monthly_savings,
        net_monthly_cash_flow,
        payback_years,
        roi_percent,
        annual_co2_saved_kg,
        annual_trees_equivalent,
    })
}

/// 정책에 따라 입력을 정리한다. Reject는 그대로 두고 compute에서 검증한다.
pub fn prepare_input(input: SolarInput, policy: InputPolicy, bounds: &InputBounds) -> SolarInput {
    match policy {
        InputPolicy::Reject => input,
        InputPolicy::Clamp => {
            let clamped = bounds.clamp(input);
            if clamped != input {
                tracing::debug!(?input, ?clamped, "input clamped to slider bounds");
            }
            clamped
        }
    }
}

/// 입력 정책을 적용한 뒤 계산한다.
pub fn compute_with_policy(
    input: SolarInput,
    policy: InputPolicy,
    bounds: &InputBounds,
    constants: &SolarConstants,
) -> Result<EconomicsResult, EconomicsError> {
    compute(prepare_input(input, policy, bounds), constants)
}

/// 필요 용량을 덮는 최소 패널 장수(최소 1장).
fn panel_count(required_capacity_kw: f64, panel_rated_wattage: f64) -> Result<u32, EconomicsError> {
    let panels = (required_capacity_kw * 1000.0 / panel_rated_wattage).ceil();
    if !panels.is_finite() || panels > f64::from(u32::MAX) {
        return Err(EconomicsError::CapacityOutOfRange {
            required_kw: required_capacity_kw,
        });
    }
    Ok((panels as u32).max(1))
}

fn validate_input(field: &'static str, value: f64) -> Result<(), EconomicsError> {
    if !value.is_finite() {
        return Err(EconomicsError::NonFiniteInput { field, value });
    }
    if value <= 0.0 {
        return Err(EconomicsError::NonPositiveInput { field, value });
    }
    Ok(())
}
