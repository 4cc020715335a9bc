use crate::i18n::{keys, Translator};

use super::engine::EconomicsResult;

/// 회수기간 기준 3단계 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 회수기간 5년 미만
    Excellent,
    /// 5년 이상 8년 미만
    VeryGood,
    /// 8년 이상(NaN 포함)
    Good,
}

impl Verdict {
    pub const EXCELLENT_BELOW_YEARS: f64 = 5.0;
    pub const VERY_GOOD_BELOW_YEARS: f64 = 8.0;

    /// 회수기간으로 판정한다. 정확히 5.0은 VeryGood, 8.0은 Good이다.
    pub fn classify(payback_years: f64) -> Self {
        if payback_years < Self::EXCELLENT_BELOW_YEARS {
            Verdict::Excellent
        } else if payback_years < Self::VERY_GOOD_BELOW_YEARS {
            Verdict::VeryGood
        } else {
            Verdict::Good
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Verdict::Excellent => keys::REPORT_VERDICT_EXCELLENT,
            Verdict::VeryGood => keys::REPORT_VERDICT_VERY_GOOD,
            Verdict::Good => keys::REPORT_VERDICT_GOOD,
        }
    }
}

/// 반올림(0.5는 올림). 계산기 화면과 같은 규칙.
///
/// `value + 0.5`를 거치지 않고 소수부를 직접 비교한다. 0.49999999999999994도 0이 된다.
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// 이진 값 그대로 소수 첫째 자리까지 표시한다. 정확히 중간(x.x5)이면 0에서 먼 쪽으로 올린다.
///
/// 3.15 kWp는 이진수로 3.1499...이므로 "3.1", 6.75는 정확한 중간값이므로 "6.8".
pub fn format_one_decimal(value: f64) -> String {
    // 소수부가 정확히 .25/.75인 경우만 둘째 자리가 5로 끝나는 동률이다.
    let is_tie = value.is_finite() && (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if is_tie {
        format!("{:.1}", (value * 10.0).abs().ceil().copysign(value) / 10.0)
    } else {
        format!("{value:.1}")
    }
}

/// `format_one_decimal`로 표시되는 값.
pub fn round_one_decimal(value: f64) -> f64 {
    format_one_decimal(value).parse().unwrap_or(value)
}

/// 리포트 문장에 들어가는 반올림된 수치 모음.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportFigures {
    pub monthly_bill_amount: f64,
    pub daily_sun_hours: f64,
    pub system_size_kw: f64,
    pub roi_percent: i64,
    pub monthly_loan_payment: i64,
    pub initial_monthly_savings: i64,
    pub co2_tonnes: i64,
    pub trees: i64,
    pub payback_years: f64,
}

impl ReportFigures {
    pub fn from_result(result: &EconomicsResult) -> Self {
        Self {
            monthly_bill_amount: result.input.monthly_bill_amount,
            daily_sun_hours: result.input.daily_sun_hours,
            system_size_kw: round_one_decimal(result.system_size_kw),
            roi_percent: round_half_up(result.roi_percent) as i64,
            monthly_loan_payment: round_half_up(result.monthly_loan_payment) as i64,
            initial_monthly_savings: round_half_up(result.initial_monthly_savings) as i64,
            co2_tonnes: round_half_up(result.annual_co2_saved_kg / 1000.0) as i64,
            trees: round_half_up(result.annual_trees_equivalent) as i64,
            payback_years: round_one_decimal(result.payback_years),
        }
    }
}

/// 판정 + 요약 + 세부 문장 3개(현금흐름, 환경, 회수기간 순).
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub verdict: Verdict,
    pub verdict_label: String,
    pub summary: String,
    pub details: [String; 3],
}

impl Report {
    pub const CASH_FLOW: usize = 0;
    pub const ENVIRONMENT: usize = 1;
    pub const PAYBACK: usize = 2;

    /// 텍스트 파일/터미널 출력용 렌더링.
    pub fn to_text(&self, tr: &Translator) -> String {
        let mut out = format!(
            "{}: {}\n\n{}\n",
            tr.t(keys::REPORT_VERDICT_LABEL),
            self.verdict_label,
            self.summary
        );
        for detail in &self.details {
            out.push_str("\n- ");
            out.push_str(detail);
        }
        out.push('\n');
        out
    }
}

/// 계산 결과를 사람이 읽는 판정 리포트로 바꾼다. 지연 없이 즉시 반환한다.
pub fn narrate(result: &EconomicsResult, currency: &str, tr: &Translator) -> Report {
    let f = ReportFigures::from_result(result);
    let verdict = Verdict::classify(result.payback_years);
    let cur = || ("currency", currency.to_string());

    let summary = format!(
        "{} {}",
        tr.fill(
            keys::REPORT_SUMMARY_BASE,
            &[
                ("bill", trim_number(f.monthly_bill_amount)),
                ("sun_hours", trim_number(f.daily_sun_hours)),
                ("size", format_one_decimal(f.system_size_kw)),
                cur(),
            ],
        ),
        tr.fill(
            keys::REPORT_SUMMARY_ROI,
            &[("roi", f.roi_percent.to_string())]
        )
    );

    let details = [
        tr.fill(
            keys::REPORT_DETAIL_CASH_FLOW,
            &[
                ("loan", f.monthly_loan_payment.to_string()),
                ("savings", f.initial_monthly_savings.to_string()),
                cur(),
            ],
        ),
        tr.fill(
            keys::REPORT_DETAIL_ENV,
            &[
                ("co2", f.co2_tonnes.to_string()),
                ("trees", f.trees.to_string()),
            ],
        ),
        tr.fill(
            keys::REPORT_DETAIL_PAYBACK,
            &[("years", format_one_decimal(f.payback_years))],
        ),
    ];

    Report {
        verdict,
        verdict_label: tr.t(verdict.key()),
        summary,
        details,
    }
}

/// 150.0 -> "150", 5.5 -> "5.5"
pub fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}
