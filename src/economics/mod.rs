//! 태양광 경제성 계산 엔진과 리포트 생성기.

pub mod amortization;
pub mod constants;
pub mod engine;
pub mod narrator;
pub mod sweep;

pub use amortization::{monthly_loan_payment, total_interest};
pub use constants::{RegionPreset, SolarConstants};
pub use engine::{
    compute, compute_with_policy, prepare_input, EconomicsError, EconomicsResult, InputBounds,
    InputPolicy, SolarInput,
};
pub use narrator::{format_one_decimal, narrate, Report, ReportFigures, Verdict};
pub use sweep::{bill_sweep, SweepRow};
