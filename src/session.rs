//! 계산기 화면의 상호작용 상태. 입력이 바뀔 때마다 결과를 통째로 다시 계산하고,
//! 이전 입력으로 만든 리포트(및 대기 중인 리포트 생성)는 무효화한다.

use std::time::{Duration, Instant};

use crate::economics::{
    compute_with_policy, narrate, EconomicsError, EconomicsResult, InputBounds, InputPolicy,
    Report, SolarConstants, SolarInput,
};
use crate::i18n::Translator;

/// 리포트 생성 상태.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeState {
    /// 리포트 없음(생성 버튼 활성)
    Idle,
    /// 연출용 지연 대기 중
    Pending { generation: u64, ready_at: Instant },
    /// 현재 입력 세대에 대한 리포트
    Ready { generation: u64, report: Report },
}

#[derive(Debug, Clone)]
pub struct CalculatorSession {
    input: SolarInput,
    policy: InputPolicy,
    bounds: InputBounds,
    constants: SolarConstants,
    result: Result<EconomicsResult, EconomicsError>,
    generation: u64,
    narrative: NarrativeState,
    report_delay: Duration,
}

impl CalculatorSession {
    pub fn new(
        input: SolarInput,
        policy: InputPolicy,
        bounds: InputBounds,
        constants: SolarConstants,
        report_delay: Duration,
    ) -> Self {
        let result = compute_with_policy(input, policy, &bounds, &constants);
        Self {
            input,
            policy,
            bounds,
            constants,
            result,
            generation: 0,
            narrative: NarrativeState::Idle,
            report_delay,
        }
    }

    pub fn input(&self) -> SolarInput {
        self.input
    }

    /// 실제 계산에 쓰인 입력(Clamp 보정 반영). 계산 실패 시 원래 입력.
    pub fn effective_input(&self) -> SolarInput {
        match &self.result {
            Ok(r) => r.input,
            Err(_) => self.input,
        }
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    pub fn constants(&self) -> &SolarConstants {
        &self.constants
    }

    /// 입력 세대 번호. 입력/상수가 바뀔 때마다 증가한다.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> Result<&EconomicsResult, &EconomicsError> {
        self.result.as_ref()
    }

    pub fn narrative(&self) -> &NarrativeState {
        &self.narrative
    }

    pub fn set_monthly_bill(&mut self, value: f64) {
        if value.to_bits() != self.input.monthly_bill_amount.to_bits() {
            self.input.monthly_bill_amount = value;
            self.recompute();
        }
    }

    pub fn set_sun_hours(&mut self, value: f64) {
        if value.to_bits() != self.input.daily_sun_hours.to_bits() {
            self.input.daily_sun_hours = value;
            self.recompute();
        }
    }

    pub fn set_input(&mut self, input: SolarInput) {
        let same = input.monthly_bill_amount.to_bits() == self.input.monthly_bill_amount.to_bits()
            && input.daily_sun_hours.to_bits() == self.input.daily_sun_hours.to_bits();
        if !same {
            self.input = input;
            self.recompute();
        }
    }

    pub fn set_constants(&mut self, constants: SolarConstants) {
        if constants != self.constants {
            self.constants = constants;
            self.recompute();
        }
    }

    pub fn set_policy(&mut self, policy: InputPolicy) {
        if policy != self.policy {
            self.policy = policy;
            self.recompute();
        }
    }

    pub fn set_report_delay(&mut self, delay: Duration) {
        self.report_delay = delay;
    }

    fn recompute(&mut self) {
        self.result = compute_with_policy(self.input, self.policy, &self.bounds, &self.constants);
        self.generation += 1;
        if let NarrativeState::Pending { .. } = self.narrative {
            tracing::debug!(generation = self.generation, "pending report cancelled by input change");
        }
        self.narrative = NarrativeState::Idle;
    }

    /// 리포트 생성 버튼을 누를 수 있는지. 대기 중이거나 현재 세대 리포트가 있으면 false.
    pub fn can_request_report(&self) -> bool {
        self.result.is_ok() && matches!(self.narrative, NarrativeState::Idle)
    }

    /// 연출용 지연을 시작한다. 시작하지 못하면 false.
    pub fn request_report(&mut self, now: Instant) -> bool {
        if !self.can_request_report() {
            return false;
        }
        self.narrative = NarrativeState::Pending {
            generation: self.generation,
            ready_at: now + self.report_delay,
        };
        true
    }

    /// 지연이 끝났으면 현재 결과로 리포트를 만든다. 상태가 바뀌면 true.
    pub fn poll(&mut self, now: Instant, tr: &Translator) -> bool {
        let NarrativeState::Pending {
            generation,
            ready_at,
        } = self.narrative
        else {
            return false;
        };
        if generation != self.generation {
            self.narrative = NarrativeState::Idle;
            return true;
        }
        if now < ready_at {
            return false;
        }
        let Ok(result) = &self.result else {
            self.narrative = NarrativeState::Idle;
            return true;
        };
        let report = narrate(result, &self.constants.currency_symbol, tr);
        tracing::info!(
            generation,
            verdict = ?report.verdict,
            "report generated"
        );
        self.narrative = NarrativeState::Ready { generation, report };
        true
    }

    /// 대기 중이면 남은 시간.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.narrative {
            NarrativeState::Pending { ready_at, .. } => Some(ready_at.saturating_duration_since(now)),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.narrative, NarrativeState::Pending { .. })
    }

    /// 현재 입력 세대에 속한 리포트만 반환한다.
    pub fn report(&self) -> Option<&Report> {
        match &self.narrative {
            NarrativeState::Ready { generation, report } if *generation == self.generation => {
                Some(report)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(delay_ms: u64) -> CalculatorSession {
        CalculatorSession::new(
            SolarInput::default(),
            InputPolicy::Reject,
            InputBounds::default(),
            SolarConstants::spain(),
            Duration::from_millis(delay_ms),
        )
    }

    #[test]
    fn report_appears_only_after_delay() {
        let tr = Translator::new("en");
        let mut s = session(2000);
        let t0 = Instant::now();
        assert!(s.request_report(t0));
        assert!(!s.request_report(t0), "second request while pending");
        assert!(!s.poll(t0 + Duration::from_millis(1999), &tr));
        assert!(s.report().is_none());
        assert!(s.poll(t0 + Duration::from_millis(2000), &tr));
        assert!(s.report().is_some());
        assert!(!s.can_request_report(), "button stays disabled for same inputs");
    }

    #[test]
    fn input_change_cancels_pending_report() {
        let tr = Translator::new("en");
        let mut s = session(2000);
        let t0 = Instant::now();
        s.request_report(t0);
        s.set_monthly_bill(300.0);
        assert!(!s.is_pending());
        assert!(!s.poll(t0 + Duration::from_secs(5), &tr));
        assert!(s.report().is_none());
        assert!(s.can_request_report());
    }

    #[test]
    fn input_change_invalidates_ready_report() {
        let tr = Translator::new("en");
        let mut s = session(0);
        let t0 = Instant::now();
        s.request_report(t0);
        s.poll(t0, &tr);
        assert!(s.report().is_some());
        let before = s.generation();
        s.set_sun_hours(7.5);
        assert_eq!(s.generation(), before + 1);
        assert!(s.report().is_none());
    }

    #[test]
    fn same_value_does_not_invalidate() {
        let tr = Translator::new("en");
        let mut s = session(0);
        let t0 = Instant::now();
        s.request_report(t0);
        s.poll(t0, &tr);
        s.set_monthly_bill(150.0);
        assert!(s.report().is_some());
    }

    #[test]
    fn effective_input_reflects_clamping() {
        let mut s = session(0);
        s.set_policy(InputPolicy::Clamp);
        s.set_sun_hours(-1.0);
        assert_eq!(s.input().daily_sun_hours, -1.0);
        assert_eq!(s.effective_input().daily_sun_hours, 3.0);
    }

    #[test]
    fn repeating_nan_input_keeps_generation() {
        let mut s = session(0);
        let nan = SolarInput {
            monthly_bill_amount: f64::NAN,
            daily_sun_hours: 5.0,
        };
        s.set_input(nan);
        let generation = s.generation();
        s.set_input(nan);
        s.set_monthly_bill(f64::NAN);
        assert_eq!(s.generation(), generation);
        s.set_input(SolarInput::default());
        assert_eq!(s.generation(), generation + 1);
    }

    #[test]
    fn invalid_input_blocks_report() {
        let mut s = session(0);
        s.set_monthly_bill(0.0);
        assert!(s.result().is_err());
        assert!(!s.request_report(Instant::now()));
        s.set_policy(InputPolicy::Clamp);
        assert_eq!(s.result().unwrap().input.monthly_bill_amount, 50.0);
        assert!(s.can_request_report());
    }
}
