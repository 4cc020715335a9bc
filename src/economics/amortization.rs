/// 고정금리 원리금균등 상환액(월)을 계산한다.
///
/// `monthly_rate = annual_rate / 12`, `n = term_years * 12`.
/// 금리가 0이면 분모가 0이 되므로 원금을 회차로 나눈 값을 그대로 쓴다.
pub fn monthly_loan_payment(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let num_payments = term_years * 12;
    if num_payments == 0 {
        return principal;
    }
    if monthly_rate == 0.0 {
        return principal / f64::from(num_payments);
    }
    let growth = (1.0 + monthly_rate).powf(f64::from(num_payments));
    principal * monthly_rate * growth / (growth - 1.0)
}

/// 대출 기간 전체의 이자 총액.
pub fn total_interest(principal: f64, annual_rate: f64, term_years: u32) -> f64 {
    let payment = monthly_loan_payment(principal, annual_rate, term_years);
    payment * f64::from(term_years * 12) - principal
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let p = monthly_loan_payment(7425.0, 0.0, 10);
        assert_eq!(p, 7425.0 / 120.0);
        assert_eq!(total_interest(7425.0, 0.0, 10), 0.0);
    }

    #[test]
    fn standard_formula_matches_known_value() {
        // 100,000 at 6% over 30 years -> 599.55/month
        let p = monthly_loan_payment(100_000.0, 0.06, 30);
        assert_relative_eq!(p, 599.550_525_3, max_relative = 1e-8);
    }

    #[test]
    fn payment_covers_principal_plus_positive_interest() {
        let p = monthly_loan_payment(7425.0, 0.065, 10);
        assert!(p * 120.0 > 7425.0);
        assert!(total_interest(7425.0, 0.065, 10) > 0.0);
    }
}
