//! Loan analysis for vehicle valuations.
//!
//! Standard amortized-loan math over the policy constants (LTV ratio,
//! estimated APR, term). Computed entirely in `Decimal`; the compounding
//! factor uses an integer-exponent power loop rather than a float round trip.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ValuationPolicy;

/// Result of the loan calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanAnalysis {
    pub loan_amount: Decimal,
    pub monthly_payment: Decimal,
}

/// Pick the base value for the loan: first non-zero of trade-in,
/// private-party, retail, in that priority order.
#[must_use]
pub fn select_base_value(
    trade_in: Option<Decimal>,
    private_party: Option<Decimal>,
    retail: Option<Decimal>,
) -> Option<Decimal> {
    [trade_in, private_party, retail]
        .into_iter()
        .flatten()
        .find(|v| *v > Decimal::ZERO)
}

/// Compute the loan amount and amortized monthly payment.
///
/// `loan_amount = base_value * ltv_ratio` exactly. The monthly payment uses
/// the standard amortization formula; a zero rate is handled explicitly
/// (straight division by the term) since the formula would otherwise divide
/// by zero. Payment is rounded to cents.
///
/// Returns `None` for a non-positive base value or a zero-month term.
#[must_use]
pub fn compute_loan(base_value: Decimal, policy: &ValuationPolicy) -> Option<LoanAnalysis> {
    if base_value <= Decimal::ZERO || policy.term_months == 0 {
        return None;
    }

    let loan_amount = base_value * policy.ltv_ratio;
    let term = Decimal::from(policy.term_months);
    let monthly_rate = policy.annual_rate_percent / Decimal::from(1200);

    let monthly_payment = if monthly_rate.is_zero() {
        loan_amount / term
    } else {
        let growth = powi(Decimal::ONE + monthly_rate, policy.term_months);
        loan_amount * monthly_rate * growth / (growth - Decimal::ONE)
    };

    Some(LoanAnalysis {
        loan_amount,
        monthly_payment: monthly_payment
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
    })
}

/// Integer power by repeated squaring.
fn powi(base: Decimal, mut exp: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let mut factor = base;
    while exp > 0 {
        if exp & 1 == 1 {
            result *= factor;
        }
        exp >>= 1;
        if exp > 0 {
            factor *= factor;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn policy_with_rate(annual_rate_percent: Decimal) -> ValuationPolicy {
        ValuationPolicy {
            annual_rate_percent,
            ..ValuationPolicy::default()
        }
    }

    #[test]
    fn test_loan_amount_is_exact() {
        let analysis =
            compute_loan(dec(10_000), &ValuationPolicy::default()).expect("analysis");
        assert_eq!(analysis.loan_amount, dec(8_000));
    }

    #[test]
    fn test_zero_rate_edge_case() {
        // The scenario is a 12000 loan over 60 months: use a base that
        // yields it at the default 0.80 LTV.
        let policy = policy_with_rate(Decimal::ZERO);
        let analysis = compute_loan(dec(15_000), &policy).expect("analysis");

        assert_eq!(analysis.loan_amount, dec(12_000));
        assert_eq!(analysis.monthly_payment, dec(200));
    }

    #[test]
    fn test_payment_positive_and_plausible() {
        let analysis =
            compute_loan(dec(15_000), &ValuationPolicy::default()).expect("analysis");

        // 12000 principal, 6.5% APR, 60 months: ~234.78/month. Sanity-bound
        // rather than pin the exact cents.
        assert!(analysis.monthly_payment > dec(200));
        assert!(analysis.monthly_payment < dec(260));

        // Total repaid must exceed principal at a positive rate.
        let total = analysis.monthly_payment * dec(60);
        assert!(total > analysis.loan_amount);
    }

    #[test]
    fn test_non_positive_base_rejected() {
        assert!(compute_loan(Decimal::ZERO, &ValuationPolicy::default()).is_none());
        assert!(compute_loan(dec(-1), &ValuationPolicy::default()).is_none());
    }

    #[test]
    fn test_base_value_priority() {
        assert_eq!(
            select_base_value(Some(dec(1)), Some(dec(2)), Some(dec(3))),
            Some(dec(1))
        );
        assert_eq!(
            select_base_value(Some(Decimal::ZERO), Some(dec(2)), Some(dec(3))),
            Some(dec(2))
        );
        assert_eq!(
            select_base_value(None, None, Some(dec(3))),
            Some(dec(3))
        );
        assert_eq!(select_base_value(None, Some(Decimal::ZERO), None), None);
    }

    #[test]
    fn test_powi() {
        assert_eq!(powi(dec(2), 10), dec(1024));
        assert_eq!(powi(dec(7), 0), Decimal::ONE);
        assert_eq!(powi(dec(3), 1), dec(3));
    }
}
