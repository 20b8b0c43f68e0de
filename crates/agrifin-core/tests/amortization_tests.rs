use agrifin_core::amortization::{
    self, compute_monthly_payment, derive_totals, generate_schedule, generate_schedule_with,
    AmortizationInput, RoundingMode,
};
use agrifin_core::money::{format_currency, round_to_cents};
use agrifin_core::terms::{LoanProduct, LoanTerms, TermUnit};
use agrifin_core::AgriFinError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

const TOL: Decimal = dec!(0.01);

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tol,
        "{}: expected ~{}, got {} (diff = {})",
        msg,
        expected,
        actual,
        diff
    );
}

/// (principal, annual rate %, months) cases shared by the property tests.
fn cases() -> Vec<(Decimal, Decimal, u32)> {
    vec![
        (dec!(10000), dec!(8.4), 8),
        (dec!(50000), dec!(10), 24),
        (dec!(100000), dec!(6), 360),
        (dec!(2500), dec!(18.5), 9),
        (dec!(1234.56), dec!(0), 7),
        (dec!(750), dec!(24), 1),
    ]
}

// ===========================================================================
// Monthly payment
// ===========================================================================

#[test]
fn test_zero_interest_payment_is_exact_division() {
    for (principal, months) in [(dec!(1200), 12u32), (dec!(1000), 3), (dec!(99.99), 7)] {
        let pmt = compute_monthly_payment(principal, Decimal::ZERO, months).unwrap();
        assert_eq!(pmt, principal / Decimal::from(months));
    }
}

#[test]
fn test_concrete_scenario_payment_and_interest() {
    let pmt = compute_monthly_payment(dec!(10000), dec!(8.4), 8).unwrap();
    assert_eq!(round_to_cents(pmt), dec!(1289.70));
    assert_eq!(format_currency(pmt, "$"), "$1,289.70");

    let schedule = generate_schedule(dec!(10000), dec!(8.4), 8).unwrap();
    let totals = derive_totals(&schedule).unwrap();
    assert_eq!(round_to_cents(totals.total_interest), dec!(317.56));
}

#[test]
fn test_single_period_payment_is_principal_plus_one_period_interest() {
    let principal = dec!(5000);
    let rate = dec!(8.4);
    let r = rate / dec!(100) / dec!(12);
    let pmt = compute_monthly_payment(principal, rate, 1).unwrap();
    assert_eq!(pmt, principal * (Decimal::ONE + r));
}

#[test]
fn test_rejects_invalid_inputs() {
    let cases = [
        (Decimal::ZERO, dec!(5), 12u32, "principal"),
        (dec!(-100), dec!(5), 12, "principal"),
        (dec!(1000), dec!(5), 0, "term"),
        (dec!(1000), dec!(-1), 12, "annual_interest_rate_percent"),
    ];
    for (principal, rate, months, expected_field) in cases {
        let err = compute_monthly_payment(principal, rate, months).unwrap_err();
        match err {
            AgriFinError::InvalidInput { field, .. } => assert_eq!(field, expected_field),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        assert!(generate_schedule(principal, rate, months).is_err());
    }
}

#[test]
fn test_unbounded_term_is_rejected_before_allocation() {
    for rounding in [RoundingMode::Exact, RoundingMode::MinorUnits] {
        let err = generate_schedule_with(dec!(100), Decimal::ZERO, 4_000_000_000, rounding)
            .unwrap_err();
        match err {
            AgriFinError::InvalidInput { field, .. } => assert_eq!(field, "term"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn test_totals_beyond_decimal_range_return_overflow() {
    let principal = Decimal::from_str("79000000000000000000000000000").unwrap();
    let result = amortization::amortize(&AmortizationInput {
        terms: LoanTerms::monthly(principal, dec!(120), 2),
        rounding: RoundingMode::Exact,
    });
    assert!(
        matches!(result, Err(AgriFinError::Overflow { .. })),
        "expected Overflow, got {result:?}"
    );
}

// ===========================================================================
// Schedule properties
// ===========================================================================

#[test]
fn test_schedule_conservation() {
    for (principal, rate, months) in cases() {
        let schedule = generate_schedule(principal, rate, months).unwrap();
        let repaid: Decimal = schedule.entries.iter().map(|e| e.principal_portion).sum();
        assert_close(repaid, principal, TOL, "principal conservation");
    }
}

#[test]
fn test_schedule_terminal_balance_is_zero() {
    for (principal, rate, months) in cases() {
        for rounding in [RoundingMode::Exact, RoundingMode::MinorUnits] {
            let schedule = generate_schedule_with(principal, rate, months, rounding).unwrap();
            assert_eq!(schedule.entries.len(), months as usize);
            assert_eq!(
                schedule.entries.last().unwrap().remaining_balance,
                Decimal::ZERO
            );
        }
    }
}

#[test]
fn test_schedule_balance_monotonic_and_non_negative() {
    for (principal, rate, months) in cases() {
        let schedule = generate_schedule(principal, rate, months).unwrap();
        let curve = schedule.balance_curve();
        for pair in curve.windows(2) {
            assert!(pair[1] <= pair[0], "balance rose from {} to {}", pair[0], pair[1]);
            assert!(pair[1] >= Decimal::ZERO);
        }
    }
}

#[test]
fn test_totals_consistency() {
    for (principal, rate, months) in cases() {
        let schedule = generate_schedule(principal, rate, months).unwrap();
        let totals = derive_totals(&schedule).unwrap();
        let expected = schedule.monthly_payment * Decimal::from(months);
        assert_close(totals.total_repayment, expected, TOL, "total repayment");
        assert_close(
            totals.total_interest,
            expected - principal,
            TOL,
            "total interest oracle",
        );
        assert_eq!(
            totals.principal_share_percent + totals.interest_share_percent,
            dec!(100)
        );
    }
}

#[test]
fn test_minor_units_conserves_exactly() {
    for (principal, rate, months) in cases() {
        let schedule =
            generate_schedule_with(principal, rate, months, RoundingMode::MinorUnits).unwrap();
        let repaid: Decimal = schedule.entries.iter().map(|e| e.principal_portion).sum();
        assert_eq!(repaid, principal);
        for entry in &schedule.entries {
            assert_eq!(entry.payment, entry.interest_portion + entry.principal_portion);
            assert_eq!(round_to_cents(entry.payment), entry.payment);
        }
    }
}

#[test]
fn test_recomputation_is_idempotent() {
    let a = generate_schedule(dec!(25000), dec!(9.5), 36).unwrap();
    let b = generate_schedule(dec!(25000), dec!(9.5), 36).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Envelope entry points
// ===========================================================================

#[test]
fn test_product_in_years_amortizes_monthly() {
    let product = LoanProduct {
        id: Some("p-1".into()),
        name: Some("Irrigation kit".into()),
        description: None,
        amount: dec!(24000),
        interest: Some(dec!(12)),
        term: Some(dec!(2)),
        term_type: TermUnit::Years,
    };
    let by_product = amortization::amortize_product(&amortization::ProductAmortizationInput {
        product,
        rounding: RoundingMode::Exact,
    })
    .unwrap();

    let by_terms = amortization::amortize(&AmortizationInput {
        terms: LoanTerms::monthly(dec!(24000), dec!(12), 24),
        rounding: RoundingMode::Exact,
    })
    .unwrap();

    assert_eq!(by_product.result.term_months, 24);
    assert_eq!(by_product.result.monthly_payment, by_terms.result.monthly_payment);
    assert_eq!(by_product.result.schedule, by_terms.result.schedule);
}

#[test]
fn test_amortize_output_serializes_flat_totals() {
    let out = amortization::amortize(&AmortizationInput {
        terms: LoanTerms::monthly(dec!(1200), Decimal::ZERO, 12),
        rounding: RoundingMode::Exact,
    })
    .unwrap();
    let value = serde_json::to_value(&out).unwrap();
    let result = &value["result"];
    let total_interest: Decimal = result["total_interest"].as_str().unwrap().parse().unwrap();
    assert_eq!(total_interest, Decimal::ZERO);
    assert_eq!(result["schedule"].as_array().unwrap().len(), 12);
    assert_eq!(value["metadata"]["precision"], "rust_decimal_128bit");
}
