use proptest::prelude::*;

use reinsurance_calc::{
    CashflowRow, ExcessOfLossTerms, PeriodInput, QuotaShareTerms, SurplusShareTerms, Treaty,
    TreatyError, TreatyTerms,
};

const EPS: f64 = 1e-6;

fn amount() -> impl Strategy<Value = f64> {
    (0u64..50_000_000u64).prop_map(|v| v as f64)
}

fn period_stream(max_len: usize) -> impl Strategy<Value = Vec<PeriodInput>> {
    prop::collection::vec((amount(), amount(), any::<bool>()), 1..max_len).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (premium, claims, new_cycle))| {
                let p = PeriodInput::new(format!("P{i}"), premium, claims);
                if new_cycle { p.starting_new_cycle() } else { p }
            })
            .collect()
    })
}

fn any_treaty() -> impl Strategy<Value = TreatyTerms> {
    prop_oneof![
        (0u32..=100, 0u32..=100, prop::option::of(0u32..=100), prop::option::of(amount())).prop_map(
            |(cession, commission, pc, limit)| {
                let mut t = QuotaShareTerms::new(cession as f64, commission as f64).unwrap();
                if let Some(rate) = pc {
                    t = t.with_profit_commission(rate as f64).unwrap();
                }
                if let Some(l) = limit {
                    t = t.with_annual_aggregate_limit(l).unwrap();
                }
                TreatyTerms::from(t)
            }
        ),
        (1u64..5_000_000, 1u32..10, 0u32..=100).prop_map(|(retention, lines, commission)| {
            TreatyTerms::from(
                SurplusShareTerms::new(retention as f64, lines, commission as f64).unwrap(),
            )
        }),
        (amount(), 1u64..20_000_000, 0u32..4, 0u32..=100, 1u32..=50).prop_map(
            |(attachment, limit, reinstatements, rp_rate, rol)| {
                TreatyTerms::from(
                    ExcessOfLossTerms::new(
                        attachment,
                        limit as f64,
                        reinstatements,
                        rp_rate as f64,
                        rol as f64,
                    )
                    .unwrap(),
                )
            }
        ),
    ]
}

fn opens_cycle(rows: &[CashflowRow], i: usize) -> bool {
    i == 0 || rows[i].is_new_annual_cycle
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn quota_share_without_limit_is_exact(
        cession in 0u32..=100,
        premium in amount(),
        claims in amount(),
    ) {
        let r = cession as f64;
        let treaty = Treaty::new(QuotaShareTerms::new(r, 25.0).unwrap());
        let row = treaty.calculate_premium(&PeriodInput::new("P", premium, claims)).unwrap();
        prop_assert_eq!(row.ceded_premium, premium * (r / 100.0));
        prop_assert_eq!(row.ceded_claims, claims * (r / 100.0));
    }

    #[test]
    fn loss_ratio_matches_definition(terms in any_treaty(), periods in period_stream(12)) {
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            if row.ceded_premium > 0.0 {
                prop_assert!((row.loss_ratio - row.ceded_claims / row.ceded_premium).abs() <= 1e-12);
            } else {
                prop_assert_eq!(row.loss_ratio, 0.0);
            }
        }
    }

    #[test]
    fn cumulative_premium_monotone_and_resets(terms in any_treaty(), periods in period_stream(12)) {
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        prop_assert_eq!(rows.len(), periods.len());
        for i in 0..rows.len() {
            if opens_cycle(&rows, i) {
                prop_assert!((rows[i].cumulative_ceded_premium - rows[i].ceded_premium).abs() <= EPS);
                prop_assert!((rows[i].cumulative_ceded_claims - rows[i].ceded_claims).abs() <= EPS);
            } else {
                prop_assert!(rows[i].cumulative_ceded_premium >= rows[i - 1].cumulative_ceded_premium);
                prop_assert!(rows[i].cumulative_ceded_claims >= rows[i - 1].cumulative_ceded_claims);
            }
        }
    }

    #[test]
    fn aggregate_limit_never_exceeded(
        cession in 1u32..=100,
        limit in amount(),
        periods in period_stream(16),
    ) {
        let terms = QuotaShareTerms::new(cession as f64, 20.0)
            .unwrap()
            .with_annual_aggregate_limit(limit)
            .unwrap();
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            prop_assert!(row.cumulative_ceded_claims <= limit + EPS);
            prop_assert!((row.ceded_claims + row.retained_claims - row.gross_claims).abs() <= EPS);
            prop_assert!(row.retained_claims >= -EPS);
        }
    }

    #[test]
    fn profit_commission_non_negative(terms in any_treaty(), periods in period_stream(12)) {
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            prop_assert!(row.profit_commission >= 0.0);
            if row.reinsurer_technical_result <= 0.0 {
                prop_assert_eq!(row.profit_commission, 0.0);
            }
        }
    }

    #[test]
    fn net_position_is_technical_result_less_profit_commission(
        terms in any_treaty(),
        periods in period_stream(12),
    ) {
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            let expected = row.reinsurer_technical_result - row.profit_commission;
            prop_assert!((row.reinsurer_net_position - expected).abs() <= EPS);
        }
    }

    #[test]
    fn ceded_claims_never_exceed_gross(terms in any_treaty(), periods in period_stream(12)) {
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            prop_assert!(row.ceded_claims >= 0.0);
            prop_assert!(row.ceded_claims <= row.gross_claims + EPS);
        }
    }

    #[test]
    fn xol_cycle_recoveries_bounded_by_aggregate_capacity(
        attachment in amount(),
        limit in 1u64..20_000_000,
        reinstatements in 0u32..4,
        periods in period_stream(16),
    ) {
        let terms = ExcessOfLossTerms::new(attachment, limit as f64, reinstatements, 100.0, 10.0).unwrap();
        let capacity = terms.aggregate_capacity();
        let rows = Treaty::new(terms).calculate_cashflow(&periods).unwrap();
        for row in &rows {
            prop_assert!(row.cumulative_ceded_claims <= capacity + EPS);
            prop_assert!(row.reinstatements_used <= reinstatements as f64 + 1e-9);
        }
    }

    #[test]
    fn identical_inputs_give_identical_rows(terms in any_treaty(), periods in period_stream(10)) {
        let treaty = Treaty::new(terms);
        prop_assert_eq!(
            treaty.calculate_cashflow(&periods).unwrap(),
            treaty.calculate_cashflow(&periods).unwrap()
        );
    }

    #[test]
    fn one_bad_period_yields_no_rows(
        terms in any_treaty(),
        mut periods in period_stream(10),
        pick in any::<prop::sample::Index>(),
    ) {
        let i = pick.index(periods.len());
        periods[i].gross_claims = -1.0;
        let result = Treaty::new(terms).calculate_cashflow(&periods);
        prop_assert!(
            matches!(result, Err(TreatyError::InvalidPeriod { ref period_label, .. }) if *period_label == format!("P{i}")),
            "expected InvalidPeriod for P{}, got {:?}", i, result
        );
    }
}
