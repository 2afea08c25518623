//! 정렬, 가중치, 지표 계산의 속성 기반 테스트.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use portfo_analytics::performance::{cumulative_growth, max_drawdown};
use portfo_analytics::{aggregate, calculate_metrics, resolve_weights, AlignedFrame};
use portfo_core::PriceSeries;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
}

/// (시작 오프셋, 가격 목록)으로 시계열 하나.
fn series_strategy(symbol: &'static str) -> impl Strategy<Value = PriceSeries> {
    (0i64..20, prop::collection::vec(1.0f64..1_000.0, 1..40)).prop_map(move |(offset, prices)| {
        PriceSeries::from_observations(
            symbol,
            "USD",
            prices
                .into_iter()
                .enumerate()
                .map(|(i, p)| (base_date() + Duration::days(offset + i as i64 * 2), p)),
        )
    })
}

fn frame_strategy() -> impl Strategy<Value = Vec<PriceSeries>> {
    (series_strategy("AAA"), series_strategy("BBB"), series_strategy("CCC"))
        .prop_map(|(a, b, c)| vec![a, b, c])
}

proptest! {
    #[test]
    fn rebased_columns_start_at_one(series in frame_strategy()) {
        let frame = AlignedFrame::align(&series).unwrap().rebased();
        for column in frame.columns() {
            prop_assert_eq!(column.values.len(), frame.len());
            prop_assert!((column.values[0] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn calendar_is_union_of_dates(series in frame_strategy()) {
        let frame = AlignedFrame::align(&series).unwrap();
        let mut union: Vec<NaiveDate> = series.iter().flat_map(|s| s.dates()).collect();
        union.sort();
        union.dedup();
        prop_assert_eq!(frame.dates(), union.as_slice());
        prop_assert!(frame.dates().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn aligning_aligned_frame_is_identity(series in frame_strategy()) {
        let frame = AlignedFrame::align(&series).unwrap();
        let realigned_input: Vec<PriceSeries> = frame
            .assets()
            .iter()
            .map(|asset| {
                let points = frame.points(asset).unwrap();
                PriceSeries::from_observations(
                    asset.as_str(),
                    "USD",
                    points.into_iter().map(|p| (p.date, p.value)),
                )
            })
            .collect();
        let realigned = AlignedFrame::align(&realigned_input).unwrap();
        prop_assert_eq!(realigned, frame);
    }

    #[test]
    fn resolved_weights_sum_to_one(
        weights in prop::collection::vec(0.0f64..100.0, 1..8),
        missing in 0usize..3,
    ) {
        let present: Vec<String> = (0..weights.len()).map(|i| format!("T{i}")).collect();
        let mut requested: BTreeMap<String, f64> = present
            .iter()
            .cloned()
            .zip(weights.iter().copied())
            .collect();
        // 조회 실패 자산의 가중치는 결과에 포함되지 않아야 함
        for i in 0..missing {
            requested.insert(format!("GONE{i}"), 0.3);
        }

        let resolved = resolve_weights(&requested, &present);
        prop_assert_eq!(resolved.len(), present.len());
        prop_assert!((resolved.sum() - 1.0).abs() < 1e-9);
        prop_assert!(resolved.iter().all(|(_, w)| w >= 0.0));
        prop_assert!(resolved.get("GONE0").is_none());
    }

    #[test]
    fn portfolio_curve_starts_at_one(series in frame_strategy()) {
        let normalized = AlignedFrame::align(&series).unwrap().rebased();
        let requested: BTreeMap<String, f64> = [("AAA", 0.2), ("BBB", 0.3), ("CCC", 0.5)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let weights = resolve_weights(&requested, &normalized.assets());
        let curve = aggregate(&normalized, &weights).unwrap();

        prop_assert_eq!(curve.len(), normalized.len());
        prop_assert_eq!(curve.values()[0], 1.0);
    }

    #[test]
    fn drawdown_is_non_positive(returns in prop::collection::vec(-0.5f64..0.5, 0..60)) {
        let cumulative = cumulative_growth(&returns);
        let drawdown = max_drawdown(&cumulative);
        prop_assert!(drawdown <= 0.0);

        let non_decreasing = cumulative.windows(2).all(|w| w[1] >= w[0]);
        prop_assert_eq!(drawdown == 0.0, non_decreasing);
    }

    #[test]
    fn flat_returns_give_zero_metrics(n in 1usize..300) {
        let metrics = calculate_metrics(&vec![0.0; n]);
        prop_assert_eq!(metrics.total_return, 0.0);
        prop_assert_eq!(metrics.annualized_return, 0.0);
        prop_assert_eq!(metrics.annualized_volatility, 0.0);
        prop_assert_eq!(metrics.max_drawdown, 0.0);
        prop_assert_eq!(metrics.sharpe_ratio, 0.0);
    }
}
