//! 가중치 결정.
//!
//! 요청 가중치를 실제로 조회에 성공한 자산으로 좁힌 뒤 합계 1.0으로 재정규화합니다.
//! 재정규화가 비정상이면(합계 0, 유한하지 않은 값, 허용 오차 초과) 요청 가중치를
//! 버리고 동일 가중치 1/n을 배정합니다.

use std::collections::BTreeMap;

use tracing::warn;

use portfo_core::{WeightMap, WeightMethod, WEIGHT_SUM_TOLERANCE};

/// 남아 있는 자산 기준으로 가중치를 결정합니다.
///
/// * `requested` - 자산 식별자 → 요청 가중치 (정규화 전, 실패 자산 포함 가능)
/// * `present` - 정렬 프레임에 있는 자산 식별자
///
/// `requested`에 없는 자산의 가중치는 0입니다.
pub fn resolve_weights(requested: &BTreeMap<String, f64>, present: &[String]) -> WeightMap {
    if present.is_empty() {
        return WeightMap::equal(Vec::<String>::new());
    }

    let restricted: Vec<(&String, f64)> = present
        .iter()
        .map(|asset| (asset, requested.get(asset).copied().unwrap_or(0.0)))
        .collect();

    let sum: f64 = restricted.iter().map(|(_, w)| w).sum();
    if !sum.is_finite() || sum <= 0.0 || restricted.iter().any(|(_, w)| *w < 0.0) {
        warn!(sum, assets = present.len(), "가중치 합계 비정상, 동일 가중치 사용");
        return WeightMap::equal(present.iter().cloned());
    }

    let normalized: BTreeMap<String, f64> = restricted
        .into_iter()
        .map(|(asset, w)| (asset.clone(), w / sum))
        .collect();

    let total: f64 = normalized.values().sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        warn!(total, "재정규화 합계가 허용 오차를 벗어남, 동일 가중치 사용");
        return WeightMap::equal(present.iter().cloned());
    }

    WeightMap::new(normalized, WeightMethod::Renormalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn present(assets: &[&str]) -> Vec<String> {
        assets.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_renormalizes_after_failure() {
        let map = resolve_weights(
            &requested(&[("A", 0.5), ("B", 0.3), ("C", 0.2)]),
            &present(&["A", "B"]),
        );
        assert_eq!(map.method(), WeightMethod::Renormalized);
        assert!((map.get("A").unwrap() - 0.625).abs() < 1e-12);
        assert!((map.get("B").unwrap() - 0.375).abs() < 1e-12);
        assert!(map.get("C").is_none());
        assert!((map.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_fall_back_to_equal() {
        let map = resolve_weights(&requested(&[("A", 0.0), ("B", 0.0)]), &present(&["A", "B"]));
        assert!(map.is_fallback());
        assert_eq!(map.get("A"), Some(0.5));
        assert_eq!(map.get("B"), Some(0.5));
    }

    #[test]
    fn test_only_zero_weight_asset_survives() {
        let map = resolve_weights(&requested(&[("A", 1.0), ("B", 0.0)]), &present(&["B"]));
        assert!(map.is_fallback());
        assert_eq!(map.get("B"), Some(1.0));
    }

    #[test]
    fn test_non_finite_weight_falls_back() {
        let map = resolve_weights(
            &requested(&[("A", f64::INFINITY), ("B", 0.5)]),
            &present(&["A", "B"]),
        );
        assert!(map.is_fallback());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_unrequested_asset_gets_zero() {
        let map = resolve_weights(&requested(&[("A", 0.7)]), &present(&["A", "B"]));
        assert_eq!(map.get("A"), Some(1.0));
        assert_eq!(map.get("B"), Some(0.0));
    }

    #[test]
    fn test_no_present_assets() {
        let map = resolve_weights(&requested(&[("A", 1.0)]), &[]);
        assert!(map.is_empty());
    }
}
