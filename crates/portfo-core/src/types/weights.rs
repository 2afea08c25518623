//! 정규화된 가중치 맵.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 가중치 결정 방식.
///
/// 재정규화가 비정상이면 오류 대신 동일 가중치로 대체하고
/// 그 사실을 이 값으로 알립니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightMethod {
    /// 요청 가중치를 남은 자산 기준으로 재정규화
    Renormalized,
    /// 동일 가중치 1/n
    EqualWeightFallback,
}

/// 자산 식별자 → 정규화 가중치.
///
/// 키는 실제로 조회에 성공한 심볼 변형(예: `RY.TO`)입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightMap {
    weights: BTreeMap<String, f64>,
    method: WeightMethod,
}

impl WeightMap {
    /// 이미 정규화된 가중치로 맵을 만듭니다.
    pub fn new(weights: BTreeMap<String, f64>, method: WeightMethod) -> Self {
        Self { weights, method }
    }

    /// 주어진 자산들에 1/n씩 배정합니다.
    pub fn equal<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = assets.into_iter().map(Into::into).collect();
        let mut weights = BTreeMap::new();
        if !keys.is_empty() {
            let w = 1.0 / keys.len() as f64;
            for key in keys {
                weights.insert(key, w);
            }
        }
        Self::new(weights, WeightMethod::EqualWeightFallback)
    }

    pub fn get(&self, asset: &str) -> Option<f64> {
        self.weights.get(asset).copied()
    }

    pub fn method(&self) -> WeightMethod {
        self.method
    }

    pub fn is_fallback(&self) -> bool {
        self.method == WeightMethod::EqualWeightFallback
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// 가중치 합계.
    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_weights() {
        let map = WeightMap::equal(["A", "B", "C", "D"]);
        assert_eq!(map.len(), 4);
        assert_eq!(map.get("C"), Some(0.25));
        assert!((map.sum() - 1.0).abs() < 1e-12);
        assert!(map.is_fallback());
    }

    #[test]
    fn test_equal_weights_empty() {
        let map = WeightMap::equal(Vec::<String>::new());
        assert!(map.is_empty());
        assert_eq!(map.sum(), 0.0);
    }
}
