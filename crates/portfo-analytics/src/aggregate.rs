//! 포트폴리오 합산.
//!
//! `portfolio[t] = Σ weight[asset] × normalized[asset][t]`

use portfo_core::{PortfoError, PortfoResult, PricePoint, WeightMap};

use crate::alignment::{rebase, zip_points, AlignedFrame};

/// 포트폴리오 가치 곡선.
///
/// 첫 값은 항상 정확히 1.0입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioCurve {
    points: Vec<PricePoint>,
}

impl PortfolioCurve {
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<PricePoint> {
        self.points
    }
}

/// 정규화된 프레임과 가중치로 포트폴리오 곡선을 만듭니다.
///
/// `normalized`는 [`AlignedFrame::rebased`] 결과여야 합니다. 가중치 맵에 없는
/// 자산은 0으로 취급합니다. 부동소수 누적 오차를 없애기 위해 합산 결과를
/// 첫 값으로 한 번 더 나눕니다.
pub fn aggregate(normalized: &AlignedFrame, weights: &WeightMap) -> PortfoResult<PortfolioCurve> {
    if normalized.is_empty() {
        return Err(PortfoError::NoOverlappingData);
    }

    let mut values = vec![0.0; normalized.len()];
    for column in normalized.columns() {
        let weight = weights.get(&column.asset).unwrap_or(0.0);
        for (total, value) in values.iter_mut().zip(&column.values) {
            *total += weight * value;
        }
    }

    if !values[0].is_finite() || values[0] <= 0.0 {
        return Err(PortfoError::Internal(format!(
            "포트폴리오 시작 값이 비정상입니다: {}",
            values[0]
        )));
    }

    Ok(PortfolioCurve {
        points: zip_points(normalized.dates(), &rebase(&values)),
    })
}
