//! 성과 지표 레코드.

use serde::{Deserialize, Serialize};

/// 수익률 시계열에서 계산한 성과 지표.
///
/// 모든 값은 비율(0.05 = 5%)입니다. 퍼센트 표시는 [`PerformanceMetrics::as_percent`]로
/// 표현 계층에서 변환합니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// 누적 수익률
    pub total_return: f64,
    /// 연환산 수익률
    pub annualized_return: f64,
    /// 연환산 변동성
    #[serde(rename = "volatility")]
    pub annualized_volatility: f64,
    /// 최대 낙폭 (0 이하)
    pub max_drawdown: f64,
    /// 샤프 비율 (무위험 수익률 0)
    pub sharpe_ratio: f64,
}

impl PerformanceMetrics {
    /// 모든 지표가 0인 레코드.
    pub fn zero() -> Self {
        Self::default()
    }

    /// 비율 지표를 ×100 한 사본. 샤프 비율은 그대로 둡니다.
    pub fn as_percent(&self) -> Self {
        Self {
            total_return: self.total_return * 100.0,
            annualized_return: self.annualized_return * 100.0,
            annualized_volatility: self.annualized_volatility * 100.0,
            max_drawdown: self.max_drawdown * 100.0,
            sharpe_ratio: self.sharpe_ratio,
        }
    }
}

/// 소수점 `places` 자리에서 반올림합니다.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_percent_keeps_sharpe() {
        let m = PerformanceMetrics {
            total_return: 0.055,
            annualized_return: 0.1,
            annualized_volatility: 0.2,
            max_drawdown: -0.15,
            sharpe_ratio: 0.5,
        };
        let p = m.as_percent();
        assert!((p.total_return - 5.5).abs() < 1e-12);
        assert!((p.max_drawdown + 15.0).abs() < 1e-12);
        assert_eq!(p.sharpe_ratio, 0.5);
    }

    #[test]
    fn test_wire_name_for_volatility() {
        let json = serde_json::to_value(PerformanceMetrics::zero()).unwrap();
        assert!(json.get("volatility").is_some());
        assert!(json.get("annualized_volatility").is_none());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(5.4999, 2), 5.5);
        assert_eq!(round_to(-12.3456, 4), -12.3456);
        assert_eq!(round_to(1.005, 0), 1.0);
    }
}
