//! 성과 지표 계산.
//!
//! 수익률 시계열 하나(포트폴리오 또는 단일 자산)에서 [`PerformanceMetrics`]를 계산합니다.
//! 모든 결과는 비율(0.05 = 5%)이며 퍼센트 변환은 표현 계층의 몫입니다.
//!
//! # 계산 공식
//!
//! `n`은 수익률 개수입니다.
//!
//! | 지표 | 공식 |
//! |------|------|
//! | 누적 | `cum[t] = Π_{i≤t} (1 + r[i])` |
//! | 총 수익률 | `cum[n-1] - 1` |
//! | 연환산 수익률 | `sign(c)·|c|^(1/years) - 1`, `years = n / 252` |
//! | 연환산 변동성 | `표본 표준편차(r) × √252` |
//! | 최대 낙폭 | `min((cum - running_max) / running_max)` |
//! | 샤프 비율 | `연환산 수익률 / 연환산 변동성` (무위험 수익률 0) |
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use portfo_analytics::performance::{calculate_metrics, pct_change};
//!
//! let values = vec![1.0, 1.0, 1.055];
//! let metrics = calculate_metrics(&pct_change(&values));
//! assert!((metrics.total_return - 0.055).abs() < 1e-12);
//! ```

use portfo_core::PerformanceMetrics;

/// 연간 거래일 수 (연환산 상수).
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// 가치 시계열을 단순 수익률로 변환합니다 (`v[t]/v[t-1] - 1`).
///
/// 결과는 입력보다 하나 짧고, 첫 원소는 인덱스 1에 대응합니다.
pub fn pct_change(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// 누적 곱 `Π(1 + r)`.
pub fn cumulative_growth(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |acc, r| {
            *acc *= 1.0 + r;
            Some(*acc)
        })
        .collect()
}

/// 산술 평균. 빈 입력이면 0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 표본 표준편차 (n - 1). 관측값이 2개 미만이면 0.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

/// 누적 곡선의 최대 낙폭 (0 이하).
///
/// 누적 곡선이 한 번도 감소하지 않으면 0입니다.
pub fn max_drawdown(cumulative: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in cumulative {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            worst = worst.min((value - peak) / peak);
        }
    }
    worst
}

/// 연환산 수익률.
///
/// 누적 배수 `growth`가 음수일 수 있어(-100% 초과 손실) 부호를 보존하는
/// 거듭제곱 `sign(c)·|c|^(1/years)`을 사용합니다.
pub fn annualized_return(growth: f64, periods: usize) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    let years = periods as f64 / f64::from(TRADING_DAYS_PER_YEAR);
    growth.signum() * growth.abs().powf(1.0 / years) - 1.0
}

/// 연환산 변동성.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    sample_std(returns) * f64::from(TRADING_DAYS_PER_YEAR).sqrt()
}

/// 수익률 시계열에서 성과 지표를 계산합니다.
///
/// 빈 입력은 에러가 아니라 모든 지표가 0인 레코드입니다.
pub fn calculate_metrics(returns: &[f64]) -> PerformanceMetrics {
    if returns.is_empty() {
        return PerformanceMetrics::zero();
    }

    let cumulative = cumulative_growth(returns);
    let growth = cumulative.last().copied().unwrap_or(1.0);

    let annualized = annualized_return(growth, returns.len());
    let volatility = annualized_volatility(returns);
    let sharpe_ratio = if volatility > 0.0 {
        annualized / volatility
    } else {
        0.0
    };

    PerformanceMetrics {
        total_return: growth - 1.0,
        annualized_return: annualized,
        annualized_volatility: volatility,
        max_drawdown: max_drawdown(&cumulative),
        sharpe_ratio,
    }
}

/// 가치 시계열에서 바로 지표를 계산합니다.
///
/// 최대 낙폭은 시작값을 고점 후보에 포함하도록 가치 시계열 전체에서 구합니다.
/// 첫날 하락 후 회복하지 못한 곡선도 낙폭으로 잡힙니다.
pub fn metrics_from_values(values: &[f64]) -> PerformanceMetrics {
    PerformanceMetrics {
        max_drawdown: max_drawdown(values),
        ..calculate_metrics(&pct_change(values))
    }
}
