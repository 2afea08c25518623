//! 종목 인사이트 및 추천 레코드.
//!
//! 1년/5년 가격 이력과 제공자 재무 지표를 묶어 [`AssetInsight`]를 만들고,
//! 해설 생성기와 무관한 규칙(핵심 포인트, 신뢰도)을 계산합니다.

use serde::{Deserialize, Serialize};

use portfo_core::{AssetProfile, Fundamentals, PriceSeries};

use crate::performance::{annualized_volatility, cumulative_growth, max_drawdown, pct_change};

/// 한 기간의 가격 성과 (퍼센트 단위).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonStats {
    /// 총 수익률 (%)
    pub total_return_pct: f64,
    /// 연환산 변동성 (%)
    pub volatility_pct: f64,
    /// 최대 낙폭 (%, 0 이하)
    pub max_drawdown_pct: f64,
}

impl HorizonStats {
    /// 가격 시계열에서 계산합니다. 관측값이 없으면 `None`.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let values = series.values();
        let first = *values.first()?;
        let last = *values.last()?;
        let returns = pct_change(&values);

        // 낙폭은 첫 가격을 고점 후보로 포함한 가격 곡선 기준
        let mut curve = vec![1.0];
        curve.extend(cumulative_growth(&returns));

        Some(Self {
            total_return_pct: (last / first - 1.0) * 100.0,
            volatility_pct: annualized_volatility(&returns) * 100.0,
            max_drawdown_pct: max_drawdown(&curve) * 100.0,
        })
    }
}

/// 추천 신뢰도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// 해설 생성기에 넘기는 종목 분석 레코드 (읽기 전용).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetInsight {
    /// 조회에 사용된 심볼
    pub ticker: String,
    /// 종목명 (없으면 심볼)
    pub company_name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    /// 재무 지표
    pub fundamentals: Fundamentals,
    /// 최근 1년 성과
    pub one_year: Option<HorizonStats>,
    /// 최근 5년 성과
    pub five_year: Option<HorizonStats>,
}

impl AssetInsight {
    /// 프로필과 기간별 시계열로 인사이트를 만듭니다.
    pub fn build(
        profile: &AssetProfile,
        one_year: Option<&PriceSeries>,
        five_year: Option<&PriceSeries>,
    ) -> Self {
        Self {
            ticker: profile.symbol.clone(),
            company_name: profile.display_name().to_string(),
            sector: profile.sector.clone(),
            industry: profile.industry.clone(),
            fundamentals: profile.fundamentals.clone(),
            one_year: one_year.and_then(HorizonStats::from_series),
            five_year: five_year.and_then(HorizonStats::from_series),
        }
    }

    /// 유효한(0이 아닌) P/E.
    pub fn pe_ratio(&self) -> Option<f64> {
        self.fundamentals.pe_ratio.filter(|pe| *pe != 0.0)
    }

    /// 52주 범위 내 현재가 위치 (%).
    pub fn price_position(&self) -> Option<f64> {
        self.fundamentals.price_position()
    }

    /// 응답에 함께 싣는 핵심 포인트.
    pub fn key_points(&self) -> Vec<String> {
        let mut points = Vec::new();
        if let Some(pe) = self.pe_ratio() {
            points.push(format!("P/E Ratio: {:.2}", pe));
        }
        if let Some(five) = &self.five_year {
            points.push(format!("5Y Return: {:.2}%", five.total_return_pct));
        }
        if let Some(one) = &self.one_year {
            points.push(format!("1Y Return: {:.2}%", one.total_return_pct));
        }
        if let Some(position) = self.price_position() {
            points.push(format!("Price Position: {:.1}% of 52W range", position));
        }
        points
    }

    /// 신뢰도.
    ///
    /// - `15 < P/E < 25` 이고 5년 수익률 > 50% → High
    /// - `P/E > 40` 이거나 5년 수익률 < -20% → Low
    /// - 그 외, 또는 P/E나 5년 수익률이 없으면 → Medium
    pub fn confidence(&self) -> Confidence {
        let (Some(pe), Some(five)) = (self.pe_ratio(), self.five_year.as_ref()) else {
            return Confidence::Medium;
        };
        let five_year_return = five.total_return_pct;
        if pe > 15.0 && pe < 25.0 && five_year_return > 50.0 {
            Confidence::High
        } else if pe > 40.0 || five_year_return < -20.0 {
            Confidence::Low
        } else {
            Confidence::Medium
        }
    }
}

/// 종목 하나에 대한 추천.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    /// 해설 본문
    pub recommendation: String,
    /// 분석 실패 시 `None`
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl Recommendation {
    /// 분석에 실패한 종목의 추천.
    pub fn unavailable(ticker: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let ticker = ticker.into();
        Self {
            recommendation: format!("Unable to analyze {}: {}", ticker, reason),
            ticker,
            confidence: None,
            key_points: Vec::new(),
        }
    }
}

/// 추천 응답 전체.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub recommendations: Vec<Recommendation>,
    /// 포트폴리오 전체 요약 (해설 생성기가 지원할 때만)
    pub summary: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        PriceSeries::from_observations(
            "MSFT",
            "USD",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (start + Duration::days(i as i64), *v)),
        )
    }

    fn insight(pe: Option<f64>, five_year: &[f64]) -> AssetInsight {
        let mut profile = AssetProfile::minimal("MSFT", "USD");
        profile.fundamentals.pe_ratio = pe;
        AssetInsight::build(&profile, None, Some(&series(five_year)))
    }

    #[test]
    fn test_horizon_stats() {
        let stats = HorizonStats::from_series(&series(&[100.0, 80.0, 120.0])).unwrap();
        assert!((stats.total_return_pct - 20.0).abs() < 1e-9);
        assert!((stats.max_drawdown_pct + 20.0).abs() < 1e-9);
        assert!(stats.volatility_pct > 0.0);
        assert!(HorizonStats::from_series(&series(&[])).is_none());
    }

    #[test]
    fn test_confidence_rules() {
        assert_eq!(insight(Some(20.0), &[100.0, 160.0]).confidence(), Confidence::High);
        assert_eq!(insight(Some(45.0), &[100.0, 160.0]).confidence(), Confidence::Low);
        assert_eq!(insight(Some(20.0), &[100.0, 70.0]).confidence(), Confidence::Low);
        assert_eq!(insight(Some(30.0), &[100.0, 110.0]).confidence(), Confidence::Medium);
        assert_eq!(insight(None, &[100.0, 160.0]).confidence(), Confidence::Medium);
        assert_eq!(insight(Some(0.0), &[100.0, 160.0]).confidence(), Confidence::Medium);
    }

    #[test]
    fn test_key_points() {
        let mut profile = AssetProfile::minimal("MSFT", "USD");
        profile.fundamentals.pe_ratio = Some(31.456);
        profile.fundamentals.current_price = Some(150.0);
        profile.fundamentals.fifty_two_week_high = Some(200.0);
        profile.fundamentals.fifty_two_week_low = Some(100.0);
        let insight =
            AssetInsight::build(&profile, Some(&series(&[100.0, 110.0])), Some(&series(&[50.0, 100.0])));

        assert_eq!(
            insight.key_points(),
            vec![
                "P/E Ratio: 31.46".to_string(),
                "5Y Return: 100.00%".to_string(),
                "1Y Return: 10.00%".to_string(),
                "Price Position: 50.0% of 52W range".to_string(),
            ]
        );
    }

    #[test]
    fn test_unavailable_recommendation() {
        let rec = Recommendation::unavailable("ZZZZ", "no data available for ZZZZ");
        assert_eq!(rec.recommendation, "Unable to analyze ZZZZ: no data available for ZZZZ");
        assert!(rec.confidence.is_none());
        assert!(rec.key_points.is_empty());
    }
}
