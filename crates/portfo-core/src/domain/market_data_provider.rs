//! 시장 데이터 제공자 trait 및 관련 타입.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::types::{Period, PriceSeries};

/// 재무/밸류에이션 지표.
///
/// 제공자가 알려주지 않는 값은 `None`입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    /// 시가총액
    pub market_cap: Option<f64>,
    /// 현재가
    pub current_price: Option<f64>,
    /// 주가수익비율 (trailing, 없으면 forward)
    pub pe_ratio: Option<f64>,
    /// 주가순자산비율
    pub pb_ratio: Option<f64>,
    /// 배당수익률 (비율)
    pub dividend_yield: Option<f64>,
    /// 52주 최고가
    pub fifty_two_week_high: Option<f64>,
    /// 52주 최저가
    pub fifty_two_week_low: Option<f64>,
    /// 베타 (제공자 값 그대로 전달)
    pub beta: Option<f64>,
    /// 부채비율
    pub debt_to_equity: Option<f64>,
    /// 순이익률 (비율)
    pub profit_margins: Option<f64>,
    /// 매출 성장률 (비율)
    pub revenue_growth: Option<f64>,
    /// 이익 성장률 (비율)
    pub earnings_growth: Option<f64>,
}

impl Fundamentals {
    /// 52주 범위 안에서 현재가의 위치 (%).
    ///
    /// 0이면 52주 최저, 100이면 52주 최고입니다.
    pub fn price_position(&self) -> Option<f64> {
        let price = self.current_price?;
        let high = self.fifty_two_week_high?;
        let low = self.fifty_two_week_low?;
        if high <= 0.0 || low <= 0.0 || high <= low {
            return None;
        }
        Some((price - low) / (high - low) * 100.0)
    }
}

/// 종목 기본 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProfile {
    /// 제공자가 사용한 심볼
    pub symbol: String,
    /// 종목명
    pub name: Option<String>,
    /// 거래소
    pub exchange: Option<String>,
    /// 원래 통화 코드
    pub currency: String,
    /// 섹터
    pub sector: Option<String>,
    /// 산업
    pub industry: Option<String>,
    /// 재무 지표
    #[serde(default)]
    pub fundamentals: Fundamentals,
}

impl AssetProfile {
    /// 이름과 통화만 아는 최소 프로필.
    pub fn minimal(symbol: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            exchange: None,
            currency: currency.into(),
            sector: None,
            industry: None,
            fundamentals: Fundamentals::default(),
        }
    }

    /// 표시용 이름 (없으면 심볼).
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.symbol)
    }
}

/// 시장 데이터 제공자.
///
/// 티커 해석(지수 별칭, 거래소 접미사)은 구현체의 책임이며,
/// 반환된 [`PriceSeries::symbol`]이 실제로 사용된 식별자입니다.
/// 분석 코어는 요청 티커 대신 이 식별자를 키로 사용합니다.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// 제공자 이름 (로그용).
    fn name(&self) -> &str;

    /// 기간별 일별 가격 이력을 조회합니다.
    ///
    /// 시계열의 통화는 종목의 원래 통화입니다.
    /// 데이터가 없으면 [`ProviderError::NotFound`]를 반환합니다.
    async fn fetch_history(&self, ticker: &str, period: Period)
        -> Result<PriceSeries, ProviderError>;

    /// 종목 기본 정보와 재무 지표를 조회합니다.
    async fn fetch_profile(&self, ticker: &str) -> Result<AssetProfile, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_position() {
        let f = Fundamentals {
            current_price: Some(150.0),
            fifty_two_week_high: Some(200.0),
            fifty_two_week_low: Some(100.0),
            ..Default::default()
        };
        assert_eq!(f.price_position(), Some(50.0));
    }

    #[test]
    fn test_price_position_missing_or_degenerate() {
        assert_eq!(Fundamentals::default().price_position(), None);

        let flat = Fundamentals {
            current_price: Some(10.0),
            fifty_two_week_high: Some(10.0),
            fifty_two_week_low: Some(10.0),
            ..Default::default()
        };
        assert_eq!(flat.price_position(), None);
    }

    #[test]
    fn test_display_name() {
        let mut profile = AssetProfile::minimal("RY.TO", "CAD");
        assert_eq!(profile.display_name(), "RY.TO");
        profile.name = Some("Royal Bank of Canada".to_string());
        assert_eq!(profile.display_name(), "Royal Bank of Canada");
    }
}
