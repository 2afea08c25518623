//! 배치 오케스트레이터.
//!
//! 요청된 자산마다 `조회 → 통화 변환`을 독립적으로 실행하고, 성공한 자산만 모아
//! `정렬 → 가중치 결정 → 합산 → 지표 계산`을 수행합니다.
//!
//! ```text
//! holdings ──┬─ fetch+convert(A) ─┐
//!            ├─ fetch+convert(B) ─┼─▶ AlignedFrame ─▶ WeightMap ─▶ PortfolioCurve ─▶ metrics
//!            └─ fetch+convert(C) ✗ (failures에 기록)
//! ```
//!
//! 개별 자산 실패는 결과와 함께 보고되며, 요청 전체는 성공한 자산이 하나도 없거나
//! 공통 달력이 비었을 때만 실패합니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use portfo_core::{
    AppConfig, AssetFailure, AssetProfile, Currency, FxRateProvider, Holding, LimitsConfig,
    MarketDataProvider, PerformanceMetrics, Period, PortfoError, PortfoResult, PortfolioRequest,
    PricePoint, WeightMap,
};
use portfo_data::{normalize_ticker, resolve_index};

use crate::aggregate::aggregate;
use crate::alignment::{rebase, zip_points, AlignedFrame};
use crate::currency::{convert_series, resolve_rate, AppliedRate, ConvertedSeries};
use crate::history::{history_metadata, history_points, AssetHistory, BatchEntry, BatchHistory};
use crate::insight::{AssetInsight, Recommendation, RecommendationReport};
use crate::narrative::{NarrativeGenerator, RuleBasedNarrator};
use crate::performance::metrics_from_values;
use crate::weights::resolve_weights;

/// 오케스트레이터 실행 설정.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// 요청당 동시 조회 자산 수
    pub max_concurrent_fetches: usize,
    /// 요청 크기 한도
    pub limits: LimitsConfig,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 8,
            limits: LimitsConfig::default(),
        }
    }
}

impl AnalyzerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_fetches: config.market_data.max_concurrent_fetches.max(1),
            limits: config.limits.clone(),
        }
    }
}

/// 조회에 성공한 자산의 해석 정보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    /// 요청된 티커
    pub requested: String,
    /// 실제로 사용된 식별자
    pub asset: String,
    /// 원래 통화
    pub native_currency: String,
    /// 적용된 환율
    pub fx: AppliedRate,
}

/// 자산별 성과 (비율 단위).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBreakdown {
    pub asset: String,
    pub metrics: PerformanceMetrics,
    /// 정규화 가중치 (0-1)
    pub weight: f64,
}

/// 포트폴리오 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    pub period: Period,
    pub currency: Currency,
    /// 포트폴리오 가치 곡선 (첫 값 1.0)
    pub timeseries: Vec<PricePoint>,
    /// 포트폴리오 성과 지표 (비율 단위)
    pub metrics: PerformanceMetrics,
    /// 자산별 성과
    pub breakdown: Vec<AssetBreakdown>,
    /// 실제로 사용된 가중치
    pub weights: WeightMap,
    /// 조회에 성공한 자산
    pub assets: Vec<ResolvedAsset>,
    /// 조회에 실패한 자산
    pub failures: Vec<AssetFailure>,
}

impl PortfolioAnalysis {
    /// 일부 자산이 빠진 결과인지 확인합니다.
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 지수 비교 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexComparison {
    /// 요청된 지수 이름 (대문자)
    pub name: String,
    /// Yahoo 심볼
    pub symbol: String,
    pub currency: Currency,
    pub metrics: PerformanceMetrics,
    /// 정규화 곡선 (첫 값 1.0)
    pub chart_data: Vec<PricePoint>,
}

/// 환율 조회 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxQuote {
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub source: crate::currency::RateSource,
}

/// 포트폴리오 분석기.
///
/// 협력자(시장 데이터, 환율, 해설 생성기)는 생성 시 주입되며 요청 사이에
/// 공유되는 가변 상태는 없습니다.
pub struct PortfolioAnalyzer {
    market_data: Arc<dyn MarketDataProvider>,
    fx: Arc<dyn FxRateProvider>,
    narrator: Arc<dyn NarrativeGenerator>,
    settings: AnalyzerSettings,
}

impl PortfolioAnalyzer {
    /// 규칙 기반 해설 생성기와 기본 설정으로 분석기를 만듭니다.
    pub fn new(market_data: Arc<dyn MarketDataProvider>, fx: Arc<dyn FxRateProvider>) -> Self {
        Self {
            market_data,
            fx,
            narrator: Arc::new(RuleBasedNarrator::new()),
            settings: AnalyzerSettings::default(),
        }
    }

    /// 해설 생성기 지정.
    pub fn with_narrator(mut self, narrator: Arc<dyn NarrativeGenerator>) -> Self {
        self.narrator = narrator;
        self
    }

    /// 실행 설정 지정.
    pub fn with_settings(mut self, settings: AnalyzerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    /// 사용 중인 해설 생성기 이름.
    pub fn narrator_name(&self) -> &str {
        self.narrator.name()
    }

    fn concurrency(&self) -> usize {
        self.settings.max_concurrent_fetches.max(1)
    }

    /// 포트폴리오 성과를 계산합니다.
    ///
    /// 요청은 조회 전에 검증되며, 잘못된 요청은 [`PortfoError::InvalidRequest`]입니다.
    #[instrument(
        skip(self, request),
        fields(tickers = request.tickers.len(), period = %request.period, currency = %request.currency)
    )]
    pub async fn analyze(&self, request: &PortfolioRequest) -> PortfoResult<PortfolioAnalysis> {
        request.check(self.settings.limits.max_portfolio_tickers)?;
        self.run(&request.holdings(), request.period, request.currency)
            .await
    }

    /// 임의 배율의 가중치를 가진 보유 종목으로 성과를 계산합니다.
    ///
    /// 가중치 합계가 1일 필요는 없지만 양수여야 합니다.
    #[instrument(skip(self, holdings), fields(holdings = holdings.len()))]
    pub async fn analyze_holdings(
        &self,
        holdings: &[Holding],
        period: Period,
        currency: Currency,
    ) -> PortfoResult<PortfolioAnalysis> {
        if holdings.is_empty() {
            return Err(PortfoError::InvalidRequest("Portfolio is empty".to_string()));
        }
        if holdings.len() > self.settings.limits.max_portfolio_tickers {
            return Err(PortfoError::InvalidRequest(format!(
                "Maximum {} tickers allowed per portfolio",
                self.settings.limits.max_portfolio_tickers
            )));
        }
        if holdings.iter().any(|h| h.ticker.trim().is_empty()) {
            return Err(PortfoError::InvalidRequest(
                "Ticker symbols must not be blank".to_string(),
            ));
        }
        if holdings.iter().any(|h| !h.weight.is_finite() || h.weight < 0.0) {
            return Err(PortfoError::InvalidRequest(
                "Weights must be non-negative numbers".to_string(),
            ));
        }
        let total: f64 = holdings.iter().map(|h| h.weight).sum();
        if total <= 0.0 {
            return Err(PortfoError::InvalidRequest(
                "Total portfolio weight cannot be zero".to_string(),
            ));
        }

        self.run(holdings, period, currency).await
    }

    /// 자산 하나를 조회하고 보고 통화로 변환합니다.
    async fn fetch_converted(
        &self,
        ticker: &str,
        period: Period,
        currency: Currency,
    ) -> Result<ConvertedSeries, String> {
        let series = self
            .market_data
            .fetch_history(ticker, period)
            .await
            .map_err(|e| e.to_string())?;
        if series.is_empty() {
            return Err(format!("no data available for {}", ticker));
        }
        convert_series(self.fx.as_ref(), series, currency.code())
            .await
            .map_err(|e| e.to_string())
    }

    async fn run(
        &self,
        holdings: &[Holding],
        period: Period,
        currency: Currency,
    ) -> PortfoResult<PortfolioAnalysis> {
        // 완료 순서와 무관하게 요청 순서를 유지
        let outcomes: Vec<(&Holding, Result<ConvertedSeries, String>)> = stream::iter(
            holdings
                .iter()
                .map(|holding| async move {
                    let outcome = self.fetch_converted(&holding.ticker, period, currency).await;
                    (holding, outcome)
                })
                .collect::<Vec<_>>(),
        )
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut requested: BTreeMap<String, f64> = BTreeMap::new();
        let mut series = Vec::new();
        let mut assets = Vec::new();
        let mut failures = Vec::new();

        for (holding, outcome) in outcomes {
            match outcome {
                Ok(converted) => {
                    let asset = converted.series.symbol().to_string();
                    if !requested.contains_key(&asset) {
                        assets.push(ResolvedAsset {
                            requested: holding.ticker.clone(),
                            asset: asset.clone(),
                            native_currency: converted.native_currency.clone(),
                            fx: converted.applied,
                        });
                        series.push(converted.series);
                    } else {
                        debug!(asset = %asset, requested = %holding.ticker, "중복 자산, 가중치 합산");
                    }
                    *requested.entry(asset).or_insert(0.0) += holding.weight;
                }
                Err(reason) => {
                    warn!(ticker = %holding.ticker, reason = %reason, "자산 조회 실패, 제외");
                    failures.push(AssetFailure::new(holding.ticker.clone(), reason));
                }
            }
        }

        if series.is_empty() {
            return Err(PortfoError::AllAssetsFailed(failures));
        }

        let normalized = AlignedFrame::align(&series)?.rebased();
        let weights = resolve_weights(&requested, &normalized.assets());
        let curve = aggregate(&normalized, &weights)?;
        let metrics = metrics_from_values(&curve.values());

        let breakdown = normalized
            .columns()
            .iter()
            .map(|column| AssetBreakdown {
                asset: column.asset.clone(),
                metrics: metrics_from_values(&column.values),
                weight: weights.get(&column.asset).unwrap_or(0.0),
            })
            .collect();

        info!(
            assets = assets.len(),
            failed = failures.len(),
            days = curve.len(),
            weight_method = ?weights.method(),
            total_return = metrics.total_return,
            "포트폴리오 분석 완료"
        );

        Ok(PortfolioAnalysis {
            period,
            currency,
            timeseries: curve.into_points(),
            metrics,
            breakdown,
            weights,
            assets,
            failures,
        })
    }

    /// 단일 자산의 일별 이력과 요약.
    ///
    /// `currency`가 없으면 자산의 원래 통화로 보고합니다.
    #[instrument(skip(self))]
    pub async fn asset_history(
        &self,
        ticker: &str,
        period: Period,
        currency: Option<Currency>,
    ) -> PortfoResult<AssetHistory> {
        if ticker.trim().is_empty() {
            return Err(PortfoError::InvalidRequest("Ticker is required".to_string()));
        }

        let series = self.market_data.fetch_history(ticker, period).await?;
        if series.is_empty() {
            return Err(PortfoError::NotFound(ticker.to_string()));
        }

        let profile = match self.market_data.fetch_profile(series.symbol()).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(symbol = series.symbol(), error = %e, "종목 정보 조회 실패, 기본값 사용");
                AssetProfile::minimal(series.symbol(), series.currency())
            }
        };

        let target = currency
            .map(|c| c.code().to_string())
            .unwrap_or_else(|| series.currency().to_string());
        let converted = convert_series(self.fx.as_ref(), series, &target)
            .await
            .map_err(|e| PortfoError::Internal(e.to_string()))?;

        let metadata = history_metadata(&converted.series, &converted.native_currency, &profile)
            .ok_or_else(|| PortfoError::NotFound(ticker.to_string()))?;

        Ok(AssetHistory {
            ticker: converted.series.symbol().to_string(),
            period,
            data: history_points(&converted.series),
            metadata,
        })
    }

    /// 여러 자산의 일별 이력 (원래 통화).
    ///
    /// 개별 실패는 `errors`에 기록됩니다.
    #[instrument(skip(self, tickers), fields(count = tickers.len()))]
    pub async fn batch_history(
        &self,
        tickers: &[String],
        period: Period,
    ) -> PortfoResult<BatchHistory> {
        let tickers: Vec<&str> = tickers
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tickers.is_empty() {
            return Err(PortfoError::InvalidRequest(
                "At least one ticker must be provided".to_string(),
            ));
        }
        let max = self.settings.limits.max_batch_tickers;
        if tickers.len() > max {
            return Err(PortfoError::InvalidRequest(format!(
                "Maximum {} tickers allowed per request",
                max
            )));
        }

        let outcomes: Vec<_> = stream::iter(
            tickers
                .into_iter()
                .map(|ticker| async move {
                    let outcome = self.market_data.fetch_history(ticker, period).await;
                    (ticker, outcome)
                })
                .collect::<Vec<_>>(),
        )
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut batch = BatchHistory::default();
        for (ticker, outcome) in outcomes {
            match outcome {
                Ok(series) if !series.is_empty() => {
                    let data = history_points(&series);
                    batch.push_result(BatchEntry {
                        ticker: series.symbol().to_string(),
                        period,
                        data_points: data.len(),
                        data,
                    });
                }
                Ok(_) => batch.push_error(ticker, format!("no data available for {}", ticker)),
                Err(e) => {
                    warn!(ticker, error = %e, "배치 이력 조회 실패");
                    batch.push_error(ticker, e.to_string());
                }
            }
        }

        info!(
            success = batch.success_count,
            errors = batch.error_count,
            "배치 이력 조회 완료"
        );
        Ok(batch)
    }

    /// 주요 지수의 정규화 곡선과 성과 지표.
    ///
    /// 지수 별칭 테이블에 있는 이름만 허용합니다.
    #[instrument(skip(self))]
    pub async fn index_comparison(
        &self,
        name: &str,
        period: Period,
        currency: Option<Currency>,
    ) -> PortfoResult<IndexComparison> {
        let name = name.trim().to_uppercase();
        let symbol = resolve_index(&name)
            .ok_or_else(|| PortfoError::InvalidRequest(format!("Invalid index name: {}", name)))?;

        let series = self.market_data.fetch_history(symbol, period).await?;
        if series.is_empty() {
            return Err(PortfoError::NotFound(symbol.to_string()));
        }

        let currency = currency.unwrap_or_default();
        let converted = convert_series(self.fx.as_ref(), series, currency.code())
            .await
            .map_err(|e| PortfoError::Internal(e.to_string()))?;

        let values = rebase(&converted.series.values());
        let dates: Vec<_> = converted.series.dates().collect();

        Ok(IndexComparison {
            name,
            symbol: symbol.to_string(),
            currency,
            metrics: metrics_from_values(&values),
            chart_data: zip_points(&dates, &values),
        })
    }

    /// 종목 기본 정보.
    #[instrument(skip(self))]
    pub async fn profile(&self, ticker: &str) -> PortfoResult<AssetProfile> {
        if ticker.trim().is_empty() {
            return Err(PortfoError::InvalidRequest("Ticker is required".to_string()));
        }
        Ok(self.market_data.fetch_profile(ticker).await?)
    }

    /// 현재 환율. 제공자가 실패하면 고정 대체 환율입니다.
    pub async fn fx_quote(&self, from: &str, to: &str) -> PortfoResult<FxQuote> {
        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();
        if from.is_empty() || to.is_empty() {
            return Err(PortfoError::InvalidRequest("Currency codes are required".to_string()));
        }

        let applied = resolve_rate(self.fx.as_ref(), &from, &to, None).await;
        Ok(FxQuote {
            from,
            to,
            rate: applied.rate,
            source: applied.source,
        })
    }

    /// 종목별 추천과 (지원 시) 전체 전망.
    ///
    /// 개별 종목 분석 실패는 에러가 아니라 "Unable to analyze" 추천이 됩니다.
    #[instrument(skip(self, tickers), fields(count = tickers.len(), narrator = self.narrator.name()))]
    pub async fn recommend(&self, tickers: &[String]) -> PortfoResult<RecommendationReport> {
        if tickers.is_empty() {
            return Err(PortfoError::InvalidRequest(
                "At least one ticker is required".to_string(),
            ));
        }
        let max = self.settings.limits.max_recommend_tickers;
        if tickers.len() > max {
            return Err(PortfoError::InvalidRequest(format!(
                "Maximum {} tickers allowed per request",
                max
            )));
        }

        let recommendations: Vec<Recommendation> = stream::iter(
            tickers
                .iter()
                .map(|ticker| async move { self.recommend_one(ticker).await })
                .collect::<Vec<_>>(),
        )
            .buffered(self.concurrency())
            .collect()
            .await;

        let summary = if recommendations.len() > 1 {
            self.narrator.portfolio_outlook(&recommendations).await
        } else {
            None
        };

        Ok(RecommendationReport {
            recommendations,
            summary,
        })
    }

    async fn recommend_one(&self, ticker: &str) -> Recommendation {
        let normalized = normalize_ticker(ticker);
        match self.build_insight(&normalized).await {
            Ok(insight) => {
                let text = self.narrator.summarize(&insight).await;
                Recommendation {
                    ticker: insight.ticker.clone(),
                    recommendation: text,
                    confidence: Some(insight.confidence()),
                    key_points: insight.key_points(),
                }
            }
            Err(e) => {
                warn!(ticker = %normalized, error = %e, "종목 분석 실패");
                Recommendation::unavailable(normalized, e)
            }
        }
    }

    /// 프로필과 1년/5년 이력으로 인사이트를 만듭니다.
    ///
    /// 이력 조회 실패는 해당 기간 지표만 비웁니다.
    async fn build_insight(&self, ticker: &str) -> PortfoResult<AssetInsight> {
        let profile = self.market_data.fetch_profile(ticker).await?;
        let symbol = profile.symbol.clone();

        let (one_year, five_year) = futures::join!(
            self.market_data.fetch_history(&symbol, Period::OneYear),
            self.market_data.fetch_history(&symbol, Period::FiveYears),
        );

        Ok(AssetInsight::build(
            &profile,
            one_year.ok().as_ref(),
            five_year.ok().as_ref(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let mut config = AppConfig::default();
        config.market_data.max_concurrent_fetches = 0;
        config.limits.max_batch_tickers = 3;
        let settings = AnalyzerSettings::from_config(&config);
        assert_eq!(settings.max_concurrent_fetches, 1);
        assert_eq!(settings.limits.max_batch_tickers, 3);
    }
}
