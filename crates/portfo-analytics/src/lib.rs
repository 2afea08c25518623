//! 포트폴리오 성과 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 통화 변환 (첫 거래일 기준 고정 환율)
//! - 시계열 정렬 및 정규화 (합집합 달력, forward/backward fill, 1.0 재기준화)
//! - 가중치 재정규화 및 동일 가중치 대체
//! - 포트폴리오 가치 곡선 합산
//! - 성과 지표 계산 (총/연환산 수익률, 변동성, 최대낙폭, 샤프비율)
//! - 배치 오케스트레이터 ([`PortfolioAnalyzer`])
//! - 단일 자산 이력, 지수 비교, 종목 추천
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use portfo_analytics::PortfolioAnalyzer;
//! use portfo_core::{Currency, Period, PortfolioRequest};
//! use portfo_data::{InMemoryMarketDataProvider, StaticFxRateProvider};
//!
//! let analyzer = PortfolioAnalyzer::new(
//!     Arc::new(InMemoryMarketDataProvider::new()),
//!     Arc::new(StaticFxRateProvider::new()),
//! );
//! let request = PortfolioRequest::new(
//!     vec!["AAPL".into(), "RY".into()],
//!     vec![0.6, 0.4],
//!     Period::OneYear,
//!     Currency::Cad,
//! );
//! let analysis = analyzer.analyze(&request).await?;
//! println!("총 수익률: {:.2}%", analysis.metrics.as_percent().total_return);
//! ```

pub mod aggregate;
pub mod alignment;
pub mod currency;
pub mod history;
pub mod insight;
pub mod narrative;
pub mod orchestrator;
pub mod performance;
pub mod weights;

pub use aggregate::{aggregate, PortfolioCurve};
pub use alignment::{rebase, AlignedColumn, AlignedFrame};
pub use currency::{convert_series, resolve_rate, AppliedRate, ConvertedSeries, RateSource};
pub use history::{AssetHistory, BatchEntry, BatchHistory, HistoryMetadata, HistoryPoint};
pub use insight::{AssetInsight, Confidence, HorizonStats, Recommendation, RecommendationReport};
pub use narrative::{narrator_from_config, NarrativeGenerator, OpenAiNarrator, RuleBasedNarrator};
pub use orchestrator::{
    AnalyzerSettings, AssetBreakdown, FxQuote, IndexComparison, PortfolioAnalysis,
    PortfolioAnalyzer, ResolvedAsset,
};
pub use performance::{calculate_metrics, metrics_from_values, pct_change, TRADING_DAYS_PER_YEAR};
pub use weights::resolve_weights;
