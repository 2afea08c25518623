//! 포트폴리오 성과 분석 명령어.
//!
//! 티커와 가중치로 포트폴리오 가치 곡선을 만들고 성과 지표를 출력합니다.
//! 조회에 실패한 종목은 제외되고 나머지 가중치가 재정규화됩니다.

use anyhow::Result;
use tracing::{info, warn};

use portfo_analytics::{PortfolioAnalysis, PortfolioAnalyzer};
use portfo_core::{Currency, Period, PortfolioRequest};

use super::context::fmt_pct;

/// analyze 명령 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub tickers: Vec<String>,
    pub weights: Vec<f64>,
    pub period: Period,
    pub currency: Currency,
}

/// 포트폴리오 분석 실행.
pub async fn analyze(analyzer: &PortfolioAnalyzer, config: AnalyzeConfig) -> Result<PortfolioAnalysis> {
    let request = PortfolioRequest::new(config.tickers, config.weights, config.period, config.currency);
    let analysis = analyzer.analyze(&request).await?;

    if analysis.is_degraded() {
        warn!(
            failed = analysis.failures.len(),
            "일부 종목이 제외된 결과입니다"
        );
    }
    info!(
        assets = analysis.assets.len(),
        points = analysis.timeseries.len(),
        "포트폴리오 분석 완료"
    );

    Ok(analysis)
}

/// 분석 결과를 사람이 읽는 표 형식으로 만듭니다.
pub fn render_analysis(analysis: &PortfolioAnalysis) -> String {
    let mut lines = Vec::new();

    let range = match (analysis.timeseries.first(), analysis.timeseries.last()) {
        (Some(first), Some(last)) => format!("{} ~ {}", first.date, last.date),
        _ => "-".to_string(),
    };
    lines.push(format!(
        "포트폴리오 ({}, {})  {}",
        analysis.period, analysis.currency, range
    ));

    let m = &analysis.metrics;
    lines.push(format!("  총 수익률        {:>10}", fmt_pct(m.total_return)));
    lines.push(format!("  연환산 수익률    {:>10}", fmt_pct(m.annualized_return)));
    lines.push(format!("  변동성           {:>10}", fmt_pct(m.annualized_volatility)));
    lines.push(format!("  최대 낙폭        {:>10}", fmt_pct(m.max_drawdown)));
    lines.push(format!("  샤프 비율        {:>10.2}", m.sharpe_ratio));
    lines.push(String::new());

    lines.push(format!(
        "{:<12} {:>8} {:>10} {:>10} {:>10}",
        "티커", "가중치", "수익률", "변동성", "최대 낙폭"
    ));
    for entry in &analysis.breakdown {
        lines.push(format!(
            "{:<12} {:>7.1}% {:>10} {:>10} {:>10}",
            entry.asset,
            entry.weight * 100.0,
            fmt_pct(entry.metrics.total_return),
            fmt_pct(entry.metrics.annualized_volatility),
            fmt_pct(entry.metrics.max_drawdown),
        ));
    }

    for asset in analysis.assets.iter().filter(|a| a.native_currency != analysis.currency.code()) {
        lines.push(format!(
            "* {} {} → {} 환율 {:.4}",
            asset.asset,
            asset.native_currency,
            analysis.currency,
            asset.fx.rate
        ));
    }

    if !analysis.failures.is_empty() {
        lines.push(String::new());
        lines.push("제외된 종목:".to_string());
        for failure in &analysis.failures {
            lines.push(format!("  - {}", failure));
        }
    }

    lines.join("\n")
}
