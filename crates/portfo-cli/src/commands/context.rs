//! 명령어 공통 유틸리티.
//!
//! 설정에서 분석기를 구성하고, 명령행 목록 인자를 파싱합니다.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use portfo_analytics::{narrator_from_config, AnalyzerSettings, PortfolioAnalyzer};
use portfo_core::AppConfig;
use portfo_data::{default_fx_chain, YahooMarketDataProvider};

/// 설정에 맞는 실제 제공자(Yahoo Finance, 환율 체인)로 분석기를 구성합니다.
pub fn build_analyzer(config: &AppConfig) -> Result<PortfolioAnalyzer> {
    let market_data = YahooMarketDataProvider::new(config.market_data.lookback_padding_days)
        .context("Yahoo Finance 제공자 생성 실패")?;
    let fx = default_fx_chain(&config.fx).context("환율 제공자 생성 실패")?;

    Ok(PortfolioAnalyzer::new(Arc::new(market_data), Arc::new(fx))
        .with_narrator(narrator_from_config(&config.narrative))
        .with_settings(AnalyzerSettings::from_config(config)))
}

/// 쉼표로 구분된 목록을 파싱합니다. 빈 항목은 버립니다.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 쉼표로 구분된 가중치 목록을 파싱합니다.
pub fn parse_weights(raw: &str) -> Result<Vec<f64>> {
    parse_list(raw)
        .iter()
        .map(|w| {
            w.parse::<f64>()
                .with_context(|| format!("Invalid weight: {}", w))
        })
        .collect()
}

/// 가중치가 없으면 동일 가중치를 만듭니다.
pub fn weights_or_equal(tickers: &[String], weights: Option<&str>) -> Result<Vec<f64>> {
    match weights {
        Some(raw) => parse_weights(raw),
        None => {
            if tickers.is_empty() {
                bail!("At least one ticker is required");
            }
            Ok(vec![1.0 / tickers.len() as f64; tickers.len()])
        }
    }
}

/// 진행 표시 스피너 (stderr).
///
/// `visible`이 false면 숨김 상태로 생성합니다.
pub fn spinner(message: impl Into<String>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// 비율을 부호 있는 백분율 문자열로 표시합니다.
pub fn fmt_pct(ratio: f64) -> String {
    format!("{:+.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(" aapl, RY ,,msft"), vec!["aapl", "RY", "msft"]);
        assert!(parse_list(" , ").is_empty());
    }

    #[test]
    fn test_parse_weights() {
        assert_eq!(parse_weights("0.6, 0.4").unwrap(), vec![0.6, 0.4]);
        assert!(parse_weights("0.6,abc").is_err());
    }

    #[test]
    fn test_weights_or_equal() {
        let tickers = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
        assert_eq!(weights_or_equal(&tickers, None).unwrap(), vec![0.25; 4]);
        assert_eq!(weights_or_equal(&tickers, Some("1,0,0,0")).unwrap(), vec![1.0, 0.0, 0.0, 0.0]);
        assert!(weights_or_equal(&[], None).is_err());
    }

    #[test]
    fn test_fmt_pct() {
        assert_eq!(fmt_pct(0.055), "+5.50%");
        assert_eq!(fmt_pct(-0.1234), "-12.34%");
        assert_eq!(fmt_pct(0.0), "+0.00%");
    }
}
