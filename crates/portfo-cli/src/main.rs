//! 포트폴리오 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 60/40 포트폴리오 1년 성과 (USD)
//! portfo analyze --tickers AAPL,RY --weights 0.6,0.4
//!
//! # 5년, CAD 기준, JSON 출력
//! portfo analyze --tickers AAPL,MSFT,RY --weights 0.4,0.4,0.2 --period 5y --currency CAD --json
//!
//! # 단일 종목 이력 (TSX 종목은 .TO 접미사 자동 해석)
//! portfo history --ticker RY --period 1y
//!
//! # 환율
//! portfo fx --from USD --to CAD
//! ```

use clap::{Parser, Subcommand};
use tracing::{error, info};

use portfo_cli::commands::analyze::{analyze, render_analysis, AnalyzeConfig};
use portfo_cli::commands::context::{build_analyzer, parse_list, spinner, weights_or_equal};
use portfo_cli::commands::fx::{fx_rate, render_quote};
use portfo_cli::commands::history::{history, render_history, HistoryConfig};
use portfo_core::{init_logging, AppConfig, Currency, LogConfig, LogFormat, LogOutput, Period};

#[derive(Parser)]
#[command(name = "portfo")]
#[command(about = "PortfoVision CLI - 포트폴리오 성과 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 경로
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: String,

    /// 로그 레벨 (설정 파일 값보다 우선)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 로그 형식: pretty, json, compact
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 포트폴리오 성과 분석
    Analyze {
        /// 쉼표로 구분된 티커 (예: AAPL,RY)
        #[arg(short, long)]
        tickers: String,

        /// 쉼표로 구분된 가중치, 합계 1.0 (생략 시 동일 가중치)
        #[arg(short, long)]
        weights: Option<String>,

        /// 분석 기간 (1y, 5y, 10y)
        #[arg(short, long, default_value = "1y")]
        period: Period,

        /// 보고 통화 (USD, CAD)
        #[arg(short, long, default_value = "USD")]
        currency: Currency,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 단일 종목 가격 이력
    History {
        /// 종목 티커
        #[arg(short, long)]
        ticker: String,

        /// 조회 기간 (1y, 5y, 10y)
        #[arg(short, long, default_value = "1y")]
        period: Period,

        /// 보고 통화 (생략 시 종목의 원래 통화)
        #[arg(short, long)]
        currency: Option<Currency>,

        /// JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 현재 환율 조회
    Fx {
        /// 기준 통화
        #[arg(long, default_value = "USD")]
        from: String,

        /// 대상 통화
        #[arg(long, default_value = "CAD")]
        to: String,
    },
}

impl Cli {
    /// 설정 파일의 `[logging]` 값에 명령행 옵션을 덮어씁니다. 로그는 stderr로 보냅니다.
    fn log_config(&self, config: &AppConfig) -> LogConfig {
        LogConfig::from_settings(&config.logging)
            .with_overrides(self.log_level.as_deref(), self.log_format)
            .with_output(LogOutput::Stderr)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?;
    init_logging(cli.log_config(&config)).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let analyzer = build_analyzer(&config)?;
    info!(narrator = analyzer.narrator_name(), "분석기 준비 완료");

    match cli.command {
        Commands::Analyze {
            tickers,
            weights,
            period,
            currency,
            json,
        } => {
            let tickers = parse_list(&tickers);
            let weights = weights_or_equal(&tickers, weights.as_deref())?;

            let pb = spinner(format!("{}개 종목 분석 중...", tickers.len()), !json);
            let result = analyze(
                &analyzer,
                AnalyzeConfig {
                    tickers,
                    weights,
                    period,
                    currency,
                },
            )
            .await;
            pb.finish_and_clear();

            match result {
                Ok(analysis) if json => println!("{}", serde_json::to_string_pretty(&analysis)?),
                Ok(analysis) => println!("\n{}", render_analysis(&analysis)),
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::History {
            ticker,
            period,
            currency,
            json,
        } => {
            let pb = spinner(format!("{} 이력 조회 중...", ticker), !json);
            let result = history(
                &analyzer,
                HistoryConfig {
                    ticker,
                    period,
                    currency,
                },
            )
            .await;
            pb.finish_and_clear();

            match result {
                Ok(history) if json => println!("{}", serde_json::to_string_pretty(&history)?),
                Ok(history) => println!("\n{}", render_history(&history)),
                Err(e) => {
                    error!("History lookup failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Fx { from, to } => {
            let quote = fx_rate(&analyzer, &from, &to).await?;
            println!("{}", render_quote(&quote));
        }
    }

    Ok(())
}
