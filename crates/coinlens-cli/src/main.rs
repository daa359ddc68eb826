//! 암호화폐 시장 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # Binance BTCUSDT 4시간봉 100개 분석
//! coinlens analyze -s BTCUSDT -i 4h -l 100
//!
//! # JSON 출력, 설정 파일 지정
//! coinlens analyze -s ETHUSDT -i 1h --format json --config config/coinlens.toml
//!
//! # 네트워크 없이 합성 데이터로 분석
//! coinlens demo -s BTCUSDT -i 4h --seed 7
//!
//! # 지원 타임프레임 목록
//! coinlens timeframes
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coinlens_cli::commands::analyze::{run_analyze, AnalyzeRequest};
use coinlens_cli::commands::demo::run_demo;
use coinlens_cli::commands::timeframes::format_timeframes;
use coinlens_cli::{OutputFormat, Settings};
use coinlens_core::{init_logging, Timeframe};
use tracing::debug;

#[derive(Parser)]
#[command(name = "coinlens")]
#[command(about = "Crypto market analysis - indicators, signals and sentiment", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (TOML). 지정하지 않으면 config/coinlens.toml이 있을 때만 읽습니다.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Binance 캔들을 조회해 분석
    Analyze {
        /// 거래 쌍 (예: BTCUSDT, BTC/USDT)
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// 타임프레임 (1m, 5m, 15m, 1h, 4h, 1d 등)
        #[arg(short, long, default_value = "4h")]
        interval: Timeframe,

        /// 캔들 수 (기본: 설정의 exchange.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// 출력 형식
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 합성 캔들로 분석 (오프라인)
    Demo {
        /// 거래 쌍 (기준가: BTC 65,000, ETH 3,500, 그 외 300)
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// 타임프레임
        #[arg(short, long, default_value = "4h")]
        interval: Timeframe,

        /// 캔들 수
        #[arg(short, long)]
        limit: Option<usize>,

        /// 난수 시드
        #[arg(long, default_value = "42")]
        seed: u64,

        /// 출력 형식
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// 지원 타임프레임 목록
    Timeframes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일은 있을 때만 사용
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    init_logging(&settings.logging)?;
    debug!(config = ?cli.config, "Settings loaded");

    let output = match cli.command {
        Commands::Analyze {
            symbol,
            interval,
            limit,
            format,
        } => {
            let request = AnalyzeRequest {
                symbol,
                timeframe: interval,
                limit,
                format,
            };
            run_analyze(&settings, request).await?
        }

        Commands::Demo {
            symbol,
            interval,
            limit,
            seed,
            format,
        } => {
            let request = AnalyzeRequest {
                symbol,
                timeframe: interval,
                limit,
                format,
            };
            run_demo(&settings, request, seed).await?
        }

        Commands::Timeframes => format_timeframes(),
    };

    println!("{}", output);
    Ok(())
}
