//! 국내 주식 카탈로그/검색/시세 CLI.
//!
//! 모든 명령은 JSON 문서 하나를 표준 출력에 씁니다. 실패하면
//! `{success: false, error, timestamp}`를 출력하고 종료 코드 1로 끝납니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 종목 목록 (당일 캐시 사용)
//! kstock stocks --limit 0
//!
//! # 카탈로그에서 검색
//! kstock stocks -s 삼성
//!
//! # 단계별 검색 (KRX → 네이버 → 내장 목록)
//! kstock search -q 하이닉스
//!
//! # 시세 조회
//! kstock price -m 005930 000660
//!
//! # 주요 공시만 조회
//! kstock disclosure -s 005930 --major-only
//!
//! # 뉴스 조회
//! kstock news -s 005930 -n 삼성전자
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use kstock_core::{init_logging, AppConfig, Credentials, ErrorResponse, LogConfig, DEFAULT_CONFIG_PATH};
use kstock_data::DisclosureQuery;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;
mod output;

use commands::disclosure::DisclosureConfig;
use commands::news::NewsConfig;
use commands::price::PriceConfig;
use commands::search::SearchConfig;
use commands::stocks::StocksConfig;
use context::AppContext;

#[derive(Parser)]
#[command(name = "kstock")]
#[command(about = "국내 주식 종목 카탈로그, 검색, 시세, 공시, 뉴스 조회", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error). 없으면 설정 파일 값
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 설정 파일 경로
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 종목 카탈로그 (KOSPI, KOSDAQ, KONEX, ETF, ETN, 지수)
    Stocks {
        /// 검색어 (종목명, 종목코드, 검색어)
        #[arg(short, long)]
        search: Option<String>,

        /// 최대 결과 수 (목록은 0 = 전체)
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// 캐시 파일 경로
        #[arg(short, long)]
        cache: Option<PathBuf>,

        /// 캐시 무시하고 새로 구축
        #[arg(short, long)]
        refresh: bool,
    },

    /// 단계별 종목 검색 (KRX → 네이버 → 내장 목록)
    Search {
        /// 검색어
        #[arg(short, long)]
        query: String,

        /// 최대 결과 수 (기본: 설정의 search.default_limit)
        #[arg(short, long)]
        limit: Option<usize>,

        /// 내장 종목 목록만 사용
        #[arg(long)]
        fallback_only: bool,

        /// 캐시 파일 경로
        #[arg(long)]
        cache: Option<PathBuf>,

        /// 캐시 무시하고 카탈로그 새로 구축
        #[arg(short, long)]
        refresh: bool,
    },

    /// 종목 시세 (KRX 일별 매매정보)
    Price {
        /// 단일 종목코드 (예: 005930)
        #[arg(short, long)]
        symbol: Option<String>,

        /// 여러 종목코드
        #[arg(short = 'm', long, num_args = 1..)]
        symbols: Vec<String>,

        /// 출력 파일 경로 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// DART 공시 조회
    Disclosure {
        /// 단일 종목코드
        #[arg(short, long)]
        symbol: Option<String>,

        /// 여러 종목코드
        #[arg(short = 'm', long, num_args = 1..)]
        symbols: Vec<String>,

        /// 종목당 최대 공시 수
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// 조회 기간 (일)
        #[arg(short, long, default_value = "30")]
        days: i64,

        /// 주요 공시만 (종목당 최대 10건)
        #[arg(long)]
        major_only: bool,

        /// 출력 파일 경로
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 종목 관련 뉴스
    News {
        /// 종목코드
        #[arg(short, long)]
        symbol: String,

        /// 회사명 (기본: 종목{코드})
        #[arg(short, long)]
        name: Option<String>,

        /// 최대 기사 수
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// DART 회사 고유번호 매핑 파일 생성
    CorpCodes {
        /// 매핑 파일 경로 (기본: corp_codes_mapping.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(&cli.config)?;

    let mut log_config = LogConfig::from_settings(&config.logging);
    if let Some(level) = cli.log_level {
        log_config.level = level;
    }
    if let Err(e) = init_logging(log_config) {
        eprintln!("로깅 초기화 실패: {}", e);
    }

    tracing::debug!(config_path = %cli.config.display(), "설정 로드 완료");

    let ctx = AppContext::new(config, Credentials::from_env());

    match cli.command {
        Commands::Stocks {
            search,
            limit,
            cache,
            refresh,
        } => {
            commands::stocks::run(
                &ctx,
                StocksConfig {
                    search,
                    limit,
                    cache,
                    refresh,
                },
            )
            .await
        }
        Commands::Search {
            query,
            limit,
            fallback_only,
            cache,
            refresh,
        } => {
            let limit = ctx.search_limit(limit);
            commands::search::run(
                &ctx,
                SearchConfig {
                    query,
                    limit,
                    fallback_only,
                    cache,
                    refresh,
                },
            )
            .await
        }
        Commands::Price {
            symbol,
            symbols,
            output,
        } => {
            commands::price::run(
                &ctx,
                PriceConfig {
                    symbol,
                    symbols,
                    output,
                },
            )
            .await
        }
        Commands::Disclosure {
            symbol,
            symbols,
            limit,
            days,
            major_only,
            output,
        } => {
            commands::disclosure::run(
                &ctx,
                DisclosureConfig {
                    symbol,
                    symbols,
                    query: DisclosureQuery {
                        limit,
                        days,
                        major_only,
                    },
                    output,
                },
            )
            .await
        }
        Commands::News {
            symbol,
            name,
            limit,
        } => commands::news::run(&ctx, NewsConfig { symbol, name, limit }).await,
        Commands::CorpCodes { output } => commands::corp_codes::run(&ctx, output).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "명령 실행 실패");
            let response = ErrorResponse::new(format!("{:#}", e));
            match output::to_pretty_json(&response) {
                Ok(json) => println!("{}", json),
                Err(_) => println!(r#"{{"success": false, "error": "{}"}}"#, e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_price_symbols() {
        let cli = Cli::parse_from(["kstock", "price", "-m", "005930", "000660"]);
        match cli.command {
            Commands::Price { symbol, symbols, .. } => {
                assert!(symbol.is_none());
                assert_eq!(symbols, vec!["005930", "000660"]);
            }
            _ => panic!("price 명령이 아님"),
        }
    }

    #[test]
    fn test_parse_stocks_defaults() {
        let cli = Cli::parse_from(["kstock", "stocks", "-s", "삼성", "-r"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Commands::Stocks {
                search,
                limit,
                refresh,
                ..
            } => {
                assert_eq!(search.as_deref(), Some("삼성"));
                assert_eq!(limit, 20);
                assert!(refresh);
            }
            _ => panic!("stocks 명령이 아님"),
        }
    }

    #[test]
    fn test_parse_search_refresh() {
        let cli = Cli::parse_from(["kstock", "search", "-q", "하이닉스", "--refresh"]);
        match cli.command {
            Commands::Search {
                query,
                limit,
                refresh,
                fallback_only,
                ..
            } => {
                assert_eq!(query, "하이닉스");
                assert!(limit.is_none());
                assert!(refresh);
                assert!(!fallback_only);
            }
            _ => panic!("search 명령이 아님"),
        }
    }

    #[test]
    fn test_parse_disclosure_flags() {
        let cli = Cli::parse_from(["kstock", "disclosure", "-s", "005930", "-d", "7", "--major-only"]);
        match cli.command {
            Commands::Disclosure {
                days,
                major_only,
                limit,
                ..
            } => {
                assert_eq!(days, 7);
                assert!(major_only);
                assert_eq!(limit, 10);
            }
            _ => panic!("disclosure 명령이 아님"),
        }
    }
}
