//! 종목 시세 조회.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use kstock_core::{now_kst, KstockError};
use kstock_data::{QuoteFetcher, StockQuote, DEFAULT_QUOTE_SYMBOLS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::context::AppContext;
use crate::output::emit;

/// `price` 명령 설정.
#[derive(Debug)]
pub struct PriceConfig {
    pub symbol: Option<String>,
    pub symbols: Vec<String>,
    pub output: Option<PathBuf>,
}

/// 종목별 조회 실패.
#[derive(Debug, Serialize)]
pub struct QuoteError {
    pub success: bool,
    pub error: String,
    pub symbol: String,
    pub timestamp: DateTime<FixedOffset>,
}

/// 종목 하나의 시세 또는 실패.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum QuoteOutcome {
    Quote(Box<StockQuote>),
    Error(QuoteError),
}

/// 여러 종목 시세 응답.
#[derive(Debug, Serialize)]
pub struct MultiQuoteResponse {
    pub success: bool,
    pub timestamp: DateTime<FixedOffset>,
    pub data: BTreeMap<String, QuoteOutcome>,
}

async fn quote_one(fetcher: &mut QuoteFetcher<'_>, symbol: &str) -> QuoteOutcome {
    match fetcher.quote(symbol).await {
        Ok(quote) => QuoteOutcome::Quote(Box::new(quote)),
        Err(e) => {
            tracing::warn!(symbol = symbol, error = %e, "시세 조회 실패");
            QuoteOutcome::Error(QuoteError {
                success: false,
                error: format!("KRX 데이터 조회 실패: {}", e),
                symbol: symbol.to_string(),
                timestamp: now_kst(),
            })
        }
    }
}

pub async fn run(ctx: &AppContext, config: PriceConfig) -> Result<()> {
    let krx = ctx.krx_client()?;
    let mut fetcher = QuoteFetcher::new(&krx, ctx.today());

    // 단일 종목 실패는 에러 응답과 종료 코드 1
    if let Some(symbol) = &config.symbol {
        let quote = fetcher
            .quote(symbol)
            .await
            .map_err(KstockError::from)
            .context("KRX 데이터 조회 실패")?;
        return emit(&quote, config.output.as_deref());
    }

    let symbols: Vec<String> = if config.symbols.is_empty() {
        DEFAULT_QUOTE_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        config.symbols
    };

    let mut data = BTreeMap::new();
    for symbol in &symbols {
        let outcome = quote_one(&mut fetcher, symbol).await;
        data.insert(symbol.clone(), outcome);
    }

    let response = MultiQuoteResponse {
        success: true,
        timestamp: now_kst(),
        data,
    };
    emit(&response, config.output.as_deref())
}
