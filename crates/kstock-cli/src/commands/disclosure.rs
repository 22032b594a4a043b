//! DART 공시 조회.

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use kstock_core::now_kst;
use kstock_data::provider::dart::DEFAULT_DISCLOSURE_SYMBOLS;
use kstock_data::{DisclosureQuery, DisclosureResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::context::AppContext;
use crate::output::emit;

/// `disclosure` 명령 설정.
#[derive(Debug)]
pub struct DisclosureConfig {
    pub symbol: Option<String>,
    pub symbols: Vec<String>,
    pub query: DisclosureQuery,
    pub output: Option<PathBuf>,
}

/// 여러 종목 공시 응답.
#[derive(Debug, Serialize)]
pub struct MultiDisclosureResponse {
    pub success: bool,
    pub timestamp: DateTime<FixedOffset>,
    pub data: BTreeMap<String, DisclosureResult>,
}

pub async fn run(ctx: &AppContext, config: DisclosureConfig) -> Result<()> {
    let dart = ctx.dart_client()?;
    let today = ctx.today();

    if let Some(symbol) = &config.symbol {
        let result = dart.fetch_disclosures(symbol, today, config.query).await;
        return emit(&result, config.output.as_deref());
    }

    let symbols: Vec<String> = if config.symbols.is_empty() {
        DEFAULT_DISCLOSURE_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        config.symbols
    };

    let mut data = BTreeMap::new();
    for symbol in symbols {
        let result = dart.fetch_disclosures(&symbol, today, config.query).await;
        data.insert(symbol, result);
    }

    tracing::info!(symbols = data.len(), major_only = config.query.major_only, "공시 조회 완료");

    let response = MultiDisclosureResponse {
        success: true,
        timestamp: now_kst(),
        data,
    };
    emit(&response, config.output.as_deref())
}
