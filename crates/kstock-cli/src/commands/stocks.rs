//! 전체 종목 카탈로그 구축 및 검색.

use anyhow::Result;
use kstock_core::{ListingResponse, SearchResponse, SearchSource};
use kstock_data::load_catalog;
use std::path::PathBuf;

use crate::context::AppContext;
use crate::output::emit;

/// `stocks` 명령 설정.
#[derive(Debug)]
pub struct StocksConfig {
    /// 검색어 (없으면 전체 목록)
    pub search: Option<String>,
    /// 최대 결과 수 (목록은 0이면 전체)
    pub limit: usize,
    /// 캐시 파일 경로
    pub cache: Option<PathBuf>,
    /// 캐시 무시
    pub refresh: bool,
}

/// KRX 데이터로 카탈로그를 구축(또는 당일 캐시 로드)하고 출력합니다.
pub async fn run(ctx: &AppContext, config: StocksConfig) -> Result<()> {
    let krx = ctx.krx_client()?;
    let gate = ctx.cache_gate(config.cache);

    let catalog = load_catalog(&krx, &gate, ctx.today(), config.refresh).await?;

    match config.search {
        Some(query) => {
            let results = catalog.search(&query, config.limit);
            tracing::info!(query = %query, found = results.len(), "카탈로그 검색 완료");
            emit(&SearchResponse::new(query, results, SearchSource::Krx), None)
        }
        None => emit(&ListingResponse::new(catalog.entries(), config.limit), None),
    }
}
