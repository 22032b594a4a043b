//! 단계별 종목 검색 (KRX 카탈로그 → 네이버 → 내장 목록).

use anyhow::Result;
use kstock_data::{CatalogTier, FallbackChain, NaverTier, StaticTier};
use std::path::PathBuf;

use crate::context::AppContext;
use crate::output::emit;

/// `search` 명령 설정.
#[derive(Debug)]
pub struct SearchConfig {
    pub query: String,
    pub limit: usize,
    /// 네트워크 단계를 건너뛰고 내장 목록만 사용
    pub fallback_only: bool,
    pub cache: Option<PathBuf>,
    /// 캐시 무시하고 카탈로그 새로 구축
    pub refresh: bool,
}

/// 검색 체인 구성.
///
/// KRX 인증키가 없으면 카탈로그 단계를, 클라이언트 생성에 실패하면
/// 네이버 단계를 생략합니다.
fn build_chain(ctx: &AppContext, config: &SearchConfig) -> FallbackChain {
    let mut chain = FallbackChain::new();

    if !config.fallback_only {
        match ctx.krx_client() {
            Ok(krx) => {
                let gate = ctx.cache_gate(config.cache.clone());
                let tier = CatalogTier::new(Box::new(krx), gate, ctx.today()).with_refresh(config.refresh);
                chain = chain.with_tier(tier);
            }
            Err(e) => tracing::warn!(error = %e, "KRX 단계 생략"),
        }

        match ctx.naver_search() {
            Ok(naver) => chain = chain.with_tier(NaverTier::new(naver)),
            Err(e) => tracing::warn!(error = %e, "네이버 단계 생략"),
        }
    }

    chain.with_tier(StaticTier::new())
}

pub async fn run(ctx: &AppContext, config: SearchConfig) -> Result<()> {
    let chain = build_chain(ctx, &config);
    tracing::debug!(tiers = chain.len(), query = %config.query, "검색 시작");

    let response = chain.resolve(&config.query, config.limit).await;
    emit(&response, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kstock_core::{AppConfig, Credentials, SearchSource};

    #[tokio::test]
    async fn test_fallback_only_uses_static_catalog() {
        let ctx = AppContext::new(AppConfig::default(), Credentials::default());
        let config = SearchConfig {
            query: "삼성".to_string(),
            limit: 3,
            fallback_only: true,
            cache: None,
            refresh: false,
        };

        let chain = build_chain(&ctx, &config);
        assert_eq!(chain.len(), 1);

        let response = chain.resolve(&config.query, config.limit).await;
        assert_eq!(response.source, SearchSource::Fallback);
        assert_eq!(response.results.len(), 3);
    }

    #[test]
    fn test_missing_krx_key_skips_catalog_tier() {
        let ctx = AppContext::new(AppConfig::default(), Credentials::default());
        let config = SearchConfig {
            query: "삼성".to_string(),
            limit: 20,
            fallback_only: false,
            cache: None,
            refresh: false,
        };

        // 네이버 + 내장 목록
        assert_eq!(build_chain(&ctx, &config).len(), 2);
    }
}
