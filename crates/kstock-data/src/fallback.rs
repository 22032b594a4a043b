//! 단계별 검색 폴백 체인.
//!
//! 각 단계는 순서대로 한 번씩만 시도합니다. 오류이거나 결과가 비어 있으면
//! 다음 단계로 넘어가고, 마지막 단계(내장 종목 목록)는 실패하지 않습니다.
//! 재시도나 백오프는 없습니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use kstock_core::{SearchHit, SearchResponse, SearchSource};

use crate::catalog::{CacheGate, Catalog, CatalogBuilder, CatalogSnapshot, MarketDataSource};
use crate::error::{DataError, Result};
use crate::provider::naver::NaverStockSearch;
use crate::provider::static_catalog::static_catalog;

/// 검색 단계.
#[async_trait]
pub trait SearchTier: Send + Sync {
    /// 응답의 `source` 필드 값
    fn source(&self) -> SearchSource;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// 당일 캐시가 있으면 사용하고, 없으면 새로 구축해 캐시에 저장합니다.
///
/// 모든 시장 구분 조회가 실패하면 `Unavailable` 오류입니다.
/// 캐시 쓰기 실패는 경고만 남깁니다.
pub async fn load_catalog(
    source: &dyn MarketDataSource,
    gate: &CacheGate,
    today: NaiveDate,
    refresh: bool,
) -> Result<Catalog> {
    if !refresh {
        if let Some(catalog) = gate.load_if_fresh(today).await {
            return Ok(catalog);
        }
    }

    let report = CatalogBuilder::build(source, today).await;
    report.log_summary(source.name());

    if report.all_failed() {
        return Err(DataError::Unavailable(format!(
            "{}: 모든 시장 구분의 종목 목록 조회에 실패했습니다.",
            source.name()
        )));
    }

    gate.store(&CatalogSnapshot::from_report(&report)).await;
    Ok(report.catalog)
}

/// 시장 데이터 카탈로그 단계.
pub struct CatalogTier {
    source: Box<dyn MarketDataSource>,
    gate: CacheGate,
    today: NaiveDate,
    refresh: bool,
}

impl CatalogTier {
    pub fn new(source: Box<dyn MarketDataSource>, gate: CacheGate, today: NaiveDate) -> Self {
        Self {
            source,
            gate,
            today,
            refresh: false,
        }
    }

    /// 캐시를 무시하고 새로 구축합니다.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }
}

#[async_trait]
impl SearchTier for CatalogTier {
    fn source(&self) -> SearchSource {
        SearchSource::Krx
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let catalog = load_catalog(self.source.as_ref(), &self.gate, self.today, self.refresh).await?;
        Ok(catalog.search(query, limit))
    }
}

/// 네이버 금융 검색 단계.
pub struct NaverTier {
    client: NaverStockSearch,
}

impl NaverTier {
    pub fn new(client: NaverStockSearch) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchTier for NaverTier {
    fn source(&self) -> SearchSource {
        SearchSource::Naver
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let entries = self
            .client
            .search(query, limit)
            .await
            .map_err(|e| DataError::Unavailable(format!("naver: {}", e)))?;

        Ok(entries.iter().take(limit).map(SearchHit::from).collect())
    }
}

/// 내장 종목 목록 단계.
pub struct StaticTier {
    catalog: Catalog,
}

impl StaticTier {
    pub fn new() -> Self {
        Self {
            catalog: static_catalog(),
        }
    }
}

impl Default for StaticTier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchTier for StaticTier {
    fn source(&self) -> SearchSource {
        SearchSource::Fallback
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        Ok(self.catalog.search(query, limit))
    }
}

/// 순서가 정해진 검색 단계 목록.
pub struct FallbackChain {
    tiers: Vec<Box<dyn SearchTier>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    pub fn with_tier(mut self, tier: impl SearchTier + 'static) -> Self {
        self.tiers.push(Box::new(tier));
        self
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// 단계를 순서대로 시도해 처음으로 결과가 있는 응답을 반환합니다.
    ///
    /// 모든 단계가 비어 있으면 마지막 단계 이름으로 빈 성공 응답을 돌려줍니다.
    pub async fn resolve(&self, query: &str, limit: usize) -> SearchResponse {
        let mut last_source = SearchSource::Fallback;

        if query.trim().is_empty() || limit == 0 {
            return SearchResponse::new(query, Vec::new(), last_source);
        }

        for tier in &self.tiers {
            last_source = tier.source();

            match tier.search(query, limit).await {
                Ok(hits) if !hits.is_empty() => {
                    tracing::info!(query = query, source = %last_source, count = hits.len(), "검색 완료");
                    return SearchResponse::new(query, hits, last_source);
                }
                Ok(_) => {
                    tracing::debug!(query = query, source = %last_source, "검색 결과 없음, 다음 단계 시도");
                }
                Err(e) => {
                    tracing::warn!(query = query, source = %last_source, error = %e, "검색 단계 실패, 다음 단계 시도");
                }
            }
        }

        SearchResponse::new(query, Vec::new(), last_source)
    }
}

impl Default for FallbackChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kstock_core::{now_kst, today_kst, CatalogEntry, Category, HttpConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FailingTier {
        source: SearchSource,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SearchTier for FailingTier {
        fn source(&self) -> SearchSource {
            self.source
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DataError::Unavailable("down".into()))
        }
    }

    struct EmptyTier;

    #[async_trait]
    impl SearchTier for EmptyTier {
        fn source(&self) -> SearchSource {
            SearchSource::Naver
        }

        async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<SearchHit>> {
            Ok(Vec::new())
        }
    }

    /// 모든 시장 구분이 실패하는 소스.
    struct DownSource;

    #[async_trait]
    impl MarketDataSource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        async fn ticker_list(&self, _category: Category, _base_date: NaiveDate) -> Result<Vec<String>> {
            Err(DataError::Unavailable("no route".into()))
        }

        async fn ticker_name(&self, _category: Category, _ticker: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    /// 호출 횟수를 세는 KOSPI 한 종목짜리 소스.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MarketDataSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn ticker_list(&self, category: Category, _base_date: NaiveDate) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match category {
                Category::Kospi => Ok(vec!["005930".to_string()]),
                _ => Ok(Vec::new()),
            }
        }

        async fn ticker_name(&self, _category: Category, _ticker: &str) -> Result<Option<String>> {
            Ok(Some("삼성전자".to_string()))
        }
    }

    fn cached_snapshot(timestamp: String) -> CatalogSnapshot {
        CatalogSnapshot {
            success: true,
            timestamp,
            total_count: 1,
            kospi_count: 1,
            kosdaq_count: 0,
            data: vec![CatalogEntry::new("000660", "SK하이닉스", Category::Kospi)],
        }
    }

    #[tokio::test]
    async fn test_same_day_cache_skips_source() {
        let dir = tempfile::tempdir().unwrap();
        let gate = CacheGate::new(dir.path().join("cache.json"));
        assert!(gate.store(&cached_snapshot(now_kst().to_rfc3339())).await);

        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource { calls: calls.clone() };

        let catalog = load_catalog(&source, &gate, today_kst(), false).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].symbol, "000660");
    }

    #[tokio::test]
    async fn test_stale_cache_is_rebuilt_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let gate = CacheGate::new(&path);
        let yesterday = now_kst() - chrono::Duration::days(1);
        assert!(gate.store(&cached_snapshot(yesterday.to_rfc3339())).await);

        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingSource { calls: calls.clone() };

        let catalog = load_catalog(&source, &gate, today_kst(), false).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), Category::ALL.len());
        assert_eq!(catalog.entries()[0].symbol, "005930");

        let written: CatalogSnapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written.is_fresh(today_kst()));
        assert_eq!(written.total_count, 1);
        assert_eq!(written.data[0].symbol, "005930");
    }

    #[tokio::test]
    async fn test_refresh_ignores_fresh_cache() {
        let dir = tempfile::tempdir().unwrap();
        let gate = CacheGate::new(dir.path().join("cache.json"));
        gate.store(&cached_snapshot(now_kst().to_rfc3339())).await;

        let calls = Arc::new(AtomicUsize::new(0));
        let tier = CatalogTier::new(
            Box::new(CountingSource { calls: calls.clone() }),
            gate,
            today_kst(),
        )
        .with_refresh(true);

        let hits = tier.search("삼성전자", 10).await.unwrap();
        assert_eq!(hits[0].symbol, "005930");
        assert_eq!(calls.load(Ordering::SeqCst), Category::ALL.len());
    }

    #[tokio::test]
    async fn test_primary_and_secondary_fail_then_static() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackChain::new()
            .with_tier(FailingTier {
                source: SearchSource::Krx,
                calls: calls.clone(),
            })
            .with_tier(FailingTier {
                source: SearchSource::Naver,
                calls: calls.clone(),
            })
            .with_tier(StaticTier::new());

        let response = chain.resolve("삼성전자", 20).await;

        assert!(response.success);
        assert_eq!(response.source, SearchSource::Fallback);
        assert_eq!(response.results[0].symbol, "005930");
        assert_eq!(response.total_found, response.results.len());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_non_empty_tier_wins() {
        let chain = FallbackChain::new()
            .with_tier(EmptyTier)
            .with_tier(StaticTier::new());

        let response = chain.resolve("카뱅", 5).await;
        assert_eq!(response.source, SearchSource::Fallback);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].symbol, "323410");
    }

    #[tokio::test]
    async fn test_nothing_found_is_empty_success() {
        let chain = FallbackChain::new().with_tier(EmptyTier).with_tier(StaticTier::new());

        let response = chain.resolve("존재하지않는종목", 20).await;
        assert!(response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.total_found, 0);
        assert_eq!(response.source, SearchSource::Fallback);
    }

    #[tokio::test]
    async fn test_blank_query_skips_tiers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = FallbackChain::new().with_tier(FailingTier {
            source: SearchSource::Krx,
            calls: calls.clone(),
        });

        let response = chain.resolve("   ", 20).await;
        assert!(response.results.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_catalog_tier_fails_when_source_down() {
        let dir = tempfile::tempdir().unwrap();
        let tier = CatalogTier::new(
            Box::new(DownSource),
            CacheGate::new(dir.path().join("cache.json")),
            today(),
        );

        let err = tier.search("삼성", 10).await.unwrap_err();
        assert!(matches!(err, DataError::Unavailable(_)));
        assert!(!dir.path().join("cache.json").exists());
    }

    #[tokio::test]
    async fn test_naver_tier_error_moves_on() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/search/searchListJson.nhn")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let naver = NaverStockSearch::new(server.url(), &HttpConfig::default()).unwrap();
        let chain = FallbackChain::new()
            .with_tier(NaverTier::new(naver))
            .with_tier(StaticTier::new());

        let response = chain.resolve("posco", 20).await;
        assert_eq!(response.source, SearchSource::Fallback);
        assert_eq!(response.results[0].symbol, "003670");
    }

    #[tokio::test]
    async fn test_naver_tier_answers() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/search/searchListJson.nhn")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"({"items":[{"code":"A005930","name":"삼성전자","market":"KOSPI"}]})"#)
            .create_async()
            .await;

        let naver = NaverStockSearch::new(server.url(), &HttpConfig::default()).unwrap();
        let chain = FallbackChain::new()
            .with_tier(NaverTier::new(naver))
            .with_tier(StaticTier::new());

        let response = chain.resolve("삼성", 20).await;
        assert_eq!(response.source, SearchSource::Naver);
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].symbol, "005930");
        assert_eq!(response.results[0].market, Category::Kospi);
    }
}
