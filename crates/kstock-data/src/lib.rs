//! 종목 카탈로그 구축, 검색, 외부 데이터 조회.
//!
//! 이 crate는 다음을 제공합니다:
//! - 시장 데이터 소스 기반 카탈로그 구축과 검색어 생성
//! - 점수 기반 종목 검색
//! - 당일 스냅샷 캐시
//! - 단계별 검색 폴백 체인
//! - KRX, 네이버, DART 클라이언트

pub mod catalog;
pub mod error;
pub mod fallback;
pub mod news;
pub mod provider;
pub mod quote;

pub use error::{DataError, Result};

// 카탈로그 재내보내기
pub use catalog::{
    BuildReport, CacheGate, Catalog, CatalogBuilder, CatalogSnapshot, MarketDataSource, MatchKind,
};

// 폴백 체인 재내보내기
pub use fallback::{load_catalog, CatalogTier, FallbackChain, NaverTier, SearchTier, StaticTier};

pub use news::{fetch_stock_news, NewsResult};
pub use quote::{QuoteFetcher, StockQuote, DEFAULT_QUOTE_SYMBOLS};

// 제공자 재내보내기
pub use provider::{
    static_catalog, DartClient, DartError, DisclosureQuery, DisclosureResult, KrxApiClient,
    NaverNewsClient, NaverStockSearch,
};
