//! 종목 카탈로그.
//!
//! - [`builder`] - 시장 데이터 소스에서 카탈로그 구축
//! - [`keywords`] - 검색어 생성 규칙 테이블
//! - [`search`] - 점수 기반 검색
//! - [`cache`] - 당일 스냅샷 캐시

pub mod builder;
pub mod cache;
pub mod keywords;
pub mod search;

pub use builder::{BuildReport, CatalogBuilder, MarketDataSource};
pub use cache::{CacheGate, CatalogSnapshot};
pub use search::{rank, search, MatchKind, ScoredMatch};

use kstock_core::{CatalogEntry, SearchHit};
use std::collections::HashSet;

/// 한 번의 갱신 주기에 구축된 불변 카탈로그.
///
/// 종목코드는 카탈로그 안에서 유일합니다.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// 엔트리 목록으로 카탈로그를 만듭니다. 중복 종목코드는 처음 것만 남깁니다.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut seen = HashSet::with_capacity(entries.len());
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.symbol.clone()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        search::search(query, &self.entries, limit)
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        self.entries
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Self::new(entries)
    }
}
