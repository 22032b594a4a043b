//! 표준 출력으로 내보내는 JSON envelope.
//!
//! 모든 명령은 `success`와 `timestamp` 필드를 가진 JSON 문서 하나를 출력합니다.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::{CatalogEntry, SearchHit};
use super::time::now_kst;

/// 검색 결과를 제공한 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// KRX 시장 데이터 기반 카탈로그
    Krx,
    /// 네이버 금융 검색
    Naver,
    /// 내장 종목 목록
    Fallback,
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSource::Krx => write!(f, "krx"),
            SearchSource::Naver => write!(f, "naver"),
            SearchSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// 검색 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_found: usize,
    pub source: SearchSource,
    pub timestamp: DateTime<FixedOffset>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>, source: SearchSource) -> Self {
        Self {
            success: true,
            query: query.into(),
            total_found: results.len(),
            results,
            source,
            timestamp: now_kst(),
        }
    }
}

/// 전체 종목 목록 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub success: bool,
    /// 잘라내기 전 전체 종목 수
    pub total_count: usize,
    pub data: Vec<CatalogEntry>,
    pub timestamp: DateTime<FixedOffset>,
}

impl ListingResponse {
    /// 목록 응답을 생성합니다. `limit`이 0이면 전체를 출력합니다.
    pub fn new(entries: &[CatalogEntry], limit: usize) -> Self {
        let data = if limit == 0 {
            entries.to_vec()
        } else {
            entries.iter().take(limit).cloned().collect()
        };

        Self {
            success: true,
            total_count: entries.len(),
            data,
            timestamp: now_kst(),
        }
    }
}

/// 실패 응답.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            timestamp: now_kst(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn entries(n: usize) -> Vec<CatalogEntry> {
        (0..n)
            .map(|i| CatalogEntry::new(format!("{:06}", i), format!("종목{}", i), Category::Kospi))
            .collect()
    }

    #[test]
    fn test_listing_limit_zero_means_all() {
        let all = entries(30);
        let listing = ListingResponse::new(&all, 0);
        assert_eq!(listing.data.len(), 30);
        assert_eq!(listing.total_count, 30);

        let listing = ListingResponse::new(&all, 20);
        assert_eq!(listing.data.len(), 20);
        assert_eq!(listing.total_count, 30);
    }

    #[test]
    fn test_search_response_shape() {
        let hits = vec![SearchHit::from(&CatalogEntry::new(
            "005930",
            "삼성전자",
            Category::Kospi,
        ))];
        let response = SearchResponse::new("005930", hits, SearchSource::Krx);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["total_found"], 1);
        assert_eq!(json["source"], "krx");
        assert!(json["timestamp"].as_str().unwrap().ends_with("+09:00"));
    }

    #[test]
    fn test_error_response() {
        let json = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
    }
}
