//! 종목 카탈로그 타입 정의.
//!
//! - `Category` - 시장 구분 (KOSPI, KOSDAQ, KONEX, ETF, ETN, INDEX)
//! - `CatalogEntry` - 검색 가능한 종목 레코드
//! - `SearchHit` - 검색 결과로 노출되는 필드만 담은 레코드

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시장 구분.
///
/// 카탈로그는 항상 이 순서대로 구축됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// 유가증권시장
    Kospi,
    /// 코스닥
    Kosdaq,
    /// 코넥스
    Konex,
    /// 상장지수펀드
    Etf,
    /// 상장지수증권
    Etn,
    /// 지수
    Index,
}

impl Category {
    /// 카탈로그 구축 순서.
    pub const ALL: [Category; 6] = [
        Category::Kospi,
        Category::Kosdaq,
        Category::Konex,
        Category::Etf,
        Category::Etn,
        Category::Index,
    ];

    /// 대문자 표기.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Kospi => "KOSPI",
            Category::Kosdaq => "KOSDAQ",
            Category::Konex => "KONEX",
            Category::Etf => "ETF",
            Category::Etn => "ETN",
            Category::Index => "INDEX",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KOSPI" => Ok(Category::Kospi),
            "KOSDAQ" => Ok(Category::Kosdaq),
            "KONEX" => Ok(Category::Konex),
            "ETF" => Ok(Category::Etf),
            "ETN" => Ok(Category::Etn),
            "INDEX" => Ok(Category::Index),
            other => Err(format!("Unknown market category: {}", other)),
        }
    }
}

/// 카탈로그 엔트리.
///
/// `search_keywords`는 구축 시 한 번 만들어지며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// 종목 코드 (예: "005930")
    pub symbol: String,
    /// 표시 이름
    pub name: String,
    /// 시장 구분
    pub market: Category,
    /// 보조 검색어 (중복 없음)
    #[serde(default)]
    pub search_keywords: Vec<String>,
}

impl CatalogEntry {
    /// 이름만 검색어로 가진 엔트리를 생성합니다.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>, market: Category) -> Self {
        let name = name.into();
        Self {
            symbol: symbol.into(),
            search_keywords: vec![name.clone()],
            name,
            market,
        }
    }

    /// 검색어 목록을 지정합니다.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.search_keywords = keywords;
        self
    }
}

/// 검색 결과 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub symbol: String,
    pub name: String,
    pub market: Category,
}

impl From<&CatalogEntry> for SearchHit {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            name: entry.name.clone(),
            market: entry.market,
        }
    }
}
