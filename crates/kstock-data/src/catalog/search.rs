//! 종목 검색 및 순위 결정.
//!
//! 규칙은 종목코드 → 종목명 → 검색어 순으로 평가하며 처음 일치한 규칙의
//! 점수가 매겨집니다. 결과는 점수 내림차순으로 안정 정렬되므로 동점이면
//! 카탈로그 순서를 유지합니다.

use kstock_core::{CatalogEntry, SearchHit};

/// 일치 유형.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    SymbolExact,
    SymbolPartial,
    NameExact,
    NameStart,
    KeywordExact,
    NamePartial,
    KeywordPartial,
}

impl MatchKind {
    /// 일치 유형별 점수.
    pub fn score(&self) -> u8 {
        match self {
            MatchKind::SymbolExact => 100,
            MatchKind::SymbolPartial => 90,
            MatchKind::NameExact => 85,
            MatchKind::NameStart => 80,
            MatchKind::KeywordExact => 75,
            MatchKind::NamePartial => 70,
            MatchKind::KeywordPartial => 65,
        }
    }
}

/// 점수가 매겨진 검색 결과 (정렬용).
#[derive(Debug, Clone)]
pub struct ScoredMatch<'a> {
    pub entry: &'a CatalogEntry,
    pub kind: MatchKind,
}

impl ScoredMatch<'_> {
    pub fn score(&self) -> u8 {
        self.kind.score()
    }
}

/// 엔트리 하나에 대해 일치 유형을 판정합니다.
///
/// `query`는 이미 trim/소문자 변환된 값이어야 합니다.
pub fn classify(query: &str, entry: &CatalogEntry) -> Option<MatchKind> {
    if query == entry.symbol {
        return Some(MatchKind::SymbolExact);
    }
    if entry.symbol.contains(query) {
        return Some(MatchKind::SymbolPartial);
    }

    let name = entry.name.to_lowercase();
    if query == name {
        return Some(MatchKind::NameExact);
    }
    if name.starts_with(query) {
        return Some(MatchKind::NameStart);
    }
    if name.contains(query) {
        return Some(MatchKind::NamePartial);
    }

    // 쿼리를 포함하는 첫 번째 검색어가 완전/부분 일치를 결정
    entry
        .search_keywords
        .iter()
        .map(|k| k.to_lowercase())
        .find(|k| k.contains(query))
        .map(|k| {
            if k == query {
                MatchKind::KeywordExact
            } else {
                MatchKind::KeywordPartial
            }
        })
}

/// 점수순으로 정렬된 전체 일치 목록.
pub fn rank<'a>(query: &str, entries: &'a [CatalogEntry]) -> Vec<ScoredMatch<'a>> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || entries.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<ScoredMatch<'a>> = entries
        .iter()
        .filter_map(|entry| classify(&query, entry).map(|kind| ScoredMatch { entry, kind }))
        .collect();

    // sort_by는 안정 정렬
    matches.sort_by(|a, b| b.score().cmp(&a.score()));
    matches
}

/// 종목을 검색합니다. 결과는 최대 `limit`개입니다.
pub fn search(query: &str, entries: &[CatalogEntry], limit: usize) -> Vec<SearchHit> {
    rank(query, entries)
        .into_iter()
        .take(limit)
        .map(|m| SearchHit::from(m.entry))
        .collect()
}
