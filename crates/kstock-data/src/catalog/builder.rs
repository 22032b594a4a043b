//! 시장 데이터 소스에서 카탈로그를 구축합니다.
//!
//! 시장 구분별로 종목 코드 목록을 받은 뒤, 각 코드의 종목명을 순차 조회하여
//! 엔트리를 만듭니다. 개별 종목이나 시장 구분 하나의 실패는 구축 전체를
//! 중단시키지 않습니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use kstock_core::{CatalogEntry, Category};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::keywords::derive_keywords;
use super::Catalog;
use crate::error::Result;

/// 종목명이 없음을 나타내는 값.
const NAME_SENTINEL: &str = "N/A";

/// 카탈로그 구축에 쓰이는 시장 데이터 소스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 소스 이름 (로그용)
    fn name(&self) -> &str;

    /// 기준일의 시장 구분별 종목 코드 목록.
    async fn ticker_list(&self, category: Category, base_date: NaiveDate) -> Result<Vec<String>>;

    /// 종목 코드의 표시 이름. 알 수 없으면 `None`.
    async fn ticker_name(&self, category: Category, ticker: &str) -> Result<Option<String>>;
}

/// 카탈로그 구축 결과.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// 구축된 카탈로그
    pub catalog: Catalog,
    /// 시장 구분별 조회된 종목 코드 수
    pub listed: HashMap<Category, usize>,
    /// 목록 조회에 실패한 시장 구분
    pub failed_categories: Vec<Category>,
    /// 이름 조회 실패/누락으로 건너뛴 종목 수
    pub skipped: usize,
    /// 소요 시간
    pub elapsed: Duration,
}

impl BuildReport {
    /// 조회된 종목 코드 수 (엔트리 수와 다를 수 있음).
    pub fn listed_count(&self, category: Category) -> usize {
        self.listed.get(&category).copied().unwrap_or(0)
    }

    /// 모든 시장 구분의 목록 조회가 실패했는지 확인합니다.
    pub fn all_failed(&self) -> bool {
        self.failed_categories.len() == Category::ALL.len()
    }

    /// 구축 요약 로그 출력
    pub fn log_summary(&self, source: &str) {
        tracing::info!(
            source = source,
            total = self.catalog.len(),
            kospi = self.listed_count(Category::Kospi),
            kosdaq = self.listed_count(Category::Kosdaq),
            konex = self.listed_count(Category::Konex),
            etf = self.listed_count(Category::Etf),
            etn = self.listed_count(Category::Etn),
            index = self.listed_count(Category::Index),
            skipped = self.skipped,
            failed_categories = ?self.failed_categories,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "카탈로그 구축 완료"
        );
    }
}

/// 카탈로그 빌더.
pub struct CatalogBuilder;

impl CatalogBuilder {
    /// 소스에서 전체 카탈로그를 구축합니다.
    ///
    /// 시장 구분은 [`Category::ALL`] 순서로, 종목은 목록 순서대로 처리합니다.
    pub async fn build(source: &dyn MarketDataSource, base_date: NaiveDate) -> BuildReport {
        let start = Instant::now();
        let mut report = BuildReport::default();
        let mut entries = Vec::new();

        for category in Category::ALL {
            let tickers = match source.ticker_list(category, base_date).await {
                Ok(tickers) => tickers,
                Err(e) => {
                    tracing::warn!(
                        source = source.name(),
                        category = %category,
                        error = %e,
                        "종목 목록 조회 실패"
                    );
                    report.failed_categories.push(category);
                    report.listed.insert(category, 0);
                    continue;
                }
            };

            tracing::debug!(category = %category, count = tickers.len(), "종목 목록 조회");
            report.listed.insert(category, tickers.len());

            for ticker in &tickers {
                match source.ticker_name(category, ticker).await {
                    Ok(Some(name)) if is_usable_name(&name) => {
                        let keywords = derive_keywords(&name, category);
                        entries.push(
                            CatalogEntry::new(ticker.clone(), name, category)
                                .with_keywords(keywords),
                        );
                    }
                    Ok(_) => {
                        report.skipped += 1;
                    }
                    Err(e) => {
                        tracing::debug!(ticker = %ticker, error = %e, "종목명 조회 실패");
                        report.skipped += 1;
                    }
                }
            }
        }

        report.catalog = Catalog::new(entries);
        report.elapsed = start.elapsed();
        report
    }
}

fn is_usable_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed != NAME_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    /// 고정 데이터를 돌려주는 테스트용 소스.
    struct StubSource {
        lists: HashMap<Category, Vec<(&'static str, Option<&'static str>)>>,
        failing: Vec<Category>,
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn ticker_list(&self, category: Category, _base_date: NaiveDate) -> Result<Vec<String>> {
            if self.failing.contains(&category) {
                return Err(DataError::Unavailable("down".into()));
            }
            Ok(self
                .lists
                .get(&category)
                .map(|l| l.iter().map(|(t, _)| t.to_string()).collect())
                .unwrap_or_default())
        }

        async fn ticker_name(&self, category: Category, ticker: &str) -> Result<Option<String>> {
            if ticker == "ERR" {
                return Err(DataError::NotFound(ticker.into()));
            }
            Ok(self
                .lists
                .get(&category)
                .and_then(|l| l.iter().find(|(t, _)| *t == ticker))
                .and_then(|(_, n)| n.map(str::to_string)))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    #[tokio::test]
    async fn test_build_skips_missing_names() {
        let mut lists = HashMap::new();
        lists.insert(
            Category::Kospi,
            vec![
                ("005930", Some("삼성전자")),
                ("000001", Some("N/A")),
                ("000002", None),
                ("000003", Some("  ")),
                ("ERR", Some("에러")),
            ],
        );
        lists.insert(Category::Etf, vec![("069500", Some("KODEX 200"))]);
        let source = StubSource {
            lists,
            failing: vec![],
        };

        let report = CatalogBuilder::build(&source, date()).await;

        let symbols: Vec<_> = report.catalog.entries().iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["005930", "069500"]);
        assert_eq!(report.skipped, 4);
        assert_eq!(report.listed_count(Category::Kospi), 5);
        assert!(report.failed_categories.is_empty());

        let etf = &report.catalog.entries()[1];
        assert_eq!(etf.market, Category::Etf);
        assert!(etf.search_keywords.contains(&"kodex".to_string()));
    }

    #[tokio::test]
    async fn test_failed_category_degrades_to_empty() {
        let mut lists = HashMap::new();
        lists.insert(Category::Kosdaq, vec![("196170", Some("알테오젠"))]);
        let source = StubSource {
            lists,
            failing: vec![Category::Kospi, Category::Index],
        };

        let report = CatalogBuilder::build(&source, date()).await;

        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.failed_categories, vec![Category::Kospi, Category::Index]);
        assert!(!report.all_failed());
    }

    #[tokio::test]
    async fn test_all_failed() {
        let source = StubSource {
            lists: HashMap::new(),
            failing: Category::ALL.to_vec(),
        };

        let report = CatalogBuilder::build(&source, date()).await;
        assert!(report.catalog.is_empty());
        assert!(report.all_failed());
    }

    #[tokio::test]
    async fn test_duplicate_symbols_keep_first() {
        let mut lists = HashMap::new();
        lists.insert(Category::Kospi, vec![("005930", Some("삼성전자"))]);
        lists.insert(Category::Konex, vec![("005930", Some("중복"))]);
        let source = StubSource {
            lists,
            failing: vec![],
        };

        let report = CatalogBuilder::build(&source, date()).await;
        assert_eq!(report.catalog.len(), 1);
        assert_eq!(report.catalog.entries()[0].name, "삼성전자");
    }
}
