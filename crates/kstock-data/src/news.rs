//! 종목 뉴스 조회.
//!
//! 네이버 뉴스 API를 먼저 시도하고, 자격증명이 없거나 실패하면 실제 검색 링크를
//! 담은 샘플 기사로 대체합니다.

use chrono::{DateTime, Duration, FixedOffset};
use kstock_core::now_kst;
use reqwest::Url;
use serde::Serialize;

use crate::provider::naver::{NaverNewsClient, NewsArticle};

const NEWS_SEARCH_URL: &str = "https://search.naver.com/search.naver";

/// 샘플 기사 출처.
pub const SAMPLE_SOURCES: [&str; 5] = ["한국경제", "매일경제", "서울경제", "조선비즈", "이데일리"];

/// 종목 뉴스 응답.
#[derive(Debug, Clone, Serialize)]
pub struct NewsResult {
    pub success: bool,
    pub symbol: String,
    pub company_name: String,
    pub news: Vec<NewsArticle>,
    pub total_count: usize,
    pub timestamp: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

/// 회사명이 없을 때 쓰는 기본 이름.
pub fn default_company_name(symbol: &str) -> String {
    format!("종목{}", symbol)
}

/// 종목 뉴스를 조회합니다. 이 함수는 실패하지 않습니다.
pub async fn fetch_stock_news(
    client: Option<&NaverNewsClient>,
    symbol: &str,
    company_name: &str,
    limit: usize,
) -> NewsResult {
    if let Some(client) = client {
        match client.search_stock_news(company_name, limit).await {
            Ok(news) => {
                tracing::info!(symbol = symbol, count = news.len(), "네이버 뉴스 조회 성공");
                return NewsResult {
                    success: true,
                    symbol: symbol.to_string(),
                    company_name: company_name.to_string(),
                    total_count: news.len(),
                    news,
                    timestamp: now_kst(),
                    source: Some("Naver API".to_string()),
                    sources: None,
                };
            }
            Err(e) => {
                tracing::warn!(symbol = symbol, error = %e, "네이버 뉴스 조회 실패, 샘플 기사 사용");
            }
        }
    } else {
        tracing::info!(symbol = symbol, "네이버 API 자격증명 없음, 샘플 기사 사용");
    }

    let news = sample_news(company_name, limit, now_kst());
    NewsResult {
        success: true,
        symbol: symbol.to_string(),
        company_name: company_name.to_string(),
        total_count: news.len(),
        news,
        timestamp: now_kst(),
        source: None,
        sources: Some(SAMPLE_SOURCES.iter().map(|s| s.to_string()).collect()),
    }
}

/// 뉴스 검색 링크 (`query={회사명} {주제}`).
fn search_link(company_name: &str, topic: &str) -> String {
    let query = format!("{} {}", company_name, topic);
    match Url::parse_with_params(NEWS_SEARCH_URL, &[("where", "news"), ("query", query.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => NEWS_SEARCH_URL.to_string(),
    }
}

/// 실제 검색 링크를 담은 샘플 기사 (최신순, `limit`개까지).
pub fn sample_news(company_name: &str, limit: usize, now: DateTime<FixedOffset>) -> Vec<NewsArticle> {
    let templates: [(String, String, &str, Duration, &str, &str); 5] = [
        (
            format!("{}, 3분기 실적 시장 전망치 상회", company_name),
            format!(
                "{}가 3분기 실적에서 시장 전망치를 웃도는 성과를 기록했다고 발표했습니다. 매출액과 영업이익 모두 예상을 뛰어넘었습니다.",
                company_name
            ),
            "실적",
            Duration::hours(2),
            "한국경제",
            "기업실적",
        ),
        (
            format!("{} 주가, 긍정적 전망에 상승세", company_name),
            "증권가에서 해당 기업에 대한 긍정적인 전망을 내놓으면서 주가가 강세를 보이고 있습니다.".to_string(),
            "주가",
            Duration::hours(4),
            "매일경제",
            "주식시장",
        ),
        (
            format!("업계 분석: {}의 성장 전략", company_name),
            "전문가들이 분석한 해당 기업의 중장기 성장 전략과 시장에서의 경쟁력에 대한 심층 분석입니다.".to_string(),
            "성장전략",
            Duration::hours(8),
            "서울경제",
            "기업분석",
        ),
        (
            format!("{}, 신규 사업 진출 발표", company_name),
            "새로운 성장동력 확보를 위해 신규 사업 분야에 진출한다고 공식 발표했습니다.".to_string(),
            "사업진출",
            Duration::hours(12),
            "조선비즈",
            "기업동향",
        ),
        (
            format!("증권가 리포트: {} 투자의견 상향", company_name),
            "주요 증권회사들이 해당 기업에 대한 투자의견을 상향 조정하며 목표주가를 높였습니다.".to_string(),
            "투자의견",
            Duration::days(1),
            "이데일리",
            "애널리스트",
        ),
    ];

    templates
        .into_iter()
        .take(limit)
        .map(|(title, description, topic, age, source, category)| NewsArticle {
            title,
            description,
            url: search_link(company_name, topic),
            published_date: (now - age).format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.to_string(),
            category: Some(category.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use kstock_core::HttpConfig;
    use secrecy::SecretString;

    fn fixed_now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 3, 15, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_sample_news_shape() {
        let news = sample_news("삼성전자", 10, fixed_now());
        assert_eq!(news.len(), 5);
        assert_eq!(news[0].title, "삼성전자, 3분기 실적 시장 전망치 상회");
        assert_eq!(news[0].published_date, "2024-06-03 13:00:00");
        assert_eq!(news[4].published_date, "2024-06-02 15:00:00");
        assert_eq!(news[4].category.as_deref(), Some("애널리스트"));

        let sources: Vec<&str> = news.iter().map(|n| n.source.as_str()).collect();
        assert_eq!(sources, SAMPLE_SOURCES);
    }

    #[test]
    fn test_sample_news_links_are_searches() {
        let news = sample_news("삼성전자", 2, fixed_now());
        assert_eq!(news.len(), 2);

        let url = Url::parse(&news[1].url).unwrap();
        assert_eq!(url.host_str(), Some("search.naver.com"));
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("where".to_string(), "news".to_string())));
        assert!(query.contains(&("query".to_string(), "삼성전자 주가".to_string())));
    }

    #[test]
    fn test_default_company_name() {
        assert_eq!(default_company_name("005930"), "종목005930");
    }

    #[tokio::test]
    async fn test_without_credentials_uses_samples() {
        let result = fetch_stock_news(None, "005930", "삼성전자", 3).await;
        assert!(result.success);
        assert_eq!(result.total_count, 3);
        assert!(result.source.is_none());
        assert_eq!(result.sources.as_ref().map(Vec::len), Some(5));
    }

    #[tokio::test]
    async fn test_api_failure_uses_samples() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let client = NaverNewsClient::new(
            server.url(),
            SecretString::from("id".to_string()),
            SecretString::from("secret".to_string()),
            &HttpConfig::default(),
        )
        .unwrap();

        let result = fetch_stock_news(Some(&client), "000660", "SK하이닉스", 10).await;
        assert_eq!(result.news.len(), 5);
        assert!(result.news[0].title.starts_with("SK하이닉스"));
    }

    #[tokio::test]
    async fn test_api_success() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/search/news.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"items":[{"title":"<b>SK하이닉스</b> HBM","description":"d","link":"https://n.news/1",
                   "pubDate":"Mon, 03 Jun 2024 10:00:00 +0900"}]}"#,
            )
            .create_async()
            .await;

        let client = NaverNewsClient::new(
            server.url(),
            SecretString::from("id".to_string()),
            SecretString::from("secret".to_string()),
            &HttpConfig::default(),
        )
        .unwrap();

        let result = fetch_stock_news(Some(&client), "000660", "SK하이닉스", 10).await;
        assert_eq!(result.source.as_deref(), Some("Naver API"));
        assert_eq!(result.news[0].title, "SK하이닉스 HBM");
        assert!(result.sources.is_none());
    }
}
