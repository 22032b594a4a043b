//! 네이버 금융 종목 검색 / 네이버 뉴스 Open API 클라이언트.
//!
//! ## 데이터 소스
//! - `/api/search/searchListJson.nhn`: 종목 자동완성 검색 (JSONP 응답 가능)
//! - `/v1/search/news.json`: 뉴스 검색 (Client ID/Secret 필요)

use kstock_core::{CatalogEntry, Category, HttpConfig};
use reqwest::Client;
use scraper::Html;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 검색 요청당 최대 건수.
pub const MAX_SEARCH_COUNT: usize = 50;

/// 뉴스 요청당 최대 건수.
pub const MAX_NEWS_DISPLAY: usize = 100;

/// 네이버 클라이언트 에러
#[derive(Debug, Error)]
pub enum NaverError {
    #[error("HTTP 요청 실패: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP 상태 오류: {0}")]
    Status(u16),

    #[error("응답 파싱 실패: {0}")]
    ParseError(String),

    #[error("네이버 API 키가 설정되지 않았습니다.")]
    MissingCredentials,
}

/// 네이버 금융 종목 검색 클라이언트.
pub struct NaverStockSearch {
    client: Client,
    base_url: String,
    max_count: usize,
}

impl NaverStockSearch {
    pub fn new(base_url: impl Into<String>, http: &HttpConfig) -> Result<Self, NaverError> {
        let client = Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_count: MAX_SEARCH_COUNT,
        })
    }

    /// 요청당 최대 건수를 지정합니다 (최대 50).
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.max_count = max_count.clamp(1, MAX_SEARCH_COUNT);
        self
    }

    /// 종목을 검색합니다.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<CatalogEntry>, NaverError> {
        let url = format!("{}/api/search/searchListJson.nhn", self.base_url);
        let count = limit.min(self.max_count).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("target", "stock"), ("count", count.as_str())])
            .header("Referer", format!("{}/", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NaverError::Status(response.status().as_u16()));
        }

        let text = response.text().await?;
        let entries = parse_search_response(&text)?;

        tracing::debug!(query = query, count = entries.len(), "네이버 종목 검색 완료");
        Ok(entries)
    }
}

/// 검색 응답을 파싱합니다. `( ... )`로 감싼 JSONP도 허용합니다.
pub fn parse_search_response(text: &str) -> Result<Vec<CatalogEntry>, NaverError> {
    #[derive(Deserialize)]
    struct RawResponse {
        #[serde(default)]
        items: Vec<RawItem>,
    }

    #[derive(Deserialize)]
    struct RawItem {
        #[serde(default)]
        code: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        market: String,
    }

    let body = strip_jsonp(text);
    let raw: RawResponse =
        serde_json::from_str(body).map_err(|e| NaverError::ParseError(e.to_string()))?;

    Ok(raw
        .items
        .into_iter()
        .filter(|item| !item.code.is_empty() && !item.name.is_empty())
        .map(|item| {
            CatalogEntry::new(
                normalize_code(&item.code),
                item.name,
                classify_market(&item.market),
            )
        })
        .collect())
}

fn strip_jsonp(text: &str) -> &str {
    let trimmed = text.trim().trim_end_matches(';').trim_end();
    trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed)
}

/// 종목코드 정리: 앞의 `A` 제거, 6자리 0 채움.
pub fn normalize_code(code: &str) -> String {
    let code = code.trim();
    let code = code.strip_prefix('A').unwrap_or(code);
    format!("{:0>6}", code)
}

/// 시장 구분: KOSPI, KOSDAQ, 나머지는 KONEX.
pub fn classify_market(market: &str) -> Category {
    let upper = market.to_uppercase();
    if upper.contains("KOSPI") {
        Category::Kospi
    } else if upper.contains("KOSDAQ") {
        Category::Kosdaq
    } else {
        Category::Konex
    }
}

/// 뉴스 기사.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_date: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// 네이버 뉴스 Open API 클라이언트.
pub struct NaverNewsClient {
    client: Client,
    base_url: String,
    client_id: SecretString,
    client_secret: SecretString,
}

impl NaverNewsClient {
    pub fn new(
        base_url: impl Into<String>,
        client_id: SecretString,
        client_secret: SecretString,
        http: &HttpConfig,
    ) -> Result<Self, NaverError> {
        if client_id.expose_secret().is_empty() || client_secret.expose_secret().is_empty() {
            return Err(NaverError::MissingCredentials);
        }

        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        })
    }

    /// 회사 관련 최신 뉴스를 검색합니다 (`"{회사명} 주식"`, 최신순).
    pub async fn search_stock_news(
        &self,
        company_name: &str,
        max_results: usize,
    ) -> Result<Vec<NewsArticle>, NaverError> {
        #[derive(Deserialize)]
        struct RawNews {
            #[serde(default)]
            items: Vec<RawNewsItem>,
        }

        #[derive(Deserialize)]
        struct RawNewsItem {
            #[serde(default)]
            title: String,
            #[serde(default)]
            description: String,
            #[serde(default)]
            link: String,
            #[serde(rename = "pubDate", default)]
            pub_date: String,
        }

        let url = format!("{}/v1/search/news.json", self.base_url);
        let query = format!("{} 주식", company_name);
        let display = max_results.min(MAX_NEWS_DISPLAY).to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query", query.as_str()),
                ("display", display.as_str()),
                ("start", "1"),
                ("sort", "date"),
            ])
            .header("X-Naver-Client-Id", self.client_id.expose_secret())
            .header("X-Naver-Client-Secret", self.client_secret.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NaverError::Status(response.status().as_u16()));
        }

        let raw: RawNews = response
            .json()
            .await
            .map_err(|e| NaverError::ParseError(e.to_string()))?;

        let articles: Vec<NewsArticle> = raw
            .items
            .into_iter()
            .map(|item| NewsArticle {
                title: strip_html(&item.title),
                description: strip_html(&item.description),
                url: item.link,
                published_date: item.pub_date,
                source: "네이버 뉴스".to_string(),
                category: None,
            })
            .collect();

        tracing::debug!(company = company_name, count = articles.len(), "네이버 뉴스 조회 완료");
        Ok(articles)
    }
}

/// HTML 태그를 제거하고 엔티티를 디코딩한 텍스트.
pub fn strip_html(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    html.root_element().text().collect::<String>().trim().to_string()
}
