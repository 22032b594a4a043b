//! KRX Open API 클라이언트.
//!
//! 한국거래소(KRX) Open API에서 시장 구분별 종목 목록과 일별 매매정보를
//! 조회합니다. 인증키는 `AUTH_KEY` 헤더로 전달합니다.
//!
//! # 사용 API
//!
//! | 시장 구분 | API |
//! |-----------|-----|
//! | KOSPI / KOSDAQ / KONEX | `stk_isu_base_info`, `ksq_isu_base_info`, `knx_isu_base_info` |
//! | ETF / ETN | `etf_bydd_trd`, `etn_bydd_trd` (증권상품) |
//! | INDEX | `kospi_dd_trd`, `kosdaq_dd_trd`, `krx_dd_trd` (지수) |
//! | 시세 | `stk_bydd_trd`, `ksq_bydd_trd`, `knx_bydd_trd` |
//!
//! KRX는 휴장일에 빈 목록을 반환하므로 목록/시세 조회는 기준일부터 최대
//! [`MAX_LOOKBACK_DAYS`]일 전까지 거슬러 올라가며 데이터가 있는 날을 찾습니다.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use kstock_core::{compact_date, Category, HttpConfig};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::catalog::MarketDataSource;
use crate::error::{DataError, Result};

/// 데이터가 없을 때 거슬러 올라갈 최대 일수.
pub const MAX_LOOKBACK_DAYS: i64 = 5;

/// KRX 목록 엔트리 (종목코드 + 종목명).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KrxListing {
    pub ticker: String,
    pub name: String,
}

/// KRX 일별 매매정보.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KrxDailyTrade {
    /// 기준일자
    pub date: NaiveDate,
    /// 종목코드 (단축코드 또는 표준코드)
    pub code: String,
    /// 종목명
    pub name: String,
    /// 시장구분
    pub market: String,
    /// 종가
    pub close: Decimal,
    /// 전일대비
    pub change: Option<Decimal>,
    /// 등락률 (%)
    pub change_rate: Option<Decimal>,
    /// 시가
    pub open: Option<Decimal>,
    /// 고가
    pub high: Option<Decimal>,
    /// 저가
    pub low: Option<Decimal>,
    /// 거래량
    pub volume: i64,
    /// 시가총액
    pub market_cap: Option<Decimal>,
}

impl KrxDailyTrade {
    /// 종목코드 일치 여부 (표준코드 `KR7005930003`의 단축코드 부분도 비교).
    pub fn matches(&self, symbol: &str) -> bool {
        self.code == symbol || (self.code.len() == 12 && self.code.get(3..9) == Some(symbol))
    }
}

/// API 응답 래퍼.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<T>>,
}

/// API 카테고리별 URL 경로.
#[derive(Debug, Clone, Copy)]
enum ApiCategory {
    /// 지수 (idx)
    Index,
    /// 주식 (stk)
    Stock,
    /// 증권상품 - ETF, ETN (etp)
    Etp,
}

impl ApiCategory {
    fn path(&self) -> &'static str {
        match self {
            ApiCategory::Index => "idx",
            ApiCategory::Stock => "stk",
            ApiCategory::Etp => "etp",
        }
    }
}

/// 지수 계열별 API와 코드 접두사.
const INDEX_SERIES: &[(&str, char)] = &[("kospi_dd_trd", '1'), ("kosdaq_dd_trd", '2'), ("krx_dd_trd", '5')];

/// KRX Open API 클라이언트.
pub struct KrxApiClient {
    client: reqwest::Client,
    auth_key: SecretString,
    base_url: String,
    /// 시장 구분별 종목코드 → 종목명 (최근 조회 목록)
    names: RwLock<HashMap<Category, HashMap<String, String>>>,
}

impl KrxApiClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(auth_key: SecretString, base_url: impl Into<String>, http: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(http.timeout())
            .user_agent(http.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            auth_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            names: RwLock::new(HashMap::new()),
        })
    }

    /// API 요청 실행 (카테고리 지정).
    async fn request_with_category<T: for<'de> Deserialize<'de>>(
        &self,
        category: ApiCategory,
        api_id: &str,
        base_date: NaiveDate,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/svc/apis/{}/{}",
            self.base_url,
            category.path(),
            api_id
        );
        let bas_dd = compact_date(base_date);

        tracing::debug!(api_id = api_id, base_date = %bas_dd, "KRX API 요청");

        let response = self
            .client
            .get(&url)
            .query(&[("basDd", bas_dd.as_str())])
            .header("AUTH_KEY", self.auth_key.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Api {
                api: api_id.to_string(),
                message: format!("{} - {}", status, body),
            });
        }

        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| DataError::ParseError(format!("KRX {} 응답: {}", api_id, e)))?;

        Ok(data.out_block.unwrap_or_default())
    }

    /// 데이터가 있는 가장 최근 날짜까지 거슬러 올라가며 조회합니다.
    async fn request_latest<T: for<'de> Deserialize<'de>>(
        &self,
        category: ApiCategory,
        api_id: &str,
        base_date: NaiveDate,
    ) -> Result<Vec<T>> {
        for offset in 0..=MAX_LOOKBACK_DAYS {
            let date = base_date - Duration::days(offset);
            let rows: Vec<T> = self.request_with_category(category, api_id, date).await?;
            if !rows.is_empty() {
                if offset > 0 {
                    tracing::debug!(api_id = api_id, date = %date, "이전 거래일 데이터 사용");
                }
                return Ok(rows);
            }
        }
        Ok(Vec::new())
    }

    /// 주식 종목 기본정보 목록 (KOSPI/KOSDAQ/KONEX).
    async fn fetch_stock_listing(&self, api_id: &str, base_date: NaiveDate) -> Result<Vec<KrxListing>> {
        #[derive(Deserialize)]
        struct RawStock {
            #[serde(rename = "ISU_SRT_CD")]
            ticker: String,
            #[serde(rename = "ISU_ABBRV")]
            name: String,
        }

        let raw: Vec<RawStock> = self
            .request_latest(ApiCategory::Stock, api_id, base_date)
            .await?;

        Ok(raw
            .into_iter()
            .map(|s| KrxListing {
                ticker: s.ticker,
                name: s.name,
            })
            .collect())
    }

    /// 증권상품 목록 (ETF/ETN).
    async fn fetch_etp_listing(&self, api_id: &str, base_date: NaiveDate) -> Result<Vec<KrxListing>> {
        #[derive(Deserialize)]
        struct RawEtp {
            #[serde(rename = "ISU_CD", default)]
            ticker: Option<String>,
            #[serde(rename = "ISU_NM")]
            name: String,
        }

        let raw: Vec<RawEtp> = self
            .request_latest(ApiCategory::Etp, api_id, base_date)
            .await?;

        Ok(raw
            .into_iter()
            .filter_map(|e| {
                Some(KrxListing {
                    ticker: e.ticker?,
                    name: e.name,
                })
            })
            .collect())
    }

    /// 지수 목록.
    ///
    /// 지수 API는 코드를 주지 않으므로 계열 접두사와 계열 내 순번으로
    /// 코드를 만듭니다 (예: 코스피 계열 첫 지수 → `1001`).
    async fn fetch_index_listing(&self, base_date: NaiveDate) -> Result<Vec<KrxListing>> {
        #[derive(Deserialize)]
        struct RawIndex {
            #[serde(rename = "IDX_NM")]
            index_name: String,
        }

        let mut listings = Vec::new();
        let mut last_error = None;

        for (api_id, prefix) in INDEX_SERIES {
            match self
                .request_latest::<RawIndex>(ApiCategory::Index, api_id, base_date)
                .await
            {
                Ok(rows) => {
                    listings.extend(rows.into_iter().enumerate().map(|(i, r)| KrxListing {
                        ticker: format!("{}{:03}", prefix, i + 1),
                        name: r.index_name,
                    }));
                }
                Err(e) => {
                    tracing::warn!(api_id = api_id, error = %e, "지수 조회 실패");
                    last_error = Some(e);
                }
            }
        }

        // 세 계열이 모두 실패한 경우에만 에러
        match last_error {
            Some(e) if listings.is_empty() => Err(e),
            _ => Ok(listings),
        }
    }

    /// 시장 구분별 종목 목록을 조회하고 이름 조회용으로 보관합니다.
    pub async fn fetch_listing(&self, category: Category, base_date: NaiveDate) -> Result<Vec<KrxListing>> {
        let listing = match category {
            Category::Kospi => self.fetch_stock_listing("stk_isu_base_info", base_date).await?,
            Category::Kosdaq => self.fetch_stock_listing("ksq_isu_base_info", base_date).await?,
            Category::Konex => self.fetch_stock_listing("knx_isu_base_info", base_date).await?,
            Category::Etf => self.fetch_etp_listing("etf_bydd_trd", base_date).await?,
            Category::Etn => self.fetch_etp_listing("etn_bydd_trd", base_date).await?,
            Category::Index => self.fetch_index_listing(base_date).await?,
        };

        tracing::info!(category = %category, count = listing.len(), "KRX 종목 목록 조회 완료");

        // 중복 코드는 처음 이름 유지
        let mut names = HashMap::with_capacity(listing.len());
        for row in &listing {
            names
                .entry(row.ticker.clone())
                .or_insert_with(|| row.name.trim().to_string());
        }
        self.names.write().await.insert(category, names);

        Ok(listing)
    }

    /// 시장 전종목 일별 매매정보 (KOSPI/KOSDAQ/KONEX).
    pub async fn fetch_daily_trades(&self, market: Category, base_date: NaiveDate) -> Result<Vec<KrxDailyTrade>> {
        #[derive(Deserialize)]
        struct RawDailyTrade {
            #[serde(rename = "BAS_DD")]
            date: String,
            #[serde(rename = "ISU_CD")]
            code: String,
            #[serde(rename = "ISU_NM")]
            name: String,
            #[serde(rename = "MKT_NM", default)]
            market: Option<String>,
            #[serde(rename = "TDD_CLSPRC")]
            close: String,
            #[serde(rename = "CMPPREVDD_PRC", default)]
            change: Option<String>,
            #[serde(rename = "FLUC_RT", default)]
            change_rate: Option<String>,
            #[serde(rename = "TDD_OPNPRC", default)]
            open: Option<String>,
            #[serde(rename = "TDD_HGPRC", default)]
            high: Option<String>,
            #[serde(rename = "TDD_LWPRC", default)]
            low: Option<String>,
            #[serde(rename = "ACC_TRDVOL")]
            volume: String,
            #[serde(rename = "MKTCAP", default)]
            market_cap: Option<String>,
        }

        let (api_id, default_market) = match market {
            Category::Kospi => ("stk_bydd_trd", "유가증권시장"),
            Category::Kosdaq => ("ksq_bydd_trd", "코스닥시장"),
            Category::Konex => ("knx_bydd_trd", "코넥스시장"),
            other => {
                return Err(DataError::Unavailable(format!(
                    "{} 시장은 일별 매매정보를 지원하지 않습니다",
                    other
                )))
            }
        };

        let raw: Vec<RawDailyTrade> = self
            .request_latest(ApiCategory::Stock, api_id, base_date)
            .await?;

        let trades: Vec<KrxDailyTrade> = raw
            .into_iter()
            .filter_map(|t| {
                let date = parse_date_yyyymmdd(&t.date)?;
                let close = t.close.replace(',', "").parse().ok()?;
                let volume = t.volume.replace(',', "").parse().ok()?;
                Some(KrxDailyTrade {
                    date,
                    code: t.code,
                    name: t.name,
                    market: t.market.unwrap_or_else(|| default_market.to_string()),
                    close,
                    change: parse_decimal_opt(&t.change),
                    change_rate: parse_decimal_opt(&t.change_rate),
                    open: parse_decimal_opt(&t.open),
                    high: parse_decimal_opt(&t.high),
                    low: parse_decimal_opt(&t.low),
                    volume,
                    market_cap: parse_decimal_opt(&t.market_cap),
                })
            })
            .collect();

        tracing::debug!(api_id = api_id, count = trades.len(), "일별 매매정보 조회 완료");
        Ok(trades)
    }
}

#[async_trait]
impl MarketDataSource for KrxApiClient {
    fn name(&self) -> &str {
        "krx"
    }

    async fn ticker_list(&self, category: Category, base_date: NaiveDate) -> Result<Vec<String>> {
        let listing = self.fetch_listing(category, base_date).await?;
        Ok(listing.into_iter().map(|l| l.ticker).collect())
    }

    async fn ticker_name(&self, category: Category, ticker: &str) -> Result<Option<String>> {
        let names = self.names.read().await;
        let by_code = names
            .get(&category)
            .ok_or_else(|| DataError::NotFound(format!("{} 목록이 조회되지 않음", category)))?;

        Ok(by_code.get(ticker).cloned())
    }
}

/// 문자열을 Decimal로 파싱 (쉼표, % 제거).
pub(crate) fn parse_decimal_opt(s: &Option<String>) -> Option<Decimal> {
    s.as_ref().and_then(|v| {
        let cleaned = v.replace(',', "").replace('%', "");
        cleaned.trim().parse().ok()
    })
}

/// YYYYMMDD 또는 YYYY/MM/DD 형식의 날짜 파싱.
fn parse_date_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.contains('/') {
        NaiveDate::parse_from_str(s, "%Y/%m/%d").ok()
    } else {
        NaiveDate::parse_from_str(s, "%Y%m%d").ok()
    }
}
