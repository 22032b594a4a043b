//! DART(전자공시시스템) Open API 클라이언트.
//!
//! 종목코드를 DART 회사 고유번호로 바꾼 뒤 공시 목록(`list.json`),
//! 기업 개황(`company.json`), 고유번호 파일(`corpCode.xml`)을 조회합니다.

use chrono::{Duration, NaiveDate};
use kstock_core::{compact_date, now_kst, HttpConfig};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use thiserror::Error;

/// 정상 응답 상태 코드.
const STATUS_OK: &str = "000";

/// `list.json` 페이지당 최대 건수.
pub const MAX_PAGE_COUNT: usize = 100;

/// 주요 공시 필터 시 종목당 최대 건수.
pub const MAX_MAJOR_DISCLOSURES: usize = 10;

/// 공시 상세 페이지 URL.
const DART_VIEWER_URL: &str = "https://dart.fss.or.kr/dsaf001/main.do";

/// 종목코드 → DART 회사 고유번호.
static CORP_CODES: &[(&str, &str)] = &[
    ("005930", "00126380"), // 삼성전자
    ("005935", "00126380"), // 삼성전자우
    ("000660", "00164779"), // SK하이닉스
    ("035420", "00266961"), // NAVER
    ("207940", "00877059"), // 삼성바이오로직스
    ("051910", "00356361"), // LG화학
    ("006400", "00126362"), // 삼성SDI
    ("035720", "00258801"), // 카카오
    ("068270", "00413046"), // 셀트리온
    ("028260", "00149655"), // 삼성물산
    ("005380", "00164742"), // 현대자동차
    ("000270", "00106641"), // 기아
    ("012330", "00126186"), // 현대모비스
    ("003550", "00125361"), // LG
    ("066570", "00356412"), // LG전자
    ("051900", "00434000"), // LG생활건강
    ("096770", "00301937"), // SK이노베이션
    ("000880", "00125470"), // 한화
    ("007570", "00164286"), // 일양약품
    ("326030", "00877631"), // SK바이오팜
    ("028050", "00164397"), // 삼성엔지니어링
    ("018260", "00164443"), // 삼성에스디에스
];

/// 주요 공시 보고서명 키워드.
static MAJOR_REPORT_KEYWORDS: &[&str] = &[
    "사업보고서",
    "분기보고서",
    "반기보고서",
    "주요사항보고서",
    "지분변동신고서",
    "공시정정신고서",
    "투자판단참고사항",
    "기타공시",
    "합병",
    "분할",
    "증자",
    "감자",
    "배당",
    "주식매수",
];

/// 고유번호 매핑을 만들 때 추적하는 주요 종목.
pub static TRACKED_STOCK_CODES: &[&str] = &[
    "005930", "000660", "035420", "207940", "051910", "006400", "035720", "068270", "028260",
    "005380", "000270",
];

/// 공시 조회 기본 종목.
pub static DEFAULT_DISCLOSURE_SYMBOLS: &[&str] = &["005930", "000660", "035420", "207940", "051910"];

/// 종목코드의 DART 회사 고유번호.
pub fn corp_code(stock_code: &str) -> Option<&'static str> {
    CORP_CODES
        .iter()
        .find(|(code, _)| *code == stock_code)
        .map(|(_, corp)| *corp)
}

/// 주요 공시 여부.
pub fn is_major_report(report_name: &str) -> bool {
    MAJOR_REPORT_KEYWORDS.iter().any(|k| report_name.contains(k))
}

/// DART 에러
#[derive(Debug, Error)]
pub enum DartError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DART API 오류 [{status}]: {message}")]
    Api { status: String, message: String },

    #[error("응답 파싱 실패: {0}")]
    Parse(String),

    #[error("압축 파일 처리 실패: {0}")]
    Archive(String),

    #[error("종목코드 {0}에 대한 DART 회사 고유번호를 찾을 수 없습니다.")]
    UnknownCompany(String),
}

impl From<zip::result::ZipError> for DartError {
    fn from(err: zip::result::ZipError) -> Self {
        DartError::Archive(err.to_string())
    }
}

/// `list.json` 원본 항목.
#[derive(Debug, Clone, Deserialize)]
pub struct DartListItem {
    #[serde(default)]
    pub corp_cls: String,
    #[serde(default)]
    pub corp_name: String,
    #[serde(default)]
    pub report_nm: String,
    #[serde(default)]
    pub rcept_no: String,
    #[serde(default)]
    pub flr_nm: String,
    #[serde(default)]
    pub rcept_dt: String,
    #[serde(default)]
    pub rm: String,
}

/// 정리된 공시 항목.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disclosure {
    pub title: String,
    pub company_name: String,
    /// YYYY-MM-DD
    pub disclosure_date: String,
    pub filer_name: String,
    pub category: String,
    pub url: String,
    pub receipt_no: String,
    pub corp_code: String,
    pub corp_cls: String,
    pub rm: String,
    /// YYYYMMDD (원본)
    pub raw_date: String,
}

impl Disclosure {
    fn from_item(item: DartListItem, corp_code: &str) -> Self {
        let title = item.report_nm.trim().to_string();
        Self {
            disclosure_date: format_receipt_date(&item.rcept_dt),
            url: format!("{}?rcpNo={}", DART_VIEWER_URL, item.rcept_no),
            category: title.clone(),
            title,
            company_name: item.corp_name,
            filer_name: item.flr_nm,
            receipt_no: item.rcept_no,
            corp_code: corp_code.to_string(),
            corp_cls: item.corp_cls,
            rm: item.rm,
            raw_date: item.rcept_dt,
        }
    }
}

/// `YYYYMMDD` → `YYYY-MM-DD` (형식이 다르면 그대로).
fn format_receipt_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// 공시 목록 페이지.
#[derive(Debug, Clone)]
pub struct DisclosurePage {
    pub items: Vec<DartListItem>,
    pub total_count: u64,
}

/// 종목별 공시 조회 결과.
#[derive(Debug, Clone, Serialize)]
pub struct DisclosureResult {
    pub success: bool,
    pub stock_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corp_code: Option<String>,
    pub disclosures: Vec<Disclosure>,
    pub total_count: usize,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub source: String,
}

impl DisclosureResult {
    fn no_data(stock_code: &str, corp_code: Option<&str>, days: i64, source: &str) -> Self {
        Self {
            success: true,
            stock_code: stock_code.to_string(),
            corp_code: corp_code.map(str::to_string),
            disclosures: Vec::new(),
            total_count: 0,
            timestamp: now_kst().to_rfc3339(),
            message: Some(format!("최근 {}일 내 공시데이터가 없습니다.", days)),
            source: source.to_string(),
        }
    }
}

/// 공시 조회 옵션.
#[derive(Debug, Clone, Copy)]
pub struct DisclosureQuery {
    /// 최대 건수
    pub limit: usize,
    /// 최근 며칠
    pub days: i64,
    /// 주요 공시만
    pub major_only: bool,
}

impl Default for DisclosureQuery {
    fn default() -> Self {
        Self {
            limit: 10,
            days: 30,
            major_only: false,
        }
    }
}

/// 고유번호 매핑 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpCodeInfo {
    pub corp_code: String,
    pub corp_name: String,
    pub stock_code: String,
}

/// DART Open API 클라이언트.
pub struct DartClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl DartClient {
    pub fn new(api_key: SecretString, base_url: impl Into<String>, http: &HttpConfig) -> Result<Self, DartError> {
        let client = Client::builder().timeout(http.timeout()).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<serde_json::Value, DartError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.expose_secret())])
            .query(params)
            .send()
            .await?
            .error_for_status()?;

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| DartError::Parse(e.to_string()))?;

        let status = value.get("status").and_then(|s| s.as_str()).unwrap_or_default();
        if status != STATUS_OK {
            return Err(DartError::Api {
                status: status.to_string(),
                message: value
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Unknown error")
                    .to_string(),
            });
        }

        Ok(value)
    }

    /// 공시 목록 한 페이지를 조회합니다.
    pub async fn disclosure_list(
        &self,
        corp_code: &str,
        start: NaiveDate,
        end: NaiveDate,
        page_no: u32,
        page_count: usize,
    ) -> Result<DisclosurePage, DartError> {
        let bgn_de = compact_date(start);
        let end_de = compact_date(end);
        let page_no = page_no.to_string();
        let page_count = page_count.clamp(1, MAX_PAGE_COUNT).to_string();

        let value = self
            .get_json(
                "list.json",
                &[
                    ("corp_code", corp_code),
                    ("bgn_de", bgn_de.as_str()),
                    ("end_de", end_de.as_str()),
                    ("page_no", page_no.as_str()),
                    ("page_count", page_count.as_str()),
                ],
            )
            .await?;

        let items: Vec<DartListItem> = match value.get("list") {
            Some(list) => serde_json::from_value(list.clone()).map_err(|e| DartError::Parse(e.to_string()))?,
            None => Vec::new(),
        };

        Ok(DisclosurePage {
            items,
            total_count: value.get("total_count").and_then(|v| v.as_u64()).unwrap_or(0),
        })
    }

    /// 기업 개황을 조회합니다.
    pub async fn company_info(&self, stock_code: &str) -> Result<serde_json::Value, DartError> {
        let corp = corp_code(stock_code).ok_or_else(|| DartError::UnknownCompany(stock_code.to_string()))?;
        self.get_json("company.json", &[("corp_code", corp)]).await
    }

    /// 종목의 최근 공시를 조회합니다.
    ///
    /// 고유번호를 모르는 종목이나 DART 오류는 빈 목록의 성공 결과로 반환합니다.
    pub async fn fetch_disclosures(&self, stock_code: &str, today: NaiveDate, query: DisclosureQuery) -> DisclosureResult {
        let Some(corp) = corp_code(stock_code) else {
            tracing::warn!(stock_code = stock_code, "DART 회사 고유번호 없음");
            return DisclosureResult::no_data(stock_code, None, query.days, "Unknown Company");
        };

        let start = today - Duration::days(query.days);
        let page_count = if query.major_only { MAX_PAGE_COUNT } else { query.limit };

        let page = match self.disclosure_list(corp, start, today, 1, page_count).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(stock_code = stock_code, error = %e, "DART 공시 조회 실패");
                return DisclosureResult::no_data(stock_code, Some(corp), query.days, "DART API (No Data)");
            }
        };

        let disclosures: Vec<Disclosure> = page
            .items
            .into_iter()
            .filter(|item| !query.major_only || is_major_report(&item.report_nm))
            .map(|item| Disclosure::from_item(item, corp))
            .collect();

        let total_count = disclosures.len();
        let keep = if query.major_only {
            query.limit.min(MAX_MAJOR_DISCLOSURES)
        } else {
            query.limit
        };

        tracing::info!(stock_code = stock_code, corp_code = corp, count = total_count, "공시 조회 완료");

        DisclosureResult {
            success: true,
            stock_code: stock_code.to_string(),
            corp_code: Some(corp.to_string()),
            disclosures: disclosures.into_iter().take(keep).collect(),
            total_count,
            timestamp: now_kst().to_rfc3339(),
            message: None,
            source: "DART API".to_string(),
        }
    }

    /// `corpCode.xml` 압축 파일을 받아 추적 종목의 고유번호 매핑을 만듭니다.
    pub async fn download_corp_codes(&self, tracked: &[&str]) -> Result<BTreeMap<String, CorpCodeInfo>, DartError> {
        let url = format!("{}/corpCode.xml", self.base_url);

        let bytes = self
            .client
            .get(&url)
            .query(&[("crtfc_key", self.api_key.expose_secret())])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        tracing::debug!(size = bytes.len(), "corpCode.xml 다운로드 완료");

        let xml = extract_corp_code_xml(&bytes)?;
        Ok(parse_corp_codes(&xml, tracked))
    }
}

/// ZIP에서 `CORPCODE.xml`을 읽습니다.
pub fn extract_corp_code_xml(bytes: &[u8]) -> Result<String, DartError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut file = archive.by_name("CORPCODE.xml")?;
    let mut xml = String::new();
    file.read_to_string(&mut xml)
        .map_err(|e| DartError::Archive(e.to_string()))?;
    Ok(xml)
}

/// 고유번호 XML에서 추적 종목만 추립니다.
pub fn parse_corp_codes(xml: &str, tracked: &[&str]) -> BTreeMap<String, CorpCodeInfo> {
    let document = Html::parse_document(xml);
    let mut mapping = BTreeMap::new();

    let (Ok(list_sel), Ok(corp_sel), Ok(name_sel), Ok(stock_sel)) = (
        Selector::parse("list"),
        Selector::parse("corp_code"),
        Selector::parse("corp_name"),
        Selector::parse("stock_code"),
    ) else {
        return mapping;
    };

    for corp in document.select(&list_sel) {
        let stock_code = text_of(corp, &stock_sel);
        if !tracked.contains(&stock_code.as_str()) {
            continue;
        }
        mapping.insert(
            stock_code.clone(),
            CorpCodeInfo {
                corp_code: text_of(corp, &corp_sel),
                corp_name: text_of(corp, &name_sel),
                stock_code,
            },
        );
    }

    mapping
}

fn text_of(element: ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<result>
    <list>
        <corp_code>00126380</corp_code>
        <corp_name>삼성전자</corp_name>
        <stock_code>005930</stock_code>
        <modify_date>20240101</modify_date>
    </list>
    <list>
        <corp_code>00999999</corp_code>
        <corp_name>비상장회사</corp_name>
        <stock_code> </stock_code>
        <modify_date>20240101</modify_date>
    </list>
</result>"#;

    fn client(server: &mockito::Server) -> DartClient {
        DartClient::new(SecretString::from("key".to_string()), server.url(), &HttpConfig::default()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_corp_code_table() {
        assert_eq!(corp_code("005930"), Some("00126380"));
        assert_eq!(corp_code("005935"), Some("00126380"));
        assert_eq!(corp_code("035420"), Some("00266961"));
        assert_eq!(corp_code("018260"), Some("00164443"));
        assert_eq!(corp_code("999999"), None);
    }

    #[test]
    fn test_major_report_filter() {
        assert!(is_major_report("분기보고서 (2024.03)"));
        assert!(is_major_report("주요사항보고서(자기주식취득결정)"));
        assert!(is_major_report("현금ㆍ현물배당결정"));
        assert!(!is_major_report("임원ㆍ주요주주특정증권등소유상황보고서"));
    }

    #[test]
    fn test_format_receipt_date() {
        assert_eq!(format_receipt_date("20240603"), "2024-06-03");
        assert_eq!(format_receipt_date("2024"), "2024");
    }

    #[test]
    fn test_parse_corp_codes() {
        let mapping = parse_corp_codes(SAMPLE_XML, TRACKED_STOCK_CODES);
        assert_eq!(mapping.len(), 1);
        let samsung = &mapping["005930"];
        assert_eq!(samsung.corp_code, "00126380");
        assert_eq!(samsung.corp_name, "삼성전자");
    }

    #[test]
    fn test_extract_from_zip() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = zip::ZipWriter::new(&mut buf);
            writer
                .start_file("CORPCODE.xml", zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(SAMPLE_XML.as_bytes()).unwrap();
            writer.finish().unwrap();
        }

        let xml = extract_corp_code_xml(buf.get_ref()).unwrap();
        assert!(xml.contains("00126380"));
        assert!(matches!(extract_corp_code_xml(b"not a zip"), Err(DartError::Archive(_))));
    }

    #[tokio::test]
    async fn test_fetch_disclosures_reshapes_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/list.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("crtfc_key".into(), "key".into()),
                Matcher::UrlEncoded("corp_code".into(), "00126380".into()),
                Matcher::UrlEncoded("bgn_de".into(), "20240531".into()),
                Matcher::UrlEncoded("end_de".into(), "20240630".into()),
                Matcher::UrlEncoded("page_count".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"status":"000","message":"정상","total_count":1,"total_page":1,"list":[
                    {"corp_cls":"Y","corp_name":"삼성전자","report_nm":" 분기보고서 (2024.03) ",
                     "rcept_no":"20240515000123","flr_nm":"삼성전자","rcept_dt":"20240515","rm":""}]}"#,
            )
            .create_async()
            .await;

        let result = client(&server)
            .fetch_disclosures("005930", today(), DisclosureQuery::default())
            .await;

        assert!(result.success);
        assert_eq!(result.source, "DART API");
        assert_eq!(result.total_count, 1);
        let d = &result.disclosures[0];
        assert_eq!(d.title, "분기보고서 (2024.03)");
        assert_eq!(d.disclosure_date, "2024-05-15");
        assert_eq!(d.url, "https://dart.fss.or.kr/dsaf001/main.do?rcpNo=20240515000123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_major_only_filters_and_caps() {
        let items: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"report_nm":"현금배당결정 {}","rcept_no":"{}","rcept_dt":"20240601"}}"#,
                    i, i
                )
            })
            .chain(std::iter::once(
                r#"{"report_nm":"임원ㆍ주요주주특정증권등소유상황보고서","rcept_no":"x","rcept_dt":"20240601"}"#
                    .to_string(),
            ))
            .collect();
        let body = format!(r#"{{"status":"000","list":[{}]}}"#, items.join(","));

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/list.json")
            .match_query(Matcher::UrlEncoded("page_count".into(), "100".into()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let query = DisclosureQuery {
            limit: 20,
            days: 30,
            major_only: true,
        };
        let result = client(&server).fetch_disclosures("000660", today(), query).await;

        assert_eq!(result.total_count, 15);
        assert_eq!(result.disclosures.len(), MAX_MAJOR_DISCLOSURES);
    }

    #[tokio::test]
    async fn test_unknown_company_and_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/list.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"013","message":"조회된 데이타가 없습니다."}"#)
            .create_async()
            .await;
        let dart = client(&server);

        let unknown = dart.fetch_disclosures("999999", today(), DisclosureQuery::default()).await;
        assert!(unknown.success);
        assert_eq!(unknown.source, "Unknown Company");
        assert_eq!(unknown.message.as_deref(), Some("최근 30일 내 공시데이터가 없습니다."));

        let no_data = dart.fetch_disclosures("005930", today(), DisclosureQuery::default()).await;
        assert!(no_data.success);
        assert_eq!(no_data.source, "DART API (No Data)");
        assert_eq!(no_data.corp_code.as_deref(), Some("00126380"));
        assert!(no_data.disclosures.is_empty());
    }

    #[tokio::test]
    async fn test_company_info() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/company.json")
            .match_query(Matcher::UrlEncoded("corp_code".into(), "00164779".into()))
            .with_status(200)
            .with_body(r#"{"status":"000","corp_name":"SK하이닉스","ceo_nm":"곽노정"}"#)
            .create_async()
            .await;
        let dart = client(&server);

        let info = dart.company_info("000660").await.unwrap();
        assert_eq!(info["corp_name"], "SK하이닉스");
        assert!(matches!(dart.company_info("999999").await, Err(DartError::UnknownCompany(_))));
    }
}
