//! 설정 관리.
//!
//! 설정은 다음 순서로 덮어씁니다:
//! 1. 내장 기본값
//! 2. 설정 파일 (기본: `config/kstock.toml`, 없으면 무시)
//! 3. 환경 변수 (`KSTOCK__HTTP__TIMEOUT_SECS` 형식)
//!
//! API 인증키는 설정 파일에 두지 않고 `.env` / `.env.local` 또는 환경 변수에서
//! [`Credentials`]로 읽습니다.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{KstockError, KstockResult};

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/kstock.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP 클라이언트 설정
    pub http: HttpConfig,
    /// 카탈로그 캐시 설정
    pub cache: CacheConfig,
    /// 검색 설정
    pub search: SearchConfig,
    /// 외부 데이터 소스 URL
    pub providers: ProviderConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// HTTP 클라이언트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl HttpConfig {
    /// 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 카탈로그 캐시 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 캐시 파일 경로
    pub path: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: "all_stocks_cache.json".to_string(),
        }
    }
}

/// 검색 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// 기본 결과 수
    pub default_limit: usize,
    /// Naver 검색 요청당 최대 건수
    pub naver_max_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            naver_max_count: 50,
        }
    }
}

/// 외부 데이터 소스 URL.
///
/// 테스트에서 mock 서버로 교체할 수 있도록 설정으로 분리합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// KRX Open API base URL
    pub krx_base_url: String,
    /// 네이버 금융 base URL
    pub naver_finance_url: String,
    /// 네이버 Open API base URL
    pub naver_openapi_url: String,
    /// DART Open API base URL
    pub dart_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            krx_base_url: "https://data-dbg.krx.co.kr".to_string(),
            naver_finance_url: "https://finance.naver.com".to_string(),
            naver_openapi_url: "https://openapi.naver.com".to_string(),
            dart_base_url: "https://opendart.fss.or.kr/api".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> KstockResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("KSTOCK")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

/// 외부 API 자격증명.
///
/// 값은 `SecretString`으로 보관되어 Debug 출력에 노출되지 않습니다.
#[derive(Debug, Default)]
pub struct Credentials {
    /// KRX Open API 인증키
    pub krx_api_key: Option<SecretString>,
    /// DART Open API 인증키
    pub dart_api_key: Option<SecretString>,
    /// 네이버 Open API Client ID
    pub naver_client_id: Option<SecretString>,
    /// 네이버 Open API Client Secret
    pub naver_client_secret: Option<SecretString>,
}

impl Credentials {
    /// `.env.local`, `.env`, 환경 변수 순으로 자격증명을 로드합니다.
    pub fn from_env() -> Self {
        dotenvy::from_filename(".env.local").ok();
        dotenvy::dotenv().ok();

        Self {
            krx_api_key: secret_var("KRX_API_KEY"),
            dart_api_key: secret_var("DART_API_KEY"),
            naver_client_id: secret_var("NAVER_CLIENT_ID"),
            naver_client_secret: secret_var("NAVER_CLIENT_SECRET"),
        }
    }

    /// KRX 인증키 (없으면 설정 에러)
    pub fn require_krx(&self) -> KstockResult<&SecretString> {
        self.krx_api_key.as_ref().ok_or_else(|| {
            KstockError::Config(
                "KRX API KEY가 필요합니다. .env.local 파일에 KRX_API_KEY를 설정하세요."
                    .to_string(),
            )
        })
    }

    /// DART 인증키 (없으면 설정 에러)
    pub fn require_dart(&self) -> KstockResult<&SecretString> {
        self.dart_api_key.as_ref().ok_or_else(|| {
            KstockError::Config(
                "DART API KEY가 필요합니다. .env.local 파일에 DART_API_KEY를 설정하세요."
                    .to_string(),
            )
        })
    }

    /// 네이버 Open API 자격증명 쌍 (둘 다 있을 때만)
    pub fn naver_pair(&self) -> Option<(&SecretString, &SecretString)> {
        match (&self.naver_client_id, &self.naver_client_secret) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }
}

/// 비어 있지 않은 환경 변수를 SecretString으로 읽기
fn secret_var(key: &str) -> Option<SecretString> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}
