//! 명령 실행에 필요한 설정과 클라이언트 생성.

use anyhow::Result;
use kstock_core::{today_kst, AppConfig, Credentials};
use kstock_data::catalog::CacheGate;
use kstock_data::{DartClient, KrxApiClient, NaverNewsClient, NaverStockSearch};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;

/// 명령 실행 컨텍스트.
pub struct AppContext {
    pub config: AppConfig,
    pub credentials: Credentials,
}

impl AppContext {
    pub fn new(config: AppConfig, credentials: Credentials) -> Self {
        Self { config, credentials }
    }

    /// KRX 클라이언트 (인증키 없으면 설정 에러).
    pub fn krx_client(&self) -> Result<KrxApiClient> {
        let key = self.credentials.require_krx()?;
        Ok(KrxApiClient::new(
            copy_secret(key),
            &self.config.providers.krx_base_url,
            &self.config.http,
        )?)
    }

    /// DART 클라이언트 (인증키 없으면 설정 에러).
    pub fn dart_client(&self) -> Result<DartClient> {
        let key = self.credentials.require_dart()?;
        Ok(DartClient::new(
            copy_secret(key),
            &self.config.providers.dart_base_url,
            &self.config.http,
        )?)
    }

    pub fn naver_search(&self) -> Result<NaverStockSearch> {
        Ok(NaverStockSearch::new(&self.config.providers.naver_finance_url, &self.config.http)?
            .with_max_count(self.config.search.naver_max_count))
    }

    /// 네이버 뉴스 클라이언트. 자격증명이 없으면 `None`.
    pub fn naver_news(&self) -> Option<NaverNewsClient> {
        let (id, secret) = self.credentials.naver_pair()?;

        match NaverNewsClient::new(
            &self.config.providers.naver_openapi_url,
            copy_secret(id),
            copy_secret(secret),
            &self.config.http,
        ) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "네이버 뉴스 클라이언트 생성 실패");
                None
            }
        }
    }

    /// 캐시 파일 경로 (`--cache`가 설정보다 우선).
    pub fn cache_gate(&self, override_path: Option<PathBuf>) -> CacheGate {
        CacheGate::new(override_path.unwrap_or_else(|| PathBuf::from(&self.config.cache.path)))
    }

    /// `--limit`이 없으면 설정의 기본 검색 개수.
    pub fn search_limit(&self, limit: Option<usize>) -> usize {
        limit.unwrap_or(self.config.search.default_limit)
    }

    pub fn today(&self) -> chrono::NaiveDate {
        today_kst()
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}
