//! 당일 카탈로그 스냅샷 캐시.
//!
//! 스냅샷 타임스탬프의 KST 날짜가 오늘과 같을 때만 캐시를 사용합니다.
//! 읽기/쓰기 실패는 로그만 남기고 호출자에게 전파하지 않습니다.

use chrono::NaiveDate;
use kstock_core::{now_kst, snapshot_date, CatalogEntry, Category};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{BuildReport, Catalog};

/// 캐시 파일 형식.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub success: bool,
    /// 생성 시각 (RFC3339, 이전 버전은 오프셋 없는 ISO 형식)
    pub timestamp: String,
    pub total_count: usize,
    #[serde(default)]
    pub kospi_count: usize,
    #[serde(default)]
    pub kosdaq_count: usize,
    pub data: Vec<CatalogEntry>,
}

impl CatalogSnapshot {
    /// 구축 결과로 스냅샷을 만듭니다.
    pub fn from_report(report: &BuildReport) -> Self {
        Self {
            success: true,
            timestamp: now_kst().to_rfc3339(),
            total_count: report.catalog.len(),
            kospi_count: report.listed_count(Category::Kospi),
            kosdaq_count: report.listed_count(Category::Kosdaq),
            data: report.catalog.entries().to_vec(),
        }
    }

    /// 스냅샷이 `today`(KST) 날짜에 만들어졌는지 확인합니다.
    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        snapshot_date(&self.timestamp) == Some(today)
    }
}

/// 스냅샷 파일 게이트.
#[derive(Debug, Clone)]
pub struct CacheGate {
    path: PathBuf,
}

impl CacheGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 오늘 만들어진 스냅샷이 있으면 카탈로그를 반환합니다.
    pub async fn load_if_fresh(&self, today: NaiveDate) -> Option<Catalog> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "캐시 파일 없음");
                return None;
            }
        };

        let snapshot: CatalogSnapshot = match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "캐시 파일 파싱 실패");
                return None;
            }
        };

        if !snapshot.is_fresh(today) {
            tracing::debug!(
                path = %self.path.display(),
                timestamp = %snapshot.timestamp,
                "캐시가 오늘 날짜가 아님"
            );
            return None;
        }

        let catalog = Catalog::new(snapshot.data);
        tracing::info!(count = catalog.len(), "캐시에서 종목 로드");
        Some(catalog)
    }

    /// 스냅샷을 저장합니다. 실패해도 경고만 남기고 `false`를 반환합니다.
    pub async fn store(&self, snapshot: &CatalogSnapshot) -> bool {
        let json = match serde_json::to_string_pretty(snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "캐시 직렬화 실패");
                return false;
            }
        };

        match tokio::fs::write(&self.path, json).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "종목 데이터 캐시 저장");
                true
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "캐시 저장 실패");
                false
            }
        }
    }
}
