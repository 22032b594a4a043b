//! DART 회사 고유번호 매핑 생성.

use anyhow::{Context, Result};
use kstock_data::provider::dart::TRACKED_STOCK_CODES;
use std::path::PathBuf;

use crate::context::AppContext;
use crate::output::{emit, to_pretty_json};

/// 기본 매핑 파일 경로.
pub const DEFAULT_MAPPING_PATH: &str = "corp_codes_mapping.json";

/// `corpCode.xml`을 내려받아 주요 종목의 고유번호 매핑을 출력하고 파일로 저장합니다.
pub async fn run(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let dart = ctx.dart_client()?;

    let mapping = dart
        .download_corp_codes(TRACKED_STOCK_CODES)
        .await
        .context("DART 회사 고유번호 다운로드 실패")?;

    for info in mapping.values() {
        tracing::info!(
            stock_code = %info.stock_code,
            corp_code = %info.corp_code,
            corp_name = %info.corp_name,
            "고유번호 매핑"
        );
    }

    let missing: Vec<&str> = TRACKED_STOCK_CODES
        .iter()
        .copied()
        .filter(|code| !mapping.contains_key(*code))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "고유번호를 찾지 못한 종목");
    }

    let path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_MAPPING_PATH));
    std::fs::write(&path, to_pretty_json(&mapping)?)
        .with_context(|| format!("파일 저장 실패: {}", path.display()))?;
    tracing::info!(path = %path.display(), count = mapping.len(), "매핑 파일 저장 완료");

    emit(&mapping, None)
}
