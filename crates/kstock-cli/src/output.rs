//! JSON 출력.
//!
//! 표준 출력에는 JSON 문서 하나만 씁니다. 진행 로그는 stderr로 갑니다.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// 보기 좋게 들여쓴 JSON 문자열.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON 직렬화 실패")
}

/// JSON을 표준 출력 또는 파일로 내보냅니다.
pub fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = to_pretty_json(value)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("디렉토리 생성 실패: {}", parent.display()))?;
            }
            std::fs::write(path, json)
                .with_context(|| format!("파일 저장 실패: {}", path.display()))?;
            tracing::info!(path = %path.display(), "결과 저장 완료");
        }
        None => println!("{}", json),
    }

    Ok(())
}
