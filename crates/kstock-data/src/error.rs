//! 데이터 모듈 오류 타입.

use kstock_core::KstockError;
use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// HTTP 요청 실패
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// 외부 API가 오류 상태를 반환
    #[error("API error [{api}]: {message}")]
    Api { api: String, message: String },

    /// 응답 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 소스 사용 불가 (자격증명 누락 등)
    #[error("Source unavailable: {0}")]
    Unavailable(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 파일 입출력 오류
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for KstockError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::NotFound(what) => KstockError::NotFound(what),
            DataError::SerializationError(msg) => KstockError::Serialization(msg),
            DataError::Io(e) => KstockError::Io(e),
            other => KstockError::unavailable("data", other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
