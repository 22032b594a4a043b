//! 공통 에러 타입.
//!
//! 설정 누락처럼 프로세스를 종료해야 하는 에러와, 폴백 체인의 다음 단계로
//! 넘어가야 하는 데이터 소스 에러를 구분합니다.

use thiserror::Error;

/// kstock 핵심 에러.
#[derive(Debug, Error)]
pub enum KstockError {
    /// 설정 에러 (필수 자격증명 누락 등, 치명적)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 소스를 사용할 수 없음 (다음 폴백 단계로 진행)
    #[error("데이터 소스 사용 불가 ({source_name}): {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 입출력 에러
    #[error("입출력 에러: {0}")]
    Io(#[from] std::io::Error),
}

/// kstock 작업을 위한 Result 타입.
pub type KstockResult<T> = Result<T, KstockError>;

impl KstockError {
    /// 데이터 소스 사용 불가 에러 생성.
    pub fn unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for KstockError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for KstockError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
