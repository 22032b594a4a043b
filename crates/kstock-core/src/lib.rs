//! # KStock Core
//!
//! 국내 주식 카탈로그/검색 도구의 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 다른 크레이트에서 공통으로 사용하는 기본 요소를 제공합니다:
//! - 종목 카탈로그 엔트리 및 시장 구분 타입
//! - JSON 응답 envelope
//! - 설정 관리 (파일 + 환경 변수 + 자격증명)
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
