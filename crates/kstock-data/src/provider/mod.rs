//! 외부 데이터 제공자.
//!
//! - [`krx_api`] - KRX Open API (종목 목록, 일별 매매정보)
//! - [`naver`] - 네이버 금융 종목 검색, 네이버 뉴스
//! - [`dart`] - DART 전자공시
//! - [`static_catalog`] - 내장 종목 목록

pub mod dart;
pub mod krx_api;
pub mod naver;
pub mod static_catalog;

pub use dart::{CorpCodeInfo, DartClient, DartError, Disclosure, DisclosureQuery, DisclosureResult};
pub use krx_api::{KrxApiClient, KrxDailyTrade, KrxListing};
pub use naver::{NaverError, NaverNewsClient, NaverStockSearch, NewsArticle};
pub use static_catalog::static_catalog;
