//! CLI 명령어 구현 모듈.

pub mod corp_codes;
pub mod disclosure;
pub mod news;
pub mod price;
pub mod search;
pub mod stocks;
