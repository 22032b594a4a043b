//! 카탈로그, 응답 envelope, 시간 처리에 쓰이는 공통 타입.

mod catalog;
mod envelope;
mod time;

pub use catalog::*;
pub use envelope::*;
pub use time::*;
