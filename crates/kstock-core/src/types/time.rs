//! 한국 표준시(KST) 기준 시간 유틸리티.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Asia::Seoul;

/// 현재 KST 시각.
pub fn now_kst() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&Seoul).fixed_offset()
}

/// 오늘 KST 날짜.
pub fn today_kst() -> NaiveDate {
    Utc::now().with_timezone(&Seoul).date_naive()
}

/// 스냅샷 타임스탬프 문자열에서 KST 날짜를 추출합니다.
///
/// 오프셋이 있는 RFC3339는 KST로 변환하고, 오프셋 없는 ISO 형식은 이미
/// 현지 시각으로 기록된 것으로 봅니다. 둘 다 아니면 앞 10자리를 날짜로 읽습니다.
pub fn snapshot_date(timestamp: &str) -> Option<NaiveDate> {
    let ts = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Seoul).date_naive());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    ts.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// `YYYYMMDD` 형식 (KRX/DART 요청 파라미터).
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
