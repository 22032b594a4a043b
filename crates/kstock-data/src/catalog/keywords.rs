//! 카탈로그 엔트리 검색어 생성 규칙.
//!
//! 규칙은 `(패턴, 검색어 묶음)` 형태의 순서 있는 정적 테이블입니다.
//! 종목명에 패턴이 포함되면 묶음 전체를 검색어에 추가합니다.

use kstock_core::Category;
use once_cell::sync::Lazy;
use regex::Regex;

/// 검색어 규칙: 종목명에 패턴이 포함되면 묶음을 추가.
pub type KeywordRule = (&'static str, &'static [&'static str]);

/// 여러 트리거 중 하나라도 포함되면 묶음을 추가하는 규칙.
pub type SectorRule = (&'static [&'static str], &'static [&'static str]);

/// ETF/ETN 운용사 브랜드.
pub static BRAND_RULES: &[KeywordRule] = &[
    ("KODEX", &["kodex", "KODEX", "삼성"]),
    ("TIGER", &["tiger", "TIGER", "미래에셋"]),
    ("KBSTAR", &["kbstar", "KBSTAR", "KB"]),
    ("ARIRANG", &["arirang", "ARIRANG", "한화"]),
    ("SMART", &["smart", "SMART"]),
    ("BNK", &["bnk", "BNK"]),
];

/// ETF/ETN 섹터/테마.
pub static THEME_RULES: &[KeywordRule] = &[
    ("반도체", &["반도체", "semiconductor", "칩", "chip"]),
    ("자동차", &["자동차", "auto", "automotive", "전기차"]),
    ("2차전지", &["2차전지", "배터리", "battery", "전기차"]),
    ("은행", &["은행", "bank", "banking", "금융"]),
    ("코스닥", &["코스닥", "kosdaq"]),
    ("S&P500", &["S&P500", "SP500", "미국", "US", "america"]),
    ("나스닥", &["나스닥", "nasdaq", "미국", "US", "america"]),
    ("원유", &["원유", "oil", "WTI", "crude"]),
    ("금", &["금", "gold"]),
    ("원달러", &["원달러", "USD", "환율", "dollar"]),
    ("유럽", &["유럽", "europe", "EU"]),
    ("일본", &["일본", "japan", "nikkei"]),
    ("중국", &["중국", "china", "CSI"]),
    ("바이오", &["바이오", "bio", "biotech"]),
    ("IT", &["IT", "정보기술", "tech", "technology"]),
    ("리츠", &["리츠", "REIT", "부동산"]),
    ("채권", &["채권", "bond", "treasury"]),
];

/// 지수 계열. 지수는 항상 `지수`/`index`를 가집니다.
pub static INDEX_RULES: &[KeywordRule] = &[
    ("코스피", &["코스피", "kospi", "KOSPI"]),
    ("코스닥", &["코스닥", "kosdaq", "KOSDAQ"]),
    ("KRX", &["krx", "KRX", "한국거래소"]),
];

const INDEX_BASE: &[&str] = &["지수", "index"];

/// 대기업 그룹.
pub static GROUP_RULES: &[KeywordRule] = &[
    ("삼성", &["삼성", "Samsung"]),
    ("LG", &["LG", "Lucky"]),
    ("SK", &["SK"]),
    ("현대", &["현대", "Hyundai"]),
    ("카카오", &["카카오", "Kakao"]),
    ("네이버", &["네이버", "NAVER"]),
    ("포스코", &["포스코", "POSCO"]),
    ("CJ", &["CJ"]),
    ("롯데", &["롯데", "Lotte"]),
    ("한화", &["한화", "Hanwha"]),
    ("KT", &["KT", "케이티"]),
    ("KB", &["KB"]),
    ("신한", &["신한"]),
    ("하나", &["하나"]),
    ("우리", &["우리"]),
];

/// 업종.
pub static SECTOR_RULES: &[SectorRule] = &[
    (&["바이오", "제약", "약품"], &["바이오", "bio"]),
    (&["게임", "엔터"], &["게임", "game"]),
    (&["화학", "케미칼"], &["화학", "chemical"]),
    (&["건설"], &["건설", "construction"]),
    (&["전자", "반도체"], &["전자", "electronics"]),
    (&["은행", "금융", "보험"], &["금융", "finance", "은행", "보험"]),
    (&["통신", "텔레콤"], &["통신", "telecom"]),
    (&["자동차", "모비스"], &["자동차", "auto"]),
];

/// 괄호 안 영문명 (예: "삼성전자(Samsung Electronics)").
static LATIN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([A-Za-z\s&.]+)\)").expect("static regex"));

/// 종목명과 시장 구분으로 검색어 목록을 생성합니다.
///
/// 첫 항목은 항상 종목명이며, 중복은 처음 나온 순서를 유지한 채 제거됩니다.
pub fn derive_keywords(name: &str, market: Category) -> Vec<String> {
    let mut keywords: Vec<&str> = vec![name];

    match market {
        Category::Etf | Category::Etn => {
            apply_rules(name, BRAND_RULES, &mut keywords);
            apply_rules(name, THEME_RULES, &mut keywords);
        }
        Category::Index => {
            keywords.extend_from_slice(INDEX_BASE);
            apply_rules(name, INDEX_RULES, &mut keywords);
        }
        _ => {}
    }

    apply_rules(name, GROUP_RULES, &mut keywords);

    for (triggers, bundle) in SECTOR_RULES {
        if triggers.iter().any(|t| name.contains(t)) {
            keywords.extend_from_slice(bundle);
        }
    }

    let latin = LATIN_NAME
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty());
    if let Some(latin) = latin {
        keywords.push(latin);
    }

    dedup_in_order(keywords)
}

fn apply_rules<'a>(name: &str, rules: &'a [KeywordRule], out: &mut Vec<&'a str>) {
    for (pattern, bundle) in rules {
        if name.contains(pattern) {
            out.extend_from_slice(bundle);
        }
    }
}

fn dedup_in_order(keywords: Vec<&str>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        if !result.iter().any(|k| k == keyword) {
            result.push(keyword.to_string());
        }
    }
    result
}
