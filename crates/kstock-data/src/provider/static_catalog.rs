//! 네트워크 없이 쓰는 내장 종목 목록.
//!
//! 폴백 체인의 마지막 단계로, 항상 성공합니다.

use kstock_core::{CatalogEntry, Category};

use crate::catalog::Catalog;

type StaticStock = (&'static str, &'static str, Category, &'static [&'static str]);

static STATIC_STOCKS: &[StaticStock] = &[
    ("005930", "삼성전자", Category::Kospi, &["삼성전자", "삼성", "Samsung"]),
    ("000660", "SK하이닉스", Category::Kospi, &["SK하이닉스", "SK", "하이닉스", "Hynix"]),
    ("035420", "네이버", Category::Kospi, &["네이버", "NAVER", "네이버주식회사"]),
    ("207940", "삼성바이오로직스", Category::Kospi, &["삼성바이오로직스", "삼성바이오", "바이오로직스"]),
    ("086790", "하나금융지주", Category::Kospi, &["하나금융지주", "하나금융", "하나은행", "하나"]),
    ("316140", "우리금융지주", Category::Kospi, &["우리금융지주", "우리금융", "우리은행", "우리"]),
    ("003670", "포스코홀딩스", Category::Kospi, &["포스코홀딩스", "포스코", "POSCO"]),
    ("323410", "카카오뱅크", Category::Kospi, &["카카오뱅크", "카뱅", "KakaoBank"]),
    ("036570", "엔씨소프트", Category::Kospi, &["엔씨소프트", "NCsoft", "NC", "엔씨"]),
    ("251270", "넷마블", Category::Kospi, &["넷마블", "Netmarble"]),
    ("112040", "위메이드", Category::Kosdaq, &["위메이드", "Wemade"]),
    ("196170", "알테오젠", Category::Kosdaq, &["알테오젠", "Alteogen"]),
    ("068270", "셀트리온", Category::Kospi, &["셀트리온", "Celltrion"]),
    ("145020", "휴젤", Category::Kosdaq, &["휴젤", "Hugel"]),
    ("000810", "삼성화재", Category::Kospi, &["삼성화재", "삼성화재해상보험", "화재"]),
    ("032830", "삼성생명", Category::Kospi, &["삼성생명", "삼성생명보험", "생명"]),
    ("015760", "한국전력", Category::Kospi, &["한국전력", "한전", "KEPCO", "전력"]),
    ("018260", "삼성에스디에스", Category::Kospi, &["삼성에스디에스", "삼성SDS", "SDS"]),
    ("009150", "삼성전기", Category::Kospi, &["삼성전기", "삼성전자부품", "전기"]),
    ("034730", "SK", Category::Kospi, &["SK", "SK주식회사"]),
    ("011200", "HMM", Category::Kospi, &["HMM", "현대상선", "상선"]),
    ("024110", "기업은행", Category::Kospi, &["기업은행", "IBK", "중소기업은행"]),
    ("139480", "이마트", Category::Kospi, &["이마트", "E-MART", "마트"]),
    ("097950", "CJ제일제당", Category::Kospi, &["CJ제일제당", "CJ", "제일제당"]),
    ("271560", "오리온", Category::Kospi, &["오리온", "Orion"]),
    ("051900", "LG생활건강", Category::Kospi, &["LG생활건강", "LG화장품", "생활건강"]),
    ("090430", "아모레퍼시픽", Category::Kospi, &["아모레퍼시픽", "아모레", "Amore"]),
    ("282330", "BGF리테일", Category::Kospi, &["BGF리테일", "BGF", "편의점"]),
    ("000720", "현대건설", Category::Kospi, &["현대건설", "현대", "건설"]),
    ("004020", "현대제철", Category::Kospi, &["현대제철", "제철"]),
    ("009830", "한화솔루션", Category::Kospi, &["한화솔루션", "한화", "한화케미칼", "솔루션"]),
    ("011170", "롯데케미칼", Category::Kospi, &["롯데케미칼", "롯데", "화학"]),
    ("002350", "넥센타이어", Category::Kospi, &["넥센타이어", "넥센", "타이어"]),
    ("192820", "코스맥스", Category::Kospi, &["코스맥스", "Cosmax"]),
];

/// 내장 종목 카탈로그.
pub fn static_catalog() -> Catalog {
    Catalog::new(
        STATIC_STOCKS
            .iter()
            .map(|(symbol, name, market, keywords)| {
                CatalogEntry::new(*symbol, *name, *market)
                    .with_keywords(keywords.iter().map(|k| k.to_string()).collect())
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_catalog_symbols_unique() {
        let catalog = static_catalog();
        assert_eq!(catalog.len(), STATIC_STOCKS.len());
    }

    #[test]
    fn test_static_catalog_search() {
        let catalog = static_catalog();
        let hits = catalog.search("하이닉스", 20);
        assert_eq!(hits[0].symbol, "000660");

        let hits = catalog.search("posco", 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "포스코홀딩스");
    }

    #[test]
    fn test_celltrion_resolves_to_kospi_listing() {
        let catalog = static_catalog();
        let hits = catalog.search("셀트리온", 20);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].symbol, "068270");
        assert_eq!(hits[0].market, Category::Kospi);
        assert!(catalog.entries().iter().all(|e| e.symbol != "302440"));
    }
}
