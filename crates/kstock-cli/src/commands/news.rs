//! 종목 뉴스 조회.

use anyhow::Result;
use kstock_data::fetch_stock_news;
use kstock_data::news::default_company_name;

use crate::context::AppContext;
use crate::output::emit;

/// `news` 명령 설정.
#[derive(Debug)]
pub struct NewsConfig {
    pub symbol: String,
    /// 회사명 (없으면 `종목{symbol}`)
    pub name: Option<String>,
    pub limit: usize,
}

pub async fn run(ctx: &AppContext, config: NewsConfig) -> Result<()> {
    let company_name = config
        .name
        .unwrap_or_else(|| default_company_name(&config.symbol));

    let client = ctx.naver_news();
    let result = fetch_stock_news(client.as_ref(), &config.symbol, &company_name, config.limit).await;
    emit(&result, None)
}
