//! KRX 일별 매매정보 기반 시세 조회.

use chrono::NaiveDate;
use kstock_core::{now_kst, Category};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::{DataError, Result};
use crate::provider::krx_api::{KrxApiClient, KrxDailyTrade};

/// 기본 조회 종목 (삼성전자, SK하이닉스, NAVER, 삼성전자우, 삼성바이오로직스).
pub const DEFAULT_QUOTE_SYMBOLS: &[&str] = &["005930", "000660", "035420", "005935", "207940"];

/// 시세를 찾을 시장 (순서대로 조회).
const QUOTE_MARKETS: [Category; 3] = [Category::Kospi, Category::Kosdaq, Category::Konex];

/// 종목 시세.
#[derive(Debug, Clone, Serialize)]
pub struct StockQuote {
    pub success: bool,
    pub symbol: String,
    pub name: String,
    pub price: i64,
    #[serde(rename = "changeAmount")]
    pub change_amount: i64,
    #[serde(rename = "changePercent")]
    pub change_percent: Decimal,
    pub volume: i64,
    #[serde(rename = "marketCap")]
    pub market_cap: i64,
    pub high: i64,
    pub low: i64,
    pub open: i64,
    #[serde(rename = "previousClose")]
    pub previous_close: i64,
    pub timestamp: String,
    pub extra_info: QuoteExtraInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuoteExtraInfo {
    pub data_source: String,
    pub last_updated: String,
    /// 시세 기준일
    pub trade_date: NaiveDate,
}

impl StockQuote {
    /// 일별 매매정보 한 줄에서 시세를 만듭니다.
    ///
    /// 전일 종가는 `종가 - 전일대비`이며, 전일 종가가 0이면 등락률은 0입니다.
    pub fn from_trade(symbol: &str, trade: &KrxDailyTrade) -> Self {
        let close = trade.close;
        let change = trade.change.unwrap_or_default();
        let previous_close = close - change;

        let change_percent = if previous_close.is_zero() {
            Decimal::ZERO
        } else {
            (change / previous_close * Decimal::ONE_HUNDRED)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
        };

        let now = now_kst();
        Self {
            success: true,
            symbol: symbol.to_string(),
            name: trade.name.clone(),
            price: to_won(close),
            change_amount: to_won(change),
            change_percent,
            volume: trade.volume,
            market_cap: trade.market_cap.map(to_won).unwrap_or(0),
            high: trade.high.map(to_won).unwrap_or(0),
            low: trade.low.map(to_won).unwrap_or(0),
            open: trade.open.map(to_won).unwrap_or(0),
            previous_close: to_won(previous_close),
            timestamp: now.to_rfc3339(),
            extra_info: QuoteExtraInfo {
                data_source: "KRX Open API (한국거래소)".to_string(),
                last_updated: now.format("%Y-%m-%d %H:%M:%S").to_string(),
                trade_date: trade.date,
            },
        }
    }
}

fn to_won(value: Decimal) -> i64 {
    value.trunc().to_i64().unwrap_or(0)
}

/// 시세 조회기.
///
/// 시장별 전종목 시세를 한 번만 조회해 두고 여러 종목 조회에 재사용합니다.
/// 조회에 실패한 시장도 기록해 두고 다시 요청하지 않습니다.
pub struct QuoteFetcher<'a> {
    client: &'a KrxApiClient,
    base_date: NaiveDate,
    /// 시장별 시세 (실패한 시장은 `Err(메시지)`)
    markets: Vec<(Category, std::result::Result<Vec<KrxDailyTrade>, String>)>,
}

impl<'a> QuoteFetcher<'a> {
    pub fn new(client: &'a KrxApiClient, base_date: NaiveDate) -> Self {
        Self {
            client,
            base_date,
            markets: Vec::new(),
        }
    }

    /// 시장 전종목 시세 (최초 요청 시 조회). 실패한 시장은 `None`.
    async fn market_trades(&mut self, market: Category) -> Option<&[KrxDailyTrade]> {
        let idx = match self.markets.iter().position(|(m, _)| *m == market) {
            Some(idx) => idx,
            None => {
                let trades = match self.client.fetch_daily_trades(market, self.base_date).await {
                    Ok(trades) => Ok(trades),
                    Err(e) => {
                        tracing::warn!(market = %market, error = %e, "시장 시세 조회 실패");
                        Err(e.to_string())
                    }
                };
                self.markets.push((market, trades));
                self.markets.len() - 1
            }
        };
        self.markets[idx].1.as_deref().ok()
    }

    /// 종목 시세를 조회합니다.
    ///
    /// 한 시장이라도 응답했으면 못 찾은 종목은 `NotFound`이고, 모든 시장이
    /// 실패했을 때만 `Unavailable`입니다.
    pub async fn quote(&mut self, symbol: &str) -> Result<StockQuote> {
        let mut answered = false;

        for market in QUOTE_MARKETS {
            if let Some(trades) = self.market_trades(market).await {
                answered = true;
                if let Some(trade) = trades.iter().find(|t| t.matches(symbol)) {
                    tracing::debug!(symbol = symbol, market = %market, "시세 조회");
                    return Ok(StockQuote::from_trade(symbol, trade));
                }
            }
        }

        if answered {
            return Err(DataError::NotFound(format!(
                "종목 {}의 주가 데이터를 찾을 수 없습니다.",
                symbol
            )));
        }

        let failures: Vec<String> = self
            .markets
            .iter()
            .filter_map(|(market, result)| result.as_ref().err().map(|e| format!("{}: {}", market, e)))
            .collect();
        Err(DataError::Unavailable(failures.join("; ")))
    }
}
