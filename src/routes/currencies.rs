use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    middleware::{
        ctx::Ctx,
        error::{CtxError, CtxResult},
        mw_ctx::CtxState,
    },
    services::currency_service::{CurrencyService, RateTable},
};

pub fn routes() -> Router<Arc<CtxState>> {
    Router::new()
        .route("/api/currencies", get(get_currencies))
        .route("/api/currencies/convert", get(convert))
}

#[derive(Debug, Deserialize)]
struct CurrenciesQuery {
    enabled: Option<bool>,
}

async fn get_currencies(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Query(query): Query<CurrenciesQuery>,
) -> CtxResult<Json<RateTable>> {
    let table = CurrencyService::new(&state.db.exchange_rates)
        .list(query.enabled.unwrap_or(false))
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(table))
}

#[derive(Debug, Deserialize)]
struct ConvertQuery {
    amount: f64,
    from: String,
    to: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionView {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub result: f64,
}

async fn convert(
    State(state): State<Arc<CtxState>>,
    ctx: Ctx,
    Query(query): Query<ConvertQuery>,
) -> CtxResult<Json<ConversionView>> {
    let from = query.from.to_uppercase();
    let to = query.to.to_uppercase();
    let result = CurrencyService::new(&state.db.exchange_rates)
        .convert(query.amount, &from, &to)
        .await
        .map_err(CtxError::from(&ctx))?;
    Ok(Json(ConversionView {
        amount: query.amount,
        from,
        to,
        result,
    }))
}
