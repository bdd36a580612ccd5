use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{Breakdown, FeeKind, FeeList, FeeUpdate, Inputs, run_breakdown};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFeeKind {
    #[serde(alias = "percent", alias = "pct")]
    Percentage,
    #[serde(alias = "fixedAmount", alias = "fixed_amount", alias = "fixed")]
    FixedAmount,
}

impl From<ApiFeeKind> for FeeKind {
    fn from(value: ApiFeeKind) -> Self {
        match value {
            ApiFeeKind::Percentage => FeeKind::Percentage,
            ApiFeeKind::FixedAmount => FeeKind::FixedAmount,
        }
    }
}

impl From<FeeKind> for ApiFeeKind {
    fn from(value: FeeKind) -> Self {
        match value {
            FeeKind::Percentage => ApiFeeKind::Percentage,
            FeeKind::FixedAmount => ApiFeeKind::FixedAmount,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FeePayload {
    name: Option<String>,
    value: Option<f64>,
    kind: Option<ApiFeeKind>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BreakdownPayload {
    target_profit: Option<f64>,
    unit_price: Option<f64>,
    cost_of_goods: Option<f64>,
    marketing_cost: Option<f64>,
    operational_cost: Option<f64>,
    /// Structured fee entries; JSON bodies only.
    fees: Option<Vec<FeePayload>>,
    /// Comma-separated `NAME:VALUE[%]` specs, the form a query string can
    /// carry. Ignored when `fees` is present.
    fee_specs: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "marketcalc",
    about = "Marketplace seller target calculator (unit volume + profit breakdown from a profit target)"
)]
struct Cli {
    #[arg(long, help = "Profit target for the period")]
    target_profit: f64,
    #[arg(long, help = "Sale price per unit")]
    unit_price: f64,
    #[arg(long, default_value_t = 0.0, help = "Cost of goods per unit")]
    cost_of_goods: f64,
    #[arg(long, default_value_t = 0.0, help = "Marketing spend per unit")]
    marketing_cost: f64,
    #[arg(long, default_value_t = 0.0, help = "Operational cost per unit")]
    operational_cost: f64,
    #[arg(
        long,
        help = "Platform fee as NAME:VALUE% (percentage of price) or NAME:VALUE (fixed per unit); repeatable"
    )]
    fee: Vec<String>,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: Inputs,
    fees: FeeList,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeeView {
    id: u32,
    name: String,
    value: f64,
    kind: ApiFeeKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BreakdownResponse {
    target_profit: f64,
    unit_price: f64,
    cost_of_goods: f64,
    marketing_cost: f64,
    operational_cost: f64,
    fees: Vec<FeeView>,
    /// `null` until the unit price is positive.
    breakdown: Option<Breakdown>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Clone, PartialEq)]
struct ParsedFee {
    name: String,
    value: f64,
    kind: FeeKind,
}

fn build_inputs(cli: Cli) -> Result<ApiRequest, String> {
    if !cli.target_profit.is_finite() || cli.target_profit < 0.0 {
        return Err("--target-profit must be >= 0".to_string());
    }

    if !cli.unit_price.is_finite() || cli.unit_price < 0.0 {
        return Err("--unit-price must be >= 0".to_string());
    }

    if !cli.cost_of_goods.is_finite() || cli.cost_of_goods < 0.0 {
        return Err("--cost-of-goods must be >= 0".to_string());
    }

    if !cli.marketing_cost.is_finite() || cli.marketing_cost < 0.0 {
        return Err("--marketing-cost must be >= 0".to_string());
    }

    if !cli.operational_cost.is_finite() || cli.operational_cost < 0.0 {
        return Err("--operational-cost must be >= 0".to_string());
    }

    let mut parsed = Vec::with_capacity(cli.fee.len());
    for spec in &cli.fee {
        parsed.push(parse_fee_spec(spec)?);
    }
    let fees = build_fees(parsed)?;

    Ok(ApiRequest {
        inputs: Inputs {
            target_profit: cli.target_profit,
            unit_price: cli.unit_price,
            cost_of_goods: cli.cost_of_goods,
            marketing_cost_per_unit: cli.marketing_cost,
            operational_cost_per_unit: cli.operational_cost,
        },
        fees,
    })
}

fn parse_fee_spec(spec: &str) -> Result<ParsedFee, String> {
    let Some((name, raw_value)) = spec.rsplit_once(':') else {
        return Err(format!(
            "--fee '{spec}' must look like NAME:VALUE% or NAME:VALUE"
        ));
    };

    let raw_value = raw_value.trim();
    let (raw_value, kind) = match raw_value.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), FeeKind::Percentage),
        None => (raw_value, FeeKind::FixedAmount),
    };

    let value = raw_value
        .parse::<f64>()
        .map_err(|_| format!("--fee '{spec}' has an invalid numeric value"))?;

    Ok(ParsedFee {
        name: name.trim().to_string(),
        value,
        kind,
    })
}

fn build_fees(parsed: Vec<ParsedFee>) -> Result<FeeList, String> {
    let mut fees = FeeList::new();
    for fee in parsed {
        if !fee.value.is_finite() || fee.value < 0.0 {
            return Err(format!("fee '{}' must have a value >= 0", fee.name));
        }
        let id = fees.add();
        fees.update(id, FeeUpdate::Name(fee.name));
        fees.update(id, FeeUpdate::Value(fee.value));
        fees.update(id, FeeUpdate::Kind(fee.kind));
    }
    Ok(fees)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route(
            "/api/breakdown",
            get(breakdown_get_handler).post(breakdown_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    println!("marketcalc HTTP API listening on http://{addr}");
    println!("Local access: http://127.0.0.1:{port}/api/breakdown");

    axum::serve(listener, app).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn breakdown_get_handler(Query(payload): Query<BreakdownPayload>) -> Response {
    breakdown_handler_impl(payload)
}

async fn breakdown_post_handler(Json(payload): Json<BreakdownPayload>) -> Response {
    breakdown_handler_impl(payload)
}

fn breakdown_handler_impl(payload: BreakdownPayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    let breakdown = run_breakdown(&request.inputs, request.fees.entries());
    json_response(StatusCode::OK, build_breakdown_response(&request, breakdown))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<BreakdownPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: BreakdownPayload) -> Result<ApiRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.target_profit {
        cli.target_profit = v;
    }
    if let Some(v) = payload.unit_price {
        cli.unit_price = v;
    }
    if let Some(v) = payload.cost_of_goods {
        cli.cost_of_goods = v;
    }
    if let Some(v) = payload.marketing_cost {
        cli.marketing_cost = v;
    }
    if let Some(v) = payload.operational_cost {
        cli.operational_cost = v;
    }
    if let Some(specs) = &payload.fee_specs {
        cli.fee = specs
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut request = build_inputs(cli)?;

    // Structured fees win over both the defaults and any spec string.
    if let Some(fee_payloads) = payload.fees {
        let parsed = fee_payloads
            .into_iter()
            .map(|fee| ParsedFee {
                name: fee.name.unwrap_or_default(),
                value: fee.value.unwrap_or(0.0),
                kind: fee.kind.map(FeeKind::from).unwrap_or_default(),
            })
            .collect();
        request.fees = build_fees(parsed)?;
    }

    Ok(request)
}

fn default_cli_for_api() -> Cli {
    Cli {
        target_profit: 0.0,
        unit_price: 0.0,
        cost_of_goods: 0.0,
        marketing_cost: 0.0,
        operational_cost: 0.0,
        fee: vec!["Platform commission:2.5%".to_string()],
    }
}

fn build_breakdown_response(
    request: &ApiRequest,
    breakdown: Option<Breakdown>,
) -> BreakdownResponse {
    BreakdownResponse {
        target_profit: request.inputs.target_profit,
        unit_price: request.inputs.unit_price,
        cost_of_goods: request.inputs.cost_of_goods,
        marketing_cost: request.inputs.marketing_cost_per_unit,
        operational_cost: request.inputs.operational_cost_per_unit,
        fees: request
            .fees
            .entries()
            .iter()
            .map(|entry| FeeView {
                id: entry.id,
                name: entry.name.clone(),
                value: entry.value,
                kind: entry.kind.into(),
            })
            .collect(),
        breakdown,
    }
}
