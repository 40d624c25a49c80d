// handlers/tax.rs - POST /tax calculator

use axum::body::Bytes;
use axum::Json;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct TaxRequest {
    #[serde(rename = "type", default)]
    pub tax_type: String,
    #[serde(default)]
    pub amount: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TaxResponse {
    #[serde(rename = "type")]
    pub tax_type: String,
    pub tax_amount: f64,
    pub total_amount: f64,
}

/// Rate for a tax type, matched case-insensitively.
pub fn tax_rate(tax_type: &str) -> Option<Decimal> {
    match tax_type.to_ascii_lowercase().as_str() {
        "vat" => Some(Decimal::new(14, 2)),
        "cgt" => Some(Decimal::new(20, 2)),
        _ => None,
    }
}

/// `(tax, total)` in decimal arithmetic, or `None` when the amount or the
/// result does not fit in a `Decimal`.
fn decimal_amounts(amount: f64, rate: Decimal) -> Option<(f64, f64)> {
    let amount = Decimal::from_f64(amount)?;
    let tax = amount.checked_mul(rate)?;
    let total = amount.checked_add(tax)?;
    Some((tax.to_f64()?, total.to_f64()?))
}

fn float_amounts(amount: f64, rate: Decimal) -> Option<(f64, f64)> {
    let tax = amount * rate.to_f64()?;
    let total = amount + tax;
    (tax.is_finite() && total.is_finite()).then_some((tax, total))
}

pub fn compute(request: TaxRequest) -> Result<TaxResponse, ApiError> {
    let rate = tax_rate(&request.tax_type).ok_or_else(|| {
        tracing::info!("Invalid Tax Type {}", request.tax_type);
        ApiError::bad_request("Not Supported Tax Type")
    })?;

    let (tax_amount, total_amount) = decimal_amounts(request.amount, rate)
        .or_else(|| float_amounts(request.amount, rate))
        .ok_or_else(|| {
            tracing::info!("Tax amount out of range for {}", request.amount);
            ApiError::unprocessable_entity("Amount Out Of Range")
        })?;

    Ok(TaxResponse {
        tax_type: request.tax_type,
        tax_amount,
        total_amount,
    })
}

pub async fn calculate_tax(body: Bytes) -> Result<Json<TaxResponse>, ApiError> {
    let request: TaxRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::unprocessable_entity("Invalid Request Body"))?;

    let response = compute(request)?;
    tracing::info!(
        "Calculated Tax with Type {} and Amount {} Total Amount {}",
        response.tax_type,
        response.tax_amount,
        response.total_amount
    );
    Ok(Json(response))
}
