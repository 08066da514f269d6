use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use medicine_parser::{MedicineInput, MedicineList, ParsedMedicine, ParsedMedicineList};
use serde::Deserialize;
use tracing::info;

use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ParseParams {
    #[serde(default)]
    pub name: String,
}

/// Parse a single product name
pub async fn parse_single(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(vpid): Path<String>,
    Query(params): Query<ParseParams>,
) -> Result<Json<ParsedMedicine>, ApiError> {
    info!(user = %user.username, vpid = %vpid, "Parsing medicine");

    let input = MedicineInput::new(vpid, params.name);
    let parsed = state.parser.parse_medicine(&input).await?;

    Ok(Json(parsed))
}

/// Parse a list of product names, preserving input order
pub async fn parse_batch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<MedicineList>, JsonRejection>,
) -> Result<Json<ParsedMedicineList>, ApiError> {
    let Json(list) = payload.map_err(|e| ApiError::InputInvalid(e.body_text()))?;
    info!(
        user = %user.username,
        count = list.medicines.len(),
        "Parsing medicine batch"
    );

    let medicines = state.parser.process_batch(&list.medicines).await?;

    Ok(Json(ParsedMedicineList { medicines }))
}
