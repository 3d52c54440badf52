//! `/api/damage` handlers.
//!
//! Request bodies are taken as raw bytes and checked field by field so that
//! every malformed shape gets the same small set of 400 messages.

use crate::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use raidmeter_core::{Error, SAMPLE_LEN, prelude::*, store::EntryStore};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

pub const INVALID_REQUEST: &str = "Invalid request data";
pub const WRONG_COUNT: &str = "Exactly 9 damage values required";
pub const INVALID_VALUES: &str = "Invalid damage values";
pub const ENTRY_NOT_FOUND: &str = "Damage entry not found";

pub const SAVE_FAILED: &str = "Failed to save damage entry";
pub const FETCH_ENTRIES_FAILED: &str = "Failed to fetch damage entries";
pub const FETCH_TOTALS_FAILED: &str = "Failed to fetch user totals";
pub const UPDATE_FAILED: &str = "Failed to update damage entry";
pub const DELETE_FAILED: &str = "Failed to delete damage entry";

///
/// ApiError
/// Status plus a fixed message; store details stay in the logs.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    #[must_use]
    pub const fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: ENTRY_NOT_FOUND,
        }
    }

    #[must_use]
    pub const fn internal(message: &'static str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    /// Map a store failure, logging the detail.
    fn from_store(err: &Error, message: &'static str) -> Self {
        if err.is_not_found() {
            debug!(error = %err, "request target absent");
            return Self::not_found();
        }

        error!(error = %err.display_with_kind(), "{message}");
        Self::internal(message)
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message.to_string(),
            }),
        )
            .into_response()
    }
}

///
/// Response bodies
///

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBody {
    pub success: bool,
    pub entry_id: EntryId,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct EntriesBody {
    pub success: bool,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TotalsBody {
    pub success: bool,
    pub totals: Vec<f64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

///
/// ListQuery
///

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

/// `POST /api/damage`
pub async fn create_entry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreatedBody>, ApiError> {
    let body = parse_object(&body)?;

    let owner_id = body
        .get("userId")
        .and_then(Value::as_str)
        .and_then(|id| OwnerId::new(id).ok());
    let owner_name = body
        .get("userName")
        .and_then(Value::as_str)
        .and_then(|name| PlayerName::parse(name).ok());
    let (Some(owner_id), Some(owner_name)) = (owner_id, owner_name) else {
        return Err(ApiError::bad_request(INVALID_REQUEST));
    };
    let sample = parse_damages(body.get("damages"))?;

    let entry_id = state
        .bounded("saving entry", state.store().create(owner_id, owner_name, sample))
        .await
        .map_err(|err| ApiError::from_store(&err, SAVE_FAILED))?;

    Ok(Json(CreatedBody {
        success: true,
        entry_id,
    }))
}

/// `GET /api/damage`, optionally filtered by `?userId=`.
pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<EntriesBody>, ApiError> {
    let entries = match query.user_id {
        Some(raw) => {
            let owner_id =
                OwnerId::new(raw).map_err(|_| ApiError::bad_request(INVALID_REQUEST))?;
            state
                .bounded("listing entries", state.store().list_by_owner(&owner_id))
                .await
        }
        None => state.bounded("listing entries", state.store().list_all()).await,
    }
    .map_err(|err| ApiError::from_store(&err, FETCH_ENTRIES_FAILED))?;

    Ok(Json(EntriesBody {
        success: true,
        entries,
    }))
}

/// `GET /api/damage/totals`
pub async fn user_totals(State(state): State<AppState>) -> Result<Json<TotalsBody>, ApiError> {
    let totals = state
        .bounded("loading totals", state.store().all_totals())
        .await
        .map_err(|err| ApiError::from_store(&err, FETCH_TOTALS_FAILED))?;

    Ok(Json(TotalsBody {
        success: true,
        totals,
    }))
}

/// `PUT /api/damage/{id}`
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<SuccessBody>, ApiError> {
    let body = parse_object(&body)?;
    let sample = parse_damages(body.get("damages"))?;
    let id = parse_id(&id)?;

    state
        .bounded("updating entry", state.store().update(id, sample))
        .await
        .map_err(|err| ApiError::from_store(&err, UPDATE_FAILED))?;

    Ok(Json(SuccessBody { success: true }))
}

/// `DELETE /api/damage/{id}`
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessBody>, ApiError> {
    let id = parse_id(&id)?;

    state
        .bounded("deleting entry", state.store().delete(id))
        .await
        .map_err(|err| ApiError::from_store(&err, DELETE_FAILED))?;

    Ok(Json(SuccessBody { success: true }))
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::bad_request(INVALID_REQUEST)),
    }
}

fn parse_damages(value: Option<&Value>) -> Result<Sample, ApiError> {
    let Some(Value::Array(items)) = value else {
        return Err(ApiError::bad_request(INVALID_REQUEST));
    };
    if items.len() != SAMPLE_LEN {
        return Err(ApiError::bad_request(WRONG_COUNT));
    }

    let values = items
        .iter()
        .map(Value::as_f64)
        .collect::<Option<Vec<_>>>()
        .ok_or(ApiError::bad_request(INVALID_VALUES))?;

    Sample::new(&values).map_err(|_| ApiError::bad_request(INVALID_VALUES))
}

// An id that does not parse cannot name a stored entry.
fn parse_id(raw: &str) -> Result<EntryId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found())
}

///
/// TESTS
///
