//! Request handlers
//!
//! | Route | Outcome | Status |
//! |---|---|---|
//! | `POST /api/transactions` | accepted | 201 |
//! | | expired | 204 |
//! | | malformed | 400 + description |
//! | `GET /api/statistics` | data in window | 200 + statistics |
//! | | empty window | 404 + description |

use super::payload::{parse_transaction, ErrorBody, StatisticsBody};
use super::AppState;
use crate::stats::IngestOutcome;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

fn error_response(status: StatusCode, description: impl ToString) -> Response {
    (status, Json(ErrorBody::new(status.as_u16(), description))).into_response()
}

/// Record one transaction
pub async fn post_transaction(State(engine): State<AppState>, body: String) -> Response {
    let transaction = match parse_transaction(&body) {
        Ok(transaction) => transaction,
        Err(e) => {
            log::warn!("⚠️  Rejected transaction payload: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e);
        }
    };

    match engine.ingest(transaction.amount, transaction.timestamp) {
        IngestOutcome::Accepted => StatusCode::CREATED.into_response(),
        IngestOutcome::Expired => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Statistics over the trailing window
pub async fn get_statistics(State(engine): State<AppState>) -> Response {
    let Some(stats) = engine.statistics() else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!(
                "There is no transaction data for the past {} seconds.",
                engine.config().window_secs()
            ),
        );
    };

    match StatisticsBody::from_statistics(&stats) {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            log::error!("❌ Statistics not representable as JSON ({:?}): {}", stats, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Statistics overflowed")
        }
    }
}
