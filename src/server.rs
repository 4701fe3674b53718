//! HTTP shell around the encoder and predictor.
//!
//! One embedded page, one JSON endpoint, one health probe. The page is
//! a static form wired to `POST /api/predict`; everything contract-
//! bearing lives in [`crate::feature_encoder`] and [`crate::models`].

use crate::error::{EncodeError, PredictError};
use crate::feature_encoder::FeatureEncoder;
use crate::models::predictor::Predictor;
use crate::types::transaction::TransactionInput;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Shared request-handling state.
#[derive(Clone)]
pub struct AppState {
    pub encoder: Arc<FeatureEncoder>,
    pub predictor: Predictor,
}

/// Response body for `POST /api/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub is_fraud: bool,
    pub fraud_probability: f64,
    /// Verdict label for the result card.
    pub verdict: String,
    /// Schema columns the encoder zero-filled for this request.
    pub zero_filled_columns: Vec<String>,
    pub scored_at: DateTime<Utc>,
}

/// Health probe payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub feature_count: usize,
    pub probability_output: bool,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/predict", post(predict))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        feature_count: state.encoder.feature_count(),
        probability_output: state.predictor.artifact().supports_probability(),
    })
}

async fn predict(
    State(state): State<AppState>,
    Json(tx): Json<TransactionInput>,
) -> Result<Json<PredictResponse>, ApiError> {
    let start = Instant::now();

    let record = state.encoder.encode(&tx)?;
    let verdict = state.predictor.predict(&record)?;

    debug!(
        tx_type = %tx.tx_type,
        amount = tx.amount,
        is_fraud = verdict.is_fraud,
        fraud_probability = verdict.fraud_probability,
        processing_time_us = start.elapsed().as_micros() as u64,
        "Transaction scored"
    );

    Ok(Json(PredictResponse {
        is_fraud: verdict.is_fraud,
        fraud_probability: verdict.fraud_probability,
        verdict: verdict.label().to_string(),
        zero_filled_columns: record.zero_filled().to_vec(),
        scored_at: Utc::now(),
    }))
}

/// Maps library errors onto HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    Encode(EncodeError),
    Predict(PredictError),
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        ApiError::Encode(err)
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        ApiError::Predict(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Encode(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Predict(e) => {
                error!(error = %e, "Inference failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Transaction Fraud Detection</title>
<style>
body {
    background-color: #121212;
    color: #e0e0e0;
    font-family: system-ui, sans-serif;
    max-width: 720px;
    margin: 40px auto;
    padding: 0 16px;
}
.card {
    background-color: #1e1e1e;
    padding: 25px;
    border-radius: 12px;
    margin-bottom: 20px;
    box-shadow: 0 4px 12px rgba(0,0,0,0.4);
}
.title { font-size: 32px; font-weight: 700; }
.subtitle { color: #b0b0b0; margin-bottom: 20px; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; }
label { display: block; font-size: 13px; color: #b0b0b0; margin-bottom: 4px; }
input, select {
    width: 100%;
    box-sizing: border-box;
    background: #2a2a2a;
    color: #e0e0e0;
    border: 1px solid #3a3a3a;
    border-radius: 6px;
    padding: 8px;
}
button {
    width: 100%;
    margin-top: 16px;
    padding: 12px;
    border: none;
    border-radius: 8px;
    background: #3b5bdb;
    color: white;
    font-size: 16px;
    cursor: pointer;
}
.result-card {
    display: none;
    padding: 20px;
    border-radius: 12px;
    font-size: 20px;
    font-weight: 600;
}
.result-card.fraud { background-color: #3a1f1f; color: #ff6b6b; }
.result-card.safe { background-color: #1f3a2d; color: #5cff9d; }
.result-card.error { background-color: #3a2f1f; color: #ffc078; }
footer { text-align: center; color: gray; margin-top: 24px; }
</style>
</head>
<body>
<div class="title">Transaction Fraud Detection System</div>
<div class="subtitle">Enter transaction details to check fraud risk</div>

<div class="card">
  <form id="fraud-form">
    <div class="grid">
      <div><label for="step">Time Step (Hour)</label>
        <input id="step" type="number" min="0" step="1" value="10"></div>
      <div><label for="type">Transaction Type</label>
        <select id="type">
          <option>CASH_IN</option>
          <option>CASH_OUT</option>
          <option>DEBIT</option>
          <option>PAYMENT</option>
          <option>TRANSFER</option>
        </select></div>
      <div><label for="amount">Transaction Amount</label>
        <input id="amount" type="number" min="0" step="any" value="50000.0"></div>
      <div><label for="oldbalanceOrg">Sender Old Balance</label>
        <input id="oldbalanceOrg" type="number" min="0" step="any" value="60000.0"></div>
      <div><label for="newbalanceOrig">Sender New Balance</label>
        <input id="newbalanceOrig" type="number" min="0" step="any" value="10000.0"></div>
      <div><label for="oldbalanceDest">Receiver Old Balance</label>
        <input id="oldbalanceDest" type="number" min="0" step="any" value="0.0"></div>
      <div><label for="newbalanceDest">Receiver New Balance</label>
        <input id="newbalanceDest" type="number" min="0" step="any" value="50000.0"></div>
    </div>
    <button type="submit">Check Fraud</button>
  </form>
</div>

<div id="result" class="result-card"></div>

<footer>Fraud Detection System &bull; Machine Learning Project</footer>

<script>
const form = document.getElementById('fraud-form');
const result = document.getElementById('result');

form.addEventListener('submit', async (ev) => {
    ev.preventDefault();

    const body = {
        step: parseInt(document.getElementById('step').value, 10),
        type: document.getElementById('type').value,
        amount: parseFloat(document.getElementById('amount').value),
        oldbalanceOrg: parseFloat(document.getElementById('oldbalanceOrg').value),
        newbalanceOrig: parseFloat(document.getElementById('newbalanceOrig').value),
        oldbalanceDest: parseFloat(document.getElementById('oldbalanceDest').value),
        newbalanceDest: parseFloat(document.getElementById('newbalanceDest').value),
    };

    try {
        const resp = await fetch('/api/predict', {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body),
        });
        const data = await resp.json();
        result.style.display = 'block';

        if (!resp.ok) {
            result.className = 'result-card error';
            result.textContent = data.error || 'Prediction failed';
            return;
        }

        const pct = (data.fraud_probability * 100).toFixed(2);
        result.className = data.is_fraud ? 'result-card fraud' : 'result-card safe';
        result.innerHTML = data.verdict + '<br><br>Fraud Probability: ' + pct + '%';
    } catch (err) {
        result.style.display = 'block';
        result.className = 'result-card error';
        result.textContent = 'Request failed: ' + err;
    }
});
</script>
</body>
</html>
"#;
