//! Signal API endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AppError, Result, ScoreError};
use crate::services::signals::{score_indicator, support_resistance, ScoringMethod};
use crate::services::StoredEvaluation;
use crate::types::{
    ConsensusBand, DerivativesData, Evaluation, GroupScore, IndicatorKind, IndicatorSeries,
    IndicatorSignal, OhlcPoint, ReadingBundle, Signal, SupportResistanceLevel, Timeframe,
};
use crate::AppState;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
pub struct ApiMeta {
    pub cached: bool,
}

impl<T> ApiResponse<T> {
    fn new(data: T) -> Self {
        Self::with_cached(data, false)
    }

    fn with_cached(data: T, cached: bool) -> Self {
        Self {
            data,
            meta: ApiMeta { cached },
        }
    }
}

/// Readings to score directly.
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub symbol: String,
    /// One of 15m, 30m, 1h, 2h, 4h, 12h, 1d, 3d, 1w. Defaults to 1d.
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub readings: ReadingBundle,
}

/// Raw market data to derive readings from.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub symbol: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub candles: Vec<OhlcPoint>,
    #[serde(default)]
    pub derivatives: Option<DerivativesData>,
}

/// Candles for levels and indicator lines.
#[derive(Debug, Deserialize)]
pub struct CandlesRequest {
    pub symbol: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub candles: Vec<OhlcPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Ok,
    /// Nothing could be scored; composite fields are null.
    InsufficientData,
}

/// Full technical analysis for one symbol.
#[derive(Debug, Serialize)]
pub struct TechnicalAnalysisResponse {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub indicators: Vec<IndicatorSignal>,
    pub overall_signal: Option<Signal>,
    pub overall_score: Option<f64>,
    pub consensus: Option<f64>,
    pub consensus_band: Option<ConsensusBand>,
    pub groups: Vec<GroupScore>,
    pub status: AnalysisStatus,
    pub timestamp: i64,
}

impl TechnicalAnalysisResponse {
    fn from_evaluation(symbol: String, timeframe: Timeframe, evaluation: Evaluation) -> Self {
        let composite = evaluation.composite;
        Self {
            symbol,
            timeframe,
            indicators: evaluation.indicators,
            overall_signal: Some(composite.overall_signal),
            overall_score: Some(composite.overall_score),
            consensus: Some(composite.consensus),
            consensus_band: Some(composite.consensus_band()),
            groups: evaluation.groups,
            status: AnalysisStatus::Ok,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    fn insufficient_data(symbol: String, timeframe: Timeframe) -> Self {
        Self {
            symbol,
            timeframe,
            indicators: Vec::new(),
            overall_signal: None,
            overall_score: None,
            consensus: None,
            consensus_band: None,
            groups: Vec::new(),
            status: AnalysisStatus::InsufficientData,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportResistanceResponse {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub levels: Vec<SupportResistanceLevel>,
}

#[derive(Debug, Serialize)]
pub struct IndicatorSeriesResponse {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub indicator: IndicatorSeries,
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/method", get(get_method))
        .route("/score", post(score))
        .route("/score/:indicator", post(score_single))
        .route("/analyze", post(analyze))
        .route("/levels", post(levels))
        .route("/series/:indicator", post(series))
}

/// Parse a timeframe, defaulting to 1d when absent.
fn parse_timeframe(timeframe: Option<&str>) -> Result<Timeframe> {
    match timeframe {
        None => Ok(Timeframe::default()),
        Some(s) => Timeframe::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown timeframe: {}", s))),
    }
}

fn parse_indicator(name: &str) -> Result<IndicatorKind> {
    IndicatorKind::from_name(name)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown indicator: {}", name)))
}

fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(AppError::BadRequest("Symbol is required".to_string()));
    }
    Ok(symbol.to_uppercase())
}

/// Wrap an evaluation outcome. Having nothing to score is reported as a
/// degraded analysis rather than an error.
fn analysis_response(
    symbol: String,
    timeframe: Timeframe,
    result: std::result::Result<StoredEvaluation, ScoreError>,
) -> Result<ApiResponse<TechnicalAnalysisResponse>> {
    match result {
        Ok(stored) => Ok(ApiResponse::with_cached(
            TechnicalAnalysisResponse::from_evaluation(symbol, timeframe, stored.evaluation),
            stored.cached,
        )),
        Err(ScoreError::EmptyInput) => {
            warn!("No indicators available for {} {}", symbol, timeframe);
            Ok(ApiResponse::new(TechnicalAnalysisResponse::insufficient_data(
                symbol, timeframe,
            )))
        }
        Err(e) => Err(e.into()),
    }
}

/// Describe the scoring method.
async fn get_method() -> Json<ApiResponse<ScoringMethod>> {
    Json(ApiResponse::new(ScoringMethod::current()))
}

/// Score a bundle of readings.
async fn score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<TechnicalAnalysisResponse>>> {
    let symbol = normalize_symbol(&request.symbol)?;
    let timeframe = parse_timeframe(request.timeframe.as_deref())?;

    let result = state
        .signal_store
        .evaluate(&symbol, timeframe, &request.readings);

    Ok(Json(analysis_response(symbol, timeframe, result)?))
}

/// Score one indicator from a bundle of readings.
async fn score_single(
    Path(indicator): Path<String>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ApiResponse<IndicatorSignal>>> {
    let kind = parse_indicator(&indicator)?;
    parse_timeframe(request.timeframe.as_deref())?;

    let signal = score_indicator(&request.readings, kind)?;
    debug!(
        "{} {} scored {}",
        request.symbol, kind, signal.continuous_score
    );

    Ok(Json(ApiResponse::new(signal)))
}

/// Derive readings from candles and derivatives histories, then score them.
async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<TechnicalAnalysisResponse>>> {
    let symbol = normalize_symbol(&request.symbol)?;
    let timeframe = parse_timeframe(request.timeframe.as_deref())?;

    let result = state.signal_store.analyze(
        &symbol,
        timeframe,
        &request.candles,
        request.derivatives.as_ref(),
    );

    Ok(Json(analysis_response(symbol, timeframe, result)?))
}

/// Pivot-point support and resistance levels.
async fn levels(
    Json(request): Json<CandlesRequest>,
) -> Result<Json<ApiResponse<SupportResistanceResponse>>> {
    let symbol = normalize_symbol(&request.symbol)?;
    let timeframe = parse_timeframe(request.timeframe.as_deref())?;

    let levels = support_resistance(&request.candles).map_err(|_| {
        AppError::Unprocessable(format!("No candle data available for {}", symbol))
    })?;

    Ok(Json(ApiResponse::new(SupportResistanceResponse {
        symbol,
        timeframe,
        levels,
    })))
}

/// Full per-bar indicator lines for chart overlays.
async fn series(
    State(state): State<AppState>,
    Path(indicator): Path<String>,
    Json(request): Json<CandlesRequest>,
) -> Result<Json<ApiResponse<IndicatorSeriesResponse>>> {
    let kind = parse_indicator(&indicator)?;
    let symbol = normalize_symbol(&request.symbol)?;
    let timeframe = parse_timeframe(request.timeframe.as_deref())?;

    if request.candles.is_empty() {
        return Err(AppError::Unprocessable(format!(
            "No candle data available for {}",
            symbol
        )));
    }

    let series = state
        .signal_store
        .series(&request.candles, kind)
        .ok_or_else(|| AppError::NotFound(format!("No series for indicator {}", kind)))?;
    debug!(
        "{} {} series over {} candles",
        symbol,
        kind,
        request.candles.len()
    );

    Ok(Json(ApiResponse::new(IndicatorSeriesResponse {
        symbol,
        timeframe,
        indicator: series,
    })))
}
