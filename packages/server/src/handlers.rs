//! HTTP handler functions for the quake forecast API.

use actix_web::{HttpResponse, web};
use chrono::{Datelike, Utc};
use quake_forecast_server_models::{
    ApiBin, ApiBinFailure, ApiBinForecast, ApiEarthquake, ApiError, ApiForecastDetail,
    ApiForecastResponse, ApiHealth, ApiHistoricalFilters, ApiHistoricalResponse, ApiStats,
    ForecastQueryParams, HistoricalQueryParams,
};
use quake_forecast_service::QueryError;
use quake_forecast_store_models::{EventOrdering, EventQuery};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/bins`
///
/// Returns the full bin catalog for reference display.
pub async fn bins(state: web::Data<AppState>) -> HttpResponse {
    let bins: Vec<ApiBin> = state.service.list_bins().iter().map(ApiBin::from).collect();
    HttpResponse::Ok().json(bins)
}

/// `GET /api/forecast`
///
/// Returns the per-bin forecast for a year. A missing `year` defaults to
/// the current UTC year.
pub async fn forecast(
    state: web::Data<AppState>,
    params: web::Query<ForecastQueryParams>,
) -> HttpResponse {
    let year = params.year.unwrap_or_else(|| Utc::now().year());

    match state.service.forecast(year) {
        Ok(batch) => {
            let total_earthquakes: u64 = batch.records.iter().map(|r| r.num_earthquakes).sum();
            let max_expected_magnitude = batch
                .records
                .iter()
                .map(|r| r.max_magnitude)
                .fold(0.0, f64::max);

            HttpResponse::Ok().json(ApiForecastResponse {
                year: batch.year,
                generated_at: Utc::now(),
                forecast_data: batch.records.into_iter().map(ApiBinForecast::from).collect(),
                total_earthquakes,
                max_expected_magnitude,
                failures: batch.failures.into_iter().map(ApiBinFailure::from).collect(),
            })
        }
        Err(e) => error_response(&e),
    }
}

/// `GET /api/forecast/{bin_id}`
///
/// Returns the enriched forecast for one bin. A missing `year` defaults to
/// the current UTC year.
pub async fn forecast_detail(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    params: web::Query<ForecastQueryParams>,
) -> HttpResponse {
    let bin_id = path.into_inner();
    let year = params.year.unwrap_or_else(|| Utc::now().year());

    match state.service.forecast_detail(bin_id, year) {
        Ok(detail) => HttpResponse::Ok().json(ApiForecastDetail::from(detail)),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/historical-data`
///
/// Queries historical events with optional magnitude, bin, date range, and
/// pagination filters.
pub async fn historical_data(
    state: web::Data<AppState>,
    params: web::Query<HistoricalQueryParams>,
) -> HttpResponse {
    let query = EventQuery {
        min_magnitude: params.min_magnitude,
        max_magnitude: params.max_magnitude,
        bin_id: params.bin_id,
        from: params.start_date,
        to: params.end_date,
        limit: params.limit,
        offset: params.offset.unwrap_or(0),
        ordering: EventOrdering::NewestFirst,
    };

    match state.service.historical_data(&query) {
        Ok(events) => {
            let data: Vec<ApiEarthquake> =
                events.into_iter().map(ApiEarthquake::from).collect();
            HttpResponse::Ok().json(ApiHistoricalResponse {
                total_count: data.len(),
                filters_applied: ApiHistoricalFilters {
                    min_magnitude: params.min_magnitude,
                    max_magnitude: params.max_magnitude,
                    bin_id: params.bin_id,
                    start_date: params.start_date,
                    end_date: params.end_date,
                    limit: params.limit,
                    offset: params.offset,
                },
                data,
            })
        }
        Err(e) => error_response(&e),
    }
}

/// `GET /api/stats`
///
/// Returns combined partition and data statistics.
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let partition = state.service.registry_summary();
    let events = state.service.store_summary();

    HttpResponse::Ok().json(ApiStats {
        dataset: partition.dataset,
        bin_count: partition.bin_count,
        total_area: partition.total_area,
        total_events: events.total_events,
        max_magnitude: events.max_magnitude,
        avg_magnitude: events.avg_magnitude,
        earliest_event: events.earliest,
        latest_event: events.latest,
        unassigned_events: events.unassigned_events,
    })
}

/// Maps a typed query outcome to its HTTP response.
fn error_response(error: &QueryError) -> HttpResponse {
    match error {
        QueryError::BinNotFound { .. } => HttpResponse::NotFound().json(ApiError {
            error: error.to_string(),
            status_code: 404,
        }),
        QueryError::InvalidRequest { .. } => HttpResponse::BadRequest().json(ApiError {
            error: error.to_string(),
            status_code: 400,
        }),
    }
}
