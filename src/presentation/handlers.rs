// HTTP request handlers
use crate::domain::projection::RoomFilter;
use crate::infrastructure::http_response::{accepts_brotli, html_response};
use crate::presentation::app_state::AppState;
use crate::presentation::live::refresh_updates;
use crate::presentation::view_controller::{DashboardView, Page};
use crate::presentation::views;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
}

impl RoomQuery {
    fn filter(&self) -> RoomFilter {
        RoomFilter::from_query(self.room.as_deref())
    }
}

/// Query of a page's event stream: its room filter and the chart handle the
/// rendered page mounted.
#[derive(Deserialize)]
pub struct LiveQuery {
    pub room: Option<String>,
    pub chart: Option<u64>,
}

impl LiveQuery {
    fn filter(&self) -> RoomFilter {
        RoomFilter::from_query(self.room.as_deref())
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Render a page from a fresh fetch. A failed fetch renders the load error and
/// the page does not subscribe to refreshes.
async fn render_page(state: &AppState, page: Page, compress: bool) -> Response {
    let mut view = DashboardView::new(page.clone(), state.display.clone());
    let update = match state.dashboard_service.fetch_readings().await {
        Ok(readings) => Some(view.apply(&readings)),
        Err(e) => {
            tracing::error!("Error initializing {} page: {}", page, e);
            None
        }
    };
    // The page's event stream resumes this view from the handle in its URL.
    if let Some(handle) = view.hand_off() {
        tracing::debug!("Rendered {} with chart #{}", page, handle);
    }

    let html = match &page {
        Page::Overview => views::overview_page(&state.display, update.as_ref()),
        Page::Details(filter) => views::details_page(&state.display, filter, update.as_ref()),
    };

    match html_response(html, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Overview dashboard with one gauge per room
pub async fn overview_page(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    render_page(&state, Page::Overview, accepts_brotli(&headers)).await
}

/// Details page for one room or all rooms
pub async fn details_page(
    Query(query): Query<RoomQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    render_page(&state, Page::Details(query.filter()), accepts_brotli(&headers)).await
}

fn live_updates(
    state: Arc<AppState>,
    page: Page,
    mounted: Option<u64>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::debug!("Live updates started for {}", page);
    let view = DashboardView::resume(page, state.display.clone(), mounted);
    let updates = refresh_updates(state.dashboard_service.clone(), view, state.refresh_interval)
        .map(|update| Event::default().event("refresh").json_data(update));

    Sse::new(updates).keep_alive(KeepAlive::default())
}

/// Server-sent refreshes for the overview page
pub async fn overview_events(
    Query(query): Query<LiveQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    live_updates(state, Page::Overview, query.chart)
}

/// Server-sent refreshes for the details page
pub async fn details_events(
    Query(query): Query<LiveQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    live_updates(state, Page::Details(query.filter()), query.chart)
}

fn bad_gateway(e: impl std::fmt::Display) -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
}

/// Latest reading per room as JSON
pub async fn api_overview(State(state): State<Arc<AppState>>) -> Response {
    match state.dashboard_service.overview().await {
        Ok(overview) => Json(overview.gauges).into_response(),
        Err(e) => bad_gateway(e),
    }
}

/// Readings for a room filter, newest first, as JSON
pub async fn api_details(
    Query(query): Query<RoomQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.details(query.filter()).await {
        Ok(details) => Json(details.rows).into_response(),
        Err(e) => bad_gateway(e),
    }
}
