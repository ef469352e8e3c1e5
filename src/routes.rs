use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    course::{Course, CourseInsert},
    error::AppError,
    metrics::{record_count, record_latency},
    state::AppState,
};

#[derive(Deserialize)]
pub struct SearchForm {
    #[serde(rename = "courseName")]
    pub course_name: String,
}

/// POST /pyuniversity/courses
///
/// Malformed bodies are rejected by the JSON extractor before this runs; the
/// rejection names the offending field and nothing is written to the store.
pub async fn create_course_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CourseInsert>,
) -> Response {
    let started = Instant::now();
    info!("creating course");

    let course = Course::new(payload);
    let (status, response) = match state.store.insert(&course.id, &course).await {
        Ok(()) => {
            info!(id = %course.id, "created course successfully");
            (
                StatusCode::CREATED,
                (StatusCode::CREATED, Json(course)).into_response(),
            )
        }
        Err(e) => {
            error!(error = %e, "course insert failed");
            let err = AppError::from(e);
            (err.status(), err.into_response())
        }
    };

    record_latency("POST", "/courses", status.as_u16(), started);
    response
}

/// GET /pyuniversity/home
pub async fn home_handler(State(state): State<Arc<AppState>>) -> Response {
    info!("rendering the home page");

    let (status, response) = match state.templates.render_home() {
        Ok(html) => (StatusCode::OK, Html(html).into_response()),
        Err(e) => {
            error!(error = %e, "home page rendering failed");
            let err = AppError::from(e);
            (err.status(), err.into_response())
        }
    };

    record_count("GET", "/home", status.as_u16());
    response
}

/// POST /pyuniversity/home
///
/// A zero-match search is labeled 404 in the metrics but the transport
/// response stays 200 with the rendered empty-result page.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Response {
    let started = Instant::now();
    info!(term = %form.course_name, "searching for the requested course");

    let (status, response) = match run_search(&state, &form.course_name).await {
        Ok((html, matched)) => {
            let status = if matched == 0 {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::OK
            };
            (status, Html(html).into_response())
        }
        Err(e) => {
            error!(error = %e, "course search failed");
            (e.status(), e.into_response())
        }
    };

    record_count("POST", "/home", status.as_u16());
    record_latency("POST", "/home", status.as_u16(), started);
    response
}

async fn run_search(state: &AppState, term: &str) -> Result<(String, usize), AppError> {
    let matches = state.store.query(term).await?;
    let result = matches.len();
    let html = state.templates.render_results(&matches, result)?;
    Ok((html, result))
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> String {
    info!("getting metrics");
    state.metrics.render()
}
