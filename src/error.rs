use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unexpected error: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected error: {0}")]
    Template(#[from] minijinja::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Store { .. } | AppError::Template { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
