use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::Slot;

/// Why a wardrobe cannot produce a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WardrobeShortfall {
    NoItems,
    NoTops,
    NoBottoms,
}

impl std::fmt::Display for WardrobeShortfall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WardrobeShortfall::NoItems => write!(
                f,
                "No clothing items found. Please add some clothes to your wardrobe first."
            ),
            WardrobeShortfall::NoTops | WardrobeShortfall::NoBottoms => write!(
                f,
                "Not enough variety in your wardrobe. Please add more tops and bottoms."
            ),
        }
    }
}

/// Failures of the outfit recommendation pipeline
#[derive(thiserror::Error, Debug)]
pub enum RecommendationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("{0}")]
    InsufficientWardrobe(WardrobeShortfall),

    #[error("Outfit generation failed: {0}")]
    GenerationFailed(String),

    #[error("Could not parse a recommendation from the model response: {0}")]
    MalformedRecommendation(String),

    #[error("Recommendation is missing required items: {0}")]
    IncompleteRecommendation(String),

    #[error("Recommended {slot} '{id}' is not in the wardrobe")]
    UnknownItemReference { slot: Slot, id: String },
}

impl RecommendationError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationError::MissingParameter(_) => "MissingParameter",
            RecommendationError::InsufficientWardrobe(_) => "InsufficientWardrobe",
            RecommendationError::GenerationFailed(_) => "GenerationFailed",
            RecommendationError::MalformedRecommendation(_) => "MalformedRecommendation",
            RecommendationError::IncompleteRecommendation(_) => "IncompleteRecommendation",
            RecommendationError::UnknownItemReference { .. } => "UnknownItemReference",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            RecommendationError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            RecommendationError::InsufficientWardrobe(WardrobeShortfall::NoItems) => {
                StatusCode::NOT_FOUND
            }
            RecommendationError::InsufficientWardrobe(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecommendationError::GenerationFailed(_)
            | RecommendationError::MalformedRecommendation(_)
            | RecommendationError::IncompleteRecommendation(_)
            | RecommendationError::UnknownItemReference { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Outfit store error: {0}")]
    Store(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Recommendation(#[from] RecommendationError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Recommendation(e) => e.kind(),
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::ExternalApi(_) | AppError::HttpClient(_) => "ExternalApi",
            AppError::Database(_) | AppError::Store(_) | AppError::Io(_) | AppError::Internal(_) => {
                "Internal"
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            AppError::Recommendation(e) => (e.status(), e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::Store(_) | AppError::Io(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "success": false,
            "error": kind,
            "message": message
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
