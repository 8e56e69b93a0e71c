use axum::{
    Router,
    extract::{FromRef, Request},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use noticeboard_common::spam::SpamPolicy;
use noticeboard_db::client::{DbClient, DbError};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

mod json;
pub mod pages;
mod routes;
mod submission;

pub type ServerRouter = Router<ServerState>;

/// Which of the two applications this process serves.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    Todo,
    Blog,
}

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
    pub spam_policy: Arc<SpamPolicy>,
}

pub fn routes(app_kind: AppKind) -> ServerRouter {
    routes::routes(app_kind).fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(#[from] serde_json::Error),
    #[error(transparent)]
    Database(#[from] DbError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) => StatusCode::NOT_FOUND,
            ServerError::Database(err) if err.is_connection() => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// What the client gets to see. Never contains the underlying error.
    pub fn public_message(&self) -> &'static str {
        match self {
            ServerError::UnknownRoute(_) => "The page you requested does not exist.",
            ServerError::Database(err) if err.is_connection() => pages::CONNECTION_FAILURE_MESSAGE,
            ServerError::JsonResponse(_) | ServerError::Database(_) => {
                "Something went wrong. Please try again later."
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        error!(error = %self, %status, "Replying with error");

        let page = pages::error_page(status, self.public_message());
        (status, Html(page)).into_response()
    }
}
