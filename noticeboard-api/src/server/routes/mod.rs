use crate::server::{
    AppKind, ServerError, ServerRouter,
    pages::{Banner, CONNECTION_FAILURE_MESSAGE},
};
use axum::http::StatusCode;
use axum_extra::routing::TypedPath;
use noticeboard_db::client::DbError;
use tracing::error;

pub(crate) mod posts;
pub(crate) mod tasks;

/// The list view, which is also where every form submission redirects to.
#[derive(TypedPath, Copy, Clone, Debug)]
#[typed_path("/")]
pub(crate) struct ListPath;

pub fn routes(app_kind: AppKind) -> ServerRouter {
    match app_kind {
        AppKind::Todo => tasks::routes(),
        AppKind::Blog => posts::routes(),
    }
}

/// Logs a failed list query and picks the status and banner the page is rendered with.
fn load_failure(err: DbError, what: &str) -> (StatusCode, Banner) {
    let message = if err.is_connection() {
        CONNECTION_FAILURE_MESSAGE.to_owned()
    } else {
        format!("Sorry, there was an error loading the {what}.")
    };

    let err = ServerError::from(err);
    let status = err.status();
    error!(error = %err, %status, "Loading {what} failed");

    (status, Banner::error(message))
}
