use crate::server::{
    ServerRouter,
    json::Json,
    pages::{self, Banner},
    routes::{ListPath, load_failure},
    submission::Submission,
};
use axum::{
    extract::{
        Form, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
};
use axum_extra::routing::{RouterExt, TypedPath};
use noticeboard_common::{
    model::{
        Id,
        post::{CreatePost, PostMarker, PostValidationError},
    },
    spam::SpamPolicy,
};
use noticeboard_db::client::DbClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::UtcDateTime;
use tracing::{debug, error, info};

const CREATED_MESSAGE: &str = "Post created successfully!";
const STORAGE_FAILURE_MESSAGE: &str = "Database error occurred. Please try again later.";
const WRONG_METHOD_MESSAGE: &str = "Invalid request method.";
const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(list_posts).route(
        CreatePostPath::PATH,
        post(create_post).fallback(create_post_wrong_method),
    )
}

#[derive(TypedPath, Copy, Clone, Debug)]
#[typed_path("/create_post")]
pub(crate) struct CreatePostPath;

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct CreatePostForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
struct PostListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Status object returned to background submissions, always with `200 OK`.
#[derive(Clone, Eq, PartialEq, Debug, Serialize)]
struct CreatePostResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    post_id: Option<Id<PostMarker>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
enum PostOutcome {
    Created(Id<PostMarker>),
    Invalid(Vec<PostValidationError>),
    StorageFailed,
}

impl PostListQuery {
    fn success(message: &str) -> Self {
        Self {
            success: Some("1".to_owned()),
            message: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn error(message: &str) -> Self {
        Self {
            error: Some("1".to_owned()),
            message: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn redirect(&self) -> Redirect {
        let uri = ListPath.with_query_params(self).to_uri();
        Redirect::to(&uri.to_string())
    }

    fn banners(&self) -> Vec<Banner> {
        let is_set = |flag: &Option<String>| flag.as_deref() == Some("1");

        let mut banners = Vec::new();
        if is_set(&self.success) {
            banners.push(Banner::success(
                self.message.as_deref().unwrap_or(CREATED_MESSAGE),
            ));
        }
        if is_set(&self.error) {
            banners.push(Banner::error(
                self.message.as_deref().unwrap_or(DEFAULT_ERROR_MESSAGE),
            ));
        }
        banners
    }
}

impl PostOutcome {
    fn message(&self) -> String {
        match self {
            PostOutcome::Created(_) => CREATED_MESSAGE.to_owned(),
            PostOutcome::Invalid(errors) => errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
            PostOutcome::StorageFailed => STORAGE_FAILURE_MESSAGE.to_owned(),
        }
    }

    fn respond(self, submission: Submission) -> Response {
        let message = self.message();

        match submission {
            Submission::Form => {
                let query = match self {
                    PostOutcome::Created(_) => PostListQuery::success(&message),
                    PostOutcome::Invalid(_) | PostOutcome::StorageFailed => {
                        PostListQuery::error(&message)
                    }
                };
                query.redirect().into_response()
            }
            Submission::Async => {
                let response = match self {
                    PostOutcome::Created(id) => CreatePostResponse {
                        success: true,
                        message,
                        post_id: Some(id),
                        errors: None,
                    },
                    PostOutcome::Invalid(errors) => CreatePostResponse {
                        success: false,
                        message,
                        post_id: None,
                        errors: Some(errors.iter().map(ToString::to_string).collect()),
                    },
                    PostOutcome::StorageFailed => CreatePostResponse {
                        success: false,
                        message,
                        post_id: None,
                        errors: None,
                    },
                };
                Json(response).into_response()
            }
        }
    }
}

async fn list_posts(
    ListPath: ListPath,
    State(db): State<Arc<DbClient>>,
    query: Result<Query<PostListQuery>, QueryRejection>,
) -> (StatusCode, Html<String>) {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let mut banners = query.banners();

    let (status, posts) = match db.fetch_posts().await {
        Ok(posts) => (StatusCode::OK, posts),
        Err(err) => {
            let (status, banner) = load_failure(err, "posts");
            banners.push(banner);
            (status, Vec::new())
        }
    };

    let page = pages::posts::render(&posts, &banners, UtcDateTime::now());
    (status, Html(page))
}

async fn create_post(
    State(db): State<Arc<DbClient>>,
    State(spam_policy): State<Arc<SpamPolicy>>,
    submission: Submission,
    form: Result<Form<CreatePostForm>, FormRejection>,
) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
        debug!(%rejection, "Create post form rejected");
        CreatePostForm::default()
    });

    let outcome = match CreatePost::validate(&form.title, &form.content, &spam_policy) {
        Err(errors) => {
            debug!(?errors, "Post failed validation");
            PostOutcome::Invalid(errors)
        }
        Ok(post) => match db.create_post(&post).await {
            Ok(id) => {
                info!(%id, "Post created");
                PostOutcome::Created(id)
            }
            Err(err) => {
                error!(error = %err, "Creating post failed");
                PostOutcome::StorageFailed
            }
        },
    };

    outcome.respond(submission)
}

async fn create_post_wrong_method() -> Redirect {
    PostListQuery::error(WRONG_METHOD_MESSAGE).redirect()
}
