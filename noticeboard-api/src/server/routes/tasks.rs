use crate::server::{
    ServerRouter,
    pages::{self, Banner},
    routes::{ListPath, load_failure},
};
use axum::{
    extract::{
        Form, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{Html, Redirect},
    routing::post,
};
use axum_extra::routing::{RouterExt, TypedPath};
use noticeboard_common::model::{
    Id,
    task::{TaskMarker, TaskText},
};
use noticeboard_db::client::DbClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::UtcDateTime;
use tracing::{debug, error, info};

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_tasks)
        .route(
            AddTaskPath::PATH,
            post(add_task).fallback(add_task_wrong_method),
        )
        .typed_get(delete_task)
}

#[derive(TypedPath, Copy, Clone, Debug)]
#[typed_path("/add")]
pub(crate) struct AddTaskPath;

#[derive(TypedPath, Copy, Clone, Debug)]
#[typed_path("/delete")]
pub(crate) struct DeleteTaskPath;

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
pub(crate) struct DeleteTaskQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize)]
struct AddTaskForm {
    #[serde(default)]
    task: String,
}

/// Banner selection on the list view. Values are kept as text so that
/// malformed parameters are ignored instead of failing the page.
#[derive(Clone, Eq, PartialEq, Debug, Default, Deserialize, Serialize)]
struct TaskListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deleted: Option<String>,
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
enum TaskFailure {
    AddFailed,
    MissingTask,
    DeleteFailed,
    InvalidId,
}

/// Result of a mutating request, carried to the list view through the redirect.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
enum TaskOutcome {
    Added,
    Deleted,
    Failed(TaskFailure),
}

impl TaskFailure {
    fn code(self) -> u8 {
        match self {
            TaskFailure::AddFailed => 1,
            TaskFailure::MissingTask => 2,
            TaskFailure::DeleteFailed => 3,
            TaskFailure::InvalidId => 4,
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(TaskFailure::AddFailed),
            "2" => Some(TaskFailure::MissingTask),
            "3" => Some(TaskFailure::DeleteFailed),
            "4" => Some(TaskFailure::InvalidId),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            TaskFailure::AddFailed => "Failed to add task. Please try again later.",
            TaskFailure::MissingTask => "Please enter a task.",
            TaskFailure::DeleteFailed => "Failed to delete task. Please try again later.",
            TaskFailure::InvalidId => "Invalid task id.",
        }
    }
}

impl TaskOutcome {
    fn query(self) -> TaskListQuery {
        let flag = Some("1".to_owned());
        match self {
            TaskOutcome::Added => TaskListQuery {
                success: flag,
                ..TaskListQuery::default()
            },
            TaskOutcome::Deleted => TaskListQuery {
                deleted: flag,
                ..TaskListQuery::default()
            },
            TaskOutcome::Failed(failure) => TaskListQuery {
                error: Some(failure.code().to_string()),
                ..TaskListQuery::default()
            },
        }
    }

    fn redirect(self) -> Redirect {
        let uri = ListPath.with_query_params(self.query()).to_uri();
        Redirect::to(&uri.to_string())
    }
}

impl TaskListQuery {
    fn banner(&self) -> Option<Banner> {
        let is_set = |flag: &Option<String>| flag.as_deref() == Some("1");

        if let Some(failure) = self.error.as_deref().and_then(TaskFailure::from_code) {
            Some(Banner::error(failure.message()))
        } else if is_set(&self.success) {
            Some(Banner::success("Task added successfully!"))
        } else if is_set(&self.deleted) {
            Some(Banner::success("Task deleted successfully!"))
        } else {
            None
        }
    }
}

async fn list_tasks(
    ListPath: ListPath,
    State(db): State<Arc<DbClient>>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> (StatusCode, Html<String>) {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let mut banners: Vec<Banner> = query.banner().into_iter().collect();

    let (status, tasks) = match db.fetch_tasks().await {
        Ok(tasks) => (StatusCode::OK, tasks),
        Err(err) => {
            let (status, banner) = load_failure(err, "tasks");
            banners.push(banner);
            (status, Vec::new())
        }
    };

    let page = pages::tasks::render(&tasks, &banners, UtcDateTime::now());
    (status, Html(page))
}

async fn add_task(
    State(db): State<Arc<DbClient>>,
    form: Result<Form<AddTaskForm>, FormRejection>,
) -> Redirect {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!(%rejection, "Add task form rejected");
            return TaskOutcome::Failed(TaskFailure::MissingTask).redirect();
        }
    };

    let Ok(text) = TaskText::new(&form.task) else {
        debug!("Add task form had no task text");
        return TaskOutcome::Failed(TaskFailure::MissingTask).redirect();
    };

    match db.create_task(&text).await {
        Ok(id) => {
            info!(%id, "Task added");
            TaskOutcome::Added.redirect()
        }
        Err(err) => {
            error!(error = %err, "Adding task failed");
            TaskOutcome::Failed(TaskFailure::AddFailed).redirect()
        }
    }
}

async fn add_task_wrong_method() -> Redirect {
    TaskOutcome::Failed(TaskFailure::MissingTask).redirect()
}

async fn delete_task(
    DeleteTaskPath: DeleteTaskPath,
    State(db): State<Arc<DbClient>>,
    query: Result<Query<DeleteTaskQuery>, QueryRejection>,
) -> Redirect {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            debug!(%rejection, "Delete query rejected");
            return TaskOutcome::Failed(TaskFailure::InvalidId).redirect();
        }
    };

    let id = match query.id.as_deref().map(str::parse::<Id<TaskMarker>>) {
        Some(Ok(id)) => id,
        Some(Err(err)) => {
            debug!(error = %err, "Delete request had an invalid id");
            return TaskOutcome::Failed(TaskFailure::InvalidId).redirect();
        }
        None => {
            debug!("Delete request had no id");
            return TaskOutcome::Failed(TaskFailure::InvalidId).redirect();
        }
    };

    match db.delete_task(id).await {
        Ok(deleted) => {
            info!(%id, deleted, "Task deleted");
            TaskOutcome::Deleted.redirect()
        }
        Err(err) => {
            error!(error = %err, %id, "Deleting task failed");
            TaskOutcome::Failed(TaskFailure::DeleteFailed).redirect()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::{
        AppKind,
        pages::{BannerKind, CONNECTION_FAILURE_MESSAGE},
        routes::tasks::{TaskFailure, TaskListQuery, TaskOutcome},
        test_support::{body_string, form_post, location, send, send_to, state_with},
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use noticeboard_db::client::DbClient;
    use sqlx::PgPool;

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn outcome_locations() {
        let location_of = |outcome: TaskOutcome| {
            let response = axum::response::IntoResponse::into_response(outcome.redirect());
            response.headers()["location"].to_str().unwrap().to_owned()
        };

        assert_eq!(location_of(TaskOutcome::Added), "/?success=1");
        assert_eq!(location_of(TaskOutcome::Deleted), "/?deleted=1");
        assert_eq!(
            location_of(TaskOutcome::Failed(TaskFailure::AddFailed)),
            "/?error=1"
        );
        assert_eq!(
            location_of(TaskOutcome::Failed(TaskFailure::MissingTask)),
            "/?error=2"
        );
        assert_eq!(
            location_of(TaskOutcome::Failed(TaskFailure::DeleteFailed)),
            "/?error=3"
        );
        assert_eq!(
            location_of(TaskOutcome::Failed(TaskFailure::InvalidId)),
            "/?error=4"
        );
    }

    #[test]
    fn banner_selection() {
        let query = |success: Option<&str>, error: Option<&str>, deleted: Option<&str>| {
            TaskListQuery {
                success: success.map(str::to_owned),
                error: error.map(str::to_owned),
                deleted: deleted.map(str::to_owned),
            }
        };

        assert_eq!(TaskListQuery::default().banner(), None);
        assert_eq!(query(None, Some("9"), None).banner(), None);
        assert_eq!(query(Some("yes"), None, None).banner(), None);

        let banner = query(Some("1"), None, None).banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.message, "Task added successfully!");

        let banner = query(None, None, Some("1")).banner().unwrap();
        assert_eq!(banner.message, "Task deleted successfully!");

        let banner = query(Some("1"), Some("3"), None).banner().unwrap();
        assert_eq!(banner.kind, BannerKind::Error);
        assert_eq!(
            banner.message,
            "Failed to delete task. Please try again later."
        );
    }

    #[tokio::test]
    async fn add_without_text_never_reaches_storage() {
        for body in ["task=", "task=+++%09", "", "other=value"] {
            let response = send(AppKind::Todo, form_post("/add", body)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/?error=2", "body {body:?}");
        }
    }

    #[tokio::test]
    async fn add_requires_post() {
        let response = send(AppKind::Todo, get("/add")).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/?error=2");
    }

    #[tokio::test]
    async fn delete_rejects_invalid_ids() {
        for uri in [
            "/delete",
            "/delete?id=",
            "/delete?id=abc",
            "/delete?id=-1",
            "/delete?id=1.5",
            "/delete?id=99999999999999999999",
            "/delete?id=1&id=2",
        ] {
            let response = send(AppKind::Todo, get(uri)).await;
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/?error=4", "uri {uri}");
        }
    }

    #[tokio::test]
    async fn storage_failures_have_their_own_codes() {
        let response = send(AppKind::Todo, form_post("/add", "task=water+plants")).await;
        assert_eq!(location(&response), "/?error=1");

        let response = send(AppKind::Todo, get("/delete?id=5")).await;
        assert_eq!(location(&response), "/?error=3");
    }

    #[tokio::test]
    async fn list_survives_storage_failure() {
        let response = send(AppKind::Todo, get("/?error=2")).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = body_string(response).await;
        assert!(body.contains("Please enter a task."));
        assert!(body.contains(CONNECTION_FAILURE_MESSAGE));
        assert!(body.contains("No tasks yet!"));
        assert!(!body.to_lowercase().contains("pool"));
    }

    #[sqlx::test(migrations = "../noticeboard-db/migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn added_task_is_listed_escaped(pool: PgPool) {
        let state = state_with(DbClient::from(pool));

        let body = "task=+%3Cb%3Ewater%3C%2Fb%3E+plants+";
        let response = send_to(state.clone(), AppKind::Todo, form_post("/add", body)).await;
        assert_eq!(location(&response), "/?success=1");

        let response = send_to(state, AppKind::Todo, get("/?success=1")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_string(response).await;
        assert!(body.contains("Task added successfully!"));
        assert!(body.contains("&lt;b&gt;water&lt;/b&gt; plants"));
        assert!(!body.contains("<b>water"));
        assert!(!body.contains("No tasks yet!"));
    }

    #[sqlx::test(migrations = "../noticeboard-db/migrations")]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn deleting_missing_task_still_succeeds(pool: PgPool) {
        let state = state_with(DbClient::from(pool));

        for _ in 0..2 {
            let response = send_to(state.clone(), AppKind::Todo, get("/delete?id=999")).await;
            assert_eq!(location(&response), "/?deleted=1");
        }
    }
}
