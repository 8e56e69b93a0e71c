use noticeboard_common::model::{
    ModelValidationError,
    post::{Post, PostContent, PostTitle},
    task::{Task, TaskText},
};
use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct TaskRecord {
    pub id: i64,
    pub task: String,
    pub created_at: PrimitiveDateTime,
}

#[derive(Clone, Eq, PartialEq, Debug, Hash, FromRow)]
pub(crate) struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: PrimitiveDateTime,
}

impl TryFrom<TaskRecord> for Task {
    type Error = ModelValidationError;

    fn try_from(value: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            text: TaskText::new(&value.task)?,
            created_at: value.created_at.as_utc(),
        })
    }
}

impl TryFrom<PostRecord> for Post {
    type Error = ModelValidationError;

    fn try_from(value: PostRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            title: PostTitle::new(&value.title)?,
            content: PostContent::new(&value.content)?,
            created_at: value.created_at.as_utc(),
        })
    }
}
