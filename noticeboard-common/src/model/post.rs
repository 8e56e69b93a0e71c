use crate::{
    model::{Id, strip_nul},
    spam::SpamPolicy,
    text,
};
use thiserror::Error;
use time::UtcDateTime;

pub const POST_TITLE_MAX_LEN: usize = 255;
pub const POST_CONTENT_MAX_LEN: usize = 10_000;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: PostTitle,
    pub content: PostContent,
    pub created_at: UtcDateTime,
}

/// A post that passed validation and may be inserted.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct CreatePost {
    pub title: PostTitle,
    pub content: PostContent,
}

/// Trimmed, non-empty title of at most [`POST_TITLE_MAX_LEN`] characters.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct PostTitle(String);

/// Trimmed, non-empty body of at most [`POST_CONTENT_MAX_LEN`] characters.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct PostContent(String);

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Error)]
pub enum PostValidationError {
    #[error("Post title is required.")]
    TitleMissing,
    #[error("Post title must be at most 255 characters.")]
    TitleTooLong,
    #[error("Post content is required.")]
    ContentMissing,
    #[error("Post content must be at most 10,000 characters.")]
    ContentTooLong,
    #[error("Post content appears to contain spam. Please review and try again.")]
    Spam,
}

impl PostTitle {
    pub fn new(title: &str) -> Result<Self, PostValidationError> {
        let title = strip_nul(title);
        let trimmed = title.trim();
        if trimmed.is_empty() {
            Err(PostValidationError::TitleMissing)
        } else if trimmed.chars().count() > POST_TITLE_MAX_LEN {
            Err(PostValidationError::TitleTooLong)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }
}

impl PostContent {
    pub fn new(content: &str) -> Result<Self, PostValidationError> {
        let content = strip_nul(content);
        let trimmed = content.trim();
        if trimmed.is_empty() {
            Err(PostValidationError::ContentMissing)
        } else if trimmed.chars().count() > POST_CONTENT_MAX_LEN {
            Err(PostValidationError::ContentTooLong)
        } else {
            Ok(Self(trimmed.to_owned()))
        }
    }

    #[must_use]
    pub fn get(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        text::word_count(&self.0)
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn reading_time_minutes(&self) -> usize {
        text::reading_time_minutes(self.word_count())
    }

    /// The leading [`text::PREVIEW_WORDS`] words, if the body is longer than that.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        text::preview(&self.0, text::PREVIEW_WORDS)
    }
}

impl CreatePost {
    /// Checks every field and reports all problems at once.
    pub fn validate(
        title: &str,
        content: &str,
        spam_policy: &SpamPolicy,
    ) -> Result<Self, Vec<PostValidationError>> {
        let title = PostTitle::new(title);
        let content_result = PostContent::new(content);
        let spam = spam_policy.is_spam(content);

        match (title, content_result, spam) {
            (Ok(title), Ok(content), false) => Ok(Self { title, content }),
            (title, content, spam) => {
                let errors = [title.err(), content.err()]
                    .into_iter()
                    .flatten()
                    .chain(spam.then_some(PostValidationError::Spam))
                    .collect();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::post::{CreatePost, PostContent, PostTitle, PostValidationError},
        spam::SpamPolicy,
    };

    #[test]
    fn title_limits() {
        assert_eq!(PostTitle::new("  Hello World  ").unwrap().get(), "Hello World");
        assert!(PostTitle::new(&"a".repeat(255)).is_ok());
        assert!(PostTitle::new(&format!("  {}  ", "a".repeat(255))).is_ok());
        // Limit counts characters, not bytes.
        assert!(PostTitle::new(&"ä".repeat(255)).is_ok());

        assert_eq!(
            PostTitle::new(&"a".repeat(256)),
            Err(PostValidationError::TitleTooLong)
        );
        assert_eq!(PostTitle::new(" \n "), Err(PostValidationError::TitleMissing));
    }

    #[test]
    fn content_limits() {
        assert!(PostContent::new(&"x".repeat(10_000)).is_ok());
        assert_eq!(
            PostContent::new(&"x".repeat(10_001)),
            Err(PostValidationError::ContentTooLong)
        );
        assert_eq!(PostContent::new(""), Err(PostValidationError::ContentMissing));
    }

    #[test]
    fn validate_collects_all_errors() {
        let policy = SpamPolicy::default();

        let errors = CreatePost::validate("", "   ", &policy).unwrap_err();
        assert_eq!(
            errors,
            [
                PostValidationError::TitleMissing,
                PostValidationError::ContentMissing
            ]
        );

        let spam = "see http://a.com and https://b.net or www.c.org";
        let errors = CreatePost::validate(&"t".repeat(300), spam, &policy).unwrap_err();
        assert_eq!(
            errors,
            [PostValidationError::TitleTooLong, PostValidationError::Spam]
        );
    }

    #[test]
    fn nul_characters_are_dropped() {
        let post = CreatePost::validate("t\0", "a\0b", &SpamPolicy::default()).unwrap();
        assert_eq!(post.title.get(), "t");
        assert_eq!(post.content.get(), "ab");

        let errors = CreatePost::validate("\0", "\0 \0", &SpamPolicy::default()).unwrap_err();
        assert_eq!(
            errors,
            [
                PostValidationError::TitleMissing,
                PostValidationError::ContentMissing
            ]
        );
    }

    #[test]
    fn validate_accepts_valid_post() {
        let post =
            CreatePost::validate(" Hello World ", "A short post.\n", &SpamPolicy::default())
                .unwrap();
        assert_eq!(post.title.get(), "Hello World");
        assert_eq!(post.content.get(), "A short post.");
        assert_eq!(post.content.reading_time_minutes(), 1);
        assert_eq!(post.content.word_count(), 3);
        assert_eq!(post.content.preview(), None);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            PostValidationError::TitleTooLong.to_string(),
            "Post title must be at most 255 characters."
        );
        assert_eq!(
            PostValidationError::Spam.to_string(),
            "Post content appears to contain spam. Please review and try again."
        );
    }
}
