pub mod post;
pub mod task;

use crate::model::{post::PostValidationError, task::InvalidTaskTextError};
use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt::Display, marker::PhantomData, num::ParseIntError, str::FromStr};
use thiserror::Error;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    TaskText(#[from] InvalidTaskTextError),
    #[error(transparent)]
    Post(#[from] PostValidationError),
}

/// Row identifier assigned by the database, tagged with the kind of row it belongs to.
#[derive_where(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<Marker>(i64, #[serde(skip)] PhantomData<Marker>);

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum InvalidIdError {
    #[error("Id is not an integer: {0}")]
    NotAnInteger(#[from] ParseIntError),
    #[error("Id is negative: {0}")]
    Negative(i64),
}

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id, PhantomData)
    }

    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<i64> for Id<Marker> {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Removes NUL characters, which text columns cannot store.
pub(crate) fn strip_nul(text: &str) -> Cow<'_, str> {
    if text.contains('\0') {
        Cow::Owned(text.replace('\0', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// Accepts only non-negative decimal integers that fit the storage id range.
impl<Marker> FromStr for Id<Marker> {
    type Err = InvalidIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = i64::from_str(s)?;
        if id < 0 {
            return Err(InvalidIdError::Negative(id));
        }

        Ok(Self::new(id))
    }
}
