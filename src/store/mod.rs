#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Repository interfaces the grading core reads from and writes to, and two
//! adapters: an in-memory store and a JSON document store.

/// A store persisted as a single JSON document.
pub mod json;
/// An in-memory store.
pub mod memory;

use std::{future::Future, path::PathBuf, sync::Arc};

use futures::stream::BoxStream;

pub use self::{json::JsonStore, memory::MemoryStore};
use crate::quiz::{QuizDefinition, StudentResponse};

/// Errors raised by repository adapters.
#[derive(thiserror::Error, Debug)]
pub enum RepositoryError {
    /// A record disappeared between being listed and being read.
    #[error("record `{0}` no longer exists")]
    NotFound(String),
    /// Reading or writing the backing file failed.
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        /// The file being accessed.
        path:   PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The backing document could not be encoded or decoded.
    #[error("could not encode or decode the store document: {0}")]
    Serde(#[from] serde_json::Error),
    /// The store refused the write.
    #[error("write to `{0}` was rejected")]
    Rejected(String),
    /// Any other failure of a backing service. Adapters over databases or
    /// remote stores map their driver errors here.
    #[error("{0}")]
    Backend(String),
}

/// Read access to quiz definitions.
pub trait QuizRepository: Send + Sync {
    /// Loads a quiz by id, `None` when it does not exist.
    fn get_by_id(
        &self,
        quiz_id: &str,
    ) -> impl Future<Output = Result<Option<QuizDefinition>, RepositoryError>> + Send;
}

/// Read and write access to student responses.
pub trait ResponseRepository: Send + Sync {
    /// Streams every response matching `filter`.
    fn find(&self, filter: &ResponseFilter)
    -> BoxStream<'_, Result<StudentResponse, RepositoryError>>;

    /// Loads a response by id, `None` when it does not exist.
    fn get_by_id(
        &self,
        response_id: &str,
    ) -> impl Future<Output = Result<Option<StudentResponse>, RepositoryError>> + Send;

    /// Replaces the stored response with the same id.
    fn save(
        &self,
        response: &StudentResponse,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

impl<T: QuizRepository> QuizRepository for Arc<T> {
    fn get_by_id(
        &self,
        quiz_id: &str,
    ) -> impl Future<Output = Result<Option<QuizDefinition>, RepositoryError>> + Send {
        QuizRepository::get_by_id(&**self, quiz_id)
    }
}

impl<T: ResponseRepository> ResponseRepository for Arc<T> {
    fn find(
        &self,
        filter: &ResponseFilter,
    ) -> BoxStream<'_, Result<StudentResponse, RepositoryError>> {
        (**self).find(filter)
    }

    fn get_by_id(
        &self,
        response_id: &str,
    ) -> impl Future<Output = Result<Option<StudentResponse>, RepositoryError>> + Send {
        ResponseRepository::get_by_id(&**self, response_id)
    }

    fn save(
        &self,
        response: &StudentResponse,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        (**self).save(response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Selects which stored responses a backfill visits. The default selects
/// everything.
pub struct ResponseFilter {
    /// Only responses to this quiz.
    quiz_id:       Option<String>,
    /// Only responses by this student.
    student_id:    Option<String>,
    /// Only these responses.
    response_ids:  Vec<String>,
    /// Only responses that carry no derived grading state yet.
    ungraded_only: bool,
}

impl ResponseFilter {
    /// A filter matching every response.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to responses for `quiz_id`.
    pub fn for_quiz(mut self, quiz_id: impl Into<String>) -> Self {
        self.quiz_id = Some(quiz_id.into());
        self
    }

    /// Restricts to responses by `student_id`.
    pub fn for_student(mut self, student_id: impl Into<String>) -> Self {
        self.student_id = Some(student_id.into());
        self
    }

    /// Restricts to the listed response ids. Calling this repeatedly widens
    /// the list.
    pub fn with_responses<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.response_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Restricts to responses that were never graded.
    pub fn ungraded_only(mut self) -> Self {
        self.ungraded_only = true;
        self
    }

    /// Whether `response` is selected by this filter.
    pub fn matches(&self, response: &StudentResponse) -> bool {
        self.quiz_id.as_ref().is_none_or(|id| *id == response.quiz_id)
            && self
                .student_id
                .as_ref()
                .is_none_or(|id| *id == response.student_id)
            && (self.response_ids.is_empty() || self.response_ids.contains(&response.id))
            && !(self.ungraded_only && response.is_graded())
    }
}
