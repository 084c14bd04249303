#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::{BTreeMap, HashSet},
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::{
    StreamExt,
    stream::{self, BoxStream},
};

use super::{QuizRepository, RepositoryError, ResponseFilter, ResponseRepository};
use crate::quiz::{QuizDefinition, StudentResponse};

/// Quizzes and responses held in memory, keyed by id. Listing is in id order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Quizzes by id.
    quizzes:       RwLock<BTreeMap<String, QuizDefinition>>,
    /// Responses by id.
    responses:     RwLock<BTreeMap<String, StudentResponse>>,
    /// Response ids whose saves are rejected.
    reject_saves:  RwLock<HashSet<String>>,
    /// Number of successful saves.
    writes:        AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `quizzes` and `responses`.
    pub fn from_records(
        quizzes: impl IntoIterator<Item = QuizDefinition>,
        responses: impl IntoIterator<Item = StudentResponse>,
    ) -> Self {
        let store = Self::new();
        for quiz in quizzes {
            store.put_quiz(quiz);
        }
        for response in responses {
            store.put_response(response);
        }
        store
    }

    /// Inserts or replaces a quiz.
    pub fn put_quiz(&self, quiz: QuizDefinition) {
        self.quizzes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(quiz.id.clone(), quiz);
    }

    /// Deletes a quiz, returning it if it existed.
    pub fn remove_quiz(&self, quiz_id: &str) -> Option<QuizDefinition> {
        self.quizzes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(quiz_id)
    }

    /// Inserts or replaces a response without counting it as a write.
    pub fn put_response(&self, response: StudentResponse) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(response.id.clone(), response);
    }

    /// Returns a copy of a stored response.
    pub fn response(&self, response_id: &str) -> Option<StudentResponse> {
        self.responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(response_id)
            .cloned()
    }

    /// Makes every later save of `response_id` fail.
    pub fn reject_saves_for(&self, response_id: impl Into<String>) {
        self.reject_saves
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(response_id.into());
    }

    /// Number of saves that went through.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Copies out every quiz and response, in id order.
    pub fn snapshot(&self) -> (Vec<QuizDefinition>, Vec<StudentResponse>) {
        let quizzes = self
            .quizzes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        let responses = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        (quizzes, responses)
    }
}

impl QuizRepository for MemoryStore {
    async fn get_by_id(&self, quiz_id: &str) -> Result<Option<QuizDefinition>, RepositoryError> {
        Ok(self
            .quizzes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(quiz_id)
            .cloned())
    }
}

impl ResponseRepository for MemoryStore {
    fn find(
        &self,
        filter: &ResponseFilter,
    ) -> BoxStream<'_, Result<StudentResponse, RepositoryError>> {
        let matching: Vec<_> = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|response| filter.matches(response))
            .cloned()
            .map(Ok)
            .collect();
        stream::iter(matching).boxed()
    }

    async fn get_by_id(
        &self,
        response_id: &str,
    ) -> Result<Option<StudentResponse>, RepositoryError> {
        Ok(self.response(response_id))
    }

    async fn save(&self, response: &StudentResponse) -> Result<(), RepositoryError> {
        if self
            .reject_saves
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&response.id)
        {
            return Err(RepositoryError::Rejected(response.id.clone()));
        }

        self.put_response(response.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
