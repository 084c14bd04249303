#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MemoryStore, QuizRepository, RepositoryError, ResponseFilter, ResponseRepository};
use crate::quiz::{QuizDefinition, StudentResponse};

#[derive(Debug, Default, Serialize, Deserialize)]
/// On-disk layout of a [`JsonStore`].
pub struct StoreDocument {
    /// Every quiz.
    #[serde(default)]
    pub quizzes:   Vec<QuizDefinition>,
    /// Every response.
    #[serde(default)]
    pub responses: Vec<StudentResponse>,
}

/// A store backed by one JSON document of the form
/// `{ "quizzes": [...], "responses": [...] }`.
///
/// The document is read once by [`JsonStore::open`]; saves go to memory and
/// reach the file on [`JsonStore::flush`].
#[derive(Debug)]
pub struct JsonStore {
    /// Location of the document.
    path:   PathBuf,
    /// Working copy.
    inner:  MemoryStore,
    /// Write count at the last flush.
    synced: AtomicUsize,
}

impl JsonStore {
    /// Opens the document at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| RepositoryError::Io {
                path: path.clone(),
                source,
            })?;
        let document: StoreDocument = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            quizzes = document.quizzes.len(),
            responses = document.responses.len(),
            "opened JSON store"
        );

        Ok(Self {
            path,
            inner: MemoryStore::from_records(document.quizzes, document.responses),
            synced: AtomicUsize::new(0),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory working copy.
    pub fn records(&self) -> &MemoryStore {
        &self.inner
    }

    /// Writes the working copy back if anything was saved since the last
    /// flush. The document is replaced atomically through a sibling temp file.
    /// Returns whether the file was rewritten.
    pub async fn flush(&self) -> Result<bool, RepositoryError> {
        let writes = self.inner.writes();
        if writes == self.synced.load(Ordering::Acquire) {
            return Ok(false);
        }

        let (quizzes, responses) = self.inner.snapshot();
        let body = serde_json::to_vec_pretty(&StoreDocument { quizzes, responses })?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store.json".to_string());
        let temp = self
            .path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| RepositoryError::Io { path, source }
        };

        tokio::fs::write(&temp, body)
            .await
            .map_err(io_err(&temp))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(io_err(&self.path))?;

        self.synced.store(writes, Ordering::Release);
        tracing::info!(path = %self.path.display(), "flushed JSON store");
        Ok(true)
    }
}

impl QuizRepository for JsonStore {
    async fn get_by_id(&self, quiz_id: &str) -> Result<Option<QuizDefinition>, RepositoryError> {
        QuizRepository::get_by_id(&self.inner, quiz_id).await
    }
}

impl ResponseRepository for JsonStore {
    fn find(
        &self,
        filter: &ResponseFilter,
    ) -> BoxStream<'_, Result<StudentResponse, RepositoryError>> {
        self.inner.find(filter)
    }

    async fn get_by_id(
        &self,
        response_id: &str,
    ) -> Result<Option<StudentResponse>, RepositoryError> {
        ResponseRepository::get_by_id(&self.inner, response_id).await
    }

    async fn save(&self, response: &StudentResponse) -> Result<(), RepositoryError> {
        self.inner.save(response).await
    }
}
