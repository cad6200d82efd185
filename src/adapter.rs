//! The client adapter: form submissions in, HTTP round trips, text out.
//!
//! Each operation is a single request/response exchange followed by writes
//! to the injected display targets. Nothing is retried. Upload, delete and
//! ask each carry an in-flight flag; a second submission on the same form
//! while the first is outstanding is dropped with [`Submission::Busy`].

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::api::{Answer, HealthResponse, QueryRequest, StatsResponse};
use crate::error::ClientError;
use crate::transport::{Backend, UploadFile};
use crate::view::{Dialogs, Region, TextTarget};

pub const NOT_INITIALIZED_TEXT: &str =
    "RAG system not initialized. Upload documents to get started.";
pub const STATS_UNAVAILABLE_TEXT: &str = "Could not fetch stats";
pub const UPLOAD_DEFAULT_TEXT: &str = "Upload complete";
pub const DELETE_DEFAULT_TEXT: &str = "Deletion complete";
pub const DELETE_CONFIRM_TEXT: &str = "Are you sure you want to delete all documents?";
pub const NO_FILE_TEXT: &str = "Please select a file to upload.";
pub const HEALTH_UNAVAILABLE_TEXT: &str = "Could not reach backend";

/// What the stats panel shows after a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsDisplay {
    NotInitialized,
    Summary {
        status: String,
        documents: u64,
        chunks: u64,
    },
    Unavailable,
}

impl StatsDisplay {
    pub fn from_response(stats: &StatsResponse) -> Self {
        if !stats.is_initialized() {
            return StatsDisplay::NotInitialized;
        }
        StatsDisplay::Summary {
            status: stats.status.clone(),
            documents: stats.total_documents.unwrap_or(0),
            chunks: stats.total_chunks.unwrap_or(0),
        }
    }
}

impl fmt::Display for StatsDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsDisplay::NotInitialized => f.write_str(NOT_INITIALIZED_TEXT),
            StatsDisplay::Summary {
                status,
                documents,
                chunks,
            } => write!(f, "Status: {status} | Documents: {documents} | Chunks: {chunks}"),
            StatsDisplay::Unavailable => f.write_str(STATS_UNAVAILABLE_TEXT),
        }
    }
}

/// One `/stats` round trip: the panel text plus the body it was built from.
///
/// `response` is `None` when the fetch or decode failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub display: StatsDisplay,
    pub response: Option<StatsResponse>,
}

impl StatsSnapshot {
    /// Model lines that are not part of the panel text, in display order.
    pub fn details(&self) -> Vec<(&'static str, &str)> {
        let Some(stats) = &self.response else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        if let Some(model) = stats.model.as_deref() {
            lines.push(("model", model));
        }
        if let Some(embedding) = stats.embedding_model.as_deref() {
            lines.push(("embedding", embedding));
        }
        lines
    }
}

/// Result of a successful `/query` round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub answer: Answer,
    pub sources: Vec<String>,
}

/// How a form submission ended.
#[derive(Debug)]
pub enum Submission<T> {
    /// The round trip completed; carries what was shown to the user.
    Done(T),
    /// Transport or decode failure, already reported to the user.
    Failed(ClientError),
    /// The user refused the confirmation dialog. No request was made.
    Declined,
    /// The same form already has a request outstanding. No request was made.
    Busy,
    /// Upload submitted without a file. No request was made.
    MissingFile,
}

impl<T> Submission<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Submission::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Submission::Done(value) => Some(value),
            _ => None,
        }
    }

    /// True when the submission never reached the network.
    pub fn was_skipped(&self) -> bool {
        matches!(
            self,
            Submission::Declined | Submission::Busy | Submission::MissingFile
        )
    }
}

/// The three forms that submit requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Upload,
    Delete,
    Ask,
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Upload => write!(f, "upload"),
            Form::Delete => write!(f, "delete"),
            Form::Ask => write!(f, "ask"),
        }
    }
}

#[derive(Debug, Default)]
struct InFlight(AtomicBool);

impl InFlight {
    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Translates form submissions into backend calls and responses into text.
///
/// Built from a [`Backend`] plus the targets it writes to, so front-ends
/// (terminal, DOM) and tests only differ in what they inject.
pub struct ClientAdapter<B> {
    backend: B,
    stats_text: Box<dyn TextTarget>,
    answer_text: Box<dyn TextTarget>,
    answer_region: Box<dyn Region>,
    dialogs: Box<dyn Dialogs>,
    upload: InFlight,
    delete: InFlight,
    ask: InFlight,
}

impl<B: Backend> ClientAdapter<B> {
    pub fn new(
        backend: B,
        stats_text: impl TextTarget + 'static,
        answer_text: impl TextTarget + 'static,
        answer_region: impl Region + 'static,
        dialogs: impl Dialogs + 'static,
    ) -> Self {
        Self {
            backend,
            stats_text: Box::new(stats_text),
            answer_text: Box::new(answer_text),
            answer_region: Box::new(answer_region),
            dialogs: Box::new(dialogs),
            upload: InFlight::default(),
            delete: InFlight::default(),
            ask: InFlight::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_busy(&self, form: Form) -> bool {
        self.flag(form).is_busy()
    }

    fn flag(&self, form: Form) -> &InFlight {
        match form {
            Form::Upload => &self.upload,
            Form::Delete => &self.delete,
            Form::Ask => &self.ask,
        }
    }

    /// Initial stats fetch, run once the targets are attached.
    pub async fn start(&self) -> StatsDisplay {
        self.refresh_stats().await
    }

    /// Fetch `/stats` and overwrite the stats panel.
    pub async fn refresh_stats(&self) -> StatsDisplay {
        self.fetch_stats().await.display
    }

    /// Like [`refresh_stats`](Self::refresh_stats), but also hands back the
    /// decoded body so callers can show fields the panel leaves out without
    /// a second request.
    pub async fn fetch_stats(&self) -> StatsSnapshot {
        let snapshot = match self.backend.stats().await {
            Ok(stats) => StatsSnapshot {
                display: StatsDisplay::from_response(&stats),
                response: Some(stats),
            },
            Err(e) => {
                warn!(error = %e, "stats refresh failed");
                StatsSnapshot {
                    display: StatsDisplay::Unavailable,
                    response: None,
                }
            }
        };
        self.stats_text.set_text(&snapshot.display.to_string());
        snapshot
    }

    /// Post `file` to `/upload`, alert the outcome, then refresh stats.
    pub async fn submit_upload(&self, file: Option<UploadFile>) -> Submission<String> {
        self.submit_upload_from(async { Ok(file) }).await
    }

    /// Upload whatever `read` produces. The upload flag is taken before
    /// `read` is polled, so reading the file counts as part of the
    /// submission. A read error is alerted like a failed upload.
    pub async fn submit_upload_from<F>(&self, read: F) -> Submission<String>
    where
        F: Future<Output = Result<Option<UploadFile>, ClientError>>,
    {
        let Some(_guard) = self.upload.try_begin() else {
            debug!(form = %Form::Upload, "submission dropped, request in flight");
            return Submission::Busy;
        };
        let file = match read.await {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "reading upload failed");
                self.dialogs.alert(&format!("Upload error: {e}"));
                return Submission::Failed(e);
            }
        };
        let Some(file) = file else {
            self.dialogs.alert(NO_FILE_TEXT);
            return Submission::MissingFile;
        };

        match self.backend.upload(&file).await {
            Ok(resp) => {
                let message = resp.message_or(UPLOAD_DEFAULT_TEXT).to_string();
                self.dialogs.alert(&message);
                self.refresh_stats().await;
                Submission::Done(message)
            }
            Err(e) => {
                warn!(error = %e, file = %file.file_name, "upload failed");
                self.dialogs.alert(&format!("Upload error: {e}"));
                Submission::Failed(e)
            }
        }
    }

    /// Confirm, then post to `/delete`, alert the outcome and refresh stats.
    pub async fn submit_delete(&self) -> Submission<String> {
        let Some(_guard) = self.delete.try_begin() else {
            debug!(form = %Form::Delete, "submission dropped, request in flight");
            return Submission::Busy;
        };
        if !self.dialogs.confirm(DELETE_CONFIRM_TEXT) {
            debug!("deletion declined");
            return Submission::Declined;
        }

        match self.backend.delete_all().await {
            Ok(resp) => {
                let message = resp.message_or(DELETE_DEFAULT_TEXT).to_string();
                self.dialogs.alert(&message);
                self.refresh_stats().await;
                Submission::Done(message)
            }
            Err(e) => {
                warn!(error = %e, "delete failed");
                self.dialogs.alert(&format!("Deletion error: {e}"));
                Submission::Failed(e)
            }
        }
    }

    /// Post `question` to `/query` and write the answer (or the error)
    /// into the answer panel, which is revealed either way.
    pub async fn submit_query(&self, question: &str) -> Submission<QueryOutcome> {
        let Some(_guard) = self.ask.try_begin() else {
            debug!(form = %Form::Ask, "submission dropped, request in flight");
            return Submission::Busy;
        };

        let outcome = match self.backend.query(&QueryRequest::new(question)).await {
            Ok(resp) => {
                let answer = resp.answer();
                if answer.is_missing() {
                    debug!(detail = resp.detail.as_deref().unwrap_or(""), "query returned no answer");
                }
                self.answer_text.set_text(answer.text());
                Submission::Done(QueryOutcome {
                    answer,
                    sources: resp.sources,
                })
            }
            Err(e) => {
                warn!(error = %e, "query failed");
                self.answer_text.set_text(&format!("Error: {e}"));
                Submission::Failed(e)
            }
        };
        self.answer_region.show();
        outcome
    }

    /// Fetch `/health` and write a one-line summary into the stats panel.
    pub async fn check_health(&self) -> Result<HealthResponse, ClientError> {
        match self.backend.health().await {
            Ok(health) => {
                let initialized = if health.rag_initialized { "yes" } else { "no" };
                self.stats_text.set_text(&format!(
                    "Backend: {} | RAG initialized: {initialized}",
                    health.status
                ));
                Ok(health)
            }
            Err(e) => {
                warn!(error = %e, "health check failed");
                self.stats_text.set_text(HEALTH_UNAVAILABLE_TEXT);
                Err(e)
            }
        }
    }
}
