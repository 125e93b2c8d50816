use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, ClientError};
use crate::models::{Artifact, Mode};
use crate::services::{CredentialStore, QuoteService};

// Message for a finished load
pub struct LoadResult {
    pub load_id: u64,
    pub outcome: LoadOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Artifact),
    Failed {
        message: String,
        missing_credential: bool,
    },
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum QuoteStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Artifact),
    Failed {
        message: String,
        missing_credential: bool,
    },
}

struct PendingLoad {
    id: u64,
    cancel: CancellationToken,
}

/// Front-end state around [`QuoteService`].
///
/// Only one load is tracked at a time: starting a new one cancels the
/// previous load, and results from superseded loads are dropped.
pub struct App {
    pub status: QuoteStatus,
    pub has_api_key: Option<bool>,

    pending: Option<PendingLoad>,
    next_load_id: u64,
    result_rx: mpsc::UnboundedReceiver<LoadResult>,
    result_tx: mpsc::UnboundedSender<LoadResult>,

    // Services
    service: Arc<QuoteService>,
    credentials: Arc<dyn CredentialStore>,
}

impl App {
    pub fn new(service: Arc<QuoteService>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (result_tx, result_rx) = mpsc::unbounded_channel();

        Self {
            status: QuoteStatus::Idle,
            has_api_key: None,
            pending: None,
            next_load_id: 0,
            result_rx,
            result_tx,
            service,
            credentials,
        }
    }

    pub fn refresh_has_api_key(&mut self) {
        self.has_api_key = Some(self.credentials.has_credential());
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Token of the load in flight, for callers that cancel from elsewhere (e.g. Ctrl-C).
    pub fn cancel_handle(&self) -> Option<CancellationToken> {
        self.pending.as_ref().map(|p| p.cancel.clone())
    }

    pub fn start_load(&mut self, user_prompt: &str, mode: Mode) {
        self.cancel_load();
        self.refresh_has_api_key();

        // Don't start a network call if we already know the key is missing
        if self.has_api_key == Some(false) {
            let err = AppError::Client(ClientError::MissingCredential);
            self.status = QuoteStatus::Failed {
                message: user_message(&err).unwrap_or_default(),
                missing_credential: true,
            };
            return;
        }

        self.next_load_id += 1;
        let load_id = self.next_load_id;
        let cancel = CancellationToken::new();
        self.pending = Some(PendingLoad {
            id: load_id,
            cancel: cancel.clone(),
        });
        self.status = QuoteStatus::Loading;

        // Spawn background task for the load
        let service = Arc::clone(&self.service);
        let tx = self.result_tx.clone();
        let user_prompt = user_prompt.to_string();

        tokio::spawn(async move {
            let outcome = match service.load_today(&user_prompt, mode, &cancel).await {
                Ok(artifact) => LoadOutcome::Loaded(artifact),
                Err(e) if e.is_cancelled() => LoadOutcome::Cancelled,
                Err(e) => {
                    tracing::error!("Failed to load today's quote: {}", e);
                    LoadOutcome::Failed {
                        message: user_message(&e).unwrap_or_default(),
                        missing_credential: matches!(
                            e,
                            AppError::Client(ClientError::MissingCredential)
                        ),
                    }
                }
            };

            let _ = tx.send(LoadResult { load_id, outcome });
        });
    }

    pub fn cancel_load(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
        if self.status == QuoteStatus::Loading {
            self.status = QuoteStatus::Idle;
        }
    }

    /// Poll for a completed load (non-blocking). Returns true if the status changed.
    pub fn poll_result(&mut self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.result_rx.try_recv() {
            changed |= self.apply(result);
        }
        changed
    }

    /// Wait until the current load, if any, has finished.
    pub async fn wait_result(&mut self) -> &QuoteStatus {
        while self.pending.is_some() {
            match self.result_rx.recv().await {
                Some(result) => {
                    self.apply(result);
                }
                None => break,
            }
        }
        &self.status
    }

    fn apply(&mut self, result: LoadResult) -> bool {
        // Only process the load we're waiting for
        if self.pending.as_ref().map(|p| p.id) != Some(result.load_id) {
            return false;
        }
        self.pending = None;

        self.status = match result.outcome {
            LoadOutcome::Loaded(artifact) => QuoteStatus::Loaded(artifact),
            LoadOutcome::Failed {
                message,
                missing_credential,
            } => QuoteStatus::Failed {
                message,
                missing_credential,
            },
            // Silent: the caller moved on
            LoadOutcome::Cancelled => QuoteStatus::Idle,
        };
        true
    }

    pub async fn clear_cache(&self) -> crate::error::Result<()> {
        self.service.clear_cache().await
    }
}

/// What to tell the user about a failed load. Cancellation is not a failure.
pub fn user_message(err: &AppError) -> Option<String> {
    let message = match err {
        AppError::Cancelled => return None,
        AppError::Client(client) => match client {
            ClientError::MissingCredential => {
                "Add an API key with `daily-quote key set <KEY>` to enable generation.".to_string()
            }
            ClientError::Credential(_) => "Could not read the API key. Check your config file.".to_string(),
            ClientError::TimedOut => {
                "The request timed out. Check your connection and try again.".to_string()
            }
            ClientError::RemoteError(message) => message.clone(),
            ClientError::HttpStatus(code) => format!("Network error (HTTP {}). Try again.", code),
            ClientError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::InvalidQuoteFormat(_) => {
                "The response couldn't be parsed. Please retry.".to_string()
            }
            ClientError::InvalidResponse | ClientError::DecodingFailed => {
                "The response was invalid. Please retry.".to_string()
            }
        },
        AppError::Storage(_) => "Could not save today's quote. Check disk permissions.".to_string(),
        _ => "Unexpected error. Please try again.".to_string(),
    };
    Some(message)
}
