//! One generate → package → publish cycle, shared by both pipelines.
//!
//! ```text
//! begin          clear URL / reference / error, set Busy
//!   └─▶ steps    (validation, generation or file read, packaging, publish)
//!         ├─ Ok  → store reference + URL, Ready,  notify(Normal)
//!         └─ Err → log, store error,      Failed, notify(Destructive)
//! ```
//!
//! Busy is cleared on every exit path. Nothing here guards against two
//! overlapping cycles on the same instance; the UI disables its controls
//! while [`PipelineState::is_busy`] is true.

use std::future::Future;

use super::error::PipelineError;
use super::publisher::PublishedAsset;
use super::state::{lock, PipelineState, SharedAssetState};
use crate::notify::{Notification, Notifier};

/// Notification titles for one pipeline.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Messages {
    pub success: &'static str,
    pub failure: &'static str,
    pub missing_prompt: &'static str,
    pub unreadable_file: &'static str,
}

impl Messages {
    fn for_error(&self, error: &PipelineError) -> &'static str {
        match error {
            PipelineError::EmptyPrompt => self.missing_prompt,
            PipelineError::FileRead(_) => self.unreadable_file,
            _ => self.failure,
        }
    }
}

/// Drive `steps` to completion, keeping `state` and `notifier` in sync.
pub(crate) async fn run_cycle<F>(
    name: &str,
    state: &SharedAssetState,
    notifier: &dyn Notifier,
    messages: &Messages,
    steps: F,
) -> Result<String, PipelineError>
where
    F: Future<Output = Result<PublishedAsset, PipelineError>>,
{
    lock(state).begin();
    log::debug!("{name}: Idle → Busy");

    match steps.await {
        Ok(PublishedAsset { reference, url }) => {
            {
                let mut st = lock(state);
                st.pipeline = PipelineState::Ready;
                st.storage = Some(reference);
                st.resolved_url = Some(url.clone());
            }
            log::info!("{name}: ready at {url}");
            notifier.notify(Notification::normal(messages.success));
            Ok(url)
        }
        Err(error) => {
            {
                let mut st = lock(state);
                st.pipeline = PipelineState::Failed;
                st.resolved_url = None;
                st.storage = None;
                st.error = Some(error.clone());
            }
            log::error!("{name} error: {error}");
            notifier.notify(Notification::destructive(messages.for_error(&error)));
            Err(error)
        }
    }
}
