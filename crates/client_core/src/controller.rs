use std::{
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use shared::{
    domain::{CampaignBrief, GenerationResult, SubmissionId},
    error::ApiError,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::{
    brief_store::BriefStore,
    error::SubmissionError,
    render::{render_result, RenderedResult},
    GenerationBackend, MissingGenerationBackend,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
}

/// Read-only copy of the controller state handed to renderers.
#[derive(Debug, Clone, Default)]
pub struct SubmissionView {
    pub status: SubmissionStatus,
    pub result: Option<Arc<GenerationResult>>,
    pub error: Option<SubmissionError>,
    pub last_submission: Option<SubmissionId>,
}

impl SubmissionView {
    pub fn can_submit(&self) -> bool {
        self.status == SubmissionStatus::Idle
    }

    pub fn rendered(&self) -> RenderedResult {
        render_result(self.result.as_deref())
    }
}

#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Another submission was in flight; nothing was sent.
    Ignored,
    Succeeded(Arc<GenerationResult>),
    Failed(SubmissionError),
}

#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    Started {
        id: SubmissionId,
        brief: Arc<CampaignBrief>,
    },
    Succeeded {
        id: SubmissionId,
        result: Arc<GenerationResult>,
    },
    Failed {
        id: SubmissionId,
        error: ApiError,
    },
}

#[derive(Default)]
struct ControllerState {
    status: SubmissionStatus,
    in_flight: Option<SubmissionId>,
    result: Option<Arc<GenerationResult>>,
    error: Option<SubmissionError>,
    last_submission: Option<SubmissionId>,
    next_id: u64,
}

/// Single-flight submission of the current brief.
///
/// State is only written by the synchronous prefix of [`submit`] and by the
/// completion of the one outstanding request; the lock is never held
/// across the network call.
///
/// [`submit`]: SubmissionController::submit
pub struct SubmissionController {
    briefs: Arc<BriefStore>,
    backend: Arc<dyn GenerationBackend>,
    state: Mutex<ControllerState>,
    events: broadcast::Sender<SubmissionEvent>,
}

struct InFlight<'a> {
    controller: &'a SubmissionController,
    id: SubmissionId,
    brief: Arc<CampaignBrief>,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.controller.lock_state();
        if state.in_flight == Some(self.id) {
            state.status = SubmissionStatus::Idle;
            state.in_flight = None;
        }
        warn!(submission_id = %self.id, "submission dropped before completion");
    }
}

impl SubmissionController {
    pub fn new(briefs: Arc<BriefStore>) -> Self {
        Self::new_with_backend(briefs, Arc::new(MissingGenerationBackend))
    }

    pub fn new_with_backend(briefs: Arc<BriefStore>, backend: Arc<dyn GenerationBackend>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            briefs,
            backend,
            state: Mutex::new(ControllerState::default()),
            events,
        }
    }

    pub fn briefs(&self) -> &Arc<BriefStore> {
        &self.briefs
    }

    pub fn status(&self) -> SubmissionStatus {
        self.lock_state().status
    }

    pub fn view(&self) -> SubmissionView {
        let state = self.lock_state();
        SubmissionView {
            status: state.status,
            result: state.result.clone(),
            error: state.error.clone(),
            last_submission: state.last_submission,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    /// Submits the brief as it is at the moment of this call.
    ///
    /// The in-flight check and the brief snapshot happen before this
    /// returns, not when the future is first polled. While a submission is
    /// outstanding the returned future resolves to
    /// [`SubmitOutcome::Ignored`] without contacting the backend.
    pub fn submit(&self) -> impl Future<Output = SubmitOutcome> + Send + '_ {
        let in_flight = self.begin();
        async move {
            let Some(in_flight) = in_flight else {
                return SubmitOutcome::Ignored;
            };
            let outcome = self.backend.generate(&in_flight.brief).await;
            self.complete(in_flight, outcome)
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        let mut state = self.lock_state();
        if state.status == SubmissionStatus::Submitting {
            debug!(
                in_flight = ?state.in_flight.map(|id| id.0),
                "submission already in flight; ignoring submit"
            );
            return None;
        }

        state.next_id += 1;
        let id = SubmissionId(state.next_id);
        state.status = SubmissionStatus::Submitting;
        state.in_flight = Some(id);
        state.last_submission = Some(id);
        state.error = None;
        let brief = self.briefs.get();
        drop(state);

        info!(
            submission_id = %id,
            product = %brief.product,
            platforms = brief.platform.len(),
            "submitting campaign brief"
        );
        let _ = self.events.send(SubmissionEvent::Started {
            id,
            brief: Arc::clone(&brief),
        });

        Some(InFlight {
            controller: self,
            id,
            brief,
            settled: false,
        })
    }

    fn complete(
        &self,
        mut in_flight: InFlight<'_>,
        outcome: Result<GenerationResult, SubmissionError>,
    ) -> SubmitOutcome {
        in_flight.settled = true;
        let id = in_flight.id;

        let mut state = self.lock_state();
        state.status = SubmissionStatus::Idle;
        state.in_flight = None;

        match outcome {
            Ok(result) => {
                let result = Arc::new(result);
                state.result = Some(Arc::clone(&result));
                state.error = None;
                drop(state);

                info!(
                    submission_id = %id,
                    asset_count = result.top_assets.len(),
                    "submission succeeded"
                );
                let _ = self.events.send(SubmissionEvent::Succeeded {
                    id,
                    result: Arc::clone(&result),
                });
                SubmitOutcome::Succeeded(result)
            }
            Err(err) => {
                // The previous result stays visible.
                state.error = Some(err.clone());
                drop(state);

                warn!(submission_id = %id, error = %err, "submission failed");
                let _ = self.events.send(SubmissionEvent::Failed {
                    id,
                    error: ApiError::from(&err),
                });
                SubmitOutcome::Failed(err)
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
