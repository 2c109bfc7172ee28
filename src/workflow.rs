//! Sort Workflow
//!
//! Owns the lifecycle of a sort job: staged selection, settings, job state,
//! synthetic progress, notifications and result presentation. The terminal
//! loop drives it with user actions, settled responses from the API service,
//! and `tick(now)` for the timers.
//!
//! At most one job is in flight. Each submission gets a fresh `JobId`; a
//! response carrying any other id is stale (its job was detached by a
//! selection change) and is dropped.

use std::time::Instant;

use crate::api::{Endpoint, JobResult, SortRequest};
use crate::error::{SortError, SubmitError, ValidationError};
use crate::logic::errors::notification_text;
use crate::model::notification::{NotificationKind, NotificationQueue};
use crate::model::progress::{ProgressSimulator, RESET_DELAY};
use crate::model::results::{DownloadLink, ResultPresenter};
use crate::model::settings::Settings;
use crate::model::staging::{BindingId, FileStagingStore, StagedFile};

pub type JobId = u64;

/// Hands a sort request to whatever performs it (background service, test double)
pub trait JobSubmitter {
    fn submit(&self, job: JobId, request: SortRequest);
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Idle,
    Submitting { job: JobId },
    Succeeded { result: JobResult },
    Failed { message: String },
}

impl JobState {
    pub fn label(&self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Submitting { .. } => "Sorting...",
            JobState::Succeeded { .. } => "Done",
            JobState::Failed { .. } => "Failed",
        }
    }
}

pub struct SortWorkflow {
    endpoint: Option<Endpoint>,
    staging: FileStagingStore,
    settings: Settings,
    state: JobState,
    presenter: ResultPresenter,
    progress: ProgressSimulator,
    notifications: NotificationQueue,
    next_job: JobId,
}

impl SortWorkflow {
    pub fn new(endpoint: Option<Endpoint>, settings: Settings) -> Self {
        Self::with_progress(endpoint, settings, ProgressSimulator::new())
    }

    /// Build with a specific simulator (seeded RNG in tests)
    pub fn with_progress(
        endpoint: Option<Endpoint>,
        settings: Settings,
        progress: ProgressSimulator,
    ) -> Self {
        Self {
            endpoint,
            staging: FileStagingStore::new(),
            settings,
            state: JobState::Idle,
            presenter: ResultPresenter::new(),
            progress,
            notifications: NotificationQueue::new(),
            next_job: 1,
        }
    }

    // ---- Accessors ----

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    pub fn staging(&self) -> &FileStagingStore {
        &self.staging
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, JobState::Submitting { .. })
    }

    /// Result of the last successful job, if it is still current
    pub fn result(&self) -> Option<&JobResult> {
        match &self.state {
            JobState::Succeeded { result } => Some(result),
            _ => None,
        }
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ResultPresenter {
        &mut self.presenter
    }

    pub fn progress(&self) -> u8 {
        self.progress.value()
    }

    pub fn progress_simulator(&self) -> &ProgressSimulator {
        &self.progress
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    // ---- Submission ----

    /// Whether the submit affordance is enabled
    pub fn can_submit(&self) -> bool {
        self.check_submit().is_ok()
    }

    /// Guard checks in order: in flight, selection, endpoint
    pub fn check_submit(&self) -> Result<&Endpoint, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        if !self.staging.has_target() {
            return Err(SubmitError::Validation(ValidationError::MissingTarget));
        }
        if self.staging.input_count() == 0 {
            return Err(SubmitError::Validation(ValidationError::EmptyBatch));
        }
        self.endpoint.as_ref().ok_or(SubmitError::Configuration)
    }

    /// Start a sort job
    ///
    /// Validation failures return silently (the affordance is disabled);
    /// a missing endpoint is reported with an error notification.
    pub fn submit(
        &mut self,
        now: Instant,
        submitter: &dyn JobSubmitter,
    ) -> Result<JobId, SubmitError> {
        let endpoint = match self.check_submit().cloned() {
            Ok(endpoint) => endpoint,
            Err(SubmitError::Configuration) => {
                let err = SubmitError::Configuration;
                tracing::warn!("Submit refused: {}", err);
                self.notifications.push(
                    NotificationKind::Error,
                    notification_text(&err.to_string()),
                    now,
                );
                return Err(err);
            }
            Err(err) => {
                tracing::debug!("Submit refused: {}", err);
                return Err(err);
            }
        };

        let Some(target) = self.staging.target().map(|s| s.file.clone()) else {
            return Err(SubmitError::Validation(ValidationError::MissingTarget));
        };

        let job = self.next_job;
        self.next_job += 1;

        let request = SortRequest {
            endpoint,
            target,
            images: self.staging.input_files(),
            settings: self.settings,
        };

        self.state = JobState::Submitting { job };
        self.presenter.reset();
        self.notifications
            .push(NotificationKind::Info, "Uploading + sorting started...", now);
        self.progress.start(now);

        tracing::info!("Submitting job {} with {} image(s)", job, request.images.len());
        submitter.submit(job, request);

        Ok(job)
    }

    /// Apply the outcome of job `job`. Returns false if the job is no longer current.
    pub fn settle(
        &mut self,
        job: JobId,
        outcome: Result<JobResult, SortError>,
        now: Instant,
    ) -> bool {
        if self.state != (JobState::Submitting { job }) {
            tracing::debug!("Ignoring stale response for job {}", job);
            return false;
        }

        match outcome {
            Ok(result) => {
                self.progress.succeed();
                self.notifications.push(
                    NotificationKind::Success,
                    format!("Done! Matched {} images", result.matched_count),
                    now,
                );
                self.state = JobState::Succeeded { result };
            }
            Err(err) => {
                self.progress.fail();
                let message = err.to_string();
                tracing::error!("Job {} failed: {}", job, message);
                self.notifications
                    .push(NotificationKind::Error, notification_text(&message), now);
                self.state = JobState::Failed { message };
            }
        }

        self.progress.settle_and_reset(now, RESET_DELAY);
        true
    }

    // ---- Selection ----

    pub fn set_target(&mut self, file: Option<StagedFile>, now: Instant) {
        let selected = file.is_some();
        self.staging.set_target(file);
        self.reset_outcome();
        if selected {
            self.notifications
                .push(NotificationKind::Success, "Target face selected", now);
        }
    }

    pub fn set_inputs(&mut self, files: Vec<StagedFile>, now: Instant) {
        let count = files.len();
        self.staging.set_inputs(files);
        self.reset_outcome();
        if count > 0 {
            self.notifications.push(
                NotificationKind::Success,
                format!("{} image(s) added", count),
                now,
            );
        }
    }

    pub fn clear(&mut self, now: Instant) {
        self.staging.clear();
        self.reset_outcome();
        self.notifications
            .push(NotificationKind::Info, "Cleared selection", now);
    }

    /// Binding ids released since the last call, for the view's image cache
    pub fn drain_released(&mut self) -> Vec<BindingId> {
        self.staging.drain_released()
    }

    /// A changed selection invalidates the previous outcome and detaches a running job
    fn reset_outcome(&mut self) {
        if let JobState::Submitting { job } = self.state {
            tracing::info!("Selection changed; detaching job {}", job);
        }
        self.state = JobState::Idle;
        self.progress.reset();
        self.presenter.reset();
    }

    // ---- Settings (locked while a job is in flight) ----

    pub fn cycle_mode(&mut self) -> bool {
        self.update_settings(|s| s.mode = s.mode.next())
    }

    pub fn cycle_detector(&mut self) -> bool {
        self.update_settings(|s| s.detector = s.detector.next())
    }

    /// Move the threshold by `steps` hundredths
    pub fn step_threshold(&mut self, steps: i32) -> bool {
        self.update_settings(|s| s.threshold = s.threshold.step(steps))
    }

    fn update_settings(&mut self, apply: impl FnOnce(&mut Settings)) -> bool {
        if self.is_submitting() {
            return false;
        }
        apply(&mut self.settings);
        true
    }

    // ---- Notifications ----

    /// Show an arbitrary notification (downloads, selection problems)
    pub fn notify(&mut self, kind: NotificationKind, text: impl Into<String>, now: Instant) {
        self.notifications.push(kind, text, now);
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.dismiss();
    }

    // ---- Results ----

    pub fn select_next_preview(&mut self) {
        if let JobState::Succeeded { result } = &self.state {
            self.presenter.select_next(result);
        }
    }

    pub fn download_links(&self) -> Vec<DownloadLink> {
        match (self.result(), self.endpoint.as_ref()) {
            (Some(result), Some(endpoint)) => self.presenter.downloads(result, endpoint),
            _ => Vec::new(),
        }
    }

    // ---- Timers ----

    /// Drive every owned timer. Returns true if anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let progressed = self.progress.tick(now);
        let dismissed = self.notifications.tick(now);
        progressed || dismissed
    }

    /// Cancel timers and release every preview binding
    pub fn shutdown(&mut self) {
        self.progress.shutdown();
        self.notifications.shutdown();
        self.staging.clear();
    }
}

impl Drop for SortWorkflow {
    fn drop(&mut self) {
        self.shutdown();
    }
}
