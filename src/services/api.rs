use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};

use crate::api::{FaceSortClient, JobResult, SortRequest};
use crate::error::SortError;
use crate::model::results::DownloadLink;
use crate::workflow::{JobId, JobSubmitter};

/// Concurrent preview fetches; sort jobs and downloads are never held back
const MAX_PREVIEW_FETCHES: usize = 4;

/// Priority level for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High, // User-initiated actions (sort, download)
    Low,  // Gallery previews
}

/// API request types
#[derive(Debug, Clone)]
pub enum ApiRequest {
    /// Upload the staged selection and sort it
    Sort { job: JobId, request: SortRequest },

    /// Fetch a remote result preview for the gallery
    FetchPreview { url: String },

    /// Save a result archive to disk
    Download { link: DownloadLink, dest_dir: PathBuf },
}

impl ApiRequest {
    fn priority(&self) -> Priority {
        match self {
            ApiRequest::FetchPreview { .. } => Priority::Low,
            _ => Priority::High,
        }
    }
}

/// API response types
#[derive(Debug)]
pub enum ApiResponse {
    SortResult {
        job: JobId,
        result: Result<JobResult, SortError>,
    },

    PreviewResult {
        url: String,
        bytes: Result<Vec<u8>, SortError>,
    },

    DownloadResult {
        link: DownloadLink,
        path: Result<PathBuf, SortError>,
    },
}

/// Sending half of the service, used by the event loop
#[derive(Clone)]
pub struct ApiHandle {
    tx: mpsc::UnboundedSender<ApiRequest>,
}

impl ApiHandle {
    pub fn send(&self, request: ApiRequest) {
        if self.tx.send(request).is_err() {
            tracing::error!("API service is gone; request dropped");
        }
    }
}

impl JobSubmitter for ApiHandle {
    fn submit(&self, job: JobId, request: SortRequest) {
        self.send(ApiRequest::Sort { job, request });
    }
}

/// Completion notices from spawned requests back to the worker
enum InternalMessage {
    PreviewDone,
}

/// API service worker that processes requests in the background
struct ApiService {
    client: FaceSortClient,
    request_queue: VecDeque<(ApiRequest, Priority)>,
    previews_in_flight: usize,
    max_previews: usize,
    response_tx: mpsc::UnboundedSender<ApiResponse>,
    completion_tx: mpsc::UnboundedSender<InternalMessage>,
}

impl ApiService {
    fn new(
        client: FaceSortClient,
        response_tx: mpsc::UnboundedSender<ApiResponse>,
        completion_tx: mpsc::UnboundedSender<InternalMessage>,
    ) -> Self {
        Self {
            client,
            request_queue: VecDeque::new(),
            previews_in_flight: 0,
            max_previews: MAX_PREVIEW_FETCHES,
            response_tx,
            completion_tx,
        }
    }

    /// Add a request to the queue, high priority first
    fn enqueue(&mut self, request: ApiRequest) {
        let priority = request.priority();

        let insert_pos = self
            .request_queue
            .iter()
            .position(|(_, p)| *p > priority)
            .unwrap_or(self.request_queue.len());

        self.request_queue.insert(insert_pos, (request, priority));
    }

    /// Pop the next request allowed to start
    ///
    /// High priority requests always start. Previews wait while all preview
    /// slots are taken, and everything queued behind them waits too.
    fn take_ready(&mut self) -> Option<ApiRequest> {
        let (_, priority) = self.request_queue.front()?;
        if *priority == Priority::Low && self.previews_in_flight >= self.max_previews {
            return None;
        }

        let (request, priority) = self.request_queue.pop_front()?;
        if priority == Priority::Low {
            self.previews_in_flight += 1;
        }
        Some(request)
    }

    fn preview_finished(&mut self) {
        self.previews_in_flight = self.previews_in_flight.saturating_sub(1);
    }

    /// Spawn every request that may start now
    fn process_ready(&mut self) {
        while let Some(request) = self.take_ready() {
            self.dispatch(request);
        }
    }

    fn dispatch(&self, request: ApiRequest) {
        let client = self.client.clone();
        let response_tx = self.response_tx.clone();
        let completion_tx = self.completion_tx.clone();
        let is_preview = request.priority() == Priority::Low;

        // No retries: a failed job is reported and the user decides
        tokio::spawn(async move {
            let response = Self::execute_request(&client, request).await;
            if is_preview {
                let _ = completion_tx.send(InternalMessage::PreviewDone);
            }
            if response_tx.send(response).is_err() {
                tracing::debug!("Response dropped: event loop has shut down");
            }
        });
    }

    async fn execute_request(client: &FaceSortClient, request: ApiRequest) -> ApiResponse {
        match request {
            ApiRequest::Sort { job, request } => {
                tracing::debug!("Job {}: sending sort request", job);
                let result = client.sort(&request).await;
                ApiResponse::SortResult { job, result }
            }

            ApiRequest::FetchPreview { url } => {
                let bytes = client.fetch_preview(&url).await;
                ApiResponse::PreviewResult { url, bytes }
            }

            ApiRequest::Download { link, dest_dir } => {
                let path = client
                    .download_archive(&link.url, link.partition, &link.run_id, &dest_dir)
                    .await;
                ApiResponse::DownloadResult { link, path }
            }
        }
    }
}

/// Spawn the API service worker
pub fn spawn_api_service(
    client: FaceSortClient,
) -> (ApiHandle, mpsc::UnboundedReceiver<ApiResponse>) {
    let (request_tx, mut request_rx) = mpsc::unbounded_channel::<ApiRequest>();
    let (response_tx, response_rx) = mpsc::unbounded_channel::<ApiResponse>();
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<InternalMessage>();

    tokio::spawn(async move {
        let mut service = ApiService::new(client, response_tx, completion_tx);

        // Ticker for processing queue
        let mut tick = interval(Duration::from_millis(10));

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some(request) => service.enqueue(request),
                        None => {
                            tracing::debug!("API request channel closed; worker exiting");
                            break;
                        }
                    }
                }

                Some(InternalMessage::PreviewDone) = completion_rx.recv() => {
                    service.preview_finished();
                }

                _ = tick.tick() => {
                    service.process_ready();
                }
            }
        }
    });

    (ApiHandle { tx: request_tx }, response_rx)
}
