//! API Response Handler
//!
//! Handles responses from the background API service: sort outcomes,
//! fetched previews and finished downloads.

use std::time::Instant;

use facesort::services::ApiResponse;

use crate::App;

/// Handle API response from background service
///
/// Response types:
/// - SortResult: Outcome of a sort job (ignored if the job was detached)
/// - PreviewResult: Bytes of a remote result preview
/// - DownloadResult: Path of a saved archive
pub fn handle_api_response(app: &mut App, response: ApiResponse) {
    match response {
        ApiResponse::SortResult { job, result } => {
            let succeeded = result.is_ok();
            if app.workflow.settle(job, result, Instant::now()) && succeeded {
                // Previews belong to the result they came from
                app.clear_remote_previews();
            }
        }

        ApiResponse::PreviewResult { url, bytes } => match bytes {
            Ok(bytes) => app.decode_remote_preview(url, bytes),
            Err(e) => app.fail_remote_preview(&url, e.to_string()),
        },

        ApiResponse::DownloadResult { link, path } => app.finish_download(link, path),
    }
}
