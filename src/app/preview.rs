//! Image preview methods
//!
//! Local target previews and remote result previews are decoded off the
//! event loop and delivered through `image_update_tx`. Decoded images are
//! keyed by preview binding (staged files) or URL (results), and dropped
//! when the binding is released or a new job starts.

use std::path::PathBuf;

use facesort::model::results::PreviewSource;
use facesort::services::ApiRequest;
use image::DynamicImage;
use ratatui_image::picker::Picker;

use crate::{App, ImagePreviewState, PreviewKey};

/// Larger files are not decoded for preview
const MAX_PREVIEW_BYTES: u64 = 20 * 1024 * 1024;

impl App {
    /// Start decoding the staged target image
    pub(crate) fn request_target_preview(&mut self) {
        let Some(staged) = self.workflow.staging().target() else {
            return;
        };
        let Some(picker) = self.image_picker.clone() else {
            return;
        };

        let key = PreviewKey::Staged(staged.binding().id());
        let path = staged.file.path.clone();
        let size = staged.file.size;
        self.image_state_map.insert(key.clone(), ImagePreviewState::Loading);

        let image_tx = self.image_update_tx.clone();
        tokio::spawn(async move {
            let state = if size > MAX_PREVIEW_BYTES {
                ImagePreviewState::Failed {
                    reason: "Too large to preview".to_string(),
                }
            } else {
                Self::load_local_image(path, picker).await
            };
            let _ = image_tx.send((key, state));
        });
    }

    /// Queue a fetch for the selected result preview unless it is known already
    pub(crate) fn ensure_selected_preview(&mut self) {
        if self.image_picker.is_none() {
            return;
        }
        let Some(result) = self.workflow.result() else {
            return;
        };
        let presenter = self.workflow.presenter();
        let Some(url) = presenter.selected_preview(result) else {
            return;
        };
        let PreviewSource::Remote(url) = presenter.preview_source(url) else {
            return;
        };

        let key = PreviewKey::Remote(url.to_string());
        if self.image_state_map.contains_key(&key) {
            return;
        }

        let url = url.to_string();
        self.image_state_map.insert(key, ImagePreviewState::Loading);
        self.api.send(ApiRequest::FetchPreview { url });
    }

    /// Decode fetched preview bytes in the background
    pub(crate) fn decode_remote_preview(&mut self, url: String, bytes: Vec<u8>) {
        let key = PreviewKey::Remote(url);
        if !self.image_state_map.contains_key(&key) {
            return;
        }
        let Some(picker) = self.image_picker.clone() else {
            self.image_state_map.remove(&key);
            return;
        };

        let image_tx = self.image_update_tx.clone();
        tokio::spawn(async move {
            let decoded =
                tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await;
            let state = match decoded {
                Ok(Ok(img)) => Self::make_protocol(img, &picker),
                Ok(Err(e)) => ImagePreviewState::Failed {
                    reason: format!("Decode error: {}", e),
                },
                Err(e) => ImagePreviewState::Failed {
                    reason: format!("Task error: {}", e),
                },
            };
            let _ = image_tx.send((key, state));
        });
    }

    /// Store a finished decode; failed remote previews fall back to a placeholder
    pub(crate) fn apply_image_update(&mut self, key: PreviewKey, state: ImagePreviewState) {
        // A binding released while decoding must not come back
        if !self.image_state_map.contains_key(&key) {
            tracing::debug!("Dropping image update for evicted {:?}", key);
            return;
        }

        if let (PreviewKey::Remote(url), ImagePreviewState::Failed { reason }) = (&key, &state) {
            tracing::warn!("Preview {} unavailable: {}", url, reason);
            self.workflow.presenter_mut().mark_failed(url);
        }

        self.image_state_map.insert(key, state);
    }

    /// Mark a remote preview as failed (fetch error)
    pub(crate) fn fail_remote_preview(&mut self, url: &str, reason: String) {
        self.apply_image_update(
            PreviewKey::Remote(url.to_string()),
            ImagePreviewState::Failed { reason },
        );
    }

    /// Forget decoded images of released bindings
    pub(crate) fn evict_released_previews(&mut self) {
        let released = self.workflow.drain_released();
        if released.is_empty() {
            return;
        }
        for id in released {
            self.image_state_map.remove(&PreviewKey::Staged(id));
        }
        tracing::debug!("{} preview(s) cached after eviction", self.image_state_map.len());
    }

    /// Drop every remote preview (new job or new result)
    pub(crate) fn clear_remote_previews(&mut self) {
        self.image_state_map
            .retain(|key, _| matches!(key, PreviewKey::Staged(_)));
        self.model.sixel_cleanup_frames = 1;
    }

    /// Open the selected result preview with the configured command
    pub(crate) fn open_selected_preview(&mut self) {
        let now = std::time::Instant::now();
        let Some(result) = self.workflow.result() else {
            return;
        };
        let Some(url) = self.workflow.presenter().selected_preview(result) else {
            return;
        };
        let url = facesort::logic::preview::encode_uri(url);

        // Spawn, don't wait, so GUI viewers do not block the TUI
        let spawned = std::process::Command::new(&self.open_command)
            .arg(&url)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn();

        match spawned {
            Ok(_child) => {
                tracing::debug!("open_command: spawned {} {}", self.open_command, url);
                self.workflow.notify(
                    facesort::model::NotificationKind::Info,
                    format!("Opened: {}", url),
                    now,
                );
            }
            Err(e) => {
                tracing::warn!("Failed to execute open_command '{}': {}", self.open_command, e);
                self.workflow.notify(
                    facesort::model::NotificationKind::Error,
                    format!("Error: Failed to open with '{}'", self.open_command),
                    now,
                );
            }
        }
    }

    async fn load_local_image(path: PathBuf, picker: Picker) -> ImagePreviewState {
        let decoded = tokio::task::spawn_blocking(move || image::open(&path)).await;
        match decoded {
            Ok(Ok(img)) => Self::make_protocol(img, &picker),
            Ok(Err(e)) => ImagePreviewState::Failed {
                reason: format!("Load error: {}", e),
            },
            Err(e) => ImagePreviewState::Failed {
                reason: format!("Task error: {}", e),
            },
        }
    }

    /// Downscale oversized images before building the terminal protocol
    fn make_protocol(img: DynamicImage, picker: &Picker) -> ImagePreviewState {
        let dimensions = (img.width(), img.height());
        let font_size = picker.font_size();

        // ~120 x 40 cells is more than a preview pane ever gets
        let max_width = 120 * font_size.0 as u32;
        let max_height = 40 * font_size.1 as u32;

        let processed = if img.width() > max_width || img.height() > max_height {
            tracing::debug!(
                "Pre-downscaling {}x{} to fit {}x{}",
                img.width(),
                img.height(),
                max_width,
                max_height
            );
            img.resize(max_width, max_height, image::imageops::FilterType::Triangle)
        } else {
            img
        };

        ImagePreviewState::Ready {
            protocol: picker.new_resize_protocol(processed),
            dimensions,
        }
    }
}
