//! Archive downloads

use std::path::PathBuf;
use std::time::Instant;

use facesort::error::SortError;
use facesort::logic::errors::notification_text;
use facesort::model::results::{DownloadLink, Partition};
use facesort::model::NotificationKind;
use facesort::services::ApiRequest;

use crate::App;

impl App {
    /// Download one partition's archive, if the result advertises it
    pub(crate) fn download(&mut self, partition: Partition) {
        let now = Instant::now();
        let Some(link) = self
            .workflow
            .download_links()
            .into_iter()
            .find(|l| l.partition == partition)
        else {
            if self.workflow.result().is_some() {
                self.workflow.notify(
                    NotificationKind::Info,
                    format!("No {} archive for this run", partition.label()),
                    now,
                );
            }
            return;
        };

        if let Err(e) = std::fs::create_dir_all(&self.download_dir) {
            tracing::warn!("Cannot create {}: {}", self.download_dir.display(), e);
        }

        tracing::info!("Downloading {} to {}", link.url, self.download_dir.display());
        self.workflow.notify(
            NotificationKind::Info,
            format!("Downloading {} archive...", partition.label()),
            now,
        );
        self.api.send(ApiRequest::Download {
            link,
            dest_dir: self.download_dir.clone(),
        });
    }

    pub(crate) fn finish_download(&mut self, link: DownloadLink, path: Result<PathBuf, SortError>) {
        let now = Instant::now();
        match path {
            Ok(path) => self.workflow.notify(
                NotificationKind::Success,
                format!("Saved {}", path.display()),
                now,
            ),
            Err(e) => {
                tracing::error!("Download of {} failed: {}", link.url, e);
                self.workflow
                    .notify(NotificationKind::Error, notification_text(&e.to_string()), now);
            }
        }
    }
}
