use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::error::SortError;
use crate::logic::errors::{extract_error_message, status_message, transport_message};
use crate::logic::preview::mime_for;
use crate::model::results::Partition;
use crate::model::settings::Settings;
use crate::model::staging::StagedFile;

/// Upper bound for a whole sort job (upload, detection, matching)
pub const SORT_TIMEOUT: Duration = Duration::from_secs(300);

/// Remote previews and archives are much smaller than a sort job
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Base address of the sort service, normalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint(String);

impl Endpoint {
    /// Trim whitespace and trailing slashes; empty means not configured
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn sort_url(&self) -> String {
        format!("{}/sort", self.0)
    }

    pub fn download_url(&self, run_id: &str, partition: Partition) -> String {
        format!(
            "{}/download/{}/{}",
            self.0,
            urlencoding::encode(run_id),
            partition.as_path()
        )
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Successful response of `POST /sort`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobResult {
    pub run_id: String,
    pub target_label: String,
    pub target_score: f64,
    pub total_scanned: u64,
    pub matched_count: u64,
    pub not_matched_count: u64,
    pub matched_preview_urls: Vec<String>,
    pub not_matched_preview_urls: Vec<String>,
    pub matched_zip_url: Option<String>,
    pub not_matched_zip_url: Option<String>,
}

/// One field of the multipart sort request, in wire order
#[derive(Debug, Clone, PartialEq)]
pub enum FormField<'a> {
    File {
        name: &'static str,
        file: &'a StagedFile,
    },
    Text {
        name: &'static str,
        value: String,
    },
}

impl FormField<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            FormField::File { name, .. } | FormField::Text { name, .. } => name,
        }
    }
}

/// Everything needed to issue one sort job
#[derive(Debug, Clone)]
pub struct SortRequest {
    pub endpoint: Endpoint,
    pub target: StagedFile,
    pub images: Vec<StagedFile>,
    pub settings: Settings,
}

impl SortRequest {
    /// Fields in the order they are sent: target, every image, then settings
    pub fn form_fields(&self) -> Vec<FormField<'_>> {
        let mut fields = Vec::with_capacity(self.images.len() + 4);
        fields.push(FormField::File {
            name: "target",
            file: &self.target,
        });
        for image in &self.images {
            fields.push(FormField::File {
                name: "images",
                file: image,
            });
        }
        fields.push(FormField::Text {
            name: "mode",
            value: self.settings.mode.as_str().to_string(),
        });
        fields.push(FormField::Text {
            name: "detector",
            value: self.settings.detector.as_str().to_string(),
        });
        fields.push(FormField::Text {
            name: "similarity_threshold",
            value: self.settings.threshold.to_string(),
        });
        fields
    }
}

/// HTTP client for the sort service
#[derive(Clone, Default)]
pub struct FaceSortClient {
    client: Client,
}

impl FaceSortClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Upload the staged files and wait for the partitioned result
    pub async fn sort(&self, request: &SortRequest) -> Result<JobResult, SortError> {
        let form = build_form(request).await?;
        let url = request.endpoint.sort_url();

        tracing::info!(
            "POST {} ({} image(s), mode={}, detector={}, threshold={})",
            url,
            request.images.len(),
            request.settings.mode.as_str(),
            request.settings.detector.as_str(),
            request.settings.threshold
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(SORT_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&e, SORT_TIMEOUT))?;

        let response = check_status(response).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, SORT_TIMEOUT))?;

        let result: JobResult = serde_json::from_slice(&body)
            .map_err(|e| SortError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            "Sort {} finished: {} matched, {} not matched",
            result.run_id,
            result.matched_count,
            result.not_matched_count
        );

        Ok(result)
    }

    /// Download an archive into `dest_dir`, returning the written path
    pub async fn download_archive(
        &self,
        url: &str,
        partition: Partition,
        run_id: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, SortError> {
        let bytes = self.fetch_bytes(url).await?;
        let path = dest_dir.join(archive_file_name(run_id, partition));

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| SortError::WriteFile {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Raw bytes of a remote preview image
    pub async fn fetch_preview(&self, url: &str) -> Result<Vec<u8>, SortError> {
        self.fetch_bytes(url).await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, SortError> {
        let response = self
            .client
            .get(url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport_error(&e, FETCH_TIMEOUT))?;

        let response = check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_error(&e, FETCH_TIMEOUT))?;

        Ok(bytes.to_vec())
    }
}

/// Local file name of a downloaded archive
pub fn archive_file_name(run_id: &str, partition: Partition) -> String {
    let safe: String = run_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if safe.is_empty() {
        format!("{}.zip", partition.as_path())
    } else {
        format!("{}-{}.zip", partition.as_path(), safe)
    }
}

async fn build_form(request: &SortRequest) -> Result<Form, SortError> {
    let mut form = Form::new();

    for field in request.form_fields() {
        form = match field {
            FormField::File { name, file } => form.part(name, file_part(file).await?),
            FormField::Text { name, value } => form.text(name, value),
        };
    }

    Ok(form)
}

async fn file_part(file: &StagedFile) -> Result<Part, SortError> {
    let bytes = tokio::fs::read(&file.path)
        .await
        .map_err(|source| SortError::ReadFile {
            path: file.path.clone(),
            source,
        })?;

    Part::bytes(bytes)
        .file_name(file.name.clone())
        .mime_str(mime_for(&file.name))
        .map_err(|e| SortError::InvalidResponse(e.to_string()))
}

/// Pass success responses through; turn anything else into a service error
async fn check_status(response: Response) -> Result<Response, SortError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let code = status.as_u16();
    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<serde_json::Value>(&body).ok();
    let message = extract_error_message(parsed.as_ref(), Some(&status_message(code)));

    tracing::warn!("Service returned {}: {}", code, message);
    Err(SortError::Service {
        status: code,
        message,
    })
}

fn transport_error(error: &reqwest::Error, timeout: Duration) -> SortError {
    let transport = transport_message(error, timeout);
    tracing::warn!("Request failed: {}", transport);
    SortError::Transport {
        message: extract_error_message(None, Some(&transport)),
    }
}
