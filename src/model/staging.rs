//! File Staging
//!
//! Holds the target face and the ordered candidate batch. Every staged file
//! owns exactly one `PreviewBinding`; bindings are acquired when a file is
//! staged and released when it is replaced, cleared, or the store is dropped.
//!
//! Bindings are move-only, so releasing one consumes it and a second release
//! cannot be written. The registry keeps the live count and a list of
//! released ids so the view can drop any decoded image tied to them.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Input previews rendered inline; the rest are summarized as "+N more"
pub const MAX_INPUT_PREVIEWS: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl StagedFile {
    /// Describe a file without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = file_name(&path);
        Self {
            path,
            name,
            size: 0,
        }
    }

    /// Describe a file on disk, failing if it is missing or not a regular file
    pub fn from_disk(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = file_name(&path);
        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

/// Preview handle for one staged file
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewBinding {
    id: BindingId,
    url: String,
}

impl PreviewBinding {
    pub fn id(&self) -> BindingId {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Default)]
struct PreviewRegistry {
    next_id: u64,
    live: HashSet<BindingId>,
    released: Vec<BindingId>,
}

impl PreviewRegistry {
    fn acquire(&mut self, file: &StagedFile) -> PreviewBinding {
        self.next_id += 1;
        let id = BindingId(self.next_id);
        self.live.insert(id);
        PreviewBinding {
            id,
            url: format!("preview://{}/{}", id.0, urlencoding::encode(&file.name)),
        }
    }

    fn release(&mut self, binding: PreviewBinding) {
        if self.live.remove(&binding.id) {
            self.released.push(binding.id);
        } else {
            warn!(id = binding.id.0, "released a preview binding that was not live");
        }
    }
}

/// A staged file with its preview binding
#[derive(Debug)]
pub struct Staged {
    pub file: StagedFile,
    binding: PreviewBinding,
}

impl Staged {
    pub fn binding(&self) -> &PreviewBinding {
        &self.binding
    }
}

#[derive(Debug, Default)]
pub struct FileStagingStore {
    target: Option<Staged>,
    inputs: Vec<Staged>,
    registry: PreviewRegistry,
}

impl FileStagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the target (or remove it with `None`)
    pub fn set_target(&mut self, file: Option<StagedFile>) {
        if let Some(previous) = self.target.take() {
            self.registry.release(previous.binding);
        }
        let staged = file.map(|f| self.stage(f));
        self.target = staged;
    }

    /// Replace the whole candidate batch; order is kept as given
    pub fn set_inputs(&mut self, files: Vec<StagedFile>) {
        self.release_inputs();
        let staged: Vec<Staged> = files.into_iter().map(|f| self.stage(f)).collect();
        debug!(count = staged.len(), "staged candidate batch");
        self.inputs = staged;
    }

    /// Unstage everything
    pub fn clear(&mut self) {
        self.set_target(None);
        self.release_inputs();
    }

    pub fn target(&self) -> Option<&Staged> {
        self.target.as_ref()
    }

    pub fn inputs(&self) -> &[Staged] {
        &self.inputs
    }

    /// Full ordered batch, as submitted
    pub fn input_files(&self) -> Vec<StagedFile> {
        self.inputs.iter().map(|s| s.file.clone()).collect()
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn staged_count(&self) -> usize {
        self.inputs.len() + usize::from(self.target.is_some())
    }

    pub fn live_bindings(&self) -> usize {
        self.registry.live.len()
    }

    /// Inputs shown as thumbnails
    pub fn visible_inputs(&self) -> &[Staged] {
        let (shown, _) = crate::logic::preview::split_visible(self.inputs.len(), MAX_INPUT_PREVIEWS);
        &self.inputs[..shown]
    }

    /// Inputs summarized as "+N more"
    pub fn hidden_input_count(&self) -> usize {
        crate::logic::preview::split_visible(self.inputs.len(), MAX_INPUT_PREVIEWS).1
    }

    /// Ids released since the last call
    pub fn drain_released(&mut self) -> Vec<BindingId> {
        std::mem::take(&mut self.registry.released)
    }

    fn stage(&mut self, file: StagedFile) -> Staged {
        let binding = self.registry.acquire(&file);
        Staged { file, binding }
    }

    fn release_inputs(&mut self) {
        for staged in std::mem::take(&mut self.inputs) {
            self.registry.release(staged.binding);
        }
    }
}

impl Drop for FileStagingStore {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(names: &[&str]) -> Vec<StagedFile> {
        names.iter().map(|n| StagedFile::new(format!("/photos/{}", n))).collect()
    }

    #[test]
    fn test_staged_file_name_from_path() {
        let file = StagedFile::new("/photos/face.jpg");
        assert_eq!(file.name, "face.jpg");
        assert_eq!(file.size, 0);
    }

    #[test]
    fn test_from_disk_rejects_missing_file() {
        assert!(StagedFile::from_disk("/definitely/not/here.jpg").is_err());
    }

    #[test]
    fn test_from_disk_rejects_directory() {
        let dir = std::env::temp_dir();
        assert!(StagedFile::from_disk(dir).is_err());
    }

    #[test]
    fn test_set_target_acquires_one_binding() {
        let mut store = FileStagingStore::new();
        store.set_target(Some(StagedFile::new("/photos/face.jpg")));

        assert!(store.has_target());
        assert_eq!(store.live_bindings(), 1);
        assert!(store.target().unwrap().binding().url().starts_with("preview://"));
    }

    #[test]
    fn test_replacing_target_releases_previous() {
        let mut store = FileStagingStore::new();
        store.set_target(Some(StagedFile::new("/photos/a.jpg")));
        let first = store.target().unwrap().binding().id();

        store.set_target(Some(StagedFile::new("/photos/b.jpg")));

        assert_eq!(store.live_bindings(), 1);
        assert_eq!(store.drain_released(), vec![first]);
        assert_ne!(store.target().unwrap().binding().id(), first);
    }

    #[test]
    fn test_set_inputs_replaces_wholesale() {
        let mut store = FileStagingStore::new();
        store.set_inputs(files(&["1.jpg", "2.jpg", "3.jpg"]));
        assert_eq!(store.live_bindings(), 3);

        store.set_inputs(files(&["4.jpg"]));
        assert_eq!(store.input_count(), 1);
        assert_eq!(store.live_bindings(), 1);
        assert_eq!(store.drain_released().len(), 3);
    }

    #[test]
    fn test_inputs_keep_order_and_duplicates() {
        let mut store = FileStagingStore::new();
        store.set_inputs(files(&["b.jpg", "a.jpg", "b.jpg"]));

        let names: Vec<String> = store.input_files().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["b.jpg", "a.jpg", "b.jpg"]);
        assert_eq!(store.live_bindings(), 3);
    }

    #[test]
    fn test_live_bindings_track_staged_files_across_changes() {
        let mut store = FileStagingStore::new();
        for round in 0..20 {
            store.set_target(Some(StagedFile::new(format!("/t/{}.jpg", round))));
            let batch: Vec<StagedFile> = (0..round % 7)
                .map(|i| StagedFile::new(format!("/c/{}.jpg", i)))
                .collect();
            store.set_inputs(batch);
            assert_eq!(store.live_bindings(), store.staged_count());
        }

        store.clear();
        assert_eq!(store.live_bindings(), 0);
        assert_eq!(store.staged_count(), 0);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut store = FileStagingStore::new();
        store.set_target(Some(StagedFile::new("/photos/face.jpg")));
        store.set_inputs(files(&["1.jpg", "2.jpg"]));

        store.clear();
        assert_eq!(store.live_bindings(), 0);
        assert_eq!(store.drain_released().len(), 3);
        assert!(store.drain_released().is_empty());
    }

    #[test]
    fn test_visible_inputs_capped_at_twelve() {
        let mut store = FileStagingStore::new();
        let batch: Vec<StagedFile> = (0..13)
            .map(|i| StagedFile::new(format!("/c/{}.jpg", i)))
            .collect();
        store.set_inputs(batch);

        assert_eq!(store.visible_inputs().len(), 12);
        assert_eq!(store.hidden_input_count(), 1);
        assert_eq!(store.input_files().len(), 13);
    }

    #[test]
    fn test_binding_urls_are_unique() {
        let mut store = FileStagingStore::new();
        store.set_inputs(files(&["same.jpg", "same.jpg"]));

        let urls: Vec<&str> = store.inputs().iter().map(|s| s.binding().url()).collect();
        assert_ne!(urls[0], urls[1]);
    }
}
