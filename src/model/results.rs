//! Result Presentation
//!
//! Tab, selection and download state for a finished job. Everything shown is
//! derived from the active tab and the `JobResult`; the presenter never
//! copies result data. Previews that failed to load are remembered so the
//! gallery can draw a placeholder in their place.

use std::collections::HashSet;

use crate::api::{Endpoint, JobResult};

/// Thumbnails offered inline per tab; the archive has the rest
pub const MAX_INLINE_PREVIEWS: usize = 24;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResultTab {
    #[default]
    Matched,
    NotMatched,
}

impl ResultTab {
    pub fn toggle(self) -> Self {
        match self {
            ResultTab::Matched => ResultTab::NotMatched,
            ResultTab::NotMatched => ResultTab::Matched,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResultTab::Matched => "Matched",
            ResultTab::NotMatched => "Not Matched",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResultTab::Matched => "Matched Preview",
            ResultTab::NotMatched => "Not Matched Preview",
        }
    }

    pub fn partition(&self) -> Partition {
        match self {
            ResultTab::Matched => Partition::Matched,
            ResultTab::NotMatched => Partition::NotMatched,
        }
    }
}

/// One half of a job's output
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Partition {
    Matched,
    NotMatched,
}

impl Partition {
    /// Path segment in the download endpoint
    pub fn as_path(&self) -> &'static str {
        match self {
            Partition::Matched => "matched",
            Partition::NotMatched => "not_matched",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Partition::Matched => "Matched",
            Partition::NotMatched => "Not Matched",
        }
    }

    pub fn previews<'a>(&self, result: &'a JobResult) -> &'a [String] {
        match self {
            Partition::Matched => &result.matched_preview_urls,
            Partition::NotMatched => &result.not_matched_preview_urls,
        }
    }

    fn has_archive(&self, result: &JobResult) -> bool {
        let url = match self {
            Partition::Matched => &result.matched_zip_url,
            Partition::NotMatched => &result.not_matched_zip_url,
        };
        url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadLink {
    pub partition: Partition,
    pub run_id: String,
    pub url: String,
}

/// What to draw for a preview
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewSource<'a> {
    Remote(&'a str),
    Placeholder,
}

#[derive(Clone, Debug, Default)]
pub struct ResultPresenter {
    active_tab: ResultTab,
    selected: usize,
    failed_previews: HashSet<String>,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the matched tab with nothing selected (new selection or new job)
    pub fn reset(&mut self) {
        self.active_tab = ResultTab::Matched;
        self.selected = 0;
        self.failed_previews.clear();
    }

    pub fn active_tab(&self) -> ResultTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: ResultTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.selected = 0;
        }
    }

    pub fn toggle_tab(&mut self) {
        self.set_tab(self.active_tab.toggle());
    }

    pub fn title(&self) -> &'static str {
        self.active_tab.title()
    }

    /// Inline previews for the active tab
    pub fn active_previews<'a>(&self, result: &'a JobResult) -> &'a [String] {
        let all = self.active_tab.partition().previews(result);
        let (shown, _) = crate::logic::preview::split_visible(all.len(), MAX_INLINE_PREVIEWS);
        &all[..shown]
    }

    /// Previews of the active tab only reachable through the archive
    pub fn hidden_preview_count(&self, result: &JobResult) -> usize {
        let all = self.active_tab.partition().previews(result);
        crate::logic::preview::split_visible(all.len(), MAX_INLINE_PREVIEWS).1
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_preview<'a>(&self, result: &'a JobResult) -> Option<&'a str> {
        self.active_previews(result).get(self.selected).map(String::as_str)
    }

    pub fn select_next(&mut self, result: &JobResult) {
        let len = self.active_previews(result).len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Record that a remote preview could not be loaded
    pub fn mark_failed(&mut self, url: &str) {
        self.failed_previews.insert(url.to_string());
    }

    pub fn preview_source<'a>(&self, url: &'a str) -> PreviewSource<'a> {
        if self.failed_previews.contains(url) {
            PreviewSource::Placeholder
        } else {
            PreviewSource::Remote(url)
        }
    }

    /// Archive downloads advertised by the result
    pub fn downloads(&self, result: &JobResult, endpoint: &Endpoint) -> Vec<DownloadLink> {
        [Partition::Matched, Partition::NotMatched]
            .into_iter()
            .filter(|p| p.has_archive(result))
            .map(|partition| DownloadLink {
                partition,
                run_id: result.run_id.clone(),
                url: endpoint.download_url(&result.run_id, partition),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(matched: usize, not_matched: usize) -> JobResult {
        JobResult {
            run_id: "run-1".to_string(),
            matched_count: matched as u64,
            not_matched_count: not_matched as u64,
            total_scanned: (matched + not_matched) as u64,
            matched_preview_urls: (0..matched).map(|i| format!("http://h/m/{}.jpg", i)).collect(),
            not_matched_preview_urls: (0..not_matched)
                .map(|i| format!("http://h/n/{}.jpg", i))
                .collect(),
            ..JobResult::default()
        }
    }

    #[test]
    fn test_defaults_to_matched_tab() {
        let presenter = ResultPresenter::new();
        assert_eq!(presenter.active_tab(), ResultTab::Matched);
        assert_eq!(presenter.title(), "Matched Preview");
    }

    #[test]
    fn test_active_list_follows_tab() {
        let result = result_with(3, 2);
        let mut presenter = ResultPresenter::new();
        assert_eq!(presenter.active_previews(&result).len(), 3);

        presenter.toggle_tab();
        assert_eq!(presenter.title(), "Not Matched Preview");
        assert_eq!(presenter.active_previews(&result).len(), 2);
        assert_eq!(presenter.active_previews(&result)[0], "http://h/n/0.jpg");
    }

    #[test]
    fn test_inline_previews_capped() {
        let result = result_with(30, 0);
        let presenter = ResultPresenter::new();

        assert_eq!(presenter.active_previews(&result).len(), MAX_INLINE_PREVIEWS);
        assert_eq!(presenter.hidden_preview_count(&result), 6);
    }

    #[test]
    fn test_selection_bounded_and_reset_on_tab_change() {
        let result = result_with(2, 5);
        let mut presenter = ResultPresenter::new();
        presenter.select_next(&result);
        presenter.select_next(&result);
        assert_eq!(presenter.selected_index(), 1);
        assert_eq!(presenter.selected_preview(&result), Some("http://h/m/1.jpg"));

        presenter.toggle_tab();
        assert_eq!(presenter.selected_index(), 0);

        presenter.select_previous();
        assert_eq!(presenter.selected_index(), 0);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let result = result_with(2, 2);
        let mut presenter = ResultPresenter::new();
        presenter.toggle_tab();
        presenter.select_next(&result);
        presenter.mark_failed("http://h/n/1.jpg");

        presenter.reset();
        assert_eq!(presenter.active_tab(), ResultTab::Matched);
        assert_eq!(presenter.selected_index(), 0);
        assert_eq!(
            presenter.preview_source("http://h/n/1.jpg"),
            PreviewSource::Remote("http://h/n/1.jpg")
        );
    }

    #[test]
    fn test_failed_preview_uses_placeholder_without_touching_result() {
        let result = result_with(2, 0);
        let mut presenter = ResultPresenter::new();
        presenter.mark_failed("http://h/m/0.jpg");

        assert_eq!(presenter.preview_source("http://h/m/0.jpg"), PreviewSource::Placeholder);
        assert_eq!(presenter.active_previews(&result).len(), 2);
    }

    #[test]
    fn test_downloads_only_for_present_archives() {
        let endpoint = Endpoint::parse("http://svc").unwrap();
        let mut result = result_with(1, 1);
        let presenter = ResultPresenter::new();
        assert!(presenter.downloads(&result, &endpoint).is_empty());

        result.matched_zip_url = Some("http://svc/download/run-1/matched".to_string());
        let links = presenter.downloads(&result, &endpoint);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].partition, Partition::Matched);
        assert_eq!(links[0].url, "http://svc/download/run-1/matched");

        result.not_matched_zip_url = Some("anything".to_string());
        let links = presenter.downloads(&result, &endpoint);
        assert_eq!(links[1].url, "http://svc/download/run-1/not_matched");
    }
}
