//! UI Model
//!
//! This sub-model contains state that only the terminal surface needs:
//! the path prompt, image rendering hints and the quit flag. Job state lives
//! in `SortWorkflow`.

/// What the path prompt is collecting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// A single target image path
    Target,
    /// Whitespace-separated candidate paths or glob patterns
    Images,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            PromptKind::Target => "Target face (path)",
            PromptKind::Images => "Images to scan (paths or globs)",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
}

/// UI preferences and transient surface state
#[derive(Clone, Debug)]
pub struct UiModel {
    /// Open path prompt, if any (receives keystrokes)
    pub prompt: Option<PromptState>,

    /// Last value submitted per prompt, offered again on reopen
    pub last_target_input: String,
    pub last_images_input: String,

    /// Sixel cleanup counter (clear the screen for N frames)
    pub sixel_cleanup_frames: u8,

    /// Whether app should quit
    pub should_quit: bool,
}

impl Default for UiModel {
    fn default() -> Self {
        Self::new()
    }
}

impl UiModel {
    pub fn new() -> Self {
        Self {
            prompt: None,
            last_target_input: String::new(),
            last_images_input: String::new(),
            sixel_cleanup_frames: 0,
            should_quit: false,
        }
    }

    /// Open the prompt prefilled with what was entered last time
    pub fn open_prompt(&mut self, kind: PromptKind) {
        let input = match kind {
            PromptKind::Target => self.last_target_input.clone(),
            PromptKind::Images => self.last_images_input.clone(),
        };
        self.prompt = Some(PromptState { kind, input });
    }

    /// Close the prompt, returning what was typed; remembered for next time
    pub fn take_prompt(&mut self) -> Option<PromptState> {
        let prompt = self.prompt.take()?;
        match prompt.kind {
            PromptKind::Target => self.last_target_input = prompt.input.clone(),
            PromptKind::Images => self.last_images_input = prompt.input.clone(),
        }
        Some(prompt)
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    pub fn has_prompt(&self) -> bool {
        self.prompt.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_model_creation() {
        let model = UiModel::new();
        assert!(!model.has_prompt());
        assert!(!model.should_quit);
    }

    #[test]
    fn test_prompt_remembers_last_input() {
        let mut model = UiModel::new();
        model.open_prompt(PromptKind::Images);
        model.prompt.as_mut().unwrap().input.push_str("~/photos/*.jpg");

        let prompt = model.take_prompt().unwrap();
        assert_eq!(prompt.kind, PromptKind::Images);
        assert!(!model.has_prompt());

        model.open_prompt(PromptKind::Images);
        assert_eq!(model.prompt.as_ref().unwrap().input, "~/photos/*.jpg");

        model.open_prompt(PromptKind::Target);
        assert_eq!(model.prompt.as_ref().unwrap().input, "");
    }

    #[test]
    fn test_cancel_prompt_forgets_input() {
        let mut model = UiModel::new();
        model.open_prompt(PromptKind::Target);
        model.prompt.as_mut().unwrap().input.push_str("/tmp/me.jpg");
        model.cancel_prompt();

        model.open_prompt(PromptKind::Target);
        assert_eq!(model.prompt.as_ref().unwrap().input, "");
    }
}
