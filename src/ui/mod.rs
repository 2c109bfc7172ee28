// UI module - handles all TUI rendering using Ratatui
//
// Architecture:
// - layout: Calculates screen layout (panes, splits, areas)
// - render: Main orchestration function that coordinates all rendering
// - system_bar: Top bar with service endpoint and job state
// - selection: Target face, settings and candidate batch
// - results: Run summary, preview gallery and archive links
// - prompt: Path / glob input box
// - legend: Renders hotkey legend
// - status_bar: Bottom status line
// - toast: Renders toast notifications (brief pop-up messages)

pub mod layout;
pub mod legend;
pub mod prompt;
pub mod render;
pub mod results;
pub mod selection;
pub mod status_bar;
pub mod system_bar;
pub mod toast;

// Re-export main render function for convenience
pub use render::render;
