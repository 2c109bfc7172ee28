use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    collections::HashMap,
    io,
    path::PathBuf,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use facesort::api::FaceSortClient;
use facesort::config::{self, Config, API_URL_ENV};
use facesort::model::staging::BindingId;
use facesort::model::UiModel;
use facesort::services::{self, ApiHandle, ApiResponse};
use facesort::workflow::SortWorkflow;

/// Face Sorter TUI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging to the temp dir (facesort-debug.log)
    #[arg(short, long)]
    debug: bool,

    /// Path to config file (default: platform-specific, see docs)
    #[arg(short, long)]
    config: Option<String>,

    /// Sort service base address (overrides api_url from the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Stage this image as the target face on startup
    #[arg(long)]
    target: Option<PathBuf>,

    /// Stage these paths or glob patterns as candidates on startup
    #[arg(long, num_args = 1..)]
    images: Vec<String>,
}

mod app;
mod handlers;
mod ui;
mod utils;

/// Key into the decoded image cache
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PreviewKey {
    /// Local staged file, keyed by its preview binding
    Staged(BindingId),
    /// Remote result preview, keyed by URL
    Remote(String),
}

pub enum ImagePreviewState {
    Loading,
    Ready {
        protocol: ratatui_image::protocol::StatefulProtocol,
        dimensions: (u32, u32),
    },
    Failed {
        reason: String,
    },
}

impl std::fmt::Debug for ImagePreviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImagePreviewState::Loading => write!(f, "ImagePreviewState::Loading"),
            ImagePreviewState::Ready { dimensions, .. } => f
                .debug_struct("ImagePreviewState::Ready")
                .field("dimensions", dimensions)
                .field("protocol", &"<StatefulProtocol>")
                .finish(),
            ImagePreviewState::Failed { reason } => f
                .debug_struct("ImagePreviewState::Failed")
                .field("reason", reason)
                .finish(),
        }
    }
}

pub struct App {
    pub model: UiModel,
    pub workflow: SortWorkflow,

    api: ApiHandle,
    api_rx: mpsc::UnboundedReceiver<ApiResponse>,
    image_picker: Option<ratatui_image::picker::Picker>,
    image_update_tx: mpsc::UnboundedSender<(PreviewKey, ImagePreviewState)>,
    image_update_rx: mpsc::UnboundedReceiver<(PreviewKey, ImagePreviewState)>,

    open_command: String,
    download_dir: PathBuf,

    /// Decoded previews (ImagePreviewState is not Clone, so kept outside the model)
    pub image_state_map: HashMap<PreviewKey, ImagePreviewState>,
}

impl App {
    fn new(config: Config) -> Self {
        let client = FaceSortClient::new();
        let (api, api_rx) = services::spawn_api_service(client);
        let (image_update_tx, image_update_rx) = mpsc::unbounded_channel();

        let endpoint = config.endpoint();
        match &endpoint {
            Some(endpoint) => tracing::info!("Sort service at {}", endpoint),
            None => tracing::warn!("No sort service configured"),
        }

        let image_picker = if config.image_preview_enabled {
            Some(Self::init_picker(&config.image_protocol))
        } else {
            tracing::info!("Image preview disabled in config");
            None
        };


        App {
            model: UiModel::new(),
            workflow: SortWorkflow::new(endpoint, config.settings()),
            api,
            api_rx,
            image_picker,
            image_update_tx,
            image_update_rx,
            open_command: config.open_command(),
            download_dir: config.download_dir(),
            image_state_map: HashMap::new(),
        }
    }

    /// Initialize image preview protocol picker
    fn init_picker(protocol: &str) -> ratatui_image::picker::Picker {
        use ratatui_image::picker::{Picker, ProtocolType};

        let mut picker = match Picker::from_query_stdio() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Image preview: Failed to detect terminal: {}", e);
                Picker::from_fontsize((8, 16))
            }
        };

        match protocol.to_lowercase().as_str() {
            "auto" => tracing::debug!("Image preview: Auto-detected protocol"),
            "iterm2" => picker.set_protocol_type(ProtocolType::Iterm2),
            "kitty" => picker.set_protocol_type(ProtocolType::Kitty),
            "sixel" => picker.set_protocol_type(ProtocolType::Sixel),
            "halfblocks" => picker.set_protocol_type(ProtocolType::Halfblocks),
            unknown => {
                tracing::warn!("Image preview: Unknown protocol '{}', using auto-detect", unknown)
            }
        }

        picker
    }

    pub fn download_dir(&self) -> &std::path::Path {
        &self.download_dir
    }

    fn handle_api_response(&mut self, response: ApiResponse) {
        handlers::handle_api_response(self, response);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        handlers::handle_key(self, key);
    }

    /// Stage whatever was passed on the command line
    fn stage_from_args(&mut self, args: &Args) {
        if let Some(target) = &args.target {
            self.stage_target(&target.display().to_string());
        }
        if !args.images.is_empty() {
            self.stage_image_args(&args.images);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    utils::init_logging(args.debug)?;

    // Determine config file path (missing file means defaults)
    let config_path = config::resolve_config_path(args.config.as_deref())?;
    if let Some(path) = &config_path {
        tracing::info!("Loading config from: {}", path.display());
    }
    let mut config = Config::load(config_path.as_deref())?;
    config.apply_api_url(args.api_url.clone(), std::env::var(API_URL_ENV).ok());

    // Initialize app (queries the terminal for image support before raw mode)
    let mut app = App::new(config);
    app.stage_from_args(&args);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app with error handler
    let result = run_app(&mut terminal, &mut app).await;

    // Cancel timers and release previews before the terminal goes away
    app.workflow.shutdown();

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Return result after cleanup
    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Clear terminal to remove sixel graphics if needed
        if app.model.sixel_cleanup_frames > 0 {
            terminal.clear()?;
            app.model.sixel_cleanup_frames -= 1;
        }

        // Always render (Elm Architecture approach)
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if app.model.should_quit {
            break;
        }

        // Progress ticks, progress reset, notification dismissal
        app.workflow.tick(Instant::now());

        // Process API responses (non-blocking)
        while let Ok(response) = app.api_rx.try_recv() {
            app.handle_api_response(response);
        }

        // Process image updates from background decode tasks (non-blocking)
        while let Ok((key, state)) = app.image_update_rx.try_recv() {
            app.apply_image_update(key, state);
        }

        // Drop decoded images whose staged file is gone
        app.evict_released_previews();

        // Make sure the selected result preview is on its way
        app.ensure_selected_preview();

        // Short poll keeps the progress gauge moving at its tick rate
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}
