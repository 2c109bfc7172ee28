//! Application Model
//!
//! State objects for a sort job, each owning its own timers:
//!
//! - **staging**: Target and candidate files, preview bindings
//! - **notification**: Single-slot auto-dismissing notification
//! - **progress**: Synthetic progress indicator
//! - **results**: Tab, selection and downloads for a finished job
//! - **settings**: Matching parameters
//! - **timer**: Owned deadline handles polled by the event loop
//! - **ui**: Terminal-only state (prompt, quit flag)

pub mod notification;
pub mod progress;
pub mod results;
pub mod settings;
pub mod staging;
pub mod timer;
pub mod ui;

pub use notification::{Notification, NotificationKind, NotificationQueue};
pub use progress::ProgressSimulator;
pub use results::{ResultPresenter, ResultTab};
pub use settings::Settings;
pub use staging::{FileStagingStore, StagedFile};
pub use ui::UiModel;
