pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::{OutputFormat, ViewerConfig};
pub use crate::core::gallery::GalleryRuntime;
pub use crate::core::link_service::{LinkBroadcastService, SubscriptionToken};
pub use crate::core::navigation::ItemNavigationIndex;
pub use crate::core::presenter::GalleryPresenter;
pub use crate::core::viewer::ViewerSession;
pub use crate::utils::error::{Result, ViewerError};
