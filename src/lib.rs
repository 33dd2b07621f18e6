//! # CanteenApps
//!
//! Headless runtime for the CanteenApps canteen admin dashboard. The
//! page shell is an HTML document held in memory; shared fragments and
//! page bodies are loaded into it, components attach to their mount
//! points, and a hash router keeps exactly one page active.
//!
//! ## Modules
//!
//! - [`document`]: Arena document model, parser and serializer
//! - [`fragment`]: Fragment sources and the concurrent fragment loader
//! - [`registry`]: Component lifecycle (register, init, update, destroy)
//! - [`navigation`]: Page tokens and the navigation state machine
//! - [`components`]: Navbar, sidebar and dashboard components
//! - [`app`]: Session context, boot sequence and event dispatch
//! - [`preview`]: HTTP preview server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canteen::app::{AppContext, CanteenApp, UiEvent};
//! use canteen::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let source = config.assets.fragment_source()?;
//!     let shell = config.assets.shell_html();
//!
//!     let ctx = AppContext::new(config, &shell, source)?;
//!     let mut app = CanteenApp::new(ctx);
//!     app.boot("#dashboard").await?;
//!
//!     app.dispatch("hash:menu".parse::<UiEvent>()?).await?;
//!     println!("{:?}", app.context().navigator.current().await);
//!
//!     app.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod components;
pub mod config;
pub mod data;
pub mod document;
pub mod format;
pub mod fragment;
pub mod logging;
pub mod navigation;
pub mod notification;
pub mod preview;
pub mod registry;
pub mod toast;

// Re-export top-level types for convenience
pub use app::{AppContext, AppError, AppResult, BootReport, CanteenApp, UiEvent};

pub use document::{Document, NodeId, SharedDocument};

pub use fragment::{
    DirectorySource, FragmentError, FragmentLoader, FragmentRequest, FragmentSource, HttpSource,
    LoadReport, StaticSource,
};

pub use registry::{
    Capabilities, Component, ComponentError, ComponentRegistry, InitReport, LifecycleState,
};

pub use navigation::{NavigationController, NavigationError, PageState, PageToken};

pub use toast::{ToastCenter, ToastKind};

pub use config::{Config, ConfigError, LoggingConfig};

pub use preview::{build_router, serve, PreviewError, PreviewState};
