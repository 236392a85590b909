//! # navmenu
//!
//! A headless controller for a collapsible "hamburger" navigation menu.
//!
//! ## Key Features
//!
//! - Toggle with an animation lock matched to the CSS transition
//! - Focus trap with Tab/Shift+Tab wraparound and Escape to close
//! - Dismissal on outside click, downward swipe and viewport widening
//! - Smooth scrolling to in-page anchors
//!
//! ## Architecture
//!
//! [`MenuController`] talks to the page only through the [`Dom`] trait and
//! receives input as [`Msg`] values. Work that belongs to the host event loop
//! comes back as [`Effect`]s. [`MemoryDom`] backs tests and the simulator;
//! `navmenu-web` implements [`Dom`] for the browser. With the `runtime`
//! feature, [`MenuRuntime`] hosts the controller on Tokio.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod msg;
#[cfg(feature = "runtime")]
pub mod runtime;
pub mod state;

pub use config::{MenuConfig, load_config_from_path, validate_config};
pub use controller::MenuController;
pub use dom::{Dom, ElementSpec, MemoryDom, NodeId, PageSpec, ScrollBehavior};
pub use error::{ConfigError, DomError, ElementRole, MenuError};
pub use msg::{Effect, Key, KeyInput, Msg, Timer};
#[cfg(feature = "runtime")]
pub use runtime::{Dispatch, MenuRuntime};
pub use state::{MenuSnapshot, MenuState};
