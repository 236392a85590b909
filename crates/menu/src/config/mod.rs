//! Configuration for the navigation menu.
//!
//! Every selector, class name, timing and threshold the controller relies on
//! lives in [`MenuConfig`]. Defaults match the stock page markup; pages that
//! use different ids or classes provide a JSON document overriding only the
//! fields they need.

mod io;
mod model;
mod validation;

pub use io::load_config_from_path;
pub use model::{DEFAULT_FOCUSABLE_SELECTOR, MenuClasses, MenuConfig, MenuSelectors, MenuThresholds, MenuTimings};
pub use validation::validate_config;
