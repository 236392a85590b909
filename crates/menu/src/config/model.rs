//! Data models for menu configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interactive elements that participate in the focus trap.
pub const DEFAULT_FOCUSABLE_SELECTOR: &str = "a[href], area[href], input:not([disabled]), select:not([disabled]), \
                                              textarea:not([disabled]), button:not([disabled]), iframe, object, embed, \
                                              [contenteditable], [tabindex]:not([tabindex=\"-1\"])";

/// Complete controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuConfig {
    pub selectors: MenuSelectors,
    pub classes: MenuClasses,
    pub timings: MenuTimings,
    pub thresholds: MenuThresholds,
}

/// How the controller finds the elements it manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuSelectors {
    /// Id of the hamburger button.
    pub trigger_id: String,
    /// Id of the collapsible panel.
    pub panel_id: String,
    /// Document-level selector for the element carrying the no-scroll marker.
    pub body: String,
    /// Optional id of a logo/brand element that toggles the menu without
    /// animation bookkeeping.
    pub logo_id: Option<String>,
    /// Selector, relative to the panel, for links that scroll to a section.
    pub links: String,
    /// Selector, relative to the panel, for the focus trap members.
    pub focusable: String,
}

impl Default for MenuSelectors {
    fn default() -> Self {
        Self {
            trigger_id: "hamburger".to_string(),
            panel_id: "nav-links".to_string(),
            body: "body".to_string(),
            logo_id: None,
            links: "a".to_string(),
            focusable: DEFAULT_FOCUSABLE_SELECTOR.to_string(),
        }
    }
}

/// Marker classes written by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuClasses {
    /// Set on the panel while the menu is open. This is the menu state.
    pub open: String,
    /// Set on the trigger while the menu is open.
    pub active: String,
    /// Set on the body while the menu is open.
    pub no_scroll: String,
}

impl Default for MenuClasses {
    fn default() -> Self {
        Self {
            open: "open".to_string(),
            active: "active".to_string(),
            no_scroll: "no-scroll".to_string(),
        }
    }
}

/// Timer durations, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuTimings {
    /// Length of the open/close CSS transition; toggles are locked out for
    /// this long.
    pub transition_ms: u64,
    /// Settling delay applied to window resize events.
    pub resize_debounce_ms: u64,
}

impl MenuTimings {
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

impl Default for MenuTimings {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            resize_debounce_ms: 150,
        }
    }
}

/// Gesture and layout thresholds, in CSS pixels. Both are exclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct MenuThresholds {
    /// Downward swipe distance beyond which the menu closes.
    pub swipe_px: f64,
    /// Viewport width beyond which the menu closes on resize.
    pub breakpoint_px: f64,
}

impl Default for MenuThresholds {
    fn default() -> Self {
        Self {
            swipe_px: 50.0,
            breakpoint_px: 768.0,
        }
    }
}
