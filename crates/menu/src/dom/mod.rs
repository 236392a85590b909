//! DOM abstraction.
//!
//! The controller never touches a global document. Everything it reads or
//! writes goes through [`Dom`], so the same state machine runs against the
//! browser (`navmenu-web`) and against [`MemoryDom`] in tests and the
//! simulator.

mod memory;
mod page;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use memory::{MemoryDom, NodeId, ScrollRecord};
pub use page::{ElementSpec, PageSpec};

use crate::error::DomError;

/// Easing requested when scrolling a section into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Auto,
    #[default]
    Smooth,
    Instant,
}

/// Element lookup, class/attribute mutation and focus/scroll capabilities of
/// the host document.
///
/// `Node` is the host's element handle. Equality must mean "same element".
pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    /// First element in document order with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// First element in the document matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, DomError>;

    /// Descendants of `root` matching `selector`, in document order.
    fn query_selector_all(&self, root: &Self::Node, selector: &str) -> Result<Vec<Self::Node>, DomError>;

    /// Inclusive containment: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    fn remove_class(&mut self, node: &Self::Node, class: &str) -> Result<(), DomError>;

    /// Flips `class`, or forces it on/off when `force` is given. Returns
    /// whether the class is present afterwards. Only writes when the class
    /// actually changes.
    fn toggle_class(&mut self, node: &Self::Node, class: &str, force: Option<bool>) -> Result<bool, DomError> {
        let present = self.has_class(node, class);
        let wanted = force.unwrap_or(!present);
        match (present, wanted) {
            (false, true) => self.add_class(node, class)?,
            (true, false) => self.remove_class(node, class)?,
            _ => {}
        }
        Ok(wanted)
    }

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;

    /// Moves keyboard focus to `node`.
    fn focus(&mut self, node: &Self::Node) -> Result<(), DomError>;

    /// The element that currently holds keyboard focus.
    fn active_element(&self) -> Option<Self::Node>;

    fn scroll_into_view(&mut self, node: &Self::Node, behavior: ScrollBehavior) -> Result<(), DomError>;

    /// Layout viewport width in CSS pixels.
    fn viewport_width(&self) -> f64;

    /// Short human-readable description (`button#hamburger.active`) for logs
    /// and snapshots.
    fn describe(&self, node: &Self::Node) -> String;
}
