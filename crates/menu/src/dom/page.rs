//! Declarative page fixtures for [`super::MemoryDom`].
//!
//! A page is described as the children of `<body>`:
//!
//! ```json
//! {
//!   "viewportWidth": 375,
//!   "body": [
//!     { "tag": "button", "id": "hamburger" },
//!     { "tag": "nav", "id": "nav-links", "children": [
//!       { "tag": "a", "attributes": { "href": "#about" } }
//!     ] },
//!     { "tag": "section", "id": "about" }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default viewport: a typical phone in portrait.
const DEFAULT_VIEWPORT_WIDTH: f64 = 375.0;

fn default_viewport_width() -> f64 {
    DEFAULT_VIEWPORT_WIDTH
}

/// A whole page: viewport plus the contents of `<body>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PageSpec {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default)]
    pub body_classes: Vec<String>,
    #[serde(default)]
    pub body: Vec<ElementSpec>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            body_classes: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl PageSpec {
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn viewport_width(mut self, width: f64) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn child(mut self, element: ElementSpec) -> Self {
        self.body.push(element);
        self
    }
}

/// One element and its subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// `<a href="{href}">`.
    pub fn link(href: impl Into<String>) -> Self {
        Self::new("a").attr("href", href)
    }
}
