//! [`Dom`] over the live browser document.

use navmenu::{Dom, DomError, ScrollBehavior};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, ScrollIntoViewOptions, SvgElement, Window};

fn host_error(operation: &'static str, error: JsValue) -> DomError {
    DomError::Host {
        operation,
        message: error.as_string().unwrap_or_else(|| format!("{error:?}")),
    }
}

#[derive(Debug, Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    /// Binds to the global window. Fails outside a browser main thread.
    pub fn from_global() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or_else(|| DomError::Host {
            operation: "window",
            message: "no global window".to_string(),
        })?;
        let document = window.document().ok_or_else(|| DomError::Host {
            operation: "document",
            message: "window has no document".to_string(),
        })?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
        self.document
            .query_selector(selector)
            .map_err(|error| host_error("querySelector", error))
    }

    fn query_selector_all(&self, root: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        let list = root
            .query_selector_all(selector)
            .map_err(|error| host_error("querySelectorAll", error))?;
        Ok((0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        ancestor.contains(Some(node.as_ref()))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list()
            .add_1(class)
            .map_err(|error| host_error("classList.add", error))
    }

    fn remove_class(&mut self, node: &Element, class: &str) -> Result<(), DomError> {
        node.class_list()
            .remove_1(class)
            .map_err(|error| host_error("classList.remove", error))
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) -> Result<(), DomError> {
        node.set_attribute(name, value)
            .map_err(|error| host_error("setAttribute", error))
    }

    /// HTML and SVG elements (e.g. an SVG `<a>` in the panel) are focusable.
    fn focus(&mut self, node: &Element) -> Result<(), DomError> {
        let focused = if let Some(element) = node.dyn_ref::<HtmlElement>() {
            element.focus()
        } else if let Some(element) = node.dyn_ref::<SvgElement>() {
            element.focus()
        } else {
            return Err(DomError::Host {
                operation: "focus",
                message: format!("{} is neither an HTML nor an SVG element", self.describe(node)),
            });
        };
        focused.map_err(|error| host_error("focus", error))
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn scroll_into_view(&mut self, node: &Element, behavior: ScrollBehavior) -> Result<(), DomError> {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(match behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        node.scroll_into_view_with_scroll_into_view_options(&options);
        Ok(())
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn describe(&self, node: &Element) -> String {
        let mut description = node.tag_name().to_ascii_lowercase();
        let id = node.id();
        if !id.is_empty() {
            description.push('#');
            description.push_str(&id);
        }
        let classes = node.get_attribute("class").unwrap_or_default();
        for class in classes.split_whitespace() {
            description.push('.');
            description.push_str(class);
        }
        description
    }
}
