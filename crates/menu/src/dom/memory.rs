//! In-memory document used by tests and the simulator.

use indexmap::{IndexMap, IndexSet};
use navmenu_util::{SelectorList, SelectorTarget};
use serde::Serialize;

use super::page::{ElementSpec, PageSpec};
use super::{Dom, ScrollBehavior};
use crate::error::DomError;

/// Handle to an element of a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// One recorded `scroll_into_view` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrollRecord {
    pub node: NodeId,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    attributes: IndexMap<String, String>,
    classes: IndexSet<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: IndexMap::new(),
            classes: IndexSet::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

impl SelectorTarget for ElementData {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        if name == "class" {
            return None;
        }
        self.attributes.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A minimal element tree with focus, scroll and viewport tracking.
///
/// Writes and selector queries can be made to fail on demand with
/// [`MemoryDom::set_fail_writes`] and [`MemoryDom::set_fail_queries`], which
/// is how the controller's fault handling is exercised.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    elements: Vec<ElementData>,
    root: NodeId,
    body: NodeId,
    focused: Option<NodeId>,
    scrolls: Vec<ScrollRecord>,
    viewport_width: f64,
    fail_writes: bool,
    fail_queries: bool,
    mutations: usize,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// An empty `<html><body></body></html>` document.
    pub fn new() -> Self {
        let mut dom = Self {
            elements: vec![ElementData::new("html")],
            root: NodeId(0),
            body: NodeId(0),
            focused: None,
            scrolls: Vec::new(),
            viewport_width: 375.0,
            fail_writes: false,
            fail_queries: false,
            mutations: 0,
        };
        dom.body = dom.insert(dom.root, ElementData::new("body"));
        dom
    }

    /// Builds a document from a page fixture.
    pub fn from_page(page: &PageSpec) -> Self {
        let mut dom = Self::new();
        dom.viewport_width = page.viewport_width;
        for class in &page.body_classes {
            dom.elements[dom.body.0].classes.insert(class.clone());
        }
        let body = dom.body;
        for element in &page.body {
            dom.append(body, element);
        }
        dom
    }

    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::from_page(&PageSpec::from_json_str(content)?))
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Appends `spec` and its subtree as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, spec: &ElementSpec) -> NodeId {
        let mut data = ElementData::new(&spec.tag);
        if let Some(id) = &spec.id {
            data.attributes.insert("id".to_string(), id.clone());
        }
        for (name, value) in &spec.attributes {
            data.attributes.insert(name.clone(), value.clone());
        }
        data.classes.extend(spec.classes.iter().cloned());

        let node = self.insert(parent, data);
        for child in &spec.children {
            self.append(node, child);
        }
        node
    }

    /// Detaches `node` (and its subtree) from the document.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(parent) = self.elements[node.0].parent.take() {
            self.elements[parent.0].children.retain(|child| *child != node);
        }
        if self.focused.is_some_and(|focused| !self.is_attached(focused)) {
            self.focused = None;
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// While enabled, every mutating call returns a host error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// While enabled, `query_selector` and `query_selector_all` return a
    /// host error.
    pub fn set_fail_queries(&mut self, fail: bool) {
        self.fail_queries = fail;
    }

    /// Number of successful mutating calls so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn tag(&self, node: NodeId) -> &str {
        &self.elements[node.0].tag
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.elements[node.0].children
    }

    fn insert(&mut self, parent: NodeId, mut data: ElementData) -> NodeId {
        let node = NodeId(self.elements.len());
        data.parent = Some(parent);
        self.elements.push(data);
        self.elements[parent.0].children.push(node);
        node
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.contains(&self.root, &node)
    }

    /// Descendants of `root` in document order, excluding `root`.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut stack: Vec<NodeId> = self.elements[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            ordered.push(node);
            stack.extend(self.elements[node.0].children.iter().rev().copied());
        }
        ordered
    }

    fn parse_query(&self, operation: &'static str, selector: &str) -> Result<SelectorList, DomError> {
        if self.fail_queries {
            return Err(DomError::Host {
                operation,
                message: "injected query failure".to_string(),
            });
        }
        Ok(SelectorList::parse(selector)?)
    }

    fn write(&mut self, operation: &'static str, node: NodeId) -> Result<(), DomError> {
        if self.fail_writes {
            return Err(DomError::Host {
                operation,
                message: "injected write failure".to_string(),
            });
        }
        if !self.is_attached(node) {
            return Err(DomError::Detached { node: self.describe(&node) });
        }
        self.mutations += 1;
        Ok(())
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.elements[node.0].attributes.get("id").is_some_and(|value| value == id))
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        let list = self.parse_query("querySelector", selector)?;
        if list.matches(&self.elements[self.root.0]) {
            return Ok(Some(self.root));
        }
        Ok(self.descendants(self.root).into_iter().find(|node| list.matches(&self.elements[node.0])))
    }

    fn query_selector_all(&self, root: &NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let list = self.parse_query("querySelectorAll", selector)?;
        Ok(self
            .descendants(*root)
            .into_iter()
            .filter(|node| list.matches(&self.elements[node.0]))
            .collect())
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(candidate) = current {
            if candidate == *ancestor {
                return true;
            }
            current = self.elements[candidate.0].parent;
        }
        false
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements[node.0].classes.contains(class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        self.write("add_class", *node)?;
        self.elements[node.0].classes.insert(class.to_string());
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> Result<(), DomError> {
        self.write("remove_class", *node)?;
        self.elements[node.0].classes.shift_remove(class);
        Ok(())
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        let element = &self.elements[node.0];
        if name == "class" {
            if element.classes.is_empty() {
                return None;
            }
            return Some(element.classes.iter().map(String::as_str).collect::<Vec<_>>().join(" "));
        }
        element.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.write("set_attribute", *node)?;
        self.elements[node.0].attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn focus(&mut self, node: &NodeId) -> Result<(), DomError> {
        self.write("focus", *node)?;
        self.focused = Some(*node);
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        Some(self.focused.unwrap_or(self.body))
    }

    fn scroll_into_view(&mut self, node: &NodeId, behavior: ScrollBehavior) -> Result<(), DomError> {
        self.write("scroll_into_view", *node)?;
        self.scrolls.push(ScrollRecord { node: *node, behavior });
        Ok(())
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn describe(&self, node: &NodeId) -> String {
        let element = &self.elements[node.0];
        let mut description = element.tag.clone();
        if let Some(id) = element.attributes.get("id") {
            description.push('#');
            description.push_str(id);
        }
        for class in &element.classes {
            description.push('.');
            description.push_str(class);
        }
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryDom {
        let page = PageSpec::default()
            .child(ElementSpec::new("button").id("hamburger"))
            .child(
                ElementSpec::new("nav")
                    .id("nav-links")
                    .child(ElementSpec::new("ul").child(ElementSpec::new("li").child(ElementSpec::link("#about"))))
                    .child(ElementSpec::new("button").attr("disabled", "")),
            )
            .child(ElementSpec::new("section").id("about"));
        MemoryDom::from_page(&page)
    }

    #[test]
    fn test_lookup_by_id_and_selector() {
        let dom = sample();
        let nav = dom.element_by_id("nav-links").unwrap();
        assert_eq!(dom.tag(nav), "nav");
        assert_eq!(dom.query_selector("body").unwrap(), Some(dom.body()));
        assert_eq!(dom.query_selector("html").unwrap(), Some(NodeId(0)));
        assert_eq!(dom.element_by_id("missing"), None);
    }

    #[test]
    fn test_query_all_is_document_ordered_descendants() {
        let dom = sample();
        let nav = dom.element_by_id("nav-links").unwrap();
        let all = dom.query_selector_all(&nav, "*").unwrap();
        let tags: Vec<_> = all.iter().map(|node| dom.tag(*node)).collect();
        assert_eq!(tags, vec!["ul", "li", "a", "button"]);

        let enabled = dom.query_selector_all(&nav, "a[href], button:not([disabled])").unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(dom.tag(enabled[0]), "a");
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let dom = sample();
        assert!(matches!(dom.query_selector("nav a"), Err(DomError::Selector(_))));
    }

    #[test]
    fn test_containment_is_inclusive() {
        let dom = sample();
        let nav = dom.element_by_id("nav-links").unwrap();
        let link = dom.query_selector_all(&nav, "a").unwrap()[0];
        let trigger = dom.element_by_id("hamburger").unwrap();
        assert!(dom.contains(&nav, &link));
        assert!(dom.contains(&nav, &nav));
        assert!(!dom.contains(&nav, &trigger));
    }

    #[test]
    fn test_toggle_class_only_writes_on_change() {
        let mut dom = sample();
        let trigger = dom.element_by_id("hamburger").unwrap();

        assert!(dom.toggle_class(&trigger, "active", None).unwrap());
        assert!(dom.toggle_class(&trigger, "active", Some(true)).unwrap());
        assert_eq!(dom.mutation_count(), 1);
        assert!(!dom.toggle_class(&trigger, "active", None).unwrap());
        assert_eq!(dom.mutation_count(), 2);
        assert_eq!(dom.describe(&trigger), "button#hamburger");
    }

    #[test]
    fn test_injected_failures_and_detached_nodes() {
        let mut dom = sample();
        let trigger = dom.element_by_id("hamburger").unwrap();

        dom.set_fail_writes(true);
        assert!(matches!(dom.focus(&trigger), Err(DomError::Host { operation: "focus", .. })));
        dom.set_fail_writes(false);

        dom.set_fail_queries(true);
        let nav = dom.element_by_id("nav-links").unwrap();
        assert!(matches!(
            dom.query_selector_all(&nav, "a"),
            Err(DomError::Host { operation: "querySelectorAll", .. })
        ));
        assert!(matches!(dom.query_selector("body"), Err(DomError::Host { operation: "querySelector", .. })));
        dom.set_fail_queries(false);
        assert_eq!(dom.query_selector_all(&nav, "a").unwrap().len(), 1);

        dom.focus(&trigger).unwrap();
        assert_eq!(dom.active_element(), Some(trigger));
        dom.remove(trigger);
        assert_eq!(dom.active_element(), Some(dom.body()));
        assert!(matches!(dom.add_class(&trigger, "active"), Err(DomError::Detached { .. })));
        assert_eq!(dom.element_by_id("hamburger"), None);
    }

    #[test]
    fn test_page_from_json() {
        let json = r##"{
            "viewportWidth": 1280,
            "bodyClasses": ["home"],
            "body": [
                { "tag": "nav", "id": "nav-links", "classes": ["open"], "children": [
                    { "tag": "a", "attributes": { "href": "#top" } }
                ] }
            ]
        }"##;
        let dom = MemoryDom::from_json_str(json).unwrap();
        let nav = dom.element_by_id("nav-links").unwrap();
        assert_eq!(dom.viewport_width(), 1280.0);
        assert!(dom.has_class(&dom.body(), "home"));
        assert!(dom.has_class(&nav, "open"));
        assert_eq!(dom.attribute(&nav, "class").as_deref(), Some("open"));
        let link = dom.children(nav)[0];
        assert_eq!(dom.attribute(&link, "href").as_deref(), Some("#top"));
    }
}
