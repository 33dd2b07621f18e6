//! In-Memory Document
//!
//! An arena-backed element tree standing in for the browser DOM. Fragments
//! are parsed into it, components mutate it through existence-checked
//! operations, and it serializes back to HTML for rendering.
//!
//! Every mutation addressed at a missing node is a no-op that returns
//! `false`; callers never have to handle a "missing element" error.

mod node;
mod parse;

pub use node::{escape_text, unescape_text, Element, NodeId, NodeKind};
pub use parse::{tokenize, Token};

use node::{is_void, Node};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Document shared between the loader, components and the navigator
pub type SharedDocument = Arc<RwLock<Document>>;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena tree of element and text nodes under a synthetic root
///
/// Freed slots go on a free list and are reused by later allocations.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Element(Element::new("#root")),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Slot {
                generation: 0,
                node: Some(root),
            }],
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        }
    }

    /// Parse a full document from markup
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        doc.insert_markup(root, html);
        doc
    }

    /// Wrap the document for sharing across tasks
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the handle still points at a live node
    pub fn contains(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    /// Number of arena slots, live or free
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).and_then(Node::element)
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).and_then(Node::element_mut)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// All live element ids in document order
    fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(from).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    fn find_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(&predicate))
            .collect()
    }

    /// First element whose `id` attribute matches
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.element(*n).and_then(Element::id) == Some(id))
    }

    /// Elements carrying a class, in document order
    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all(|e| e.has_class(class))
    }

    /// First element with the class and an exact attribute value,
    /// the equivalent of `.class[attr="value"]`
    pub fn find_by_attr(&self, class: &str, attr: &str, value: &str) -> Option<NodeId> {
        self.find_all(|e| e.has_class(class) && e.attr(attr) == Some(value))
            .into_iter()
            .next()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.attr(name))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    /// Whether `node` sits inside `ancestor` (or is it)
    pub fn is_within(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        match self.element_mut(id) {
            Some(e) => {
                e.add_class(class);
                true
            }
            None => false,
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        match self.element_mut(id) {
            Some(e) => {
                e.remove_class(class);
                true
            }
            None => false,
        }
    }

    /// Flip a class; returns the new state, or `None` for a missing node
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Option<bool> {
        let e = self.element_mut(id)?;
        if e.remove_class(class) {
            Some(false)
        } else {
            e.add_class(class);
            Some(true)
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(e) => {
                e.set_attr(name, value);
                true
            }
            None => false,
        }
    }

    /// Returns true when the attribute was present
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id).is_some_and(|e| e.remove_attr(name))
    }

    /// Replace all children with the parsed markup
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.clear_children(id);
        self.insert_markup(id, html);
        true
    }

    /// Append parsed markup after the existing children
    pub fn append_html(&mut self, id: NodeId, html: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.insert_markup(id, html);
        true
    }

    /// Replace all children with a single escaped text node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> bool {
        if self.element(id).is_none() {
            return false;
        }
        self.clear_children(id);
        let text_id = self.alloc(NodeKind::Text(escape_text(text)), Some(id));
        if let Some(node) = self.node_mut(id) {
            node.children.push(text_id);
        }
        true
    }

    /// Detach a node and free its subtree
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        if id == self.root || self.node(id).is_none() {
            return false;
        }
        if let Some(parent) = self.parent(id) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        self.free_subtree(id);
        true
    }

    fn clear_children(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index)
                .filter(|slot| slot.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                stack.extend(node.children);
            }
        }
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let node = Node {
            kind,
            parent,
            children: Vec::new(),
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn insert_markup(&mut self, parent: NodeId, html: &str) {
        let mut stack: Vec<NodeId> = vec![parent];

        for token in tokenize(html) {
            let current = *stack.last().unwrap_or(&parent);
            match token {
                Token::Text(text) => {
                    let id = self.alloc(NodeKind::Text(text), Some(current));
                    self.push_child(current, id);
                }
                Token::Start {
                    tag,
                    attrs,
                    self_closing,
                } => {
                    let element = Element::from_attrs(&tag, attrs);
                    let id = self.alloc(NodeKind::Element(element), Some(current));
                    self.push_child(current, id);
                    if !self_closing && !is_void(&tag) {
                        stack.push(id);
                    }
                }
                Token::End { tag } => {
                    // Never pop the insertion parent itself
                    let matching = stack
                        .iter()
                        .enumerate()
                        .skip(1)
                        .rev()
                        .find(|(_, id)| self.element(**id).is_some_and(|e| e.tag == tag))
                        .map(|(i, _)| i);
                    if let Some(index) = matching {
                        stack.truncate(index);
                    }
                }
            }
        }
    }

    fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    /// Markup of the node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Markup of the node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Markup of the whole document
    pub fn to_html(&self) -> String {
        self.inner_html(self.root)
    }

    /// Unescaped concatenation of all text below the node
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in std::iter::once(id).chain(self.descendants(id)) {
            if let Some(Node {
                kind: NodeKind::Text(text),
                ..
            }) = self.node(node)
            {
                out.push_str(&unescape_text(text));
            }
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(element) => {
                element.write_open_tag(out);
                if is_void(&element.tag) {
                    return;
                }
                for child in &node.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHELL: &str = r#"
        <div id="appContainer" class="hidden">
            <div id="navbarContainer"></div>
            <main>
                <section id="dashboardPage" class="page"></section>
                <section id="menuPage" class="page hidden"></section>
            </main>
            <div id="toastContainer"></div>
        </div>
    "#;

    #[test]
    fn test_parse_and_lookup() {
        let doc = Document::parse(SHELL);
        let app = doc.element_by_id("appContainer").unwrap();
        assert!(doc.has_class(app, "hidden"));

        let pages = doc.elements_by_class("page");
        assert_eq!(pages.len(), 2);
        assert_eq!(doc.attr(pages[0], "id"), Some("dashboardPage"));
        assert_eq!(doc.attr(pages[1], "id"), Some("menuPage"));
        assert!(doc.is_within(pages[1], app));
    }

    #[test]
    fn test_set_inner_html_replaces_subtree() {
        let mut doc = Document::parse(SHELL);
        let nav = doc.element_by_id("navbarContainer").unwrap();

        assert!(doc.set_inner_html(nav, r#"<nav id="navbar"><span id="userName"></span></nav>"#));
        assert!(doc.element_by_id("navbar").is_some());
        let old = doc.element_by_id("userName").unwrap();

        assert!(doc.set_inner_html(nav, "<p>kosong</p>"));
        assert!(doc.element_by_id("navbar").is_none());
        assert!(!doc.contains(old));
        assert_eq!(doc.inner_html(nav), "<p>kosong</p>");
    }

    #[test]
    fn test_mutations_on_missing_nodes_are_noops() {
        let mut doc = Document::parse(SHELL);
        let nav = doc.element_by_id("navbarContainer").unwrap();
        doc.remove_node(nav);

        assert!(!doc.add_class(nav, "x"));
        assert!(!doc.set_text(nav, "x"));
        assert!(!doc.set_inner_html(nav, "<b>x</b>"));
        assert_eq!(doc.toggle_class(nav, "x"), None);
        assert!(!doc.remove_node(nav));
    }

    #[test]
    fn test_toggle_class() {
        let mut doc = Document::parse(r#"<aside class="sidebar"></aside>"#);
        let sidebar = doc.elements_by_class("sidebar")[0];
        assert_eq!(doc.toggle_class(sidebar, "open"), Some(true));
        assert_eq!(doc.toggle_class(sidebar, "open"), Some(false));
    }

    #[test]
    fn test_find_by_attr() {
        let doc = Document::parse(
            r##"<a class="menu-item" href="#dashboard">D</a><a class="menu-item" href="#menu">M</a>"##,
        );
        let item = doc.find_by_attr("menu-item", "href", "#menu").unwrap();
        assert_eq!(doc.text_content(item), "M");
        assert!(doc.find_by_attr("menu-item", "href", "#orders").is_none());
    }

    #[test]
    fn test_set_text_escapes() {
        let mut doc = Document::parse(r#"<span id="t"></span>"#);
        let t = doc.element_by_id("t").unwrap();
        doc.set_text(t, "<b>Rp</b> & co");
        assert_eq!(doc.inner_html(t), "&lt;b&gt;Rp&lt;/b&gt; &amp; co");
        assert_eq!(doc.text_content(t), "<b>Rp</b> & co");
    }

    #[test]
    fn test_unmatched_end_tags_are_tolerated() {
        let doc = Document::parse("<div id=\"a\"><span>x</div></span><p id=\"b\">y</p>");
        let a = doc.element_by_id("a").unwrap();
        let b = doc.element_by_id("b").unwrap();
        assert!(!doc.is_within(b, a));
        assert_eq!(doc.outer_html(a), "<div id=\"a\"><span>x</span></div>");
    }

    #[test]
    fn test_void_elements_serialize_without_end_tag() {
        let doc = Document::parse(r#"<input class="search-input" type="text"><br>"#);
        assert_eq!(
            doc.to_html(),
            r#"<input class="search-input" type="text"><br>"#
        );
    }

    #[test]
    fn test_repeated_set_text_reuses_slots() {
        let mut doc = Document::parse(r#"<span id="clock"></span>"#);
        let clock = doc.element_by_id("clock").unwrap();
        doc.set_text(clock, "08:00");
        let baseline = doc.slot_count();
        for i in 0..10_000 {
            doc.set_text(clock, &format!("{i}"));
        }
        assert_eq!(doc.slot_count(), baseline);
        assert_eq!(doc.text_content(clock), "9999");
    }

    #[test]
    fn test_stale_handle_stays_dead_after_slot_reuse() {
        let mut doc = Document::parse(r#"<div id="m"><p id="old"></p></div>"#);
        let m = doc.element_by_id("m").unwrap();
        let old = doc.element_by_id("old").unwrap();
        doc.set_inner_html(m, r#"<p id="new"></p>"#);
        let new = doc.element_by_id("new").unwrap();

        assert_eq!(old.index, new.index);
        assert!(!doc.contains(old));
        assert!(doc.contains(new));
        assert!(!doc.add_class(old, "active"));
        assert!(!doc.has_class(new, "active"));
        assert!(doc.attr(old, "id").is_none());
    }

    #[test]
    fn test_attribute_ampersands_survive_reparse() {
        let mut doc = Document::parse(r#"<a id="link"></a>"#);
        let link = doc.element_by_id("link").unwrap();
        let value = r#"?q=a&b "kutip" &quot;literal&quot; &amp;"#;
        doc.set_attr(link, "data-href", value);

        let html = doc.to_html();
        assert!(html.contains("&amp;quot;literal&amp;quot;"));
        let reparsed = Document::parse(&html);
        let link = reparsed.element_by_id("link").unwrap();
        assert_eq!(reparsed.attr(link, "data-href"), Some(value));
    }

    #[test]
    fn test_append_html_keeps_existing_children() {
        let mut doc = Document::parse(r#"<div id="toastContainer"><p>1</p></div>"#);
        let c = doc.element_by_id("toastContainer").unwrap();
        doc.append_html(c, "<p>2</p>");
        assert_eq!(doc.inner_html(c), "<p>1</p><p>2</p>");
    }
}
