//! In-memory document implementing [`Dom`].
//!
//! Elements live in an arena indexed by [`ElementId`]; node 0 is `html` and
//! node 1 is `body`. The selector engine covers what the controller asks
//! for: tag names, `.class`, `[attribute]`, the descendant combinator, and
//! comma-separated groups.

use crate::dom::{Dom, ElementId, EventKind, ListenerId, ObserverId, PageEvent, Target};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: BTreeSet<String>,
    attributes: BTreeMap<String, String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_string(),
            classes: BTreeSet::new(),
            attributes: BTreeMap::new(),
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ListenerRecord {
    id: ListenerId,
    target: Target,
    kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct SimDom {
    nodes: Vec<Node>,
    listeners: Vec<ListenerRecord>,
    next_listener: u64,
    viewport_width: u32,
    scroll_y: u32,
    touch: bool,
    intersection_observer: bool,
    observers: Vec<BTreeSet<ElementId>>,
    emitted: Vec<PageEvent>,
}

impl SimDom {
    /// An empty `html > body` document at the given viewport width, with
    /// touch and intersection observation available.
    pub fn new(viewport_width: u32) -> Self {
        let mut html = Node::new("html", None);
        html.children.push(ElementId(1));
        let body = Node::new("body", Some(ElementId(0)));
        Self {
            nodes: vec![html, body],
            listeners: Vec::new(),
            next_listener: 1,
            viewport_width,
            scroll_y: 0,
            touch: true,
            intersection_observer: true,
            observers: Vec::new(),
            emitted: Vec::new(),
        }
    }

    pub fn body(&self) -> ElementId {
        ElementId(1)
    }

    /// Append a new element under `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str, classes: &[&str]) -> ElementId {
        let id = ElementId(self.nodes.len());
        let mut node = Node::new(tag, Some(parent));
        node.classes = classes.iter().map(|c| c.to_string()).collect();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn tag(&self, el: ElementId) -> &str {
        &self.nodes[el.0].tag
    }

    pub fn classes(&self, el: ElementId) -> Vec<&str> {
        self.nodes[el.0].classes.iter().map(String::as_str).collect()
    }

    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes[el.0].parent
    }

    /// `el` followed by its ancestors up to `html`.
    pub fn path(&self, el: ElementId) -> Vec<ElementId> {
        let mut path = vec![el];
        let mut current = self.nodes[el.0].parent;
        while let Some(p) = current {
            path.push(p);
            current = self.nodes[p.0].parent;
        }
        path
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.viewport_width = width;
    }

    pub fn set_scroll_y(&mut self, y: u32) {
        self.scroll_y = y;
    }

    pub fn set_touch(&mut self, touch: bool) {
        self.touch = touch;
    }

    pub fn set_intersection_observer(&mut self, available: bool) {
        self.intersection_observer = available;
    }

    /// Live listeners on `target` for `kind`, in registration order.
    pub fn listeners_for(&self, target: Target, kind: EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.kind == kind)
            .map(|l| l.id)
            .collect()
    }

    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_of(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    /// Observers currently watching `el`.
    pub fn observers_of(&self, el: ElementId) -> Vec<ObserverId> {
        self.observers
            .iter()
            .enumerate()
            .filter(|(_, watched)| watched.contains(&el))
            .map(|(i, _)| ObserverId(i as u32))
            .collect()
    }

    pub fn observed_count(&self) -> usize {
        self.observers.iter().map(BTreeSet::len).sum()
    }

    pub fn emitted(&self) -> &[PageEvent] {
        &self.emitted
    }

    fn descendants(&self, root: ElementId, out: &mut Vec<ElementId>) {
        for &child in &self.nodes[root.0].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn matches(&self, el: ElementId, selector: &Selector) -> bool {
        selector
            .groups
            .iter()
            .any(|chain| self.matches_chain(el, chain))
    }

    fn matches_chain(&self, el: ElementId, chain: &[Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !self.matches_compound(el, last) {
            return false;
        }
        let mut current = self.nodes[el.0].parent;
        for compound in rest.iter().rev() {
            loop {
                let Some(p) = current else {
                    return false;
                };
                current = self.nodes[p.0].parent;
                if self.matches_compound(p, compound) {
                    break;
                }
            }
        }
        true
    }

    fn matches_compound(&self, el: ElementId, compound: &Compound) -> bool {
        let node = &self.nodes[el.0];
        if let Some(tag) = &compound.tag
            && !node.tag.eq_ignore_ascii_case(tag)
        {
            return false;
        }
        compound.classes.iter().all(|c| node.classes.contains(c))
            && compound
                .attributes
                .iter()
                .all(|a| node.attributes.contains_key(a))
    }

    fn select_from(&self, root: ElementId, selector: &str) -> Vec<ElementId> {
        let selector = Selector::parse(selector);
        let mut candidates = Vec::new();
        self.descendants(root, &mut candidates);
        candidates
            .into_iter()
            .filter(|&el| self.matches(el, &selector))
            .collect()
    }
}

impl Dom for SimDom {
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let selector_parsed = Selector::parse(selector);
        let mut all = vec![ElementId(0)];
        self.descendants(ElementId(0), &mut all);
        all.into_iter()
            .filter(|&el| self.matches(el, &selector_parsed))
            .collect()
    }

    fn query_within(&self, root: ElementId, selector: &str) -> Option<ElementId> {
        self.select_from(root, selector).into_iter().next()
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(el) = current {
            if el == ancestor {
                return true;
            }
            current = self.nodes[el.0].parent;
        }
        false
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes[el.0].classes.contains(class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        self.nodes[el.0].classes.insert(class.to_string());
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.nodes[el.0].classes.remove(class);
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.nodes[el.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        self.nodes[el.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) {
        self.nodes[el.0].attributes.remove(name);
    }


    fn listen(&mut self, target: Target, kind: EventKind) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerRecord { id, target, kind });
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|l| l.id != id);
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    fn scroll_y(&self) -> u32 {
        self.scroll_y
    }

    fn supports_touch(&self) -> bool {
        self.touch
    }

    fn create_observer(&mut self) -> Option<ObserverId> {
        if !self.intersection_observer {
            return None;
        }
        self.observers.push(BTreeSet::new());
        Some(ObserverId(self.observers.len() as u32 - 1))
    }

    fn observe(&mut self, observer: ObserverId, el: ElementId) {
        if let Some(watched) = self.observers.get_mut(observer.0 as usize) {
            watched.insert(el);
        }
    }

    fn unobserve(&mut self, observer: ObserverId, el: ElementId) {
        if let Some(watched) = self.observers.get_mut(observer.0 as usize) {
            watched.remove(&el);
        }
    }

    fn emit(&mut self, event: PageEvent) {
        self.emitted.push(event);
    }
}

// ============================================================================
// Selector parsing
// ============================================================================

/// `tag.class[attr]`, every part optional.
#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<String>,
}

/// Comma groups of descendant chains.
#[derive(Debug, Clone, PartialEq)]
struct Selector {
    groups: Vec<Vec<Compound>>,
}

impl Selector {
    fn parse(input: &str) -> Self {
        let groups = input
            .split(',')
            .map(|group| {
                group
                    .split_whitespace()
                    .map(parse_compound)
                    .collect::<Vec<_>>()
            })
            .filter(|chain| !chain.is_empty())
            .collect();
        Self { groups }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(text: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = text.chars().peekable();
    let mut tag = String::new();
    while let Some(&c) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        tag.push(c);
        chars.next();
    }
    if !tag.is_empty() {
        compound.tag = Some(tag);
    }
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                let mut class = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_name_char(c) {
                        break;
                    }
                    class.push(c);
                    chars.next();
                }
                compound.classes.push(class);
            }
            '[' => {
                let inner: String = chars.by_ref().take_while(|&c| c != ']').collect();
                // `[name=value]` narrows to presence of `name`.
                let name = inner.split('=').next().unwrap_or("").trim().to_string();
                compound.attributes.push(name);
            }
            _ => {}
        }
    }
    compound
}
