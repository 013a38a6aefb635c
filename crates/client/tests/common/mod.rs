//! In-memory document for engine and driver tests.
//!
//! Markup is not parsed. Fragment bodies are looked up in a registry of
//! prebuilt element trees; a body missing from the registry is inserted as
//! plain text with no elements.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use bridge_client::{Dom, FetchError, Fetcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct Element {
    attrs: HashMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    text: String,
}

/// Markup description used to build documents and fragments.
#[derive(Debug, Clone, Default)]
pub struct Spec {
    attrs: Vec<(String, String)>,
    children: Vec<Spec>,
}

/// Element with the given attributes.
pub fn el(attrs: &[(&str, &str)]) -> Spec {
    Spec {
        attrs: attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        children: Vec::new(),
    }
}

impl Spec {
    pub fn child(mut self, child: Spec) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug)]
pub struct FakeDom {
    nodes: Vec<Element>,
    fragments: HashMap<String, Vec<Spec>>,
}

impl FakeDom {
    /// Document whose body holds `children`.
    pub fn new(children: Vec<Spec>) -> Self {
        let mut dom = Self {
            nodes: vec![Element::default()],
            fragments: HashMap::new(),
        };
        for spec in children {
            let child = dom.build(&spec, Some(NodeId(0)));
            dom.nodes[0].children.push(child);
        }
        dom
    }

    /// Register the element trees produced when `html` is swapped in.
    pub fn register(&mut self, html: &str, roots: Vec<Spec>) {
        self.fragments.insert(html.to_string(), roots);
    }

    pub fn by_id(&self, id: &str) -> NodeId {
        self.find_id(id)
            .unwrap_or_else(|| panic!("no connected element with id {id}"))
    }

    pub fn find_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(NodeId(0))
            .into_iter()
            .find(|node| self.nodes[node.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0].children.clone()
    }

    fn build(&mut self, spec: &Spec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            attrs: spec.attrs.iter().cloned().collect(),
            children: Vec::new(),
            parent,
            text: String::new(),
        });
        for child in &spec.children {
            let child = self.build(child, Some(id));
            self.nodes[id.0].children.push(child);
        }
        id
    }

    fn instantiate(&mut self, html: &str, parent: Option<NodeId>) -> Vec<NodeId> {
        let specs = self.fragments.get(html).cloned().unwrap_or_default();
        specs.iter().map(|spec| self.build(spec, parent)).collect()
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = vec![root];
        let mut i = 0;
        while i < out.len() {
            out.extend(self.nodes[out[i].0].children.iter().copied());
            i += 1;
        }
        out
    }
}

impl Dom for FakeDom {
    type Node = NodeId;

    fn document(&self) -> NodeId {
        NodeId(0)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attrs.get(name).cloned()
    }

    fn find_with_attribute(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|node| self.nodes[node.0].attrs.contains_key(name))
            .collect()
    }

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.find_id(selector.strip_prefix('#')?)
    }

    fn set_inner_html(&mut self, node: NodeId, html: &str) -> Vec<NodeId> {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        let roots = self.instantiate(html, Some(node));
        self.nodes[node.0].children = roots.clone();
        self.nodes[node.0].text = html.to_string();
        roots
    }

    fn set_outer_html(&mut self, node: NodeId, html: &str) -> Vec<NodeId> {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return Vec::new();
        };
        let roots = self.instantiate(html, Some(parent));
        let siblings = &mut self.nodes[parent.0].children;
        if let Some(pos) = siblings.iter().position(|child| *child == node) {
            siblings.splice(pos..=pos, roots.iter().copied());
        }
        roots
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == NodeId(0) {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

/// Fetcher answering from a fixed route table and recording every call.
#[derive(Debug, Clone, Default)]
pub struct FakeFetcher {
    routes: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, body: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn fail(&self, url: &str) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Err("connection refused".to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.calls().iter().filter(|call| *call == url).count()
    }
}

impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let route = self.routes.lock().unwrap().get(url).cloned();
        match route {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(FetchError::Transport(message)),
            None => Err(FetchError::Transport(format!("no route for {url}"))),
        }
    }
}
