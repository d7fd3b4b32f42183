//! Intermediate tree produced by the decode pipeline.

use indexmap::IndexMap;

use super::TemplateId;

/// Non-owning reference from a node to its parent.
///
/// Only carries what error reporting needs to reconstruct a location; it is
/// never used to walk the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    /// Template of the parent node.
    pub template: TemplateId,
    /// Source location of the parent node.
    pub path: String,
}

/// One decoded substructure of a QRDA document.
///
/// A node owns its children exclusively; attribute values keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    template: TemplateId,
    values: IndexMap<String, String>,
    children: Vec<Node>,
    path: String,
    parent: Option<ParentRef>,
}

impl Node {
    /// Create an empty node for a template.
    #[must_use]
    pub fn new(template: TemplateId) -> Self {
        Self {
            template,
            values: IndexMap::new(),
            children: Vec::new(),
            path: String::new(),
            parent: None,
        }
    }

    /// Set the source location.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set a value, returning the node (builder style).
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.put_value(name, value);
        self
    }

    /// Template identifier of this node.
    #[must_use]
    pub fn template(&self) -> TemplateId {
        self.template
    }

    /// Absolute path of the source element this node was decoded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Replace the source location.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    /// Reference to the parent, if this node was attached to one.
    #[must_use]
    pub fn parent(&self) -> Option<&ParentRef> {
        self.parent.as_ref()
    }

    /// Get a value by name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check whether a value is present.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set a value, replacing any previous one under the same name.
    pub fn put_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Remove a value, returning it.
    pub fn remove_value(&mut self, name: &str) -> Option<String> {
        self.values.shift_remove(name)
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Attach a child, recording this node as its parent.
    pub fn add_child(&mut self, mut child: Node) {
        child.parent = Some(ParentRef {
            template: self.template,
            path: self.path.clone(),
        });
        self.children.push(child);
    }

    /// Attach several children in order.
    pub fn add_children(&mut self, children: impl IntoIterator<Item = Node>) {
        for child in children {
            self.add_child(child);
        }
    }

    /// Detach and return all children.
    pub fn take_children(&mut self) -> Vec<Node> {
        let mut children = std::mem::take(&mut self.children);
        for child in &mut children {
            child.parent = None;
        }
        children
    }

    /// Direct children with the given template.
    pub fn children_of(&self, template: TemplateId) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(move |c| c.template == template)
    }

    /// First direct child with the given template.
    #[must_use]
    pub fn find_child(&self, template: TemplateId) -> Option<&Node> {
        self.children_of(template).next()
    }

    /// First descendant (pre-order, excluding self) with the given template.
    #[must_use]
    pub fn find_descendant(&self, template: TemplateId) -> Option<&Node> {
        self.children.iter().find_map(|child| {
            if child.template == template {
                Some(child)
            } else {
                child.find_descendant(template)
            }
        })
    }

    /// Number of nodes in this subtree, including self.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}
