//! A minimal DOM-like element tree.
//!
//! The cursor's hover probe needs to walk from the hovered element up to
//! its ancestors, checking tag names, classes and attributes. This arena
//! models just enough of a document for that.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Index of an element inside an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Errors raised by tree lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    #[error("unknown element {0:?}")]
    UnknownNode(NodeId),

    #[error("element {child:?} names missing parent {parent:?}")]
    DanglingParent { child: NodeId, parent: NodeId },
}

/// One element: a lowercase tag name, a class list and attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Arena of elements. Parents must be inserted before their children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a root element.
    pub fn insert_root(&mut self, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            parent: None,
            ..element
        });
        id
    }

    /// Insert an element under `parent`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        element: Element,
    ) -> Result<NodeId, ElementError> {
        self.get(parent)?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element {
            parent: Some(parent),
            ..element
        });
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&Element, ElementError> {
        self.nodes.get(id.0).ok_or(ElementError::UnknownNode(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that every parent reference points at an earlier element.
    /// Trees loaded from JSON are validated before use so ancestor walks
    /// always terminate.
    pub fn validate(&self) -> Result<(), ElementError> {
        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                if parent.0 >= index {
                    return Err(ElementError::DanglingParent {
                        child: NodeId(index),
                        parent,
                    });
                }
            }
        }
        Ok(())
    }

    /// The element itself followed by each ancestor up to the root.
    ///
    /// Only parents stored before their child are followed, so an
    /// unvalidated tree with a cycle still ends the walk.
    pub fn ancestors_inclusive(
        &self,
        id: NodeId,
    ) -> Result<impl Iterator<Item = &Element> + '_, ElementError> {
        self.get(id)?;
        let mut next = Some(id.0);
        Ok(std::iter::from_fn(move || {
            let index = next?;
            let node = &self.nodes[index];
            next = node.parent.map(|parent| parent.0).filter(|&parent| parent < index);
            Some(node)
        }))
    }

    /// Nearest element (self included) matching `predicate`, like the DOM's
    /// `Element.closest`.
    pub fn closest(
        &self,
        id: NodeId,
        predicate: impl Fn(&Element) -> bool,
    ) -> Result<Option<&Element>, ElementError> {
        Ok(self.ancestors_inclusive(id)?.find(|node| predicate(node)))
    }

    /// Build a straight chain from a selector path such as `a>span` or
    /// `div.card>p`, returning the tree and the innermost node.
    pub fn from_path(path: &str) -> Option<(ElementTree, NodeId)> {
        let mut tree = ElementTree::new();
        let mut last: Option<NodeId> = None;
        for segment in path.split('>').map(str::trim).filter(|s| !s.is_empty()) {
            let element = parse_segment(segment)?;
            let id = match last {
                None => tree.insert_root(element),
                Some(parent) => tree.insert_child(parent, element).ok()?,
            };
            last = Some(id);
        }
        last.map(|id| (tree, id))
    }
}

/// Parse `tag.class1.class2[attr=value]` into an element.
fn parse_segment(segment: &str) -> Option<Element> {
    let (head, attribute) = match segment.split_once('[') {
        Some((head, rest)) => (head, Some(rest.strip_suffix(']')?)),
        None => (segment, None),
    };
    let mut parts = head.split('.');
    let tag = parts.next().filter(|t| !t.is_empty())?;
    let mut element = Element::new(tag);
    for class in parts.filter(|c| !c.is_empty()) {
        element = element.with_class(class);
    }
    if let Some(attribute) = attribute {
        let (name, value) = attribute.split_once('=').unwrap_or((attribute, ""));
        element = element.with_attribute(name.trim(), value.trim().trim_matches('"'));
    }
    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_walks_ancestors() {
        let mut tree = ElementTree::new();
        let link = tree.insert_root(Element::new("a"));
        let span = tree.insert_child(link, Element::new("span")).unwrap();

        let found = tree.closest(span, |e| e.is_tag("a")).unwrap();
        assert!(found.is_some());
        assert!(tree.closest(span, |e| e.is_tag("button")).unwrap().is_none());
    }

    #[test]
    fn test_unknown_node() {
        let tree = ElementTree::new();
        assert_eq!(
            tree.get(NodeId(3)).unwrap_err(),
            ElementError::UnknownNode(NodeId(3))
        );
    }

    #[test]
    fn test_insert_child_requires_parent() {
        let mut tree = ElementTree::new();
        assert!(tree.insert_child(NodeId(0), Element::new("p")).is_err());
    }

    #[test]
    fn test_validate_rejects_forward_parent() {
        let json = r#"[{"tag":"div","parent":1},{"tag":"a"}]"#;
        let tree: ElementTree = serde_json::from_str(json).unwrap();
        assert!(matches!(
            tree.validate(),
            Err(ElementError::DanglingParent { .. })
        ));
    }

    #[test]
    fn test_ancestor_walk_ends_on_cycles() {
        let tree: ElementTree = serde_json::from_str(r#"[{"tag":"div","parent":0}]"#).unwrap();
        assert_eq!(tree.ancestors_inclusive(NodeId(0)).unwrap().count(), 1);

        let json = r#"[{"tag":"a","parent":1},{"tag":"span","parent":0}]"#;
        let tree: ElementTree = serde_json::from_str(json).unwrap();
        let tags: Vec<_> = tree
            .ancestors_inclusive(NodeId(1))
            .unwrap()
            .map(|e| e.tag.as_str())
            .collect();
        assert_eq!(tags, vec!["span", "a"]);
        assert!(tree.closest(NodeId(0), |e| e.is_tag("button")).unwrap().is_none());
    }

    #[test]
    fn test_from_path() {
        let (tree, leaf) = ElementTree::from_path("div.card>p[data-cursor=hover]>span").unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.get(leaf).unwrap().is_tag("span"));
        let card = tree.closest(leaf, |e| e.has_class("card")).unwrap().unwrap();
        assert!(card.is_tag("div"));
        let tagged = tree
            .closest(leaf, |e| e.attribute("data-cursor") == Some("hover"))
            .unwrap();
        assert!(tagged.is_some());
    }

    #[test]
    fn test_from_path_rejects_empty() {
        assert!(ElementTree::from_path("").is_none());
        assert!(ElementTree::from_path(">.x").is_none());
    }
}
