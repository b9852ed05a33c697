//! Hover capability probe.
//!
//! Decides whether the element under the pointer should put the cursor
//! into its hover variant. Runs on pointer enter/leave only.

use folio_input_model::element::{Element, ElementError, ElementTree, NodeId};

/// Attribute that opts any element into the hover variant.
pub const CURSOR_ATTRIBUTE: &str = "data-cursor";
pub const CURSOR_HOVER_VALUE: &str = "hover";

/// Tags, and ancestors with those tags, that are always interactive.
const INTERACTIVE_TAGS: [&str; 2] = ["a", "button"];

/// Class that makes an element and all of its descendants interactive.
const INHERITED_CLASS: &str = "card";

/// Classes that only count on the element itself.
const OWN_CLASSES: [&str; 2] = ["clickable", "social-link"];

fn is_interactive_ancestor(element: &Element) -> bool {
    INTERACTIVE_TAGS.iter().any(|tag| element.is_tag(tag))
        || element.attribute(CURSOR_ATTRIBUTE) == Some(CURSOR_HOVER_VALUE)
        || element.has_class(INHERITED_CLASS)
}

/// Classify `id`. An unknown node is an error so the caller can log it and
/// keep its previous state.
pub fn is_interactive(tree: &ElementTree, id: NodeId) -> Result<bool, ElementError> {
    let element = tree.get(id)?;
    if OWN_CLASSES.iter().any(|class| element.has_class(class)) {
        return Ok(true);
    }
    Ok(tree.closest(id, is_interactive_ancestor)?.is_some())
}

/// Classification after the pointer leaves `id`: it is back over the
/// parent, if there is one.
pub fn is_interactive_after_leave(tree: &ElementTree, id: NodeId) -> Result<bool, ElementError> {
    match tree.get(id)?.parent {
        Some(parent) => is_interactive(tree, parent),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> bool {
        let (tree, leaf) = ElementTree::from_path(path).unwrap();
        is_interactive(&tree, leaf).unwrap()
    }

    #[test]
    fn test_span_inside_link_is_interactive() {
        assert!(classify("a>span"));
        assert!(classify("div>a>p>span"));
    }

    #[test]
    fn test_buttons_and_tagged_elements() {
        assert!(classify("button"));
        assert!(classify("section>button>img"));
        assert!(classify("div[data-cursor=hover]>span"));
        assert!(classify("div.card>h3"));
    }

    #[test]
    fn test_own_classes_do_not_inherit() {
        assert!(classify("div.clickable"));
        assert!(classify("span.social-link"));
        assert!(!classify("div.clickable>span"));
        assert!(!classify("li.social-link>i"));
    }

    #[test]
    fn test_plain_elements_are_not_interactive() {
        assert!(!classify("div>p>span"));
        assert!(!classify("div[data-cursor=none]>span"));
        assert!(!classify("div.cards>span"));
    }

    #[test]
    fn test_unknown_node_is_error() {
        let (tree, _) = ElementTree::from_path("a>span").unwrap();
        assert!(matches!(
            is_interactive(&tree, NodeId(9)),
            Err(ElementError::UnknownNode(NodeId(9)))
        ));
    }

    #[test]
    fn test_leave_reprobes_parent() {
        let (tree, leaf) = ElementTree::from_path("a>span").unwrap();
        assert!(is_interactive_after_leave(&tree, leaf).unwrap());
        assert!(!is_interactive_after_leave(&tree, NodeId(0)).unwrap());

        let (tree, leaf) = ElementTree::from_path("div>button").unwrap();
        assert!(!is_interactive_after_leave(&tree, leaf).unwrap());
    }

    #[test]
    fn test_self_parented_tree_terminates() {
        let tree: ElementTree = serde_json::from_str(r#"[{"tag":"div","parent":0}]"#).unwrap();
        assert!(!is_interactive(&tree, NodeId(0)).unwrap());
        assert!(!is_interactive_after_leave(&tree, NodeId(0)).unwrap());
    }
}
