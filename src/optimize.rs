//! Tree cleanup after transformation: drop empty groups, unwrap inert ones.

use crate::ast::Element;
use crate::mapping::GROUP_COMPONENT;

/// Apply both passes. Never removes the root: if it would be pruned, the
/// input tree comes back unchanged.
pub fn optimize_tree(elem: &Element) -> Element {
    match remove_empty_groups(elem) {
        Some(pruned) => flatten_groups(&pruned),
        None => elem.clone(),
    }
}

fn is_group(elem: &Element) -> bool {
    elem.is(GROUP_COMPONENT)
}

/// Remove groups with no attributes and no children. Children are pruned
/// first so a group emptied by pruning goes too.
pub fn remove_empty_groups(elem: &Element) -> Option<Element> {
    let children: Vec<Element> = elem.children.iter().filter_map(remove_empty_groups).collect();

    if is_group(elem) && children.is_empty() && elem.attributes.is_empty() {
        return None;
    }

    Some(Element {
        name: elem.name.clone(),
        attributes: elem.attributes.clone(),
        children,
        text: elem.text.clone(),
    })
}

/// Replace attribute-less single-child groups with their child.
pub fn flatten_groups(elem: &Element) -> Element {
    if is_group(elem) && elem.attributes.is_empty() && elem.children.len() == 1 {
        return flatten_groups(&elem.children[0]);
    }

    Element {
        name: elem.name.clone(),
        attributes: elem.attributes.clone(),
        children: elem.children.iter().map(flatten_groups).collect(),
        text: elem.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g() -> Element {
        Element::new("G")
    }

    #[test]
    fn test_nested_empty_groups_collapse() {
        let tree = Element::new("Svg")
            .with_child(g().with_child(g().with_child(g())))
            .with_child(g());
        let out = optimize_tree(&tree);
        assert_eq!(out.name, "Svg");
        assert!(out.children.is_empty());
    }

    #[test]
    fn test_group_with_attributes_survives() {
        let tree = Element::new("Svg").with_child(g().with_attr("id", "keep"));
        let out = optimize_tree(&tree);
        assert_eq!(out.children.len(), 1);
        assert_eq!(out.children[0].literal_attr("id"), Some("keep"));
    }

    #[test]
    fn test_single_child_groups_flatten() {
        let path = Element::new("Path").with_attr("d", "M0 0");
        let tree = Element::new("Svg").with_child(g().with_child(g().with_child(path.clone())));
        let out = optimize_tree(&tree);
        assert_eq!(out.children, vec![path]);
    }

    #[test]
    fn test_multi_child_group_kept() {
        let tree = Element::new("Svg").with_child(
            g().with_child(Element::new("Path"))
                .with_child(Element::new("Circle")),
        );
        let out = optimize_tree(&tree);
        assert_eq!(out.children[0].name, "G");
        assert_eq!(out.children[0].children.len(), 2);
    }

    #[test]
    fn test_flatten_after_pruning() {
        // The inner group only becomes single-child once its empty sibling goes
        let tree = Element::new("Svg").with_child(
            g().with_child(Element::new("Rect")).with_child(g()),
        );
        let out = optimize_tree(&tree);
        assert_eq!(out.children, vec![Element::new("Rect")]);
    }

    #[test]
    fn test_root_group_never_deleted() {
        let tree = g().with_child(g());
        assert_eq!(optimize_tree(&tree), tree);
    }

    #[test]
    fn test_unmapped_groups_untouched() {
        let tree = Element::new("svg").with_child(Element::new("g"));
        assert_eq!(optimize_tree(&tree), tree);
    }
}
