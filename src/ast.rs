//! Element tree shared by every pipeline stage.
//!
//! Stages take `&Element` and return a fresh `Element`; nothing is mutated in
//! place, so the tree before and after a stage can be compared directly.

use indexmap::IndexMap;

/// Ordered attribute map. Insertion order drives code generation order.
pub type Attributes = IndexMap<String, AttrValue>;

/// A node in the converted tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name (original until the element mapper renames it)
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Element>,
    /// Inline text content, trimmed
    pub text: Option<String>,
}

/// An attribute value as it flows through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Plain text copied from the markup (or produced by a transform).
    Literal(String),
    /// Raw code emitted inside `{...}`.
    Expression(String),
    /// `{prop || fallback}`
    PropOr { prop: String, fallback: Fallback },
}

/// Default used when a prop is not supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    Number(String),
    Text(String),
}

impl AttrValue {
    pub fn literal(value: impl Into<String>) -> Self {
        AttrValue::Literal(value.into())
    }

    /// Literal text, if this is a literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttrValue::Literal(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            AttrValue::Literal(s) | AttrValue::Expression(s) => s.is_empty(),
            AttrValue::PropOr { .. } => false,
        }
    }

    /// Apply `f` to the textual payload of this value.
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> AttrValue {
        match self {
            AttrValue::Literal(s) => AttrValue::Literal(f(s)),
            AttrValue::Expression(s) => AttrValue::Expression(f(s)),
            AttrValue::PropOr { prop, fallback } => AttrValue::PropOr {
                prop: prop.clone(),
                fallback: match fallback {
                    Fallback::Number(n) => Fallback::Number(f(n)),
                    Fallback::Text(t) => Fallback::Text(f(t)),
                },
            },
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Literal(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Literal(s)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Literal attribute value by name.
    pub fn literal_attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(AttrValue::as_literal)
    }

    /// Check if this element has a specific tag name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Same element with `attributes` replaced.
    pub fn with_attributes(&self, attributes: Attributes) -> Element {
        Element {
            name: self.name.clone(),
            attributes,
            children: self.children.clone(),
            text: self.text.clone(),
        }
    }

    /// Recursively visit this element and all descendants, pre-order.
    pub fn for_each(&self, mut f: impl FnMut(&Element)) {
        fn visit(elem: &Element, f: &mut impl FnMut(&Element)) {
            f(elem);
            for child in &elem.children {
                visit(child, f);
            }
        }
        visit(self, &mut f);
    }

    /// First element (self included) matching `pred`, pre-order.
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<&Element> {
        fn walk<'a>(elem: &'a Element, pred: &impl Fn(&Element) -> bool) -> Option<&'a Element> {
            if pred(elem) {
                return Some(elem);
            }
            elem.children.iter().find_map(|c| walk(c, pred))
        }
        walk(self, &pred)
    }

    /// Number of elements in this subtree.
    pub fn count(&self) -> usize {
        let mut n = 0;
        self.for_each(|_| n += 1);
        n
    }
}

/// Metadata pulled from the root `<svg>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgMetadata {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub view_box: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_preserved() {
        let elem = Element::new("rect")
            .with_attr("y", "1")
            .with_attr("x", "2")
            .with_attr("fill", "red");
        let names: Vec<_> = elem.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, ["y", "x", "fill"]);
    }

    #[test]
    fn test_map_text_reaches_fallback() {
        let value = AttrValue::PropOr {
            prop: "color".into(),
            fallback: Fallback::Text("#000".into()),
        };
        let mapped = value.map_text(|s| s.replace("#000", "black"));
        assert_eq!(
            mapped,
            AttrValue::PropOr {
                prop: "color".into(),
                fallback: Fallback::Text("black".into()),
            }
        );
    }

    #[test]
    fn test_find_and_count() {
        let tree = Element::new("svg").with_child(
            Element::new("g").with_child(Element::new("title").with_text("Hi")),
        );
        assert_eq!(tree.count(), 3);
        let title = tree.find(|e| e.is("title")).unwrap();
        assert_eq!(title.text.as_deref(), Some("Hi"));
        assert!(tree.find(|e| e.is("desc")).is_none());
    }
}
