//! SVG tag names to component names.

use std::collections::BTreeSet;

use crate::ast::Element;
use crate::config::OutputFormat;

/// SVG tag -> `react-native-svg` component.
const ELEMENT_MAP: [(&str, &str); 22] = [
    ("svg", "Svg"),
    ("g", "G"),
    ("path", "Path"),
    ("circle", "Circle"),
    ("rect", "Rect"),
    ("ellipse", "Ellipse"),
    ("line", "Line"),
    ("polygon", "Polygon"),
    ("polyline", "Polyline"),
    ("text", "Text"),
    ("tspan", "TSpan"),
    ("defs", "Defs"),
    ("linearGradient", "LinearGradient"),
    ("radialGradient", "RadialGradient"),
    ("stop", "Stop"),
    ("clipPath", "ClipPath"),
    ("mask", "Mask"),
    ("image", "Image"),
    ("use", "Use"),
    ("symbol", "Symbol"),
    ("pattern", "Pattern"),
    ("marker", "Marker"),
];

/// Component name of the root element.
pub const ROOT_COMPONENT: &str = "Svg";

/// Component name of the group element.
pub const GROUP_COMPONENT: &str = "G";

/// Table lookup, ignoring case.
fn lookup_native(tag: &str) -> Option<&'static str> {
    ELEMENT_MAP
        .iter()
        .find(|(svg, _)| svg.eq_ignore_ascii_case(tag))
        .map(|(_, native)| *native)
}

/// Map a single tag name for the given output format.
///
/// Native formats use the component table; tags missing from it come back
/// unchanged. The web format capitalises the lowercased tag.
pub fn map_element_name(tag: &str, format: OutputFormat) -> String {
    if format.is_native() {
        return lookup_native(tag).unwrap_or(tag).to_string();
    }

    let lower = tag.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rename every element in the tree.
pub fn map_elements(elem: &Element, format: OutputFormat) -> Element {
    Element {
        name: map_element_name(&elem.name, format),
        attributes: elem.attributes.clone(),
        children: elem
            .children
            .iter()
            .map(|child| map_elements(child, format))
            .collect(),
        text: elem.text.clone(),
    }
}

/// Components that must be imported from the SVG runtime.
///
/// Always contains the root component for native formats; empty for the web.
pub fn required_imports(tags: &BTreeSet<String>, format: OutputFormat) -> BTreeSet<String> {
    let mut imports = BTreeSet::new();

    if !format.is_native() {
        return imports;
    }

    imports.insert(ROOT_COMPONENT.to_string());

    for tag in tags {
        if let Some(mapped) = lookup_native(tag)
            && mapped != ROOT_COMPONENT
        {
            imports.insert(mapped.to_string());
        }
    }

    imports
}

/// Whether a tag has a native counterpart.
pub fn is_element_supported(tag: &str, format: OutputFormat) -> bool {
    !format.is_native() || lookup_native(tag).is_some()
}

/// Tags that will be passed through unchanged because the native runtime has
/// no component for them.
pub fn unsupported_elements(tags: &BTreeSet<String>, format: OutputFormat) -> Vec<String> {
    tags.iter()
        .filter(|tag| !is_element_supported(tag, format))
        .cloned()
        .collect()
}
