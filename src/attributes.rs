//! Attribute renaming, filtering and value rewriting.

use indexmap::IndexMap;

use crate::ast::*;
use crate::config::{ConverterConfig, OutputFormat};

/// Attributes dropped outright.
pub const REMOVED_ATTRIBUTES: [&str; 6] = [
    "class",
    "xmlns",
    "xmlns:xlink",
    "xml:space",
    "enable-background",
    "version",
];

/// SVG attribute -> native prop. An empty target means "drop".
const ATTRIBUTE_MAP: [(&str, &str); 32] = [
    ("class", ""),
    ("fill-rule", "fillRule"),
    ("fill-opacity", "fillOpacity"),
    ("stroke-width", "strokeWidth"),
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-dasharray", "strokeDasharray"),
    ("stroke-dashoffset", "strokeDashoffset"),
    ("stroke-miterlimit", "strokeMiterlimit"),
    ("stroke-opacity", "strokeOpacity"),
    ("clip-path", "clipPath"),
    ("clip-rule", "clipRule"),
    ("font-family", "fontFamily"),
    ("font-size", "fontSize"),
    ("font-weight", "fontWeight"),
    ("font-style", "fontStyle"),
    ("text-anchor", "textAnchor"),
    ("text-decoration", "textDecoration"),
    ("letter-spacing", "letterSpacing"),
    ("word-spacing", "wordSpacing"),
    ("baseline-shift", "baselineShift"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("gradient-units", "gradientUnits"),
    ("gradient-transform", "gradientTransform"),
    ("spread-method", "spreadMethod"),
    ("marker-start", "markerStart"),
    ("marker-mid", "markerMid"),
    ("marker-end", "markerEnd"),
    ("paint-order", "paintOrder"),
    ("color-interpolation", "colorInterpolation"),
    ("color-rendering", "colorRendering"),
];

/// Attributes whose values lose their CSS units on native targets.
const NUMERIC_ATTRIBUTES: [&str; 17] = [
    "width",
    "height",
    "x",
    "y",
    "cx",
    "cy",
    "r",
    "rx",
    "ry",
    "x1",
    "y1",
    "x2",
    "y2",
    "strokeWidth",
    "stroke-width",
    "fontSize",
    "font-size",
];

/// Stripped wherever they occur, in this order of preference.
const UNITS: [&str; 5] = ["px", "em", "rem", "pt", "%"];

/// New name for an attribute, or `None` if it should be dropped.
pub fn transform_attribute_name(name: &str, format: OutputFormat) -> Option<String> {
    if REMOVED_ATTRIBUTES.contains(&name) {
        return None;
    }

    if format.is_native()
        && let Some((_, mapped)) = ATTRIBUTE_MAP.iter().find(|(svg, _)| *svg == name)
    {
        return (!mapped.is_empty()).then(|| mapped.to_string());
    }

    if name.contains('-') {
        return Some(kebab_to_camel_case(name));
    }

    Some(name.to_string())
}

/// `stroke-width` -> `strokeWidth`. Only a hyphen followed by a lowercase
/// ASCII letter is folded.
pub fn kebab_to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-'
            && let Some(&next) = chars.peek()
            && next.is_ascii_lowercase()
        {
            out.push(next.to_ascii_uppercase());
            chars.next();
        } else {
            out.push(c);
        }
    }

    out
}

/// Rewrite a value. `name` is the attribute name as written in the markup.
pub fn transform_attribute_value(name: &str, value: &AttrValue, config: &ConverterConfig) -> AttrValue {
    let mut value = value.clone();

    for rule in &config.attributes.replacements {
        if !rule.is_restricted() {
            value = value.map_text(|s| s.replace(&rule.find, &rule.replace));
        }
    }

    if config.attributes.remove_data_attrs && name.starts_with("data-") {
        return AttrValue::literal("");
    }

    if config.attributes.remove_aria_attrs && name.starts_with("aria-") {
        return AttrValue::literal("");
    }

    let format = config.output_format;

    if let AttrValue::Literal(text) = &value {
        if name == "style" && format.is_native() {
            return AttrValue::Expression(convert_style_to_object(text));
        }

        if format.is_native() && NUMERIC_ATTRIBUTES.contains(&name) {
            return AttrValue::Literal(remove_units(text));
        }
    }

    value
}

/// `"fill: red; stroke-width: 2"` -> `{"fill":"red","strokeWidth":"2"}`
pub fn convert_style_to_object(style: &str) -> String {
    let mut styles: IndexMap<String, String> = IndexMap::new();

    for rule in style.split(';') {
        let Some((property, value)) = rule.split_once(':') else {
            continue;
        };
        let (property, value) = (property.trim(), value.trim());
        if !property.is_empty() && !value.is_empty() {
            styles.insert(kebab_to_camel_case(property), value.to_string());
        }
    }

    // A map of strings always serializes
    serde_json::to_string(&styles).unwrap_or_else(|_| "{}".to_string())
}

/// `"24px"` -> `"24"`. Values that already read as numbers are untouched.
fn remove_units(value: &str) -> String {
    if parse_js_number(value).is_some() {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    'outer: while let Some(c) = rest.chars().next() {
        for unit in UNITS {
            if let Some(stripped) = rest.strip_prefix(unit) {
                rest = stripped;
                continue 'outer;
            }
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Numeric reading of a string the way JavaScript's `Number()` does it:
/// surrounding whitespace ignored, the empty string is zero, anything else
/// must be a complete decimal literal or an unsigned `0x`/`0o`/`0b` literal.
pub(crate) fn parse_js_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    if let Some(radix) = radix_prefix(trimmed) {
        return parse_radix_digits(&trimmed[2..], radix);
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned == "Infinity" && trimmed.len() - unsigned.len() <= 1 {
        return trimmed.replace("Infinity", "inf").parse().ok();
    }

    // Rust also accepts "inf"/"nan" spellings; JS does not
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }

    trimmed.parse().ok()
}

fn radix_prefix(s: &str) -> Option<u32> {
    match s.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc: f64, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

/// Rename and rewrite the attributes of every element in the tree.
pub fn transform_attributes(elem: &Element, config: &ConverterConfig) -> Element {
    let mut attributes = Attributes::new();

    for (name, value) in &elem.attributes {
        let Some(new_name) = transform_attribute_name(name, config.output_format) else {
            continue;
        };

        let new_value = transform_attribute_value(name, value, config);
        if new_value.is_empty() {
            continue;
        }

        attributes.insert(new_name, new_value);
    }

    Element {
        name: elem.name.clone(),
        attributes,
        children: elem
            .children
            .iter()
            .map(|child| transform_attributes(child, config))
            .collect(),
        text: elem.text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AttributeReplacement;

    fn native() -> ConverterConfig {
        ConverterConfig::default()
    }

    fn web() -> ConverterConfig {
        ConverterConfig {
            output_format: OutputFormat::React,
            ..Default::default()
        }
    }

    #[test]
    fn test_kebab_to_camel_case() {
        assert_eq!(kebab_to_camel_case("stroke-width"), "strokeWidth");
        assert_eq!(kebab_to_camel_case("data-foo-bar"), "dataFooBar");
        assert_eq!(kebab_to_camel_case("a-1"), "a-1");
        assert_eq!(kebab_to_camel_case("x-"), "x-");
    }

    #[test]
    fn test_attribute_names() {
        let f = OutputFormat::ReactNative;
        assert_eq!(transform_attribute_name("class", f), None);
        assert_eq!(transform_attribute_name("xmlns:xlink", f), None);
        assert_eq!(transform_attribute_name("fill-rule", f).as_deref(), Some("fillRule"));
        assert_eq!(transform_attribute_name("vector-effect", f).as_deref(), Some("vectorEffect"));
        assert_eq!(transform_attribute_name("viewBox", f).as_deref(), Some("viewBox"));
    }

    #[test]
    fn test_removal_list_applies_to_web() {
        let f = OutputFormat::React;
        assert_eq!(transform_attribute_name("class", f), None);
        assert_eq!(transform_attribute_name("version", f), None);
        assert_eq!(transform_attribute_name("stroke-width", f).as_deref(), Some("strokeWidth"));
    }

    #[test]
    fn test_style_to_object() {
        assert_eq!(
            convert_style_to_object("fill: red; stroke-width:2px;; bogus"),
            r#"{"fill":"red","strokeWidth":"2px"}"#
        );
        assert_eq!(
            convert_style_to_object("background: url(http://x/y.png)"),
            r#"{"background":"url(http://x/y.png)"}"#
        );
        assert_eq!(convert_style_to_object(""), "{}");
    }

    #[test]
    fn test_remove_units() {
        assert_eq!(remove_units("24px"), "24");
        assert_eq!(remove_units("1.5em"), "1.5");
        assert_eq!(remove_units("2rem"), "2");
        assert_eq!(remove_units("50%"), "50");
        assert_eq!(remove_units("12"), "12");
        assert_eq!(remove_units("auto"), "auto");
    }

    #[test]
    fn test_parse_js_number() {
        assert_eq!(parse_js_number(" 12 "), Some(12.0));
        assert_eq!(parse_js_number("-1.5e2"), Some(-150.0));
        assert_eq!(parse_js_number(""), Some(0.0));
        assert!(parse_js_number("Infinity").is_some());
        assert_eq!(parse_js_number("inf"), None);
        assert_eq!(parse_js_number("NaN"), None);
        assert_eq!(parse_js_number("12px"), None);
        assert_eq!(parse_js_number("1 2"), None);
    }

    #[test]
    fn test_parse_js_number_radix_literals() {
        assert_eq!(parse_js_number("0x10"), Some(16.0));
        assert_eq!(parse_js_number(" 0XfF "), Some(255.0));
        assert_eq!(parse_js_number("0o17"), Some(15.0));
        assert_eq!(parse_js_number("0b101"), Some(5.0));
        assert_eq!(parse_js_number("0x"), None);
        assert_eq!(parse_js_number("0b102"), None);
        assert_eq!(parse_js_number("-0x10"), None);
        assert_eq!(remove_units("0x10"), "0x10");
    }

    #[test]
    fn test_aria_attributes_removed_when_enabled() {
        let mut config = native();
        config.attributes.remove_aria_attrs = true;
        assert!(transform_attribute_value("aria-label", &"Close".into(), &config).is_empty());

        let tree = Element::new("Svg")
            .with_attr("aria-hidden", "true")
            .with_attr("role", "img")
            .with_child(Element::new("Path").with_attr("aria-label", "x").with_attr("d", "M0 0"));
        let out = transform_attributes(&tree, &config);
        let root_names: Vec<_> = out.attributes.keys().map(String::as_str).collect();
        assert_eq!(root_names, ["role"]);
        assert!(out.children[0].get_attr("ariaLabel").is_none());
        assert_eq!(out.children[0].literal_attr("d"), Some("M0 0"));
    }

    #[test]
    fn test_values_native() {
        let config = native();
        assert_eq!(
            transform_attribute_value("stroke-width", &"2px".into(), &config),
            AttrValue::literal("2")
        );
        assert_eq!(
            transform_attribute_value("style", &"fill:red".into(), &config),
            AttrValue::Expression(r#"{"fill":"red"}"#.into())
        );
        assert!(transform_attribute_value("data-name", &"x".into(), &config).is_empty());
        assert_eq!(
            transform_attribute_value("aria-label", &"x".into(), &config),
            AttrValue::literal("x")
        );
    }

    #[test]
    fn test_values_web_keep_units_and_style() {
        let config = web();
        assert_eq!(
            transform_attribute_value("width", &"24px".into(), &config),
            AttrValue::literal("24px")
        );
        assert_eq!(
            transform_attribute_value("style", &"fill:red".into(), &config),
            AttrValue::literal("fill:red")
        );
    }

    #[test]
    fn test_unrestricted_replacement_is_literal_and_global() {
        let mut config = native();
        config.attributes.replacements = vec![
            AttributeReplacement::new("a.b", "X"),
            AttributeReplacement::new("#000", "red").only_on(["path"]),
        ];
        assert_eq!(
            transform_attribute_value("id", &"a.b-acb-a.b".into(), &config),
            AttrValue::literal("X-acb-X")
        );
        // Restricted rules wait for the later pass
        assert_eq!(
            transform_attribute_value("fill", &"#000".into(), &config),
            AttrValue::literal("#000")
        );
    }

    #[test]
    fn test_transform_tree() {
        let tree = Element::new("Svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_attr("class", "icon")
            .with_attr("data-name", "Layer 1")
            .with_attr("aria-hidden", "true")
            .with_child(
                Element::new("Path")
                    .with_attr("fill-rule", "evenodd")
                    .with_attr("stroke-width", "2px")
                    .with_attr("opacity", ""),
            );

        let out = transform_attributes(&tree, &native());
        let root_names: Vec<_> = out.attributes.keys().map(String::as_str).collect();
        assert_eq!(root_names, ["ariaHidden"]);

        let path = &out.children[0];
        assert_eq!(path.literal_attr("fillRule"), Some("evenodd"));
        assert_eq!(path.literal_attr("strokeWidth"), Some("2"));
        assert!(path.get_attr("opacity").is_none());

        // Input untouched
        assert!(tree.get_attr("class").is_some());
    }
}
