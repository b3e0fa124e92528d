//! Structural passes over the mapped tree: dimensions, icon mode and
//! element-scoped replacements.

use crate::ast::*;
use crate::config::{AttributeReplacement, ConverterConfig, DimensionMode, OutputFormat};
use crate::mapping::ROOT_COMPONENT;

/// Render a number without a trailing `.0`.
pub fn format_number(n: f64) -> String {
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format(n);
    s.strip_suffix(".0").unwrap_or(s).to_string()
}

fn is_root_svg(elem: &Element) -> bool {
    elem.is(ROOT_COMPONENT) || elem.is("svg")
}

/// Rewrite the root element's sizing attributes.
pub fn apply_dimensions(elem: &Element, config: &ConverterConfig) -> Element {
    if !is_root_svg(elem) {
        return elem.clone();
    }

    let dims = &config.dimensions;
    let mut attributes = elem.attributes.clone();

    match dims.mode {
        DimensionMode::Remove => {
            attributes.shift_remove("width");
            attributes.shift_remove("height");
        }
        DimensionMode::Custom => {
            if let Some(width) = dims.custom_width {
                attributes.insert("width".into(), AttrValue::Literal(format_number(width)));
            }
            if let Some(height) = dims.custom_height {
                attributes.insert("height".into(), AttrValue::Literal(format_number(height)));
            }
        }
        DimensionMode::Keep => {}
    }

    if !dims.preserve_view_box {
        attributes.shift_remove("viewBox");
    }

    elem.with_attributes(attributes)
}

/// Turn the root's size, and optionally every color, into props.
pub fn apply_icon_mode(elem: &Element, config: &ConverterConfig) -> Element {
    let icon = &config.icon;
    if !icon.enabled || config.output_format != OutputFormat::ReactNative || !elem.is(ROOT_COMPONENT)
    {
        return elem.clone();
    }

    let size = format_number(icon.default_size);
    let mut attributes = elem.attributes.clone();
    for dim in ["width", "height"] {
        attributes.insert(
            dim.into(),
            AttrValue::PropOr {
                prop: dim.into(),
                fallback: Fallback::Number(size.clone()),
            },
        );
    }

    let children = if icon.replace_color_with_prop {
        elem.children
            .iter()
            .map(|child| replace_colors_with_prop(child, "color"))
            .collect()
    } else {
        elem.children.clone()
    };

    Element {
        name: elem.name.clone(),
        attributes,
        children,
        text: elem.text.clone(),
    }
}

fn replace_colors_with_prop(elem: &Element, prop: &str) -> Element {
    let mut attributes = elem.attributes.clone();

    for attr in ["fill", "stroke"] {
        if let Some(AttrValue::Literal(color)) = attributes.get(attr)
            && !color.is_empty()
            && color != "none"
        {
            let fallback = Fallback::Text(color.clone());
            attributes.insert(
                attr.into(),
                AttrValue::PropOr {
                    prop: prop.into(),
                    fallback,
                },
            );
        }
    }

    Element {
        name: elem.name.clone(),
        attributes,
        children: elem
            .children
            .iter()
            .map(|child| replace_colors_with_prop(child, prop))
            .collect(),
        text: elem.text.clone(),
    }
}

/// Apply find/replace rules to every attribute value of the elements each
/// rule is scoped to.
pub fn apply_replacements(elem: &Element, replacements: &[AttributeReplacement]) -> Element {
    let mut attributes = elem.attributes.clone();

    for rule in replacements {
        if !rule.applies_to(&elem.name) {
            continue;
        }
        for value in attributes.values_mut() {
            *value = value.map_text(|s| s.replace(&rule.find, &rule.replace));
        }
    }

    Element {
        name: elem.name.clone(),
        attributes,
        children: elem
            .children
            .iter()
            .map(|child| apply_replacements(child, replacements))
            .collect(),
        text: elem.text.clone(),
    }
}
