//! Component source generation.

use std::collections::BTreeSet;

use crate::ast::*;
use crate::attributes::parse_js_number;
use crate::config::{ConverterConfig, DimensionMode, ExportStyle, OutputFormat, PropsSpread};
use crate::mapping::ROOT_COMPONENT;
use crate::parse::parse_svg;

/// Name of the rest parameter holding all other props.
const REST_PROPS: &str = "props";

/// Color used for the `color` prop default in icon mode.
const DEFAULT_ICON_COLOR: &str = "#000";

/// The pieces of generated source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedCode {
    /// Complete module: imports, types, component and exports
    pub code: String,
    pub imports: String,
    /// Empty unless types are enabled
    pub type_definitions: String,
    pub usage_example: String,
    /// `propTypes` block for untyped web components, empty otherwise
    pub prop_types: String,
}

/// Generate every piece of output for a finished tree.
pub fn generate(tree: &Element, used_imports: &BTreeSet<String>, config: &ConverterConfig) -> GeneratedCode {
    let name = &config.component.name;

    GeneratedCode {
        code: generate_component(tree, used_imports, config),
        imports: generate_imports(used_imports, config),
        type_definitions: generate_type_definitions(name, config),
        usage_example: generate_usage_example(name, config),
        prop_types: generate_prop_types(name, config),
    }
}

/// Import lines for React and, on native targets, the SVG runtime.
pub fn generate_imports(used_imports: &BTreeSet<String>, config: &ConverterConfig) -> String {
    let mut lines = Vec::new();

    if config.component.use_types {
        lines.push("import * as React from 'react';".to_string());
    } else {
        lines.push("import React from 'react';".to_string());
    }

    if config.output_format.is_native() {
        let mut named: Vec<&str> = used_imports
            .iter()
            .map(String::as_str)
            .filter(|el| *el != ROOT_COMPONENT && *el != "svg")
            .collect();
        named.sort_unstable();

        if named.is_empty() {
            lines.push(format!("import {} from 'react-native-svg';", ROOT_COMPONENT));
        } else {
            lines.push(format!(
                "import {}, {{ {} }} from 'react-native-svg';",
                ROOT_COMPONENT,
                named.join(", ")
            ));
        }
    }

    lines.join("\n")
}

fn exposes_size_props(config: &ConverterConfig) -> bool {
    config.dimensions.mode == DimensionMode::Remove || config.icon.enabled
}

fn exposes_color_prop(config: &ConverterConfig) -> bool {
    config.icon.enabled && config.icon.replace_color_with_prop
}

/// The `interface NameProps { ... }` block, or an empty string.
pub fn generate_type_definitions(name: &str, config: &ConverterConfig) -> String {
    if !config.component.use_types {
        return String::new();
    }

    let mut lines = vec![format!("interface {}Props {{", name)];

    if exposes_size_props(config) {
        lines.push("  width?: number | string;".into());
        lines.push("  height?: number | string;".into());
    }
    if exposes_color_prop(config) {
        lines.push("  color?: string;".into());
    }
    if config.props.title_prop {
        lines.push("  title?: string;".into());
    }
    if config.props.desc_prop {
        lines.push("  desc?: string;".into());
    }
    if config.props.native_style {
        lines.push("  style?: object;".into());
    }
    if config.component.forward_ref {
        lines.push("  ref?: React.Ref<any>;".into());
    }

    lines.push("}".into());
    lines.join("\n")
}

/// `PropTypes` declarations for untyped web components.
pub fn generate_prop_types(name: &str, config: &ConverterConfig) -> String {
    if config.component.use_types || config.output_format == OutputFormat::ReactNative {
        return String::new();
    }

    let mut lines = vec![format!("{}.propTypes = {{", name)];

    if exposes_size_props(config) {
        lines.push("  width: PropTypes.oneOfType([PropTypes.number, PropTypes.string]),".into());
        lines.push("  height: PropTypes.oneOfType([PropTypes.number, PropTypes.string]),".into());
    }
    if exposes_color_prop(config) {
        lines.push("  color: PropTypes.string,".into());
    }
    if config.props.title_prop {
        lines.push("  title: PropTypes.string,".into());
    }
    if config.props.desc_prop {
        lines.push("  desc: PropTypes.string,".into());
    }

    lines.push("};".into());
    lines.join("\n")
}

/// Destructured defaults, e.g. `width = 24, height = 24`.
pub fn generate_default_props(config: &ConverterConfig) -> String {
    let mut defaults = Vec::new();

    if config.icon.enabled {
        let size = crate::transform::format_number(config.icon.default_size);
        defaults.push(format!("width = {}", size));
        defaults.push(format!("height = {}", size));

        if config.icon.replace_color_with_prop {
            defaults.push(format!("color = '{}'", DEFAULT_ICON_COLOR));
        }
    }

    defaults.join(", ")
}

/// A short snippet showing how to import and render the component.
pub fn generate_usage_example(name: &str, config: &ConverterConfig) -> String {
    let mut lines = vec!["// Usage example:".to_string()];

    match config.component.export_style {
        ExportStyle::Default => lines.push(format!("import {name} from './{name}';")),
        ExportStyle::Named => lines.push(format!("import {{ {name} }} from './{name}';")),
        ExportStyle::Both => {
            lines.push(format!("import {name} from './{name}';"));
            lines.push("// or".into());
            lines.push(format!("// import {{ {name} }} from './{name}';"));
        }
    }

    lines.push(String::new());
    lines.push("function App() {".into());

    let mut example_props = Vec::new();
    if exposes_size_props(config) {
        example_props.push("width={48}");
        example_props.push("height={48}");
    }
    if exposes_color_prop(config) {
        example_props.push("color=\"#6366f1\"");
    }

    if example_props.is_empty() {
        lines.push(format!("  return <{} />;", name));
    } else {
        lines.push(format!("  return <{} {} />;", name, example_props.join(" ")));
    }

    lines.push("}".into());
    lines.join("\n")
}

/// The complete component module.
pub fn generate_component(tree: &Element, used_imports: &BTreeSet<String>, config: &ConverterConfig) -> String {
    let component = &config.component;
    let name = &component.name;

    let mut lines = vec![generate_imports(used_imports, config), String::new()];

    let types = generate_type_definitions(name, config);
    if !types.is_empty() {
        lines.push(types);
        lines.push(String::new());
    }

    let function = generate_component_function(name, tree, config);
    if component.memo {
        lines.push(format!("const {} = React.memo({});", name, function));
    } else {
        lines.push(format!("const {} = {};", name, function));
    }
    lines.push(String::new());

    match component.export_style {
        ExportStyle::Default => lines.push(format!("export default {};", name)),
        ExportStyle::Named => lines.push(format!("export {{ {} }};", name)),
        ExportStyle::Both => {
            lines.push(format!("export {{ {} }};", name));
            lines.push(format!("export default {};", name));
        }
    }

    lines.join("\n")
}

fn generate_component_function(name: &str, tree: &Element, config: &ConverterConfig) -> String {
    let param = generate_props_parameter(name, config);

    let mut lines = Vec::new();
    if config.component.forward_ref {
        lines.push(format!("React.forwardRef(({}, ref) => {{", param));
    } else {
        lines.push(format!("({}) => {{", param));
    }

    lines.push("  return (".into());
    lines.push(generate_jsx(tree, config, 2, true));
    lines.push("  );".into());

    lines.push(if config.component.forward_ref { "})" } else { "}" }.into());
    lines.join("\n")
}

fn generate_props_parameter(name: &str, config: &ConverterConfig) -> String {
    let defaults = generate_default_props(config);

    let mut param = if defaults.is_empty() {
        REST_PROPS.to_string()
    } else {
        format!("{{ {}, ...{} }}", defaults, REST_PROPS)
    };

    if config.component.use_types {
        param.push_str(&format!(": {}Props", name));
    }

    param
}

/// Serialize an element subtree as JSX, starting at `indent_level`.
pub fn generate_jsx(elem: &Element, config: &ConverterConfig, indent_level: usize, is_root: bool) -> String {
    let indent = "  ".repeat(indent_level);
    let attrs = generate_attributes(&elem.attributes);
    let spread = if is_root {
        config.props.expand_props
    } else {
        PropsSpread::None
    };
    let spread_props = format!("{{...{}}}", REST_PROPS);

    let mut open = format!("{}<{}", indent, elem.name);

    if attrs.is_empty() {
        if spread != PropsSpread::None {
            open.push(' ');
            open.push_str(&spread_props);
        }
    } else if spread != PropsSpread::None {
        if spread == PropsSpread::Start {
            open.push(' ');
            open.push_str(&spread_props);
        }
        for attr in &attrs {
            open.push_str(&format!("\n{}  {}", indent, attr));
        }
        if spread == PropsSpread::End {
            open.push_str(&format!("\n{}  {}", indent, spread_props));
        }
    } else if attrs.len() <= 2 {
        open.push(' ');
        open.push_str(&attrs.join(" "));
    } else {
        for attr in &attrs {
            open.push_str(&format!("\n{}  {}", indent, attr));
        }
    }

    if elem.children.is_empty() && elem.text.is_none() {
        open.push_str(" />");
        return open;
    }

    open.push('>');
    let mut lines = vec![open];

    if let Some(text) = &elem.text {
        lines.push(format!("{}  {{{}}}", indent, js_string_literal(text)));
    }

    for child in &elem.children {
        lines.push(generate_jsx(child, config, indent_level + 1, false));
    }

    lines.push(format!("{}</{}>", indent, elem.name));
    lines.join("\n")
}

fn generate_attributes(attributes: &Attributes) -> Vec<String> {
    attributes
        .iter()
        .filter_map(|(name, value)| render_attribute(name, value))
        .collect()
}

/// One `name=value` pair, or `None` for empty values.
fn render_attribute(name: &str, value: &AttrValue) -> Option<String> {
    if value.is_empty() {
        return None;
    }

    let rendered = match value {
        AttrValue::Literal(text) => {
            if text.starts_with('{') && text.ends_with('}') {
                format!("{}={}", name, text)
            } else if is_numeric_value(text) {
                format!("{}={{{}}}", name, text.trim())
            } else if text.contains('{') || text.contains(&format!("{}.", REST_PROPS)) {
                format!("{}={{{}}}", name, text)
            } else {
                format!("{}=\"{}\"", name, text.replace('"', "&quot;"))
            }
        }
        AttrValue::Expression(expr) => format!("{}={{{}}}", name, expr),
        AttrValue::PropOr { prop, fallback } => match fallback {
            Fallback::Number(n) => format!("{}={{{} || {}}}", name, prop, n),
            Fallback::Text(t) => format!("{}={{{} || '{}'}}", name, prop, escape_single_quoted(t)),
        },
    };

    Some(rendered)
}

fn is_numeric_value(value: &str) -> bool {
    !value.trim().is_empty() && parse_js_number(value).is_some()
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A double-quoted JS string literal.
fn js_string_literal(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Component name derived from the SVG's `<title>`, PascalCased.
pub fn suggest_component_name(svg: &str) -> String {
    const FALLBACK: &str = "SvgComponent";

    let Some(title) = parse_svg(svg).ok().and_then(|p| p.metadata.title) else {
        return FALLBACK.to_string();
    };

    let name = to_pascal_case(&title);
    match name.chars().next() {
        None => FALLBACK.to_string(),
        Some(c) if c.is_ascii_digit() => format!("Svg{}", name),
        Some(_) => name,
    }
}

fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}
