//! Converter configuration.
//!
//! A [`ConverterConfig`] is a snapshot handed to every pipeline stage. It is
//! never read from ambient state; callers load it (from JSON presets, CLI
//! flags, or code) and pass it in.

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Which component library the generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `react-native-svg` components.
    #[default]
    ReactNative,
    /// Plain React (web) markup.
    React,
    /// `react-native-svg` components, also rendered on the web.
    ReactNativeWeb,
}

impl OutputFormat {
    /// Whether this format uses the `react-native-svg` element table.
    pub fn is_native(self) -> bool {
        matches!(self, OutputFormat::ReactNative | OutputFormat::ReactNativeWeb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportStyle {
    #[default]
    Default,
    Named,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DimensionMode {
    #[default]
    Remove,
    Keep,
    Custom,
}

/// Where the rest-props spread goes on the root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PropsSpread {
    None,
    Start,
    #[default]
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentConfig {
    pub name: String,
    #[serde(rename = "exportType")]
    pub export_style: ExportStyle,
    #[serde(rename = "typescript")]
    pub use_types: bool,
    pub memo: bool,
    pub forward_ref: bool,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            name: "SvgComponent".into(),
            export_style: ExportStyle::Default,
            use_types: true,
            memo: false,
            forward_ref: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DimensionsConfig {
    pub mode: DimensionMode,
    pub custom_width: Option<f64>,
    pub custom_height: Option<f64>,
    pub preserve_view_box: bool,
}

impl Default for DimensionsConfig {
    fn default() -> Self {
        Self {
            mode: DimensionMode::Remove,
            custom_width: None,
            custom_height: None,
            preserve_view_box: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PropsConfig {
    pub expand_props: PropsSpread,
    /// Adds a `style` prop to the generated props interface.
    #[serde(rename = "native")]
    pub native_style: bool,
    pub title_prop: bool,
    pub desc_prop: bool,
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            expand_props: PropsSpread::End,
            native_style: true,
            title_prop: false,
            desc_prop: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IconConfig {
    pub enabled: bool,
    pub default_size: f64,
    #[serde(rename = "replaceColor")]
    pub replace_color_with_prop: bool,
    pub accessible: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_size: 24.0,
            replace_color_with_prop: false,
            accessible: true,
        }
    }
}

/// A literal find/replace rule over attribute values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeReplacement {
    pub find: String,
    pub replace: String,
    /// Lowercase element names this rule is limited to. `None` or empty
    /// means every element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<String>>,
}

impl AttributeReplacement {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
            elements: None,
        }
    }

    pub fn only_on<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.elements = Some(elements.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_restricted(&self) -> bool {
        self.elements.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Whether this rule applies to an element with the given mapped name.
    pub fn applies_to(&self, element_name: &str) -> bool {
        match &self.elements {
            Some(elements) if !elements.is_empty() => {
                let lower = element_name.to_lowercase();
                elements.iter().any(|e| *e == lower)
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttributesConfig {
    pub replacements: Vec<AttributeReplacement>,
    #[serde(rename = "removeDataAttributes")]
    pub remove_data_attrs: bool,
    #[serde(rename = "removeAriaAttributes")]
    pub remove_aria_attrs: bool,
}

impl Default for AttributesConfig {
    fn default() -> Self {
        Self {
            replacements: Vec::new(),
            remove_data_attrs: true,
            remove_aria_attrs: false,
        }
    }
}

/// One svgo plugin entry. Passed through to the optimizer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl PluginConfig {
    fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            params: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub enabled: bool,
    pub plugins: Vec<PluginConfig>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        let mut plugins: Vec<PluginConfig> = [
            "removeDoctype",
            "removeXMLProcInst",
            "removeComments",
            "removeMetadata",
            "removeEditorsNSData",
            "cleanupAttrs",
            "mergeStyles",
            "inlineStyles",
            "minifyStyles",
            "cleanupIds",
            "removeUselessDefs",
            "cleanupNumericValues",
            "convertColors",
            "removeUnknownsAndDefaults",
            "removeNonInheritableGroupAttrs",
            "removeUselessStrokeAndFill",
        ]
        .into_iter()
        .map(PluginConfig::named)
        .collect();

        plugins.push(PluginConfig {
            name: "removeViewBox".into(),
            params: Some(serde_json::json!({ "removeViewBox": false })),
        });

        plugins.extend(
            [
                "cleanupEnableBackground",
                "removeHiddenElems",
                "removeEmptyText",
                "convertShapeToPath",
                "convertEllipseToCircle",
                "moveElemsAttrsToGroup",
                "moveGroupAttrsToElems",
                "collapseGroups",
                "convertPathData",
                "convertTransform",
                "removeEmptyAttrs",
                "removeEmptyContainers",
            ]
            .into_iter()
            .map(PluginConfig::named),
        );

        Self {
            enabled: true,
            plugins,
        }
    }
}

/// Pretty-printer settings. Passed through to the formatter untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeStyle {
    pub semi: bool,
    pub single_quote: bool,
    pub tab_width: u8,
    pub print_width: u16,
}

impl Default for CodeStyle {
    fn default() -> Self {
        Self {
            semi: true,
            single_quote: true,
            tab_width: 2,
            print_width: 80,
        }
    }
}

/// Complete converter configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConverterConfig {
    pub output_format: OutputFormat,
    pub component: ComponentConfig,
    pub dimensions: DimensionsConfig,
    pub props: PropsConfig,
    pub icon: IconConfig,
    pub attributes: AttributesConfig,
    #[serde(rename = "svgo")]
    pub optimizer: OptimizerConfig,
    pub code_style: CodeStyle,
}

impl ConverterConfig {
    /// Parse a (possibly partial) JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConvertError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_tool_defaults() {
        let config = ConverterConfig::default();
        assert_eq!(config.output_format, OutputFormat::ReactNative);
        assert_eq!(config.component.name, "SvgComponent");
        assert!(config.component.use_types);
        assert_eq!(config.dimensions.mode, DimensionMode::Remove);
        assert!(config.dimensions.preserve_view_box);
        assert_eq!(config.props.expand_props, PropsSpread::End);
        assert_eq!(config.icon.default_size, 24.0);
        assert!(config.attributes.remove_data_attrs);
        assert!(!config.attributes.remove_aria_attrs);
        assert!(config.optimizer.enabled);
        assert_eq!(config.optimizer.plugins.len(), 29);
    }

    #[test]
    fn test_partial_json() {
        let config = ConverterConfig::from_json(
            r##"{
                "outputFormat": "react",
                "component": { "name": "Logo", "exportType": "both" },
                "icon": { "enabled": true, "replaceColor": true },
                "attributes": { "replacements": [{ "find": "#000", "replace": "currentColor", "elements": ["path"] }] }
            }"##,
        )
        .unwrap();

        assert_eq!(config.output_format, OutputFormat::React);
        assert_eq!(config.component.name, "Logo");
        assert_eq!(config.component.export_style, ExportStyle::Both);
        // Untouched fields keep their defaults
        assert!(config.component.use_types);
        assert!(config.icon.replace_color_with_prop);
        assert_eq!(config.icon.default_size, 24.0);
        assert!(config.attributes.replacements[0].is_restricted());
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ConverterConfig::from_json(r#"{"outputFormat": "flutter"}"#).unwrap_err();
        assert!(matches!(err, ConvertError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_original_keys() {
        let json = ConverterConfig::default().to_json().unwrap();
        assert!(json.contains("\"exportType\""));
        assert!(json.contains("\"svgo\""));
        assert!(json.contains("\"codeStyle\""));
        assert_eq!(ConverterConfig::from_json(&json).unwrap(), ConverterConfig::default());
    }

    #[test]
    fn test_replacement_scope() {
        let any = AttributeReplacement::new("a", "b");
        assert!(any.applies_to("Path"));

        let paths = AttributeReplacement::new("a", "b").only_on(["path"]);
        assert!(paths.applies_to("Path"));
        assert!(!paths.applies_to("Circle"));

        let empty = AttributeReplacement::new("a", "b").only_on(Vec::<String>::new());
        assert!(!empty.is_restricted());
        assert!(empty.applies_to("Circle"));
    }
}
