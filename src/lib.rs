//! svgcomp - SVG to React Native / React component converter
//!
//! svgcomp parses SVG markup, remaps elements and attributes for the target
//! component library, applies configurable transforms, and renders component
//! source with imports, prop types and a usage example.

mod adapters;
mod ast;
mod attributes;
mod codegen;
mod config;
mod error;
mod mapping;
mod optimize;
mod parse;
mod transform;
mod validate;

pub use adapters::*;
pub use ast::*;
pub use attributes::*;
pub use codegen::*;
pub use config::*;
pub use error::*;
pub use mapping::*;
pub use optimize::*;
pub use parse::*;
pub use transform::*;
pub use validate::*;

use tracing::{debug, warn};

/// Size and shape figures for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Number of distinct element types in the SVG
    pub element_count: usize,
    /// Input size in bytes
    pub original_size: usize,
    /// Size after the optimizer ran (equal to `original_size` if it didn't)
    pub optimized_size: usize,
}

impl ConversionStats {
    pub fn saved_bytes(&self) -> usize {
        self.original_size.saturating_sub(self.optimized_size)
    }

    pub fn saved_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.saved_bytes() as f64 / self.original_size as f64) * 100.0
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub code: String,
    pub imports: String,
    pub type_definitions: Option<String>,
    pub usage_example: String,
    pub prop_types: Option<String>,
    pub metadata: SvgMetadata,
    pub stats: ConversionStats,
    /// Advisory; the code is usable regardless
    pub warnings: Vec<String>,
    /// Tags passed through unchanged because the target has no component
    pub unsupported_elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Success(Conversion),
    Failure {
        error: String,
        /// Warnings gathered before the failure
        warnings: Vec<String>,
    },
}

impl ConversionResult {
    fn failure(error: ConvertError, warnings: Vec<String>) -> Self {
        ConversionResult::Failure {
            error: error.to_string(),
            warnings,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success(_))
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ConversionResult::Success(c) => Some(&c.code),
            ConversionResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ConversionResult::Success(_) => None,
            ConversionResult::Failure { error, .. } => Some(error),
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            ConversionResult::Success(c) => &c.warnings,
            ConversionResult::Failure { warnings, .. } => warnings,
        }
    }

    pub fn into_result(self) -> Result<Conversion, String> {
        match self {
            ConversionResult::Success(c) => Ok(c),
            ConversionResult::Failure { error, .. } => Err(error),
        }
    }
}

/// Conversion pipeline with optional external optimizer and formatter.
#[derive(Default)]
pub struct Converter {
    optimizer: Option<Box<dyn SvgOptimizer>>,
    formatter: Option<Box<dyn CodeFormatter>>,
}

impl Converter {
    /// A converter with no external tools.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_optimizer(mut self, optimizer: impl SvgOptimizer + 'static) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    pub fn with_formatter(mut self, formatter: impl CodeFormatter + 'static) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Convert an SVG string. Never panics on bad input; every failure comes
    /// back as [`ConversionResult::Failure`].
    pub fn convert(&self, svg: &str, config: &ConverterConfig) -> ConversionResult {
        let validation = match validate(svg) {
            Ok(v) => v,
            Err(e) => return ConversionResult::failure(e, Vec::new()),
        };
        let warnings = validation.warnings;

        let optimized = self.run_optimizer(svg, config);
        let parsed = match optimized.as_deref() {
            None => validation.parsed,
            Some(optimized) => match parse_svg(optimized) {
                Ok(parsed) => parsed,
                Err(e) => return ConversionResult::failure(e, warnings),
            },
        };

        let format = config.output_format;
        let mut tree = map_elements(&parsed.root, format);
        tree = transform_attributes(&tree, config);
        tree = apply_dimensions(&tree, config);
        tree = apply_icon_mode(&tree, config);
        if !config.attributes.replacements.is_empty() {
            tree = apply_replacements(&tree, &config.attributes.replacements);
        }
        tree = optimize_tree(&tree);

        let used_imports = required_imports(&parsed.elements, format);
        let generated = generate(&tree, &used_imports, config);
        debug!(
            elements = tree.count(),
            imports = used_imports.len(),
            "generated component"
        );

        let code = self.run_formatter(generated.code, config);

        let stats = ConversionStats {
            element_count: parsed.elements.len(),
            original_size: svg.len(),
            optimized_size: optimized.as_deref().map_or(svg.len(), str::len),
        };

        ConversionResult::Success(Conversion {
            code,
            imports: generated.imports,
            type_definitions: non_empty(generated.type_definitions),
            usage_example: generated.usage_example,
            prop_types: non_empty(generated.prop_types),
            metadata: parsed.metadata,
            stats,
            warnings,
            unsupported_elements: unsupported_elements(&parsed.elements, format),
        })
    }

    /// `Some(output)` only when the optimizer ran and succeeded.
    fn run_optimizer(&self, svg: &str, config: &ConverterConfig) -> Option<String> {
        if !config.optimizer.enabled {
            return None;
        }
        let optimizer = self.optimizer.as_ref()?;

        match optimizer.optimize(svg, &config.optimizer) {
            Ok(optimized) => {
                debug!(from = svg.len(), to = optimized.len(), "optimized svg");
                Some(optimized)
            }
            Err(e) => {
                warn!(error = %e, "svg optimization failed, using original input");
                None
            }
        }
    }

    fn run_formatter(&self, code: String, config: &ConverterConfig) -> String {
        let Some(formatter) = &self.formatter else {
            return code;
        };

        match formatter.format(&code, &config.code_style) {
            Ok(formatted) => formatted,
            Err(e) => {
                warn!(error = %e, "formatting failed, using unformatted code");
                code
            }
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Convert without any external tools.
pub fn convert(svg: &str, config: &ConverterConfig) -> ConversionResult {
    Converter::new().convert(svg, config)
}
