use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use svgcomp::{
    Conversion, ConversionResult, Converter, ConverterConfig, DimensionMode,
    ExportStyle, OutputFormat, Prettier, PropsSpread, Svgo, locate_tool,
    suggest_component_name,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Code,
    Imports,
    Types,
    Usage,
    All,
}

#[derive(Parser)]
#[command(name = "svgcomp")]
#[command(about = "Convert SVG markup into React Native / React components", long_about = None)]
struct Cli {
    /// Input file (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout)
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Target component library
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Component name ("auto" derives it from the SVG title)
    #[arg(short, long)]
    name: Option<String>,

    #[arg(long)]
    export: Option<ExportStyle>,

    /// Emit plain JavaScript instead of TypeScript
    #[arg(long)]
    no_types: bool,

    /// Wrap the component in React.memo
    #[arg(long)]
    memo: bool,

    /// Wrap the component in React.forwardRef
    #[arg(long)]
    forward_ref: bool,

    /// How to treat the root width/height
    #[arg(long)]
    dimensions: Option<DimensionMode>,

    /// Width for --dimensions custom
    #[arg(long)]
    width: Option<f64>,

    /// Height for --dimensions custom
    #[arg(long)]
    height: Option<f64>,

    /// Drop the viewBox attribute
    #[arg(long)]
    no_view_box: bool,

    /// Where to spread the rest props on the root element
    #[arg(long)]
    expand_props: Option<PropsSpread>,

    /// Icon mode: size (and with --icon-color, color) become props
    #[arg(long)]
    icon: bool,

    /// Default icon size
    #[arg(long)]
    icon_size: Option<f64>,

    /// Replace fill/stroke colors with a color prop (implies --icon)
    #[arg(long)]
    icon_color: bool,

    /// Run svgo before converting
    #[arg(long)]
    optimize: bool,

    /// Path to the svgo executable
    #[arg(long)]
    svgo: Option<PathBuf>,

    /// Path to the prettier executable
    #[arg(long)]
    prettier: Option<PathBuf>,

    /// Skip prettier even if it is available
    #[arg(long)]
    no_format: bool,

    /// What to write
    #[arg(long, value_enum, default_value = "code")]
    emit: Emit,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,
}

impl Cli {
    fn build_config(&self, input: &str) -> Result<ConverterConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::load(path)?,
            None => ConverterConfig::default(),
        };

        if let Some(format) = self.format {
            config.output_format = format;
        }
        match self.name.as_deref() {
            Some("auto") => config.component.name = suggest_component_name(input),
            Some(name) => config.component.name = name.to_string(),
            None => {}
        }
        if let Some(export) = self.export {
            config.component.export_style = export;
        }
        if self.no_types {
            config.component.use_types = false;
        }
        config.component.memo |= self.memo;
        config.component.forward_ref |= self.forward_ref;

        if let Some(mode) = self.dimensions {
            config.dimensions.mode = mode;
        }
        if self.width.is_some() {
            config.dimensions.custom_width = self.width;
        }
        if self.height.is_some() {
            config.dimensions.custom_height = self.height;
        }
        if self.no_view_box {
            config.dimensions.preserve_view_box = false;
        }
        if let Some(spread) = self.expand_props {
            config.props.expand_props = spread;
        }

        config.icon.enabled |= self.icon || self.icon_color;
        config.icon.replace_color_with_prop |= self.icon_color;
        if let Some(size) = self.icon_size {
            config.icon.default_size = size;
        }

        // Without a config file, svgo only runs when asked for
        if self.config.is_none() {
            config.optimizer.enabled = self.optimize;
        }
        config.optimizer.enabled |= self.optimize;

        Ok(config)
    }

    fn build_converter(&self, config: &ConverterConfig) -> Converter {
        let root = std::env::current_dir().unwrap_or_default();
        let mut converter = Converter::new();

        if config.optimizer.enabled {
            match self.svgo.clone().or_else(|| locate_tool("svgo", &root)) {
                Some(path) => converter = converter.with_optimizer(Svgo::new(path)),
                None => tracing::warn!("svgo not found, skipping optimization"),
            }
        }

        if !self.no_format {
            if let Some(path) = self.prettier.clone().or_else(|| locate_tool("prettier", &root)) {
                converter = converter.with_formatter(Prettier::new(path));
            } else {
                tracing::debug!("prettier not found, emitting unformatted code");
            }
        }

        converter
    }
}

fn render(conversion: &Conversion, emit: Emit) -> String {
    let mut out = match emit {
        Emit::Code => conversion.code.clone(),
        Emit::Imports => conversion.imports.clone(),
        Emit::Types => conversion.type_definitions.clone().unwrap_or_default(),
        Emit::Usage => conversion.usage_example.clone(),
        Emit::All => {
            let mut parts = vec![conversion.code.trim_end().to_string()];
            if let Some(prop_types) = &conversion.prop_types {
                parts.push(prop_types.clone());
            }
            parts.push(conversion.usage_example.clone());
            parts.join("\n\n")
        }
    };
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cli.input)?
    };

    let config = cli.build_config(&input)?;
    let converter = cli.build_converter(&config);

    let conversion = match converter.convert(&input, &config) {
        ConversionResult::Success(conversion) => conversion,
        ConversionResult::Failure { error, warnings } => {
            for warning in &warnings {
                eprintln!("warning: {}", warning);
            }
            return Err(error.into());
        }
    };

    for warning in &conversion.warnings {
        eprintln!("warning: {}", warning);
    }
    if !conversion.unsupported_elements.is_empty() && config.output_format.is_native() {
        eprintln!(
            "note: passed through without a native component: {}",
            conversion.unsupported_elements.join(", ")
        );
    }

    let output = render(&conversion, cli.emit);

    // Write output
    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(output.as_bytes())?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    // Print stats if requested
    if cli.stats {
        let stats = conversion.stats;
        eprintln!(
            "{} element types, {} -> {} bytes ({:.1}% smaller)",
            stats.element_count,
            stats.original_size,
            stats.optimized_size,
            stats.saved_percent()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "svgcomp",
            "icon.svg",
            "--format",
            "react-native-web",
            "--name",
            "auto",
            "--icon-color",
            "--icon-size",
            "32",
            "--dimensions",
            "keep",
        ]);
        let config = cli
            .build_config("<svg><title>star outline</title></svg>")
            .unwrap();

        assert_eq!(config.output_format, OutputFormat::ReactNativeWeb);
        assert_eq!(config.component.name, "StarOutline");
        assert!(config.icon.enabled);
        assert!(config.icon.replace_color_with_prop);
        assert_eq!(config.icon.default_size, 32.0);
        assert_eq!(config.dimensions.mode, DimensionMode::Keep);
        assert!(!config.optimizer.enabled);
        assert_eq!(config.code_style, svgcomp::CodeStyle::default());
    }
}
