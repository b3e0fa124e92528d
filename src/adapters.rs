//! External optimizer and formatter.
//!
//! Both are black boxes to the pipeline: a string goes in, a string comes
//! out. The shipped implementations shell out to `svgo` and `prettier`.
//! Failures are reported as errors here and recovered from by the caller.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use serde::Serialize;

use crate::config::{CodeStyle, OptimizerConfig, PluginConfig};
use crate::error::ConvertError;

/// A generic SVG minifier run before parsing.
pub trait SvgOptimizer {
    fn optimize(&self, svg: &str, config: &OptimizerConfig) -> Result<String, ConvertError>;
}

/// A source pretty-printer run after code generation.
pub trait CodeFormatter {
    fn format(&self, code: &str, style: &CodeStyle) -> Result<String, ConvertError>;
}

/// Pipe `input` through a child process and collect its stdout.
fn run_filter(cmd: &mut Command, input: &str) -> Result<String, String> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("failed to spawn {:?}: {}", cmd.get_program(), e))?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| "child stdin unavailable".to_string())?;

    // stdin is written from its own thread while stdout and stderr drain here
    let input = input.to_owned();
    let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child
        .wait_with_output()
        .map_err(|e| format!("failed to wait for child: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("exited with {}: {}", output.status, stderr.trim()));
    }

    writer
        .join()
        .map_err(|_| "input writer panicked".to_string())?
        .map_err(|e| format!("failed to write input: {}", e))?;

    String::from_utf8(output.stdout).map_err(|e| format!("output is not UTF-8: {}", e))
}

/// Find a Node tool: the project-local `node_modules/.bin` first, then `PATH`.
pub fn locate_tool(name: &str, project_root: &Path) -> Option<PathBuf> {
    let local = project_root.join("node_modules/.bin").join(name);
    if local.exists() {
        return Some(local);
    }

    let on_path = Command::new(name)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false);

    on_path.then(|| PathBuf::from(name))
}

/// Runs the `svgo` CLI.
#[derive(Debug, Clone)]
pub struct Svgo {
    pub command: PathBuf,
}

#[derive(Serialize)]
struct SvgoConfigFile<'a> {
    multipass: bool,
    plugins: &'a [PluginConfig],
}

impl Svgo {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for Svgo {
    fn default() -> Self {
        Self::new("svgo")
    }
}

impl SvgOptimizer for Svgo {
    fn optimize(&self, svg: &str, config: &OptimizerConfig) -> Result<String, ConvertError> {
        let settings = SvgoConfigFile {
            multipass: true,
            plugins: &config.plugins,
        };

        let mut file = tempfile::Builder::new()
            .prefix("svgo.config.")
            .suffix(".mjs")
            .tempfile()?;
        writeln!(file, "export default {};", serde_json::to_string(&settings)?)?;
        file.flush()?;

        let mut cmd = Command::new(&self.command);
        cmd.arg("--config")
            .arg(file.path())
            .args(["--input", "-", "--output", "-"]);

        run_filter(&mut cmd, svg).map_err(ConvertError::OptimizerFailure)
    }
}

/// Runs the `prettier` CLI with the TypeScript parser.
#[derive(Debug, Clone)]
pub struct Prettier {
    pub command: PathBuf,
}

impl Prettier {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// CLI flags for a code style.
    pub fn args(style: &CodeStyle) -> Vec<String> {
        let mut args = vec!["--parser".to_string(), "typescript".to_string()];
        if !style.semi {
            args.push("--no-semi".into());
        }
        if style.single_quote {
            args.push("--single-quote".into());
        }
        args.extend([
            "--tab-width".to_string(),
            style.tab_width.to_string(),
            "--print-width".to_string(),
            style.print_width.to_string(),
            "--trailing-comma".to_string(),
            "es5".to_string(),
            "--arrow-parens".to_string(),
            "always".to_string(),
            "--end-of-line".to_string(),
            "lf".to_string(),
        ]);
        args
    }
}

impl Default for Prettier {
    fn default() -> Self {
        Self::new("prettier")
    }
}

impl CodeFormatter for Prettier {
    fn format(&self, code: &str, style: &CodeStyle) -> Result<String, ConvertError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(Self::args(style));
        run_filter(&mut cmd, code).map_err(ConvertError::FormatterFailure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettier_args() {
        let style = CodeStyle {
            semi: false,
            single_quote: true,
            tab_width: 4,
            print_width: 100,
        };
        let args = Prettier::args(&style);
        assert_eq!(&args[..2], ["--parser", "typescript"]);
        assert!(args.contains(&"--no-semi".to_string()));
        assert!(args.contains(&"--single-quote".to_string()));
        let tab = args.iter().position(|a| a == "--tab-width").unwrap();
        assert_eq!(args[tab + 1], "4");
        let width = args.iter().position(|a| a == "--print-width").unwrap();
        assert_eq!(args[width + 1], "100");
    }

    #[test]
    fn test_missing_optimizer_binary_is_optimizer_failure() {
        let svgo = Svgo::new("/nonexistent/svgo-binary");
        let err = svgo
            .optimize("<svg/>", &OptimizerConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConvertError::OptimizerFailure(_)));
    }

    #[test]
    fn test_missing_formatter_binary_is_formatter_failure() {
        let prettier = Prettier::new("/nonexistent/prettier-binary");
        let err = prettier.format("const a = 1;", &CodeStyle::default()).unwrap_err();
        assert!(matches!(err, ConvertError::FormatterFailure(_)));
    }

    #[test]
    fn test_locate_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_tool("definitely-not-a-real-tool-xyz", dir.path()).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_filter_roundtrip() {
        let out = run_filter(&mut Command::new("cat"), "<svg/>").unwrap();
        assert_eq!(out, "<svg/>");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_filter_child_writing_stderr_before_reading() {
        // Well past a pipe buffer on both streams
        let input = "a".repeat(256 * 1024);
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "head -c 262144 /dev/zero >&2; cat"]);
        let out = run_filter(&mut cmd, &input).unwrap();
        assert_eq!(out.len(), input.len());
    }
}
