//! Run configuration from command line flags and the environment.
//!
//! ```text
//! --color=auto|always|never   diagnostic colors (NO_COLOR forces never)
//! --max-steps=N               stop after N dispatched statements
//! --quiet, -q                 discard program output
//! ```

use std::io::Write;

use tally_diagnostic::emitter::{ColorMode, TerminalEmitter};
use tally_eval::{buffer_handler, silent_handler, stdout_handler, Interpreter, SharedPrintHandler};
use tally_patterns::RegistryError;

/// Where program output goes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintTarget {
    #[default]
    Stdout,
    Buffer,
    Silent,
}

impl PrintTarget {
    fn handler(self) -> SharedPrintHandler {
        match self {
            PrintTarget::Stdout => stdout_handler(),
            PrintTarget::Buffer => buffer_handler(),
            PrintTarget::Silent => silent_handler(),
        }
    }
}

/// A rejected command line option.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for --color: `{0}` (expected auto, always or never)")]
    InvalidColor(String),
    #[error("invalid value for --max-steps: `{0}` (expected a positive integer)")]
    InvalidMaxSteps(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
}

/// Settings shared by `run` and `check`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub color: ColorMode,
    pub print: PrintTarget,
    /// `None` runs without a limit.
    pub max_steps: Option<u64>,
}

impl InterpreterConfig {
    /// Parse `args` against the process environment.
    ///
    /// Returns the configuration and the positional arguments, in order.
    pub fn from_args(args: &[String]) -> Result<(Self, Vec<String>), ConfigError> {
        let no_color = std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty());
        Self::parse(args, no_color)
    }

    /// Parse `args`; `no_color` mirrors a non-empty `NO_COLOR`.
    pub fn parse(args: &[String], no_color: bool) -> Result<(Self, Vec<String>), ConfigError> {
        let mut config = InterpreterConfig::default();
        let mut positional = Vec::new();

        for arg in args {
            if let Some(value) = arg.strip_prefix("--color=") {
                config.color =
                    ColorMode::parse(value).ok_or_else(|| ConfigError::InvalidColor(value.into()))?;
            } else if let Some(value) = arg.strip_prefix("--max-steps=") {
                let limit = value
                    .parse::<u64>()
                    .ok()
                    .filter(|&n| n > 0)
                    .ok_or_else(|| ConfigError::InvalidMaxSteps(value.into()))?;
                config.max_steps = Some(limit);
            } else if arg == "--quiet" || arg == "-q" {
                config.print = PrintTarget::Silent;
            } else if arg.starts_with('-') && arg.len() > 1 {
                return Err(ConfigError::UnknownOption(arg.clone()));
            } else {
                positional.push(arg.clone());
            }
        }

        if no_color {
            config.color = ColorMode::Never;
        }
        Ok((config, positional))
    }

    /// Interpreter with the built-in operations and this configuration.
    pub fn build_interpreter(&self) -> Result<Interpreter, RegistryError> {
        Interpreter::builder()
            .print_handler(self.print.handler())
            .max_steps(self.max_steps)
            .build()
    }

    /// Diagnostic emitter honoring the color setting.
    pub fn emitter<W: Write>(&self, writer: W, is_tty: bool) -> TerminalEmitter<W> {
        TerminalEmitter::with_color_mode(writer, self.color, is_tty)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_defaults() {
        let (config, positional) = InterpreterConfig::parse(&args(&["main.tly"]), false).unwrap();
        assert_eq!(config, InterpreterConfig::default());
        assert_eq!(config.color, ColorMode::Auto);
        assert_eq!(positional, vec!["main.tly"]);
    }

    #[test]
    fn test_flags_anywhere() {
        let (config, positional) = InterpreterConfig::parse(
            &args(&["--max-steps=50", "main.tly", "--color=always", "-q"]),
            false,
        )
        .unwrap();
        assert_eq!(config.max_steps, Some(50));
        assert_eq!(config.color, ColorMode::Always);
        assert_eq!(config.print, PrintTarget::Silent);
        assert_eq!(positional, vec!["main.tly"]);
    }

    #[test]
    fn test_no_color_forces_never() {
        let (config, _) = InterpreterConfig::parse(&args(&["--color=always"]), true).unwrap();
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_rejected_options() {
        assert_eq!(
            InterpreterConfig::parse(&args(&["--color=pink"]), false),
            Err(ConfigError::InvalidColor("pink".into()))
        );
        assert_eq!(
            InterpreterConfig::parse(&args(&["--max-steps=0"]), false),
            Err(ConfigError::InvalidMaxSteps("0".into()))
        );
        assert_eq!(
            InterpreterConfig::parse(&args(&["--max-steps=lots"]), false),
            Err(ConfigError::InvalidMaxSteps("lots".into()))
        );
        assert_eq!(
            InterpreterConfig::parse(&args(&["--fast"]), false),
            Err(ConfigError::UnknownOption("--fast".into()))
        );
    }

    #[test]
    fn test_built_interpreter_honors_print_target() {
        let config = InterpreterConfig {
            print: PrintTarget::Buffer,
            ..InterpreterConfig::default()
        };
        let mut interpreter = config.build_interpreter().unwrap();
        interpreter.run("print 1 + 1").unwrap();
        assert_eq!(interpreter.output(), "2\n");
    }
}
