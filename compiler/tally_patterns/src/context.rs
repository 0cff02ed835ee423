//! Inputs bound for one operation invocation.
//!
//! The dispatcher fills an `OperationContext` from the operation's declared
//! [`InputSpec`]s; the operation reads them back through accessors that fail
//! with `UnsupportedInput` when an input was never declared. This keeps the
//! declaration and the use in sync: an operation cannot quietly read a jump
//! offset it did not ask for.

use tally_ir::Span;

use crate::errors::{unsupported_input, EvalError};
use crate::{EvalResult, InputSpec, OperationExecutor, Value};

/// Captured text and its byte offset in the matched haystack.
#[derive(Copy, Clone, Debug)]
struct Capture<'a> {
    text: &'a str,
    offset: usize,
}

/// Bound inputs for one invocation.
pub struct OperationContext<'a> {
    operation: &'static str,
    declared: &'static [InputSpec],
    captures: Vec<(usize, Option<Capture<'a>>)>,
    converted: Vec<(usize, Value)>,
    line: Option<usize>,
    lines: Option<&'a [String]>,
    jump: Option<isize>,
}

impl<'a> OperationContext<'a> {
    /// Empty context for `operation` with its declared inputs.
    pub fn new(operation: &'static str, declared: &'static [InputSpec]) -> Self {
        OperationContext {
            operation,
            declared,
            captures: Vec::new(),
            converted: Vec::new(),
            line: None,
            lines: None,
            jump: None,
        }
    }

    /// Name of the operation being invoked.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    // Binding (dispatcher side)

    /// Bind capture `index`; `None` when the group did not participate.
    pub fn bind_capture(&mut self, index: usize, capture: Option<(&'a str, usize)>) {
        let capture = capture.map(|(text, offset)| Capture { text, offset });
        self.captures.push((index, capture));
    }

    /// Bind the converter output for capture `index`.
    pub fn bind_converted(&mut self, index: usize, value: Value) {
        self.converted.push((index, value));
    }

    pub fn bind_line(&mut self, line: usize) {
        self.line = Some(line);
    }

    pub fn bind_lines(&mut self, lines: &'a [String]) {
        self.lines = Some(lines);
    }

    /// Enable the jump output, initialised to 0.
    pub fn bind_jump(&mut self) {
        self.jump = Some(0);
    }

    // Access (operation side)

    fn unsupported(&self, spec: InputSpec) -> EvalError {
        unsupported_input(self.operation, &spec.describe())
    }

    fn bound_capture(&self, index: usize) -> Result<Option<Capture<'a>>, EvalError> {
        let declared = self.declared.iter().any(|spec| {
            matches!(spec, InputSpec::Capture(i) | InputSpec::Converted(i, _) if *i == index)
        });
        if !declared {
            return Err(self.unsupported(InputSpec::Capture(index)));
        }
        Ok(self
            .captures
            .iter()
            .find(|(i, _)| *i == index)
            .and_then(|(_, capture)| *capture))
    }

    /// Text of a capture that must have participated in the match.
    pub fn capture(&self, index: usize) -> Result<&'a str, EvalError> {
        self.bound_capture(index)?
            .map(|c| c.text)
            .ok_or_else(|| {
                EvalError::new(format!(
                    "operation `{}` matched without capture {index}",
                    self.operation
                ))
            })
    }

    /// Text of an optional capture group.
    pub fn optional_capture(&self, index: usize) -> Result<Option<&'a str>, EvalError> {
        Ok(self.bound_capture(index)?.map(|c| c.text))
    }

    /// Span of a capture within the statement, if it participated.
    pub fn capture_span(&self, index: usize) -> Option<Span> {
        let capture = self.bound_capture(index).ok()??;
        Some(Span::from_range(
            capture.offset..capture.offset + capture.text.len(),
        ))
    }

    /// Converter output for capture `index`.
    pub fn converted(&self, index: usize) -> EvalResult {
        self.converted
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| self.unsupported(InputSpec::Capture(index)))
    }

    /// Index of the statement being executed.
    pub fn current_line(&self) -> Result<usize, EvalError> {
        self.line
            .ok_or_else(|| self.unsupported(InputSpec::CurrentLine))
    }

    /// Every statement of the program.
    pub fn lines(&self) -> Result<&'a [String], EvalError> {
        self.lines.ok_or_else(|| self.unsupported(InputSpec::Lines))
    }

    /// Set the jump offset applied after this statement.
    pub fn set_jump(&mut self, offset: isize) -> Result<(), EvalError> {
        match self.jump.as_mut() {
            Some(jump) => {
                *jump = offset;
                Ok(())
            }
            None => Err(self.unsupported(InputSpec::JumpOffset)),
        }
    }

    /// Jump offset to apply; 0 when the operation declares none.
    pub fn jump(&self) -> isize {
        self.jump.unwrap_or(0)
    }

    /// Evaluate capture `index` as an expression.
    ///
    /// Error spans are re-based from the capture onto the statement.
    pub fn eval_capture(&self, index: usize, exec: &mut dyn OperationExecutor) -> EvalResult {
        let text = self.capture(index)?;
        exec.eval(text).map_err(|err| self.relocate(index, err))
    }

    /// Parse capture `value` as a literal or expression with the optional
    /// type named by capture `type_index`.
    pub fn parse_capture(
        &self,
        value: usize,
        type_index: usize,
        exec: &mut dyn OperationExecutor,
    ) -> EvalResult {
        let text = self.capture(value)?;
        let type_name = self.optional_capture(type_index)?;
        exec.parse_value(text, type_name)
            .map_err(|err| self.relocate(value, err))
    }

    /// Re-base an error raised while working on capture `index`.
    pub fn relocate(&self, index: usize, err: EvalError) -> EvalError {
        match self.bound_capture(index) {
            Ok(Some(capture)) => {
                let fallback =
                    Span::from_range(capture.offset..capture.offset + capture.text.len());
                err.shifted(capture.offset, fallback)
            }
            _ => err,
        }
    }
}
