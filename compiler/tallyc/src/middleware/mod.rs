//! Source preprocessing.
//!
//! Program text passes through a [`MiddlewarePipeline`] before it is
//! segmented. The standard pipeline runs, in order:
//!
//! 1. [`RemoveComments`]: `// …` and `;; …` to end of line, `/* … */` blocks
//! 2. [`FlattenMultiline`]: joins an unterminated line with its indented
//!    continuation
//! 3. [`TrimWhitespace`]: collapses whitespace runs to a single space
//!
//! Every stage leaves double-quoted text untouched.

use tracing::trace;

/// A text-to-text transform applied before segmentation.
pub trait Middleware {
    /// Stable name, used for de-duplication and logging.
    fn name(&self) -> &'static str;

    fn process(&self, input: &str) -> String;
}

/// Walks `input` one char at a time, tracking whether the cursor sits
/// inside a double-quoted string.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    in_quotes: bool,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            input,
            pos: 0,
            in_quotes: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Consume the next char, updating the quote state.
    fn bump(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        if c == '"' {
            self.in_quotes = !self.in_quotes;
        }
        Some(c)
    }

    fn skip(&mut self, len: usize) {
        self.pos = (self.pos + len).min(self.input.len());
    }
}

/// Strips `//` and `;;` line comments and `/* */` block comments.
///
/// A `;;` comment keeps one `;` so the statement before it stays
/// terminated.
#[derive(Clone, Copy, Debug, Default)]
pub struct RemoveComments;

impl Middleware for RemoveComments {
    fn name(&self) -> &'static str {
        "remove-comments"
    }

    fn process(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut cursor = Cursor::new(input);
        loop {
            if !cursor.in_quotes {
                let rest = cursor.rest();
                let line_end = rest.find('\n').unwrap_or(rest.len());
                if rest.starts_with("//") {
                    cursor.skip(line_end);
                    continue;
                }
                if rest.starts_with(";;") {
                    out.push(';');
                    cursor.skip(line_end);
                    continue;
                }
                if rest.starts_with("/*") {
                    cursor.skip(rest[2..].find("*/").map_or(rest.len(), |end| end + 4));
                    out.push(' ');
                    continue;
                }
            }
            match cursor.bump() {
                Some(c) => out.push(c),
                None => break,
            }
        }
        out.trim().to_string()
    }
}

/// Joins a line that does not end in `;` with the indented line after it.
///
/// ```text
/// let total =
///     a + b;
/// ```
/// becomes `let total = a + b;`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlattenMultiline;

impl Middleware for FlattenMultiline {
    fn name(&self) -> &'static str {
        "flatten-multiline"
    }

    fn process(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for line in input.lines() {
            let continues = line.starts_with([' ', '\t'])
                && !line.trim().is_empty()
                && out
                    .trim_end()
                    .chars()
                    .next_back()
                    .is_some_and(|last| last != ';');
            if continues {
                let kept = out.trim_end().len();
                out.truncate(kept);
                out.push(' ');
                out.push_str(line.trim_start());
            } else {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(line);
            }
        }
        out
    }
}

/// Collapses every whitespace run outside quotes to one space.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrimWhitespace;

impl Middleware for TrimWhitespace {
    fn name(&self) -> &'static str {
        "trim-whitespace"
    }

    fn process(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut cursor = Cursor::new(input);
        let mut pending_space = false;
        loop {
            let quoted = cursor.in_quotes;
            let Some(c) = cursor.bump() else { break };
            if !quoted && c.is_whitespace() {
                pending_space = true;
                continue;
            }
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
        out
    }
}

/// Ordered list of middlewares.
#[derive(Default)]
pub struct MiddlewarePipeline {
    stages: Vec<Box<dyn Middleware>>,
}

impl MiddlewarePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comments, then multi-line flattening, then whitespace.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.add(RemoveComments);
        pipeline.add(FlattenMultiline);
        pipeline.add(TrimWhitespace);
        pipeline
    }

    /// Append a stage. A stage whose name is already present is ignored.
    pub fn add(&mut self, middleware: impl Middleware + 'static) {
        if self.stages.iter().any(|s| s.name() == middleware.name()) {
            return;
        }
        self.stages.push(Box::new(middleware));
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn process(&self, input: &str) -> String {
        self.stages.iter().fold(input.to_string(), |text, stage| {
            let processed = stage.process(&text);
            trace!(
                stage = stage.name(),
                before = text.len(),
                after = processed.len(),
                "middleware"
            );
            processed
        })
    }
}

#[cfg(test)]
mod tests;
