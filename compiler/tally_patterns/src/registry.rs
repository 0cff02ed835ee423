//! Operation registry: matching, scoring and input binding.
//!
//! Every statement is matched against every registered pattern. When more
//! than one matches, the highest score wins:
//!
//! ```text
//! score = groups * 1000 - wildcards * 500 + matched_len * 2 + pattern_len
//! ```
//!
//! `groups` counts capture groups that took part in the match, `wildcards`
//! counts `.*`/`.+` in the pattern text. Equal scores go to the operation
//! registered first. When nothing matches, the registry reports the longest
//! statement prefix some pattern accepts in full, for the
//! "recognized up to here" diagnostic.

use regex::{Captures, Regex};
use rustc_hash::FxHashMap;
use tally_ir::Span;
use tracing::trace;

use crate::builtins;
use crate::converters::converter;
use crate::errors::{conversion_failed, EvalError};
use crate::{InputSpec, MatchScope, OperationContext, OperationDefinition};

/// Problems found while building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("operation `{name}` has an invalid pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("operation `{0}` is registered twice")]
    DuplicateName(&'static str),
    #[error("operation `{operation}` uses unknown converter `{converter}`")]
    UnknownConverter {
        operation: &'static str,
        converter: &'static str,
    },
}

struct RegisteredOperation {
    definition: &'static dyn OperationDefinition,
    regex: Regex,
    /// `^(?:pattern)$`, for partial-match diagnostics.
    anchored: Regex,
    wildcards: usize,
}

/// The operation chosen for a statement.
pub struct Selection<'t> {
    pub operation: &'static dyn OperationDefinition,
    pub captures: Captures<'t>,
    pub score: i64,
}

/// Ordered collection of operations.
pub struct OperationRegistry {
    entries: Vec<RegisteredOperation>,
    by_name: FxHashMap<&'static str, usize>,
}

impl OperationRegistry {
    /// Registry with no operations.
    pub fn new() -> Self {
        OperationRegistry {
            entries: Vec::new(),
            by_name: FxHashMap::default(),
        }
    }

    /// Registry with the built-in catalog, in priority order.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for definition in builtins::ALL {
            registry.register(*definition)?;
        }
        Ok(registry)
    }

    /// Add an operation after every existing one.
    pub fn register(
        &mut self,
        definition: &'static dyn OperationDefinition,
    ) -> Result<(), RegistryError> {
        let name = definition.name();
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name));
        }
        for input in definition.inputs() {
            if let InputSpec::Converted(_, conv) = input {
                if converter(conv).is_none() {
                    return Err(RegistryError::UnknownConverter {
                        operation: name,
                        converter: conv,
                    });
                }
            }
        }
        let pattern = definition.pattern();
        let invalid = |source: regex::Error| RegistryError::InvalidPattern {
            name,
            source: Box::new(source),
        };
        let regex = Regex::new(pattern).map_err(invalid)?;
        let anchored = Regex::new(&format!("^(?:{pattern})$")).map_err(invalid)?;
        let wildcards = pattern.matches(".*").count() + pattern.matches(".+").count();

        self.by_name.insert(name, self.entries.len());
        self.entries.push(RegisteredOperation {
            definition,
            regex,
            anchored,
            wildcards,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an operation by name.
    pub fn get(&self, name: &str) -> Option<&'static dyn OperationDefinition> {
        self.by_name.get(name).map(|&i| self.entries[i].definition)
    }

    /// Operations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static dyn OperationDefinition> + '_ {
        self.entries.iter().map(|entry| entry.definition)
    }

    /// Pick the best-scoring operation for `statement`.
    ///
    /// `program` is the statement followed by every later statement, joined
    /// with `\n`; whole-program operations match against it.
    pub fn select<'t>(&self, statement: &'t str, program: &'t str) -> Option<Selection<'t>> {
        let mut best: Option<Selection<'t>> = None;
        for entry in &self.entries {
            let haystack = match entry.definition.scope() {
                MatchScope::Statement => statement,
                MatchScope::WholeProgram => program,
            };
            let Some(captures) = entry.regex.captures(haystack) else {
                continue;
            };
            let score = score(entry, &captures);
            trace!(operation = entry.definition.name(), score, "candidate");
            if matches!(&best, Some(current) if current.score >= score) {
                continue;
            }
            best = Some(Selection {
                operation: entry.definition,
                captures,
                score,
            });
        }
        best
    }

    /// Length of the longest strict prefix of `statement` that some
    /// statement-scope pattern matches in full; 0 if none does.
    pub fn longest_partial_match(&self, statement: &str) -> usize {
        let boundaries: Vec<usize> = statement
            .char_indices()
            .map(|(i, _)| i)
            .filter(|&i| i > 0)
            .collect();
        self.entries
            .iter()
            .filter(|entry| entry.definition.scope() == MatchScope::Statement)
            .filter_map(|entry| {
                boundaries
                    .iter()
                    .rev()
                    .copied()
                    .find(|&end| entry.anchored.is_match(&statement[..end]))
            })
            .max()
            .unwrap_or(0)
    }

    /// Bind the selected operation's declared inputs.
    pub fn bind<'t>(
        &self,
        selection: &Selection<'t>,
        line: usize,
        lines: &'t [String],
    ) -> Result<OperationContext<'t>, EvalError> {
        let operation = selection.operation;
        let mut ctx = OperationContext::new(operation.name(), operation.inputs());
        for input in operation.inputs() {
            match *input {
                InputSpec::Capture(index) => {
                    let capture = selection
                        .captures
                        .get(index)
                        .map(|m| (m.as_str(), m.start()));
                    ctx.bind_capture(index, capture);
                }
                InputSpec::Converted(index, name) => {
                    let capture = selection.captures.get(index);
                    let text = capture.map_or("", |m| m.as_str());
                    let span = capture.map_or(Span::DUMMY, |m| Span::from_range(m.range()));
                    let convert = converter(name)
                        .ok_or_else(|| conversion_failed(name, text, "unknown converter"))?;
                    let value = convert(text)
                        .map_err(|reason| conversion_failed(name, text, reason).with_span(span))?;
                    ctx.bind_capture(index, capture.map(|m| (m.as_str(), m.start())));
                    ctx.bind_converted(index, value);
                }
                InputSpec::CurrentLine => ctx.bind_line(line),
                InputSpec::Lines => ctx.bind_lines(lines),
                InputSpec::JumpOffset => ctx.bind_jump(),
            }
        }
        Ok(ctx)
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn score(entry: &RegisteredOperation, captures: &Captures<'_>) -> i64 {
    let as_i64 = |n: usize| i64::try_from(n).unwrap_or(i64::MAX / 4);
    let groups = captures.iter().skip(1).flatten().count();
    let matched = captures.get(0).map_or(0, |m| m.len());
    as_i64(groups) * 1000 - as_i64(entry.wildcards) * 500
        + as_i64(matched) * 2
        + as_i64(entry.definition.pattern().len())
}
