//! Condition and loop bookkeeping shared by the control-flow operations.
//!
//! The interpreter owns one [`ControlStacks`]; operations reach it through
//! `OperationExecutor::control`. Block matching is a forward scan over the
//! statement array that counts nested block headers, so
//! `IF … THEN` inside another `IF` pairs with its own `ENDIF`.

use crate::Value;

/// Per-run condition and loop stacks.
#[derive(Debug, Default)]
pub struct ControlStacks {
    /// One entry per open `IF`, holding its condition result.
    pub conditions: Vec<bool>,
    /// Active block loops, innermost last.
    pub loops: Vec<LoopContext>,
}

impl ControlStacks {
    /// Whether `line` is the `ENDFOR` of an active counting loop.
    pub fn closes_active_loop(&self, line: usize) -> bool {
        self.loops
            .iter()
            .any(|ctx| matches!(ctx, LoopContext::Counting { end: Some(end), .. } if *end == line))
    }

    /// Drop the state of the blocks a jump from `from` to `to` leaves.
    ///
    /// Conditions carry no position, so every `IF` block around `from` that
    /// does not also surround `to` pops the innermost entry.
    pub fn leave_blocks(&mut self, lines: &[String], from: usize, to: usize) {
        let left = lines
            .iter()
            .enumerate()
            .take(from)
            .filter(|(_, line)| is_if_header(line.trim()))
            .filter_map(|(header, _)| {
                let end = find_terminator(lines, header, BlockKind::EndIf)?;
                Some((header, end))
            })
            .filter(|&(header, end)| encloses(header, end, from) && !encloses(header, end, to))
            .count();
        let kept = self.conditions.len().saturating_sub(left);
        self.conditions.truncate(kept);

        self.loops.retain(|ctx| {
            let (header, end) = match ctx {
                LoopContext::Counting { header, end, .. } => (*header, *end),
                LoopContext::Iterating { header, .. } => (
                    *header,
                    find_terminator(lines, *header, BlockKind::Foreach),
                ),
            };
            end.is_some_and(|end| encloses(header, end, to))
        });
    }
}

/// Whether `line` lies strictly between a block's header and terminator.
fn encloses(header: usize, end: usize, line: usize) -> bool {
    header < line && line < end
}

/// Bookkeeping for one active loop.
#[derive(Clone, Debug)]
pub enum LoopContext {
    /// `FOR var WHEN cond DO …` … `ENDFOR`.
    Counting {
        iterator: String,
        /// Index of the `FOR` header.
        header: usize,
        /// Index of the matching `ENDFOR`.
        end: Option<usize>,
        /// The loop created the iterator and removes it on exit.
        owned: bool,
        condition: String,
        /// Statements after `DO`, re-run on every pass.
        inline: String,
    },
    /// `FOREACH v[, k] IN expr DO` … `ENDFOREACH`.
    Iterating {
        value: String,
        key: Option<String>,
        /// Index of the `FOREACH` header.
        header: usize,
        /// `(key, value)` pairs; array keys are element indices.
        items: Vec<(Value, Value)>,
        index: usize,
        /// Variables the loop created, removed again on exit.
        owned: ForeachOwnership,
    },
}

/// Which `FOREACH` variables did not exist before the loop started.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ForeachOwnership {
    pub value: bool,
    pub key: bool,
}

/// Which terminator a forward scan is looking for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    /// `ELSE` or `ENDIF` of the current `IF`.
    Branch,
    /// `ENDIF` of the current `IF`.
    EndIf,
    /// `ENDFOR` of the current block `FOR`.
    For,
    /// `ENDFOREACH` of the current block `FOREACH`.
    Foreach,
}

/// Index of the terminator pairing with the block opened at `from`.
pub fn find_terminator(lines: &[String], from: usize, kind: BlockKind) -> Option<usize> {
    let mut depth = 0usize;
    for (index, line) in lines.iter().enumerate().skip(from + 1) {
        let line = line.trim();
        let (opens, closes) = match kind {
            BlockKind::Branch | BlockKind::EndIf => (is_if_header(line), is_word(line, "ENDIF")),
            BlockKind::For => (is_block_header(line, "FOR"), is_word(line, "ENDFOR")),
            BlockKind::Foreach => (
                is_block_header(line, "FOREACH"),
                is_word(line, "ENDFOREACH"),
            ),
        };
        if opens {
            depth += 1;
        } else if depth == 0 && (closes || (kind == BlockKind::Branch && is_word(line, "ELSE"))) {
            return Some(index);
        } else if closes {
            depth -= 1;
        }
    }
    None
}

/// Signed distance from statement `from` to statement `to`.
#[expect(
    clippy::cast_possible_wrap,
    reason = "statement counts are far below isize::MAX"
)]
pub fn offset_between(from: usize, to: usize) -> isize {
    to as isize - from as isize
}

fn is_word(line: &str, word: &str) -> bool {
    line.eq_ignore_ascii_case(word)
}

fn starts_with_keyword(line: &str, keyword: &str) -> bool {
    line.get(..keyword.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
        && line[keyword.len()..].starts_with(char::is_whitespace)
}

fn ends_with_keyword(line: &str, keyword: &str) -> bool {
    line.len() >= keyword.len()
        && line
            .get(line.len() - keyword.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(keyword))
}

fn is_if_header(line: &str) -> bool {
    starts_with_keyword(line, "IF") && ends_with_keyword(line, "THEN")
}

/// A loop header with nothing after `DO`/`=>`.
fn is_block_header(line: &str, keyword: &str) -> bool {
    starts_with_keyword(line, keyword)
        && (ends_with_keyword(line, " DO") || line.ends_with("=>"))
}

#[cfg(test)]
mod tests;
