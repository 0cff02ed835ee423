//! Splitting program text into statements.
//!
//! Outside double quotes:
//! - `;` ends a statement and is dropped;
//! - `ELSE`, `ENDIF`, `ENDFOR`, `ENDFOREACH` and `class:end` (any case, whole
//!   word) always stand alone;
//! - `THEN` ends the statement containing it;
//! - a statement starting with `class Name:` ends at the colon, and so does a
//!   `label:` statement outside a class body.
//!
//! Statements are trimmed, line breaks inside them become spaces, and empty
//! statements are dropped.

/// Block keywords that always form a statement of their own.
const STANDALONE: &[&str] = &["ENDFOREACH", "ENDFOR", "ENDIF", "ELSE", "class:end"];

struct Segmenter<'a> {
    source: &'a str,
    statements: Vec<String>,
    current: String,
    in_class: bool,
}

/// Split `source` into statements.
pub fn segment(source: &str) -> Vec<String> {
    let mut segmenter = Segmenter {
        source,
        statements: Vec::new(),
        current: String::new(),
        in_class: false,
    };
    segmenter.run();
    segmenter.statements
}

impl Segmenter<'_> {
    fn run(&mut self) {
        let source = self.source;
        let mut in_quotes = false;
        let mut pos = 0;

        while let Some(c) = source[pos..].chars().next() {
            if in_quotes {
                self.current.push(c);
                in_quotes = c != '"';
                pos += c.len_utf8();
                continue;
            }
            match c {
                '"' => {
                    in_quotes = true;
                    self.current.push(c);
                    pos += 1;
                }
                ';' => {
                    self.flush();
                    pos += 1;
                }
                _ => {
                    if let Some(len) = self.boundary(pos) {
                        pos += len;
                    } else {
                        self.current.push(c);
                        pos += c.len_utf8();
                    }
                }
            }
        }
        self.flush();
    }

    /// Handle a statement boundary starting at `pos`; returns the bytes
    /// consumed.
    fn boundary(&mut self, pos: usize) -> Option<usize> {
        let source = self.source;
        if !starts_word(source, pos) {
            return None;
        }
        let rest = &source[pos..];

        if let Some(keyword) = STANDALONE
            .iter()
            .find(|keyword| word_at(source, pos, keyword))
        {
            let len = keyword.len();
            self.flush();
            self.current.push_str(&rest[..len]);
            self.flush();
            if keyword.eq_ignore_ascii_case("class:end") {
                self.in_class = false;
            }
            return Some(len);
        }

        if word_at(source, pos, "THEN") {
            self.current.push_str(&rest[..4]);
            self.flush();
            return Some(4);
        }

        if !self.current.trim().is_empty() {
            return None;
        }
        if let Some(len) = class_header(rest) {
            self.current.push_str(&rest[..len]);
            self.flush();
            self.in_class = true;
            return Some(len);
        }
        if !self.in_class {
            if let Some(len) = label(rest) {
                self.current.push_str(&rest[..len]);
                self.flush();
                return Some(len);
            }
        }
        None
    }

    fn flush(&mut self) {
        let statement = self.current.replace(['\n', '\r'], " ");
        let statement = statement.trim();
        if !statement.is_empty() {
            self.statements.push(statement.to_string());
        }
        self.current.clear();
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `pos` is not preceded by a word character.
fn starts_word(source: &str, pos: usize) -> bool {
    !source[..pos].chars().next_back().is_some_and(is_word_char)
}

/// Whether `word` (any case) occurs at `pos` and is not followed by a word
/// character.
fn word_at(source: &str, pos: usize, word: &str) -> bool {
    let end = pos + word.len();
    source
        .get(pos..end)
        .is_some_and(|text| text.eq_ignore_ascii_case(word))
        && !source[end..].chars().next().is_some_and(is_word_char)
}

/// Length of a leading identifier.
fn identifier_len(text: &str) -> usize {
    match text.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => text
            .find(|c: char| !is_word_char(c))
            .unwrap_or(text.len()),
        _ => 0,
    }
}

/// Length of `class Name:` at the start of `text`, colon included.
fn class_header(text: &str) -> Option<usize> {
    if !text.starts_with("class") {
        return None;
    }
    let after = &text[5..];
    let name_start = after.len() - after.trim_start().len();
    if name_start == 0 {
        return None;
    }
    let name = &after[name_start..];
    let name_len = identifier_len(name);
    if name_len == 0 {
        return None;
    }
    let tail = &name[name_len..];
    let colon = tail.len() - tail.trim_start().len();
    tail[colon..]
        .starts_with(':')
        .then_some(5 + name_start + name_len + colon + 1)
}

/// Length of `name:` at the start of `text` when the colon is followed by
/// whitespace, `;` or the end of the text.
fn label(text: &str) -> Option<usize> {
    let name_len = identifier_len(text);
    if name_len == 0 {
        return None;
    }
    let tail = &text[name_len..];
    let colon = tail.len() - tail.trim_start().len();
    let after = tail[colon..].strip_prefix(':')?;
    let terminated = match after.chars().next() {
        Some(c) => c.is_whitespace() || c == ';',
        None => true,
    };
    terminated.then_some(name_len + colon + 1)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::segment;

    #[test]
    fn test_semicolons_outside_quotes() {
        assert_eq!(
            segment(r#"let a = "x;y"; print a;;"#),
            vec![r#"let a = "x;y""#, "print a"]
        );
    }

    #[test]
    fn test_block_keywords_stand_alone() {
        assert_eq!(
            segment("IF a == 1 THEN print 1 ELSE print 2 endif"),
            vec!["IF a == 1 THEN", "print 1", "ELSE", "print 2", "endif"]
        );
        assert_eq!(
            segment("FOR i WHEN i < 3 => print i ENDFOR"),
            vec!["FOR i WHEN i < 3 => print i", "ENDFOR"]
        );
    }

    #[test]
    fn test_keywords_inside_words_are_kept() {
        assert_eq!(
            segment("let elsewhere = 1; let thence = 2"),
            vec!["let elsewhere = 1", "let thence = 2"]
        );
        assert_eq!(segment(r#"print "ELSE""#), vec![r#"print "ELSE""#]);
    }

    #[test]
    fn test_class_block() {
        let source = "class Book:\n  Title: \"none\";\n  Pages: 0 as int;\nclass:end;";
        assert_eq!(
            segment(source),
            vec!["class Book:", "Title: \"none\"", "Pages: 0 as int", "class:end"]
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            segment("top: print 1; goto top"),
            vec!["top:", "print 1", "goto top"]
        );
        assert_eq!(segment("done:"), vec!["done:"]);
    }

    #[test]
    fn test_no_label_inside_class_or_map() {
        assert_eq!(
            segment("class A:\nx: 1;\nclass:end"),
            vec!["class A:", "x: 1", "class:end"]
        );
        assert_eq!(
            segment("let m = {\n a: 1,\n b: 2\n} as map;"),
            vec!["let m = {  a: 1,  b: 2 } as map"]
        );
        assert_eq!(segment("let p = Pet:new"), vec!["let p = Pet:new"]);
    }

    proptest! {
        #[test]
        fn prop_statements_are_trimmed_and_nonempty(source in "[a-z ;\"\n]{0,40}") {
            for statement in segment(&source) {
                prop_assert!(!statement.is_empty());
                prop_assert_eq!(statement.trim(), statement.as_str());
                prop_assert!(!statement.contains('\n'));
            }
        }

        #[test]
        fn prop_plain_statements_round_trip(
            parts in proptest::collection::vec("print [a-z]{1,6}[0-9]", 0..6)
        ) {
            let source = parts.join("; ");
            prop_assert_eq!(segment(&source), parts);
        }
    }
}
