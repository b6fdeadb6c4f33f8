//! Syntax recovery: locate common JSON defects in raw text and repair the
//! mechanically fixable ones, with exact line/column reporting.
//!
//! Two phases over a single scan. `classify` walks the text with a
//! recursive-descent scanner that tracks string/escape state and the bracket
//! context, recording one defect per malformed construct. `repair_simple`
//! applies one textual edit per Simple defect and re-validates once; there is
//! no iterative fixed point. Complex defects (mismatched closers, unterminated
//! strings, unexpected tokens) are never repaired here — the caller decides
//! whether to escalate them.

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bounded, mechanically fixable: missing/trailing comma, unquoted key,
    /// single-quoted string.
    Simple,
    /// Anything else; auto-repair must not be attempted.
    Complex,
}

impl ErrorCategory {
    pub fn is_simple(self) -> bool {
        matches!(self, ErrorCategory::Simple)
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxError {
    /// 1-based.
    pub line: usize,
    /// 1-based.
    pub column: usize,
    pub message: String,
    pub category: ErrorCategory,
}

/// One textual edit applied during repair; the ordered list is the audit
/// trail shown to the caller.
#[derive(Debug, Clone)]
pub struct FixChange {
    pub line: usize,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub fixed_text: String,
    pub changes: Vec<FixChange>,
    pub remaining: Vec<SyntaxError>,
}

// Internal defect record; offsets are byte positions into the scanned text.
#[derive(Debug, Clone)]
enum Defect {
    /// Insert a comma at `at` (end of the previous value).
    MissingComma { at: usize },
    /// Delete the comma byte at `at`.
    TrailingComma { at: usize },
    /// Wrap `start..end` in double quotes.
    UnquotedKey { start: usize, end: usize },
    /// Replace the single-quoted span `start..end` (delimiters included).
    SingleQuoted { start: usize, end: usize },
    /// Not mechanically fixable; scanning stops after recording one of these.
    Complex { at: usize, message: String },
}

impl Defect {
    fn offset(&self) -> usize {
        match self {
            Defect::MissingComma { at }
            | Defect::TrailingComma { at }
            | Defect::Complex { at, .. } => *at,
            Defect::UnquotedKey { start, .. } | Defect::SingleQuoted { start, .. } => *start,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Defect::Complex { .. } => ErrorCategory::Complex,
            _ => ErrorCategory::Simple,
        }
    }

    fn message(&self, text: &str) -> String {
        match self {
            Defect::MissingComma { .. } => "missing comma between values".to_string(),
            Defect::TrailingComma { .. } => "trailing comma before closing bracket".to_string(),
            Defect::UnquotedKey { start, end } => {
                format!("object key `{}` is not double-quoted", &text[*start..*end])
            }
            Defect::SingleQuoted { .. } => "string uses single quotes".to_string(),
            Defect::Complex { message, .. } => message.clone(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PUBLIC API
// ————————————————————————————————————————————————————————————————————————————

/// Scan `text` and report every detected defect with its 1-based line/column.
pub fn classify(text: &str) -> Vec<SyntaxError> {
    scan(text)
        .iter()
        .map(|d| {
            let (line, column) = line_col(text, d.offset());
            SyntaxError { line, column, message: d.message(text), category: d.category() }
        })
        .collect()
}

/// Apply one textual edit per Simple defect, then re-validate once. When any
/// detected defect is Complex, no edit is applied and everything is surfaced
/// in `remaining`.
pub fn repair_simple(text: &str) -> RepairOutcome {
    let defects = scan(text);
    if defects.is_empty() {
        return RepairOutcome {
            fixed_text: text.to_string(),
            changes: Vec::new(),
            remaining: Vec::new(),
        };
    }
    if defects.iter().any(|d| d.category() == ErrorCategory::Complex) {
        return RepairOutcome {
            fixed_text: text.to_string(),
            changes: Vec::new(),
            remaining: classify(text),
        };
    }

    let mut out = String::with_capacity(text.len() + defects.len());
    let mut changes = Vec::with_capacity(defects.len());
    let mut cursor = 0usize;
    for defect in &defects {
        let (line, _) = line_col(text, defect.offset());
        match defect {
            Defect::MissingComma { at } => {
                out.push_str(&text[cursor..*at]);
                out.push(',');
                cursor = *at;
                changes.push(FixChange { line, description: "inserted missing comma".into() });
            }
            Defect::TrailingComma { at } => {
                out.push_str(&text[cursor..*at]);
                cursor = at + 1;
                changes.push(FixChange { line, description: "removed trailing comma".into() });
            }
            Defect::UnquotedKey { start, end } => {
                out.push_str(&text[cursor..*start]);
                out.push('"');
                out.push_str(&text[*start..*end]);
                out.push('"');
                cursor = *end;
                changes.push(FixChange {
                    line,
                    description: format!(
                        "wrapped unquoted key `{}` in double quotes",
                        &text[*start..*end]
                    ),
                });
            }
            Defect::SingleQuoted { start, end } => {
                out.push_str(&text[cursor..*start]);
                out.push('"');
                out.push_str(&requote_single(&text[*start + 1..*end - 1]));
                out.push('"');
                cursor = *end;
                changes.push(FixChange {
                    line,
                    description: "replaced single-quoted string with double quotes".into(),
                });
            }
            Defect::Complex { .. } => unreachable!("complex defects bail out above"),
        }
    }
    out.push_str(&text[cursor..]);

    let remaining = classify(&out);
    RepairOutcome { fixed_text: out, changes, remaining }
}

// Convert the body of a single-quoted string into a double-quoted body:
// escaped single quotes become plain, embedded double quotes get escaped.
fn requote_single(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out
}

// Columns count characters, not bytes, so multibyte text earlier on the line
// does not skew the report. Offsets always sit on token starts, which are
// ASCII and therefore char boundaries.
fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let prefix = &text[..offset.min(text.len())];
    let line = 1 + prefix.bytes().filter(|&b| b == b'\n').count();
    let line_start = prefix.rfind('\n').map(|p| p + 1).unwrap_or(0);
    (line, prefix[line_start..].chars().count() + 1)
}

// ————————————————————————————————————————————————————————————————————————————
// SCANNER
// ————————————————————————————————————————————————————————————————————————————

// Scanning aborts after the first Complex defect: the context is no longer
// trustworthy past that point. Simple defects are scanned past as if already
// repaired.
struct Stop;

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    defects: Vec<Defect>,
}

fn scan(text: &str) -> Vec<Defect> {
    let mut s = Scanner { bytes: text.as_bytes(), pos: 0, defects: Vec::new() };
    let _ = s.run();
    s.defects
}

impl<'a> Scanner<'a> {
    fn run(&mut self) -> Result<(), Stop> {
        self.skip_ws();
        if self.pos >= self.bytes.len() {
            return self.complex(self.pos, "empty input".into());
        }
        self.value()?;
        self.skip_ws();
        if self.pos < self.bytes.len() {
            return self.complex(self.pos, "unexpected content after top-level value".into());
        }
        Ok(())
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn complex(&mut self, at: usize, message: String) -> Result<(), Stop> {
        self.defects.push(Defect::Complex { at, message });
        Err(Stop)
    }

    // ---- values ----

    fn value(&mut self) -> Result<(), Stop> {
        match self.peek() {
            Some(b'{') => self.object(),
            Some(b'[') => self.array(),
            Some(b'"') => self.string(b'"'),
            Some(b'\'') => {
                let start = self.pos;
                self.string(b'\'')?;
                self.defects.push(Defect::SingleQuoted { start, end: self.pos });
                Ok(())
            }
            Some(b) if b == b'-' || b.is_ascii_digit() => self.number(),
            Some(b) if b.is_ascii_alphabetic() => {
                let start = self.pos;
                let word = self.identifier();
                if matches!(word, "true" | "false" | "null") {
                    Ok(())
                } else {
                    self.complex(start, format!("unexpected token `{word}`"))
                }
            }
            Some(b) => self.complex(self.pos, format!("unexpected character `{}`", b as char)),
            None => self.complex(self.pos, "unexpected end of input".into()),
        }
    }

    fn string(&mut self, quote: u8) -> Result<(), Stop> {
        let start = self.pos;
        self.pos += 1; // opening delimiter
        let mut escape = false;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if escape {
                escape = false;
            } else if b == b'\\' {
                escape = true;
            } else if b == quote {
                return Ok(());
            }
        }
        self.complex(start, "unterminated string".into())
    }

    fn number(&mut self) -> Result<(), Stop> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        // the consumed span must form one valid numeric literal; a lone `-`,
        // doubled dots, or a dangling exponent are not repairable
        let span = std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("");
        if span.parse::<f64>().is_err() {
            return self.complex(start, format!("malformed number `{span}`"));
        }
        Ok(())
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                self.pos += 1;
            } else {
                break;
            }
        }
        std::str::from_utf8(&self.bytes[start..self.pos]).unwrap_or("")
    }

    // Does the byte at the cursor begin a value token?
    fn at_value_start(&self) -> bool {
        match self.peek() {
            Some(b'{' | b'[' | b'"' | b'\'' | b'-') => true,
            Some(b) => b.is_ascii_digit() || b.is_ascii_alphabetic(),
            None => false,
        }
    }

    // ---- containers ----

    fn object(&mut self) -> Result<(), Stop> {
        let open = self.pos;
        self.pos += 1; // '{'
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.key()?;
            self.skip_ws();
            if self.peek() != Some(b':') {
                return self.complex(self.pos, "expected `:` after object key".into());
            }
            self.pos += 1;
            self.skip_ws();
            self.value()?;
            let value_end = self.pos;
            self.skip_ws();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b',') => {
                    let comma = self.pos;
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == Some(b'}') {
                        self.defects.push(Defect::TrailingComma { at: comma });
                        self.pos += 1;
                        return Ok(());
                    }
                }
                Some(b']') => {
                    return self.complex(
                        self.pos,
                        "mismatched closer: expected `}` but found `]`".into(),
                    );
                }
                Some(_) if self.at_value_start() => {
                    // next key begins with no separating comma
                    self.defects.push(Defect::MissingComma { at: value_end });
                }
                Some(b) => {
                    return self.complex(self.pos, format!("unexpected character `{}`", b as char));
                }
                None => {
                    return self.complex(open, "unterminated object".into());
                }
            }
        }
    }

    fn key(&mut self) -> Result<(), Stop> {
        self.skip_ws();
        match self.peek() {
            Some(b'"') => self.string(b'"'),
            Some(b'\'') => {
                let start = self.pos;
                self.string(b'\'')?;
                self.defects.push(Defect::SingleQuoted { start, end: self.pos });
                Ok(())
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' => {
                let start = self.pos;
                let _ = self.identifier();
                self.defects.push(Defect::UnquotedKey { start, end: self.pos });
                Ok(())
            }
            Some(b) => self.complex(self.pos, format!("expected object key, found `{}`", b as char)),
            None => self.complex(self.pos, "unexpected end of input".into()),
        }
    }

    fn array(&mut self) -> Result<(), Stop> {
        let open = self.pos;
        self.pos += 1; // '['
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_ws();
            self.value()?;
            let value_end = self.pos;
            self.skip_ws();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b',') => {
                    let comma = self.pos;
                    self.pos += 1;
                    self.skip_ws();
                    if self.peek() == Some(b']') {
                        self.defects.push(Defect::TrailingComma { at: comma });
                        self.pos += 1;
                        return Ok(());
                    }
                }
                Some(b'}') => {
                    return self.complex(
                        self.pos,
                        "mismatched closer: expected `]` but found `}`".into(),
                    );
                }
                Some(_) if self.at_value_start() => {
                    self.defects.push(Defect::MissingComma { at: value_end });
                }
                Some(b) => {
                    return self.complex(self.pos, format!("unexpected character `{}`", b as char));
                }
                None => {
                    return self.complex(open, "unterminated array".into());
                }
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_count(errs: &[SyntaxError]) -> usize {
        errs.iter().filter(|e| e.category.is_simple()).count()
    }

    #[test]
    fn clean_input_reports_nothing() {
        assert!(classify(r#"{"a": [1, 2], "b": null}"#).is_empty());
    }

    #[test]
    fn missing_comma_is_simple_and_fixed() {
        let src = "{\"a\": 1 \"b\": 2}";
        let errs = classify(src);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].category.is_simple());
        let out = repair_simple(src);
        assert_eq!(out.fixed_text, "{\"a\": 1, \"b\": 2}");
        assert_eq!(out.changes.len(), 1);
        assert!(out.remaining.is_empty());
    }

    #[test]
    fn trailing_comma_reports_position() {
        let src = "{\n  \"a\": [1, 2,]\n}";
        let errs = classify(src);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].line, 2);
        assert_eq!(errs[0].column, 13);
        let out = repair_simple(src);
        assert_eq!(out.fixed_text, "{\n  \"a\": [1, 2]\n}");
        assert!(out.remaining.is_empty());
    }

    #[test]
    fn unquoted_key_gets_wrapped() {
        let out = repair_simple("{name: \"x\", age: 3}");
        assert_eq!(out.fixed_text, "{\"name\": \"x\", \"age\": 3}");
        assert_eq!(out.changes.len(), 2);
        assert!(out.changes[0].description.contains("name"));
        assert!(out.remaining.is_empty());
    }

    #[test]
    fn single_quotes_redelimited_with_escaping() {
        let out = repair_simple(r#"{'say': 'he said "hi" and don\'t'}"#);
        assert_eq!(out.fixed_text, r#"{"say": "he said \"hi\" and don't"}"#);
        assert!(out.remaining.is_empty());
        assert!(serde_json::from_str::<serde_json::Value>(&out.fixed_text).is_ok());
    }

    #[test]
    fn mismatched_closer_is_complex_and_blocks_repair() {
        let src = "{\"a\": [1, 2}";
        let errs = classify(src);
        assert!(errs.iter().any(|e| e.category == ErrorCategory::Complex));
        let out = repair_simple(src);
        assert_eq!(out.fixed_text, src);
        assert!(out.changes.is_empty());
        assert!(!out.remaining.is_empty());
    }

    #[test]
    fn unterminated_string_is_complex() {
        let errs = classify("{\"a\": \"oops}");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, ErrorCategory::Complex);
        assert!(errs[0].message.contains("unterminated"));
    }

    #[test]
    fn unexpected_word_is_complex() {
        let errs = classify("{\"a\": undefined}");
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].category, ErrorCategory::Complex);
    }

    #[test]
    fn repair_is_single_pass_and_bounded() {
        let src = "{a: 'x' b: [1,]}";
        let first = repair_simple(src);
        assert!(first.remaining.is_empty());
        assert_eq!(simple_count(&classify(&first.fixed_text)), 0);
        let second = repair_simple(&first.fixed_text);
        assert!(second.changes.is_empty());
        assert_eq!(second.fixed_text, first.fixed_text);
    }

    #[test]
    fn trailing_top_level_content_is_complex() {
        let errs = classify("[1, 2,][3]");
        assert!(errs.iter().any(|e| e.category == ErrorCategory::Complex));
    }

    #[test]
    fn malformed_numbers_are_complex_and_block_repair() {
        for src in ["[-]", "[1.2.3]", "[1e]", "[--5]"] {
            let errs = classify(src);
            assert!(
                errs.iter().any(|e| e.category == ErrorCategory::Complex),
                "`{src}` must report a complex defect"
            );
            let out = repair_simple(src);
            assert_eq!(out.fixed_text, src);
            assert!(out.changes.is_empty());
            assert!(!out.remaining.is_empty());
        }
        assert!(classify("[-5, 1.25, 2e10]").is_empty());
    }

    #[test]
    fn columns_count_characters_not_bytes() {
        // 'é' is two bytes; the trailing comma is the 12th character
        let src = "{\"é\": [1, 2,]}";
        let errs = classify(src);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].line, 1);
        assert_eq!(errs[0].column, 12);
    }

    #[test]
    fn array_missing_comma() {
        let out = repair_simple("[1 2, 3]");
        assert_eq!(out.fixed_text, "[1, 2, 3]");
        assert!(out.remaining.is_empty());
    }
}
