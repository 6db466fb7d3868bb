//! Statement lexer for the Ninja build language.
//!
//! [`tokenize`] turns raw build-file text into an ordered sequence of
//! [`Lexeme`]s: one [`Statement`] each, optionally carrying the indented
//! `name = value` bindings that followed it. Values and paths come out as
//! unevaluated [`Expr`] trees; the lexer never touches the variable
//! environment.
//!
//! Lexical syntax handled here: `#` comment lines, `$\n` line continuations
//! (leading whitespace of the continuation line is skipped), the `$$`, `$ `,
//! and `$:` escapes, and `$name` / `${name}` variable references. Dependency
//! sentinels `|` and `||` are validated for ordering at this level, so the
//! downstream classifier never sees `|` after `||`.

use crate::expr::Expr;
use miette::Diagnostic;
use std::mem;
use thiserror::Error;

/// A variable binding attached to a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// The bound variable's name.
    pub name: String,
    /// The unevaluated right-hand side.
    pub value: Expr,
}

/// One declaration recognised by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `build <outputs> : <rule> <deps>`; dependency tokens may include the
    /// `|` and `||` sentinels as literal tokens.
    Build {
        /// Output paths, in declaration order.
        outputs: Vec<Expr>,
        /// The invoked rule's name.
        rule: String,
        /// Dependency tokens, in declaration order, sentinels included.
        deps: Vec<Expr>,
    },
    /// `rule <name>`.
    Rule {
        /// The declared rule's name.
        name: String,
    },
    /// `pool <name>`.
    Pool {
        /// The declared pool's name.
        name: String,
    },
    /// `default <targets>`.
    Default {
        /// Target paths, in declaration order.
        targets: Vec<Expr>,
    },
    /// `include <path>`: recurse sharing the current scope.
    Include {
        /// Path of the file to include.
        path: Expr,
    },
    /// `subninja <path>`: recurse inside an isolated child scope.
    Subninja {
        /// Path of the file to include.
        path: Expr,
    },
    /// Top-level `name = value`.
    Define {
        /// The bound variable's name.
        name: String,
        /// The unevaluated right-hand side.
        value: Expr,
    },
    /// An indented binding with no statement to attach to; always fatal in
    /// the interpreter.
    Orphan {
        /// The stray binding's name.
        name: String,
    },
}

/// A statement together with the indented bindings that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// The statement itself.
    pub statement: Statement,
    /// Attached bindings, in declaration order.
    pub bindings: Vec<Binding>,
}

/// Lexical errors; each carries the physical line the statement began on.
#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A line began with something that is not a statement.
    #[error("line {line}: expected a statement")]
    #[diagnostic(code(tsumiki::lexer::expected_statement))]
    ExpectedStatement {
        /// Physical line number.
        line: usize,
    },

    /// A keyword statement is missing its name.
    #[error("line {line}: `{keyword}` needs a name")]
    #[diagnostic(code(tsumiki::lexer::missing_name))]
    MissingName {
        /// Physical line number.
        line: usize,
        /// The statement keyword.
        keyword: &'static str,
    },

    /// Unexpected trailing text after a complete statement.
    #[error("line {line}: unexpected text after `{keyword}`")]
    #[diagnostic(code(tsumiki::lexer::trailing_text))]
    TrailingText {
        /// Physical line number.
        line: usize,
        /// The statement keyword.
        keyword: &'static str,
    },

    /// A binding or define is missing its `=`.
    #[error("line {line}: expected `=` after `{name}`")]
    #[diagnostic(code(tsumiki::lexer::expected_equals))]
    ExpectedEquals {
        /// Physical line number.
        line: usize,
        /// The name that was read before the missing `=`.
        name: String,
    },

    /// A build statement is missing the `:` separating outputs from the rule.
    #[error("line {line}: expected `:` in build statement")]
    #[diagnostic(code(tsumiki::lexer::expected_colon))]
    ExpectedColon {
        /// Physical line number.
        line: usize,
    },

    /// A build statement declared no outputs.
    #[error("line {line}: build statement needs at least one output")]
    #[diagnostic(code(tsumiki::lexer::missing_outputs))]
    MissingOutputs {
        /// Physical line number.
        line: usize,
    },

    /// A build statement named no rule after the `:`.
    #[error("line {line}: build statement needs a rule name")]
    #[diagnostic(code(tsumiki::lexer::missing_rule))]
    MissingRule {
        /// Physical line number.
        line: usize,
    },

    /// A `|` or `||` appeared where only output paths are allowed.
    #[error("line {line}: `|` is not allowed before the `:` of a build statement")]
    #[diagnostic(code(tsumiki::lexer::unexpected_pipe))]
    UnexpectedPipe {
        /// Physical line number.
        line: usize,
    },

    /// Dependency sentinels were repeated or `||` preceded `|`.
    #[error("line {line}: `|` and `||` may appear once each, `|` first")]
    #[diagnostic(code(tsumiki::lexer::misordered_deps))]
    MisorderedDeps {
        /// Physical line number.
        line: usize,
    },

    /// A lone `$` ended the line.
    #[error("line {line}: `$` at end of line")]
    #[diagnostic(code(tsumiki::lexer::dangling_dollar))]
    DanglingDollar {
        /// Physical line number.
        line: usize,
    },

    /// `$` escaped a character with no defined meaning.
    #[error("line {line}: `$` cannot escape `{found}`")]
    #[diagnostic(code(tsumiki::lexer::bad_escape))]
    BadEscape {
        /// Physical line number.
        line: usize,
        /// The character after the `$`.
        found: char,
    },

    /// A `${...}` reference is empty or missing its closing brace.
    #[error("line {line}: malformed `${{...}}` variable reference")]
    #[diagnostic(code(tsumiki::lexer::bad_reference))]
    BadReference {
        /// Physical line number.
        line: usize,
    },
}

/// Tokenize raw build-file text into statement lexemes.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; nothing after it is lexed.
///
/// # Examples
///
/// ```rust
/// use tsumiki::lexer::{Statement, tokenize};
///
/// let lexemes = tokenize("rule cc\n  command = gcc -c $in\n").expect("lex");
/// assert!(matches!(&lexemes[0].statement, Statement::Rule { name } if name == "cc"));
/// assert_eq!(lexemes[0].bindings[0].name, "command");
/// ```
pub fn tokenize(text: &str) -> Result<Vec<Lexeme>, LexError> {
    let mut lexemes: Vec<Lexeme> = Vec::new();
    for line in logical_lines(text) {
        let mut cursor = Cursor::new(&line.text, line.number);
        cursor.skip_ws();
        if cursor.at_end() || cursor.peek() == Some('#') {
            continue;
        }
        if line.indented {
            let binding = lex_binding(&mut cursor)?;
            if let Some(lexeme) = lexemes.last_mut() {
                lexeme.bindings.push(binding);
            } else {
                lexemes.push(Lexeme {
                    statement: Statement::Orphan { name: binding.name },
                    bindings: Vec::new(),
                });
            }
            continue;
        }
        let statement = lex_statement(&mut cursor)?;
        lexemes.push(Lexeme {
            statement,
            bindings: Vec::new(),
        });
    }
    Ok(lexemes)
}

/// One logical line: physical line number of its first character, whether it
/// began indented, and its text with continuations folded away but all other
/// `$` escapes intact.
struct Line {
    number: usize,
    indented: bool,
    text: String,
}

/// Split raw text into logical lines, resolving `$\n` continuations.
///
/// A `$` escaping another character is carried through as both characters so
/// `$$` followed by a newline still ends the line. Blank lines are dropped
/// here; comment lines are kept for the caller to skip.
fn logical_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut chars = text.chars().peekable();
    let mut physical = 1usize;
    let mut start = 1usize;
    let mut buf = String::new();
    let mut flush = |buf: &mut String, start: usize| {
        if !buf.trim().is_empty() {
            lines.push(Line {
                number: start,
                indented: buf.starts_with([' ', '\t']),
                text: mem::take(buf),
            });
        }
        buf.clear();
    };
    while let Some(c) = chars.next() {
        match c {
            '\r' => {}
            '\n' => {
                flush(&mut buf, start);
                physical += 1;
                start = physical;
            }
            '$' if matches!(chars.peek(), Some('\n' | '\r')) => {
                if chars.peek() == Some(&'\r') {
                    chars.next();
                }
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                physical += 1;
                while matches!(chars.peek(), Some(' ' | '\t')) {
                    chars.next();
                }
            }
            '$' => {
                buf.push('$');
                if let Some(escaped) = chars.next() {
                    buf.push(escaped);
                }
            }
            _ => buf.push(c),
        }
    }
    flush(&mut buf, start);
    lines
}

/// Character-level cursor over one logical line.
struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
}

impl Cursor {
    fn new(text: &str, line: usize) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

/// Characters permitted in rule, pool, and variable names.
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Characters permitted in a bare `$name` reference; `.` needs `${...}`.
const fn is_simple_var_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-')
}

fn lex_ident(cursor: &mut Cursor) -> String {
    let mut ident = String::new();
    while let Some(c) = cursor.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        cursor.pos += 1;
    }
    ident
}

/// Incrementally assembles an [`Expr`], merging adjacent literal text.
#[derive(Default)]
struct ExprBuilder {
    parts: Vec<Expr>,
    buf: String,
}

impl ExprBuilder {
    fn push_char(&mut self, c: char) {
        self.buf.push(c);
    }

    fn push_var(&mut self, name: String) {
        self.flush();
        self.parts.push(Expr::Var(name));
    }

    fn flush(&mut self) {
        if !self.buf.is_empty() {
            self.parts.push(Expr::Lit(mem::take(&mut self.buf)));
        }
    }

    fn finish(mut self) -> Expr {
        self.flush();
        let mut parts = self.parts;
        match parts.len() {
            0 => Expr::Lit(String::new()),
            1 => parts.pop().unwrap_or_else(|| Expr::Lit(String::new())),
            _ => Expr::Concat(parts),
        }
    }
}

/// Handle the character after a `$`: an escape or a variable reference.
fn lex_dollar(cursor: &mut Cursor, builder: &mut ExprBuilder) -> Result<(), LexError> {
    match cursor.bump() {
        Some(literal @ ('$' | ' ' | ':')) => {
            builder.push_char(literal);
            Ok(())
        }
        Some('{') => {
            let name = lex_ident(cursor);
            if name.is_empty() || !cursor.eat('}') {
                return Err(LexError::BadReference { line: cursor.line });
            }
            builder.push_var(name);
            Ok(())
        }
        Some(first) if is_simple_var_char(first) => {
            let mut name = String::from(first);
            while let Some(c) = cursor.peek() {
                if !is_simple_var_char(c) {
                    break;
                }
                name.push(c);
                cursor.pos += 1;
            }
            builder.push_var(name);
            Ok(())
        }
        Some(found) => Err(LexError::BadEscape {
            line: cursor.line,
            found,
        }),
        None => Err(LexError::DanglingDollar { line: cursor.line }),
    }
}

/// Read one path token. Stops at unescaped whitespace or `|`, and at `:` when
/// `stop_colon` is set (the output section of a build statement). Returns
/// `None` without consuming anything when no path characters are present.
fn lex_path(cursor: &mut Cursor, stop_colon: bool) -> Result<Option<Expr>, LexError> {
    cursor.skip_ws();
    let mut builder = ExprBuilder::default();
    let mut any = false;
    while let Some(c) = cursor.peek() {
        match c {
            ' ' | '\t' | '|' => break,
            ':' if stop_colon => break,
            '$' => {
                cursor.pos += 1;
                lex_dollar(cursor, &mut builder)?;
                any = true;
            }
            _ => {
                cursor.pos += 1;
                builder.push_char(c);
                any = true;
            }
        }
    }
    if any {
        Ok(Some(builder.finish()))
    } else {
        Ok(None)
    }
}

/// Read a binding value: the rest of the line, with unescaped trailing
/// whitespace trimmed.
fn lex_value(cursor: &mut Cursor) -> Result<Expr, LexError> {
    // Forward scan for the value's end. A `$` covers the character after it,
    // so whitespace reached through an escape counts as value text while a
    // bare trailing run does not; looking backwards at `chars[end - 2]` would
    // mistake the second half of `$$` for an escape of the space behind it.
    let mut end = cursor.pos;
    let mut i = cursor.pos;
    while let Some(c) = cursor.chars.get(i).copied() {
        match c {
            '$' => {
                i = (i + 2).min(cursor.chars.len());
                end = i;
            }
            ' ' | '\t' => i += 1,
            _ => {
                i += 1;
                end = i;
            }
        }
    }
    let mut builder = ExprBuilder::default();
    while cursor.pos < end {
        match cursor.bump() {
            Some('$') => lex_dollar(cursor, &mut builder)?,
            Some(c) => builder.push_char(c),
            None => break,
        }
    }
    Ok(builder.finish())
}

fn lex_binding(cursor: &mut Cursor) -> Result<Binding, LexError> {
    let name = lex_ident(cursor);
    if name.is_empty() {
        return Err(LexError::ExpectedStatement { line: cursor.line });
    }
    cursor.skip_ws();
    if !cursor.eat('=') {
        return Err(LexError::ExpectedEquals {
            line: cursor.line,
            name,
        });
    }
    cursor.skip_ws();
    let value = lex_value(cursor)?;
    Ok(Binding { name, value })
}

fn lex_statement(cursor: &mut Cursor) -> Result<Statement, LexError> {
    let keyword = lex_ident(cursor);
    if keyword.is_empty() {
        return Err(LexError::ExpectedStatement { line: cursor.line });
    }
    match keyword.as_str() {
        "build" => lex_build(cursor),
        "rule" => lex_named(cursor, "rule").map(|name| Statement::Rule { name }),
        "pool" => lex_named(cursor, "pool").map(|name| Statement::Pool { name }),
        "default" => lex_default(cursor),
        "include" => lex_file_path(cursor, "include").map(|path| Statement::Include { path }),
        "subninja" => lex_file_path(cursor, "subninja").map(|path| Statement::Subninja { path }),
        _ => {
            cursor.skip_ws();
            if !cursor.eat('=') {
                return Err(LexError::ExpectedEquals {
                    line: cursor.line,
                    name: keyword,
                });
            }
            cursor.skip_ws();
            let value = lex_value(cursor)?;
            Ok(Statement::Define {
                name: keyword,
                value,
            })
        }
    }
}

/// Lex `rule <name>` / `pool <name>` style statements.
fn lex_named(cursor: &mut Cursor, keyword: &'static str) -> Result<String, LexError> {
    cursor.skip_ws();
    let name = lex_ident(cursor);
    if name.is_empty() {
        return Err(LexError::MissingName {
            line: cursor.line,
            keyword,
        });
    }
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(LexError::TrailingText {
            line: cursor.line,
            keyword,
        });
    }
    Ok(name)
}

/// Lex the single path argument of `include` / `subninja`.
fn lex_file_path(cursor: &mut Cursor, keyword: &'static str) -> Result<Expr, LexError> {
    cursor.skip_ws();
    let path = lex_path(cursor, false)?.ok_or(LexError::MissingName {
        line: cursor.line,
        keyword,
    })?;
    cursor.skip_ws();
    if !cursor.at_end() {
        return Err(LexError::TrailingText {
            line: cursor.line,
            keyword,
        });
    }
    Ok(path)
}

fn lex_default(cursor: &mut Cursor) -> Result<Statement, LexError> {
    let mut targets = Vec::new();
    loop {
        cursor.skip_ws();
        if cursor.at_end() {
            break;
        }
        if cursor.peek() == Some('|') {
            return Err(LexError::UnexpectedPipe { line: cursor.line });
        }
        if let Some(target) = lex_path(cursor, false)? {
            targets.push(target);
        }
    }
    if targets.is_empty() {
        return Err(LexError::MissingName {
            line: cursor.line,
            keyword: "default",
        });
    }
    Ok(Statement::Default { targets })
}

fn lex_build(cursor: &mut Cursor) -> Result<Statement, LexError> {
    let line = cursor.line;
    let mut outputs = Vec::new();
    loop {
        cursor.skip_ws();
        match cursor.peek() {
            None => return Err(LexError::ExpectedColon { line }),
            Some(':') => {
                cursor.pos += 1;
                break;
            }
            Some('|') => return Err(LexError::UnexpectedPipe { line }),
            Some(_) => {
                if let Some(output) = lex_path(cursor, true)? {
                    outputs.push(output);
                }
            }
        }
    }
    if outputs.is_empty() {
        return Err(LexError::MissingOutputs { line });
    }
    cursor.skip_ws();
    let rule = lex_ident(cursor);
    if rule.is_empty() {
        return Err(LexError::MissingRule { line });
    }
    let mut deps = Vec::new();
    let mut seen_implicit = false;
    let mut seen_order_only = false;
    loop {
        cursor.skip_ws();
        match cursor.peek() {
            None => break,
            Some('|') => {
                cursor.pos += 1;
                if cursor.eat('|') {
                    if seen_order_only {
                        return Err(LexError::MisorderedDeps { line });
                    }
                    seen_order_only = true;
                    deps.push(Expr::lit("||"));
                } else {
                    if seen_implicit || seen_order_only {
                        return Err(LexError::MisorderedDeps { line });
                    }
                    seen_implicit = true;
                    deps.push(Expr::lit("|"));
                }
            }
            Some(_) => {
                if let Some(dep) = lex_path(cursor, false)? {
                    deps.push(dep);
                }
            }
        }
    }
    Ok(Statement::Build {
        outputs,
        rule,
        deps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_joins_lines_and_skips_indent() {
        let lexemes = tokenize("cflags = -O2 $\n    -Wall\n").expect("lex");
        match &lexemes.first().expect("one lexeme").statement {
            Statement::Define { name, value } => {
                assert_eq!(name, "cflags");
                assert_eq!(value, &Expr::lit("-O2 -Wall"));
            }
            other => panic!("expected define, got {other:?}"),
        }
    }

    #[test]
    fn escaped_dollar_does_not_continue_the_line() {
        let lexemes = tokenize("a = 1$$\nb = 2\n").expect("lex");
        assert_eq!(lexemes.len(), 2);
        match &lexemes.first().expect("first lexeme").statement {
            Statement::Define { value, .. } => assert_eq!(value, &Expr::lit("1$")),
            other => panic!("expected define, got {other:?}"),
        }
    }

    #[test]
    fn braced_and_bare_references_mix_with_literals() {
        let lexemes = tokenize("cmd = ${cc} -o $out.tmp\n").expect("lex");
        match &lexemes.first().expect("one lexeme").statement {
            Statement::Define { value, .. } => {
                assert_eq!(
                    value,
                    &Expr::Concat(vec![
                        Expr::var("cc"),
                        Expr::lit(" -o "),
                        Expr::var("out"),
                        Expr::lit(".tmp"),
                    ]),
                );
            }
            other => panic!("expected define, got {other:?}"),
        }
    }

    #[test]
    fn misordered_sentinels_are_rejected() {
        let err = tokenize("build a: cc x || y | z\n").expect_err("must fail");
        assert!(matches!(err, LexError::MisorderedDeps { line: 1 }));
    }

    #[test]
    fn pipe_among_outputs_is_rejected() {
        let err = tokenize("build a | b: cc x\n").expect_err("must fail");
        assert!(matches!(err, LexError::UnexpectedPipe { line: 1 }));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let lexemes = tokenize("# header\n\nrule cc\n  # note\n  command = gcc\n").expect("lex");
        assert_eq!(lexemes.len(), 1);
        assert_eq!(lexemes.first().expect("one lexeme").bindings.len(), 1);
    }
}
