//! Parser for the `{{ }}` expression language.
//!
//! Text outside actions is copied verbatim. Inside an action the parser
//! accepts a single command: a value (`.field`, a string literal, `true`,
//! `false`, a parenthesized command) or a function call. `if`, `else if`,
//! `else` and `end` actions form conditional blocks.

use super::ExpressionError;

/// A template node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    /// Literal text.
    Text(String),
    /// `{{ command }}`
    Output(Expr),
    /// `{{if}} ... {{else if}} ... {{else}} ... {{end}}`
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

/// An evaluable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    /// `.name`
    Field(String),
    /// `"text"` or `` `text` ``
    Literal(String),
    /// `true` / `false`
    Bool(bool),
    /// `func arg...`
    Call {
        func: Func,
        args: Vec<Expr>,
        position: usize,
    },
}

/// Built-in functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Eq,
    Ne,
    Not,
    And,
    Or,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "not" => Some(Self::Not),
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    pub(crate) const fn name(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// Keywords of the full template language that this evaluator rejects.
const UNSUPPORTED_KEYWORDS: &[&str] = &[
    "range", "with", "define", "template", "block", "break", "continue",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Field(String),
    Str(String),
    Ident(String),
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

#[derive(Debug)]
enum Segment {
    Text(String),
    Action { tokens: Vec<Token>, position: usize },
}

/// Parses template source into nodes.
pub(crate) fn parse(source: &str) -> Result<Vec<Node>, ExpressionError> {
    let segments = scan(source)?;
    let mut parser = Parser {
        segments: segments.into_iter(),
    };
    let (nodes, terminator) = parser.parse_list()?;
    match terminator {
        Terminator::Eof => Ok(nodes),
        Terminator::End(position) => Err(ExpressionError::syntax(position, "unexpected {{end}}")),
        Terminator::Else(position) | Terminator::ElseIf(_, position) => {
            Err(ExpressionError::syntax(position, "unexpected {{else}}"))
        }
    }
}

/// Splits the source into text and tokenized actions, applying trim markers.
fn scan(source: &str) -> Result<Vec<Segment>, ExpressionError> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut trim_next = false;

    while let Some(offset) = source[cursor..].find("{{") {
        let open = cursor + offset;
        let mut body = open + 2;
        let mut text = &source[cursor..open];
        if trim_next {
            text = text.trim_start();
        }
        if is_trim_marker(&source[body..]) {
            text = text.trim_end();
            body += 1;
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }

        let comment = is_comment(source, body);
        let (tokens, end, trim) = if comment {
            skip_comment(source, body, open)?
        } else {
            tokenize(source, body, open)?
        };
        if !tokens.is_empty() {
            segments.push(Segment::Action {
                tokens,
                position: open,
            });
        } else if !comment {
            return Err(ExpressionError::syntax(open, "missing value for command"));
        }
        trim_next = trim;
        cursor = end;
    }

    let mut text = &source[cursor..];
    if trim_next {
        text = text.trim_start();
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }

    Ok(segments)
}

/// `-` followed by whitespace right after `{{`.
fn is_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn is_comment(source: &str, body: usize) -> bool {
    source[body..].trim_start().starts_with("/*")
}

fn skip_comment(
    source: &str,
    body: usize,
    open: usize,
) -> Result<(Vec<Token>, usize, bool), ExpressionError> {
    let Some(close) = source[body..].find("*/") else {
        return Err(ExpressionError::syntax(open, "unclosed comment"));
    };
    let after = body + close + 2;
    let rest = &source[after..];
    let trimmed = rest.trim_start();
    let skipped = rest.len() - trimmed.len();
    if let Some(stripped) = trimmed.strip_prefix("-}}") {
        if skipped == 0 {
            return Err(ExpressionError::syntax(after, "comment ends before closing delimiter"));
        }
        return Ok((Vec::new(), source.len() - stripped.len(), true));
    }
    if trimmed.starts_with("}}") {
        return Ok((Vec::new(), after + skipped + 2, false));
    }
    Err(ExpressionError::syntax(after, "comment ends before closing delimiter"))
}

/// Tokenizes one action starting at `start`. Returns the tokens, the byte
/// offset just past `}}`, and whether a `-}}` trim marker closed the action.
fn tokenize(
    source: &str,
    start: usize,
    open: usize,
) -> Result<(Vec<Token>, usize, bool), ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = start;

    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        if pos >= bytes.len() {
            return Err(ExpressionError::syntax(open, "unclosed action"));
        }

        let rest = &source[pos..];
        if rest.starts_with("}}") {
            return Ok((tokens, pos + 2, false));
        }
        if rest.starts_with("-}}") && pos > start && bytes[pos - 1].is_ascii_whitespace() {
            return Ok((tokens, pos + 3, true));
        }

        match bytes[pos] {
            b'(' => {
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    position: pos,
                });
                pos += 1;
            }
            b')' => {
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    position: pos,
                });
                pos += 1;
            }
            b'"' => {
                let (value, next) = quoted_string(source, pos)?;
                tokens.push(Token {
                    kind: TokenKind::Str(value),
                    position: pos,
                });
                pos = next;
            }
            b'`' => {
                let Some(close) = source[pos + 1..].find('`') else {
                    return Err(ExpressionError::syntax(pos, "unterminated raw string"));
                };
                tokens.push(Token {
                    kind: TokenKind::Str(source[pos + 1..pos + 1 + close].to_string()),
                    position: pos,
                });
                pos += close + 2;
            }
            b'.' => {
                let name_len = identifier_len(&source[pos + 1..]);
                if name_len == 0 {
                    return Err(ExpressionError::syntax(
                        pos,
                        "bare '.' is not supported; use .field",
                    ));
                }
                let end = pos + 1 + name_len;
                if bytes.get(end) == Some(&b'.') {
                    return Err(ExpressionError::syntax(pos, "nested field access is not supported"));
                }
                tokens.push(Token {
                    kind: TokenKind::Field(source[pos + 1..end].to_string()),
                    position: pos,
                });
                pos = end;
            }
            b'|' => {
                return Err(ExpressionError::syntax(pos, "pipelines are not supported"));
            }
            b'$' => {
                return Err(ExpressionError::syntax(pos, "template variables are not supported"));
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let len = identifier_len(rest);
                tokens.push(Token {
                    kind: TokenKind::Ident(rest[..len].to_string()),
                    position: pos,
                });
                pos += len;
            }
            _ => {
                let ch = rest.chars().next().unwrap_or_default();
                return Err(ExpressionError::syntax(
                    pos,
                    format!("unexpected character {ch:?} in action"),
                ));
            }
        }
    }
}

fn identifier_len(s: &str) -> usize {
    s.bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count()
}

fn quoted_string(source: &str, start: usize) -> Result<(String, usize), ExpressionError> {
    let mut value = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((value, start + 1 + i + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((j, other)) => {
                    return Err(ExpressionError::syntax(
                        start + 1 + j,
                        format!("unknown escape sequence \\{other}"),
                    ));
                }
                None => break,
            },
            '\n' => break,
            _ => value.push(ch),
        }
    }

    Err(ExpressionError::syntax(start, "unterminated quoted string"))
}

enum Terminator {
    Eof,
    End(usize),
    Else(usize),
    ElseIf(Expr, usize),
}

struct Parser {
    segments: std::vec::IntoIter<Segment>,
}

impl Parser {
    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), ExpressionError> {
        let mut nodes = Vec::new();

        while let Some(segment) = self.segments.next() {
            let (tokens, position) = match segment {
                Segment::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Segment::Action { tokens, position } => (tokens, position),
            };

            let keyword = match &tokens[0].kind {
                TokenKind::Ident(word) => Some(word.as_str()),
                _ => None,
            };

            match keyword {
                Some("if") => nodes.push(self.parse_if(&tokens[1..], position)?),
                Some("else") => {
                    return match tokens.get(1) {
                        None => Ok((nodes, Terminator::Else(position))),
                        Some(Token {
                            kind: TokenKind::Ident(word),
                            ..
                        }) if word == "if" => {
                            let condition = parse_command(&tokens[2..], position)?;
                            Ok((nodes, Terminator::ElseIf(condition, position)))
                        }
                        Some(token) => Err(ExpressionError::syntax(
                            token.position,
                            "unexpected token after else",
                        )),
                    };
                }
                Some("end") => {
                    if let Some(token) = tokens.get(1) {
                        return Err(ExpressionError::syntax(
                            token.position,
                            "unexpected token after end",
                        ));
                    }
                    return Ok((nodes, Terminator::End(position)));
                }
                Some(word) if UNSUPPORTED_KEYWORDS.contains(&word) => {
                    return Err(ExpressionError::syntax(
                        position,
                        format!("{{{{{word}}}}} is not supported"),
                    ));
                }
                _ => nodes.push(Node::Output(parse_command(&tokens, position)?)),
            }
        }

        Ok((nodes, Terminator::Eof))
    }

    fn parse_if(&mut self, condition: &[Token], position: usize) -> Result<Node, ExpressionError> {
        let mut branches = Vec::new();
        let mut condition = parse_command(condition, position)?;

        loop {
            let (body, terminator) = self.parse_list()?;
            branches.push((condition, body));
            match terminator {
                Terminator::End(_) => {
                    return Ok(Node::If {
                        branches,
                        otherwise: Vec::new(),
                    });
                }
                Terminator::ElseIf(next, _) => condition = next,
                Terminator::Else(_) => {
                    let (otherwise, terminator) = self.parse_list()?;
                    return match terminator {
                        Terminator::End(_) => Ok(Node::If {
                            branches,
                            otherwise,
                        }),
                        Terminator::Eof => {
                            Err(ExpressionError::syntax(position, "missing {{end}} for {{if}}"))
                        }
                        Terminator::Else(pos) | Terminator::ElseIf(_, pos) => Err(
                            ExpressionError::syntax(pos, "{{else}} after final {{else}}"),
                        ),
                    };
                }
                Terminator::Eof => {
                    return Err(ExpressionError::syntax(position, "missing {{end}} for {{if}}"));
                }
            }
        }
    }
}

/// Parses a full command: a single value or a function call.
fn parse_command(tokens: &[Token], position: usize) -> Result<Expr, ExpressionError> {
    let Some(first) = tokens.first() else {
        return Err(ExpressionError::syntax(position, "missing value for command"));
    };

    if let TokenKind::Ident(name) = &first.kind {
        if let Some(func) = Func::lookup(name) {
            let mut args = Vec::new();
            let mut index = 1;
            while index < tokens.len() {
                args.push(parse_operand(tokens, &mut index)?);
            }
            return Ok(Expr::Call {
                func,
                args,
                position: first.position,
            });
        }
    }

    let mut index = 0;
    let value = parse_operand(tokens, &mut index)?;
    if let Some(extra) = tokens.get(index) {
        return Err(ExpressionError::syntax(
            extra.position,
            "unexpected argument after value; only functions take arguments",
        ));
    }
    Ok(value)
}

fn parse_operand(tokens: &[Token], index: &mut usize) -> Result<Expr, ExpressionError> {
    let token = &tokens[*index];
    *index += 1;

    match &token.kind {
        TokenKind::Field(name) => Ok(Expr::Field(name.clone())),
        TokenKind::Str(value) => Ok(Expr::Literal(value.clone())),
        TokenKind::Ident(word) if word == "true" => Ok(Expr::Bool(true)),
        TokenKind::Ident(word) if word == "false" => Ok(Expr::Bool(false)),
        TokenKind::Ident(word) if Func::lookup(word).is_some() => Err(ExpressionError::syntax(
            token.position,
            format!("function {word:?} used as an argument must be parenthesized"),
        )),
        TokenKind::Ident(word) => Err(ExpressionError::syntax(
            token.position,
            format!("function {word:?} not defined"),
        )),
        TokenKind::LParen => {
            let start = *index;
            let mut depth = 1usize;
            while *index < tokens.len() {
                match tokens[*index].kind {
                    TokenKind::LParen => depth += 1,
                    TokenKind::RParen => {
                        depth -= 1;
                        if depth == 0 {
                            let inner = parse_command(&tokens[start..*index], token.position)?;
                            *index += 1;
                            return Ok(inner);
                        }
                    }
                    _ => {}
                }
                *index += 1;
            }
            Err(ExpressionError::syntax(token.position, "unclosed left paren"))
        }
        TokenKind::RParen => Err(ExpressionError::syntax(token.position, "unexpected right paren")),
    }
}
