use super::TemplateError;
use serde_json::Value;
use std::iter::Peekable;
use std::vec::IntoIter;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Action(Expr),
    If {
        branches: Vec<(Expr, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expr {
    Field(Vec<String>),
    Literal(Value),
    Call(String, Vec<Expr>),
}

enum Piece {
    Text(String),
    Action(String),
}

enum Stop {
    Eof,
    End,
    Else,
    ElseIf(Expr),
}

pub(crate) fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut pieces = split(source)?.into_iter().peekable();
    let (nodes, stop) = parse_nodes(&mut pieces)?;
    match stop {
        Stop::Eof => Ok(nodes),
        Stop::End => Err(TemplateError::Unexpected("end".to_string())),
        Stop::Else | Stop::ElseIf(_) => Err(TemplateError::Unexpected("else".to_string())),
    }
}

/// Cut the source into literal text and `{{ ... }}` actions, applying the
/// `{{-` / `-}}` whitespace trimming markers.
fn split(source: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut rest = source;
    let mut offset = 0;
    let mut trim_next = false;

    while let Some(start) = rest.find("{{") {
        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }

        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            return Err(TemplateError::Unterminated(offset + start));
        };

        let mut action = &after_open[..end];
        if let Some(trimmed) = action.strip_prefix('-') {
            text = text.trim_end();
            action = trimmed;
        }
        trim_next = false;
        if let Some(trimmed) = action.strip_suffix('-') {
            trim_next = true;
            action = trimmed;
        }

        if !text.is_empty() {
            pieces.push(Piece::Text(text.to_string()));
        }
        pieces.push(Piece::Action(action.trim().to_string()));

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    let text = if trim_next { rest.trim_start() } else { rest };
    if !text.is_empty() {
        pieces.push(Piece::Text(text.to_string()));
    }
    Ok(pieces)
}

fn parse_nodes(pieces: &mut Peekable<IntoIter<Piece>>) -> Result<(Vec<Node>, Stop), TemplateError> {
    let mut nodes = Vec::new();

    while let Some(piece) = pieces.next() {
        let action = match piece {
            Piece::Text(text) => {
                nodes.push(Node::Text(text));
                continue;
            }
            Piece::Action(action) => action,
        };

        if action.starts_with("/*") {
            continue;
        }
        if action == "end" {
            return Ok((nodes, Stop::End));
        }
        if action == "else" {
            return Ok((nodes, Stop::Else));
        }
        if let Some(condition) = keyword(&action, "else if") {
            return Ok((nodes, Stop::ElseIf(parse_expr(condition)?)));
        }
        if let Some(condition) = keyword(&action, "if") {
            let condition = parse_expr(condition)?;
            nodes.push(parse_if(pieces, condition)?);
            continue;
        }

        nodes.push(Node::Action(parse_expr(&action)?));
    }

    Ok((nodes, Stop::Eof))
}

fn parse_if(pieces: &mut Peekable<IntoIter<Piece>>, condition: Expr) -> Result<Node, TemplateError> {
    let mut branches = Vec::new();
    let mut condition = condition;

    loop {
        let (body, stop) = parse_nodes(pieces)?;
        branches.push((condition, body));

        match stop {
            Stop::End => {
                return Ok(Node::If {
                    branches,
                    otherwise: Vec::new(),
                })
            }
            Stop::ElseIf(next) => condition = next,
            Stop::Else => {
                let (otherwise, stop) = parse_nodes(pieces)?;
                return match stop {
                    Stop::End => Ok(Node::If { branches, otherwise }),
                    Stop::Eof => Err(TemplateError::MissingEnd),
                    Stop::Else | Stop::ElseIf(_) => Err(TemplateError::Unexpected("else".to_string())),
                };
            }
            Stop::Eof => return Err(TemplateError::MissingEnd),
        }
    }
}

/// `keyword("if .X", "if")` yields `Some(".X")`.
fn keyword<'a>(action: &'a str, word: &str) -> Option<&'a str> {
    let rest = action.strip_prefix(word)?;
    if rest.starts_with(|c: char| c.is_whitespace() || c == '(') {
        Some(rest.trim())
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Field(Vec<String>),
    Ident(String),
    Literal(Value),
    Open,
    Close,
    Pipe,
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '.' => {
                let end = scan_while(&mut chars, |c| c.is_alphanumeric() || c == '_' || c == '.');
                let path = source[start..end]
                    .split('.')
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect();
                tokens.push(Token::Field(path));
            }
            '"' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => text.push('\n'),
                            Some((_, 't')) => text.push('\t'),
                            Some((_, other)) => text.push(other),
                            None => break,
                        },
                        other => text.push(other),
                    }
                }
                if !closed {
                    return Err(TemplateError::Syntax("unterminated string".to_string()));
                }
                tokens.push(Token::Literal(Value::String(text)));
            }
            '`' => {
                chars.next();
                let begin = start + 1;
                let end = scan_while(&mut chars, |c| c != '`');
                if chars.next().is_none() {
                    return Err(TemplateError::Syntax("unterminated raw string".to_string()));
                }
                tokens.push(Token::Literal(Value::String(source[begin..end].to_string())));
            }
            c if c.is_ascii_digit() || c == '-' => {
                chars.next();
                let end = scan_while(&mut chars, |c| c.is_ascii_digit() || c == '.');
                let text = &source[start..end];
                let number = if text.contains('.') {
                    text.parse::<f64>().ok().and_then(serde_json::Number::from_f64)
                } else {
                    text.parse::<i64>().ok().map(serde_json::Number::from)
                };
                let number = number.ok_or_else(|| TemplateError::Syntax(format!("bad number {text:?}")))?;
                tokens.push(Token::Literal(Value::Number(number)));
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = scan_while(&mut chars, |c| c.is_alphanumeric() || c == '_');
                let word = &source[start..end];
                tokens.push(match word {
                    "true" => Token::Literal(Value::Bool(true)),
                    "false" => Token::Literal(Value::Bool(false)),
                    "nil" => Token::Literal(Value::Null),
                    _ => Token::Ident(word.to_string()),
                });
            }
            other => return Err(TemplateError::Syntax(format!("unexpected character {other:?}"))),
        }
    }

    Ok(tokens)
}

/// Advance while `accept` holds; returns the byte offset where it stopped.
fn scan_while(
    chars: &mut Peekable<std::str::CharIndices<'_>>,
    accept: impl Fn(char) -> bool,
) -> usize {
    let mut end = None;
    while let Some(&(index, c)) = chars.peek() {
        if end.is_some() && !accept(c) {
            return index;
        }
        end = Some(index + c.len_utf8());
        chars.next();
    }
    end.unwrap_or(0)
}

pub(crate) fn parse_expr(source: &str) -> Result<Expr, TemplateError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(TemplateError::Syntax("missing value for command".to_string()));
    }
    let mut parser = ExprParser { tokens, pos: 0 };
    let expr = parser.pipeline()?;
    if parser.pos < parser.tokens.len() {
        return Err(TemplateError::Syntax(format!("unexpected {:?}", parser.tokens[parser.pos])));
    }
    Ok(expr)
}

struct ExprParser {
    tokens: Vec<Token>,
    pos: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn pipeline(&mut self) -> Result<Expr, TemplateError> {
        let mut expr = self.command()?;
        while self.peek() == Some(&Token::Pipe) {
            self.pos += 1;
            match self.command()? {
                Expr::Call(name, mut args) => {
                    args.push(expr);
                    expr = Expr::Call(name, args);
                }
                _ => return Err(TemplateError::Syntax("can only pipe into a function".to_string())),
            }
        }
        Ok(expr)
    }

    fn command(&mut self) -> Result<Expr, TemplateError> {
        if let Some(Token::Ident(name)) = self.peek().cloned() {
            self.pos += 1;
            let mut args = Vec::new();
            while let Some(token) = self.peek() {
                if matches!(token, Token::Pipe | Token::Close) {
                    break;
                }
                args.push(self.operand()?);
            }
            return Ok(Expr::Call(name, args));
        }

        let operand = self.operand()?;
        match self.peek() {
            None | Some(Token::Pipe) | Some(Token::Close) => Ok(operand),
            Some(other) => Err(TemplateError::Syntax(format!("unexpected {other:?} after operand"))),
        }
    }

    fn operand(&mut self) -> Result<Expr, TemplateError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| TemplateError::Syntax("missing operand".to_string()))?;
        self.pos += 1;

        match token {
            Token::Field(path) => Ok(Expr::Field(path)),
            Token::Literal(value) => Ok(Expr::Literal(value)),
            Token::Ident(name) => Ok(Expr::Call(name, Vec::new())),
            Token::Open => {
                let expr = self.pipeline()?;
                if self.peek() != Some(&Token::Close) {
                    return Err(TemplateError::Syntax("unclosed parenthesis".to_string()));
                }
                self.pos += 1;
                Ok(expr)
            }
            Token::Close | Token::Pipe => Err(TemplateError::Syntax(format!("unexpected {token:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_path() {
        assert_eq!(
            parse_expr(".Segments.Git.Branch").unwrap(),
            Expr::Field(vec!["Segments".into(), "Git".into(), "Branch".into()])
        );
        assert_eq!(parse_expr(".").unwrap(), Expr::Field(vec![]));
    }

    #[test]
    fn test_parse_call_with_nested_call() {
        let expr = parse_expr("and .A (eq .B \"x\")").unwrap();
        assert_eq!(
            expr,
            Expr::Call(
                "and".into(),
                vec![
                    Expr::Field(vec!["A".into()]),
                    Expr::Call(
                        "eq".into(),
                        vec![Expr::Field(vec!["B".into()]), Expr::Literal(Value::String("x".into()))]
                    ),
                ]
            )
        );
    }

    #[test]
    fn test_pipe_appends_argument() {
        assert_eq!(
            parse_expr(".Name | upper").unwrap(),
            Expr::Call("upper".into(), vec![Expr::Field(vec!["Name".into()])])
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(parse_expr("-3").unwrap(), Expr::Literal(Value::from(-3)));
        assert_eq!(parse_expr("1.5").unwrap(), Expr::Literal(Value::from(1.5)));
    }

    #[test]
    fn test_if_else_chain_structure() {
        let nodes = parse("{{ if .A }}a{{ else if .B }}b{{ else }}c{{ end }}!").unwrap();
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            Node::If { branches, otherwise } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(otherwise, &vec![Node::Text("c".into())]);
            }
            other => panic!("expected if node, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(parse("a{{/* note */}}b").unwrap(), vec![Node::Text("a".into()), Node::Text("b".into())]);
    }

    #[test]
    fn test_operands_without_function_are_rejected() {
        assert!(parse_expr(".A .B").is_err());
        assert!(parse_expr("(eq .A 1").is_err());
    }
}
