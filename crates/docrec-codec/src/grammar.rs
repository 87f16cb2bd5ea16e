//! Nested literal grammar using winnow
//!
//! ```text
//! record := [class '@'] [entry (',' entry)*]
//! entry  := (quoted | name) ':' node
//! node   := quoted | '_' base64 '_' | '#' rid | '(' record ')'
//!         | '{' [entry (',' entry)*] '}' | '[' nodes ']' | '<' nodes '>'
//!         | token | <empty>
//! ```
//!
//! Parsing only recognizes structure; literal bodies are kept as slices of the
//! source and turned into values afterwards. Every node remembers how much
//! input was left when it started so errors can point back into the source.

use docrec_diagnostics::RecordError;
use winnow::combinator::{alt, delimited, eof, opt, peek, terminated};
use winnow::error::{ContextError, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take, take_till, take_while};

pub type Input<'a> = &'a str;
pub type PResult<T> = Result<T, ContextError>;

const CLOSERS: [char; 4] = [')', ']', '}', '>'];

pub struct Node<'a> {
    /// Input length remaining where the node starts
    pub rest: usize,
    pub kind: NodeKind<'a>,
}

impl Node<'_> {
    pub fn offset_in(&self, source: &str) -> usize {
        source.len().saturating_sub(self.rest)
    }
}

pub enum NodeKind<'a> {
    Empty,
    /// Raw body of a quoted string, escapes unresolved
    Quoted(&'a str),
    /// Base64 body of `_..._`
    Binary(&'a str),
    /// `#cluster:position`, including the `#`
    Link(&'a str),
    Token(&'a str),
    Record(RecordNode<'a>),
    Map(Vec<Entry<'a>>),
    List(Vec<Node<'a>>),
    Set(Vec<Node<'a>>),
}

pub struct RecordNode<'a> {
    pub class_name: Option<&'a str>,
    pub fields: Vec<Entry<'a>>,
}

pub struct Entry<'a> {
    pub rest: usize,
    pub name: &'a str,
    pub quoted: bool,
    pub value: Node<'a>,
}

fn is_token_end(c: char) -> bool {
    c == ',' || CLOSERS.contains(&c)
}

pub fn is_class_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn expected(c: char) -> StrContext {
    StrContext::Expected(StrContextValue::CharLiteral(c))
}

/// Parse a whole text as a single node
pub fn parse_value(source: &str) -> Result<Node<'_>, RecordError> {
    complete(source, node)
}

/// Parse a whole text as a record body
pub fn parse_record(source: &str) -> Result<RecordNode<'_>, RecordError> {
    complete(source, record)
}

fn complete<'a, O>(
    source: &'a str,
    mut parser: impl Parser<Input<'a>, O, ContextError>,
) -> Result<O, RecordError> {
    let mut input: Input<'a> = source;
    let result = parser.parse_next(&mut input).and_then(|out| {
        eof.context(StrContext::Label("end of input"))
            .parse_next(&mut input)?;
        Ok(out)
    });

    result.map_err(|err| {
        let offset = source.len() - input.len();
        RecordError::malformed_literal(describe(&err, input), source, offset)
    })
}

fn describe(err: &ContextError, remaining: &str) -> String {
    let expected: Vec<String> = err
        .context()
        .filter_map(|ctx| match ctx {
            StrContext::Expected(StrContextValue::CharLiteral(c)) => Some(format!("'{c}'")),
            StrContext::Expected(StrContextValue::StringLiteral(s)) => Some(format!("'{s}'")),
            StrContext::Expected(value) => Some(value.to_string()),
            _ => None,
        })
        .collect();

    if !expected.is_empty() {
        return format!("expected {}", expected.join(" or "));
    }
    match remaining.chars().next() {
        None => "unexpected end of input".to_string(),
        Some(c) => format!("unexpected character '{c}'"),
    }
}

fn node<'a>(input: &mut Input<'a>) -> PResult<Node<'a>> {
    let rest = input.len();
    let kind = match peek(opt(any)).parse_next(input)? {
        None => NodeKind::Empty,
        Some(c) if is_token_end(c) => NodeKind::Empty,
        Some('"') => NodeKind::Quoted(quoted(input)?),
        Some('_') => NodeKind::Binary(
            delimited('_', take_till(0.., '_'), '_'.context(expected('_'))).parse_next(input)?,
        ),
        Some('#') => NodeKind::Link(token(input)?),
        Some('(') => NodeKind::Record(
            delimited('(', record, ')'.context(expected(')'))).parse_next(input)?,
        ),
        Some('{') => NodeKind::Map(
            delimited('{', entries, '}'.context(expected('}'))).parse_next(input)?,
        ),
        Some('[') => NodeKind::List(sequence('[', ']').parse_next(input)?),
        Some('<') => NodeKind::Set(sequence('<', '>').parse_next(input)?),
        Some(_) => NodeKind::Token(token(input)?),
    };
    Ok(Node { rest, kind })
}

fn token<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    take_till(1.., is_token_end).parse_next(input)
}

/// A double-quoted string; returns the raw body between the quotes
fn quoted<'a>(input: &mut Input<'a>) -> PResult<&'a str> {
    '"'.parse_next(input)?;
    let body = take(quoted_body_len(*input)).parse_next(input)?;
    '"'.context(expected('"')).parse_next(input)?;
    Ok(body)
}

/// Number of chars before the closing quote, or all of them if unterminated
fn quoted_body_len(input: &str) -> usize {
    let mut escaped = false;
    for (count, c) in input.chars().enumerate() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return count;
        }
    }
    input.chars().count()
}

fn record<'a>(input: &mut Input<'a>) -> PResult<RecordNode<'a>> {
    let class_name = opt(terminated(take_while(1.., is_class_char), '@')).parse_next(input)?;
    let fields = entries(input)?;
    Ok(RecordNode { class_name, fields })
}

fn entries<'a>(input: &mut Input<'a>) -> PResult<Vec<Entry<'a>>> {
    let mut out = Vec::new();
    loop {
        match peek(opt(any)).parse_next(input)? {
            None => break,
            Some(c) if CLOSERS.contains(&c) => break,
            Some(_) => {}
        }
        out.push(entry(input)?);
        if opt(',').parse_next(input)?.is_none() {
            break;
        }
    }
    Ok(out)
}

fn entry<'a>(input: &mut Input<'a>) -> PResult<Entry<'a>> {
    let rest = input.len();
    let (name, quoted) = alt((
        quoted.map(|name| (name, true)),
        take_till(1.., |c: char| c == ':' || is_token_end(c)).map(|name| (name, false)),
    ))
    .context(StrContext::Label("field name"))
    .parse_next(input)?;
    ':'.context(expected(':')).parse_next(input)?;
    let value = node(input)?;
    Ok(Entry {
        rest,
        name,
        quoted,
        value,
    })
}

fn sequence<'a>(
    mut open: char,
    close: char,
) -> impl FnMut(&mut Input<'a>) -> PResult<Vec<Node<'a>>> {
    move |input: &mut Input<'a>| {
        open.parse_next(input)?;
        let mut items = Vec::new();
        if opt(close).parse_next(input)?.is_some() {
            return Ok(items);
        }
        loop {
            items.push(node(input)?);
            if opt(',').parse_next(input)?.is_none() {
                break;
            }
        }
        close.context(expected(close)).parse_next(input)?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<&'static str> {
        let Ok(Node {
            kind: NodeKind::List(items),
            ..
        }) = parse_value(source)
        else {
            return Vec::new();
        };
        items
            .iter()
            .map(|item| match item.kind {
                NodeKind::Empty => "empty",
                NodeKind::Quoted(_) => "quoted",
                NodeKind::Binary(_) => "binary",
                NodeKind::Link(_) => "link",
                NodeKind::Token(_) => "token",
                NodeKind::Record(_) => "record",
                NodeKind::Map(_) => "map",
                NodeKind::List(_) => "list",
                NodeKind::Set(_) => "set",
            })
            .collect()
    }

    #[test]
    fn test_first_char_dispatch() {
        assert_eq!(
            kinds(r#"["a",_AQ==_,#1:2,(x:1),{"k":2},[3],<4>,5,]"#),
            vec![
                "quoted", "binary", "link", "record", "map", "list", "set", "token", "empty"
            ]
        );
    }

    #[test]
    fn test_record_with_class() {
        let Ok(record) = parse_record("Person@name:\"Ann\",age:30") else {
            panic!("record should parse");
        };
        assert_eq!(record.class_name, Some("Person"));
        let names: Vec<_> = record.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn test_quoted_body_keeps_escapes() {
        let Ok(Node {
            kind: NodeKind::Quoted(body),
            ..
        }) = parse_value(r#""a\"b""#)
        else {
            panic!("quoted string should parse");
        };
        assert_eq!(body, r#"a\"b"#);
    }

    #[test]
    fn test_unterminated_structures_report_offset() {
        let err = parse_value("[1,2");
        assert_eq!(
            err.err(),
            Some(RecordError::malformed_literal("expected ']'", "[1,2", 4))
        );

        let err = parse_value("\"abc");
        assert!(matches!(
            err,
            Err(RecordError::MalformedLiteral { offset: 4, .. })
        ));
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        assert!(matches!(
            parse_value("1,2"),
            Err(RecordError::MalformedLiteral { offset: 1, .. })
        ));
    }
}
