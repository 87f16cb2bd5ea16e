//! Path expression tokenizer
//!
//! Splits `a.b[0].c[x = 1]` into steps of a name followed by a separator.
//! The bracket body is handed over raw; the indexing rules interpret it. A
//! step that directly follows `]` has an empty name.

use docrec_diagnostics::{RecordError, Result, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Separator<'p> {
    Dot,
    Bracket { content: &'p str, span: Span },
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<'p> {
    pub name: &'p str,
    pub separator: Separator<'p>,
}

pub struct PathCursor<'p> {
    path: &'p str,
    pos: usize,
    done: bool,
}

impl<'p> PathCursor<'p> {
    pub fn new(path: &'p str) -> Self {
        Self {
            path,
            pos: 0,
            done: false,
        }
    }

    fn next_step(&mut self) -> Result<Step<'p>> {
        let rest = &self.path[self.pos..];
        let Some(offset) = rest.find(['.', '[']) else {
            self.done = true;
            return Ok(Step {
                name: rest,
                separator: Separator::End,
            });
        };

        let name = &rest[..offset];
        let at = self.pos + offset;
        if self.path.as_bytes()[at] == b'.' {
            self.pos = at + 1;
            return Ok(Step {
                name,
                separator: Separator::Dot,
            });
        }

        let open = at + 1;
        let close = closing_bracket(self.path, open).ok_or_else(|| {
            RecordError::malformed_path("missing closing ']'", self.path, at..self.path.len())
        })?;
        let separator = Separator::Bracket {
            content: &self.path[open..close],
            span: Span::new(open, close),
        };

        match self.path.as_bytes().get(close + 1) {
            None => self.done = true,
            Some(b'.' | b'[') => self.pos = close + 1,
            Some(_) => {
                return Err(RecordError::malformed_path(
                    "expected '.' or '[' after ']'",
                    self.path,
                    close + 1..close + 2,
                ));
            }
        }
        Ok(Step { name, separator })
    }
}

impl<'p> Iterator for PathCursor<'p> {
    type Item = Result<Step<'p>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let step = self.next_step();
        if step.is_err() {
            self.done = true;
        }
        Some(step)
    }
}

/// Byte offset of the `]` closing a bracket opened before `from`, skipping quoted text
fn closing_bracket(path: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, c) in path[from..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(from + offset),
            (None, _) => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(path: &str) -> Vec<Step<'_>> {
        PathCursor::new(path).collect::<Result<_>>().unwrap()
    }

    #[test]
    fn test_dotted_path() {
        assert_eq!(
            steps("a.b"),
            vec![
                Step {
                    name: "a",
                    separator: Separator::Dot
                },
                Step {
                    name: "b",
                    separator: Separator::End
                },
            ]
        );
    }

    #[test]
    fn test_brackets_and_chaining() {
        let steps = steps("items[0][1].name");
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].name, "items");
        assert_eq!(
            steps[0].separator,
            Separator::Bracket {
                content: "0",
                span: Span::new(6, 7)
            }
        );
        assert_eq!(steps[1].name, "");
        assert_eq!(
            steps[2],
            Step {
                name: "",
                separator: Separator::Dot
            }
        );
        assert_eq!(steps[3].name, "name");
        assert_eq!(steps[3].separator, Separator::End);
    }

    #[test]
    fn test_bracket_inside_quotes() {
        let steps = steps("m['a]b']");
        assert_eq!(
            steps[0].separator,
            Separator::Bracket {
                content: "'a]b'",
                span: Span::new(2, 7)
            }
        );
    }

    #[test]
    fn test_missing_close() {
        let err = PathCursor::new("items[0").find_map(|step| step.err());
        assert_eq!(
            err,
            Some(RecordError::malformed_path("missing closing ']'", "items[0", 5..7))
        );
    }

    #[test]
    fn test_garbage_after_close() {
        let err = PathCursor::new("items[0]x").find_map(|step| step.err());
        assert!(matches!(err, Some(RecordError::MalformedPath { .. })));
    }
}
