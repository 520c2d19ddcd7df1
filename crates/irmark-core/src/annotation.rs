//! Fixture annotations: expectations embedded as comments in source text.
//!
//! A fixture is ordinary source code with expectation comments inserted at
//! the positions they describe:
//!
//! ```text
//! main() {
//!   var list = /*List<int>*/[1, 2];
//!   for (var x in list) /*iterator: Iterator<int>*/{}
//! }
//! ```
//!
//! [`AnnotatedCode::from_text`] strips the comments out. Each annotation
//! remembers the byte offset at which it sat in the *stripped* text, which is
//! the text the compiler sees, so a node annotation lines up with the offset
//! of the construct that follows it. [`compute_expected_map`] decodes every
//! annotation into an [`IdValue`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode, DecodeError};
use crate::id::{Id, IdValue};

/// Default annotation comment opener.
pub const DEFAULT_COMMENT_START: &str = "/*";
/// Default annotation comment closer.
pub const DEFAULT_COMMENT_END: &str = "*/";

/// Error type for annotation extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// A comment opener without a matching closer.
    #[error("unterminated annotation starting at {line}:{column}")]
    Unterminated { line: u32, column: u32 },

    /// An annotation whose text could not be decoded.
    #[error("bad annotation at {line}:{column}: {source}")]
    Decode {
        line: u32,
        column: u32,
        #[source]
        source: DecodeError,
    },

    /// Two annotations that decode to the same identifier.
    #[error("duplicate expectation for {id} at {line}:{column}")]
    DuplicateExpectation { id: Id, line: u32, column: u32 },

    /// A comment marker that is the empty string.
    #[error("annotation comment markers must not be empty")]
    EmptyMarker,

    /// Offsets are 32-bit; larger fixtures are rejected.
    #[error("fixture too large ({len} bytes)")]
    SourceTooLarge { len: usize },
}

/// One annotation comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Byte offset in the stripped source.
    pub offset: u32,
    /// 1-based line of the comment opener in the annotated text.
    pub line: u32,
    /// 1-based column (UTF-8 bytes) of the comment opener.
    pub column: u32,
    /// Text between the comment markers.
    pub text: String,
}

/// Annotated fixture text split into plain source and annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedCode {
    /// The original text, annotations included.
    pub annotated_code: String,
    /// The text with every annotation comment removed.
    pub source_code: String,
    /// Annotations in source order.
    pub annotations: Vec<Annotation>,
}

impl AnnotatedCode {
    /// Split `text` into source and annotations using the given markers.
    pub fn from_text(
        text: &str,
        comment_start: &str,
        comment_end: &str,
    ) -> Result<Self, AnnotationError> {
        if comment_start.is_empty() || comment_end.is_empty() {
            return Err(AnnotationError::EmptyMarker);
        }
        if u32::try_from(text.len()).is_err() {
            return Err(AnnotationError::SourceTooLarge { len: text.len() });
        }

        let mut source_code = String::with_capacity(text.len());
        let mut annotations = Vec::new();
        let mut position = LinePosition::new();
        let mut cursor = 0;

        while let Some(found) = text[cursor..].find(comment_start) {
            let start = cursor + found;
            source_code.push_str(&text[cursor..start]);
            position.advance(&text[cursor..start]);

            let body_start = start + comment_start.len();
            let Some(body_len) = text[body_start..].find(comment_end) else {
                return Err(AnnotationError::Unterminated {
                    line: position.line,
                    column: position.column,
                });
            };
            let body_end = body_start + body_len;

            annotations.push(Annotation {
                offset: source_code.len() as u32,
                line: position.line,
                column: position.column,
                text: text[body_start..body_end].to_string(),
            });

            cursor = body_end + comment_end.len();
            position.advance(&text[start..cursor]);
        }
        source_code.push_str(&text[cursor..]);

        Ok(AnnotatedCode {
            annotated_code: text.to_string(),
            source_code,
            annotations,
        })
    }

    /// Split `text` using the default `/*` and `*/` markers.
    pub fn parse(text: &str) -> Result<Self, AnnotationError> {
        AnnotatedCode::from_text(text, DEFAULT_COMMENT_START, DEFAULT_COMMENT_END)
    }
}

/// Decode every annotation into an expectation keyed by identifier.
pub fn compute_expected_map(code: &AnnotatedCode) -> Result<HashMap<Id, IdValue>, AnnotationError> {
    let mut expected = HashMap::new();
    for annotation in &code.annotations {
        let value =
            decode(annotation.offset, &annotation.text).map_err(|source| AnnotationError::Decode {
                line: annotation.line,
                column: annotation.column,
                source,
            })?;
        if expected.contains_key(&value.id) {
            return Err(AnnotationError::DuplicateExpectation {
                id: value.id,
                line: annotation.line,
                column: annotation.column,
            });
        }
        expected.insert(value.id.clone(), value);
    }
    Ok(expected)
}

/// Running 1-based line/column tracker.
struct LinePosition {
    line: u32,
    column: u32,
}

impl LinePosition {
    fn new() -> Self {
        LinePosition { line: 1, column: 1 }
    }

    fn advance(&mut self, text: &str) {
        match text.rfind('\n') {
            Some(last) => {
                self.line += text.matches('\n').count() as u32;
                self.column = (text.len() - last) as u32;
            }
            None => self.column += text.len() as u32,
        }
    }
}
