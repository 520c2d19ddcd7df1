//! Decoder for textual fact expectations.
//!
//! Fixtures embed expectations as annotation text. The prefix selects the
//! identifier variant; element and class annotations carry their own name,
//! node annotations take the offset at which the annotation was found.
//!
//! ## Grammar
//!
//! ```text
//! <annotation> := <named> | <node>
//! <named>      := ("element: " | "class: ") ["global#"] <name> ":" <value>
//! <node>       := [<node-prefix>] <value>
//! <node-prefix>:= "invoke: " | "update: " | "iterator: " | "current: " | "moveNext: "
//! ```
//!
//! An element `<name>` may be dotted (`Class.member`); the first dot splits
//! class from member.
//!
//! ## Value Normalization
//!
//! Expected values may be wrapped across lines in a fixture. Every run of
//! whitespace containing a newline is removed from the value, so
//!
//! ```text
//! Map<String,
//!     int>
//! ```
//!
//! decodes to `Map<String,int>`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use winnow::combinator::{alt, empty, opt, terminated};
use winnow::prelude::*;
use winnow::token::take_till;
use winnow::ModalResult;

use crate::id::{
    ClassId, ElementId, Id, IdKind, IdValue, NodeKind, CLASS_PREFIX, CURRENT_PREFIX,
    ELEMENT_PREFIX, GLOBAL_PREFIX, INVOKE_PREFIX, ITERATOR_PREFIX, MOVE_NEXT_PREFIX,
    UPDATE_PREFIX,
};

/// Error type for annotation decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// An element or class annotation without a `:` between name and value.
    #[error("invalid {kind} id '{text}': missing ':' separator")]
    MissingSeparator { kind: IdKind, text: String },

    /// The annotation could not be parsed at all.
    #[error("invalid annotation '{text}': {message}")]
    Malformed { text: String, message: String },
}

/// Whitespace runs that contain at least one line break.
static LINE_BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(\n\s*)+\s*").expect("line break pattern is valid"));

/// Decode an annotation found at `offset` into an [`IdValue`].
///
/// # Examples
///
/// ```
/// use irmark_core::decode::decode;
/// use irmark_core::id::{Id, NodeKind};
///
/// let value = decode(42, "invoke: List<int>").unwrap();
/// assert_eq!(value.id, Id::node(42, NodeKind::Invoke));
/// assert_eq!(value.value, "List<int>");
/// ```
pub fn decode(offset: u32, text: &str) -> Result<IdValue, DecodeError> {
    let mut input = text;
    let prefix = parse_prefix
        .parse_next(&mut input)
        .map_err(|e| DecodeError::Malformed {
            text: text.to_string(),
            message: format!("{:?}", e),
        })?;

    let id = match prefix {
        Prefix::Element => {
            let (is_global, name) = parse_named(&mut input, IdKind::Element, text)?;
            let element = match name.split_once('.') {
                Some((class_name, member_name)) => {
                    ElementId::new(Some(class_name.to_string()), member_name, is_global)
                }
                None => ElementId::new(None, name, is_global),
            };
            Id::Element(element)
        }
        Prefix::Class => {
            let (is_global, name) = parse_named(&mut input, IdKind::Class, text)?;
            Id::Class(ClassId::new(name, is_global))
        }
        Prefix::Node(kind) => Id::node(offset, kind),
    };

    Ok(IdValue::new(id, normalize_value(input)))
}

/// Remove line breaks, and the whitespace around them, from an expected value.
pub fn normalize_value(value: &str) -> String {
    LINE_BREAK_RUN.replace_all(value, "").into_owned()
}

// ============================================================================
// Parser implementation using winnow
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Element,
    Class,
    Node(NodeKind),
}

/// Parse the variant prefix. Element and class are tried first; no prefix
/// means a plain node annotation.
fn parse_prefix(input: &mut &str) -> ModalResult<Prefix> {
    alt((
        ELEMENT_PREFIX.value(Prefix::Element),
        CLASS_PREFIX.value(Prefix::Class),
        INVOKE_PREFIX.value(Prefix::Node(NodeKind::Invoke)),
        UPDATE_PREFIX.value(Prefix::Node(NodeKind::Update)),
        ITERATOR_PREFIX.value(Prefix::Node(NodeKind::Iterator)),
        CURRENT_PREFIX.value(Prefix::Node(NodeKind::Current)),
        MOVE_NEXT_PREFIX.value(Prefix::Node(NodeKind::MoveNext)),
        empty.value(Prefix::Node(NodeKind::Node)),
    ))
    .parse_next(input)
}

/// Parse `["global#"] <name> ":"`, leaving the value in `input`.
fn parse_name<'s>(input: &mut &'s str) -> ModalResult<(bool, &'s str)> {
    let is_global = opt(GLOBAL_PREFIX).parse_next(input)?.is_some();
    let name = terminated(take_till(0.., ':'), ':').parse_next(input)?;
    Ok((is_global, name))
}

fn parse_named<'s>(
    input: &mut &'s str,
    kind: IdKind,
    text: &str,
) -> Result<(bool, &'s str), DecodeError> {
    parse_name
        .parse_next(input)
        .map_err(|_| DecodeError::MissingSeparator {
            kind,
            text: text.to_string(),
        })
}
