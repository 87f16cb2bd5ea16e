//! Path evaluation against a document graph
//!
//! A path is a chain of steps. A `.` step descends into an embedded document
//! or a linked record, a `[...]` step indexes the value named before it (or
//! the result of the previous bracket when no name is given). Anything that
//! cannot be descended into ends the walk with null.

use crate::cursor::{PathCursor, Separator};
use crate::loader::{NoLoader, RecordLoader};
use docrec_codec::TextCodec;
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{Document, Value};
use std::borrow::Cow;

static NO_LOADER: NoLoader = NoLoader;

/// Computed attributes available on every document
pub const ATTRIBUTE_THIS: &str = "@this";
pub const ATTRIBUTE_RID: &str = "@rid";
pub const ATTRIBUTE_VERSION: &str = "@version";
pub const ATTRIBUTE_CLASS: &str = "@class";
pub const ATTRIBUTE_TYPE: &str = "@type";
pub const ATTRIBUTE_SIZE: &str = "@size";
pub const ATTRIBUTE_FIELDS: &str = "@fields";

const RECORD_TYPE: &str = "document";

/// Evaluates path expressions
///
/// Holds the loader used for links and unloaded documents and the codec used
/// for `@size` and filter conversions.
#[derive(Clone)]
pub struct PathResolver<'l, 's> {
    loader: &'l dyn RecordLoader,
    codec: TextCodec<'s>,
}

impl Default for PathResolver<'static, 'static> {
    fn default() -> Self {
        Self {
            loader: &NO_LOADER,
            codec: TextCodec::default(),
        }
    }
}

impl<'l> PathResolver<'l, 'static> {
    pub fn new(loader: &'l dyn RecordLoader) -> Self {
        Self {
            loader,
            codec: TextCodec::default(),
        }
    }
}

impl<'l, 's> PathResolver<'l, 's> {
    pub fn with_codec<'t>(self, codec: TextCodec<'t>) -> PathResolver<'l, 't> {
        PathResolver {
            loader: self.loader,
            codec,
        }
    }

    pub fn codec(&self) -> &TextCodec<'s> {
        &self.codec
    }

    /// Resolve `path` starting at `document`
    ///
    /// Missing fields and null intermediates yield null; malformed paths,
    /// bad indexes, unknown attributes and failed loads are errors.
    pub fn resolve(&self, document: &Document, path: &str) -> Result<Value> {
        let mut current: Cow<'_, Document> = Cow::Borrowed(document);
        let mut accumulator: Option<Value> = None;

        for step in PathCursor::new(path) {
            let step = step?;
            let named = if step.name.is_empty() {
                accumulator.take()
            } else {
                Some(self.lookup(&current, step.name)?)
            };

            match step.separator {
                Separator::Dot => match named.map(|value| self.descend(value)).transpose()? {
                    Some(Some(next)) => current = Cow::Owned(next),
                    _ => return Ok(Value::Null),
                },
                Separator::Bracket { content, span } => match named {
                    Some(base) if !base.is_null() => {
                        accumulator = Some(self.index(base, content, path, span)?);
                    }
                    _ => return Ok(Value::Null),
                },
                Separator::End => return Ok(named.unwrap_or_default()),
            }
        }
        Ok(accumulator.unwrap_or_default())
    }

    /// Value of a field or computed attribute
    fn lookup(&self, document: &Document, name: &str) -> Result<Value> {
        if name.starts_with('@') {
            return self.attribute(document, name);
        }
        Ok(document.field(name).cloned().unwrap_or_default())
    }

    fn attribute(&self, document: &Document, name: &str) -> Result<Value> {
        let is = |attribute: &str| name.eq_ignore_ascii_case(attribute);

        if is(ATTRIBUTE_THIS) {
            Ok(Value::embedded(document.clone()))
        } else if is(ATTRIBUTE_RID) {
            Ok(Value::Link(document.identity()))
        } else if is(ATTRIBUTE_VERSION) {
            Ok(Value::Integer(document.version()))
        } else if is(ATTRIBUTE_CLASS) {
            Ok(document.class_name().map(Value::string).unwrap_or_default())
        } else if is(ATTRIBUTE_TYPE) {
            Ok(Value::string(RECORD_TYPE))
        } else if is(ATTRIBUTE_SIZE) {
            let size = self.codec.encode_document(document)?.len();
            Ok(Value::Integer(i32::try_from(size).unwrap_or(i32::MAX)))
        } else if is(ATTRIBUTE_FIELDS) {
            Ok(Value::list(document.field_names().map(Value::string)))
        } else {
            Err(RecordError::unknown_attribute(name))
        }
    }

    /// The document a `.` step moves into, if the value is one
    fn descend(&self, value: Value) -> Result<Option<Document>> {
        match value {
            Value::Embedded(document) if document.is_loaded() => Ok(Some(*document)),
            Value::Embedded(document) => {
                log::debug!("loading lazy document {}", document.identity());
                self.loader.load(&document.identity()).map(Some)
            }
            Value::Link(rid) => {
                log::debug!("following link {rid}");
                self.loader.load(&rid).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// Resolve a path without a record loader
///
/// Links and unloaded documents fail with [`RecordError::RecordNotFound`].
pub fn resolve(document: &Document, path: &str) -> Result<Value> {
    PathResolver::default().resolve(document, path)
}
