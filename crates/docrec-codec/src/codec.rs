//! The codec handle shared by encoding and decoding

use crate::schema::{NoSchema, SchemaLookup};
use docrec_diagnostics::{RecordError, Result};
use docrec_types::{DateFormats, TypeCoercer, TypeTag, Value};
use std::borrow::Cow;
use std::fmt;

static NO_SCHEMA: NoSchema = NoSchema;

/// Type-tagged textual codec
///
/// Holds the coercer used to reconcile values with declared types and the
/// schema consulted for record fields. Cheap to clone; the schema is borrowed.
#[derive(Clone)]
pub struct TextCodec<'s> {
    pub(crate) coercer: TypeCoercer,
    pub(crate) schema: &'s dyn SchemaLookup,
}

impl Default for TextCodec<'static> {
    fn default() -> Self {
        Self {
            coercer: TypeCoercer::default(),
            schema: &NO_SCHEMA,
        }
    }
}

impl fmt::Debug for TextCodec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCodec")
            .field("coercer", &self.coercer)
            .finish_non_exhaustive()
    }
}

impl<'s> TextCodec<'s> {
    pub fn new(coercer: TypeCoercer, schema: &'s dyn SchemaLookup) -> Self {
        Self { coercer, schema }
    }

    /// Same coercer, different schema
    pub fn with_schema<'t>(self, schema: &'t dyn SchemaLookup) -> TextCodec<'t> {
        TextCodec {
            coercer: self.coercer,
            schema,
        }
    }

    pub fn with_date_formats(mut self, formats: DateFormats) -> Self {
        self.coercer = TypeCoercer::new(formats);
        self
    }

    pub fn coercer(&self) -> &TypeCoercer {
        &self.coercer
    }

    pub fn schema(&self) -> &'s dyn SchemaLookup {
        self.schema
    }

    /// Borrow `value` if it already has kind `tag`, otherwise coerce a copy
    ///
    /// Failure means the value has no textual form under `tag`.
    pub(crate) fn conform<'v>(&self, value: &'v Value, tag: TypeTag) -> Result<Cow<'v, Value>> {
        if value.kind_of() == Some(tag) {
            return Ok(Cow::Borrowed(value));
        }
        self.coercer
            .coerce(value.clone(), tag)
            .map(Cow::Owned)
            .map_err(|err| {
                log::debug!("cannot encode {} as {tag}: {err}", value.kind_name());
                RecordError::unsupported_type(tag, value.kind_name())
            })
    }
}
