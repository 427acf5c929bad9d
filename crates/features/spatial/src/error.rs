use geocat_storage::StoreError;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Field name used when surfacing declaration errors to the record store.
const SPATIAL_FIELD: &str = "spatial";

/// Error types specific to the spatial feature.
///
/// The first three variants are recoverable validation outcomes the record
/// store renders as field-level messages; [`SpatialError::Store`] is the
/// diagnostics-mode passthrough of the raw storage failure.
#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    /// The declaration was not decodable as JSON at all.
    #[error("Error decoding JSON object{}: {message}", format_context(.context))]
    MalformedPayload { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Decodable, but not a legal shape.
    #[error("Error creating geometry{}: {message}", format_context(.context))]
    InvalidGeometry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The store rejected the write; summarized for field-level surfacing.
    #[error("Error persisting extent{}: {message}", format_context(.context))]
    PersistFailed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Raw storage failure, propagated unwrapped in diagnostics mode.
    #[error("{source}")]
    Store { source: StoreError },
}

impl SpatialError {
    /// The structured, field-keyed form of this error: a mapping from field
    /// name to message list, suitable for the record store's validation
    /// summary.
    #[must_use]
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        BTreeMap::from([(SPATIAL_FIELD.to_owned(), vec![self.to_string()])])
    }
}

/// Attaches human-readable context to a `Result` of [`SpatialError`].
pub trait SpatialErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SpatialError>;
}

impl<T> SpatialErrorExt<T> for Result<T, SpatialError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                SpatialError::MalformedPayload { context: c, .. }
                | SpatialError::InvalidGeometry { context: c, .. }
                | SpatialError::PersistFailed { context: c, .. } => *c = Some(context.into()),
                SpatialError::Store { .. } => {},
            }
            e
        })
    }
}

/// Produces the human-readable error summary for a field-keyed error map:
/// field names are prettified and each carries its first message, matching
/// what the catalog UI shows next to the form field.
#[must_use]
pub fn error_summary(field_errors: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, String> {
    field_errors
        .iter()
        .filter_map(|(field, messages)| {
            messages.first().map(|msg| (prettify(field), msg.clone()))
        })
        .collect()
}

/// `source_url` becomes `Source URL`, `spatial` becomes `Spatial`.
fn prettify(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut words: Vec<String> = spaced
        .split_whitespace()
        .map(|w| if w.eq_ignore_ascii_case("url") { "URL".to_owned() } else { w.to_owned() })
        .collect();

    if let Some(first) = words.first_mut() {
        let mut chars = first.chars();
        if let Some(head) = chars.next() {
            *first = head.to_uppercase().chain(chars).collect();
        }
    }

    words.join(" ")
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
