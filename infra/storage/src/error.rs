use std::borrow::Cow;

/// A specialized [`StoreError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid record id{}: {message}", format_context(.context))]
    InvalidRecordId { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Extent serialization failed{}: {source}", format_context(.context))]
    Serialize { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Persisted extent row is corrupt{}: {source}", format_context(.context))]
    Corrupt { source: serde_json::Error, context: Option<Cow<'static, str>> },
}

/// Attaches human-readable context to a `Result`, converting foreign error
/// types into [`StoreError`] along the way.
pub trait StoreErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StoreError>;
}

impl<T> StoreErrorExt<T> for Result<T, StoreError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                StoreError::InvalidRecordId { context: c, .. }
                | StoreError::Io { context: c, .. }
                | StoreError::Serialize { context: c, .. }
                | StoreError::Corrupt { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> StoreErrorExt<T> for Result<T, std::io::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, StoreError> {
        self.map_err(|source| StoreError::Io { source, context: Some(context.into()) })
    }
}

impl From<std::io::Error> for StoreError {
    #[inline]
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, context: None }
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
