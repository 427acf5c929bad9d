use std::borrow::Cow;

/// Error types specific to the search feature.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The bounding box parameter could not be parsed into a legal box.
    #[error("Wrong bounding box provided{}: {message}", format_context(.context))]
    InvalidBBox { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Attaches human-readable context to a `Result` of [`SearchError`].
pub trait SearchErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, SearchError>;
}

impl<T> SearchErrorExt<T> for Result<T, SearchError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|e| match e {
            SearchError::InvalidBBox { message, .. } => {
                SearchError::InvalidBBox { message, context: Some(context.into()) }
            },
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_rendered_in_parentheses() {
        let err: Result<(), SearchError> = Err(SearchError::InvalidBBox {
            message: "'north' is not a number".into(),
            context: None,
        });
        let err = err.context("bbox parameter '1,north,3,4'").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Wrong bounding box provided (bbox parameter '1,north,3,4'): 'north' is not a number"
        );
    }
}
