use super::Error;

/// Error when a field declaration names an attribute kind that has no
/// registered constructor.
///
/// Raised while the declaring model's schema is constructed. The model stays
/// unusable until the declaration or the registry is fixed.
#[derive(Debug)]
pub(super) struct UnknownAttributeKindError {
    model: Box<str>,
    kind: Box<str>,
}

impl std::error::Error for UnknownAttributeKindError {}

impl core::fmt::Display for UnknownAttributeKindError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unknown attribute kind `{}` (declared by `{}`)",
            self.kind, self.model
        )
    }
}

impl Error {
    /// Creates an unknown attribute kind error.
    pub fn unknown_attribute_kind(model: impl Into<String>, kind: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownAttributeKind(
            UnknownAttributeKindError {
                model: model.into().into(),
                kind: kind.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unknown attribute kind error.
    pub fn is_unknown_attribute_kind(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownAttributeKind(_))
    }
}
