//! Error types that can occur during multimap operation.

/// An error that can occur in multimap operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MultiMapError {
    /// Input could not be normalized into key and value pairs.
    InvalidArgument,
    /// Lookup or deletion of a key that is not present.
    KeyNotFound,
    /// Operation is intentionally not provided by multimap.
    NotSupported(Unsupported),
}

/// Operations that a mutable multimap refuses to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unsupported {
    /// `pop`, which value of a duplicated key to pop is ambiguous.
    Pop,
    /// `popitem`, there is no meaningful "arbitrary" item in an ordered multimap.
    PopItem,
    /// `update`, single value per key semantic is ambiguous, use `extend` instead.
    Update,
}

impl MultiMapError {
    pub(crate) const fn message(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "expected a mapping or a sequence of key and value pairs",
            Self::KeyNotFound => "key not found",
            Self::NotSupported(Unsupported::Pop) => "pop is not supported",
            Self::NotSupported(Unsupported::PopItem) => "popitem is not supported",
            Self::NotSupported(Unsupported::Update) => "update is not supported, use extend instead",
        }
    }

    /// Returns `true` if the error is [`KeyNotFound`].
    ///
    /// [`KeyNotFound`]: MultiMapError::KeyNotFound
    #[inline]
    pub const fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound)
    }
}

impl std::error::Error for MultiMapError {}
impl std::fmt::Display for MultiMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
