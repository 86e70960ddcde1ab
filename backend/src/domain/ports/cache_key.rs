//! Cache key type shared by page cache adapters.
use pagination::PageNumber;
use thiserror::Error;

/// Key under which a rendered page is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCacheKey(String);

impl PageCacheKey {
    /// Construct a key after checking it is non-empty and whitespace free.
    pub fn new(value: impl Into<String>) -> Result<Self, PageCacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(PageCacheKeyValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(PageCacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Key for one page of the global feed: `index:page:<n>`.
    pub fn index_page(page: PageNumber) -> Self {
        Self(format!("{}{page}", Self::INDEX_PREFIX))
    }

    /// Prefix shared by every global feed page key.
    pub const INDEX_PREFIX: &'static str = "index:page:";

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for PageCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for PageCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`PageCacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageCacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("page cache key must not be empty")]
    Empty,
    /// Key contains whitespace.
    #[error("page cache key must not contain whitespace")]
    ContainsWhitespace,
}
