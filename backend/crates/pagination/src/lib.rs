//! Page-number pagination primitives shared by backend feeds.
//!
//! Collections are windowed into fixed-size pages addressed by a 1-indexed
//! page number. Requests past the end clamp to the last page, and an empty
//! collection still exposes a single empty first page, so every request maps
//! onto exactly one window.
//!
//! ```
//! use pagination::{PageNumber, Paginator};
//!
//! let paginator = Paginator::new(10).expect("non-zero page size");
//! let window = paginator.window(PageNumber::new(2).expect("valid page"), 13);
//! assert_eq!(window.offset(), 10);
//! assert_eq!(window.expected_len(), 3);
//! ```

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Query string parameter carrying the requested page number.
pub const PAGE_QUERY_PARAM: &str = "page";

/// Errors raised while constructing pagination primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page numbers start at one.
    #[error("page number must be at least 1")]
    ZeroPage,
    /// The raw value is not a positive integer.
    #[error("page number must be a positive integer, got {value:?}")]
    InvalidPage {
        /// Raw input that failed to parse.
        value: String,
    },
    /// Pages must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PageNumber(NonZeroU32);

impl PageNumber {
    /// The first page.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Validate and construct a page number.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPage`] when `value` is zero.
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(PaginationError::ZeroPage)
    }

    /// Resolve a raw `page` query value, falling back to the first page when
    /// the value is absent or not a positive integer.
    ///
    /// ```
    /// use pagination::PageNumber;
    ///
    /// assert_eq!(PageNumber::from_query(Some("3")).get(), 3);
    /// assert_eq!(PageNumber::from_query(Some("abc")), PageNumber::FIRST);
    /// assert_eq!(PageNumber::from_query(None), PageNumber::FIRST);
    /// ```
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or(Self::FIRST)
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageNumber {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<u32>().map_err(|_| PaginationError::InvalidPage {
            value: s.to_owned(),
        })?;
        Self::new(value)
    }
}

/// Splits collections into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: NonZeroU32,
}

impl Paginator {
    /// Create a paginator producing pages of `per_page` items.
    ///
    /// # Errors
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub fn new(per_page: u32) -> Result<Self, PaginationError> {
        NonZeroU32::new(per_page)
            .map(|per_page| Self { per_page })
            .ok_or(PaginationError::ZeroPageSize)
    }

    /// Items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page.get()
    }

    /// Number of pages needed for `total` items. Never less than one.
    #[must_use]
    pub fn num_pages(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.per_page.get())).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Resolve the window for `requested`, clamping to the last page.
    #[must_use]
    pub fn window(&self, requested: PageNumber, total: u64) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = if requested.get() > num_pages {
            PageNumber::new(num_pages).unwrap_or(PageNumber::FIRST)
        } else {
            requested
        };
        let per_page = self.per_page.get();
        let offset = u64::from(number.get() - 1) * u64::from(per_page);
        PageWindow {
            number,
            num_pages,
            per_page,
            offset,
            total,
        }
    }
}

/// The slice of a collection covered by one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: PageNumber,
    num_pages: u32,
    per_page: u32,
    offset: u64,
    total: u64,
}

impl PageWindow {
    /// Page number after clamping.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum number of items to fetch.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.per_page
    }

    /// Size of the whole collection.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of items this window holds: `min(per_page, total - offset)`.
    #[must_use]
    pub fn expected_len(&self) -> u64 {
        self.total
            .saturating_sub(self.offset)
            .min(u64::from(self.per_page))
    }

    /// Wrap the fetched items into a [`Page`].
    #[must_use]
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        let number = self.number.get();
        let has_next = number < self.num_pages;
        let has_previous = number > 1;
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
            has_next,
            has_previous,
            next_page: has_next.then(|| number + 1),
            previous_page: has_previous.then(|| number - 1),
        }
    }
}

/// One page of items plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    number: PageNumber,
    num_pages: u32,
    per_page: u32,
    total: u64,
    has_next: bool,
    has_previous: bool,
    next_page: Option<u32>,
    previous_page: Option<u32>,
}

impl<T> Page<T> {
    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Current page number.
    #[must_use]
    pub const fn number(&self) -> PageNumber {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Size of the whole collection.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Transform every item while keeping the navigation metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            per_page: self.per_page,
            total: self.total,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page: self.next_page,
            previous_page: self.previous_page,
        }
    }

    /// Link to the next page, derived from `base`.
    #[must_use]
    pub fn next_link(&self, base: &Url) -> Option<Url> {
        self.next_page
            .and_then(|number| PageNumber::new(number).ok())
            .map(|number| page_link(base, number))
    }

    /// Link to the previous page, derived from `base`.
    #[must_use]
    pub fn previous_link(&self, base: &Url) -> Option<Url> {
        self.previous_page
            .and_then(|number| PageNumber::new(number).ok())
            .map(|number| page_link(base, number))
    }
}

/// Rewrite `base` so its `page` query parameter points at `number`.
///
/// Other query parameters are preserved in their original order.
///
/// ```
/// use pagination::{PageNumber, page_link};
/// use url::Url;
///
/// let base = Url::parse("http://localhost/group/cats/?page=1&sort=new").expect("url");
/// let next = page_link(&base, PageNumber::new(2).expect("page"));
/// assert_eq!(next.as_str(), "http://localhost/group/cats/?sort=new&page=2");
/// ```
#[must_use]
pub fn page_link(base: &Url, number: PageNumber) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_QUERY_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(PAGE_QUERY_PARAM, &number.to_string());
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn paginator() -> Paginator {
        Paginator::new(10).expect("valid page size")
    }

    fn page(value: u32) -> PageNumber {
        PageNumber::new(value).expect("valid page number")
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(13, 2)]
    #[case(20, 2)]
    #[case(21, 3)]
    fn num_pages_rounds_up_and_never_reaches_zero(#[case] total: u64, #[case] expected: u32) {
        assert_eq!(paginator().num_pages(total), expected);
    }

    #[rstest]
    #[case(1, 0, 10)]
    #[case(2, 10, 3)]
    fn thirteen_items_split_into_ten_and_three(
        #[case] number: u32,
        #[case] offset: u64,
        #[case] len: u64,
    ) {
        let window = paginator().window(page(number), 13);
        assert_eq!(window.offset(), offset);
        assert_eq!(window.expected_len(), len);
        assert_eq!(window.limit(), 10);
    }

    #[rstest]
    fn out_of_range_pages_clamp_to_the_last_page() {
        let window = paginator().window(page(7), 13);
        assert_eq!(window.number(), page(2));
        assert_eq!(window.offset(), 10);
    }

    #[rstest]
    fn empty_collections_expose_one_empty_page() {
        let window = paginator().window(page(3), 0);
        assert_eq!(window.number(), PageNumber::FIRST);
        assert_eq!(window.num_pages(), 1);
        assert_eq!(window.expected_len(), 0);

        let empty: Page<u8> = window.into_page(Vec::new());
        assert!(empty.is_empty());
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }

    #[rstest]
    #[case(Some("2"), 2)]
    #[case(Some(" 4 "), 4)]
    #[case(Some("0"), 1)]
    #[case(Some("-3"), 1)]
    #[case(Some("last"), 1)]
    #[case(Some(""), 1)]
    #[case(None, 1)]
    fn query_values_resolve_leniently(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(PageNumber::from_query(raw).get(), expected);
    }

    #[rstest]
    fn strict_parsing_reports_the_failure() {
        assert_eq!("0".parse::<PageNumber>(), Err(PaginationError::ZeroPage));
        assert_eq!(
            "x".parse::<PageNumber>(),
            Err(PaginationError::InvalidPage {
                value: "x".to_owned()
            })
        );
    }

    #[rstest]
    fn zero_page_size_is_rejected() {
        assert_eq!(Paginator::new(0), Err(PaginationError::ZeroPageSize));
    }

    #[rstest]
    fn middle_pages_link_both_ways() {
        let window = paginator().window(page(2), 25);
        let current = window.into_page(vec![1_u8; 10]);
        let base = Url::parse("http://localhost/?page=2").expect("url");

        assert_eq!(
            current.next_link(&base).map(String::from),
            Some("http://localhost/?page=3".to_owned())
        );
        assert_eq!(
            current.previous_link(&base).map(String::from),
            Some("http://localhost/?page=1".to_owned())
        );
    }

    #[rstest]
    fn pages_serialise_in_camel_case() {
        let current = paginator().window(page(1), 13).into_page(vec!["a"]);
        let value = serde_json::to_value(&current).expect("serialise page");

        assert_eq!(value["number"], 1);
        assert_eq!(value["numPages"], 2);
        assert_eq!(value["hasNext"], true);
        assert_eq!(value["nextPage"], 2);
        assert!(value["previousPage"].is_null());
    }

    #[rstest]
    fn map_preserves_navigation() {
        let current = paginator().window(page(2), 13).into_page(vec![1, 2, 3]);
        let mapped = current.map(|value| value * 10);

        assert_eq!(mapped.items(), &[10, 20, 30]);
        assert_eq!(mapped.number(), page(2));
        assert_eq!(mapped.total(), 13);
    }
}
