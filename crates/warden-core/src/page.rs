//! Offset/limit pagination for store queries.

use serde::{Deserialize, Serialize};

/// Page request.
///
/// `first < 0` means "from the start" and `max_results <= 0` means
/// "unbounded". Both boundary policies are part of the query contract.
///
/// # Examples
///
/// ```
/// use warden_core::Page;
///
/// let items = vec![1, 2, 3, 4, 5];
/// assert_eq!(Page::new(1, 2).apply(items.clone()), vec![2, 3]);
/// assert_eq!(Page::new(-4, 0).apply(items.clone()), items);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    /// Index of the first result
    pub first: i32,

    /// Maximum number of results
    pub max_results: i32,
}

impl Page {
    /// Creates a page request.
    pub fn new(first: i32, max_results: i32) -> Self {
        Self { first, max_results }
    }

    /// Everything, from the start.
    pub fn all() -> Self {
        Self::new(0, 0)
    }

    /// Number of items to skip.
    pub fn offset(&self) -> usize {
        self.first.max(0) as usize
    }

    /// Maximum number of items to return, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        if self.max_results <= 0 {
            None
        } else {
            Some(self.max_results as usize)
        }
    }

    /// Apply this page to an ordered sequence.
    pub fn apply<I>(&self, items: I) -> Vec<I::Item>
    where
        I: IntoIterator,
    {
        let iter = items.into_iter().skip(self.offset());
        match self.limit() {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_first_starts_at_zero() {
        assert_eq!(Page::new(-1, 2).apply(0..5), vec![0, 1]);
    }

    #[test]
    fn test_non_positive_max_is_unbounded() {
        assert_eq!(Page::new(2, 0).apply(0..5), vec![2, 3, 4]);
        assert_eq!(Page::new(2, -7).apply(0..5), vec![2, 3, 4]);
    }

    #[test]
    fn test_first_past_end_is_empty() {
        assert!(Page::new(10, 3).apply(0..5).is_empty());
    }

    #[test]
    fn test_window() {
        assert_eq!(Page::new(1, 3).apply(0..10), vec![1, 2, 3]);
        assert_eq!(Page::new(0, 3).limit(), Some(3));
        assert_eq!(Page::all().limit(), None);
    }
}
