use std::collections::BTreeMap;
use std::sync::Arc;

use smallvec::SmallVec;

use super::pattern::CATCH_ALL_KEY;

/// Maximum number of path parameters before heap allocation.
/// Most routes have ≤4 captures (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch path.
///
/// Param names use `Arc<str>` because they come from the compiled pattern
/// (known at registration), so cloning them is an atomic increment. Values
/// are per-request data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Parameters captured by a successful path match.
///
/// Built fresh for each match and owned by the dispatch that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    inner: ParamVec,
}

impl RouteParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: Arc<str>, value: String) {
        self.inner.push((name, value));
    }

    /// Get a parameter by name.
    ///
    /// Uses "last write wins" semantics: if a name repeats at different
    /// depths (e.g. `/org/{id}/user/{id}`), returns the last occurrence.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// The catch-all capture, if the matched pattern ended in one.
    #[inline]
    #[must_use]
    pub fn catch_all(&self) -> Option<&str> {
        self.get(CATCH_ALL_KEY)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Name-sorted view with the same last-write-wins rule as [`get`](Self::get).
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&str, &str> {
        self.iter().collect()
    }
}
