//! Path patterns and the segment matcher.
//!
//! A pattern is parsed once, at registration, into a sequence of [`Segment`]s.
//! Matching a concrete path is then a single pass over the `/`-separated
//! segments of both sides, with no re-parsing of the pattern text.
//!
//! ## Syntax
//!
//! | Segment      | Meaning                                                     |
//! |--------------|-------------------------------------------------------------|
//! | `users`      | literal, compared verbatim (case-sensitive)                 |
//! | `{id}`       | named wildcard, one non-empty path segment captured as `id` |
//! | `:`          | catch-all, every remaining segment joined by `/`            |
//!
//! The catch-all is captured under [`CATCH_ALL_KEY`] and must be the final
//! segment of the pattern.
//!
//! ```rust
//! use routegate::router::PathPattern;
//!
//! let pattern = PathPattern::parse("/files/{owner}/:").unwrap();
//! let params = pattern.match_path("/files/alice/docs/2024/report.txt").unwrap();
//! assert_eq!(params.get("owner"), Some("alice"));
//! assert_eq!(params.catch_all(), Some("docs/2024/report.txt"));
//! ```

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use thiserror::Error;

use super::params::RouteParams;

/// Pattern segment that marks the catch-all position.
pub const CATCH_ALL_MARKER: &str = ":";

/// Reserved route parameter key holding the catch-all capture.
///
/// The braces keep it apart from any `{name}` wildcard name, since a
/// wildcard name cannot itself contain braces.
pub const CATCH_ALL_KEY: &str = "{catchAll}";

/// Most patterns have a handful of segments; keep them inline.
const MAX_INLINE_SEGMENTS: usize = 8;

/// One parsed segment of a [`PathPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matched verbatim.
    Literal(Arc<str>),
    /// Matches exactly one non-empty path segment, captured under the name.
    Wildcard(Arc<str>),
    /// Matches all remaining path segments.
    CatchAll,
}

/// Reasons a pattern string is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// `{}` has no name to capture under.
    #[error("wildcard segment {position} of `{pattern}` has an empty name")]
    EmptyWildcard { pattern: String, position: usize },
    /// `{id`, `id}`, `{a{b}` and similar.
    #[error("segment `{segment}` of `{pattern}` has unbalanced braces")]
    UnbalancedBraces { pattern: String, segment: String },
    /// `:` somewhere other than the last segment.
    #[error("catch-all marker at segment {position} of `{pattern}` is not the final segment")]
    CatchAllNotLast { pattern: String, position: usize },
}

/// A compiled path pattern.
///
/// Immutable once built; shared between method buckets through the owning
/// route's `Arc`.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: Arc<str>,
    segments: SmallVec<[Segment; MAX_INLINE_SEGMENTS]>,
    /// Set when the source text was malformed. Such a pattern never matches.
    rejected: Option<PatternError>,
}

impl PathPattern {
    /// Parse a pattern string into segments.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for an empty wildcard name, unbalanced
    /// braces, or a catch-all marker that is not the final segment.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let parts: Vec<&str> = raw.split('/').collect();
        let last = parts.len() - 1;
        let mut segments = SmallVec::with_capacity(parts.len());

        for (position, part) in parts.iter().copied().enumerate() {
            segments.push(Self::parse_segment(raw, position, last, part)?);
        }

        Ok(Self {
            raw: Arc::from(raw),
            segments,
            rejected: None,
        })
    }

    /// Parse a pattern, keeping malformed input as a pattern that never
    /// matches instead of failing.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(pattern) => pattern,
            Err(err) => Self {
                raw: Arc::from(raw),
                segments: SmallVec::new(),
                rejected: Some(err),
            },
        }
    }

    fn parse_segment(
        raw: &str,
        position: usize,
        last: usize,
        part: &str,
    ) -> Result<Segment, PatternError> {
        if part == CATCH_ALL_MARKER {
            if position != last {
                return Err(PatternError::CatchAllNotLast {
                    pattern: raw.to_string(),
                    position,
                });
            }
            return Ok(Segment::CatchAll);
        }

        let opens = part.starts_with('{');
        let closes = part.ends_with('}');
        if opens && closes && part.len() >= 2 {
            let name = &part[1..part.len() - 1];
            if name.is_empty() {
                return Err(PatternError::EmptyWildcard {
                    pattern: raw.to_string(),
                    position,
                });
            }
            if name.contains(['{', '}']) {
                return Err(PatternError::UnbalancedBraces {
                    pattern: raw.to_string(),
                    segment: part.to_string(),
                });
            }
            return Ok(Segment::Wildcard(Arc::from(name)));
        }

        if opens || closes {
            return Err(PatternError::UnbalancedBraces {
                pattern: raw.to_string(),
                segment: part.to_string(),
            });
        }

        Ok(Segment::Literal(Arc::from(part)))
    }

    /// The pattern text as registered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Shared handle on the pattern text, for logging and request contexts.
    #[must_use]
    pub fn raw(&self) -> Arc<str> {
        Arc::clone(&self.raw)
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the final segment is the catch-all marker.
    #[must_use]
    pub fn has_catch_all(&self) -> bool {
        matches!(self.segments.last(), Some(Segment::CatchAll))
    }

    /// The parse error, if this pattern was built from malformed text.
    #[must_use]
    pub fn rejection(&self) -> Option<&PatternError> {
        self.rejected.as_ref()
    }

    /// Match a concrete path against this pattern.
    ///
    /// Returns the captured parameters on a match. Wildcards never match an
    /// empty segment; without a catch-all the segment counts must be equal.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteParams> {
        if self.rejected.is_some() {
            return None;
        }

        let mut params = RouteParams::new();
        let mut path_segments = path.split('/');

        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::CatchAll => {
                    let rest = Self::remainder(path, position);
                    params.insert(Arc::from(CATCH_ALL_KEY), rest.to_string());
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    if path_segments.next()? != literal.as_ref() {
                        return None;
                    }
                }
                Segment::Wildcard(name) => {
                    let value = path_segments.next()?;
                    if value.is_empty() {
                        return None;
                    }
                    params.insert(Arc::clone(name), value.to_string());
                }
            }
        }

        // Without a catch-all every path segment must have been consumed.
        if path_segments.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// The slice of `path` starting at segment index `position`, or the empty
    /// string when the path has exactly `position` segments.
    fn remainder(path: &str, position: usize) -> &str {
        let mut offset = 0;
        for _ in 0..position {
            match path[offset..].find('/') {
                Some(idx) => offset += idx + 1,
                None => return "",
            }
        }
        &path[offset..]
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Match `pattern` against `path` without registering anything.
///
/// Malformed patterns never match.
#[must_use]
pub fn match_path(pattern: &str, path: &str) -> Option<RouteParams> {
    PathPattern::parse_lenient(pattern).match_path(path)
}
