use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::PostListError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);

/// One rendering of a piece of text. `raw` is only sent to clients with
/// edit-level access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentObject {
    pub rendered: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ContentObject {
    pub fn rendered(text: impl Into<String>) -> Self {
        Self {
            rendered: text.into(),
            raw: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: ContentObject,
    pub content: ContentObject,
    pub excerpt: ContentObject,
    /// Kept exactly as the source sent it; see [`Post::published_at`].
    pub date: String,
}

impl Post {
    /// Parses `date` as a calendar timestamp. Offsets are normalized to UTC;
    /// offset-less values (the usual CMS site-local form) are taken as-is.
    pub fn published_at(&self) -> Result<NaiveDateTime, PostListError> {
        parse_post_date(&self.date).ok_or_else(|| PostListError::InvalidDate {
            id: self.id,
            date: self.date.clone(),
        })
    }
}

fn parse_post_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_utc());
    }
    raw.parse::<NaiveDateTime>().ok()
}

/// Checks the invariants a held post list is expected to satisfy: unique ids
/// and parseable dates. Reports the first violation in list order.
pub fn validate_post_list(posts: &[Post]) -> Result<(), PostListError> {
    let mut seen = std::collections::HashSet::with_capacity(posts.len());
    for post in posts {
        if !seen.insert(post.id) {
            return Err(PostListError::DuplicateId { id: post.id });
        }
        post.published_at()?;
    }
    Ok(())
}

/// Whether posts show their excerpt or their full content.
///
/// `Unset` is the state before the user has touched the toggle. It renders
/// like `Excerpt`, but stays distinguishable for callers that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum DisplayMode {
    #[default]
    Unset,
    Excerpt,
    Full,
}

impl DisplayMode {
    pub fn is_full(self) -> bool {
        self == DisplayMode::Full
    }

    /// The value a toggle should request next, treating `Unset` as falsy.
    pub fn toggled(self) -> bool {
        !self.is_full()
    }
}

impl From<bool> for DisplayMode {
    fn from(full: bool) -> Self {
        if full {
            DisplayMode::Full
        } else {
            DisplayMode::Excerpt
        }
    }
}

impl From<Option<bool>> for DisplayMode {
    fn from(value: Option<bool>) -> Self {
        value.map_or(DisplayMode::Unset, DisplayMode::from)
    }
}

impl From<DisplayMode> for Option<bool> {
    fn from(value: DisplayMode) -> Self {
        match value {
            DisplayMode::Unset => None,
            DisplayMode::Excerpt => Some(false),
            DisplayMode::Full => Some(true),
        }
    }
}
