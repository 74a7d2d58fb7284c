use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Represents a single step within a [`Path`].
///
/// A segment either names an object key or an array index. Lookups treat the
/// two interchangeably when the textual forms agree, so `Key("1")` finds the
/// second array element and `Index(1)` finds the object key `"1"`. For the
/// same reason equality, ordering and hashing compare the canonical form, so
/// `Key("1") == Index(1)` while `Key("01")` stays a plain key.
///
/// ```
/// # use twindiff_core::diff::PathSegment;
/// let key = PathSegment::key("name");
/// let index = PathSegment::index(2);
/// assert!(matches!(key, PathSegment::Key(_)));
/// assert_eq!(index.as_index(), Some(2));
/// assert_eq!(PathSegment::key("2"), index);
/// ```
#[derive(Clone, Debug)]
pub enum PathSegment {
    /// Object key lookup.
    Key(String),
    /// Array index lookup.
    Index(usize),
}

impl PathSegment {
    /// Creates a key segment.
    #[must_use]
    pub fn key<S>(value: S) -> Self
    where
        S: Into<String>,
    {
        Self::Key(value.into())
    }

    /// Creates an index segment.
    #[must_use]
    pub fn index(value: usize) -> Self {
        Self::Index(value)
    }

    /// Returns the segment as an array index, parsing key segments that are
    /// plain decimal numbers.
    #[must_use]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Key(key) => parse_index(key),
        }
    }

    /// Returns the segment as an object key.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Self::Key(key) => key.clone(),
            Self::Index(index) => index.to_string(),
        }
    }
}

/// Canonical identity of a segment: decimal keys collapse onto indices.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Canonical<'a> {
    Index(usize),
    Key(&'a str),
}

impl PathSegment {
    fn canonical(&self) -> Canonical<'_> {
        match self {
            Self::Index(index) => Canonical::Index(*index),
            Self::Key(key) => match parse_index(key) {
                Some(index) => Canonical::Index(index),
                None => Canonical::Key(key),
            },
        }
    }
}

impl PartialEq for PathSegment {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for PathSegment {}

impl PartialOrd for PathSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathSegment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().cmp(&other.canonical())
    }
}

impl Hash for PathSegment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

pub(crate) fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if text.len() > 1 && text.starts_with('0') {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        Self::Key(value.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        Self::Key(value)
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl Serialize for PathSegment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Key(key) => serializer.serialize_str(key),
            Self::Index(index) => serializer.serialize_u64(*index as u64),
        }
    }
}

impl<'de> Deserialize<'de> for PathSegment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl<'de> serde::de::Visitor<'de> for Visitor {
            type Value = PathSegment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string key or non-negative integer index")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(PathSegment::Key(v.to_owned()))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(PathSegment::Key(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let value = usize::try_from(v).map_err(|_| E::custom("negative index"))?;
                Ok(PathSegment::Index(value))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let value = usize::try_from(v).map_err(|_| E::custom("index exceeds usize"))?;
                Ok(PathSegment::Index(value))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// Location of a node inside a document and, in parallel, inside its delta.
///
/// The empty path denotes the root. Paths display in dotted form (`a.0.b`,
/// root is the empty string), which is also the form used to key expanded
/// tree nodes.
///
/// ```
/// # use twindiff_core::diff::{Path, PathSegment};
/// let path = Path::new().with_segment(PathSegment::key("items"))
///     .with_segment(PathSegment::index(0));
/// assert_eq!(path.len(), 2);
/// assert_eq!(path.to_string(), "items.0");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// Creates an empty (root) path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a dotted path string. Decimal segments become indices.
    ///
    /// ```
    /// # use twindiff_core::diff::{Path, PathSegment};
    /// let path = Path::parse_dotted("users.3.name");
    /// assert_eq!(path.segments()[1], PathSegment::index(3));
    /// assert!(Path::parse_dotted("").is_empty());
    /// ```
    #[must_use]
    pub fn parse_dotted(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        Self(
            text.split('.')
                .map(|part| match parse_index(part) {
                    Some(index) => PathSegment::Index(index),
                    None => PathSegment::Key(part.to_owned()),
                })
                .collect(),
        )
    }

    /// Appends a new segment, returning the extended path.
    #[must_use]
    pub fn with_segment(mut self, segment: PathSegment) -> Self {
        self.0.push(segment);
        self
    }

    /// Returns a copy of this path extended by one segment.
    #[must_use]
    pub fn child<S>(&self, segment: S) -> Self
    where
        S: Into<PathSegment>,
    {
        self.clone().with_segment(segment.into())
    }

    /// Returns the underlying segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns the final segment, if any.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.last()
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether this is the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pushes a new segment in-place.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Pops the last segment off the path.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(value: Vec<PathSegment>) -> Self {
        Self(value)
    }
}

impl From<PathSegment> for Path {
    fn from(value: PathSegment) -> Self {
        Self(vec![value])
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Path {
    type Item = PathSegment;
    type IntoIter = std::vec::IntoIter<PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip_for_mixed_segments() {
        let path: Path = [PathSegment::key("foo"), PathSegment::index(3)].into_iter().collect();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "[\"foo\",3]");
        let decoded: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, path);
    }

    #[test]
    fn root_displays_as_empty_string() {
        assert_eq!(Path::new().to_string(), "");
    }

    #[test]
    fn dotted_parse_keeps_leading_zero_keys() {
        let path = Path::parse_dotted("a.01.2");
        assert_eq!(
            path.segments(),
            &[PathSegment::key("a"), PathSegment::key("01"), PathSegment::index(2)]
        );
        assert_eq!(path.to_string(), "a.01.2");
    }

    #[test]
    fn decimal_keys_and_indices_are_the_same_segment() {
        assert_eq!(PathSegment::key("1"), PathSegment::index(1));
        assert_ne!(PathSegment::key("01"), PathSegment::index(1));
        assert_eq!(
            Path::from(vec![PathSegment::key("m"), PathSegment::key("1")]),
            Path::parse_dotted("m.1")
        );
        let mut set = std::collections::BTreeSet::new();
        set.insert(Path::from(vec![PathSegment::key("1")]));
        assert!(set.contains(&Path::parse_dotted("1")));
        assert!(PathSegment::index(2) < PathSegment::key("10"));
    }

    #[test]
    fn key_segments_convert_to_indices() {
        assert_eq!(PathSegment::key("7").as_index(), Some(7));
        assert_eq!(PathSegment::key("_7").as_index(), None);
        assert_eq!(PathSegment::index(4).to_key(), "4");
    }
}
