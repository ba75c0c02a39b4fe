//! Mirror URLs and ordered lists of them.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::slice;
use std::vec;

/// The scheme prepended to every canonical host.
const SCHEME: &str = "https://";

//------------ MirrorUrl -----------------------------------------------------

/// The base URL of a single mirror.
///
/// Normally created from the canonical host name of a mirror, in which
/// case it is that name prefixed with `https://`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct MirrorUrl(String);

impl MirrorUrl {
    /// Creates the URL for the given canonical host name.
    pub fn from_host(host: &str) -> Self {
        MirrorUrl(format!("{}{}", SCHEME, host))
    }

    /// Wraps a complete URL as is.
    pub fn from_url(url: impl Into<String>) -> Self {
        MirrorUrl(url.into())
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the host part of the URL.
    ///
    /// For URLs not created from a host, this is everything after the
    /// scheme separator up to the first slash.
    pub fn host(&self) -> &str {
        let rest = self.0.strip_prefix(SCHEME).unwrap_or_else(|| {
            self.0
                .split_once("://")
                .map_or(self.0.as_str(), |(_, rest)| rest)
        });
        rest.split('/').next().unwrap_or(rest)
    }

    /// Converts the URL into a string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for MirrorUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for MirrorUrl {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MirrorUrl {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for MirrorUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//------------ MirrorList ----------------------------------------------------

/// An ordered set of mirror URLs.
///
/// URLs keep the order in which they were first added. Adding a URL that
/// is already present does nothing, so the position of a mirror is that of
/// its first appearance.
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<MirrorUrl>", into = "Vec<MirrorUrl>")
)]
pub struct MirrorList {
    /// The URLs in order of first appearance.
    urls: Vec<MirrorUrl>,

    /// The URLs already present, for membership checks.
    seen: HashSet<MirrorUrl>,
}

impl MirrorList {
    /// Creates a new, empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a list holding a single URL.
    pub fn single(url: MirrorUrl) -> Self {
        let mut res = Self::new();
        res.push(url);
        res
    }

    /// Appends a URL unless it is already part of the list.
    ///
    /// Returns whether the URL was added.
    pub fn push(&mut self, url: MirrorUrl) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    /// Appends the URL for a canonical host unless already present.
    pub fn push_host(&mut self, host: &str) -> bool {
        self.push(MirrorUrl::from_host(host))
    }

    /// Returns the number of mirrors.
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns whether the list contains the given URL.
    pub fn contains(&self, url: &MirrorUrl) -> bool {
        self.seen.contains(url)
    }

    /// Returns the first mirror.
    pub fn first(&self) -> Option<&MirrorUrl> {
        self.urls.first()
    }

    /// Returns an iterator over the mirrors in order.
    pub fn iter(&self) -> slice::Iter<'_, MirrorUrl> {
        self.urls.iter()
    }

    /// Returns the mirrors as a slice.
    pub fn as_slice(&self) -> &[MirrorUrl] {
        &self.urls
    }

    /// Picks a mirror at random.
    ///
    /// Spreading requests over all mirrors this way is what callers are
    /// expected to do.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<&MirrorUrl> {
        self.urls.choose(rng)
    }

    /// Converts the list into a vector of URLs.
    pub fn into_vec(self) -> Vec<MirrorUrl> {
        self.urls
    }
}

impl PartialEq for MirrorList {
    fn eq(&self, other: &Self) -> bool {
        self.urls == other.urls
    }
}

impl Eq for MirrorList {}

impl<S: AsRef<str>> PartialEq<[S]> for MirrorList {
    fn eq(&self, other: &[S]) -> bool {
        self.urls.len() == other.len()
            && self
                .urls
                .iter()
                .zip(other)
                .all(|(url, other)| url.as_str() == other.as_ref())
    }
}

impl<S: AsRef<str>, const N: usize> PartialEq<[S; N]> for MirrorList {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

impl From<Vec<MirrorUrl>> for MirrorList {
    fn from(urls: Vec<MirrorUrl>) -> Self {
        urls.into_iter().collect()
    }
}

impl From<MirrorList> for Vec<MirrorUrl> {
    fn from(list: MirrorList) -> Self {
        list.into_vec()
    }
}

impl FromIterator<MirrorUrl> for MirrorList {
    fn from_iter<I: IntoIterator<Item = MirrorUrl>>(iter: I) -> Self {
        let mut res = Self::new();
        res.extend(iter);
        res
    }
}

impl Extend<MirrorUrl> for MirrorList {
    fn extend<I: IntoIterator<Item = MirrorUrl>>(&mut self, iter: I) {
        for url in iter {
            self.push(url);
        }
    }
}

impl IntoIterator for MirrorList {
    type Item = MirrorUrl;
    type IntoIter = vec::IntoIter<MirrorUrl>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

impl<'a> IntoIterator for &'a MirrorList {
    type Item = &'a MirrorUrl;
    type IntoIter = slice::Iter<'a, MirrorUrl>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn first_appearance_wins() {
        let mut list = MirrorList::new();
        assert!(list.push_host("h1"));
        assert!(list.push_host("h2"));
        assert!(!list.push_host("h1"));
        assert_eq!(list, ["https://h1", "https://h2"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn from_iter_dedups() {
        let list: MirrorList = ["b", "a", "b", "c", "a"]
            .into_iter()
            .map(MirrorUrl::from_host)
            .collect();
        assert_eq!(list, ["https://b", "https://a", "https://c"]);
        assert!(list.contains(&MirrorUrl::from_host("c")));
    }

    #[test]
    fn url_host() {
        let url = MirrorUrl::from_host("de1.example");
        assert_eq!(url.host(), "de1.example");
        assert_eq!(
            MirrorUrl::from_url("http://nl1.example/json").host(),
            "nl1.example"
        );
    }

    #[test]
    fn choose_picks_a_member() {
        let list: MirrorList = ["x", "y", "z"]
            .into_iter()
            .map(MirrorUrl::from_host)
            .collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let url = list.choose(&mut rng).unwrap();
            assert!(list.contains(url));
        }
        assert!(MirrorList::new().choose(&mut rng).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_plain_array() {
        let list = MirrorList::single(MirrorUrl::from_host("a.example"));
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["https://a.example"]"#);
        let back: MirrorList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
