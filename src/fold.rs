use bytes::Bytes;
use std::{borrow::Cow, hash::Hash, str::Utf8Error};

/// Case-insensitive string.
///
/// A [`Bytes`] backed string that is always stored in its folded form, which is the Unicode upper
/// case of the input. Equality, ordering and hashing operate on the folded form, so two
/// [`CiStr`] compare equal when their inputs only differ in case.
///
/// ```rust
/// use multidict::CiStr;
///
/// let key = CiStr::new("Content-Type");
/// assert_eq!(key.as_str(), "CONTENT-TYPE");
/// assert_eq!(key, CiStr::new("content-type"));
/// assert!(key == *"cOnTeNt-TyPe");
/// ```
#[derive(Clone)]
pub struct CiStr {
    /// is valid UTF-8 and already folded
    bytes: Bytes,
}

impl CiStr {
    /// Create [`CiStr`] by folding given str.
    #[inline]
    pub fn new(string: &str) -> Self {
        Self {
            bytes: Bytes::from(string.to_uppercase()),
        }
    }

    /// Create [`CiStr`] from static str.
    ///
    /// This function does not allocate or fold.
    ///
    /// # Panics
    ///
    /// Panics if the input is not ASCII or contains ASCII lowercase characters.
    pub const fn from_static(string: &'static str) -> Self {
        let bytes = string.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if !bytes[i].is_ascii() || bytes[i].is_ascii_lowercase() {
                panic!("static case-insensitive str must be ASCII uppercase");
            }
            i += 1;
        }
        Self {
            bytes: Bytes::from_static(bytes),
        }
    }

    /// Create [`CiStr`] from bytes, rejecting invalid UTF-8.
    ///
    /// Already folded input is not copied.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not valid UTF-8.
    pub fn from_utf8<B: Into<Bytes>>(bytes: B) -> Result<Self, Utf8Error> {
        let bytes = bytes.into();
        let string = std::str::from_utf8(&bytes)?;
        if is_folded(string) {
            return Ok(Self { bytes });
        }
        Ok(Self::new(string))
    }

    /// Create [`CiStr`] from bytes, replacing invalid UTF-8 sequence with
    /// [`U+FFFD REPLACEMENT CHARACTER`][std::char::REPLACEMENT_CHARACTER].
    pub fn from_utf8_lossy(bytes: &[u8]) -> Self {
        match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(string) => Self::new(string),
            Cow::Owned(string) => Self::from(string),
        }
    }

    /// Create [`CiStr`] from the [`Display`][std::fmt::Display] output of any value.
    #[inline]
    pub fn from_display<T: std::fmt::Display + ?Sized>(value: &T) -> Self {
        Self::from(value.to_string())
    }

    /// Extracts a string slice of the folded str.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: `bytes` is always valid UTF-8
        unsafe { std::str::from_utf8_unchecked(&self.bytes) }
    }

    /// Returns `true`, [`CiStr`] is always in upper case.
    #[inline]
    pub const fn is_uppercase(&self) -> bool {
        true
    }

    /// Returns the upper case of this str, which is itself.
    #[inline]
    pub fn to_uppercase(&self) -> Self {
        self.clone()
    }

    /// Consume [`CiStr`] into [`Bytes`].
    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Checks that given raw str folds into this str, without allocating.
    pub fn eq_folded(&self, raw: &str) -> bool {
        raw.chars().flat_map(char::to_uppercase).eq(self.as_str().chars())
    }
}

fn is_folded(string: &str) -> bool {
    string.chars().all(|c| {
        let mut upper = c.to_uppercase();
        upper.next() == Some(c) && upper.next().is_none()
    })
}

// ===== Traits =====

impl From<&str> for CiStr {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&String> for CiStr {
    #[inline]
    fn from(value: &String) -> Self {
        Self::new(value)
    }
}

impl From<String> for CiStr {
    fn from(value: String) -> Self {
        if is_folded(&value) {
            Self {
                bytes: Bytes::from(value),
            }
        } else {
            Self::new(&value)
        }
    }
}

impl From<CiStr> for String {
    #[inline]
    fn from(value: CiStr) -> Self {
        value.as_str().to_owned()
    }
}

impl std::ops::Deref for CiStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for CiStr {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for CiStr {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.as_str(), f)
    }
}

impl std::fmt::Debug for CiStr {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for CiStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // both side is folded
        self.as_str() == other.as_str()
    }
}

impl Eq for CiStr { }

impl PartialEq<str> for CiStr {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.eq_folded(other)
    }
}

impl PartialEq<&str> for CiStr {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.eq_folded(other)
    }
}

impl PartialEq<String> for CiStr {
    #[inline]
    fn eq(&self, other: &String) -> bool {
        self.eq_folded(other)
    }
}

impl PartialOrd for CiStr {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CiStr {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for CiStr {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

// ===== Ref Traits =====

/// A type that can be used to look up a case-insensitive map.
///
/// The key is folded before it is compared against stored keys. [`CiStr`] is already folded
/// and used as is.
#[allow(private_bounds)]
pub trait AsFoldedKey: SealedRef { }
trait SealedRef {
    fn as_folded(&self) -> Cow<'_, CiStr>;
}

impl AsFoldedKey for str { }
impl SealedRef for str {
    #[inline]
    fn as_folded(&self) -> Cow<'_, CiStr> {
        Cow::Owned(CiStr::new(self))
    }
}

impl AsFoldedKey for String { }
impl SealedRef for String {
    #[inline]
    fn as_folded(&self) -> Cow<'_, CiStr> {
        Cow::Owned(CiStr::new(self))
    }
}

impl AsFoldedKey for CiStr { }
impl SealedRef for CiStr {
    #[inline]
    fn as_folded(&self) -> Cow<'_, CiStr> {
        Cow::Borrowed(self)
    }
}

// blanket implementation
impl<K: AsFoldedKey + ?Sized> AsFoldedKey for &K { }
impl<S: SealedRef + ?Sized> SealedRef for &S {
    #[inline]
    fn as_folded(&self) -> Cow<'_, CiStr> {
        S::as_folded(self)
    }
}

pub(crate) fn fold<K: AsFoldedKey + ?Sized>(key: &K) -> Cow<'_, CiStr> {
    key.as_folded()
}

// ===== Owned Traits =====

/// A type that can be used as a key in case-insensitive map mutation.
#[allow(private_bounds)]
pub trait IntoFoldedKey: Sealed { }
trait Sealed: Sized {
    fn into_folded(self) -> CiStr;
}

impl IntoFoldedKey for &str { }
impl Sealed for &str {
    #[inline]
    fn into_folded(self) -> CiStr {
        CiStr::new(self)
    }
}

impl IntoFoldedKey for &String { }
impl Sealed for &String {
    #[inline]
    fn into_folded(self) -> CiStr {
        CiStr::new(self)
    }
}

impl IntoFoldedKey for String { }
impl Sealed for String {
    #[inline]
    fn into_folded(self) -> CiStr {
        CiStr::from(self)
    }
}

impl IntoFoldedKey for CiStr { }
impl Sealed for CiStr {
    #[inline]
    fn into_folded(self) -> CiStr {
        self
    }
}

impl IntoFoldedKey for &CiStr { }
impl Sealed for &CiStr {
    #[inline]
    fn into_folded(self) -> CiStr {
        self.clone()
    }
}

pub(crate) fn into_folded<K: IntoFoldedKey>(key: K) -> CiStr {
    key.into_folded()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn folds_on_construction() {
        assert_eq!(CiStr::new("Content-Type").as_str(), "CONTENT-TYPE");
        assert_eq!(CiStr::from(String::from("host")).as_str(), "HOST");
        assert_eq!(CiStr::new("straße").as_str(), "STRASSE");
        assert_eq!(CiStr::from_display(&42).as_str(), "42");
        assert_eq!(CiStr::from_display("mixed Case").as_str(), "MIXED CASE");
        assert!(CiStr::new("abc").is_uppercase());
        assert_eq!(CiStr::new("abc").to_uppercase(), CiStr::from_static("ABC"));
    }

    #[test]
    fn from_bytes_policy() {
        let key = CiStr::from_utf8(&b"accept"[..]).unwrap();
        assert_eq!(key.as_str(), "ACCEPT");

        let folded = Bytes::from_static(b"ACCEPT");
        let key = CiStr::from_utf8(folded.clone()).unwrap();
        assert_eq!(key.into_bytes().as_ptr(), folded.as_ptr());

        assert!(CiStr::from_utf8(&b"ab\xffcd"[..]).is_err());
        assert_eq!(CiStr::from_utf8_lossy(b"ab\xffcd").as_str(), "AB\u{FFFD}CD");
        assert_eq!(CiStr::from_utf8_lossy(b"abcd").as_str(), "ABCD");
    }

    #[test]
    fn compare_folded() {
        let key = CiStr::new("x-request-id");
        assert_eq!(key, CiStr::new("X-Request-Id"));
        assert!(key == "X-REQUEST-ID");
        assert!(key == *"x-Request-id");
        assert!(key == String::from("x-request-ID"));
        assert!(key != "x-request");
        assert!(CiStr::new("straße") == "STRASSE");
    }

    #[test]
    #[should_panic]
    fn static_must_be_uppercase() {
        let _ = CiStr::from_static("lower");
    }

    #[test]
    fn lookup_keys_fold() {
        assert!(matches!(fold("abc"), Cow::Owned(ref s) if s.as_str() == "ABC"));
        let key = CiStr::new("abc");
        assert!(matches!(fold(&key), Cow::Borrowed(_)));
        assert_eq!(into_folded("abc").as_str(), "ABC");
        assert_eq!(into_folded(String::from("abc")).as_str(), "ABC");
    }
}
