use std::{fmt, ops::Deref};

/// Identity handle over a `'static` item.
///
/// Two handles compare equal only if they point to the very same item, no
/// matter what the item contains. Ordering and hashing follow the address as
/// well, so handles can key ordered and hashed maps.
pub struct StaticRef<T: 'static> {
    inner: &'static T,
}

impl<T: 'static> StaticRef<T> {
    pub const fn new(inner: &'static T) -> Self {
        Self { inner }
    }

    /// Returns the referenced item with its full `'static` lifetime.
    pub const fn get(self) -> &'static T {
        self.inner
    }

    fn addr(&self) -> *const T {
        self.inner as *const T
    }
}

impl<T: 'static> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for StaticRef<T> {}

impl<T: 'static> AsRef<T> for StaticRef<T> {
    fn as_ref(&self) -> &T {
        self.inner
    }
}

impl<T: 'static> Deref for StaticRef<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.inner
    }
}

impl<T: 'static> PartialEq for StaticRef<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<T: 'static> Eq for StaticRef<T> {}

impl<T: 'static> PartialOrd for StaticRef<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: 'static> Ord for StaticRef<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.addr().cmp(&other.addr())
    }
}

impl<T: 'static> std::hash::Hash for StaticRef<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for StaticRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}
