use std::fmt;

use zeroize::Zeroize;

/// Cleartext password held only for as long as the hasher needs it.
///
/// Never shows its value through `Debug` or `Display` and wipes the buffer
/// when dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    inner: String,
}

impl Password {
    pub fn new(value: String) -> Self {
        Self { inner: value }
    }

    /// Exposes the cleartext. Only the hasher should call this.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.inner.trim().is_empty()
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Password([REDACTED])")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "********")
    }
}

impl Drop for Password {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}
