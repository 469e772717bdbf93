//! Host ownership
//!
//! A host is owned when it ends with one of the configured suffixes. Owned
//! hosts were generated by this webhook and may be regenerated; any other
//! non-empty host was chosen by a user and is never touched.

use std::fmt;
use std::str::FromStr;

/// Configured set of owned host suffixes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnedHosts {
    suffixes: Vec<String>,
}

impl OwnedHosts {
    /// Build from explicit suffixes, dropping blank entries
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Parse a comma-separated suffix list
    ///
    /// Blank entries are dropped: an empty suffix would own every host.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Whether `host` ends with any owned suffix
    pub fn is_owned(&self, host: &str) -> bool {
        self.suffixes.iter().any(|suffix| host.ends_with(suffix.as_str()))
    }

    /// Configured suffixes
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// True when no suffixes are configured
    pub fn is_empty(&self) -> bool {
        self.suffixes.is_empty()
    }
}

impl FromStr for OwnedHosts {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for OwnedHosts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.suffixes.join(","))
    }
}
