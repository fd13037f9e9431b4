//! `m/...` key paths

use crate::{ChildNumber, Error, Result};
use core::{fmt, str::FromStr};

/// Sequence of child numbers walked from a master key, written as
/// `m/44'/0'/0'/0/7`.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    pub fn iter(&self) -> impl Iterator<Item = ChildNumber> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the bare master path `m`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ChildNumber> for DerivationPath {
    fn from_iter<I: IntoIterator<Item = ChildNumber>>(children: I) -> Self {
        Self(children.into_iter().collect())
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        self.iter().try_for_each(|child| write!(f, "/{child}"))
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let invalid = || Error::InvalidDerivationPath(path.to_string());
        let mut components = path.split('/');
        if components.next() != Some("m") {
            return Err(invalid());
        }
        components.map(|child| child.parse::<ChildNumber>().map_err(|_| invalid())).collect()
    }
}
