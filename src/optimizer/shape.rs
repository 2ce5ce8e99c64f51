use crate::error::{Error, Result};

/// Number of features an optimizer works on
///
/// Starts `Unfixed` and becomes `Fixed` on the first accepted gradient. After
/// that, every gradient must have exactly that length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureShape {
    #[default]
    Unfixed,
    Fixed(usize),
}

impl FeatureShape {
    /// Validate `len` against the fixed shape without changing anything
    pub fn check(&self, len: usize) -> Result<()> {
        match *self {
            FeatureShape::Fixed(expected) if expected != len => {
                Err(Error::DimensionMismatch { expected, got: len })
            }
            _ => Ok(()),
        }
    }

    /// Validate `len` and fix the shape if this is the first call
    ///
    /// Returns `true` when the shape was fixed by this call.
    pub fn fix(&mut self, len: usize) -> Result<bool> {
        self.check(len)?;
        let first = *self == FeatureShape::Unfixed;
        *self = FeatureShape::Fixed(len);
        Ok(first)
    }

    pub fn len(&self) -> Option<usize> {
        match *self {
            FeatureShape::Unfixed => None,
            FeatureShape::Fixed(len) => Some(len),
        }
    }
}
