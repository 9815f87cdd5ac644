//! Occurrence bounds for elements and choice groups
//!
//! Bounds are stored on the schema model as the raw attribute strings and
//! interpreted here. Interpretation never fails: a value that is not a
//! non-negative integer falls back to the default of 1.

/// Literal `maxOccurs` value meaning "no upper bound"
pub const UNBOUNDED: &str = "unbounded";

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Interpret raw `minOccurs`/`maxOccurs` attribute values
    pub fn from_attrs(min_occurs: Option<&str>, max_occurs: Option<&str>) -> Self {
        let mut occurs = Occurs::once();

        if let Some(min) = min_occurs.and_then(|s| s.trim().parse::<u32>().ok()) {
            occurs.min = min;
        }

        match max_occurs.map(str::trim) {
            Some(UNBOUNDED) => occurs.max = None,
            Some(max) => {
                if let Ok(max) = max.parse::<u32>() {
                    occurs.max = Some(max);
                }
            }
            None => {}
        }

        occurs
    }

    /// Check if occurrence count is under the minimum
    pub fn is_missing(&self, count: u32) -> bool {
        count < self.min
    }

    /// Check if occurrence count exceeds the maximum
    pub fn is_exceeded(&self, count: u32) -> bool {
        match self.max {
            Some(max) => count > max,
            None => false,
        }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}
