//! Indicator frames aligned with a series.

use std::collections::BTreeMap;

use crate::error::IndicatorError;

/// Named indicator columns aligned 1:1 with a series by position.
///
/// `None` marks a value that is not available yet (warm-up).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndicatorFrame {
    len: usize,
    columns: BTreeMap<String, Vec<Option<f64>>>,
}

impl IndicatorFrame {
    /// Create an empty frame for a series of `len` positions.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            columns: BTreeMap::new(),
        }
    }

    /// Insert or replace a column.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), IndicatorError> {
        let name = name.into();
        if values.len() != self.len {
            return Err(IndicatorError::LengthMismatch {
                name,
                expected: self.len,
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Builder-style insert.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, IndicatorError> {
        self.insert(name, values)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Value of a column at a position, if available.
    pub fn value(&self, name: &str, index: usize) -> Option<f64> {
        self.columns.get(name)?.get(index).copied().flatten()
    }

    /// Most recent value of a column, if available.
    pub fn latest(&self, name: &str) -> Option<f64> {
        self.value(name, self.len.checked_sub(1)?)
    }

    /// Column names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Number of aligned positions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
