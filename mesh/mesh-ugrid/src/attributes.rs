//! Per-point and per-cell attribute tables.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{GridError, GridResult};

/// Typed scalar storage of a [`DataArray`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArrayValues {
    /// 32-bit floats.
    F32(Vec<f32>),
    /// 64-bit floats.
    F64(Vec<f64>),
    /// 64-bit signed integers.
    I64(Vec<i64>),
}

/// Scalar kind of an [`ArrayValues`], ignoring its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// 32-bit floats.
    F32,
    /// 64-bit floats.
    F64,
    /// 64-bit signed integers.
    I64,
}

impl ArrayValues {
    /// Scalar kind.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::F32(_) => ValueKind::F32,
            Self::F64(_) => ValueKind::F64,
            Self::I64(_) => ValueKind::I64,
        }
    }

    /// Number of scalars.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
            Self::I64(v) => v.len(),
        }
    }

    /// Check if there are no scalars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn empty(kind: ValueKind, capacity: usize) -> Self {
        match kind {
            ValueKind::F32 => Self::F32(Vec::with_capacity(capacity)),
            ValueKind::F64 => Self::F64(Vec::with_capacity(capacity)),
            ValueKind::I64 => Self::I64(Vec::with_capacity(capacity)),
        }
    }

    /// Copy `count` scalars from `src[src_start..]` into `self[dst_start..]`,
    /// zero-filling if `self` is too short. Kinds must match.
    fn copy_range(&mut self, dst_start: usize, src: &Self, src_start: usize, count: usize) -> bool {
        fn copy<T: Copy + Default>(dst: &mut Vec<T>, d: usize, src: &[T], s: usize, n: usize) {
            if dst.len() < d + n {
                dst.resize(d + n, T::default());
            }
            dst[d..d + n].copy_from_slice(&src[s..s + n]);
        }
        match (self, src) {
            (Self::F32(d), Self::F32(s)) => copy(d, dst_start, s, src_start, count),
            (Self::F64(d), Self::F64(s)) => copy(d, dst_start, s, src_start, count),
            (Self::I64(d), Self::I64(s)) => copy(d, dst_start, s, src_start, count),
            _ => return false,
        }
        true
    }

    fn shrink_to_fit(&mut self) {
        match self {
            Self::F32(v) => v.shrink_to_fit(),
            Self::F64(v) => v.shrink_to_fit(),
            Self::I64(v) => v.shrink_to_fit(),
        }
    }
}

/// A named column of fixed-width tuples.
///
/// # Example
///
/// ```
/// use mesh_ugrid::{ArrayValues, DataArray};
///
/// let velocity = DataArray::new("velocity", 3, ArrayValues::F64(vec![0.0; 12])).unwrap();
/// assert_eq!(velocity.tuple_count(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataArray {
    name: String,
    components: usize,
    values: ArrayValues,
}

impl DataArray {
    /// Create a column from flat scalar values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ComponentMismatch`] if `components` is zero or
    /// does not divide the number of values.
    pub fn new(name: impl Into<String>, components: usize, values: ArrayValues) -> GridResult<Self> {
        let name = name.into();
        if components == 0 || values.len() % components != 0 {
            return Err(GridError::ComponentMismatch {
                name,
                len: values.len(),
                components,
            });
        }
        Ok(Self {
            name,
            components,
            values,
        })
    }

    /// Column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scalars per tuple.
    #[must_use]
    pub const fn components(&self) -> usize {
        self.components
    }

    /// Stored scalars.
    #[must_use]
    pub const fn values(&self) -> &ArrayValues {
        &self.values
    }

    /// Number of tuples.
    #[must_use]
    pub fn tuple_count(&self) -> usize {
        self.values.len() / self.components
    }

    /// Tuple `id` widened to `f64`, or `None` if out of range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn tuple(&self, id: usize) -> Option<Vec<f64>> {
        let range = id * self.components..(id + 1) * self.components;
        match &self.values {
            ArrayValues::F32(v) => v.get(range).map(|t| t.iter().map(|&x| f64::from(x)).collect()),
            ArrayValues::F64(v) => v.get(range).map(<[f64]>::to_vec),
            ArrayValues::I64(v) => v.get(range).map(|t| t.iter().map(|&x| x as f64).collect()),
        }
    }

    /// Same name, width and kind; no tuples.
    #[must_use]
    pub fn empty_like(&self, capacity: usize) -> Self {
        Self {
            name: self.name.clone(),
            components: self.components,
            values: ArrayValues::empty(self.values.kind(), capacity * self.components),
        }
    }

    /// Whether `other` has the same name, width and kind.
    #[must_use]
    pub fn has_same_layout(&self, other: &Self) -> bool {
        self.name == other.name
            && self.components == other.components
            && self.values.kind() == other.values.kind()
    }

    /// Copy tuple `src_id` of `source` into tuple `dst_id` of `self`.
    ///
    /// The column grows (zero-filled) if `dst_id` is past its end.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AttributeMismatch`] if the layouts differ or
    /// `src_id` is out of range.
    pub fn copy_tuple(&mut self, source: &Self, src_id: usize, dst_id: usize) -> GridResult<()> {
        if !self.has_same_layout(source) || src_id >= source.tuple_count() {
            return Err(GridError::AttributeMismatch {
                name: self.name.clone(),
            });
        }
        let n = self.components;
        if self.values.copy_range(dst_id * n, &source.values, src_id * n, n) {
            Ok(())
        } else {
            Err(GridError::AttributeMismatch {
                name: self.name.clone(),
            })
        }
    }

    /// Release unused capacity.
    pub fn squeeze(&mut self) {
        self.values.shrink_to_fit();
    }
}

/// An ordered set of named columns sharing one tuple index space.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeTable {
    arrays: Vec<DataArray>,
}

impl AttributeTable {
    /// Create an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { arrays: Vec::new() }
    }

    /// Add a column, replacing any column with the same name.
    pub fn add_array(&mut self, array: DataArray) {
        if let Some(existing) = self.arrays.iter_mut().find(|a| a.name == array.name) {
            *existing = array;
        } else {
            self.arrays.push(array);
        }
    }

    /// Look up a column by name.
    #[must_use]
    pub fn array(&self, name: &str) -> Option<&DataArray> {
        self.arrays.iter().find(|a| a.name == name)
    }

    /// All columns in insertion order.
    #[must_use]
    pub fn arrays(&self) -> &[DataArray] {
        &self.arrays
    }

    /// Number of columns.
    #[must_use]
    pub fn array_count(&self) -> usize {
        self.arrays.len()
    }

    /// Number of tuples, taken as the shortest column. Zero with no columns.
    #[must_use]
    pub fn tuple_count(&self) -> usize {
        self.arrays
            .iter()
            .map(DataArray::tuple_count)
            .min()
            .unwrap_or(0)
    }

    /// Table with the columns of `source` but no tuples, reserving room
    /// for `capacity` tuples per column.
    #[must_use]
    pub fn copy_allocate(source: &Self, capacity: usize) -> Self {
        Self {
            arrays: source
                .arrays
                .iter()
                .map(|a| a.empty_like(capacity))
                .collect(),
        }
    }

    /// Copy tuple `src_id` of every column of `source` into tuple `dst_id`.
    ///
    /// `self` must have been created by [`AttributeTable::copy_allocate`]
    /// from a table with the same schema as `source`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::AttributeMismatch`] if the schemas differ or
    /// `src_id` is out of range for a column.
    pub fn copy_tuple(&mut self, source: &Self, src_id: usize, dst_id: usize) -> GridResult<()> {
        if self.arrays.len() != source.arrays.len() {
            return Err(GridError::AttributeMismatch {
                name: String::from("<table>"),
            });
        }
        for (dst, src) in self.arrays.iter_mut().zip(&source.arrays) {
            dst.copy_tuple(src, src_id, dst_id)?;
        }
        Ok(())
    }

    /// Replace this table with a copy of `source`.
    pub fn pass_data(&mut self, source: &Self) {
        self.arrays.clone_from(&source.arrays);
    }

    /// Whether both tables have the same columns in the same order.
    #[must_use]
    pub fn has_same_schema(&self, other: &Self) -> bool {
        self.arrays.len() == other.arrays.len()
            && self
                .arrays
                .iter()
                .zip(&other.arrays)
                .all(|(a, b)| a.has_same_layout(b))
    }

    /// Release unused capacity in every column.
    pub fn squeeze(&mut self) {
        self.arrays.iter_mut().for_each(DataArray::squeeze);
    }
}
