//! Caller-side graph entities.
//!
//! Vertices and edges carry no payload beyond their position: vertex `i` of a
//! [`VertexSet`] is simply the `i`-th vertex, and position `i` of an
//! [`EdgeBundle`] is the stable identity of edge `i`.

use std::sync::Arc;

use thiserror::Error;

/// Errors raised when constructing entities from raw columns.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EntityError {
    /// Parallel columns of one entity had different lengths.
    #[error("{entity} columns differ in length: {left} vs {right}")]
    LengthMismatch {
        /// Kind of entity being built.
        entity: &'static str,
        /// Length of the first column.
        left: usize,
        /// Length of the second column.
        right: usize,
    },
}

/// An identity domain of `len` vertices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VertexSet {
    len: usize,
}

impl VertexSet {
    /// Creates a vertex set with `len` vertices.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.len }

    /// Returns whether the set has no vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.len == 0 }
}

/// Ordered edges between two vertex sets, stored as parallel `src`/`dst`
/// columns.
///
/// # Examples
/// ```
/// use graphkit_adapter::EdgeBundle;
///
/// let bundle = EdgeBundle::new(vec![0, 1, 2], vec![1, 2, 3])?;
/// assert_eq!(bundle.len(), 3);
/// assert_eq!(bundle.edge(1), Some((1, 2)));
/// # Ok::<(), graphkit_adapter::EntityError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeBundle {
    src: Vec<usize>,
    dst: Vec<usize>,
}

impl EdgeBundle {
    /// Builds a bundle from its endpoint columns.
    ///
    /// # Errors
    /// Returns [`EntityError::LengthMismatch`] when the columns differ in
    /// length.
    pub fn new(src: Vec<usize>, dst: Vec<usize>) -> Result<Self, EntityError> {
        if src.len() != dst.len() {
            return Err(EntityError::LengthMismatch {
                entity: "edge bundle",
                left: src.len(),
                right: dst.len(),
            });
        }
        Ok(Self { src, dst })
    }

    /// Returns the source column.
    #[must_use]
    pub fn src(&self) -> &[usize] {
        &self.src
    }

    /// Returns the destination column.
    #[must_use]
    pub fn dst(&self) -> &[usize] {
        &self.dst
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.src.len()
    }

    /// Returns whether the bundle has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    /// Returns the endpoints of edge `index`.
    #[must_use]
    pub fn edge(&self, index: usize) -> Option<(usize, usize)> {
        Some((*self.src.get(index)?, *self.dst.get(index)?))
    }

    /// Iterates over `(src, dst)` pairs in edge order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }
}

/// A partially defined `f64` value per entity element.
///
/// `defined[i] == false` marks that no value exists for element `i`; the
/// matching entry of `values` is then meaningless.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoubleAttribute {
    values: Vec<f64>,
    defined: Vec<bool>,
}

impl DoubleAttribute {
    /// Builds an attribute from its value and definedness columns.
    ///
    /// # Errors
    /// Returns [`EntityError::LengthMismatch`] when the columns differ in
    /// length.
    pub fn new(values: Vec<f64>, defined: Vec<bool>) -> Result<Self, EntityError> {
        if values.len() != defined.len() {
            return Err(EntityError::LengthMismatch {
                entity: "double attribute",
                left: values.len(),
                right: defined.len(),
            });
        }
        Ok(Self { values, defined })
    }

    /// Builds an attribute where exactly the NaN values are undefined.
    ///
    /// # Examples
    /// ```
    /// use graphkit_adapter::DoubleAttribute;
    ///
    /// let attr = DoubleAttribute::from_values(vec![1.5, f64::NAN]);
    /// assert_eq!(attr.defined(), &[true, false]);
    /// assert_eq!(attr.get(1), None);
    /// ```
    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        let defined = values.iter().map(|value| !value.is_nan()).collect();
        Self { values, defined }
    }

    /// Returns the raw value column.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the definedness column.
    #[must_use]
    pub fn defined(&self) -> &[bool] {
        &self.defined
    }

    /// Returns the value of element `index` when it is defined.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        match self.defined.get(index) {
            Some(true) => self.values.get(index).copied(),
            _ => None,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the attribute has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Any entity an operation can read or emit.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// A vertex set.
    VertexSet(Arc<VertexSet>),
    /// An edge bundle.
    EdgeBundle(Arc<EdgeBundle>),
    /// A per-element double attribute.
    DoubleAttribute(Arc<DoubleAttribute>),
    /// A single double value.
    Scalar(f64),
}

impl Entity {
    /// Returns a short human-readable name of the entity kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::VertexSet(_) => "vertex set",
            Self::EdgeBundle(_) => "edge bundle",
            Self::DoubleAttribute(_) => "double attribute",
            Self::Scalar(_) => "scalar",
        }
    }
}

impl From<VertexSet> for Entity {
    fn from(value: VertexSet) -> Self {
        Self::VertexSet(Arc::new(value))
    }
}

impl From<EdgeBundle> for Entity {
    fn from(value: EdgeBundle) -> Self {
        Self::EdgeBundle(Arc::new(value))
    }
}

impl From<DoubleAttribute> for Entity {
    fn from(value: DoubleAttribute) -> Self {
        Self::DoubleAttribute(Arc::new(value))
    }
}
