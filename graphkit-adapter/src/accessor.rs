//! Named input and output access for operations.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::{
    entity::{DoubleAttribute, EdgeBundle, Entity, VertexSet},
    options::{Options, OptionsError},
};

/// Errors raised while reading inputs or writing outputs.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AccessError {
    /// A required input was not supplied.
    #[error("missing input `{name}`")]
    MissingInput {
        /// Name of the input.
        name: String,
    },
    /// An input exists under the requested name but has another kind.
    #[error("input `{name}` is a {found}, expected a {expected}")]
    WrongKind {
        /// Name of the input.
        name: String,
        /// Kind the operation asked for.
        expected: &'static str,
        /// Kind actually supplied.
        found: &'static str,
    },
    /// A required parameter was not supplied.
    #[error("missing parameter `{name}`")]
    MissingParam {
        /// Name of the parameter.
        name: String,
    },
    /// A map parameter could not be parsed into options.
    #[error("parameter `{name}` is not a valid options map: {source}")]
    InvalidParam {
        /// Name of the parameter.
        name: String,
        /// Underlying parse failure.
        #[source]
        source: OptionsError,
    },
    /// The host refused an output.
    #[error("output `{name}` rejected: {reason}")]
    OutputRejected {
        /// Name of the output.
        name: String,
        /// Host-supplied reason.
        reason: String,
    },
}

/// Host-side access to the named inputs, parameters and outputs of one
/// operation invocation.
pub trait EntityAccessor {
    /// Returns the vertex set bound to `name`.
    ///
    /// # Errors
    /// Returns [`AccessError`] when the input is missing or of another kind.
    fn vertex_set(&self, name: &str) -> Result<Arc<VertexSet>, AccessError>;

    /// Returns the edge bundle bound to `name`.
    ///
    /// # Errors
    /// Returns [`AccessError`] when the input is missing or of another kind.
    fn edge_bundle(&self, name: &str) -> Result<Arc<EdgeBundle>, AccessError>;

    /// Returns the double attribute bound to `name`, or `None` if no input
    /// with that name was supplied.
    ///
    /// # Errors
    /// Returns [`AccessError::WrongKind`] when the input has another kind.
    fn double_attribute_opt(&self, name: &str)
    -> Result<Option<Arc<DoubleAttribute>>, AccessError>;

    /// Returns the map parameter `name` as [`Options`].
    ///
    /// # Errors
    /// Returns [`AccessError`] when the parameter is missing or malformed.
    fn map_param(&self, name: &str) -> Result<Options, AccessError>;

    /// Returns the string parameter `name`.
    ///
    /// # Errors
    /// Returns [`AccessError::MissingParam`] when the parameter is missing.
    fn string_param(&self, name: &str) -> Result<String, AccessError>;

    /// Publishes an entity output.
    ///
    /// # Errors
    /// Returns [`AccessError::OutputRejected`] when the host refuses it.
    fn output(&mut self, name: &str, entity: Entity) -> Result<(), AccessError>;

    /// Publishes a scalar output.
    ///
    /// # Errors
    /// Returns [`AccessError::OutputRejected`] when the host refuses it.
    fn output_scalar(&mut self, name: &str, value: f64) -> Result<(), AccessError>;
}

/// [`EntityAccessor`] backed by in-memory maps.
///
/// Inputs are bound with the `with_*` builders; outputs are collected and can
/// be inspected afterwards.
///
/// # Examples
/// ```
/// use graphkit_adapter::{EdgeBundle, EntityAccessor, MemoryAccessor, VertexSet};
///
/// let accessor = MemoryAccessor::new()
///     .with_input("vs", VertexSet::new(3))
///     .with_input("es", EdgeBundle::new(vec![0, 1], vec![1, 2])?)
///     .with_string_param("op", "Coverage");
/// assert_eq!(accessor.vertex_set("vs").map(|vs| vs.len()), Ok(3));
/// assert_eq!(accessor.string_param("op").as_deref(), Ok("Coverage"));
/// # Ok::<(), graphkit_adapter::EntityError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryAccessor {
    inputs: HashMap<String, Entity>,
    params: HashMap<String, String>,
    outputs: HashMap<String, Entity>,
}

impl MemoryAccessor {
    /// Creates an accessor with no inputs, parameters or outputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an input entity to `name`.
    #[must_use]
    pub fn with_input(mut self, name: impl Into<String>, entity: impl Into<Entity>) -> Self {
        self.inputs.insert(name.into(), entity.into());
        self
    }

    /// Binds a string parameter to `name`.
    #[must_use]
    pub fn with_string_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Binds a map parameter to `name`, given as JSON object text.
    #[must_use]
    pub fn with_map_param(self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.with_string_param(name, json)
    }

    /// Returns the output written under `name`, if any.
    #[must_use]
    pub fn output_entity(&self, name: &str) -> Option<&Entity> {
        self.outputs.get(name)
    }

    /// Returns the double attribute output written under `name`, if any.
    #[must_use]
    pub fn output_attribute(&self, name: &str) -> Option<&DoubleAttribute> {
        match self.outputs.get(name)? {
            Entity::DoubleAttribute(attr) => Some(attr),
            _ => None,
        }
    }

    /// Returns the scalar output written under `name`, if any.
    #[must_use]
    pub fn output_scalar_value(&self, name: &str) -> Option<f64> {
        match self.outputs.get(name)? {
            Entity::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns whether no output has been written.
    #[must_use]
    pub fn has_no_outputs(&self) -> bool {
        self.outputs.is_empty()
    }

    fn input(&self, name: &str) -> Result<&Entity, AccessError> {
        self.inputs.get(name).ok_or_else(|| AccessError::MissingInput {
            name: name.to_owned(),
        })
    }
}

fn wrong_kind(name: &str, expected: &'static str, found: &Entity) -> AccessError {
    AccessError::WrongKind {
        name: name.to_owned(),
        expected,
        found: found.kind(),
    }
}

impl EntityAccessor for MemoryAccessor {
    fn vertex_set(&self, name: &str) -> Result<Arc<VertexSet>, AccessError> {
        match self.input(name)? {
            Entity::VertexSet(vs) => Ok(Arc::clone(vs)),
            other => Err(wrong_kind(name, "vertex set", other)),
        }
    }

    fn edge_bundle(&self, name: &str) -> Result<Arc<EdgeBundle>, AccessError> {
        match self.input(name)? {
            Entity::EdgeBundle(es) => Ok(Arc::clone(es)),
            other => Err(wrong_kind(name, "edge bundle", other)),
        }
    }

    fn double_attribute_opt(
        &self,
        name: &str,
    ) -> Result<Option<Arc<DoubleAttribute>>, AccessError> {
        match self.inputs.get(name) {
            None => Ok(None),
            Some(Entity::DoubleAttribute(attr)) => Ok(Some(Arc::clone(attr))),
            Some(other) => Err(wrong_kind(name, "double attribute", other)),
        }
    }

    fn map_param(&self, name: &str) -> Result<Options, AccessError> {
        // An absent map means "all defaults".
        let Some(raw) = self.params.get(name) else {
            return Ok(Options::default());
        };
        Options::from_json_str(raw).map_err(|source| AccessError::InvalidParam {
            name: name.to_owned(),
            source,
        })
    }

    fn string_param(&self, name: &str) -> Result<String, AccessError> {
        self.params
            .get(name)
            .cloned()
            .ok_or_else(|| AccessError::MissingParam {
                name: name.to_owned(),
            })
    }

    fn output(&mut self, name: &str, entity: Entity) -> Result<(), AccessError> {
        self.outputs.insert(name.to_owned(), entity);
        Ok(())
    }

    fn output_scalar(&mut self, name: &str, value: f64) -> Result<(), AccessError> {
        self.outputs.insert(name.to_owned(), Entity::Scalar(value));
        Ok(())
    }
}
