//! Name-keyed constructors for engine algorithms.
//!
//! Handlers select the algorithm named by their `op` parameter from a
//! registry; a name the registry does not hold is reported as
//! [`OperationError::UnsupportedAlgorithm`].

use std::{collections::HashMap, fmt};

use graphkit_engine::{
    Coverage, EdgeCut, EdgeScore, ForestFireScore, HubDominance, Modularity, QualityMeasure,
    RandomEdgeScore, TriangleEdgeScore,
};

use crate::{
    error::{OperationError, Result},
    options::Options,
};

/// Builds an algorithm object from the invocation options.
pub type Factory<T> = fn(&Options) -> Result<Box<T>>;

/// Registry of algorithm constructors sharing one trait object type.
pub struct AlgorithmRegistry<T: ?Sized> {
    family: &'static str,
    factories: HashMap<&'static str, Factory<T>>,
}

/// Registry of per-edge score algorithms.
pub type EdgeScoreRegistry = AlgorithmRegistry<dyn EdgeScore>;

/// Registry of partition quality measures.
pub type QualityRegistry = AlgorithmRegistry<dyn QualityMeasure>;

impl<T: ?Sized> AlgorithmRegistry<T> {
    /// Creates an empty registry for the named algorithm family.
    #[must_use]
    pub fn empty(family: &'static str) -> Self {
        Self {
            family,
            factories: HashMap::new(),
        }
    }

    /// Returns the family name used in diagnostics.
    #[must_use]
    #[rustfmt::skip]
    pub fn family(&self) -> &'static str { self.family }

    /// Adds `factory` under `name`, returning any factory it replaces.
    pub fn register(&mut self, name: &'static str, factory: Factory<T>) -> Option<Factory<T>> {
        self.factories.insert(name, factory)
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Returns the registered names in lexical order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Constructs the algorithm registered under `name`.
    ///
    /// # Errors
    /// Returns [`OperationError::UnsupportedAlgorithm`] when `name` is not
    /// registered, or the factory's error for invalid options.
    pub fn build(&self, name: &str, options: &Options) -> Result<Box<T>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| OperationError::UnsupportedAlgorithm {
                family: self.family,
                name: name.to_owned(),
            })?;
        factory(options)
    }
}

impl<T: ?Sized> fmt::Debug for AlgorithmRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("family", &self.family)
            .field("names", &self.names())
            .finish()
    }
}

impl AlgorithmRegistry<dyn EdgeScore> {
    /// Creates a registry holding the built-in edge scores.
    ///
    /// `ForestFireScore` reads the required `spread_prob` and `burn_ratio`
    /// options.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty("edge score");
        registry.register("ForestFireScore", forest_fire);
        registry.register("TriangleEdgeScore", |_| Ok(Box::new(TriangleEdgeScore)));
        registry.register("RandomEdgeScore", |_| Ok(Box::new(RandomEdgeScore)));
        registry
    }
}

fn forest_fire(options: &Options) -> Result<Box<dyn EdgeScore>> {
    let score = ForestFireScore::new(options.double("spread_prob")?, options.double("burn_ratio")?)?;
    Ok(Box::new(score))
}

impl AlgorithmRegistry<dyn QualityMeasure> {
    /// Creates a registry holding the built-in quality measures.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty("quality measure");
        registry.register("Coverage", |_| Ok(Box::new(Coverage)));
        registry.register("EdgeCut", |_| Ok(Box::new(EdgeCut)));
        registry.register("HubDominance", |_| Ok(Box::new(HubDominance)));
        registry.register("Modularity", |_| Ok(Box::new(Modularity)));
        registry
    }
}
