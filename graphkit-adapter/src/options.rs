//! Typed access to the untyped options map of an operation.
//!
//! Options arrive as a JSON object. Unknown keys are ignored; typed getters
//! apply defaults for the well-known keys `seed` and `directed`.

use graphkit_engine::{DEFAULT_SEED, RunConfig};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading options.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OptionsError {
    /// The options text was not a JSON object.
    #[error("options are not a JSON object: {message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
    },
    /// A required option was not supplied.
    #[error("missing option `{name}`")]
    Missing {
        /// Name of the option.
        name: String,
    },
    /// An option had an unexpected JSON type.
    #[error("option `{name}` must be a {expected}")]
    WrongType {
        /// Name of the option.
        name: String,
        /// Expected JSON type.
        expected: &'static str,
    },
    /// A numeric option could not be represented as required.
    #[error("option `{name}` must be a non-negative integer, got {value}")]
    InvalidNumber {
        /// Name of the option.
        name: String,
        /// Offending value.
        value: f64,
    },
}

/// Parameter map handed to an operation.
///
/// # Examples
/// ```
/// use graphkit_adapter::Options;
///
/// let options = Options::from_json_str(r#"{"seed": 42, "spread_prob": 0.3}"#)?;
/// assert_eq!(options.seed()?, 42);
/// assert!(options.directed()?);
/// assert_eq!(options.double("spread_prob")?, 0.3);
/// # Ok::<(), graphkit_adapter::OptionsError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Options {
    values: Map<String, Value>,
}

impl Options {
    /// Wraps an already parsed map.
    #[must_use]
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parses options from JSON object text.
    ///
    /// # Errors
    /// Returns [`OptionsError::Malformed`] unless `raw` is a JSON object.
    pub fn from_json_str(raw: &str) -> Result<Self, OptionsError> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(values)) => Ok(Self { values }),
            Ok(other) => Err(OptionsError::Malformed {
                message: format!("expected an object, found {}", json_type(&other)),
            }),
            Err(err) => Err(OptionsError::Malformed {
                message: err.to_string(),
            }),
        }
    }

    /// Returns whether `name` is present.
    #[must_use]
    #[rustfmt::skip]
    pub fn contains(&self, name: &str) -> bool { self.values.contains_key(name) }

    /// Returns the required numeric option `name`.
    ///
    /// # Errors
    /// Returns [`OptionsError::Missing`] when absent and
    /// [`OptionsError::WrongType`] when not a number.
    pub fn double(&self, name: &str) -> Result<f64, OptionsError> {
        self.optional_double(name)?
            .ok_or_else(|| OptionsError::Missing {
                name: name.to_owned(),
            })
    }

    /// Returns the numeric option `name`, or `default` when absent.
    ///
    /// # Errors
    /// Returns [`OptionsError::WrongType`] when present but not a number.
    pub fn double_or(&self, name: &str, default: f64) -> Result<f64, OptionsError> {
        Ok(self.optional_double(name)?.unwrap_or(default))
    }

    /// Returns the non-negative integral option `name`, or `default` when
    /// absent.
    ///
    /// # Errors
    /// Returns [`OptionsError::WrongType`] when present but not a number and
    /// [`OptionsError::InvalidNumber`] when negative, fractional or too
    /// large.
    pub fn count_or(&self, name: &str, default: u64) -> Result<u64, OptionsError> {
        match self.values.get(name) {
            None => Ok(default),
            Some(Value::Number(number)) => {
                if let Some(count) = number.as_u64() {
                    return Ok(count);
                }
                let value = number.as_f64().unwrap_or(f64::NAN);
                float_to_count(name, value)
            }
            Some(_) => Err(wrong_type(name, "number")),
        }
    }

    /// Returns the random seed, defaulting to [`DEFAULT_SEED`].
    ///
    /// # Errors
    /// Propagates [`Options::count_or`] failures for `seed`.
    pub fn seed(&self) -> Result<u64, OptionsError> {
        self.count_or("seed", DEFAULT_SEED)
    }

    /// Returns whether the graph is directed. Only an explicit `false`
    /// yields an undirected graph.
    ///
    /// # Errors
    /// Returns [`OptionsError::WrongType`] when `directed` is not a boolean.
    pub fn directed(&self) -> Result<bool, OptionsError> {
        match self.values.get("directed") {
            None => Ok(true),
            Some(Value::Bool(directed)) => Ok(*directed),
            Some(_) => Err(wrong_type("directed", "boolean")),
        }
    }

    /// Builds the engine run configuration for this invocation.
    ///
    /// Inside [`crate::fault::contain`] the run is tagged with the
    /// containment scope, so panics on its worker threads are attributed to
    /// the operation.
    ///
    /// # Errors
    /// Returns [`OptionsError`] when `seed` is malformed, or the engine error
    /// raised while reading the thread count from the environment.
    pub fn run_config(&self) -> Result<RunConfig, crate::error::OperationError> {
        let seed = self.seed()?;
        let config = RunConfig::from_env(seed)?;
        Ok(match crate::fault::current_scope() {
            Some(scope) => config.with_worker_tag(scope),
            None => config,
        })
    }

    fn optional_double(&self, name: &str) -> Result<Option<f64>, OptionsError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(Value::Number(number)) => number
                .as_f64()
                .map(Some)
                .ok_or_else(|| wrong_type(name, "number")),
            Some(_) => Err(wrong_type(name, "number")),
        }
    }
}

impl From<Map<String, Value>> for Options {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

fn wrong_type(name: &str, expected: &'static str) -> OptionsError {
    OptionsError::WrongType {
        name: name.to_owned(),
        expected,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is checked to be a non-negative integer below 2^64"
)]
fn float_to_count(name: &str, value: f64) -> Result<u64, OptionsError> {
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value < LIMIT {
        Ok(value as u64)
    } else {
        Err(OptionsError::InvalidNumber {
            name: name.to_owned(),
            value,
        })
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn options(raw: &str) -> Options {
        Options::from_json_str(raw).expect("test options are valid JSON objects")
    }

    #[test]
    fn defaults_apply_to_empty_options() {
        let empty = Options::default();
        assert_eq!(empty.seed(), Ok(1));
        assert_eq!(empty.directed(), Ok(true));
        assert_eq!(empty.double_or("burn_ratio", 4.5), Ok(4.5));
    }

    #[rstest]
    #[case(r#"{"seed": 7}"#, 7)]
    #[case(r#"{"seed": 7.0}"#, 7)]
    #[case(r#"{"seed": 0}"#, 0)]
    fn seeds_coerce_to_integers(#[case] raw: &str, #[case] expected: u64) {
        assert_eq!(options(raw).seed(), Ok(expected));
    }

    #[rstest]
    #[case(r#"{"seed": -1}"#)]
    #[case(r#"{"seed": 1.5}"#)]
    fn seeds_reject_unrepresentable_numbers(#[case] raw: &str) {
        let err = options(raw).seed().expect_err("seed must be a count");
        assert!(matches!(err, OptionsError::InvalidNumber { .. }));
    }

    #[test]
    fn seeds_reject_strings() {
        let err = options(r#"{"seed": "1"}"#).seed().expect_err("not a number");
        assert_eq!(
            err,
            OptionsError::WrongType {
                name: "seed".to_owned(),
                expected: "number"
            }
        );
    }

    #[rstest]
    #[case(r#"{"directed": false}"#, false)]
    #[case(r#"{"directed": true}"#, true)]
    #[case(r#"{"other": false}"#, true)]
    fn only_explicit_false_is_undirected(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(options(raw).directed(), Ok(expected));
    }

    #[test]
    fn non_boolean_directed_is_rejected() {
        let err = options(r#"{"directed": 0}"#)
            .directed()
            .expect_err("not a boolean");
        assert!(matches!(err, OptionsError::WrongType { .. }));
    }

    #[test]
    fn required_doubles_report_missing_keys() {
        assert_eq!(
            Options::default().double("spread_prob"),
            Err(OptionsError::Missing {
                name: "spread_prob".to_owned()
            })
        );
    }

    #[rstest]
    #[case("[]")]
    #[case("3")]
    #[case("{")]
    fn non_objects_are_malformed(#[case] raw: &str) {
        let err = Options::from_json_str(raw).expect_err("not an object");
        assert!(matches!(err, OptionsError::Malformed { .. }));
    }

    #[test]
    fn run_configs_carry_the_containment_scope() {
        let untagged = Options::default().run_config().expect("default config");
        assert_eq!(untagged.worker_tag(), None);

        let tagged = crate::fault::contain("tag", || {
            let config = Options::default().run_config()?;
            Ok((config.worker_tag(), crate::fault::current_scope()))
        });
        let (tag, scope) = tagged.expect("config builds inside a scope");
        assert!(tag.is_some());
        assert_eq!(tag, scope);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let parsed = options(r#"{"colour": "teal", "seed": 3}"#);
        assert!(parsed.contains("colour"));
        assert_eq!(parsed.seed(), Ok(3));
    }
}
