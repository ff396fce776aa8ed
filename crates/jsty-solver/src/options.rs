//! Solver configuration.
//!
//! Options are deserialized from the host's JSON configuration:
//!
//! ```json
//! { "structuralTyping": true, "covariantContainers": ["Array", "Object"], "maxUnionSize": 30 }
//! ```
//!
//! Missing fields take their defaults; limits default to `jsty_common::limits`.

use indexmap::IndexSet;
use jsty_common::limits;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid solver options: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{name}` must be at least {min}, got {value}")]
    LimitTooSmall {
        name: &'static str,
        min: u64,
        value: u64,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverOptions {
    /// Allow implicit structural matches against structural interfaces.
    pub structural_typing: bool,
    /// Generic containers whose element binding is compared covariantly
    /// instead of invariantly.
    pub covariant_containers: IndexSet<String>,
    /// Unions with more alternates than this collapse to `?`.
    pub max_union_size: usize,
    pub max_instantiation_depth: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            structural_typing: true,
            covariant_containers: ["Array", "Object"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_union_size: limits::MAX_UNION_SIZE,
            max_instantiation_depth: limits::MAX_INSTANTIATION_DEPTH,
        }
    }
}

impl SolverOptions {
    pub fn from_json_str(text: &str) -> Result<Self, OptionsError> {
        let options: SolverOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_union_size < 2 {
            return Err(OptionsError::LimitTooSmall {
                name: "maxUnionSize",
                min: 2,
                value: self.max_union_size as u64,
            });
        }
        if self.max_instantiation_depth == 0 {
            return Err(OptionsError::LimitTooSmall {
                name: "maxInstantiationDepth",
                min: 1,
                value: 0,
            });
        }
        Ok(())
    }

    pub fn is_covariant_container(&self, name: &str) -> bool {
        self.covariant_containers.contains(name)
    }

    pub fn without_structural_typing(mut self) -> Self {
        self.structural_typing = false;
        self
    }
}
