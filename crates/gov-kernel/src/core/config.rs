// gov-kernel/src/core/config.rs
// ============================================================================
// Module: Governance Kernel Policy Configuration
// Description: Fail-closed TOML loading of a GovernancePolicy shape.
// Purpose: Resolve a `PolicyConfigDocument` against a caller-supplied law
//          registry into a `GovernancePolicy`, without ever panicking on bad
//          input.
// Dependencies: crate::core::{action, composition, law, policy, state}, toml,
//               thiserror
// ============================================================================

//! ## Overview
//! A policy can be named in a TOML file instead of built up in code: a
//! jurisdiction, a composition rule, and an ordered list of Law names. This
//! is the only place in the kernel that touches the filesystem, and it fails
//! closed — any problem with the file, its contents, or the names inside it
//! returns a [`ConfigError`] rather than building a partial policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::core::action::Action;
use crate::core::composition::CompositionRule;
use crate::core::identifiers::JurisdictionId;
use crate::core::law::AnyLaw;
use crate::core::policy::GovernancePolicy;
use crate::core::state::State;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted policy configuration file size, in bytes.
pub const MAX_POLICY_CONFIG_FILE_SIZE: usize = 256 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failures from loading and resolving a [`PolicyConfigDocument`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file from disk failed.
    #[error("config io error: {0}")]
    Io(String),
    /// The file contents were not valid TOML for the expected shape.
    #[error("config parse error: {0}")]
    Parse(String),
    /// The file exceeded [`MAX_POLICY_CONFIG_FILE_SIZE`].
    #[error("config file exceeds the {MAX_POLICY_CONFIG_FILE_SIZE} byte size limit")]
    TooLarge,
    /// `laws` named no entries.
    #[error("policy configuration lists no laws")]
    EmptyLawList,
    /// `laws` named the same law twice.
    #[error("policy configuration names law '{0}' more than once")]
    DuplicateLaw(String),
    /// `laws` named a law the caller's registry does not recognize.
    #[error("policy configuration names unknown law '{0}'")]
    UnknownLaw(String),
}

// ============================================================================
// SECTION: Wire Shape
// ============================================================================

/// The TOML wire shape for a [`GovernancePolicy`]: `{ jurisdiction_id, rule,
/// laws }`. `rule` and `laws` are resolved by [`PolicyConfigDocument::resolve`];
/// this type alone never constructs a policy.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfigDocument {
    /// The jurisdiction label the resolved policy is responsible for.
    pub jurisdiction_id: String,
    /// The composition rule to combine Law verdicts under.
    pub rule: CompositionRule,
    /// Law names to resolve against a [`LawRegistry`], in declaration order.
    pub laws: Vec<String>,
}

impl PolicyConfigDocument {
    /// Resolves every named law against `registry`, in declaration order,
    /// into a concrete [`GovernancePolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLawList`] if `laws` is empty,
    /// [`ConfigError::DuplicateLaw`] if a name repeats, or
    /// [`ConfigError::UnknownLaw`] if a name is absent from `registry`.
    pub fn resolve<S, A>(&self, registry: &LawRegistry<S, A>) -> Result<GovernancePolicy<S, A>, ConfigError>
    where
        S: State + 'static,
        A: Action + 'static,
    {
        if self.laws.is_empty() {
            return Err(ConfigError::EmptyLawList);
        }

        let mut seen = HashSet::with_capacity(self.laws.len());
        let mut laws = Vec::with_capacity(self.laws.len());
        for name in &self.laws {
            if !seen.insert(name.clone()) {
                return Err(ConfigError::DuplicateLaw(name.clone()));
            }
            let law = registry.resolve(name).ok_or_else(|| ConfigError::UnknownLaw(name.clone()))?;
            laws.push(law);
        }

        Ok(GovernancePolicy::new(laws, self.rule, JurisdictionId::new(self.jurisdiction_id.clone())))
    }
}

// ============================================================================
// SECTION: LawRegistry
// ============================================================================

/// A caller-supplied map from stable Law name to a constructor for that
/// Law's [`AnyLaw`]. The registry is how [`PolicyConfigDocument::resolve`]
/// turns plain strings into live evaluators without the kernel knowing any
/// domain Law by name.
pub struct LawRegistry<S, A> {
    constructors: HashMap<String, Box<dyn Fn() -> AnyLaw<S, A> + Send + Sync>>,
}

impl<S, A> Default for LawRegistry<S, A> {
    fn default() -> Self {
        Self { constructors: HashMap::new() }
    }
}

impl<S: State + 'static, A: Action + 'static> LawRegistry<S, A> {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor for the Law named `name`.
    #[must_use]
    pub fn with_law<F>(mut self, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> AnyLaw<S, A> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
        self
    }

    /// Builds a fresh `AnyLaw` for `name`, or `None` if unregistered.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<AnyLaw<S, A>> {
        self.constructors.get(name).map(|constructor| constructor())
    }
}

// ============================================================================
// SECTION: PolicyConfig
// ============================================================================

/// Entry point for loading a [`GovernancePolicy`] from a TOML file on disk.
pub struct PolicyConfig;

impl PolicyConfig {
    /// Reads `path`, bounded to [`MAX_POLICY_CONFIG_FILE_SIZE`] bytes,
    /// parses it as a [`PolicyConfigDocument`], and resolves it against
    /// `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on any I/O failure, malformed TOML, oversized
    /// file, or unresolved/duplicate/empty law list. Never panics, and never
    /// builds a partial policy.
    pub fn load_from_path<S, A>(path: impl AsRef<Path>, registry: &LawRegistry<S, A>) -> Result<GovernancePolicy<S, A>, ConfigError>
    where
        S: State + 'static,
        A: Action + 'static,
    {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() as usize > MAX_POLICY_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge);
        }

        let contents = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let document: PolicyConfigDocument = toml::from_str(&contents).map_err(|err| ConfigError::Parse(err.to_string()))?;
        document.resolve(registry)
    }
}
