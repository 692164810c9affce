//! Environment requirements for running a benchmark or optimizer in isolation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime environment a benchmark or optimizer needs.
///
/// Opaque to the core: it is carried on descriptions for whichever external
/// tool builds isolated environments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    /// Environment name, used to share environments between descriptions.
    pub name: String,
    /// Package requirements to install.
    pub requirements: Vec<String>,
    /// Commands to run after installing requirements.
    pub post_install: Vec<String>,
    /// Environment variables.
    pub env_vars: BTreeMap<String, String>,
}

impl Env {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_round_trip() {
        let env = Env::new("lcbench")
            .with_requirements(vec!["numpy".into(), "pandas".into()])
            .with_env_var("RUST_LOG", "info");

        assert!(!env.is_empty());
        let json = serde_json::to_string(&env).unwrap();
        let back: Env = serde_json::from_str(&json).unwrap();
        assert_eq!(env, back);
    }

    #[test]
    fn empty_env() {
        assert!(Env::empty().is_empty());
    }
}
