//! Name-keyed registries of descriptions.

use std::collections::BTreeMap;

use crate::errors::{HgResult, ProblemError};

/// Anything registered under a unique name.
pub trait Named {
    fn name(&self) -> &str;
}

/// A mapping from unique names to descriptions.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: BTreeMap<String, T>,
}

impl<T: Named> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Register `item`; names must be unique.
    pub fn register(&mut self, item: T) -> HgResult<()> {
        let name = item.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(ProblemError::DuplicateName { name }.into());
        }
        self.entries.insert(name, item);
        Ok(())
    }

    pub fn with(mut self, item: T) -> HgResult<Self> {
        self.register(item)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> HgResult<&T> {
        self.entries.get(name).ok_or_else(|| {
            ProblemError::NotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Named> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item(&'static str);

    impl Named for Item {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut registry = Registry::new();
        registry.register(Item("ackley")).unwrap();
        let err = registry.register(Item("ackley")).unwrap_err();
        assert!(err.to_string().contains("Duplicate registration: 'ackley'"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_and_order() {
        let registry = Registry::new()
            .with(Item("branin"))
            .and_then(|r| r.with(Item("ackley")))
            .unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["ackley", "branin"]);
        assert!(registry.get("branin").is_ok());
        assert!(registry.get("hartmann").is_err());
    }
}
