//! Process-wide registry of generated clients.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lazy_static::lazy_static;
use tracing::info;

use crate::namespace::Namespace;

lazy_static! {
    /// Generated namespaces keyed by module name.
    static ref REGISTRY: Mutex<BTreeMap<String, Arc<Namespace>>> = Mutex::new(BTreeMap::new());
}

fn registry() -> MutexGuard<'static, BTreeMap<String, Arc<Namespace>>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Named scope holding every client built by [`create`](crate::create).
///
/// Registering under a name that is already taken replaces the previous
/// client; handles obtained earlier keep working.
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// Stores `namespace` under its own name and returns the shared handle.
    pub fn register(namespace: Namespace) -> Arc<Namespace> {
        let name = namespace.name().to_string();
        let namespace = Arc::new(namespace);
        let replaced = registry()
            .insert(name.clone(), Arc::clone(&namespace))
            .is_some();
        info!(module = %name, replaced, "registered service");
        namespace
    }

    pub fn get(name: &str) -> Option<Arc<Namespace>> {
        registry().get(name).cloned()
    }

    pub fn contains(name: &str) -> bool {
        registry().contains_key(name)
    }

    /// Registered module names, sorted.
    pub fn names() -> Vec<String> {
        registry().keys().cloned().collect()
    }

    pub fn remove(name: &str) -> Option<Arc<Namespace>> {
        registry().remove(name)
    }

    /// Drops every registered client.
    pub fn clear() {
        registry().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_register_and_get() {
        ServiceRegistry::clear();
        let handle = ServiceRegistry::register(Namespace::new("Comments"));

        assert!(ServiceRegistry::contains("Comments"));
        assert!(Arc::ptr_eq(&handle, &ServiceRegistry::get("Comments").unwrap()));
        assert_eq!(ServiceRegistry::names(), ["Comments"]);
        ServiceRegistry::clear();
    }

    #[test]
    #[serial]
    fn test_re_registering_replaces() {
        ServiceRegistry::clear();
        let first = ServiceRegistry::register(Namespace::new("Comments"));
        let second = ServiceRegistry::register(Namespace::new("Comments"));

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &ServiceRegistry::get("Comments").unwrap()));
        assert_eq!(first.name(), "Comments");
        ServiceRegistry::clear();
    }

    #[test]
    #[serial]
    fn test_clear_and_remove() {
        ServiceRegistry::clear();
        ServiceRegistry::register(Namespace::new("A"));
        ServiceRegistry::register(Namespace::new("B"));

        assert!(ServiceRegistry::remove("A").is_some());
        assert!(!ServiceRegistry::contains("A"));

        ServiceRegistry::clear();
        assert!(ServiceRegistry::names().is_empty());
    }

    #[test]
    #[serial]
    #[tracing_test::traced_test]
    fn test_registration_is_logged() {
        ServiceRegistry::clear();
        ServiceRegistry::register(Namespace::new("Logged"));

        assert!(logs_contain("registered service"));
        assert!(logs_contain("Logged"));
        ServiceRegistry::clear();
    }
}
