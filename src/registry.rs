//! Process-wide window class registry
//!
//! Window classes are registered once per process. Every surface that needs
//! a class acquires a reference here; the class is registered with the
//! platform on the first acquire and unregistered on the last release.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::error::SurfaceError;

/// Reference-counted set of registered window classes
pub struct ClassRegistry {
    users: Mutex<BTreeMap<String, usize>>,
}

static GLOBAL: ClassRegistry = ClassRegistry::new();

impl ClassRegistry {
    pub const fn new() -> Self {
        Self {
            users: parking_lot::const_mutex(BTreeMap::new()),
        }
    }

    /// The registry shared by every surface in this process
    pub fn global() -> &'static ClassRegistry {
        &GLOBAL
    }

    /// Take a reference to `class`, running `register` if nobody holds it yet.
    ///
    /// A failed registration leaves the count untouched.
    pub fn acquire<F>(&self, class: &str, register: F) -> Result<(), SurfaceError>
    where
        F: FnOnce() -> Result<(), SurfaceError>,
    {
        let mut users = self.users.lock();
        match users.get_mut(class) {
            Some(count) => {
                *count += 1;
            }
            None => {
                register()?;
                users.insert(class.to_string(), 1);
                log!("ClassRegistry: registered {}", class);
            }
        }
        Ok(())
    }

    /// Drop a reference to `class`, running `unregister` when it was the last.
    ///
    /// Releasing a class that is not held does nothing.
    pub fn release<F>(&self, class: &str, unregister: F)
    where
        F: FnOnce(),
    {
        let mut users = self.users.lock();
        let remaining = match users.get_mut(class) {
            Some(count) => {
                *count -= 1;
                *count
            }
            None => return,
        };

        if remaining == 0 {
            users.remove(class);
            unregister();
            log!("ClassRegistry: unregistered {}", class);
        }
    }

    /// Number of current holders of `class`
    pub fn users(&self, class: &str) -> usize {
        self.users.lock().get(class).copied().unwrap_or(0)
    }

    pub fn is_registered(&self, class: &str) -> bool {
        self.users(class) > 0
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_registers_once() {
        let registry = ClassRegistry::new();
        let registrations = Cell::new(0);

        for _ in 0..3 {
            registry
                .acquire("Surface", || {
                    registrations.set(registrations.get() + 1);
                    Ok(())
                })
                .unwrap();
        }

        assert_eq!(registrations.get(), 1);
        assert_eq!(registry.users("Surface"), 3);
    }

    #[test]
    fn test_unregisters_on_last_release() {
        let registry = ClassRegistry::new();
        let unregistrations = Cell::new(0);
        registry.acquire("Surface", || Ok(())).unwrap();
        registry.acquire("Surface", || Ok(())).unwrap();

        registry.release("Surface", || unregistrations.set(unregistrations.get() + 1));
        assert_eq!(unregistrations.get(), 0);
        assert!(registry.is_registered("Surface"));

        registry.release("Surface", || unregistrations.set(unregistrations.get() + 1));
        assert_eq!(unregistrations.get(), 1);
        assert!(!registry.is_registered("Surface"));
    }

    #[test]
    fn test_failed_registration_is_not_counted() {
        let registry = ClassRegistry::new();
        let result = registry.acquire("Surface", || {
            Err(SurfaceError::ClassRegistration {
                class: "Surface".to_string(),
                reason: "denied".to_string(),
            })
        });

        assert!(result.is_err());
        assert_eq!(registry.users("Surface"), 0);

        // Next acquire retries registration
        let retried = Cell::new(false);
        registry
            .acquire("Surface", || {
                retried.set(true);
                Ok(())
            })
            .unwrap();
        assert!(retried.get());
    }

    #[test]
    fn test_release_unknown_class_is_noop() {
        let registry = ClassRegistry::new();
        let called = Cell::new(false);
        registry.release("Missing", || called.set(true));
        assert!(!called.get());
    }

    #[test]
    fn test_classes_are_independent() {
        let registry = ClassRegistry::new();
        registry.acquire("A", || Ok(())).unwrap();
        registry.acquire("B", || Ok(())).unwrap();
        registry.release("A", || {});

        assert!(!registry.is_registered("A"));
        assert!(registry.is_registered("B"));
    }
}
