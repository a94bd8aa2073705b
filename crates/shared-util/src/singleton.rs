//! # Singleton
//!
//! Process-wide single instance with controlled construction.
//!
//! Two lifecycles are supported on the same type:
//!
//! - **Lazy**: [`Singleton::get_or_init`] / [`Singleton::instance`] build the
//!   value on first access.
//! - **Explicit**: [`Singleton::create`] builds it once with arguments and
//!   rejects later attempts; [`Singleton::get`] fails until it has run.
//!
//! There is no destroy operation. References handed out stay valid for the
//! rest of the process.
//!
//! ```ignore
//! static EVENTS: Singleton<Subject<Event>> = Singleton::new();
//!
//! EVENTS.instance().add_observer(|e| println!("{e:?}"));
//! ```

use std::any::type_name;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors from explicit singleton creation and access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SingletonError {
    /// `get` was called before `create`.
    #[error("Singleton instance of {type_name} has not been created")]
    NotCreated { type_name: &'static str },

    /// `create` was called on an initialized singleton.
    #[error("Singleton instance of {type_name} has already been created")]
    AlreadyCreated { type_name: &'static str },
}

/// A process-wide, initialize-once slot.
#[derive(Debug)]
pub struct Singleton<T> {
    cell: OnceLock<T>,
}

impl<T> Singleton<T> {
    /// Create an empty slot. Usable in `static` items.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Get the instance, building it with `init` on first access.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(|| {
            debug!(type_name = type_name::<T>(), "Initializing singleton");
            init()
        })
    }

    /// Create the instance from `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SingletonError::AlreadyCreated`] if the instance exists;
    /// `value` is dropped in that case.
    pub fn create(&self, value: T) -> Result<&T, SingletonError> {
        let mut created = false;
        let instance = self.get_or_init(|| {
            created = true;
            value
        });

        if created {
            Ok(instance)
        } else {
            Err(SingletonError::AlreadyCreated {
                type_name: type_name::<T>(),
            })
        }
    }

    /// Get the instance.
    ///
    /// # Errors
    ///
    /// Returns [`SingletonError::NotCreated`] until the instance exists.
    pub fn get(&self) -> Result<&T, SingletonError> {
        self.cell.get().ok_or(SingletonError::NotCreated {
            type_name: type_name::<T>(),
        })
    }

    /// Whether the instance exists.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Default> Singleton<T> {
    /// Get the instance, default-constructing it on first access.
    pub fn instance(&self) -> &T {
        self.get_or_init(T::default)
    }
}

impl<T> Default for Singleton<T> {
    fn default() -> Self {
        Self::new()
    }
}
