//! Subject configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use shared_subject::{SubjectConfigBuilder, SyncDispatch};
//!
//! let config = SubjectConfigBuilder::new()
//!     .sync_dispatch(SyncDispatch::Snapshot)
//!     .thread_name_prefix("ui-events")
//!     .build()
//!     .expect("Valid config");
//! ```

use crate::error::SubjectError;
use crate::DEFAULT_THREAD_NAME_PREFIX;
use serde::{Deserialize, Serialize};

/// How `notify` walks the observer table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDispatch {
    /// Keep the registry lock for the whole round. Callbacks must not call
    /// back into the same subject.
    #[default]
    HoldLock,
    /// Clone the table under the lock, release it, then invoke. Callbacks may
    /// add, remove or notify re-entrantly; changes apply to later rounds.
    Snapshot,
}

/// What a detached notification unit does when its callback panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsyncPanicPolicy {
    /// Catch the panic, log it and count it in the metrics.
    #[default]
    Log,
    /// Log the panic and abort the process.
    Abort,
}

/// Subject configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// Synchronous dispatch strategy
    pub sync_dispatch: SyncDispatch,
    /// Panic handling inside detached units
    pub panic_policy: AsyncPanicPolicy,
    /// Name prefix for spawned notification threads
    pub thread_name_prefix: String,
    /// Stack size for spawned notification threads (platform default if unset)
    pub stack_size: Option<usize>,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            sync_dispatch: SyncDispatch::default(),
            panic_policy: AsyncPanicPolicy::default(),
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            stack_size: None,
        }
    }
}

impl SubjectConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SubjectError> {
        if self.thread_name_prefix.is_empty() {
            return Err(SubjectError::InvalidConfig(
                "thread_name_prefix cannot be empty".to_string(),
            ));
        }

        // std::thread::Builder panics on interior NUL bytes
        if self.thread_name_prefix.contains('\0') {
            return Err(SubjectError::InvalidConfig(
                "thread_name_prefix cannot contain NUL bytes".to_string(),
            ));
        }

        if self.stack_size == Some(0) {
            return Err(SubjectError::InvalidConfig(
                "stack_size cannot be 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style method to set the synchronous dispatch strategy
    pub fn with_sync_dispatch(mut self, sync_dispatch: SyncDispatch) -> Self {
        self.sync_dispatch = sync_dispatch;
        self
    }

    /// Builder-style method to set the async panic policy
    pub fn with_panic_policy(mut self, panic_policy: AsyncPanicPolicy) -> Self {
        self.panic_policy = panic_policy;
        self
    }
}

/// Builder for SubjectConfig with validation
#[derive(Default)]
pub struct SubjectConfigBuilder {
    sync_dispatch: Option<SyncDispatch>,
    panic_policy: Option<AsyncPanicPolicy>,
    thread_name_prefix: Option<String>,
    stack_size: Option<usize>,
}

impl SubjectConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the synchronous dispatch strategy
    pub fn sync_dispatch(mut self, sync_dispatch: SyncDispatch) -> Self {
        self.sync_dispatch = Some(sync_dispatch);
        self
    }

    /// Set the async panic policy
    pub fn panic_policy(mut self, panic_policy: AsyncPanicPolicy) -> Self {
        self.panic_policy = Some(panic_policy);
        self
    }

    /// Set the name prefix for notification threads
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = Some(prefix.into());
        self
    }

    /// Set the stack size for notification threads
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SubjectConfig, SubjectError> {
        let defaults = SubjectConfig::default();
        let config = SubjectConfig {
            sync_dispatch: self.sync_dispatch.unwrap_or(defaults.sync_dispatch),
            panic_policy: self.panic_policy.unwrap_or(defaults.panic_policy),
            thread_name_prefix: self
                .thread_name_prefix
                .unwrap_or(defaults.thread_name_prefix),
            stack_size: self.stack_size.or(defaults.stack_size),
        };
        config.validate()?;
        Ok(config)
    }
}
