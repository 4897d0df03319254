//! Per-operation timeouts
//!
//! Create, Read, Update and Delete each get an independent timeout. The host
//! hands the configured values down; resources turn them into a [`Context`]
//! before calling out to the remote API.

use crate::context::Context;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

impl ResourceTimeouts {
    pub fn new(create: Duration, read: Duration, update: Duration, delete: Duration) -> Self {
        Self {
            create,
            read,
            update,
            delete,
        }
    }

    /// Timeouts for a data source, which only ever reads
    pub fn read_only(read: Duration) -> Self {
        Self {
            read,
            ..Self::default()
        }
    }

    pub fn for_operation(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }

    /// Derives the context an operation runs under from the request context
    pub fn context_for(&self, ctx: Context, operation: Operation) -> Context {
        ctx.with_timeout(self.for_operation(operation))
    }
}
