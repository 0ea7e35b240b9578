// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Buffered mutation batches with post-commit callbacks.

use crate::layout::MindmapLayoutError;
use crate::store::DocumentStore;

use super::{ApplyError, ApplyResult, Delta, Op};

/// A callable that runs only after the owning transaction committed.
pub type Deferred = Box<dyn FnOnce(&dyn DocumentStore) -> Result<(), DeferredError> + Send>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DeferredError {
    #[error(transparent)]
    Apply(#[from] ApplyError),
    #[error(transparent)]
    Layout(#[from] MindmapLayoutError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommitOutcome {
    pub result: ApplyResult,
    /// Failures of deferred callables; they never undo the commit.
    pub deferred_failures: Vec<DeferredError>,
}

/// Collects ops and applies them to the store as a single atomic unit.
///
/// Not reentrant: a handler opens at most one transaction per invocation.
pub struct Transaction<'s> {
    store: &'s dyn DocumentStore,
    label: &'static str,
    ops: Vec<Op>,
    deferred: Vec<(&'static str, Deferred)>,
    finished: bool,
}

impl<'s> Transaction<'s> {
    pub fn open(store: &'s dyn DocumentStore, label: &'static str) -> Self {
        tracing::trace!(txn = label, rev = store.rev(), "transaction opened");
        Self { store, label, ops: Vec::new(), deferred: Vec::new(), finished: false }
    }

    pub fn store(&self) -> &'s dyn DocumentStore {
        self.store
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Schedules `f` to run after commit, in scheduling order.
    pub fn defer(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&dyn DocumentStore) -> Result<(), DeferredError> + Send + 'static,
    ) {
        self.deferred.push((name, Box::new(f)));
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.deferred.is_empty()
    }

    /// Applies every buffered op, then runs the deferred callables.
    ///
    /// When the store rejects the batch nothing is applied and no deferred callable runs.
    pub fn commit(mut self) -> Result<CommitOutcome, ApplyError> {
        self.finished = true;
        let ops = std::mem::take(&mut self.ops);
        let deferred = std::mem::take(&mut self.deferred);

        let result = if ops.is_empty() {
            ApplyResult { new_rev: self.store.rev(), applied: 0, delta: Delta::default() }
        } else {
            self.store.transact(&ops)?
        };

        let mut deferred_failures = Vec::new();
        for (name, f) in deferred {
            if let Err(err) = f(self.store) {
                tracing::warn!(txn = self.label, deferred = name, error = %err, "deferred op failed");
                deferred_failures.push(err);
            }
        }

        Ok(CommitOutcome { result, deferred_failures })
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.is_empty() {
            tracing::debug!(
                txn = self.label,
                ops = self.ops.len(),
                deferred = self.deferred.len(),
                "transaction dropped without commit"
            );
        }
    }
}
