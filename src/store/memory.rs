// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex, PoisonError};

use crate::assets::AssetBinding;
use crate::model::{Document, DocumentElement, ElementId};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op};

use super::{Commit, CommitObserver, DocumentStore};

/// In-memory document store shared between handlers and background pipelines.
#[derive(Clone)]
pub struct SharedDocument {
    document: Arc<Mutex<Document>>,
    observers: Arc<Mutex<Vec<CommitObserver>>>,
    assets: AssetBinding,
}

impl SharedDocument {
    pub fn new(assets: AssetBinding) -> Self {
        Self::with_document(Document::new(), assets)
    }

    pub fn with_document(document: Document, assets: AssetBinding) -> Self {
        Self {
            document: Arc::new(Mutex::new(document)),
            observers: Arc::new(Mutex::new(Vec::new())),
            assets,
        }
    }

    pub fn assets(&self) -> &AssetBinding {
        &self.assets
    }

    /// Runs with the document lock held; observers must not call back into the store.
    fn notify(&self, document: &Document, result: &ApplyResult) {
        let observers = self.observers.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let commit = Commit { document, result };
        for observer in observers {
            observer(&commit);
        }
    }
}

impl std::fmt::Debug for SharedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDocument").field("rev", &self.rev()).finish_non_exhaustive()
    }
}

impl DocumentStore for SharedDocument {
    fn snapshot(&self) -> Document {
        self.document.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn rev(&self) -> u64 {
        self.document.lock().unwrap_or_else(PoisonError::into_inner).rev()
    }

    fn element(&self, id: &ElementId) -> Option<DocumentElement> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner).element(id).cloned()
    }

    fn allocate_id(&self) -> ElementId {
        self.document.lock().unwrap_or_else(PoisonError::into_inner).allocate_id()
    }

    fn transact(&self, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        let base_rev = document.rev();
        let result = apply_ops(&mut document, base_rev, ops, &self.assets).map_err(|err| {
            tracing::warn!(rev = base_rev, ops = ops.len(), error = %err, "transaction rejected");
            err
        })?;

        tracing::debug!(
            rev = result.new_rev,
            applied = result.applied,
            added = result.delta.added.len(),
            removed = result.delta.removed.len(),
            updated = result.delta.updated.len(),
            "transaction committed"
        );
        // Still under the document lock, so observers see commits in revision order.
        if result.applied > 0 {
            self.notify(&document, &result);
        }
        Ok(result)
    }

    fn subscribe(&self, observer: CommitObserver) {
        self.observers.lock().unwrap_or_else(PoisonError::into_inner).push(observer);
    }
}
