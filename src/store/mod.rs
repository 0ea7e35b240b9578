// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The document store seam.
//!
//! All structural writes go through `transact`, which applies a batch atomically; reads
//! may happen at any time and always observe a fully committed revision.

pub mod memory;

use std::sync::Arc;

use crate::model::{Document, DocumentElement, ElementId};
use crate::ops::{ApplyError, ApplyResult, Op};

pub use memory::SharedDocument;

/// A committed transaction as seen by observers (renderer, undo log, tests).
#[derive(Debug)]
pub struct Commit<'a> {
    pub document: &'a Document,
    pub result: &'a ApplyResult,
}

pub type CommitObserver = Arc<dyn Fn(&Commit<'_>) + Send + Sync>;

pub trait DocumentStore: Send + Sync {
    /// A consistent copy of the latest committed document.
    fn snapshot(&self) -> Document;

    fn rev(&self) -> u64;

    fn element(&self, id: &ElementId) -> Option<DocumentElement>;

    /// Reserves a fresh element id. Reserving is not a structural write.
    fn allocate_id(&self) -> ElementId;

    /// Applies `ops` as one atomic unit.
    fn transact(&self, ops: &[Op]) -> Result<ApplyResult, ApplyError>;

    /// Registers an observer called after every successful, non-empty commit, in
    /// revision order. Observers run before the next commit can start and must not
    /// call back into the store; the committed document is passed in.
    fn subscribe(&self, observer: CommitObserver);
}
