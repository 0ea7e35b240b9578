// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::model::AssetId;
use crate::ops::AssetLookup;

/// Resolved asset payloads keyed by asset id.
///
/// Cloning shares the underlying table: the pipeline binds into it and the document
/// store consults it before committing any image that references an asset.
#[derive(Debug, Clone, Default)]
pub struct AssetBinding {
    inner: Arc<Mutex<BTreeMap<AssetId, Arc<[u8]>>>>,
}

impl AssetBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&self, asset_id: AssetId, bytes: impl Into<Arc<[u8]>>) {
        let bytes = bytes.into();
        tracing::trace!(asset_id = %asset_id, len = bytes.len(), "asset bound");
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).insert(asset_id, bytes);
    }

    pub fn get(&self, asset_id: &AssetId) -> Option<Arc<[u8]>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).get(asset_id).cloned()
    }

    pub fn contains(&self, asset_id: &AssetId) -> bool {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).contains_key(asset_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<AssetId> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }
}

impl AssetLookup for AssetBinding {
    fn is_bound(&self, asset_id: &AssetId) -> bool {
        self.contains(asset_id)
    }
}
