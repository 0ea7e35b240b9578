// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Asynchronous asset resolution.
//!
//! Remote assets are fetched, bound into the shared [`AssetBinding`] and only then
//! referenced by document mutations.

pub mod binding;
pub mod fetch;
pub mod images;
pub mod pipeline;

pub use binding::AssetBinding;
pub use fetch::{AssetError, AssetFetcher, DataUrlFetcher, FileFetcher, RoutingFetcher};
pub use images::DocumentImageDrop;
pub use pipeline::{
    AssetPipeline, AssetResolver, AssetSource, DocumentSlideInstantiator, PipelineError, PipelineReport,
    SlideSpec, SlideTemplate, TemplateInstantiator,
};
