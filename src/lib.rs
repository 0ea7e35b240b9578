// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mindweave: dispatches structured AI action results into atomic edits on a
//! tree-structured canvas document.

pub mod assets;
pub mod config;
pub mod context;
pub mod convert;
pub mod dispatch;
pub mod host;
pub mod layout;
pub mod merge;
pub mod model;
pub mod ops;
pub mod script;
pub mod store;
