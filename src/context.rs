// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Per-invocation action context.
//!
//! Payloads are typed by action kind; a handler asks for its own kind and gets back the
//! matching variant or nothing.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smol_str::SmolStr;

use crate::assets::{AssetSource, SlideSpec};
use crate::model::{ElementId, TreeNode};

/// Action identifier. Unknown identifiers are kept verbatim and served by the default handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    ExpandMindmap,
    BrainstormMindmap,
    CreateSlides,
    CreateImage,
    MakeItReal,
    Other(SmolStr),
}

impl ActionKind {
    pub const BUILTIN: [ActionKind; 5] = [
        ActionKind::ExpandMindmap,
        ActionKind::BrainstormMindmap,
        ActionKind::CreateSlides,
        ActionKind::CreateImage,
        ActionKind::MakeItReal,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::ExpandMindmap => "expandMindmap",
            Self::BrainstormMindmap => "brainstormMindmap",
            Self::CreateSlides => "createSlides",
            Self::CreateImage => "createImage",
            Self::MakeItReal => "makeItReal",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Tag of the payload variant this kind carries.
    fn payload_tag(&self) -> &'static str {
        match self {
            Self::ExpandMindmap => "expandMindmap",
            Self::BrainstormMindmap => "brainstormMindmap",
            Self::CreateSlides => "createSlides",
            Self::CreateImage => "createImage",
            Self::MakeItReal => "makeItReal",
            Self::Other(_) => "text",
        }
    }
}

impl FromStr for ActionKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "expandMindmap" => Self::ExpandMindmap,
            "brainstormMindmap" => Self::BrainstormMindmap,
            "createSlides" => Self::CreateSlides,
            "createImage" => Self::CreateImage,
            "makeItReal" => Self::MakeItReal,
            other => Self::Other(SmolStr::new(other)),
        })
    }
}

impl From<&str> for ActionKind {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(kind) => kind,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = SmolStr::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionPayload {
    /// Children of `tree` are grafted under the existing node `target`.
    ExpandMindmap { target: ElementId, tree: TreeNode },
    BrainstormMindmap { tree: TreeNode },
    CreateSlides { slides: Vec<SlideSpec> },
    CreateImage { images: Vec<AssetSource> },
    MakeItReal { html: String },
    /// The assistant's raw textual answer.
    Text { answer: String },
}

impl ActionPayload {
    /// Decodes the JSON body of a payload for `kind`.
    pub fn from_json(kind: &ActionKind, mut value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if let serde_json::Value::Object(fields) = &mut value {
            fields.insert("kind".to_owned(), kind.payload_tag().into());
        }
        serde_json::from_value(value)
    }

    /// True when there is nothing to insert.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::ExpandMindmap { tree, .. } => tree.children.is_empty(),
            Self::BrainstormMindmap { tree } => tree.is_blank(),
            Self::CreateSlides { slides } => slides.is_empty(),
            Self::CreateImage { images } => images.is_empty(),
            Self::MakeItReal { html } => html.trim().is_empty(),
            Self::Text { answer } => answer.trim().is_empty(),
        }
    }
}

/// Typed payload map scoped to one action invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionContext {
    payloads: BTreeMap<ActionKind, ActionPayload>,
}

impl ActionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: ActionKind, payload: ActionPayload) -> Self {
        self.set(kind, payload);
        self
    }

    pub fn set(&mut self, kind: ActionKind, payload: ActionPayload) -> Option<ActionPayload> {
        self.payloads.insert(kind, payload)
    }

    pub fn get(&self, kind: &ActionKind) -> Option<&ActionPayload> {
        self.payloads.get(kind)
    }

    pub fn remove(&mut self, kind: &ActionKind) -> Option<ActionPayload> {
        self.payloads.remove(kind)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ActionContext, ActionKind, ActionPayload};
    use crate::model::TreeNode;

    #[test]
    fn kinds_parse_known_and_unknown_ids() {
        assert_eq!(ActionKind::from("expandMindmap"), ActionKind::ExpandMindmap);
        assert_eq!(ActionKind::from("summarize").as_str(), "summarize");
        for kind in ActionKind::BUILTIN {
            assert_eq!(ActionKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn payload_json_is_decoded_for_the_given_kind() {
        let payload = ActionPayload::from_json(
            &ActionKind::ExpandMindmap,
            json!({ "target": "el-3", "tree": { "text": "x", "children": [{ "text": "y" }] } }),
        )
        .expect("decode");
        assert!(matches!(&payload, ActionPayload::ExpandMindmap { target, .. } if target.as_str() == "el-3"));
        assert!(!payload.is_empty());

        let text = ActionPayload::from_json(&ActionKind::from("translate"), json!({ "answer": " " }))
            .expect("decode");
        assert!(text.is_empty());

        assert!(ActionPayload::from_json(&ActionKind::MakeItReal, json!({ "answer": "x" })).is_err());
    }

    #[test]
    fn context_is_keyed_by_kind() {
        let tree = TreeNode::new("idea");
        let ctx = ActionContext::new()
            .with(ActionKind::BrainstormMindmap, ActionPayload::BrainstormMindmap { tree: tree.clone() });

        assert_eq!(
            ctx.get(&ActionKind::BrainstormMindmap),
            Some(&ActionPayload::BrainstormMindmap { tree })
        );
        assert_eq!(ctx.get(&ActionKind::ExpandMindmap), None);
        assert_eq!(ctx.len(), 1);
    }
}
