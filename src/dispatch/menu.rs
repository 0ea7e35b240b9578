// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mindweave-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mindweave and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The follow-up menu shown with an action's result.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::context::{ActionContext, ActionKind};

use super::{ActionHandler, DispatchError, HandlerOutcome, Services};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuCommand {
    ContinueInChat,
    Insert,
    Retry,
    Discard,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 4] =
        [MenuCommand::ContinueInChat, MenuCommand::Insert, MenuCommand::Retry, MenuCommand::Discard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ContinueInChat => "continue-in-chat",
            Self::Insert => "insert",
            Self::Retry => "retry",
            Self::Discard => "discard",
        }
    }
}

impl fmt::Display for MenuCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type MenuHandler = Arc<dyn Fn() -> Result<(), DispatchError> + Send + Sync>;

#[derive(Clone)]
pub struct MenuItem {
    pub name: &'static str,
    pub icon: &'static str,
    pub command: MenuCommand,
    pub handler: MenuHandler,
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("name", &self.name)
            .field("icon", &self.icon)
            .field("command", &self.command)
            .finish()
    }
}

/// Ordered, declarative list of result commands.
#[derive(Debug, Clone)]
pub struct ResultMenu {
    items: Vec<MenuItem>,
    /// Outcomes of insert runs whose background work nobody has awaited yet.
    inserted: Arc<Mutex<Vec<HandlerOutcome>>>,
}

type Cleanup = Box<dyn FnOnce() + Send>;

impl ResultMenu {
    pub(crate) fn build(
        services: Arc<Services>,
        action: ActionKind,
        ctx: Arc<ActionContext>,
        handler: Arc<dyn ActionHandler>,
        on_discard: Cleanup,
    ) -> Self {
        let continue_in_chat: MenuHandler = {
            let services = services.clone();
            let action = action.clone();
            Arc::new(move || {
                services.chat.continue_in_chat(action.as_str());
                Ok(())
            })
        };

        let inserted = Arc::new(Mutex::new(Vec::new()));
        let insert: MenuHandler = {
            let services = services.clone();
            let inserted = inserted.clone();
            Arc::new(move || {
                let outcome = handler.handle(&services, &action, &ctx)?;
                tracing::info!(
                    action = %action,
                    created = outcome.created.len(),
                    background = outcome.background.is_some(),
                    "result inserted"
                );
                inserted.lock().unwrap_or_else(PoisonError::into_inner).push(outcome);
                services.panel.hide();
                Ok(())
            })
        };

        let retry: MenuHandler = {
            let services = services.clone();
            Arc::new(move || {
                services.panel.generate();
                Ok(())
            })
        };

        // The cleanup is single-use; later discards only hide the panel.
        let cleanup = Arc::new(Mutex::new(Some(on_discard)));
        let discard: MenuHandler = Arc::new(move || {
            let cleanup = cleanup.lock().unwrap_or_else(PoisonError::into_inner).take();
            services.panel.discard(Box::new(move || {
                if let Some(cleanup) = cleanup {
                    cleanup();
                }
            }));
            services.panel.hide();
            Ok(())
        });

        let item = |command: MenuCommand, name, icon, handler| MenuItem { name, icon, command, handler };
        Self {
            items: vec![
                item(MenuCommand::ContinueInChat, "Continue in chat", "chat", continue_in_chat),
                item(MenuCommand::Insert, "Insert", "insert", insert),
                item(MenuCommand::Retry, "Retry", "retry", retry),
                item(MenuCommand::Discard, "Discard", "delete", discard),
            ],
            inserted,
        }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn commands(&self) -> Vec<MenuCommand> {
        self.items.iter().map(|item| item.command).collect()
    }

    pub fn get(&self, command: MenuCommand) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.command == command)
    }

    /// Hands over the outcomes of insert runs so far, background handles included.
    pub fn take_inserted(&self) -> Vec<HandlerOutcome> {
        std::mem::take(&mut *self.inserted.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Waits for the background work of every insert run so far.
    pub async fn settle(&self) {
        for mut outcome in self.take_inserted() {
            outcome.settle().await;
        }
    }

    pub fn run(&self, command: MenuCommand) -> Result<(), DispatchError> {
        tracing::debug!(command = %command, "menu command");
        match self.get(command) {
            Some(item) => (item.handler)(),
            None => Ok(()),
        }
    }
}
