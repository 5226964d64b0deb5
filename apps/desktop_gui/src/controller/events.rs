//! Backend-to-UI events and the alerts they raise.

use shared::domain::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Info(String),
    ItemsLoaded(Vec<Item>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadItems,
    CreateItem,
    UpdateItem,
    DeleteItem,
}

impl UiErrorContext {
    pub fn title(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Startup error",
            UiErrorContext::LoadItems => "Error loading",
            UiErrorContext::CreateItem => "Error creating",
            UiErrorContext::UpdateItem => "Error updating",
            UiErrorContext::DeleteItem => "Error deleting",
        }
    }
}

/// A failed remote call, shown verbatim in a blocking alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn title(&self) -> &'static str {
        self.context.title()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
