//! Notification port
//!
//! Page handlers report outcomes through a [`Notifier`] they are given,
//! instead of a global toast function.

use log::{info, warn};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success {
        title: String,
    },
    Error {
        title: String,
        description: String,
    },
}

impl Notification {
    pub fn title(&self) -> &str {
        match self {
            Notification::Success { title } | Notification::Error { title, .. } => title,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notification::Error { .. })
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, title: &str) {
        self.notify(Notification::Success {
            title: title.to_string(),
        });
    }

    fn error(&self, title: &str, description: &str) {
        self.notify(Notification::Error {
            title: title.to_string(),
            description: description.to_string(),
        });
    }
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success { title } => info!("{}", title),
            Notification::Error { title, description } => warn!("{}: {}", title, description),
        }
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("Cliente atualizado com sucesso!");
        notifier.error("Falha ao excluir cliente", "not found");

        let entries = notifier.entries();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].is_error());
        assert_eq!(entries[1].title(), "Falha ao excluir cliente");
        assert!(notifier.last().unwrap().is_error());

        notifier.clear();
        assert!(notifier.entries().is_empty());
    }
}
