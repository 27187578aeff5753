use std::collections::VecDeque;

use crate::domain::notification::NotificationItem;
use crate::domain::types::NotificationId;

/// Oldest entries are dropped past this many pending notifications.
pub const MAX_NOTIFICATIONS: usize = 20;

/// FIFO of pending notifications. Expiry is scheduled by the store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NotificationQueue {
    items: VecDeque<NotificationItem>,
}

impl NotificationQueue {
    pub fn push(&mut self, item: NotificationItem) -> NotificationId {
        let id = item.id;
        self.items.push_back(item);
        while self.items.len() > MAX_NOTIFICATIONS {
            self.items.pop_front();
        }
        id
    }

    /// Removes the item with `id`; returns false (and changes nothing) when absent.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: NotificationId) -> Option<&NotificationItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NotificationItem> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&NotificationItem> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
