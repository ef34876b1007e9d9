//! Registry of key-down listeners (the document-level input stream)

use super::SlotId;

/// Handle returned when a behavior starts listening for keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Key listeners in registration order.
#[derive(Debug, Default)]
pub struct KeyListeners {
    entries: Vec<(ListenerId, SlotId)>,
    next_id: u64,
}

impl KeyListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, slot: SlotId) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, slot));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(lid, _)| *lid != id);
        self.entries.len() != before
    }

    /// Remove every listener owned by `slot`, returning how many there were.
    pub fn remove_slot(&mut self, slot: SlotId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, s)| *s != slot);
        before - self.entries.len()
    }

    /// Slots to notify, one entry per registered listener.
    pub fn slots(&self) -> Vec<SlotId> {
        self.entries.iter().map(|(_, s)| *s).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
