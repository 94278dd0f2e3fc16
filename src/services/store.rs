use std::collections::HashSet;

use chrono::Utc;

use crate::models::{Category, ChatThread, Message, ThreadId};

/// All chat threads plus the pointer to the one on screen.
///
/// The store is the single writer for thread state: every change goes through
/// one of its methods, and each change raises a flag the shell drains with
/// [`ChatStore::take_changed`] to persist and redraw.
#[derive(Debug, Default)]
pub struct ChatStore {
    threads: Vec<ChatThread>,
    active: Option<ThreadId>,
    changed: bool,
}

impl ChatStore {
    /// Take ownership of a loaded thread list. Later copies of a repeated id
    /// are dropped.
    pub fn new(mut threads: Vec<ChatThread>) -> Self {
        let loaded = threads.len();
        let mut seen = HashSet::with_capacity(loaded);
        threads.retain(|t| seen.insert(t.id));

        let dropped = loaded - threads.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped threads with duplicate ids");
        }

        Self {
            threads,
            active: None,
            changed: dropped > 0,
        }
    }

    pub fn threads(&self) -> &[ChatThread] {
        &self.threads
    }

    pub fn active_id(&self) -> Option<ThreadId> {
        self.active
    }

    pub fn active(&self) -> Option<&ChatThread> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ThreadId) -> Option<&ChatThread> {
        self.threads.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: ThreadId) -> Option<&mut ChatThread> {
        self.threads.iter_mut().find(|t| t.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn create_thread(&mut self) -> &ChatThread {
        self.create_thread_at(Utc::now().timestamp_millis())
    }

    fn create_thread_at(&mut self, now_ms: i64) -> &ChatThread {
        let id = match self.threads.iter().map(|t| t.id).max() {
            Some(newest) if newest >= now_ms => match newest.checked_add(1) {
                Some(id) => id,
                // Every id below the oldest one is free
                None => self
                    .threads
                    .iter()
                    .map(|t| t.id)
                    .min()
                    .unwrap_or(newest)
                    .saturating_sub(1),
            },
            _ => now_ms,
        };
        self.threads.push(ChatThread::new(id));
        self.active = Some(id);
        self.changed = true;
        tracing::debug!(id, "Created thread");
        &self.threads[self.threads.len() - 1]
    }

    pub fn select_thread(&mut self, id: ThreadId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.active != Some(id) {
            self.active = Some(id);
            self.changed = true;
        }
        true
    }

    pub fn delete_thread(&mut self, id: ThreadId) -> bool {
        let before = self.threads.len();
        self.threads.retain(|t| t.id != id);
        if self.threads.len() == before {
            return false;
        }
        if self.active == Some(id) {
            self.active = None;
        }
        self.changed = true;
        true
    }

    pub fn clear_all(&mut self) {
        self.threads.clear();
        self.active = None;
        self.changed = true;
    }

    /// Append to the given thread, or with `None` to the active thread
    /// (creating one when nothing is active). Returns the thread the message
    /// landed in, or `None` if the given thread no longer exists.
    pub fn append_message(
        &mut self,
        thread_id: Option<ThreadId>,
        message: Message,
    ) -> Option<ThreadId> {
        let id = match thread_id {
            Some(id) => id,
            None => match self.active {
                Some(id) => id,
                None => self.create_thread().id,
            },
        };

        let thread = self.get_mut(id)?;
        thread.messages.push(message);
        self.changed = true;
        Some(id)
    }

    pub fn set_category(&mut self, id: ThreadId, category: Option<Category>) -> bool {
        let Some(thread) = self.get_mut(id) else {
            return false;
        };
        thread.category = category;
        self.changed = true;
        true
    }

    pub fn rename_thread(&mut self, id: ThreadId, title: impl Into<String>) -> bool {
        let Some(thread) = self.get_mut(id) else {
            return false;
        };
        thread.title = title.into();
        self.changed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_TITLE;

    fn assert_unique_ids(store: &ChatStore) {
        let ids: HashSet<_> = store.threads().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), store.threads().len());
    }

    #[test]
    fn test_create_thread_becomes_active() {
        let mut store = ChatStore::default();
        let id = store.create_thread().id;

        assert_eq!(store.active_id(), Some(id));
        let thread = store.active().unwrap();
        assert_eq!(thread.title, DEFAULT_TITLE);
        assert!(thread.messages.is_empty());
        assert!(thread.category.is_none());
        assert!(store.take_changed());
        assert!(!store.take_changed());
    }

    #[test]
    fn test_ids_unique_within_one_tick() {
        let mut store = ChatStore::default();
        let a = store.create_thread_at(1_000).id;
        let b = store.create_thread_at(1_000).id;
        let c = store.create_thread_at(999).id;

        assert_eq!((a, b, c), (1_000, 1_001, 1_002));
        assert_unique_ids(&store);
    }

    #[test]
    fn test_ids_unique_across_create_delete_clear() {
        let mut store = ChatStore::default();
        for round in 0..3 {
            let ids: Vec<_> = (0..5).map(|_| store.create_thread().id).collect();
            assert_unique_ids(&store);

            store.delete_thread(ids[round]);
            store.create_thread();
            assert_unique_ids(&store);

            if round == 1 {
                store.clear_all();
                assert!(store.is_empty());
            }
        }
        assert_unique_ids(&store);
    }

    #[test]
    fn test_ids_increase_after_reload() {
        let mut store = ChatStore::new(vec![ChatThread::new(i64::MAX - 10)]);
        let id = store.create_thread().id;
        assert_eq!(id, i64::MAX - 9);
    }

    #[test]
    fn test_ids_stay_unique_at_the_top_of_the_range() {
        let mut store = ChatStore::new(vec![ChatThread::new(5), ChatThread::new(i64::MAX)]);
        let id = store.create_thread_at(1_000).id;
        assert_eq!(id, 4);
        assert_unique_ids(&store);
    }

    #[test]
    fn test_duplicate_ids_dropped_on_load() {
        let mut first = ChatThread::new(42);
        first.title = "first".to_string();
        let mut copy = ChatThread::new(42);
        copy.title = "copy".to_string();

        let mut store = ChatStore::new(vec![first, ChatThread::new(7), copy]);
        assert_eq!(store.threads().len(), 2);
        assert_eq!(store.get(42).unwrap().title, "first");
        assert_unique_ids(&store);
        assert!(store.take_changed());

        assert!(store.delete_thread(42));
        assert_eq!(store.threads().len(), 1);
    }

    #[test]
    fn test_clean_load_is_not_a_change() {
        let mut store = ChatStore::new(vec![ChatThread::new(1), ChatThread::new(2)]);
        assert!(!store.take_changed());
    }

    #[test]
    fn test_select_unknown_thread_is_noop() {
        let mut store = ChatStore::default();
        let id = store.create_thread().id;
        store.take_changed();

        assert!(!store.select_thread(id + 100));
        assert_eq!(store.active_id(), Some(id));
        assert!(!store.take_changed());
    }

    #[test]
    fn test_delete_active_clears_pointer() {
        let mut store = ChatStore::default();
        let first = store.create_thread_at(10).id;
        let second = store.create_thread_at(20).id;
        assert_eq!(store.active_id(), Some(second));

        assert!(store.delete_thread(second));
        assert_eq!(store.active_id(), None);
        assert!(store.get(first).is_some());
    }

    #[test]
    fn test_delete_other_keeps_pointer() {
        let mut store = ChatStore::default();
        let first = store.create_thread_at(10).id;
        let second = store.create_thread_at(20).id;

        assert!(store.delete_thread(first));
        assert_eq!(store.active_id(), Some(second));

        assert!(!store.delete_thread(first));
        assert_eq!(store.active_id(), Some(second));
    }

    #[test]
    fn test_clear_all() {
        let mut store = ChatStore::default();
        store.create_thread_at(1);
        store.create_thread_at(2);
        store.take_changed();

        store.clear_all();
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
        assert!(store.take_changed());
    }

    #[test]
    fn test_append_without_active_creates_thread() {
        let mut store = ChatStore::default();
        let id = store.append_message(None, Message::user("cats")).unwrap();

        assert_eq!(store.active_id(), Some(id));
        assert_eq!(store.threads().len(), 1);
        assert_eq!(store.active().unwrap().messages, vec![Message::user("cats")]);
    }

    #[test]
    fn test_append_to_specific_thread() {
        let mut store = ChatStore::default();
        let first = store.create_thread_at(10).id;
        let second = store.create_thread_at(20).id;

        assert_eq!(
            store.append_message(Some(first), Message::reply("hi", false)),
            Some(first)
        );
        assert_eq!(store.get(first).unwrap().messages.len(), 1);
        assert!(store.get(second).unwrap().messages.is_empty());
        assert_eq!(store.active_id(), Some(second));
    }

    #[test]
    fn test_append_to_deleted_thread_is_dropped() {
        let mut store = ChatStore::default();
        let id = store.create_thread().id;
        store.delete_thread(id);

        assert_eq!(store.append_message(Some(id), Message::user("late")), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_category_created_by_id() {
        let mut store = ChatStore::default();
        store.create_thread_at(10);
        let id = store.create_thread_at(20).id;

        assert!(store.set_category(id, Some(Category::Work)));
        assert!(store.rename_thread(id, "New Work Chat"));

        let thread = store.get(id).unwrap();
        assert_eq!(thread.category, Some(Category::Work));
        assert_eq!(thread.title, "New Work Chat");
        assert!(store.get(10).unwrap().category.is_none());

        assert!(!store.set_category(999, Some(Category::Study)));
        assert!(!store.rename_thread(999, "nope"));
    }
}
