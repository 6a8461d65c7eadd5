/*
 * Ordered id registry used for a slot's native controls and an application's
 * extras (timers). Ids are `CONTROL_ID_BASE + index`, where index is the
 * registry length at registration time.
 *
 * Removal leaves a tombstone in place instead of compacting, so the ids of live
 * siblings keep matching the ids baked into their native child windows.
 */
use crate::types::ControlId;

/// First id handed out by every registry.
pub const CONTROL_ID_BASE: i32 = 10001;

#[derive(Debug, Clone)]
pub struct IdRegistry<T> {
    entries: Vec<Option<T>>,
}

impl<T> Default for IdRegistry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> IdRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next `register` call will return.
    pub fn next_id(&self) -> ControlId {
        ControlId::new(CONTROL_ID_BASE + self.entries.len() as i32)
    }

    pub fn register(&mut self, entry: T) -> ControlId {
        let id = self.next_id();
        self.entries.push(Some(entry));
        id
    }

    /// Looks up `id`; `None` when out of range or tombstoned.
    pub fn resolve(&self, id: ControlId) -> Option<&T> {
        let index = Self::index_of_id(id)?;
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Tombstones the first live entry matching `pred` and returns its id.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> Option<ControlId> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.as_ref().is_some_and(&pred))?;
        self.entries[index] = None;
        Some(ControlId::new(CONTROL_ID_BASE + index as i32))
    }

    /// Tombstones the entry at `id`, returning it if it was live.
    pub fn remove_id(&mut self, id: ControlId) -> Option<T> {
        let index = Self::index_of_id(id)?;
        self.entries.get_mut(index).and_then(Option::take)
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<(ControlId, &T)> {
        self.iter_live().find(|(_, entry)| pred(entry))
    }

    pub fn iter_live(&self) -> impl Iterator<Item = (ControlId, &T)> {
        self.entries.iter().enumerate().filter_map(|(index, entry)| {
            entry
                .as_ref()
                .map(|e| (ControlId::new(CONTROL_ID_BASE + index as i32), e))
        })
    }

    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Number of allocated ids, tombstones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry; ids restart at the base.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn index_of_id(id: ControlId) -> Option<usize> {
        usize::try_from(id.raw().checked_sub(CONTROL_ID_BASE)?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_assigns_sequential_ids_from_base() {
        let mut registry = IdRegistry::new();
        assert_eq!(registry.register("a").raw(), CONTROL_ID_BASE);
        assert_eq!(registry.register("b").raw(), CONTROL_ID_BASE + 1);
        assert_eq!(registry.register("c").raw(), CONTROL_ID_BASE + 2);
    }

    #[test]
    fn removing_middle_entry_keeps_later_ids_stable() {
        // Arrange
        let mut registry = IdRegistry::new();
        let first = registry.register(1);
        let second = registry.register(2);
        let third = registry.register(3);
        // Act
        let removed = registry.remove_where(|v| *v == 2);
        // Assert
        assert_eq!(removed, Some(second));
        assert_eq!(registry.resolve(first), Some(&1));
        assert_eq!(registry.resolve(second), None);
        assert_eq!(registry.resolve(third), Some(&3));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn tombstones_are_not_reused_by_later_registrations() {
        let mut registry = IdRegistry::new();
        registry.register('a');
        let b = registry.register('b');
        registry.remove_id(b);
        let c = registry.register('c');
        assert_eq!(c.raw(), CONTROL_ID_BASE + 2);
        assert_eq!(registry.resolve(b), None);
    }

    #[test]
    fn resolve_rejects_ids_outside_the_registry() {
        let mut registry = IdRegistry::new();
        registry.register(7);
        assert_eq!(registry.resolve(ControlId::new(CONTROL_ID_BASE - 1)), None);
        assert_eq!(registry.resolve(ControlId::new(CONTROL_ID_BASE + 1)), None);
        assert_eq!(registry.resolve(ControlId::new(i32::MIN)), None);
        assert_eq!(registry.resolve(ControlId::new(0)), None);
    }

    #[test]
    fn survivors_resolve_after_arbitrary_removals() {
        let mut registry = IdRegistry::new();
        let ids: Vec<ControlId> = (0..20).map(|v| registry.register(v)).collect();
        for victim in [3, 0, 19, 7, 8, 12] {
            registry.remove_where(|v| *v == victim);
        }
        for (value, id) in ids.iter().enumerate() {
            let expected = if [3, 0, 19, 7, 8, 12].contains(&value) {
                None
            } else {
                Some(&value)
            };
            assert_eq!(registry.resolve(*id), expected, "id {}", id.raw());
        }
    }

    #[test]
    fn find_skips_tombstones() {
        let mut registry = IdRegistry::new();
        registry.register(5);
        registry.register(5);
        registry.remove_where(|v| *v == 5);
        let (id, value) = registry.find(|v| *v == 5).expect("second entry is live");
        assert_eq!(id.raw(), CONTROL_ID_BASE + 1);
        assert_eq!(*value, 5);
    }

    #[test]
    fn clear_restarts_ids_at_base() {
        let mut registry = IdRegistry::new();
        registry.register(1);
        registry.register(2);
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.next_id().raw(), CONTROL_ID_BASE);
    }
}
