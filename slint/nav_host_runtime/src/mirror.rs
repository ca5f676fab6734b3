//! Shadow copy of the host stack's entry names.
//!
//! The host only offers push, pop and pop-to-marker, and may be mutated
//! behind our back between batches, so the mirror is rebuilt from the host at
//! the start of every batch and kept in step with each host call after that.

use crate::error::NavError;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct StackMirror {
    keys: Vec<String>,
}

impl StackMirror {
    pub(crate) fn sync_from(&mut self, entries: impl IntoIterator<Item = String>) {
        self.keys.clear();
        self.keys.extend(entries);
    }

    pub(crate) fn keys(&self) -> &[String] {
        &self.keys
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn top(&self) -> Option<&str> {
        self.keys.last().map(String::as_str)
    }

    pub(crate) fn push(&mut self, key: String) {
        self.keys.push(key);
    }

    pub(crate) fn pop(&mut self) -> Option<String> {
        self.keys.pop()
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    /// Index of the topmost entry named `key`; pop-to-marker on the host
    /// resolves to the same entry.
    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.keys.iter().rposition(|entry| entry == key)
    }

    /// Drop every key strictly above `index`, returning how many were removed.
    pub(crate) fn truncate_above(&mut self, index: usize) -> Result<usize, NavError> {
        let len = self.keys.len();
        if index >= len {
            return Err(NavError::MirrorInvariant {
                key: self.top().unwrap_or_default().to_string(),
                index,
                len,
            });
        }

        let removed = len - 1 - index;
        self.keys.truncate(index + 1);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror_of(keys: &[&str]) -> StackMirror {
        let mut mirror = StackMirror::default();
        mirror.sync_from(keys.iter().map(|key| key.to_string()));
        mirror
    }

    #[test]
    fn sync_replaces_previous_contents() {
        let mut mirror = mirror_of(&["a", "b", "c"]);
        mirror.sync_from(vec!["x".to_string()]);
        assert_eq!(mirror.keys(), ["x"]);
        assert_eq!(mirror.top(), Some("x"));
    }

    #[test]
    fn truncate_above_keeps_target() {
        let mut mirror = mirror_of(&["a", "b", "c", "d"]);
        assert_eq!(mirror.truncate_above(1), Ok(2));
        assert_eq!(mirror.keys(), ["a", "b"]);
        assert_eq!(mirror.truncate_above(1), Ok(0));
        assert_eq!(mirror.len(), 2);
    }

    #[test]
    fn truncate_above_rejects_index_outside_stack() {
        let mut mirror = mirror_of(&["a", "b"]);
        let err = mirror.truncate_above(2).expect_err("index past top");
        assert_eq!(
            err,
            NavError::MirrorInvariant {
                key: "b".to_string(),
                index: 2,
                len: 2,
            }
        );
        assert_eq!(mirror.keys(), ["a", "b"]);
    }

    #[test]
    fn position_prefers_topmost_duplicate() {
        let mirror = mirror_of(&["a", "b", "a", "c"]);
        assert_eq!(mirror.position("a"), Some(2));
        assert_eq!(mirror.position("missing"), None);
    }
}
