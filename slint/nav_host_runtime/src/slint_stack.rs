//! Stack host backed by a Slint `VecModel`.
//!
//! A UI binds the model to a `[StackEntry]` property and renders the top row.
//! Mutations are staged on a working copy and only reach the model on
//! [`StackHost::flush_pending`], the way a toolkit commits transactions
//! after the current event.

use crate::error::HostError;
use crate::host::{StackHost, TransitionStyle, ViewFactory};
use crate::screen::{Destination, Screen, ViewSpec};
use slint::{Model, ModelRc, SharedString, VecModel};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackEntry {
    pub key: SharedString,
    pub view: SharedString,
    /// View parameters as a JSON string.
    pub params: SharedString,
    pub enter_transition: SharedString,
}

impl StackEntry {
    pub fn for_view(spec: &ViewSpec) -> Self {
        let params = if spec.params.is_null() {
            SharedString::default()
        } else {
            spec.params.to_string().into()
        };

        Self {
            view: spec.name.as_str().into(),
            params,
            ..Self::default()
        }
    }
}

/// Cloning shares the same model and staged transaction.
#[derive(Clone)]
pub struct SlintStackHost {
    model: Rc<VecModel<StackEntry>>,
    staged: Rc<RefCell<Option<Vec<StackEntry>>>>,
    max_depth: Option<usize>,
}

impl SlintStackHost {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            model: Rc::new(VecModel::default()),
            staged: Rc::new(RefCell::new(None)),
            max_depth,
        }
    }

    pub fn model(&self) -> ModelRc<StackEntry> {
        ModelRc::from(self.model.clone())
    }

    pub fn has_pending(&self) -> bool {
        self.staged.borrow().is_some()
    }

    /// Committed rows, bottom to top.
    pub fn entries(&self) -> Vec<StackEntry> {
        self.model.iter().collect()
    }

    fn with_staged<R>(
        &self,
        apply: impl FnOnce(&mut Vec<StackEntry>) -> Result<R, HostError>,
    ) -> Result<R, HostError> {
        let mut staged = self.staged.borrow_mut();
        let entries = staged.get_or_insert_with(|| self.model.iter().collect());
        apply(entries)
    }
}

impl StackHost for SlintStackHost {
    type View = StackEntry;

    fn flush_pending(&mut self) -> Result<(), HostError> {
        let Some(next) = self.staged.borrow_mut().take() else {
            return Ok(());
        };

        // Rows shared with the committed model stay put so bound views are
        // not rebuilt.
        let current_len = self.model.row_count();
        let common = (0..current_len.min(next.len()))
            .take_while(|&row| self.model.row_data(row).as_ref() == Some(&next[row]))
            .count();

        for row in (common..current_len).rev() {
            self.model.remove(row);
        }
        for entry in next.into_iter().skip(common) {
            self.model.push(entry);
        }

        trace!(
            kept = common,
            depth = self.model.row_count(),
            "committed stack transaction"
        );
        Ok(())
    }

    fn named_entries(&self) -> Vec<String> {
        self.model.iter().map(|entry| entry.key.to_string()).collect()
    }

    fn push_named(
        &mut self,
        key: &str,
        mut view: StackEntry,
        style: &TransitionStyle,
    ) -> Result<(), HostError> {
        let max_depth = self.max_depth;
        self.with_staged(|entries| {
            if max_depth.is_some_and(|max| entries.len() >= max) {
                return Err(HostError::new(
                    "push_named",
                    format!("stack depth limit {} reached", entries.len()),
                ));
            }

            view.key = key.into();
            view.enter_transition = style.enter.as_deref().unwrap_or_default().into();
            entries.push(view);
            Ok(())
        })
    }

    fn pop_top(&mut self) -> Result<(), HostError> {
        self.with_staged(|entries| {
            entries
                .pop()
                .map(|_| ())
                .ok_or_else(|| HostError::new("pop_top", "stack is empty"))
        })
    }

    fn pop_to_marker(&mut self, key: &str, inclusive: bool) -> Result<(), HostError> {
        self.with_staged(|entries| {
            let index = entries
                .iter()
                .rposition(|entry| entry.key == key)
                .ok_or_else(|| HostError::new("pop_to_marker", format!("no entry named '{key}'")))?;

            entries.truncate(if inclusive { index } else { index + 1 });
            Ok(())
        })
    }

    fn pop_all(&mut self) -> Result<(), HostError> {
        self.with_staged(|entries| {
            entries.clear();
            Ok(())
        })
    }
}

/// View factory accepting a fixed set of view names. An empty registry
/// accepts every name.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    names: HashSet<String>,
}

impl ViewRegistry {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            names: names.into_iter().collect(),
        }
    }

    pub fn knows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }
}

impl ViewFactory<StackEntry> for ViewRegistry {
    fn create_view(&mut self, screen: &Screen) -> Option<StackEntry> {
        match &screen.destination {
            Destination::View(spec) if self.knows(&spec.name) => Some(StackEntry::for_view(spec)),
            _ => None,
        }
    }
}
