//! Picker controller: builds the aggregated list and dispatches the accepted entry.

use anyhow::Result;

use crate::app::host::{Host, NoticeLevel};
use crate::app::root::resolve_root;
use crate::app::sources::{self, CollectContext, Source};
use crate::domain::item::Item;
use crate::infra::config::Config;

/// Lifecycle of a picker invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerState {
    Closed,
    Populating,
    Open,
    Dispatching,
}

/// Owns the host for one invocation and the list shown to the user.
pub struct Picker<H: Host> {
    host: H,
    config: Config,
    items: Vec<Item>,
    state: PickerState,
}

impl<H: Host> Picker<H> {
    pub fn new(host: H, config: Config) -> Self {
        Self {
            host,
            config,
            items: Vec::new(),
            state: PickerState::Closed,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PickerState::Open
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Release the picker and hand the host back.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Rebuild the list from scratch and open the picker.
    ///
    /// Calling this while already open refreshes the list in place.
    pub fn show(&mut self) -> Result<()> {
        self.state = PickerState::Populating;
        match self.build_items() {
            Ok(items) => {
                tracing::info!(count = items.len(), "picker populated");
                self.items = items;
                self.state = PickerState::Open;
                Ok(())
            }
            Err(err) => {
                self.hide();
                Err(err)
            }
        }
    }

    fn build_items(&mut self) -> Result<Vec<Item>> {
        let root = resolve_root(&self.host);
        if root.is_none() {
            self.host
                .notify(NoticeLevel::Info, "no active editor".to_string());
        }

        let cx = CollectContext {
            root: root.as_deref(),
            config: &self.config,
        };
        let mut items = Vec::new();
        for source in Source::ORDER {
            if !source.enabled(cx.config) {
                continue;
            }
            let collected = sources::collect(source, &mut self.host, cx)?;
            tracing::debug!(source = source.name(), count = collected.len(), "source collected");
            items.extend(collected);
        }
        Ok(items)
    }

    /// Indices of entries whose label contains `query`, ignoring case, in list order.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| needle.is_empty() || item.label().to_lowercase().contains(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    /// Dispatch the entry at `selected` and close the picker.
    ///
    /// Returns `Ok(false)` without side effects when the picker is not open or
    /// nothing valid is selected. The picker is closed even if the action fails.
    pub fn accept(&mut self, selected: Option<usize>) -> Result<bool> {
        if self.state != PickerState::Open {
            return Ok(false);
        }
        let Some(index) = selected.filter(|index| *index < self.items.len()) else {
            return Ok(false);
        };

        self.state = PickerState::Dispatching;
        let item = self.items.swap_remove(index);
        tracing::info!(label = item.label(), "dispatching picker item");
        let outcome = item.activate(&mut self.host);
        self.hide();
        outcome.map(|()| true)
    }

    /// Close the picker and drop the current list.
    pub fn hide(&mut self) {
        self.items.clear();
        self.state = PickerState::Closed;
    }
}
