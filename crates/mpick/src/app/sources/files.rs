//! Regular files directly under the workspace root.

use std::path::Path;

use crate::app::host::{Host, NoticeLevel};
use crate::domain::item::{Action, Item, ItemKind, Markers};
use crate::domain::model::EntryKind;

/// One entry per regular file in `root`, in listing order. No recursion.
pub fn collect<H: Host + ?Sized>(host: &mut H, root: Option<&Path>, markers: &Markers) -> Vec<Item> {
    let Some(root) = root else {
        return Vec::new();
    };

    let entries = match host.read_directory(root) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(root = %root.display(), error = %err, "failed to list workspace root");
            host.notify(
                NoticeLevel::Error,
                format!("Failed to list {}: {err}", root.display()),
            );
            return Vec::new();
        }
    };

    let items: Vec<Item> = entries
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File)
        .map(|entry| {
            let path = root.join(&entry.name);
            Item::new(ItemKind::File, &entry.name, Action::Open(path), markers)
        })
        .collect();
    tracing::debug!(root = %root.display(), count = items.len(), "collected workspace files");
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeHost;

    #[test]
    fn lists_only_regular_files() {
        let mut host = FakeHost::default().with_dir(
            "/w",
            &[
                ("a.txt", EntryKind::File),
                ("src", EntryKind::Directory),
                ("b.md", EntryKind::File),
            ],
        );
        let markers = Markers {
            file: String::new(),
            ..Markers::default()
        };

        let items = collect(&mut host, Some(Path::new("/w")), &markers);
        let labels: Vec<_> = items.iter().map(Item::label).collect();
        assert_eq!(labels, vec!["a.txt", "b.md"]);
        assert_eq!(items[1].action(), &Action::Open("/w/b.md".into()));
    }

    #[test]
    fn symlinks_are_not_regular_files() {
        let mut host = FakeHost::default().with_dir("/w", &[("link", EntryKind::Symlink)]);
        assert!(collect(&mut host, Some(Path::new("/w")), &Markers::default()).is_empty());
    }

    #[test]
    fn missing_root_yields_nothing() {
        let mut host = FakeHost::default();
        assert!(collect(&mut host, None, &Markers::default()).is_empty());
        assert!(host.notices.is_empty());
    }

    #[test]
    fn listing_failure_is_reported() {
        let mut host = FakeHost::default();
        let items = collect(&mut host, Some(Path::new("/gone")), &Markers::default());
        assert!(items.is_empty());
        assert_eq!(host.error_count(), 1);
    }
}
