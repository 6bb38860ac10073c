//! Open editor tabs.

use crate::app::host::Host;
use crate::domain::item::{Action, Item, ItemKind, Markers};
use crate::domain::model::TabInput;

/// One entry per resource-backed tab, group-major then tab-minor.
pub fn collect<H: Host + ?Sized>(host: &H, markers: &Markers) -> Vec<Item> {
    let mut items = Vec::new();
    for (group_index, group) in host.tab_groups().iter().enumerate() {
        for tab in &group.tabs {
            let TabInput::Resource { path } = &tab.input else {
                continue;
            };
            items.push(Item::new(
                ItemKind::Editor,
                &format!("{} (Tab {group_index})", tab.label),
                Action::Open(path.clone()),
                markers,
            ));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TabGroup;
    use crate::test_support::{FakeHost, other_tab, resource_tab};

    fn plain() -> Markers {
        Markers {
            editor: String::new(),
            ..Markers::default()
        }
    }

    #[test]
    fn emits_resource_tabs_in_group_major_order() {
        let host = FakeHost {
            groups: vec![
                TabGroup {
                    tabs: vec![
                        resource_tab("main.rs", "/w/src/main.rs"),
                        other_tab("Settings"),
                        resource_tab("lib.rs", "/w/src/lib.rs"),
                    ],
                },
                TabGroup { tabs: vec![] },
                TabGroup {
                    tabs: vec![resource_tab("README.md", "/w/README.md")],
                },
            ],
            ..FakeHost::default()
        };

        let items = collect(&host, &plain());
        let labels: Vec<_> = items.iter().map(Item::label).collect();
        assert_eq!(
            labels,
            vec!["main.rs (Tab 0)", "lib.rs (Tab 0)", "README.md (Tab 2)"]
        );
        assert_eq!(
            items[2].action(),
            &Action::Open("/w/README.md".into())
        );
        assert!(items.iter().all(|item| item.kind() == ItemKind::Editor));
    }

    #[test]
    fn no_tabs_yields_nothing() {
        assert!(collect(&FakeHost::default(), &Markers::default()).is_empty());
    }
}
