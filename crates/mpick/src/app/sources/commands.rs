//! Commands contributed by loaded extensions.

use crate::app::host::Host;
use crate::domain::item::{Action, Item, ItemKind, Markers};
use crate::domain::model::{CommandContribution, CommandTitle};

/// One entry per declared command, in manifest order. No de-duplication.
pub fn collect<H: Host + ?Sized>(host: &H, markers: &Markers) -> Vec<Item> {
    host.extensions()
        .iter()
        .filter_map(|manifest| manifest.contributes.as_ref())
        .filter_map(|contributes| contributes.commands.as_ref())
        .flatten()
        .map(|contribution| {
            Item::new(
                ItemKind::Command,
                &command_label(contribution),
                Action::Execute(contribution.command.clone()),
                markers,
            )
        })
        .collect()
}

/// Human-readable label for a declared command.
///
/// A localized title whose two forms differ renders as `value (original)` so the
/// untranslated name stays searchable. Otherwise the single available form is
/// used, falling back to the command identifier.
pub fn command_label(contribution: &CommandContribution) -> String {
    let title = match &contribution.title {
        Some(CommandTitle::Plain(text)) => Some(text.clone()),
        Some(CommandTitle::Localized {
            value: Some(value),
            original: Some(original),
        }) if value != original => Some(format!("{value} ({original})")),
        Some(CommandTitle::Localized { value, original }) => value.clone().or(original.clone()),
        None => None,
    };
    title.unwrap_or_else(|| contribution.command.clone())
}
