//! Item collectors, one per provenance.

pub mod commands;
pub mod editors;
pub mod files;
pub mod git;

use std::path::Path;

use anyhow::Result;

use crate::app::host::Host;
use crate::domain::item::Item;
use crate::infra::config::Config;

/// Item provenances in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Editors,
    Files,
    Git,
    Commands,
}

impl Source {
    /// Fixed concatenation order of the aggregated list.
    pub const ORDER: [Source; 4] = [
        Source::Editors,
        Source::Files,
        Source::Git,
        Source::Commands,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Source::Editors => "editors",
            Source::Files => "files",
            Source::Git => "git",
            Source::Commands => "commands",
        }
    }

    /// Whether the configuration lets this source contribute.
    pub fn enabled(self, config: &Config) -> bool {
        let sources = &config.sources;
        match self {
            Source::Editors => sources.editors(),
            Source::Files => sources.files(),
            Source::Git => sources.git(),
            Source::Commands => sources.commands(),
        }
    }
}

/// Inputs shared by every collector during one list build.
#[derive(Debug, Clone, Copy)]
pub struct CollectContext<'a> {
    pub root: Option<&'a Path>,
    pub config: &'a Config,
}

/// Run a single collector.
pub fn collect<H: Host + ?Sized>(
    source: Source,
    host: &mut H,
    cx: CollectContext<'_>,
) -> Result<Vec<Item>> {
    let markers = &cx.config.markers;
    match source {
        Source::Editors => Ok(editors::collect(host, markers)),
        Source::Files => Ok(files::collect(host, cx.root, markers)),
        Source::Git => git::collect(host, cx.root, &cx.config.git, markers),
        Source::Commands => Ok(commands::collect(host, markers)),
    }
}
