//! Subtask catalog and entity filter
//!
//! Every connector declares its subtasks once, in the order they must run
//! (collect before extract before convert). The filter picks a subset for a
//! scope without ever reordering it.

use blueprint_core::domain::entity::{EntitySet, EntityTag};

/// Static description of one subtask of a connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtaskMeta {
    pub name: &'static str,
    pub required: bool,
    pub enabled_by_default: bool,
    /// Fetches from the remote tool; dropped when collectors are skipped
    pub collector: bool,
    pub domain_types: &'static [EntityTag],
}

impl SubtaskMeta {
    /// A subtask that pulls raw data from the remote tool
    pub const fn collector(name: &'static str, domain_types: &'static [EntityTag]) -> Self {
        Self {
            name,
            required: false,
            enabled_by_default: true,
            collector: true,
            domain_types,
        }
    }

    /// An extractor, converter or enricher working on already collected data
    pub const fn step(name: &'static str, domain_types: &'static [EntityTag]) -> Self {
        Self {
            name,
            required: false,
            enabled_by_default: true,
            collector: false,
            domain_types,
        }
    }

    pub const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    pub const fn disabled_by_default(self) -> Self {
        Self {
            enabled_by_default: false,
            ..self
        }
    }

    pub fn contributes_to(&self, entities: &EntitySet) -> bool {
        entities.contains_any(self.domain_types)
    }

    /// True when every entity this subtask serves is in `blocked`
    fn only_serves(&self, blocked: &EntitySet) -> bool {
        !self.domain_types.is_empty() && self.domain_types.iter().all(|t| blocked.contains(*t))
    }
}

/// Entities at least one subtask of `catalog` contributes to
pub fn catalog_entities(catalog: &[SubtaskMeta]) -> EntitySet {
    catalog
        .iter()
        .flat_map(|meta| meta.domain_types.iter().copied())
        .collect()
}

/// Selects the subtasks to run for a set of requested entities
#[derive(Debug, Clone, Copy)]
pub struct EntityFilter<'a> {
    catalog: &'a [SubtaskMeta],
    skip_collectors: bool,
}

impl<'a> EntityFilter<'a> {
    pub fn new(catalog: &'a [SubtaskMeta]) -> Self {
        Self {
            catalog,
            skip_collectors: false,
        }
    }

    pub fn skip_collectors(mut self, skip: bool) -> Self {
        self.skip_collectors = skip;
        self
    }

    /// A subtask is picked when it is required, when it is enabled by default
    /// and nothing was requested, or when it serves a requested entity.
    pub fn select(&self, requested: &EntitySet) -> Vec<String> {
        self.pick(|meta| {
            meta.required
                || (meta.enabled_by_default && requested.is_empty())
                || meta.contributes_to(requested)
        })
    }

    /// Like [`select`](Self::select), but entities in `blocked` can never
    /// pull a subtask in. Required subtasks still run.
    pub fn select_excluding(&self, requested: &EntitySet, blocked: &EntitySet) -> Vec<String> {
        if blocked.is_empty() {
            return self.select(requested);
        }

        if requested.is_empty() {
            return self.pick(|meta| {
                meta.required || (meta.enabled_by_default && !meta.only_serves(blocked))
            });
        }

        let effective = requested.without(blocked);
        if effective.is_empty() {
            return self.pick(|meta| meta.required);
        }
        self.select(&effective)
    }

    fn pick(&self, include: impl Fn(&SubtaskMeta) -> bool) -> Vec<String> {
        self.catalog
            .iter()
            .filter(|meta| !(self.skip_collectors && meta.collector))
            .filter(|meta| include(*meta))
            .map(|meta| meta.name.to_string())
            .collect()
    }
}
