//! The extension registry: write-once configuration and matcher
//! collection, frozen at first resolution.
//!
//! Registration happens up front; the first lookup of any matcher or
//! renderer initializes the indexes exactly once and freezes the
//! registry. Registering afterwards is a programming error and fails
//! with [`RegistryError::Frozen`] without touching existing contents.
//! The tree builder depends on this lifecycle: matchers never change
//! mid-parse.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::block::{BlockMatcher, CoreExtension};
use crate::config::Config;
use crate::tree::{BlockTree, NodeId};

/// Registration attempted after the registry froze.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("failed to {0} - extensions have already been initialized")]
    Frozen(&'static str),
}

/// A bundle of matchers and renderers registered under one name.
pub trait Extension {
    fn name(&self) -> &'static str;

    fn block_matchers(&self) -> Vec<Arc<dyn BlockMatcher>> {
        Vec::new()
    }

    fn inline_matchers(&self) -> Vec<Arc<dyn InlineMatcher>> {
        Vec::new()
    }

    /// Renderers, keyed by the block kind they render.
    fn block_renderers(&self) -> Vec<(&'static str, Arc<dyn BlockRenderer>)> {
        Vec::new()
    }
}

/// Inline-level matcher, indexed under each declared trigger character.
///
/// Invocation belongs to the inline pass, which runs downstream of the
/// block layer; the registry only collects and indexes.
pub trait InlineMatcher {
    fn name(&self) -> &'static str;

    fn triggers(&self) -> &[char];
}

/// Renders one block kind; looked up by kind name.
pub trait BlockRenderer {
    fn render(&self, tree: &BlockTree, node: NodeId, out: &mut String);
}

/// One-off registrations made outside any extension; folded in last at
/// initialization.
#[derive(Default)]
struct MiscParts {
    block_matchers: Vec<Arc<dyn BlockMatcher>>,
    inline_matchers: Vec<Arc<dyn InlineMatcher>>,
    block_renderers: Vec<(&'static str, Arc<dyn BlockRenderer>)>,
}

/// Extension and configuration registry.
#[derive(Default)]
pub struct Registry {
    extensions: Vec<Arc<dyn Extension>>,
    misc: MiscParts,
    initialized: bool,
    config: Config,
    block_matchers: Vec<Arc<dyn BlockMatcher>>,
    block_matchers_by_name: FxHashMap<&'static str, usize>,
    inline_matchers_by_trigger: FxHashMap<char, Vec<Arc<dyn InlineMatcher>>>,
    renderers_by_kind: FxHashMap<&'static str, Arc<dyn BlockRenderer>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A registry preloaded with the core block matchers.
    pub fn core() -> Self {
        let mut registry = Self::new();
        registry
            .add_extension(Arc::new(CoreExtension))
            .expect("a fresh registry is never frozen");
        registry
    }

    /// Whether first resolution has happened.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Register a whole extension.
    pub fn add_extension(&mut self, extension: Arc<dyn Extension>) -> Result<(), RegistryError> {
        self.check_open("add extension")?;
        self.extensions.push(extension);
        Ok(())
    }

    /// Register a single block matcher outside any extension.
    pub fn add_block_matcher(
        &mut self,
        matcher: Arc<dyn BlockMatcher>,
    ) -> Result<(), RegistryError> {
        self.check_open("add block matcher")?;
        self.misc.block_matchers.push(matcher);
        Ok(())
    }

    /// Register a single inline matcher outside any extension.
    pub fn add_inline_matcher(
        &mut self,
        matcher: Arc<dyn InlineMatcher>,
    ) -> Result<(), RegistryError> {
        self.check_open("add inline matcher")?;
        self.misc.inline_matchers.push(matcher);
        Ok(())
    }

    /// Register a renderer for a block kind outside any extension.
    pub fn add_block_renderer(
        &mut self,
        kind: &'static str,
        renderer: Arc<dyn BlockRenderer>,
    ) -> Result<(), RegistryError> {
        self.check_open("add block renderer")?;
        self.misc.block_renderers.push((kind, renderer));
        Ok(())
    }

    /// Merge configuration recursively into the existing dictionary.
    pub fn merge_config(&mut self, config: Value) -> Result<(), RegistryError> {
        self.check_open("modify configuration")?;
        self.config.merge(config);
        Ok(())
    }

    /// Replace the configuration dictionary.
    pub fn set_config(&mut self, config: Value) -> Result<(), RegistryError> {
        self.check_open("modify configuration")?;
        self.config.replace(config);
        Ok(())
    }

    /// Read configuration; never freezes and never fails.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All block matchers in registration order. Triggers first
    /// resolution.
    pub fn block_matchers(&mut self) -> &[Arc<dyn BlockMatcher>] {
        self.ensure_initialized();
        &self.block_matchers
    }

    /// Look up a block matcher by name. Triggers first resolution.
    pub fn block_matcher(&mut self, name: &str) -> Option<Arc<dyn BlockMatcher>> {
        self.ensure_initialized();
        let idx = *self.block_matchers_by_name.get(name)?;
        Some(Arc::clone(&self.block_matchers[idx]))
    }

    /// Inline matchers declared for a trigger character. Triggers first
    /// resolution.
    pub fn inline_matchers_for(&mut self, trigger: char) -> &[Arc<dyn InlineMatcher>] {
        self.ensure_initialized();
        self.inline_matchers_by_trigger
            .get(&trigger)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The renderer for a block kind. Triggers first resolution.
    pub fn renderer_for(&mut self, kind: &str) -> Option<Arc<dyn BlockRenderer>> {
        self.ensure_initialized();
        self.renderers_by_kind.get(kind).map(Arc::clone)
    }

    fn check_open(&self, action: &'static str) -> Result<(), RegistryError> {
        if self.initialized {
            Err(RegistryError::Frozen(action))
        } else {
            Ok(())
        }
    }

    /// One-time index build; idempotent.
    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let extensions = std::mem::take(&mut self.extensions);
        for extension in &extensions {
            debug!(extension = extension.name(), "initialize extension");
            self.index_block_matchers(extension.block_matchers());
            self.index_inline_matchers(extension.inline_matchers());
            self.index_renderers(extension.block_renderers());
        }
        self.extensions = extensions;

        let misc = std::mem::take(&mut self.misc);
        self.index_block_matchers(misc.block_matchers);
        self.index_inline_matchers(misc.inline_matchers);
        self.index_renderers(misc.block_renderers);
    }

    fn index_block_matchers(&mut self, matchers: Vec<Arc<dyn BlockMatcher>>) {
        for matcher in matchers {
            match self.block_matchers_by_name.get(matcher.name()) {
                // Same-name registration replaces in place, keeping the
                // original position in the matching order.
                Some(&idx) => self.block_matchers[idx] = matcher,
                None => {
                    self.block_matchers_by_name
                        .insert(matcher.name(), self.block_matchers.len());
                    self.block_matchers.push(matcher);
                }
            }
        }
    }

    fn index_inline_matchers(&mut self, matchers: Vec<Arc<dyn InlineMatcher>>) {
        for matcher in matchers {
            for &trigger in matcher.triggers() {
                self.inline_matchers_by_trigger
                    .entry(trigger)
                    .or_default()
                    .push(Arc::clone(&matcher));
            }
        }
    }

    fn index_renderers(&mut self, renderers: Vec<(&'static str, Arc<dyn BlockRenderer>)>) {
        for (kind, renderer) in renderers {
            self.renderers_by_kind.insert(kind, renderer);
        }
    }
}
