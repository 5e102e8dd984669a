// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor libraries and type tag resolution.
//!
//! A [`Library`] is a named bundle of [`ProcessorRegistration`]s. A process
//! lists the libraries it loads; a processor's type tag must be registered
//! by one of them. Libraries are searched in load order and the first match
//! wins.

use crate::backends::local::LocalLibrary;
use crate::config::consts::LIBRARY_SUFFIXES;
use crate::config::{ParameterSet, ParameterSpec, RunMode};
use crate::errors::{ConfigurationError, ProcessorError, UnresolvedProcessorError};
use crate::traits::Processor;

/// Builds a processor instance from its name and bound parameters.
pub type ProcessorFactory = fn(&str, &ParameterSet) -> Result<Box<dyn Processor>, ProcessorError>;

/// Everything the runner needs to know about one processor type.
#[derive(Clone)]
pub struct ProcessorRegistration {
    pub type_tag: &'static str,
    pub description: &'static str,
    pub run_modes: &'static [RunMode],
    pub schema: fn() -> Vec<ParameterSpec>,
    pub factory: ProcessorFactory,
}

impl ProcessorRegistration {
    pub fn supports(&self, run_mode: RunMode) -> bool {
        self.run_modes.contains(&run_mode)
    }
}

impl std::fmt::Debug for ProcessorRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistration")
            .field("type_tag", &self.type_tag)
            .field("run_modes", &self.run_modes)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Library {
    name: String,
    registrations: Vec<ProcessorRegistration>,
}

impl Library {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registrations: Vec::new(),
        }
    }

    pub fn register(mut self, registration: ProcessorRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registrations(&self) -> &[ProcessorRegistration] {
        &self.registrations
    }

    pub fn find(&self, type_tag: &str) -> Option<&ProcessorRegistration> {
        self.registrations.iter().find(|r| r.type_tag == type_tag)
    }
}

/// The libraries available to load.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    libraries: Vec<Library>,
}

impl Registry {
    /// A registry knowing no libraries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry with the built-in processor library.
    pub fn builtin() -> Self {
        Self::empty().with_library(LocalLibrary::library())
    }

    pub fn with_library(mut self, library: Library) -> Self {
        self.libraries.push(library);
        self
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Find a library by name. Directories and shared-object suffixes are ignored,
    /// so `lib/libprocessors.so` names `libprocessors`.
    pub fn library(&self, name: &str) -> Option<&Library> {
        let wanted = normalize_library_name(name);
        self.libraries.iter().find(|l| l.name == wanted)
    }

    /// Check that every name in `loaded` is a known library.
    pub fn check_libraries(&self, loaded: &[String]) -> Result<(), ConfigurationError> {
        match loaded.iter().find(|name| self.library(name).is_none()) {
            Some(name) => Err(ConfigurationError::UnknownLibrary { name: name.clone() }),
            None => Ok(()),
        }
    }

    /// Resolve `type_tag` for the processor named `processor` against the
    /// `loaded` libraries, in load order.
    pub fn resolve(
        &self,
        loaded: &[String],
        processor: &str,
        type_tag: &str,
    ) -> Result<(&Library, &ProcessorRegistration), UnresolvedProcessorError> {
        loaded
            .iter()
            .filter_map(|name| self.library(name))
            .find_map(|library| library.find(type_tag).map(|r| (library, r)))
            .ok_or_else(|| UnresolvedProcessorError {
                processor: processor.to_string(),
                type_tag: type_tag.to_string(),
                libraries: loaded.to_vec(),
            })
    }
}

pub fn normalize_library_name(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    LIBRARY_SUFFIXES
        .iter()
        .find_map(|suffix| base.strip_suffix(suffix))
        .unwrap_or(base)
}
