// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Where tour markup comes from.
//!
//! A missing tour is a [`SourceError::NotFound`]; the parser itself never fails, so every other
//! problem with a tour's content shows up as diagnostics instead.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::format::tour::{parse_tour_with_diagnostics, TourDiagnostic};
use crate::model::tour::Tour;

/// File extensions tried, in order, for a bare tour name.
pub const TOUR_EXTENSIONS: &[&str] = &["tour", "fql"];

pub const DEMO_TOUR_NAME: &str = "getting-started";
pub const DEMO_TOUR: &str = include_str!("../../tours/getting-started.tour");

#[derive(Debug)]
pub enum SourceError {
    NotFound { name: String },
    InvalidName { name: String },
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { name } => write!(f, "tour not found: {name}"),
            Self::InvalidName { name } => write!(f, "invalid tour name: {name:?}"),
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } | Self::InvalidName { .. } => None,
        }
    }
}

pub trait TourSource {
    /// Returns the raw markup of the tour called `name`.
    fn fetch(&self, name: &str) -> Result<String, SourceError>;
}

/// Tours stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let has_tour_extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| TOUR_EXTENSIONS.contains(&ext));
        if has_tour_extension {
            return vec![self.root.join(name)];
        }
        TOUR_EXTENSIONS.iter().map(|ext| self.root.join(format!("{name}.{ext}"))).collect()
    }

    /// Names of the tours in the directory, sorted and without extension.
    pub fn list(&self) -> Result<Vec<String>, SourceError> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|source| SourceError::Io { path: self.root.clone(), source })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SourceError::Io { path: self.root.clone(), source })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_tour = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| TOUR_EXTENSIONS.contains(&ext));
            if let (true, Some(stem)) = (is_tour, path.file_stem().and_then(|stem| stem.to_str())) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        names.dedup();
        Ok(names)
    }
}

impl TourSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<String, SourceError> {
        validate_name(name)?;

        for path in self.candidates(name) {
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    debug!(path = %path.display(), "loaded tour");
                    return Ok(text);
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(SourceError::Io { path, source }),
            }
        }
        Err(SourceError::NotFound { name: name.to_owned() })
    }
}

/// Tours held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    tours: BTreeMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundled demo tour under [`DEMO_TOUR_NAME`].
    pub fn demo() -> Self {
        Self::new().with_tour(DEMO_TOUR_NAME, DEMO_TOUR)
    }

    pub fn with_tour(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.tours.insert(name.into(), markup.into());
        self
    }
}

impl TourSource for StaticSource {
    fn fetch(&self, name: &str) -> Result<String, SourceError> {
        self.tours
            .get(name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound { name: name.to_owned() })
    }
}

fn validate_name(name: &str) -> Result<(), SourceError> {
    let escapes = name.is_empty()
        || name.starts_with('.')
        || name.contains(&['/', '\\'][..])
        || name.contains("..")
        || Path::new(name).is_absolute();
    if escapes {
        return Err(SourceError::InvalidName { name: name.to_owned() });
    }
    Ok(())
}

/// Fetches and parses a tour. Parse diagnostics are logged, not returned.
pub fn load_tour(source: &dyn TourSource, name: &str) -> Result<Tour, SourceError> {
    load_tour_with_diagnostics(source, name).map(|(tour, _)| tour)
}

pub fn load_tour_with_diagnostics(
    source: &dyn TourSource,
    name: &str,
) -> Result<(Tour, Vec<TourDiagnostic>), SourceError> {
    let markup = source.fetch(name)?;
    let (tour, diagnostics) = parse_tour_with_diagnostics(&markup);
    for diagnostic in &diagnostics {
        warn!(tour = name, %diagnostic, "tour diagnostic");
    }
    debug!(tour = name, steps = tour.len(), "parsed tour");
    Ok((tour, diagnostics))
}
