// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! FQL Tour: terminal-first interactive tours for the FQL ledger query language.
//!
//! A tour is FQL source annotated with `--@` directives. [`format::tour`] parses it into a
//! [`model::tour::Tour`], [`playback`] walks the steps (narrative, code reveal, execution,
//! assertions), [`exec`] runs the code against a backend, and [`tui`] puts it on screen.

pub mod exec;
pub mod format;
pub mod highlight;
pub mod model;
pub mod playback;
pub mod render;
pub mod source;
pub mod tui;
