// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rendering of tour content into styled terminal lines.
//!
//! Renderers are pure: they take model or playback data plus a [`RenderStyles`] and return
//! `ratatui` lines. Layout and scrolling belong to the TUI.

pub mod code;
pub mod narrative;
pub mod result;
mod styles;
#[cfg(test)]
mod test_utils;
pub(crate) mod text;

pub use code::render_code;
pub use narrative::render_narrative;
pub use result::render_result;
pub use styles::RenderStyles;
