// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

use crate::render::RenderStyles;

pub(crate) const PALETTE_ENV: &str = "FQLTOUR_PALETTE";

/// Colours for the tour screen. Without a palette override the terminal's own ANSI colours are
/// used, so the UI follows the user's terminal theme.
#[derive(Debug, Clone, Default)]
pub(crate) struct TuiTheme {
    palette: Option<TuiPalette>,
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = match env::var(PALETTE_ENV) {
            Ok(value) => Self::parse_override(&value)?,
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ThemeError::InvalidEnv {
                    name: PALETTE_ENV.to_owned(),
                    value: "<non-unicode>".to_owned(),
                });
            }
        };
        Ok(Self { palette })
    }

    fn parse_override(value: &str) -> Result<Option<TuiPalette>, ThemeError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        TuiPalette::parse_csv(trimmed).map(Some).map_err(|reason| ThemeError::InvalidEnv {
            name: PALETTE_ENV.to_owned(),
            value: format!("{trimmed} ({reason})"),
        })
    }

    pub(crate) fn base_style(&self) -> Style {
        match &self.palette {
            Some(palette) => Style::default().fg(palette.fg).bg(palette.bg),
            None => Style::default(),
        }
    }

    fn color(&self, color: Ansi16) -> Color {
        match &self.palette {
            Some(palette) => palette.ansi[color as usize],
            None => color.into(),
        }
    }

    fn fg(&self, color: Ansi16) -> Style {
        self.base_style().fg(self.color(color))
    }

    pub(crate) fn panel_border_style(&self, active: bool) -> Style {
        if active {
            self.fg(Ansi16::Cyan)
        } else {
            self.fg(Ansi16::BrightBlack)
        }
    }

    pub(crate) fn title_style(&self) -> Style {
        self.base_style().add_modifier(Modifier::BOLD)
    }

    pub(crate) fn muted_style(&self) -> Style {
        self.fg(Ansi16::BrightBlack)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.fg(Ansi16::Red).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn success_style(&self) -> Style {
        self.fg(Ansi16::Green).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn key_style(&self) -> Style {
        self.fg(Ansi16::Cyan).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn phase_style(&self) -> Style {
        self.fg(Ansi16::Magenta)
    }

    /// Styles handed to the narrative, code and result renderers.
    pub(crate) fn render_styles(&self) -> RenderStyles {
        let base = self.base_style();
        RenderStyles {
            base,
            strong: base.add_modifier(Modifier::BOLD),
            emphasis: base.add_modifier(Modifier::ITALIC),
            inline_code: self.fg(Ansi16::Yellow),
            bullet: self.fg(Ansi16::Cyan),
            gutter: self.fg(Ansi16::BrightBlack),
            highlight: Style::default()
                .bg(self.color(Ansi16::Yellow))
                .fg(self.color(Ansi16::Black))
                .add_modifier(Modifier::BOLD),
            success: self.success_style(),
            failure: self.error_style(),
            muted: self.muted_style(),
            keyword: self.fg(Ansi16::Magenta).add_modifier(Modifier::BOLD),
            type_name: self.fg(Ansi16::Yellow),
            account: self.fg(Ansi16::Cyan),
            string: self.fg(Ansi16::Green),
            number: self.fg(Ansi16::BrightYellow),
            date: self.fg(Ansi16::BrightBlue),
            operator: self.fg(Ansi16::White),
            comment: self.fg(Ansi16::BrightBlack).add_modifier(Modifier::ITALIC),
            function: self.fg(Ansi16::Blue),
            parameter: self.fg(Ansi16::BrightMagenta),
            punctuation: self.fg(Ansi16::White),
            boolean: self.fg(Ansi16::BrightRed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TuiPalette {
    fg: Color,
    bg: Color,
    ansi: [Color; 16],
}

impl TuiPalette {
    const CSV_LEN: usize = 18;

    /// `fg,bg` followed by the 16 ANSI colours in terminal order.
    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.len() != Self::CSV_LEN {
            return Err(format!(
                "expected {} comma-separated colors (fg,bg and 16 ANSI colors), got {}",
                Self::CSV_LEN,
                parts.len()
            ));
        }

        let mut colors = parts.iter().map(|part| parse_palette_color(part));
        let mut take = || colors.next().unwrap_or(Ok(Color::Reset));
        let fg = take()?;
        let bg = take()?;
        let mut ansi = [Color::Reset; 16];
        for slot in &mut ansi {
            *slot = take()?;
        }
        Ok(Self { fg, bg, ansi })
    }
}

/// Accepts `#RRGGBB`, `0xRRGGBB`, bare `RRGGBB`, and X11 `rgb:RR/GG/BB` (2 or 4 hex digits each).
fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(rest) = lower.strip_prefix("rgb:") {
        let channels = rest.split('/').map(parse_x11_channel).collect::<Result<Vec<_>, _>>()?;
        let &[r, g, b] = channels.as_slice() else {
            return Err(format!("invalid rgb: value: {trimmed}"));
        };
        return Ok(Color::Rgb(r, g, b));
    }

    let hex = lower.strip_prefix('#').or_else(|| lower.strip_prefix("0x")).unwrap_or(&lower);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color: {trimmed} (expected #RRGGBB)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    let [_, r, g, b] = rgb.to_be_bytes();
    Ok(Color::Rgb(r, g, b))
}

fn parse_x11_channel(value: &str) -> Result<u8, String> {
    let value = value.trim();
    let parsed = match value.len() {
        2 => u8::from_str_radix(value, 16).ok(),
        4 => u16::from_str_radix(value, 16).ok().map(|wide| (wide >> 8) as u8),
        _ => None,
    };
    parsed.ok_or_else(|| format!("invalid rgb: component {value} (expected 2 or 4 hex digits)"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
enum Ansi16 {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl From<Ansi16> for Color {
    fn from(value: Ansi16) -> Self {
        match value {
            Ansi16::Black => Color::Black,
            Ansi16::Red => Color::Red,
            Ansi16::Green => Color::Green,
            Ansi16::Yellow => Color::Yellow,
            Ansi16::Blue => Color::Blue,
            Ansi16::Magenta => Color::Magenta,
            Ansi16::Cyan => Color::Cyan,
            Ansi16::White => Color::Gray,
            Ansi16::BrightBlack => Color::DarkGray,
            Ansi16::BrightRed => Color::LightRed,
            Ansi16::BrightGreen => Color::LightGreen,
            Ansi16::BrightYellow => Color::LightYellow,
            Ansi16::BrightBlue => Color::LightBlue,
            Ansi16::BrightMagenta => Color::LightMagenta,
            Ansi16::BrightCyan => Color::LightCyan,
            Ansi16::BrightWhite => Color::White,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}
