// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use ratatui::style::{Modifier, Style};

use crate::highlight::TokenKind;

/// Styles the renderers apply. Every field defaults to the terminal's own style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStyles {
    pub base: Style,
    pub strong: Style,
    pub emphasis: Style,
    pub inline_code: Style,
    pub bullet: Style,
    pub gutter: Style,
    pub highlight: Style,
    pub success: Style,
    pub failure: Style,
    pub muted: Style,
    pub keyword: Style,
    pub type_name: Style,
    pub account: Style,
    pub string: Style,
    pub number: Style,
    pub date: Style,
    pub operator: Style,
    pub comment: Style,
    pub function: Style,
    pub parameter: Style,
    pub punctuation: Style,
    pub boolean: Style,
}

impl RenderStyles {
    /// Modifier-only styles that read correctly on any terminal palette.
    pub fn monochrome() -> Self {
        let base = Style::default();
        Self {
            base,
            strong: base.add_modifier(Modifier::BOLD),
            emphasis: base.add_modifier(Modifier::ITALIC),
            inline_code: base.add_modifier(Modifier::REVERSED),
            bullet: base,
            gutter: base.add_modifier(Modifier::DIM),
            highlight: base.add_modifier(Modifier::REVERSED | Modifier::BOLD),
            success: base.add_modifier(Modifier::BOLD),
            failure: base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            muted: base.add_modifier(Modifier::DIM),
            keyword: base.add_modifier(Modifier::BOLD),
            comment: base.add_modifier(Modifier::DIM | Modifier::ITALIC),
            ..Self::default()
        }
    }

    /// Style for a highlighter token; unclassified segments get the base style.
    pub fn token(&self, kind: Option<TokenKind>) -> Style {
        let Some(kind) = kind else {
            return self.base;
        };
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::TypeName => self.type_name,
            TokenKind::Account => self.account,
            TokenKind::String => self.string,
            TokenKind::Number => self.number,
            TokenKind::Date => self.date,
            TokenKind::Operator => self.operator,
            TokenKind::Comment => self.comment,
            TokenKind::Function => self.function,
            TokenKind::Parameter => self.parameter,
            TokenKind::Punctuation => self.punctuation,
            TokenKind::Boolean => self.boolean,
            TokenKind::Plain => self.base,
        }
    }
}
