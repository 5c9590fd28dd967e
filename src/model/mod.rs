// SPDX-FileCopyrightText: 2026 The FQL Tour Authors
// SPDX-License-Identifier: LicenseRef-FQLTour-Proprietary
//
// All rights reserved.
//
// This file is part of FQL Tour and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.

pub mod tour;

pub use tour::{
    AssertOperator, Difficulty, FocusRange, ParseTourValueError, RevealMode, RunMode, StepLayout,
    Tour, TourAssert, TourMeta, TourStep,
};
