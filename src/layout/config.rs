// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

/// Layout configuration for the layered left-to-right pass.
///
/// All values are in logical layout units.  The node footprint is a
/// nominal constant: the layout only needs relative sizes, true render
/// size is a diagram concern.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Nominal node footprint used for spacing and anchor conversion.
    pub node_width: f64,
    pub node_height: f64,

    /// Horizontal gap between adjacent ranks (producer column to
    /// consumer column).
    pub rank_spacing: f64,
    /// Vertical gap between nodes within a rank.
    pub node_spacing: f64,

    /// Margin from the diagram origin for the first rank and row.
    pub origin_margin: f64,

    /// Barycenter ordering sweeps (down then up counts as two).
    pub ordering_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 90.0,
            rank_spacing: 80.0,
            node_spacing: 40.0,
            origin_margin: 50.0,
            ordering_sweeps: 4,
        }
    }
}
