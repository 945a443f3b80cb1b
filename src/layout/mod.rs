// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Graph adapter: turns the solver's node/edge set into positioned,
//! renderable geometry.

pub mod config;
pub mod graph;
pub mod layered;

pub use self::config::LayoutConfig;
pub use self::graph::{Layout, Position};
pub use self::layered::compute_layout;
