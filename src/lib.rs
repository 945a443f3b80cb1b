// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Production chain solver with a deterministic diagram pipeline.
//!
//! A dataset of factions, facilities, and recipes is loaded once at
//! [`Model::initialize`]; queries against the model resolve a chosen
//! product into a chain of facilities with exact fractional counts,
//! flatten it into a node/edge graph, lay the graph out left to right,
//! and map it to a renderable view model (or SVG).

#![forbid(unsafe_code)]

pub mod chain;
pub mod common;
pub mod diagram;
pub mod dot;
pub mod fraction;
pub mod gamedata;
pub mod graph;
pub mod layout;
pub mod model;
pub mod selection;
pub mod session;

pub use self::common::{Error, ErrorCode, ErrorKind, Result};
pub use self::diagram::{ViewModel, build_view, render_svg};
pub use self::fraction::{Fraction, MixedNumber};
pub use self::gamedata::GameData;
pub use self::graph::{ProductionEdge, ProductionGraph, ProductionNode};
pub use self::layout::{LayoutConfig, compute_layout};
pub use self::model::{GameDataSource, Model};
pub use self::selection::Selection;
pub use self::session::{Session, Snapshot};
