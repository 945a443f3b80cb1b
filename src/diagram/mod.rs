// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

pub mod render;
pub mod view;

pub use self::render::render_svg;
pub use self::view::{ViewEdge, ViewModel, ViewNode, ViewPort, build_view};
