// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation editor core: the drag state machine and the session
//! controller. Nothing here depends on a UI toolkit.

pub mod drag;
pub mod session;
