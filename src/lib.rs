// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! BOXMARK - bounding box annotation over a folder of images.
//!
//! The editor core (coordinate transform, drag state machine, session and
//! save-before-navigate protocol) and the folder-backed annotation store.
//! The desktop front end lives in the `boxmark` binary.

pub mod config;
pub mod editor;
pub mod io;
pub mod models;
pub mod util;
