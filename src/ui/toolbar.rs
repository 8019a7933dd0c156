// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with session navigation.
//!
//! This module provides the Start/Previous/Save/Next buttons together with
//! the image counter and the name of the current image.

use boxmark::editor::session::Session;

/// Button pressed on the toolbar this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Start,
    Previous,
    Next,
    Save,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, session: &Session) -> ToolbarAction {
    let mut action = ToolbarAction::None;
    let started = session.current_index().is_some();

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("▶ Start").clicked() {
            action = ToolbarAction::Start;
        }

        ui.separator();

        if ui.add_enabled(started, egui::Button::new("⏴ Previous")).clicked() {
            action = ToolbarAction::Previous;
        }
        if ui.add_enabled(started, egui::Button::new("💾 Save")).clicked() {
            action = ToolbarAction::Save;
        }
        if ui.add_enabled(started, egui::Button::new("Next ⏵")).clicked() {
            action = ToolbarAction::Next;
        }

        ui.separator();

        ui.label(format!("Images: {}", session.images().len()));

        if let (Some(index), Some(filename)) = (session.current_index(), session.current_filename()) {
            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "Current: {} ({}/{})",
                    filename,
                    index + 1,
                    session.images().len()
                ))
                .italics(),
            );
        }

        ui.separator();
        ui.label(
            egui::RichText::new("Previous and Next save the current image first")
                .italics()
                .weak(),
        );
    });

    action
}
