// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation properties panel.
//!
//! This module provides the side panel for managing labels, classifying the
//! whole image, and viewing and editing the boxes of the current image.

use boxmark::editor::session::Session;
use boxmark::models::annotation::{BoundingBox, BoxId};

/// Edits requested from the properties panel this frame.
pub enum PropertiesAction {
    AddLabel(String),
    SetImageLabel(Option<String>),
    SetImageDescription(String),
    Relabel(BoxId, String),
    Describe(BoxId, String),
    Delete(BoxId),
    Hover(BoxId),
}

/// Display the properties panel.
pub fn show(ui: &mut egui::Ui, session: &Session, label_input: &mut String) -> Vec<PropertiesAction> {
    let mut actions = Vec::new();

    ui.heading("Labels");
    ui.horizontal(|ui| {
        let response = ui.add(
            egui::TextEdit::singleline(label_input)
                .hint_text("New label")
                .desired_width(180.0),
        );
        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add").clicked() || entered {
            actions.push(PropertiesAction::AddLabel(std::mem::take(label_input)));
        }
    });
    ui.horizontal_wrapped(|ui| {
        for label in session.labels().iter() {
            ui.label(
                egui::RichText::new(label)
                    .background_color(egui::Color32::from_gray(60))
                    .color(egui::Color32::WHITE),
            );
        }
    });

    if session.current_index().is_some() {
        ui.separator();
        image_section(ui, session, &mut actions);
    }

    ui.separator();
    ui.heading("Box");
    stats(ui, session.active_box());

    ui.separator();
    ui.heading("Boxes");
    egui::ScrollArea::vertical().show(ui, |ui| {
        if session.annotations().boxes.is_empty() {
            ui.label(egui::RichText::new("Draw boxes to see them listed here.").weak());
        }
        for b in &session.annotations().boxes {
            box_card(ui, session, b, &mut actions);
        }
    });

    actions
}

/// Whole-image label and description.
fn image_section(ui: &mut egui::Ui, session: &Session, actions: &mut Vec<PropertiesAction>) {
    let annotations = session.annotations();

    ui.heading("Image");
    let current = annotations.image_label.as_deref();
    egui::ComboBox::from_label("Image label")
        .selected_text(current.unwrap_or("Unlabeled"))
        .show_ui(ui, |ui| {
            if ui.selectable_label(current.is_none(), "Unlabeled").clicked() {
                actions.push(PropertiesAction::SetImageLabel(None));
            }
            for label in session.labels().iter() {
                if ui.selectable_label(current == Some(label), label).clicked() {
                    actions.push(PropertiesAction::SetImageLabel(Some(label.to_string())));
                }
            }
        });

    let mut description = annotations.image_description.clone();
    let response = ui.add(
        egui::TextEdit::multiline(&mut description)
            .desired_rows(2)
            .hint_text("Optional description for this image"),
    );
    if response.changed() {
        actions.push(PropertiesAction::SetImageDescription(description));
    }
}

/// Summary of the active box.
fn stats(ui: &mut egui::Ui, active: Option<&BoundingBox>) {
    let Some(b) = active else {
        ui.label("No box selected");
        return;
    };
    ui.label(format!("Center: ({:.1}, {:.1})", b.cx(), b.cy()));
    ui.label(format!("Width: {:.1}", b.w()));
    ui.label(format!("Height: {:.1}", b.h()));
    ui.label(format!("Label: {}", b.label.as_deref().unwrap_or("Unassigned")));
    ui.label(format!(
        "Description: {}",
        if b.description.is_empty() { "None" } else { b.description.as_str() }
    ));
}

/// One editable entry of the box list.
fn box_card(
    ui: &mut egui::Ui,
    session: &Session,
    b: &BoundingBox,
    actions: &mut Vec<PropertiesAction>,
) {
    let id = b.id();
    let group = ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.strong(format!("Box #{}", id));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Delete").clicked() {
                    actions.push(PropertiesAction::Delete(id));
                }
            });
        });

        ui.label(format!(
            "Center: ({:.1}, {:.1}), Size: {:.1} x {:.1}",
            b.cx(),
            b.cy(),
            b.w(),
            b.h()
        ));

        let current = b.label.as_deref();
        egui::ComboBox::from_id_source(("box_label", id.0))
            .selected_text(current.unwrap_or("Unassigned"))
            .show_ui(ui, |ui| {
                for label in session.labels().iter() {
                    if ui.selectable_label(current == Some(label), label).clicked() {
                        actions.push(PropertiesAction::Relabel(id, label.to_string()));
                    }
                }
            });

        let mut description = b.description.clone();
        let response = ui.add(
            egui::TextEdit::multiline(&mut description)
                .id_source(("box_description", id.0))
                .desired_rows(2)
                .hint_text("Optional description for this box"),
        );
        if response.changed() {
            actions.push(PropertiesAction::Describe(id, description));
        }
    });

    if ui.rect_contains_pointer(group.response.rect) {
        actions.push(PropertiesAction::Hover(id));
    }
}
