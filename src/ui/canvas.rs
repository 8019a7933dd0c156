// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for image display and box annotation.
//!
//! The image is shown at its natural size inside a scroll area. Pointer
//! input is reported in display space relative to the image's top-left
//! corner; committed boxes are mapped back from natural space on every
//! frame.

use boxmark::editor::drag::PointerEvent;
use boxmark::editor::session::Session;
use boxmark::util::geometry::{Point, Rect, Size};

const BOX_COLOR: egui::Color32 = egui::Color32::from_rgb(34, 211, 238);
const BOX_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(5, 32, 36, 38);
const PREVIEW_COLOR: egui::Color32 = egui::Color32::from_rgb(245, 158, 11);

/// Result of canvas interaction.
pub enum CanvasAction {
    /// The drawing surface has this size in display pixels.
    Resize(Size),
    Pointer(PointerEvent),
}

/// Display the main canvas area and handle mouse interactions.
pub fn show(
    ui: &mut egui::Ui,
    session: &Session,
    image_texture: &Option<egui::TextureHandle>,
) -> Vec<CanvasAction> {
    let mut actions = Vec::new();
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        match (image_texture, session.transform().natural()) {
            (Some(texture), Some(natural)) => {
                egui::ScrollArea::both().drag_to_scroll(false).show(ui, |ui| {
                    let size = egui::vec2(natural.width as f32, natural.height as f32);
                    let (image_rect, response) = ui.allocate_exact_size(size, egui::Sense::drag());

                    actions.push(CanvasAction::Resize(Size::new(
                        image_rect.width() as f64,
                        image_rect.height() as f64,
                    )));

                    ui.painter().image(
                        texture.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );

                    if let Some(event) = pointer_event(ui, &response, image_rect) {
                        actions.push(CanvasAction::Pointer(event));
                    }

                    draw_boxes(ui.painter_at(image_rect), session, image_rect);
                });
            }
            _ if session.current_filename().is_some() => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("No image to display")
                            .color(egui::Color32::from_gray(180)),
                    );
                });
            }
            _ => {
                // Show welcome message before the session starts
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.heading(
                            egui::RichText::new("BOXMARK")
                                .size(32.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                        ui.label(
                            egui::RichText::new("Bounding box annotation")
                                .size(14.0)
                                .color(egui::Color32::from_gray(150)),
                        );
                        ui.add_space(20.0);
                        ui.label(
                            egui::RichText::new("Add at least one label, then press Start")
                                .color(egui::Color32::from_gray(180)),
                        );
                    });
                });
            }
        }
    });

    actions
}

/// Translate egui drag input into a drag state machine event.
fn pointer_event(
    ui: &egui::Ui,
    response: &egui::Response,
    image_rect: egui::Rect,
) -> Option<PointerEvent> {
    let pos = response
        .interact_pointer_pos()
        .or_else(|| ui.ctx().pointer_latest_pos())?;
    let local = Point::new(
        (pos.x - image_rect.min.x) as f64,
        (pos.y - image_rect.min.y) as f64,
    );

    if response.drag_started() {
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .filter(|p| image_rect.contains(*p))
            .unwrap_or(pos);
        Some(PointerEvent::Down(Point::new(
            (origin.x - image_rect.min.x) as f64,
            (origin.y - image_rect.min.y) as f64,
        )))
    } else if response.drag_stopped() {
        Some(PointerEvent::Up(local))
    } else if response.dragged() {
        if image_rect.contains(pos) {
            Some(PointerEvent::Move(local))
        } else {
            Some(PointerEvent::Leave(local))
        }
    } else {
        None
    }
}

/// Draw committed boxes and the drag preview.
fn draw_boxes(painter: egui::Painter, session: &Session, image_rect: egui::Rect) {
    let transform = session.transform();
    let active = session.active_box().map(|b| b.id());

    for b in &session.annotations().boxes {
        let shown = to_screen(transform.rect_to_display(b.rect()), image_rect);
        let width = if Some(b.id()) == active { 3.0 } else { 2.0 };

        painter.rect_filled(shown, 0.0, BOX_FILL);
        painter.rect_stroke(shown, 0.0, egui::Stroke::new(width, BOX_COLOR));

        if let Some(label) = &b.label {
            painter.text(
                shown.left_top() + egui::vec2(2.0, -2.0),
                egui::Align2::LEFT_BOTTOM,
                label,
                egui::FontId::proportional(12.0),
                BOX_COLOR,
            );
        }
    }

    if let Some(preview) = session.preview() {
        let r = to_screen(preview, image_rect);
        let corners = [
            r.left_top(),
            r.right_top(),
            r.right_bottom(),
            r.left_bottom(),
            r.left_top(),
        ];
        painter.extend(egui::Shape::dashed_line(
            &corners,
            egui::Stroke::new(2.0, PREVIEW_COLOR),
            6.0,
            6.0,
        ));
    }
}

/// Place a display-space rectangle on screen.
fn to_screen(rect: Rect, image_rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        image_rect.min + egui::vec2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.w as f32, rect.h as f32),
    )
}
