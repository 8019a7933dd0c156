// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module binds the annotation [`Session`] to an egui window. It owns
//! the session and the store, loads image pixels in the background, and
//! turns UI actions into session operations. All annotation state changes
//! go through the session.

use crate::ui::{canvas, properties, toolbar};
use boxmark::config::AppConfig;
use boxmark::editor::session::{Session, Tone};
use boxmark::io::media::{load_image, LoadedImage};
use boxmark::io::store::{AnnotationStore, FolderStore};
use boxmark::models::label::LabelSet;
use boxmark::util::geometry::Size;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};

/// Result of background image loading operation.
struct LoadedImageData {
    filename: String,
    result: Result<LoadedImage, String>,
}

/// Main application state.
pub struct BoxmarkApp {
    /// The single owner of all annotation state
    session: Session,

    /// Image source and result sink (missing if the folders are unusable)
    store: Option<FolderStore>,

    /// Results folder, kept to reopen a store on another data folder
    result_dir: PathBuf,

    /// Texture of the current image
    image_texture: Option<egui::TextureHandle>,

    /// Receiver for background image loading
    image_loader: Option<Receiver<LoadedImageData>>,

    /// Loading state message
    loading_message: Option<String>,

    /// Text typed into the new-label field
    label_input: String,
}

impl BoxmarkApp {
    /// Create the application from its configuration.
    pub fn new(config: AppConfig) -> Self {
        let labels: LabelSet = config.labels.iter().collect();
        let mut app = Self {
            session: Session::new(labels),
            store: None,
            result_dir: config.result_dir,
            image_texture: None,
            image_loader: None,
            loading_message: None,
            label_input: String::new(),
        };
        app.open_data_folder(config.data_dir);
        app
    }

    /// Point the application at a data folder and fetch its image list.
    fn open_data_folder(&mut self, data_dir: PathBuf) {
        match FolderStore::new(&data_dir, &self.result_dir) {
            Ok(store) => {
                self.session.load_image_list(&store);
                self.store = Some(store);
            }
            Err(e) => {
                log::error!("Cannot open store for {}: {}", data_dir.display(), e);
                self.store = None;
                self.session.warn(e.to_string());
            }
        }
    }

    /// Switch to another data folder with a fresh session.
    ///
    /// The outgoing image is saved first; if that fails the switch is
    /// abandoned.
    fn switch_data_folder(&mut self, data_dir: PathBuf) {
        if self.session.current_filename().is_some() {
            let saved = match &self.store {
                Some(store) => self.session.save(store).is_ok(),
                None => false,
            };
            if !saved {
                log::warn!("Not switching folders: current image is not saved");
                return;
            }
        }

        log::info!("Opening data folder {}", data_dir.display());
        self.session = Session::new(self.session.labels().clone());
        self.image_texture = None;
        self.image_loader = None;
        self.loading_message = None;
        self.open_data_folder(data_dir);
    }

    /// Load the pixels of an image file (asynchronously).
    fn load_image(&mut self, filename: String) {
        let Some(store) = &self.store else {
            return;
        };
        let path = store.image_path(&filename);

        // Drop the old texture right away so it never shows under the new
        // image's (empty) annotations.
        self.image_texture = None;

        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(format!("Loading {}...", filename));

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let result = load_image(&path).map_err(|e| format!("{:#}", e));
            let _ = sender.send(LoadedImageData { filename, result });
        });
    }

    /// Pick up a finished background load, if any.
    fn poll_image_loader(&mut self, ctx: &egui::Context) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let Ok(data) = receiver.try_recv() else {
            return;
        };
        self.image_loader = None;
        self.loading_message = None;

        match data.result {
            Ok(loaded) => {
                if self.session.current_filename() == Some(data.filename.as_str()) {
                    let size = [loaded.width as usize, loaded.height as usize];
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &loaded.pixels);
                    self.image_texture = Some(ctx.load_texture(
                        data.filename.clone(),
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
                self.session.image_loaded(
                    &data.filename,
                    Size::new(loaded.width as f64, loaded.height as f64),
                );
            }
            Err(e) => {
                log::error!("Failed to load image {}: {}", data.filename, e);
                self.session.image_failed(&data.filename, &e);
            }
        }
    }

    fn start(&mut self) {
        let Some(store) = &self.store else {
            self.session.warn("No data folder is open.");
            return;
        };
        if let Some(filename) = self.session.start(store) {
            self.load_image(filename);
        }
    }

    fn save(&mut self) {
        match &self.store {
            Some(store) => {
                // Outcome is reported through the session status.
                let _ = self.session.save(store);
            }
            None => self.session.warn("No data folder is open."),
        }
    }

    fn next(&mut self) {
        let next = self.store.as_ref().and_then(|store| self.session.next(store));
        if let Some(filename) = next {
            self.load_image(filename);
        }
    }

    fn previous(&mut self) {
        let previous = self
            .store
            .as_ref()
            .and_then(|store| self.session.previous(store));
        if let Some(filename) = previous {
            self.load_image(filename);
        }
    }

    fn apply_properties_action(&mut self, action: properties::PropertiesAction) {
        use properties::PropertiesAction;

        match action {
            PropertiesAction::AddLabel(label) => {
                self.session.add_label(&label);
            }
            PropertiesAction::SetImageLabel(label) => {
                self.session.set_image_label(label.as_deref());
            }
            PropertiesAction::SetImageDescription(text) => {
                self.session.set_image_description(text);
            }
            PropertiesAction::Relabel(id, label) => {
                self.session.relabel(id, &label);
            }
            PropertiesAction::Describe(id, text) => {
                self.session.describe(id, text);
            }
            PropertiesAction::Delete(id) => {
                self.session.delete_box(id);
            }
            PropertiesAction::Hover(id) => self.session.touch(id),
        }
    }
}

impl eframe::App for BoxmarkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Data Folder...").clicked() {
                        // Open native folder picker
                        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                            self.switch_data_folder(dir);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Save (Ctrl+S)").clicked() {
                        self.save();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, &self.session))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Start => self.start(),
            toolbar::ToolbarAction::Previous => self.previous(),
            toolbar::ToolbarAction::Next => self.next(),
            toolbar::ToolbarAction::Save => self.save(),
            toolbar::ToolbarAction::None => {}
        }

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            self.save();
        }

        // Status line (bottom)
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            let status = self.session.status();
            let color = match status.tone {
                Tone::Muted => egui::Color32::from_gray(170),
                Tone::Success => egui::Color32::from_rgb(74, 222, 128),
                Tone::Warning => egui::Color32::from_rgb(245, 158, 11),
            };
            ui.label(egui::RichText::new(&status.message).color(color));
        });

        // Properties panel (right side)
        let properties_actions = egui::SidePanel::right("properties")
            .default_width(300.0)
            .show(ctx, |ui| properties::show(ui, &self.session, &mut self.label_input))
            .inner;

        for action in properties_actions {
            self.apply_properties_action(action);
        }

        // Main canvas (center)
        let canvas_actions = egui::CentralPanel::default()
            .show(ctx, |ui| {
                // Show loading overlay if loading
                if let Some(ref message) = self.loading_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                    Vec::new()
                } else {
                    canvas::show(ui, &self.session, &self.image_texture)
                }
            })
            .inner;

        for action in canvas_actions {
            match action {
                canvas::CanvasAction::Resize(size) => self.session.resize_display(size),
                canvas::CanvasAction::Pointer(event) => {
                    log::trace!("Pointer {:?}", event);
                    self.session.pointer(event);
                }
            }
        }
    }
}
