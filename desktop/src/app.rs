use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use eframe::egui::{self, Color32, Pos2, Rect, RichText, Vec2};

use crate::io::{export_claim_json, import_claim, load_state, save_state, state_path};
use crate::model::{AppState, View};
use swiftclaim_common::board::{initial_layout, BoardSession, ManipulationMode, MANUAL_LAYOUT};
use swiftclaim_common::crop::{decode_base64_image, encode_image_base64, CropSession};
use swiftclaim_common::{
    category_universe, parse_classify_response, summarize, Entry, FALLBACK_CATEGORY,
};

/// A4 aspect used by the on-screen attachment board preview.
const BOARD_ASPECT: f32 = 210.0 / 297.0;
const CORNER_HIT_RADIUS: f32 = 14.0;
const RESIZE_HANDLE: f32 = 14.0;
const CAPTURE_TEXTURE_KEY: &str = "capture:pending";

pub struct ClaimApp {
    state: AppState,
    state_file: PathBuf,
    board: BoardSession,
    crop: Option<CropOverlay>,
    new_category: String,
    status: String,
    classify_status: String,
    export_status: String,
    export_format: ExportFormat,
    export_landscape: bool,
    classify_rx: Option<Receiver<UiMessage>>,
    export_rx: Option<Receiver<UiMessage>>,
    classifying: bool,
    exporting: bool,
    textures: HashMap<String, egui::TextureHandle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ExportFormat {
    #[default]
    Pdf,
    Excel,
    Both,
}

impl ExportFormat {
    fn arg(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Both => "both",
        }
    }
}

enum UiMessage {
    ClassifyDone {
        entry_id: String,
        message: String,
        suggestion: Option<(f64, String)>,
    },
    ExportDone {
        message: String,
    },
}

struct CropOverlay {
    /// `Some` when recropping an existing entry, `None` for a fresh capture.
    entry_id: Option<String>,
    session: CropSession,
    source: image::DynamicImage,
    source_base64: String,
    texture_key: String,
}

impl Default for ClaimApp {
    fn default() -> Self {
        let state_file = state_path();
        let claim = load_state(&state_file);
        Self {
            state: AppState {
                claim,
                ..Default::default()
            },
            state_file,
            board: BoardSession::new(),
            crop: None,
            new_category: String::new(),
            status: String::new(),
            classify_status: String::new(),
            export_status: String::new(),
            export_format: ExportFormat::default(),
            export_landscape: false,
            classify_rx: None,
            export_rx: None,
            classifying: false,
            exporting: false,
            textures: HashMap::new(),
        }
    }
}

impl ClaimApp {
    fn autosave(&mut self) {
        match save_state(&self.state_file, &self.state.claim) {
            Ok(_) => self.state.dirty = false,
            Err(err) => self.status = format!("Autosave failed: {err}"),
        }
    }

    fn import_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file()
        else {
            return;
        };
        // A rejected file leaves the current claim untouched
        match import_claim(&path) {
            Ok(claim) => {
                self.state.claim = claim;
                self.state.selected_id = None;
                self.textures.clear();
                self.state.mark_dirty();
                self.autosave();
                self.status = format!("Imported {}", path.display());
            }
            Err(err) => self.status = format!("Import failed: {err}"),
        }
    }

    fn export_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("claim.json")
            .save_file()
        else {
            return;
        };
        match export_claim_json(&path, &self.state.claim) {
            Ok(_) => self.status = format!("Exported {}", path.display()),
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn new_claim(&mut self) {
        let confirmed = rfd::MessageDialog::new()
            .set_title("New Claim")
            .set_description("Discard the current claim and start over?")
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            == rfd::MessageDialogResult::Yes;
        if !confirmed {
            return;
        }
        self.state.claim = Default::default();
        self.state.selected_id = None;
        self.textures.clear();
        self.crop = None;
        self.state.mark_dirty();
        self.autosave();
        self.status = "Started a new claim".to_string();
    }

    fn add_manual_entry(&mut self) {
        let entry = Entry {
            id: swiftclaim_common::types::new_entry_id(),
            category: FALLBACK_CATEGORY.to_string(),
            is_manual: true,
            layout: MANUAL_LAYOUT,
            ..Default::default()
        };
        self.state.selected_id = Some(entry.id.clone());
        self.state.claim.entries.push(entry);
        self.state.mark_dirty();
        self.autosave();
    }

    /// Pick a receipt photo and open the crop overlay over it. The entry
    /// itself is only created once the crop is applied.
    fn capture_receipt(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png"])
            .pick_file()
        else {
            return;
        };

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.status = format!("Cannot read {}: {err}", path.display());
                return;
            }
        };
        match image::load_from_memory(&bytes) {
            Ok(source) => {
                self.textures.remove(CAPTURE_TEXTURE_KEY);
                self.crop = Some(CropOverlay {
                    entry_id: None,
                    session: CropSession::new(),
                    source,
                    source_base64: encode_image_base64(&bytes),
                    texture_key: CAPTURE_TEXTURE_KEY.to_string(),
                });
            }
            Err(err) => self.status = format!("Cannot open image: {err}"),
        }
    }

    /// Classifies the cropped receipt behind an entry on a worker thread
    /// through the CLI, so the UI stays responsive while the AI runs. The
    /// entry already exists with fallback values; a failed classification
    /// just leaves them in place. `image_path` is a temp file owned by the
    /// worker and removed once the CLI returns.
    fn spawn_classify(&mut self, entry_id: String, image_path: PathBuf) {
        let categories = category_universe(&self.state.claim);
        let cli = resolve_cli_binary();
        let (tx, rx) = mpsc::channel();
        self.classify_rx = Some(rx);
        self.classifying = true;
        self.classify_status = "Classifying receipt...".to_string();

        std::thread::spawn(move || {
            let result = classify_worker(&cli, &image_path);
            let _ = std::fs::remove_file(&image_path);
            let message = match result {
                Ok((amount, mut category)) => {
                    if !categories.iter().any(|c| c == &category) {
                        category = FALLBACK_CATEGORY.to_string();
                    }
                    UiMessage::ClassifyDone {
                        entry_id,
                        message: format!("Classified: RM {:.2} ({})", amount, category),
                        suggestion: Some((amount, category)),
                    }
                }
                Err(err) => UiMessage::ClassifyDone {
                    entry_id,
                    message: format!("Classification failed: {err} (entry keeps defaults)"),
                    suggestion: None,
                },
            };
            let _ = tx.send(message);
        });
    }

    fn run_export(&mut self) {
        let export_path = self
            .state_file
            .parent()
            .map(|p| p.join("export-claim.json"))
            .unwrap_or_else(|| PathBuf::from("export-claim.json"));
        if let Err(err) = export_claim_json(&export_path, &self.state.claim) {
            self.export_status = format!("Export failed: {err}");
            return;
        }

        let cli = resolve_cli_binary();
        let format_arg = self.export_format.arg();
        let orientation = if self.export_landscape {
            "landscape"
        } else {
            "portrait"
        };
        let (tx, rx) = mpsc::channel();
        self.export_rx = Some(rx);
        self.exporting = true;
        self.export_status = "Export running...".to_string();

        std::thread::spawn(move || {
            let result = std::process::Command::new(cli)
                .args([
                    "export",
                    export_path.to_string_lossy().as_ref(),
                    "--format",
                    format_arg,
                    "--orientation",
                    orientation,
                ])
                .output();

            let message = match result {
                Ok(out) if out.status.success() => UiMessage::ExportDone {
                    message: "Export complete".to_string(),
                },
                Ok(out) => {
                    let stderr = String::from_utf8_lossy(&out.stderr);
                    UiMessage::ExportDone {
                        message: format!("Export failed: {}", stderr.trim()),
                    }
                }
                Err(err) => UiMessage::ExportDone {
                    message: format!("Export failed: {err}"),
                },
            };
            let _ = tx.send(message);
        });
    }

    fn poll_messages(&mut self) {
        let classify_msg = self
            .classify_rx
            .as_ref()
            .and_then(|rx| rx.try_recv().ok());
        if let Some(UiMessage::ClassifyDone {
            entry_id,
            message,
            suggestion,
        }) = classify_msg
        {
            self.classify_status = message;
            self.classifying = false;
            self.classify_rx = None;
            if let Some((amount, category)) = suggestion {
                if let Some(entry) = self.state.claim.entry_mut(&entry_id) {
                    entry.amount = amount;
                    entry.category = category;
                }
                self.state.mark_dirty();
                self.autosave();
            }
        }

        let export_msg = self.export_rx.as_ref().and_then(|rx| rx.try_recv().ok());
        if let Some(UiMessage::ExportDone { message }) = export_msg {
            self.export_status = message;
            self.exporting = false;
            self.export_rx = None;
        }
    }

    /// Decodes a base64 image into a cached texture. Keyed so recrops
    /// invalidate by removing the key.
    fn texture_for(
        &mut self,
        ctx: &egui::Context,
        key: String,
        base64_data: &str,
    ) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.textures.get(&key) {
            return Some(texture.clone());
        }
        let decoded = decode_base64_image(base64_data).ok()?;
        let size = [decoded.width() as usize, decoded.height() as usize];
        let pixels = decoded.to_rgba8().into_raw();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
        let texture = ctx.load_texture(&key, color_image, egui::TextureOptions::default());
        self.textures.insert(key, texture.clone());
        Some(texture)
    }

    // =============================================
    // Dashboard
    // =============================================

    fn render_dashboard(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.label("Name");
            if ui
                .add(egui::TextEdit::singleline(&mut self.state.claim.name).desired_width(160.0))
                .changed()
            {
                self.state.mark_dirty();
            }
            ui.label("Month");
            if ui
                .add(egui::TextEdit::singleline(&mut self.state.claim.month).desired_width(100.0))
                .changed()
            {
                self.state.mark_dirty();
            }
            ui.separator();
            ui.label(format!(
                "Total: RM {:.2}",
                self.state.claim.total_amount()
            ));
        });

        ui.horizontal(|ui| {
            ui.label("New category");
            ui.add(egui::TextEdit::singleline(&mut self.new_category).desired_width(140.0));
            if ui.button("Add").clicked() {
                let name = self.new_category.trim().to_string();
                if self.state.claim.add_custom_category(&name) {
                    self.new_category.clear();
                    self.state.mark_dirty();
                    self.autosave();
                    self.status = format!("Added category \"{}\"", name);
                } else {
                    self.status = "Category rejected (empty or duplicate)".to_string();
                }
            }
        });
        ui.separator();

        let categories = category_universe(&self.state.claim);
        let entry_ids: Vec<String> = self.state.claim.entries.iter().map(|e| e.id.clone()).collect();
        let mut removed: Option<String> = None;
        let mut crop_target: Option<String> = None;
        let mut changed = false;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for id in &entry_ids {
                    let card_changed = self.render_entry_card(
                        ui,
                        ctx,
                        id,
                        &categories,
                        &mut removed,
                        &mut crop_target,
                    );
                    changed |= card_changed;
                    ui.add_space(8.0);
                }
            });

        if let Some(id) = removed {
            self.state.claim.remove_entry(&id);
            self.textures.remove(&format!("{id}:orig"));
            self.textures.remove(&format!("{id}:crop"));
            if self.state.selected_id.as_deref() == Some(id.as_str()) {
                self.state.selected_id = None;
            }
            changed = true;
        }

        if let Some(id) = crop_target {
            self.open_crop(&id);
        }

        if changed {
            self.state.mark_dirty();
        }
        // Covers card edits and the name/month fields in one place
        if self.state.dirty {
            self.autosave();
        }
    }

    fn render_entry_card(
        &mut self,
        ui: &mut egui::Ui,
        ctx: &egui::Context,
        id: &str,
        categories: &[String],
        removed: &mut Option<String>,
        crop_target: &mut Option<String>,
    ) -> bool {
        let is_selected = self.state.selected_id.as_deref() == Some(id);
        let mut changed = false;

        // Thumbnail prefers the crop over the original
        let thumb = {
            let entry = self.state.claim.entries.iter().find(|e| e.id == id);
            entry.and_then(|e| {
                if let Some(cropped) = &e.cropped_image {
                    Some((format!("{id}:crop"), cropped.clone()))
                } else if !e.original_image.is_empty() {
                    Some((format!("{id}:orig"), e.original_image.clone()))
                } else {
                    None
                }
            })
        };
        let texture = thumb.and_then(|(key, data)| self.texture_for(ctx, key, &data));

        let Some(entry) = self.state.claim.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };

        let frame = egui::Frame::none()
            .fill(if is_selected {
                Color32::from_rgb(31, 35, 48)
            } else {
                Color32::from_rgb(24, 28, 40)
            })
            .stroke(egui::Stroke::new(
                1.0,
                if is_selected {
                    Color32::from_rgb(246, 196, 69)
                } else {
                    Color32::from_gray(40)
                },
            ))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(10.0));

        let inner = frame.show(ui, |ui| {
            ui.horizontal(|ui| {
                let thumb_size = Vec2::new(120.0, 90.0);
                match &texture {
                    Some(texture) => {
                        ui.add(egui::Image::new(texture).fit_to_exact_size(thumb_size));
                    }
                    None => {
                        ui.allocate_ui_with_layout(
                            thumb_size,
                            egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                            |ui| {
                                ui.label(if entry.is_manual { "Manual" } else { "No image" });
                            },
                        );
                    }
                }

                ui.add_space(8.0);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Category");
                        egui::ComboBox::from_id_source(format!("cat_{id}"))
                            .selected_text(entry.category.clone())
                            .show_ui(ui, |ui| {
                                for category in categories {
                                    if ui
                                        .selectable_value(
                                            &mut entry.category,
                                            category.clone(),
                                            category,
                                        )
                                        .changed()
                                    {
                                        changed = true;
                                    }
                                }
                            });

                        ui.label("Amount");
                        if ui
                            .add(
                                egui::DragValue::new(&mut entry.amount)
                                    .speed(0.1)
                                    .clamp_range(0.0..=f64::MAX)
                                    .prefix("RM "),
                            )
                            .changed()
                        {
                            changed = true;
                        }
                    });

                    ui.horizontal(|ui| {
                        ui.label("Date");
                        if ui
                            .add(egui::TextEdit::singleline(&mut entry.date).desired_width(90.0))
                            .changed()
                        {
                            changed = true;
                        }
                        ui.label("Remark");
                        if ui
                            .add(egui::TextEdit::singleline(&mut entry.remark).desired_width(160.0))
                            .changed()
                        {
                            changed = true;
                        }
                    });

                    ui.horizontal(|ui| {
                        if !entry.original_image.is_empty() && ui.button("Crop").clicked() {
                            *crop_target = Some(id.to_string());
                        }
                        if ui.button("Delete").clicked() {
                            *removed = Some(id.to_string());
                        }
                        if entry.is_manual {
                            ui.label(RichText::new("manual").color(Color32::from_gray(140)));
                        }
                    });
                });
            });
        });

        if inner.response.interact(egui::Sense::click()).clicked() {
            self.state.selected_id = Some(id.to_string());
        }

        changed
    }

    // =============================================
    // Crop overlay
    // =============================================

    fn open_crop(&mut self, id: &str) {
        let Some(entry) = self.state.claim.entries.iter().find(|e| e.id == id) else {
            return;
        };
        match decode_base64_image(&entry.original_image) {
            Ok(source) => {
                self.crop = Some(CropOverlay {
                    entry_id: Some(id.to_string()),
                    session: CropSession::new(),
                    source,
                    source_base64: entry.original_image.clone(),
                    texture_key: format!("{id}:orig"),
                });
            }
            Err(err) => self.status = format!("Cannot open crop: {err}"),
        }
    }

    fn render_crop_overlay(&mut self, ctx: &egui::Context) {
        // The overlay texture comes from the already-decoded source, not
        // the base64 payload.
        let Some(overlay) = &self.crop else {
            return;
        };
        let texture_key = overlay.texture_key.clone();
        if !self.textures.contains_key(&texture_key) {
            let size = [
                overlay.source.width() as usize,
                overlay.source.height() as usize,
            ];
            let pixels = overlay.source.to_rgba8().into_raw();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
            let texture = ctx.load_texture(&texture_key, color_image, egui::TextureOptions::default());
            self.textures.insert(texture_key.clone(), texture);
        }
        let texture = self.textures.get(&texture_key).cloned();

        let Some(overlay) = &mut self.crop else {
            return;
        };
        let mut apply = false;
        let mut cancel = false;

        egui::Window::new("Crop Receipt")
            .collapsible(false)
            .resizable(true)
            .default_size(Vec2::new(520.0, 620.0))
            .show(ctx, |ui| {
                ui.label("Drag the corners around the receipt, then apply.");

                let avail = ui.available_size() - Vec2::new(0.0, 40.0);
                let img_aspect =
                    overlay.source.width() as f32 / overlay.source.height() as f32;
                let mut size = Vec2::new(avail.x, avail.x / img_aspect);
                if size.y > avail.y {
                    size = Vec2::new(avail.y * img_aspect, avail.y);
                }
                size = size.max(Vec2::splat(50.0));

                let (response, painter) =
                    ui.allocate_painter(size, egui::Sense::click_and_drag());
                let rect = response.rect;

                if let Some(texture) = &texture {
                    painter.image(
                        texture.id(),
                        rect,
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }

                let corners: Vec<Pos2> = overlay
                    .session
                    .shape()
                    .corners
                    .iter()
                    .map(|p| {
                        Pos2::new(
                            rect.min.x + p.x * rect.width(),
                            rect.min.y + p.y * rect.height(),
                        )
                    })
                    .collect();

                // Quadrilateral outline + corner handles
                for i in 0..4 {
                    painter.line_segment(
                        [corners[i], corners[(i + 1) % 4]],
                        egui::Stroke::new(2.0, Color32::from_rgb(246, 196, 69)),
                    );
                }
                for (i, corner) in corners.iter().enumerate() {
                    let active = overlay.session.dragging_corner() == Some(i);
                    painter.circle_filled(
                        *corner,
                        if active { 8.0 } else { 6.0 },
                        Color32::from_rgb(246, 196, 69),
                    );
                }

                if response.drag_started() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        let nearest = corners
                            .iter()
                            .enumerate()
                            .min_by(|(_, a), (_, b)| {
                                a.distance(pointer)
                                    .partial_cmp(&b.distance(pointer))
                                    .unwrap_or(std::cmp::Ordering::Equal)
                            })
                            .map(|(i, _)| i);
                        if let Some(i) = nearest {
                            if corners[i].distance(pointer) <= CORNER_HIT_RADIUS {
                                overlay.session.begin_drag(i);
                            }
                        }
                    }
                }
                if response.dragged() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        overlay.session.update_drag(
                            (pointer.x, pointer.y),
                            (rect.min.x, rect.min.y),
                            (rect.width(), rect.height()),
                        );
                    }
                }
                if response.drag_stopped() {
                    overlay.session.end_drag();
                }

                ui.horizontal(|ui| {
                    if ui.button("Apply").clicked() {
                        apply = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if apply {
            let crop_result = overlay.session.compute_crop(&overlay.source);
            let recrop_id = overlay.entry_id.clone();
            let source_base64 = overlay.source_base64.clone();

            match crop_result {
                Ok(output) => {
                    let cropped = output.to_base64();
                    match recrop_id {
                        Some(entry_id) => {
                            if let Some(entry) = self.state.claim.entry_mut(&entry_id) {
                                entry.cropped_image = Some(cropped);
                            }
                            self.textures.remove(&format!("{entry_id}:crop"));
                            self.status = "Crop applied".to_string();
                        }
                        None => {
                            // One new entry per applied crop; classification
                            // fills in amount/category afterwards or leaves
                            // the fallback values.
                            let entry = Entry {
                                id: swiftclaim_common::types::new_entry_id(),
                                original_image: source_base64,
                                cropped_image: Some(cropped),
                                category: FALLBACK_CATEGORY.to_string(),
                                layout: initial_layout(self.state.claim.entries.len()),
                                ..Default::default()
                            };
                            let entry_id = entry.id.clone();
                            self.state.selected_id = Some(entry_id.clone());
                            self.state.claim.entries.push(entry);
                            // The classifier sees the cropped receipt, not
                            // the whole photo it was cut from.
                            match write_classify_input(&entry_id, &output.jpeg) {
                                Ok(path) => self.spawn_classify(entry_id, path),
                                Err(err) => {
                                    self.classify_status =
                                        format!("Classification skipped: {err} (entry keeps defaults)");
                                }
                            }
                            self.status = "Receipt added".to_string();
                        }
                    }
                    self.textures.remove(CAPTURE_TEXTURE_KEY);
                    self.crop = None;
                    self.state.mark_dirty();
                    self.autosave();
                }
                Err(err) => self.status = format!("Crop failed: {err}"),
            }
        } else if cancel {
            self.textures.remove(CAPTURE_TEXTURE_KEY);
            self.crop = None;
        }
    }

    // =============================================
    // Preview (summary + attachment board)
    // =============================================

    fn render_preview(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (rows, grand_total) = summarize(&self.state.claim);

        ui.columns(2, |columns| {
            let ui = &mut columns[0];
            ui.heading("Summary");
            egui::ScrollArea::vertical()
                .id_source("summary")
                .show(ui, |ui| {
                    egui::Grid::new("summary_grid")
                        .striped(true)
                        .min_col_width(40.0)
                        .show(ui, |ui| {
                            ui.label(RichText::new("Items").strong());
                            ui.label(RichText::new("Descriptions").strong());
                            ui.label(RichText::new("Amount (RM)").strong());
                            ui.end_row();

                            for row in &rows {
                                ui.label(row.index.to_string());
                                if row.remarks.is_empty() {
                                    ui.label(&row.name);
                                } else {
                                    ui.label(format!("{} ({})", row.name, row.remarks));
                                }
                                if row.total_amount > 0.0 {
                                    ui.label(format!("{:.2}", row.total_amount));
                                } else {
                                    ui.label("");
                                }
                                ui.end_row();
                            }

                            ui.label("");
                            ui.label(RichText::new("Total").strong());
                            ui.label(RichText::new(format!("{:.2}", grand_total)).strong());
                            ui.end_row();
                        });
                });

            let ui = &mut columns[1];
            ui.heading("Attachments");
            self.render_board(ui, ctx);
        });
    }

    fn render_board(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let avail = ui.available_size();
        let mut size = Vec2::new(avail.x, avail.x / BOARD_ASPECT);
        if size.y > avail.y {
            size = Vec2::new(avail.y * BOARD_ASPECT, avail.y);
        }

        let (board_response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let board_rect = board_response.rect;
        painter.rect_filled(board_rect, 4.0, Color32::WHITE);
        painter.rect_stroke(board_rect, 4.0, egui::Stroke::new(1.0, Color32::from_gray(120)));

        let placed: Vec<(String, swiftclaim_common::Layout, String)> = self
            .state
            .claim
            .entries
            .iter()
            .filter_map(|e| {
                e.cropped_image
                    .as_ref()
                    .map(|img| (e.id.clone(), e.layout, img.clone()))
            })
            .collect();

        let mut update: Option<(String, swiftclaim_common::Layout)> = None;
        let mut gesture_ended = false;

        for (id, layout, image_data) in &placed {
            let entry_rect = Rect::from_min_size(
                Pos2::new(
                    board_rect.min.x + layout.x / 100.0 * board_rect.width(),
                    board_rect.min.y + layout.y / 100.0 * board_rect.height(),
                ),
                Vec2::new(
                    layout.width / 100.0 * board_rect.width(),
                    layout.height / 100.0 * board_rect.height(),
                ),
            );

            if let Some(texture) = self.texture_for(ctx, format!("{id}:crop"), image_data) {
                painter.image(
                    texture.id(),
                    entry_rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            painter.rect_stroke(
                entry_rect,
                0.0,
                egui::Stroke::new(1.0, Color32::from_gray(180)),
            );

            // Whole-rect drag moves, the bottom-right handle resizes
            let resize_rect = Rect::from_min_size(
                entry_rect.max - Vec2::splat(RESIZE_HANDLE),
                Vec2::splat(RESIZE_HANDLE),
            );
            painter.rect_filled(resize_rect, 2.0, Color32::from_rgb(246, 196, 69));

            let resize_response = ui.interact(
                resize_rect,
                egui::Id::new(format!("resize_{id}")),
                egui::Sense::drag(),
            );
            let move_response = ui.interact(
                entry_rect,
                egui::Id::new(format!("move_{id}")),
                egui::Sense::drag(),
            );

            for (response, mode) in [
                (&resize_response, ManipulationMode::Resize),
                (&move_response, ManipulationMode::Move),
            ] {
                if response.drag_started() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.board.begin(id, mode, (pointer.x, pointer.y), *layout);
                    }
                }
                if response.dragged() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        if let Some(result) = self.board.update(
                            (pointer.x, pointer.y),
                            (board_rect.width(), board_rect.height()),
                        ) {
                            update = Some(result);
                        }
                    }
                }
                if response.drag_stopped() {
                    gesture_ended = true;
                }
            }
        }

        if let Some((id, layout)) = update {
            if let Some(entry) = self.state.claim.entry_mut(&id) {
                entry.layout = layout;
                self.state.mark_dirty();
            }
        }
        if gesture_ended {
            self.board.end();
            self.autosave();
        }

        if placed.is_empty() {
            ui.label("Crop a receipt to place it on the board.");
        }
    }
}

impl eframe::App for ClaimApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.classifying || self.exporting {
            ctx.request_repaint();
        }
        self.poll_messages();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Import JSON").clicked() {
                        self.import_json();
                        ui.close_menu();
                    }
                    if ui.button("Export JSON").clicked() {
                        self.export_json();
                        ui.close_menu();
                    }
                    if ui.button("New Claim").clicked() {
                        self.new_claim();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Capture", |ui| {
                    if ui
                        .add_enabled(!self.classifying, egui::Button::new("Add Receipt Photo"))
                        .clicked()
                    {
                        self.capture_receipt();
                        ui.close_menu();
                    }
                    if ui.button("Add Manual Entry").clicked() {
                        self.add_manual_entry();
                        ui.close_menu();
                    }
                });

                ui.menu_button("Export", |ui| {
                    ui.radio_value(&mut self.export_format, ExportFormat::Pdf, "PDF");
                    ui.radio_value(&mut self.export_format, ExportFormat::Excel, "Excel");
                    ui.radio_value(&mut self.export_format, ExportFormat::Both, "Both");
                    ui.checkbox(&mut self.export_landscape, "Landscape");
                    let enabled = !self.state.claim.entries.is_empty() && !self.exporting;
                    if ui
                        .add_enabled(enabled, egui::Button::new("Generate Claim Form"))
                        .clicked()
                    {
                        self.run_export();
                        ui.close_menu();
                    }
                });

                ui.separator();
                ui.selectable_value(&mut self.state.view, View::Dashboard, "Dashboard");
                ui.selectable_value(&mut self.state.view, View::Preview, "Preview");

                ui.separator();
                if !self.classify_status.is_empty() {
                    ui.label(RichText::new(&self.classify_status).color(Color32::from_gray(170)));
                }
                if !self.export_status.is_empty() {
                    ui.label(
                        RichText::new(&self.export_status).color(Color32::from_rgb(246, 196, 69)),
                    );
                }
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Dashboard => self.render_dashboard(ui, ctx),
            View::Preview => self.render_preview(ui, ctx),
        });

        self.render_crop_overlay(ctx);
    }
}

/// Writes a crop's JPEG bytes to a temp file the CLI can read. One file
/// per entry id, so a recapture overwrites its predecessor.
fn write_classify_input(entry_id: &str, jpeg: &[u8]) -> std::io::Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("swiftclaim-classify-{entry_id}.jpg"));
    std::fs::write(&path, jpeg)?;
    Ok(path)
}

/// Worker-thread half of classification: run the CLI on the cropped
/// receipt and return (amount, category).
fn classify_worker(cli: &Path, path: &Path) -> anyhow::Result<(f64, String)> {
    let output = std::process::Command::new(cli)
        .args(["classify", path.to_string_lossy().as_ref(), "--json"])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("classify failed: {}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let suggestion = parse_classify_response(&stdout)
        .map_err(|e| anyhow::anyhow!("bad classify output: {e}"))?;

    Ok((suggestion.amount, suggestion.category_suggestion))
}

fn resolve_cli_binary() -> PathBuf {
    let bin_name = if cfg!(windows) {
        "swiftclaim.exe"
    } else {
        "swiftclaim"
    };
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        let local = base_dir.join(bin_name);
        if local.exists() {
            return local;
        }
        if let Some(target_dir) = base_dir.parent() {
            let sibling = target_dir.join("debug").join(bin_name);
            if sibling.exists() {
                return sibling;
            }
            let release = target_dir.join("release").join(bin_name);
            if release.exists() {
                return release;
            }
        }
    }
    PathBuf::from(bin_name)
}
