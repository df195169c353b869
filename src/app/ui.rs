use egui::{Button, Color32, ComboBox, Context, Pos2, Response, Sense, Ui};
use log::error;
use std::sync::{Arc, Mutex};

use super::App;
use crate::plotting::Tooltip;
use crate::types::{ChartKind, Granularity};

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Chart Options");
        ui.separator();

        ui.label("Variation:");
        let current = app.chart.variation().label().to_string();
        let mut picked = None;
        ComboBox::new("variation_selector", "")
            .selected_text(&current)
            .show_ui(ui, |ui| {
                for option in app.chart.variation_options() {
                    if ui.selectable_label(option == current, &option).clicked() {
                        picked = Some(option);
                    }
                }
            });
        if let Some(option) = picked.filter(|option| *option != current) {
            app.select_variation(&option);
        }

        ui.label("Granularity:");
        let mut granularity = app.chart.granularity();
        ComboBox::new("granularity_selector", "")
            .selected_text(granularity.as_str())
            .show_ui(ui, |ui| {
                for option in Granularity::ALL {
                    ui.selectable_value(&mut granularity, option, option.as_str());
                }
            });
        if granularity != app.chart.granularity() {
            app.select_granularity(granularity);
        }

        ui.label("Line style:");
        let mut kind = app.chart.kind();
        ComboBox::new("kind_selector", "")
            .selected_text(kind.as_str())
            .show_ui(ui, |ui| {
                for option in ChartKind::ALL {
                    ui.selectable_value(&mut kind, option, option.as_str());
                }
            });
        app.select_kind(kind);

        let mut dark = app.config.dark_theme;
        if ui.checkbox(&mut dark, "Dark theme").changed() {
            app.set_dark_theme(dark);
        }

        ui.separator();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(app.chart.can_zoom_out(), Button::new("Zoom out"))
                .clicked()
            {
                app.zoom_out();
            }
            if ui
                .add_enabled(app.chart.can_zoom_in(), Button::new("Zoom in"))
                .clicked()
            {
                app.zoom_in();
            }
            if ui.button("Reset").clicked() {
                app.reset_zoom();
            }
        });
        ui.horizontal(|ui| {
            if ui
                .add_enabled(app.chart.can_pan_left(), Button::new("◀ Earlier"))
                .clicked()
            {
                app.pan(-app.pan_step());
            }
            if ui
                .add_enabled(app.chart.can_pan_right(), Button::new("Later ▶"))
                .clicked()
            {
                app.pan(app.pan_step());
            }
        });

        ui.separator();

        if app.exporter.is_busy() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Exporting...");
            });
        } else if ui.button("Export PNG").clicked() {
            spawn_export(app, ctx, app_arc);
        }

        if let Some(status) = &app.status_message {
            ui.label(status);
        }
        if let Some(message) = &app.error_message {
            ui.colored_label(Color32::RED, message);
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Conversion Rate");
        ui.separator();

        if app.chart.filtered_series().is_empty() {
            ui.label("No data for this selection.");
        }

        if let Some(texture) = &app.plot_texture {
            let response = ui.add(egui::Image::new(texture).sense(Sense::click_and_drag()));
            handle_chart_pointer(app, &response);
        }

        if let Some(tooltip) = app.chart.tooltip() {
            ui.separator();
            ui.group(|ui| tooltip_ui(ui, &tooltip));
        }
    });

    // Update plot if needed
    if app.update_needed {
        match app.render_preview() {
            Ok(png) => load_plot_texture(app, ctx, &png),
            Err(e) => error!("Plotting error: {}", e),
        }
        app.update_needed = false;
    }
}

fn handle_chart_pointer(app: &mut App, response: &Response) {
    let (width, height) = app.config.preview_size;
    let scale_x = width as f32 / response.rect.width().max(1.0);
    let scale_y = height as f32 / response.rect.height().max(1.0);
    let to_image = |pos: Pos2| {
        (
            f64::from((pos.x - response.rect.left()) * scale_x),
            f64::from((pos.y - response.rect.top()) * scale_y),
        )
    };

    if response.dragged() {
        let on_brush = response
            .interact_pointer_pos()
            .map(|pos| app.in_brush(to_image(pos).1))
            .unwrap_or(false);
        app.drag_by(f64::from(response.drag_delta().x * scale_x), on_brush);
    }
    if response.drag_stopped() {
        app.end_drag();
    }

    if response.clicked() {
        if let Some((x, y)) = response.interact_pointer_pos().map(to_image) {
            if !app.in_brush(y) {
                app.click_at(x);
            }
        }
    }

    if let Some((x, y)) = response.hover_pos().map(to_image) {
        if !app.in_brush(y) && !response.dragged() {
            if let Some(tooltip) = app.hover_tooltip(x) {
                response
                    .clone()
                    .on_hover_ui_at_pointer(|ui| tooltip_ui(ui, &tooltip));
            }
        }
    }
}

fn tooltip_ui(ui: &mut Ui, tooltip: &Tooltip) {
    ui.strong(&tooltip.title);
    for entry in &tooltip.entries {
        let trophy = if entry.is_leader { "🏆 " } else { "" };
        let color = Color32::from_rgb(entry.color.0, entry.color.1, entry.color.2);
        ui.colored_label(color, format!("{}{}: {}", trophy, entry.name, entry.label));
    }
}

fn spawn_export(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    let job = app.export_job();
    app.status_message = None;
    let task_ctx = ctx.clone();

    tokio::spawn(async move {
        let result = job.run().await;
        match app_arc.lock() {
            Ok(mut app) => app.finish_export(result),
            Err(_) => error!("Failed to acquire app lock after export"),
        }
        task_ctx.request_repaint();
    });
    // Keep repainting so the spinner shows while the export runs.
    ctx.request_repaint();
}

fn load_plot_texture(app: &mut App, ctx: &Context, png: &[u8]) {
    match image::load_from_memory(png) {
        Ok(image) => {
            let size = [image.width() as usize, image.height() as usize];
            let pixels = image.to_rgba8();
            let pixels = pixels.as_flat_samples();
            let texture = ctx.load_texture(
                "plot_texture",
                egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
                egui::TextureOptions::LINEAR,
            );
            app.plot_texture = Some(texture);
        }
        Err(e) => error!("Failed to load plot image: {}", e),
    }
}
