use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::query::{matching_titles, unique_titles};
use crate::state::AppState;

/// Upper bound on entries rendered in the title picker popup.
const MAX_PICKER_ENTRIES: usize = 500;

// ---------------------------------------------------------------------------
// Left side panel – title picker and cluster summary
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("JobLens: Explore Skills by Job Title");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let titles = unique_titles(dataset);
    if titles.is_empty() {
        ui.label("The dataset has no job titles.");
        return;
    }

    // Clone what we need so we can mutate state inside the picker.
    let matches: Vec<String> = matching_titles(titles, &state.title_query, MAX_PICKER_ENTRIES)
        .into_iter()
        .map(str::to_string)
        .collect();
    let description = state
        .selection
        .as_ref()
        .and_then(|sel| dataset.jobs.get(sel.index))
        .and_then(|job| job.description.clone());

    ui.strong("Search by Job Title");
    title_picker(ui, state, &matches);
    ui.add_space(8.0);

    let Some(sel) = state.selection.clone() else {
        return;
    };
    let legend: Vec<(String, Color32)> = state
        .color_map
        .as_ref()
        .map(|cm| {
            cm.legend_entries()
                .into_iter()
                .map(|(id, c)| (id.to_string(), c))
                .collect()
        })
        .unwrap_or_default();
    let selected_cluster = sel.cluster.to_string();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(RichText::new("This role belongs to Cluster:").heading());
                ui.label(RichText::new(sel.cluster.to_string()).heading().code());
            });

            if let Some(text) = description {
                egui::CollapsingHeader::new("Description")
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.label(text);
                    });
            }
            ui.separator();

            // ---- Top skills ----
            ui.label(RichText::new("Top Skills in This Cluster").strong().size(16.0));
            if sel.top_keywords.is_empty() {
                ui.weak("No keywords recorded for this cluster.");
            }
            for skill in &sel.top_keywords {
                ui.label(format!("•  {}", skill.value));
            }
            ui.separator();

            // ---- Other titles in the cluster ----
            ui.label(RichText::new("Other Job Titles in This Cluster").strong().size(16.0));
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .column(Column::remainder().at_least(160.0))
                .column(Column::auto().at_least(50.0))
                .header(20.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("title");
                    });
                    header.col(|ui: &mut Ui| {
                        ui.strong("count");
                    });
                })
                .body(|mut body| {
                    for entry in &sel.other_titles {
                        body.row(18.0, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.label(&entry.value);
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(entry.count.to_string());
                            });
                        });
                    }
                });
            ui.separator();

            // ---- Cluster colour key ----
            egui::CollapsingHeader::new(RichText::new(format!("Clusters  ({})", legend.len())).strong())
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for (label, color) in &legend {
                        let mut text = RichText::new(format!("●  {label}")).color(*color);
                        if *label == selected_cluster {
                            text = text.strong();
                        }
                        ui.label(text);
                    }
                });
        });
}

/// Type-ahead select box over the dataset's titles.
fn title_picker(ui: &mut Ui, state: &mut AppState, matches: &[String]) {
    let current = state.selected_title.clone().unwrap_or_default();
    let mut picked: Option<String> = None;

    egui::ComboBox::from_id_salt("job_title")
        .selected_text(&current)
        .width(ui.available_width() - 8.0)
        .height(320.0)
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(
                egui::TextEdit::singleline(&mut state.title_query)
                    .hint_text("Type to filter…")
                    .desired_width(f32::INFINITY),
            );
            if matches.is_empty() {
                ui.weak("No matching titles");
            }
            for title in matches {
                if ui.selectable_label(*title == current, title).clicked() {
                    picked = Some(title.clone());
                }
            }
        });

    if let Some(title) = picked {
        state.select_title(&title);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.data_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} jobs, {} clusters",
                ds.len(),
                ds.clusters.len()
            ));
        }
        if let Some(path) = &state.data_path {
            ui.weak(path.display().to_string());
        }

        if state.load_error.is_some() {
            ui.separator();
            ui.label(RichText::new("Load failed").color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open clustered jobs")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
