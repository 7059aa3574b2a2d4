use std::collections::BTreeMap;

use eframe::egui::{Align2, Color32, RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::SELECTED_COLOR;
use crate::data::model::ClusterId;
use crate::data::query::nearest_job;
use crate::state::AppState;

/// Hover radius as a fraction of the larger visible axis span.
const HOVER_FRACTION: f64 = 0.015;

// ---------------------------------------------------------------------------
// UMAP scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the cluster scatter plot in the central panel.
pub fn cluster_plot(ui: &mut Ui, state: &AppState) {
    if let Some(msg) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(msg.as_str()).color(Color32::RED).size(18.0));
        });
        return;
    }

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to explore job clusters  (File → Open…)");
            });
            return;
        }
    };

    ui.heading("UMAP Projection of Job Role Clusters");

    // Group coordinates by cluster so each cluster is one legend entry.
    let mut by_cluster: BTreeMap<&ClusterId, Vec<[f64; 2]>> = BTreeMap::new();
    for job in &dataset.jobs {
        by_cluster.entry(&job.cluster).or_default().push([job.x, job.y]);
    }

    let selected = state
        .selection
        .as_ref()
        .and_then(|sel| dataset.jobs.get(sel.index).map(|job| (sel, job)));

    Plot::new("umap_plot")
        .legend(Legend::default())
        .x_axis_label("x")
        .y_axis_label("y")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (cluster, coords) in by_cluster {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(cluster))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let points: PlotPoints = coords.into_iter().collect();

                plot_ui.points(
                    Points::new(points)
                        .name(cluster.to_string())
                        .color(color)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.0),
                );
            }

            if let Some((sel, job)) = selected {
                plot_ui.points(
                    Points::new(PlotPoints::new(vec![[job.x, job.y]]))
                        .name("Selected Job")
                        .color(SELECTED_COLOR)
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(7.0),
                );
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(job.x, job.y),
                        RichText::new(&sel.title).strong(),
                    )
                    .color(SELECTED_COLOR)
                    .anchor(Align2::CENTER_BOTTOM),
                );
            }

            // Hover tooltip: title and keywords of the nearest job.
            if let Some(pointer) = plot_ui.pointer_coordinate() {
                let bounds = plot_ui.plot_bounds();
                let max_dist = bounds.width().max(bounds.height()) * HOVER_FRACTION;
                if let Some(idx) = nearest_job(dataset, pointer.x, pointer.y, max_dist) {
                    let job = &dataset.jobs[idx];
                    let label = format!(
                        "title: {}\nkeywords: {}\ncluster: {}",
                        job.title.as_deref().unwrap_or("—"),
                        job.keywords.as_deref().unwrap_or("—"),
                        job.cluster
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(job.x, job.y), label)
                            .color(Color32::DARK_GRAY)
                            .anchor(Align2::LEFT_TOP),
                    );
                }
            }
        });
}
