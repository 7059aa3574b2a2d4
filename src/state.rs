use std::path::{Path, PathBuf};

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::error::DataError;
use crate::data::loader::load_file;
use crate::data::model::JobDataset;
use crate::data::query::{self, Selection};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<JobDataset>,

    /// File the current dataset came from, used by Reload.
    pub data_path: Option<PathBuf>,

    /// Title chosen in the picker.
    pub selected_title: Option<String>,

    /// Cluster, top keywords and sibling titles for `selected_title` (cached).
    pub selection: Option<Selection>,

    /// Text typed into the title picker.
    pub title_query: String,

    /// Colour per cluster for the scatter plot.
    pub color_map: Option<ColorMap>,

    /// Length of the ranked keyword and title lists.
    pub top_n: usize,

    /// Error from the last load attempt. While set, only the message renders.
    pub load_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            data_path: None,
            selected_title: None,
            selection: None,
            title_query: String::new(),
            color_map: None,
            top_n: Config::default().top_n,
            load_error: None,
        }
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            top_n: config.top_n,
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset, rebuild colours and select the first title.
    pub fn set_dataset(&mut self, dataset: JobDataset) {
        self.color_map = Some(ColorMap::new(&dataset.clusters));
        let first = dataset.titles.first().cloned();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.title_query.clear();

        match first {
            Some(title) => self.select_title(&title),
            None => {
                self.selected_title = None;
                self.selection = None;
            }
        }
    }

    /// Drop any loaded data and keep a user-facing message instead.
    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.selected_title = None;
        self.selection = None;
        self.color_map = None;
        self.load_error = Some(message);
    }

    /// Make `title` the current selection and recompute the cluster summary.
    pub fn select_title(&mut self, title: &str) {
        self.selected_title = Some(title.to_string());
        self.selection = self
            .dataset
            .as_ref()
            .and_then(|ds| query::select(ds, title, self.top_n));

        match &self.selection {
            Some(sel) => log::debug!("Selected {title:?} in cluster {}", sel.cluster),
            None => log::warn!("Title {title:?} not found in dataset"),
        }
    }

    /// Load `path` and route the outcome to the dataset or the error message.
    pub fn load_path(&mut self, path: &Path) {
        self.data_path = Some(path.to_path_buf());
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} jobs in {} clusters from {}",
                    dataset.len(),
                    dataset.clusters.len(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.set_load_error(load_error_message(&e));
            }
        }
    }

    /// Re-read the current data file, if any.
    pub fn reload(&mut self) {
        if let Some(path) = self.data_path.clone() {
            let previous = self.selected_title.clone();
            self.load_path(&path);
            // Keep the user's choice when the title survived the reload.
            if let Some(title) = previous {
                let still_present = self
                    .dataset
                    .as_ref()
                    .is_some_and(|ds| query::find_by_title(ds, &title).is_some());
                if still_present {
                    self.select_title(&title);
                }
            }
        }
    }
}

/// Text shown in place of the dashboard when loading fails.
pub fn load_error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<DataError>() {
        Some(DataError::MissingColumns(cols)) => {
            format!("Data file is missing required columns: {}", cols.join(", "))
        }
        _ => format!("Failed to load data: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;
    use crate::data::model::ClusterId;

    const CSV: &str = "\
title,description,keywords,cluster,x,y
Welder,Joins metal,\"welding, safety\",0,0.0,0.0
Electrician,Wires buildings,\"wiring, safety\",0,1.0,1.0
Accountant,Keeps books,\"excel, tax\",1,5.0,5.0
";

    fn write_csv(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("clustered_jobs.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(contents.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn loading_selects_first_sorted_title() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.load_path(&write_csv(&dir, CSV));

        assert!(state.load_error.is_none());
        assert!(state.color_map.is_some());
        assert_eq!(state.selected_title.as_deref(), Some("Accountant"));
        let sel = state.selection.as_ref().unwrap();
        assert_eq!(sel.cluster, ClusterId::Integer(1));
        assert_eq!(sel.other_titles.len(), 1);
    }

    #[test]
    fn selecting_a_title_updates_the_summary() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.load_path(&write_csv(&dir, CSV));
        state.select_title("Welder");

        let sel = state.selection.as_ref().unwrap();
        assert_eq!(sel.cluster, ClusterId::Integer(0));
        assert_eq!(sel.top_keywords[0].value, "safety");
        assert_eq!(sel.top_keywords[0].count, 2);
        assert_eq!(sel.other_titles.len(), 2);
    }

    #[test]
    fn top_n_caps_the_lists() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::new(&Config {
            data_path: PathBuf::new(),
            top_n: 1,
        });
        state.load_path(&write_csv(&dir, CSV));
        state.select_title("Welder");

        let sel = state.selection.as_ref().unwrap();
        assert_eq!(sel.top_keywords.len(), 1);
        assert_eq!(sel.other_titles.len(), 1);
    }

    #[test]
    fn missing_columns_replace_the_dashboard_with_a_message() {
        let dir = TempDir::new().unwrap();
        let mut state = AppState::default();
        state.load_path(&write_csv(&dir, CSV));
        state.load_path(&write_csv(&dir, "title,x,y\nWelder,0,0\n"));

        assert!(state.dataset.is_none());
        assert!(state.selection.is_none());
        assert_eq!(
            state.load_error.as_deref(),
            Some("Data file is missing required columns: cluster, description, keywords")
        );
    }

    #[test]
    fn unreadable_file_reports_failure() {
        let mut state = AppState::default();
        state.load_path(Path::new("/no/such/dir/clustered_jobs.csv"));

        let msg = state.load_error.as_deref().unwrap();
        assert!(msg.starts_with("Failed to load data: "));
    }

    #[test]
    fn reload_keeps_a_surviving_selection() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, CSV);
        let mut state = AppState::default();
        state.load_path(&path);
        state.select_title("Electrician");

        state.reload();
        assert_eq!(state.selected_title.as_deref(), Some("Electrician"));

        write_csv(&dir, "title,description,keywords,cluster,x,y\nPilot,Flies,nav,4,0,0\n");
        state.reload();
        assert_eq!(state.selected_title.as_deref(), Some("Pilot"));
    }
}
