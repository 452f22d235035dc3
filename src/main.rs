//! Application shell and persistent user settings.

use dirs_next as dirs;
use eframe::{App, Frame, NativeOptions, egui};
use egui_extras::DatePickerButton;
use egui_plot::{Legend, Plot};
use rfd::FileDialog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use chrono::{Local, NaiveDate};
use log::info;

mod altitude;
use altitude::{exercise_work_joules, work_to_altitude};
mod export;
use export::{save_history_csv, save_history_json, save_summary_csv, save_summary_json};
mod heights;
mod peaks;
use peaks::{US_STATE_HIGHPOINTS, compute_progress, peaks_conquered};
mod plotting;
use plotting::{cumulative_altitude_line, daily_gain_line, draw_mountain};
mod storage;
use storage::JsonFileStore;
mod tracker;
use tracker::{DEFAULT_EXERCISES, DayTracker};
mod units;
use units::WeightUnit;
mod workout;
use workout::date_key;

fn default_exercise_names() -> Vec<String> {
    DEFAULT_EXERCISES.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_mountain_size() -> f32 {
    300.0
}

/// User preferences, stored as JSON next to the history file.
///
/// Fields added after the first release carry `#[serde(default)]` so that
/// older files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Settings {
    #[serde(default)]
    default_unit: WeightUnit,
    #[serde(default = "default_exercise_names")]
    default_exercises: Vec<String>,
    /// Overrides the history location inside the config directory.
    #[serde(default)]
    history_file: Option<String>,
    #[serde(default = "default_true")]
    show_overall_tracker: bool,
    #[serde(default)]
    show_history_plot: bool,
    #[serde(default = "default_mountain_size")]
    mountain_size: f32,
}

impl Settings {
    const FILE: &'static str = "sisyphus_lifts_settings.json";

    fn path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(data) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&data) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring settings in {}: {e}", path.display()),
                }
            }
        }
        Self::default()
    }

    fn save(&self) {
        if let Some(path) = Self::path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match serde_json::to_string_pretty(self) {
                Ok(data) => {
                    if let Err(e) = std::fs::write(&path, data) {
                        log::error!("Failed to save settings: {e}");
                    }
                }
                Err(e) => log::error!("Failed to encode settings: {e}"),
            }
        }
    }

    fn history_store(&self) -> JsonFileStore {
        match &self.history_file {
            Some(path) if !path.trim().is_empty() => JsonFileStore::new(path.trim()),
            _ => JsonFileStore::in_config_dir(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_unit: WeightUnit::Lbs,
            default_exercises: default_exercise_names(),
            history_file: None,
            show_overall_tracker: true,
            show_history_plot: false,
            mountain_size: default_mountain_size(),
        }
    }
}

/// Parse a reps field. Empty or invalid text clears the value.
fn parse_reps(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// Parse a weight field. Empty or invalid text clears the value.
fn parse_weight(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

/// Clear `text` if it is not empty and `parse` rejects it, so the field
/// never shows a value that is not stored.
fn discard_rejected<T>(text: &mut String, parse: impl Fn(&str) -> Option<T>) -> bool {
    let rejected = !text.trim().is_empty() && parse(text).is_none();
    if rejected {
        text.clear();
    }
    rejected
}

fn parse_exercise_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

struct SisyphusApp {
    tracker: DayTracker<JsonFileStore>,
    settings: Settings,
    settings_dirty: bool,
    show_settings: bool,
    /// Text typed into set fields, keyed by date, exercise, set and field.
    edit_buffers: HashMap<String, String>,
    new_exercise_name: String,
    new_exercise_joules: String,
    default_exercises_text: String,
}

impl SisyphusApp {
    fn new(settings: Settings, today: NaiveDate) -> Self {
        let store = settings.history_store();
        if let Some(path) = store.path() {
            info!("Using history file {}", path.display());
        }
        let tracker = DayTracker::new(
            store,
            today,
            settings.default_unit,
            settings.default_exercises.clone(),
        );
        let default_exercises_text = settings.default_exercises.join(", ");
        Self {
            tracker,
            settings,
            settings_dirty: false,
            show_settings: false,
            edit_buffers: HashMap::new(),
            new_exercise_name: String::new(),
            new_exercise_joules: String::new(),
            default_exercises_text,
        }
    }

    fn go_to(&mut self, date: NaiveDate) {
        self.tracker.go_to(date);
        self.edit_buffers.clear();
    }

    fn shift_days(&mut self, days: i64) {
        self.tracker.shift_days(days);
        self.edit_buffers.clear();
    }

    fn apply_defaults(&mut self) {
        self.settings.default_exercises = parse_exercise_list(&self.default_exercises_text);
        self.tracker.set_defaults(
            self.settings.default_unit,
            self.settings.default_exercises.clone(),
        );
        self.settings_dirty = true;
    }

    /// Single-line number input backed by an edit buffer.
    ///
    /// Returns the parsed value when the user changed the text. Rejected
    /// text is dropped from the buffer once the field loses focus.
    fn number_field<T>(
        ui: &mut egui::Ui,
        buffers: &mut HashMap<String, String>,
        key: String,
        current: impl FnOnce() -> String,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Option<Option<T>> {
        let text = buffers.entry(key).or_insert_with(current);
        let resp = ui.add(
            egui::TextEdit::singleline(text)
                .desired_width(56.0)
                .hint_text("0"),
        );
        if resp.lost_focus() {
            discard_rejected(text, &parse);
        }
        resp.changed().then(|| parse(text))
    }

    fn date_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("\u{25C0}").on_hover_text("Previous day").clicked() {
                self.shift_days(-1);
            }
            let mut date = self.tracker.current_date();
            ui.label(date.format("%b %-d, %Y").to_string());
            if ui
                .add(DatePickerButton::new(&mut date).id_source("current_day"))
                .changed()
            {
                self.go_to(date);
            }
            if ui.button("\u{25B6}").on_hover_text("Next day").clicked() {
                self.shift_days(1);
            }
            if ui.button("Today").clicked() {
                self.go_to(Local::now().date_naive());
            }
        });
    }

    fn exercise_ui(&mut self, ui: &mut egui::Ui, index: usize) {
        let Some(exercise) = self.tracker.exercises().get(index).cloned() else {
            return;
        };
        let day = date_key(self.tracker.current_date());
        let arrow = if exercise.expanded {
            "\u{25BC}"
        } else {
            "\u{25B6}"
        };
        let climbed = work_to_altitude(exercise_work_joules(&exercise));
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(format!("{arrow} {}", exercise.name)).frame(false))
                .clicked()
            {
                self.tracker.toggle_expanded(index);
            }
            ui.weak(format!("{climbed:.2} m"));
        });
        if !exercise.expanded {
            return;
        }

        ui.indent(("exercise", index), |ui| {
            if let Some(joules) = exercise.custom_joules.filter(|j| *j > 0.0) {
                ui.label(format!("Custom energy: {joules:.0} J (sets ignored)"));
            }
            for (set_index, set) in exercise.sets.iter().enumerate() {
                let key = format!("{day}/{index}/{}", set.id);
                ui.horizontal(|ui| {
                    if let Some(reps) = Self::number_field(
                        ui,
                        &mut self.edit_buffers,
                        format!("{key}/reps"),
                        || set.reps.map(|r| r.to_string()).unwrap_or_default(),
                        parse_reps,
                    ) {
                        self.tracker.set_reps(index, set_index, reps);
                    }
                    ui.label("reps");
                    if let Some(weight) = Self::number_field(
                        ui,
                        &mut self.edit_buffers,
                        format!("{key}/weight"),
                        || set.weight.map(|w| w.to_string()).unwrap_or_default(),
                        parse_weight,
                    ) {
                        self.tracker.set_weight(index, set_index, weight);
                    }
                    if ui
                        .button(set.unit.label())
                        .on_hover_text("Switch unit")
                        .clicked()
                    {
                        self.tracker.toggle_unit(index, set_index);
                    }
                });
            }
            if ui.button("+").on_hover_text("Add set").clicked() {
                self.tracker.add_set(index);
            }
        });
    }

    fn add_exercise_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_exercise_name)
                    .hint_text("Exercise name")
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.new_exercise_joules)
                    .hint_text("Energy in J (optional)")
                    .desired_width(140.0),
            );
            if ui.button("Add exercise").clicked() {
                let joules = self
                    .new_exercise_joules
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|j| j.is_finite() && *j > 0.0);
                self.tracker.add_exercise(&self.new_exercise_name, joules);
                self.new_exercise_name.clear();
                self.new_exercise_joules.clear();
            }
        });
    }

    fn daily_tracker_ui(&mut self, ui: &mut egui::Ui) {
        self.date_header(ui);
        ui.separator();
        ui.label(format!(
            "Boulder raised today: {:.2} m",
            self.tracker.day_altitude()
        ));
        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for index in 0..self.tracker.exercises().len() {
                self.exercise_ui(ui, index);
            }
            ui.separator();
            self.add_exercise_ui(ui);
        });
    }

    fn overall_tracker_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Mode: 50 States");
        let altitude = self.tracker.total_altitude();
        if let Some(progress) = compute_progress(altitude, US_STATE_HIGHPOINTS) {
            draw_mountain(ui, &progress, self.settings.mountain_size);
            ui.add(egui::ProgressBar::new((progress.percent / 100.0) as f32).show_percentage());
            ui.horizontal(|ui| {
                ui.label(format!("Current: {altitude}m"));
                ui.separator();
                if progress.all_surpassed {
                    ui.label("Every peak conquered");
                } else {
                    ui.label(format!(
                        "Next peak: {}m to go",
                        progress.remaining_m(altitude)
                    ));
                }
            });
            if !progress.target.state.is_empty() {
                ui.weak(format!(
                    "{}, {}",
                    progress.target.name, progress.target.state
                ));
            }
            ui.label(format!(
                "Peaks conquered: {}/{}",
                peaks_conquered(altitude, US_STATE_HIGHPOINTS),
                US_STATE_HIGHPOINTS.len()
            ));
        }

        if self.settings.show_history_plot {
            ui.separator();
            let daily_joules = self.tracker.daily_work_joules();
            let daily = self.tracker.daily_altitudes();
            Plot::new("altitude_history")
                .height(180.0)
                .allow_scroll(false)
                .legend(Legend::default())
                .x_axis_formatter(|mark, _chars, _| {
                    NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| format!("{:.0}", mark.value))
                })
                .show(ui, |plot_ui| {
                    plot_ui.line(cumulative_altitude_line(&daily_joules));
                    plot_ui.line(daily_gain_line(&daily));
                });
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Default unit:");
                        ui.horizontal(|ui| {
                            for unit in [WeightUnit::Lbs, WeightUnit::Kg] {
                                if ui
                                    .selectable_value(
                                        &mut self.settings.default_unit,
                                        unit,
                                        unit.label(),
                                    )
                                    .changed()
                                {
                                    self.apply_defaults();
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Default exercises:");
                        if ui
                            .text_edit_singleline(&mut self.default_exercises_text)
                            .lost_focus()
                        {
                            self.apply_defaults();
                        }
                        ui.end_row();

                        ui.label("History file:");
                        let mut history_file = self.settings.history_file.clone().unwrap_or_default();
                        if ui.text_edit_singleline(&mut history_file).changed() {
                            self.settings.history_file =
                                (!history_file.trim().is_empty()).then_some(history_file);
                            self.settings_dirty = true;
                        }
                        ui.end_row();

                        ui.label("Mountain size:");
                        if ui
                            .add(
                                egui::Slider::new(&mut self.settings.mountain_size, 150.0..=600.0)
                                    .suffix(" px"),
                            )
                            .changed()
                        {
                            self.settings_dirty = true;
                        }
                        ui.end_row();
                    });
                if ui
                    .checkbox(&mut self.settings.show_overall_tracker, "Show overall tracker")
                    .changed()
                {
                    self.settings_dirty = true;
                }
                if ui
                    .checkbox(&mut self.settings.show_history_plot, "Show altitude history")
                    .changed()
                {
                    self.settings_dirty = true;
                }
                if let Some(path) = self.tracker.store().path() {
                    ui.weak(format!("Current history: {}", path.display()));
                }
                ui.weak("A new history file is used after restarting.");
            });
        self.show_settings = open;
    }

    fn export_history(&self) {
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let history = self.tracker.history();
        let result = if is_csv(&path) {
            save_history_csv(&path, history).map_err(|e| e.to_string())
        } else {
            save_history_json(&path, history).map_err(|e| e.to_string())
        };
        match result {
            Ok(()) => info!("Exported history to {}", path.display()),
            Err(e) => log::error!("Failed to export history: {e}"),
        }
    }

    fn export_summary(&self) {
        let Some(path) = FileDialog::new()
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let history = self.tracker.history();
        let result = if is_csv(&path) {
            save_summary_csv(&path, history).map_err(|e| e.to_string())
        } else {
            save_summary_json(&path, history).map_err(|e| e.to_string())
        };
        match result {
            Ok(()) => info!("Exported daily summary to {}", path.display()),
            Err(e) => log::error!("Failed to export daily summary: {e}"),
        }
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

impl Default for SisyphusApp {
    fn default() -> Self {
        Self::new(Settings::load(), Local::now().date_naive())
    }
}

impl App for SisyphusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                        ui.close_menu();
                    }
                    if ui.button("Export History").clicked() {
                        self.export_history();
                        ui.close_menu();
                    }
                    if ui.button("Export Daily Summary").clicked() {
                        self.export_summary();
                        ui.close_menu();
                    }
                });
            });
        });

        if self.settings.show_overall_tracker {
            egui::SidePanel::right("overall_tracker")
                .min_width(self.settings.mountain_size + 16.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| self.overall_tracker_ui(ui));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| self.daily_tracker_ui(ui));

        if self.show_settings {
            self.settings_window(ctx);
        }

        if self.settings_dirty {
            self.settings.save();
            self.settings_dirty = false;
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Sisyphus Lifts",
        options,
        Box::new(|_cc| Box::new(SisyphusApp::default())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Point the config directory at a temp dir for the duration of `f`.
    fn with_config_dir(f: impl FnOnce(&Path)) {
        use std::env;

        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let prev_config = env::var_os("XDG_CONFIG_HOME");
        unsafe {
            env::set_var("XDG_CONFIG_HOME", dir.path());
        }

        f(dir.path());

        if let Some(val) = prev_config {
            unsafe {
                env::set_var("XDG_CONFIG_HOME", val);
            }
        } else {
            unsafe {
                env::remove_var("XDG_CONFIG_HOME");
            }
        }
    }

    #[test]
    fn settings_roundtrip() {
        let mut s = Settings::default();
        s.default_unit = WeightUnit::Kg;
        s.default_exercises = vec!["Front Squat".into()];
        s.history_file = Some("/tmp/history.json".into());
        s.show_overall_tracker = false;
        s.show_history_plot = true;
        s.mountain_size = 420.0;

        let json = serde_json::to_string(&s).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s, loaded);
    }

    #[test]
    fn settings_missing_fields_default() {
        let loaded: Settings = serde_json::from_str(r#"{"default_unit": "kg"}"#).unwrap();
        assert_eq!(loaded.default_unit, WeightUnit::Kg);
        assert_eq!(loaded.default_exercises, default_exercise_names());
        assert!(loaded.show_overall_tracker);
        assert!(!loaded.show_history_plot);
        assert_eq!(loaded.mountain_size, 300.0);
    }

    #[test]
    fn empty_settings_file_uses_defaults() {
        let loaded: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(loaded, Settings::default());
        let loaded: Settings = serde_json::from_str(r#"{"show_history_plot": true}"#).unwrap();
        assert_eq!(loaded.default_unit, WeightUnit::Lbs);
        assert!(loaded.show_history_plot);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn settings_persist_in_config_dir() {
        with_config_dir(|_| {
            let mut s = Settings::default();
            s.show_history_plot = true;
            s.save();
            assert!(Settings::load().show_history_plot);

            std::fs::write(Settings::path().unwrap(), "not json").unwrap();
            assert_eq!(Settings::load(), Settings::default());
        });
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn app_writes_history_through() {
        with_config_dir(|dir| {
            let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
            let mut app = SisyphusApp::new(Settings::default(), today);
            app.tracker.set_reps(0, 0, parse_reps("10"));
            app.tracker.set_weight(0, 0, parse_weight("225"));

            let reopened = SisyphusApp::new(Settings::default(), today);
            assert_eq!(reopened.tracker.day_altitude(), 6.75);
            assert!(dir.join("sisyphus_lifts_history.json").exists());
        });
    }

    #[test]
    fn history_file_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        let mut s = Settings::default();
        s.history_file = Some(path.display().to_string());
        assert_eq!(s.history_store().path(), Some(path.as_path()));
        s.history_file = Some("   ".into());
        assert_ne!(s.history_store().path(), Some(path.as_path()));
    }

    #[test]
    fn field_parsing() {
        assert_eq!(parse_reps(" 12 "), Some(12));
        assert_eq!(parse_reps(""), None);
        assert_eq!(parse_reps("-3"), None);
        assert_eq!(parse_weight("62.5"), Some(62.5));
        assert_eq!(parse_weight("abc"), None);
        assert_eq!(parse_weight("-5"), None);
        assert_eq!(parse_weight("inf"), None);
        assert_eq!(
            parse_exercise_list(" Squat, ,Bench ,Overhead Press"),
            vec!["Squat", "Bench", "Overhead Press"]
        );
    }

    #[test]
    fn rejected_field_text_is_cleared() {
        let mut text = "-5".to_string();
        assert!(discard_rejected(&mut text, parse_weight));
        assert_eq!(text, "");
        let mut text = "abc".to_string();
        assert!(discard_rejected(&mut text, parse_reps));
        assert_eq!(text, "");
        let mut text = " 62.5".to_string();
        assert!(!discard_rejected(&mut text, parse_weight));
        assert_eq!(text, " 62.5");
        let mut text = String::new();
        assert!(!discard_rejected(&mut text, parse_reps));
    }

    #[test]
    fn export_extension_detection() {
        assert!(is_csv(Path::new("out.CSV")));
        assert!(!is_csv(Path::new("out.json")));
        assert!(!is_csv(Path::new("out")));
    }

    #[test]
    fn ui_renders_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = Settings::default();
        settings.history_file = Some(dir.path().join("h.json").display().to_string());
        settings.show_history_plot = true;
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut app = SisyphusApp::new(settings, today);
        app.tracker.toggle_expanded(0);

        let ctx = egui::Context::default();
        let _ = ctx.run(Default::default(), |ctx| {
            egui::SidePanel::right("overall").show(ctx, |ui| app.overall_tracker_ui(ui));
            egui::CentralPanel::default().show(ctx, |ui| app.daily_tracker_ui(ui));
        });
        assert_eq!(app.edit_buffers.len(), 2);
    }
}
