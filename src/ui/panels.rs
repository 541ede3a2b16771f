use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::chart::ChartKind;
use crate::data::filter::{FilterWarning, Selection};
use crate::data::model::{season_label, weather_label};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart selector and filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Charts");
    ui.separator();

    let mut chart = state.chart;
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(chart.to_string())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut chart, kind, kind.to_string());
            }
        });
    state.set_chart(chart);

    ui.add_space(8.0);
    ui.heading("Filters");
    ui.separator();

    let Some(criteria) = state.criteria else {
        ui.label("No dataset loaded.");
        footer(ui);
        return;
    };

    // ---- Season / weather selectors ----
    ui.strong("Season");
    let season = selection_combo(ui, "season", "All seasons", criteria.season, &state.season_options, season_label);
    state.set_season(season);

    ui.strong("Weather");
    let weather = selection_combo(ui, "weather", "All weather", criteria.weather, &state.weather_options, weather_label);
    state.set_weather(weather);

    ui.separator();

    // ---- Date range ----
    let mut from = criteria.date_from;
    let mut to = criteria.date_to;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut from).id_salt("date_from"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut to).id_salt("date_to"));
    });
    state.set_date_range(from, to);

    if state.warnings().contains(&FilterWarning::InvertedRange) {
        ui.label(RichText::new(FilterWarning::InvertedRange.to_string()).color(Color32::RED));
    }

    ui.separator();

    let mut scoped = state.scope_hourly;
    ui.checkbox(&mut scoped, "Apply filters to hourly charts")
        .on_hover_text("Off: hourly trends, monthly trend and binning use the whole dataset.");
    state.set_scope_hourly(scoped);

    footer(ui);
}

/// A combo box with an "all" entry followed by one entry per code.
fn selection_combo(
    ui: &mut Ui,
    id: &str,
    all_label: &str,
    current: Selection<u8>,
    options: &[u8],
    label: fn(u8) -> String,
) -> Selection<u8> {
    let mut selected = current;
    let text = match current {
        Selection::All => all_label.to_string(),
        Selection::Only(code) => label(code),
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(&mut selected, Selection::All, all_label);
            for &code in options {
                ui.selectable_value(&mut selected, Selection::Only(code), label(code));
            }
        });
    selected
}

fn footer(ui: &mut Ui) {
    ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui: &mut Ui| {
        ui.weak(concat!("bike-dash v", env!("CARGO_PKG_VERSION")));
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                let dir = state.data_dir.clone();
                state.load(&dir);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.datasets {
            ui.label(format!(
                "{} days, {} hourly rows loaded, {} days visible",
                ds.daily.len(),
                ds.hourly.len(),
                state.outcome.indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title(format!(
            "Open folder containing {} and {}",
            state.config.daily_file, state.config.hourly_file
        ))
        .set_directory(&state.data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        log::info!("Loading data from {}", dir.display());
        state.load(&dir);
    }
}
