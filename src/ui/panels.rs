use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::filter::{ALL_CONDITIONS, ALL_MANUFACTURERS};
use crate::data::model::{Category, Dataset};
use crate::data::stats::{format_count, format_currency, format_year};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Edit a copy; the view is recomputed once below if anything changed.
    let mut criteria = state.criteria.clone();

    if let Some((year_min, year_max)) = dataset.year_bounds() {
        ui.strong("Model year");
        ui.add(egui::Slider::new(&mut criteria.years.0, year_min..=year_max).text("from"));
        ui.add(egui::Slider::new(&mut criteria.years.1, year_min..=year_max).text("to"));
        if criteria.years.0 > criteria.years.1 {
            criteria.years.1 = criteria.years.0;
        }
        ui.add_space(6.0);
    }

    if let Some((price_min, price_max)) = dataset.price_bounds() {
        ui.strong("Price");
        let range = price_min.trunc()..=price_max.trunc();
        ui.add(
            egui::Slider::new(&mut criteria.prices.0, range.clone())
                .step_by(1.0)
                .prefix("$")
                .text("min"),
        );
        ui.add(
            egui::Slider::new(&mut criteria.prices.1, range)
                .step_by(1.0)
                .prefix("$")
                .text("max"),
        );
        if criteria.prices.0 > criteria.prices.1 {
            criteria.prices.1 = criteria.prices.0;
        }
        ui.add_space(6.0);
    }

    ui.strong("Manufacturer");
    let current = criteria
        .manufacturer
        .as_deref()
        .unwrap_or(ALL_MANUFACTURERS)
        .to_string();
    if let Some(choice) = selector(
        ui,
        "manufacturer",
        &current,
        ALL_MANUFACTURERS,
        dataset,
        Category::Manufacturer,
    ) {
        criteria.select_manufacturer(&choice);
    }
    ui.add_space(6.0);

    ui.strong("Condition");
    let current = criteria
        .condition
        .as_deref()
        .unwrap_or(ALL_CONDITIONS)
        .to_string();
    if let Some(choice) = selector(
        ui,
        "condition",
        &current,
        ALL_CONDITIONS,
        dataset,
        Category::Condition,
    ) {
        criteria.select_condition(&choice);
    }

    ui.separator();
    let reset = ui.button("Reset filters").clicked();

    state.set_criteria(criteria);
    if reset {
        state.reset_filters();
    }
}

/// Combo box listing the sentinel followed by the column's distinct values.
/// Returns the newly picked entry, if any.
fn selector(
    ui: &mut Ui,
    id: &str,
    current: &str,
    sentinel: &str,
    dataset: &Dataset,
    category: Category,
) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for value in std::iter::once(sentinel).chain(dataset.values(category)) {
                if ui.selectable_label(current == value, value).clicked() && current != value {
                    picked = Some(value.to_string());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// Header and KPI row
// ---------------------------------------------------------------------------

/// Title, caption and the four headline figures.
pub fn header(ui: &mut Ui, state: &AppState) {
    ui.heading(RichText::new("Car Sales Dashboard").size(28.0));
    ui.label(RichText::new("Filter the listings in the side panel.").weak());
    ui.add_space(8.0);

    let s = &state.summary;
    ui.columns(4, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Records", &format_count(s.count));
        metric(&mut cols[1], "Mean price", &format_currency(s.mean_price));
        metric(&mut cols[2], "Mean year", &format_year(s.mean_year));
        metric(&mut cols[3], "Mean odometer", &format_currency(s.mean_odometer));
    });
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).heading().strong());
    });
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// "Download filtered CSV" button with a save dialog.
pub fn export_button(ui: &mut Ui, state: &mut AppState) {
    let enabled = !state.visible_indices.is_empty();
    if ui
        .add_enabled(enabled, egui::Button::new("Download filtered CSV"))
        .clicked()
    {
        let file = rfd::FileDialog::new()
            .set_title("Save filtered data")
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("CSV", &["csv"])
            .save_file();

        if let Some(path) = file {
            // Failures are already logged and shown in the status line.
            let _ = state.export_to(&path);
        }
    }
}

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

/// Render the bottom status line.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        if let (Some(ds), Some(path)) = (&state.dataset, &state.source) {
            ui.label(format!(
                "{} records loaded from {}, {} visible, {} hidden by filters",
                format_count(ds.len()),
                path.display(),
                format_count(state.visible_indices.len()),
                format_count(state.excluded_count())
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Load failure
// ---------------------------------------------------------------------------

/// Shown in place of the whole dashboard when the dataset could not be read.
pub fn load_error(ui: &mut Ui, message: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.label(RichText::new(message).color(Color32::RED).size(16.0));
    });
}
