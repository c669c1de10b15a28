use std::collections::BTreeMap;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, Points};

use crate::color::ColorMap;
use crate::data::model::Category;
use crate::data::stats::{Bin, MAX_BINS, MIN_BINS};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Collapsible price histogram with its bin-count slider.
pub fn price_histogram(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Price histogram")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            let mut bins = state.bins;
            ui.add(egui::Slider::new(&mut bins, MIN_BINS..=MAX_BINS).text("bins"));
            state.set_bins(bins);

            let bars = histogram_bars(&state.price_histogram(), |v| format!("${v:.0}"));
            histogram_plot(ui, "price_histogram", "Price (USD)", "Price distribution", bars);
        });
}

/// Collapsible odometer histogram with its bin-count slider.
pub fn odometer_histogram(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Odometer histogram")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let mut bins = state.odometer_bins;
            ui.add(egui::Slider::new(&mut bins, MIN_BINS..=MAX_BINS).text("bins"));
            state.set_odometer_bins(bins);

            let bars = histogram_bars(&state.odometer_histogram(), |v| format!("{v:.0}"));
            histogram_plot(ui, "odometer_histogram", "Odometer", "Odometer distribution", bars);
        });
}

fn histogram_bars(bins: &[Bin], fmt: impl Fn(f64) -> String) -> Vec<Bar> {
    bins.iter()
        .map(|bin| {
            Bar::new(bin.center(), bin.count as f64)
                .width(bin.width())
                .name(format!("{} to {}", fmt(bin.start), fmt(bin.end)))
        })
        .collect()
}

fn histogram_plot(ui: &mut Ui, id: &str, x_label: &str, name: &str, bars: Vec<Bar>) {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Listings")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(name).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// Price vs. odometer scatter
// ---------------------------------------------------------------------------

/// Collapsible scatter of price against odometer, coloured by a categorical
/// column.
pub fn price_scatter(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new("Price vs. odometer")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Color by");
                let current = state.color_by;
                egui::ComboBox::from_id_salt("color_by")
                    .selected_text(current.to_string())
                    .show_ui(ui, |ui: &mut Ui| {
                        for category in Category::COLOR_BY {
                            if ui
                                .selectable_label(current == category, category.to_string())
                                .clicked()
                            {
                                state.set_color_by(category);
                            }
                        }
                    });
            });

            let state: &AppState = state;
            let (Some(dataset), Some(color_map)) = (&state.dataset, &state.color_map) else {
                return;
            };

            // One series per colour value so the legend lists each group.
            let mut groups: BTreeMap<Option<&str>, Vec<[f64; 2]>> = BTreeMap::new();
            for &idx in &state.visible_indices {
                let record = &dataset.records[idx];
                groups
                    .entry(record.category(state.color_by))
                    .or_default()
                    .push([record.odometer, record.price]);
            }

            Plot::new("price_scatter")
                .height(PLOT_HEIGHT)
                .legend(Legend::default())
                .x_axis_label("Odometer")
                .y_axis_label("Price (USD)")
                .allow_boxed_zoom(true)
                .allow_drag(true)
                .allow_zoom(true)
                .label_formatter(|name: &str, value: &PlotPoint| {
                    // An empty name means the cursor is not over a point.
                    let details = (!name.is_empty())
                        .then(|| state.scatter_details(value.x, value.y))
                        .flatten();
                    details.unwrap_or_else(|| {
                        format!("odometer: {:.0}\nprice: ${:.0}", value.x, value.y)
                    })
                })
                .show(ui, |plot_ui| {
                    for (value, points) in groups {
                        let color = color_map.color_for(value).gamma_multiply(0.6);
                        plot_ui.points(
                            Points::new(points)
                                .name(ColorMap::label(value))
                                .color(color)
                                .radius(2.0),
                        );
                    }
                });
        });
}
