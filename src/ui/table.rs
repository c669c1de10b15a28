use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::stats::format_count;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

/// Preview of the first `table_rows` filtered records, every dataset column.
pub fn filtered_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows = state.table_indices();

    ui.heading("Filtered data");
    if rows.len() < state.visible_indices.len() {
        ui.label(
            RichText::new(format!(
                "Showing the first {} of {} records",
                format_count(rows.len()),
                format_count(state.visible_indices.len())
            ))
            .weak(),
        );
    }

    egui::ScrollArea::horizontal()
        .id_salt("filtered_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(400.0)
                .columns(Column::auto().at_least(60.0), dataset.columns.len())
                .header(20.0, |mut header| {
                    for name in &dataset.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                        let record = &dataset.records[rows[row.index()]];
                        for (i, name) in dataset.columns.iter().enumerate() {
                            row.col(|ui: &mut Ui| {
                                ui.label(record.cell(i, name).unwrap_or_default());
                            });
                        }
                    });
                });
        });
}
