use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, DataTable};

const ROW_HEIGHT: f32 = 18.0;
const MAX_HEIGHT: f32 = 280.0;

/// Scrollable, virtualised view of a table.  `max_rows` caps the rows shown.
pub fn data_table(ui: &mut Ui, id: &str, table: &DataTable, max_rows: Option<usize>) {
    let n_rows = max_rows.map_or(table.len(), |m| m.min(table.len()));
    let n_cols = table.columns().len();

    ui.label(
        RichText::new(format!(
            "{} rows × {} columns{}",
            table.len(),
            n_cols,
            if n_rows < table.len() {
                format!(" (showing first {n_rows})")
            } else {
                String::new()
            }
        ))
        .weak(),
    );

    ui.push_id(id, |ui: &mut Ui| {
        egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(MAX_HEIGHT)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(TableColumn::auto().at_least(36.0))
                .columns(TableColumn::auto().at_least(64.0).clip(true), n_cols)
                .header(ROW_HEIGHT + 4.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("#");
                    });
                    for col in table.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&col.name)
                                .on_hover_text(format!("{} column", col.kind));
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, n_rows, |mut row| {
                        let r = row.index();
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(r.to_string()).weak());
                        });
                        for c in 0..n_cols {
                            row.col(|ui: &mut Ui| {
                                match table.cell(r, c) {
                                    CellValue::Null => ui.label(RichText::new("None").weak()),
                                    value => ui.label(value.to_string()),
                                };
                            });
                        }
                    });
                });
        });
    });
}
