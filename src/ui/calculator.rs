use eframe::egui::{self, Color32, DragValue, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::calc::thickness::{
    MAX_INTENSITY, MAX_THICKNESS_CM, MIN_INTENSITY, thickness_table,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Thickness calculator (central panel)
// ---------------------------------------------------------------------------

/// Render the envelope-thickness calculator: inputs on the left, the
/// per-occupancy result table on the right. Stateless with respect to the
/// loaded dataset; results are recomputed from the inputs every frame.
pub fn calculator_view(ui: &mut Ui, state: &mut AppState) {
    let calc = &mut state.calculator;

    ui.heading("Building Thickness Calculator");
    ui.add_space(8.0);

    ui.columns(2, |cols| {
        // ---- Input parameters ----
        cols[0].strong("Input Parameters");
        cols[0].add_space(4.0);

        cols[0].horizontal(|ui: &mut Ui| {
            ui.label("Residential base thickness (t) in cm");
            ui.add(
                DragValue::new(&mut calc.base_thickness_cm)
                    .range(5.0..=MAX_THICKNESS_CM)
                    .speed(0.5)
                    .suffix(" cm"),
            );
        });
        cols[0].add_space(4.0);

        for (class, q) in &mut calc.intensities {
            cols[0].horizontal(|ui: &mut Ui| {
                ui.label(format!("Q value for {class}"));
                ui.add(
                    DragValue::new(q).range(MIN_INTENSITY as u32..=MAX_INTENSITY as u32),
                );
            });
        }

        // ---- Results ----
        cols[1].strong("Results");
        cols[1].add_space(4.0);

        let intensities: Vec<_> = calc
            .intensities
            .iter()
            .map(|&(class, q)| (class, q as f64))
            .collect();

        match thickness_table(calc.base_thickness_cm, &intensities) {
            Ok(rows) => {
                TableBuilder::new(&mut cols[1])
                    .striped(true)
                    .column(Column::auto().at_least(120.0))
                    .column(Column::remainder())
                    .header(20.0, |mut header| {
                        header.col(|ui| {
                            ui.strong("Building Type");
                        });
                        header.col(|ui| {
                            ui.strong("Calculated Thickness (cm)");
                        });
                    })
                    .body(|mut body| {
                        for (class, thickness) in rows {
                            body.row(18.0, |mut row| {
                                row.col(|ui| {
                                    ui.label(class.label());
                                });
                                row.col(|ui| {
                                    ui.label(format!("{thickness:.2}"));
                                });
                            });
                        }
                    });
            }
            Err(e) => {
                // Drag values are clamped, but typed input can still leave
                // the domain; reject the submission with a message.
                cols[1].label(RichText::new(format!("Invalid input: {e}")).color(Color32::RED));
            }
        }
    });

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(format!(
            "Interpolates between the base thickness at Q = {MIN_INTENSITY} and \
             {MAX_THICKNESS_CM} cm at Q = {MAX_INTENSITY} (industry ceiling)."
        ))
        .weak(),
    );
}
