use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use eframe::egui::{
    self, Align2, Color32, FontId, Mesh, Pos2, Rect, RichText, Sense, Shape, Ui, vec2,
};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, Points};

use crate::color::{generate_palette, heat_color};
use crate::data::aggregate::{
    five_number_summary, group_counts, group_means, group_means2, numeric_groups,
};
use crate::data::model::{
    AGE_CLASS_COL, CellValue, COMPONENT_COL, CONSTRUCTION_COL, LAMBDA_COL, MATERIAL_COL,
    MaterialTable, THICKNESS_COL, age_class_rank,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Dashboard (central panel)
// ---------------------------------------------------------------------------

/// Render all dashboard charts over the currently visible subset.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view material data  (File → Open…)");
            });
            return;
        }
    };
    let indices = &state.visible_indices;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Material Distribution");
            material_share_pie(ui, table, indices);
            ui.separator();

            ui.heading("Average Thickness by Material and Age Class");
            mean_thickness_bar(ui, table, indices);
            ui.separator();

            ui.heading("Average Thickness by Construction Age Class");
            thickness_by_age_line(ui, table, indices);
            ui.separator();

            ui.heading("Thermal Conductivity by Construction Method");
            conductivity_box_plot(ui, table, indices);
            ui.separator();

            ui.heading("Component Distribution");
            component_count_bar(ui, table, indices);
            ui.separator();

            ui.heading("Average Conductivity by Material and Component");
            conductivity_heatmap(ui, table, indices);
            ui.separator();

            ui.heading("Thickness vs. Thermal Conductivity");
            thickness_scatter(ui, state, table, indices);
        });
}

// ---------------------------------------------------------------------------
// 1. Material share – pie
// ---------------------------------------------------------------------------

/// egui_plot has no pie chart, so the share chart is a painter mesh: one
/// triangle fan per slice, legend beside it.
fn material_share_pie(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let counts = group_counts(table, indices, MATERIAL_COL);
    let total: usize = counts.values().sum();
    if total == 0 {
        ui.label("No rows match the current filters.");
        return;
    }

    let palette = generate_palette(counts.len());
    let slices: Vec<(String, usize, Color32)> = counts
        .iter()
        .zip(palette.into_iter())
        .map(|((val, &count), color)| (val.to_string(), count, color))
        .collect();

    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(vec2(220.0, 220.0), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.48;

        let mut mesh = Mesh::default();
        let mut angle = -std::f64::consts::FRAC_PI_2; // 12 o'clock start
        for (_, count, color) in &slices {
            let sweep = *count as f64 / total as f64 * std::f64::consts::TAU;
            let steps = ((sweep / 0.05).ceil() as usize).max(2);
            let center_idx = mesh.vertices.len() as u32;
            mesh.colored_vertex(center, *color);
            for s in 0..=steps {
                let a = angle + sweep * s as f64 / steps as f64;
                let pos = Pos2::new(
                    center.x + radius * a.cos() as f32,
                    center.y + radius * a.sin() as f32,
                );
                mesh.colored_vertex(pos, *color);
                if s > 0 {
                    let s = s as u32;
                    mesh.add_triangle(center_idx, center_idx + s, center_idx + s + 1);
                }
            }
            angle += sweep;
        }
        painter.add(Shape::mesh(mesh));

        ui.vertical(|ui: &mut Ui| {
            for (label, count, color) in &slices {
                let pct = 100.0 * *count as f64 / total as f64;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(*color));
                    ui.label(format!("{label} — {count} ({pct:.1}%)"));
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// 2. Mean thickness by material × age class – grouped bar
// ---------------------------------------------------------------------------

/// One bar group per material; within a group, one coloured sub-bar per
/// construction age class (era order), legend keyed by age class.
fn mean_thickness_bar(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let means = group_means2(table, indices, MATERIAL_COL, AGE_CLASS_COL, THICKNESS_COL);

    // Groups with only missing thickness cells have nothing to show.
    let materials: Vec<CellValue> = means
        .iter()
        .filter(|(_, stats)| stats.count > 0)
        .map(|((mat, _), _)| mat.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let ages: Vec<CellValue> = era_sorted(
        means
            .iter()
            .filter(|(_, stats)| stats.count > 0)
            .map(|((_, age), _)| age.clone())
            .collect(),
    );

    let labels: Vec<String> = materials.iter().map(|m| m.to_string()).collect();
    let colors = generate_palette(ages.len());
    let sub_width = 0.8 / ages.len().max(1) as f64;

    Plot::new("mean_thickness_bar")
        .height(240.0)
        .y_axis_label("Thickness [cm]")
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(category_ticks(labels))
        .show(ui, |plot_ui| {
            for (ai, age) in ages.iter().enumerate() {
                let bars: Vec<Bar> = materials
                    .iter()
                    .enumerate()
                    .filter_map(|(mi, mat)| {
                        let stats = means.get(&(mat.clone(), age.clone()))?;
                        if stats.count == 0 {
                            return None;
                        }
                        let x = mi as f64 - 0.4 + sub_width * (ai as f64 + 0.5);
                        Some(
                            Bar::new(x, stats.mean)
                                .width(sub_width * 0.9)
                                .name(format!("{mat} / {age}")),
                        )
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).color(colors[ai]).name(age.to_string()));
            }
        });
}

/// Sort age-class values into the canonical era order; unknown labels go
/// after the known bins, alphabetically.
fn era_sorted(values: BTreeSet<CellValue>) -> Vec<CellValue> {
    let mut values: Vec<CellValue> = values.into_iter().collect();
    values.sort_by_key(|v| match v {
        CellValue::String(s) => (age_class_rank(s).unwrap_or(usize::MAX), s.clone()),
        other => (usize::MAX, other.to_string()),
    });
    values
}

// ---------------------------------------------------------------------------
// 3. Mean thickness across age classes – line
// ---------------------------------------------------------------------------

/// Mean thickness along the ordered construction-era axis.
fn thickness_by_age_line(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let means = group_means(table, indices, AGE_CLASS_COL, THICKNESS_COL);

    let mut labels = Vec::new();
    let mut points: Vec<[f64; 2]> = Vec::new();
    for val in table.ordered_values(AGE_CLASS_COL) {
        let Some(stats) = means.get(&val) else {
            continue; // age class filtered out entirely
        };
        if stats.count == 0 {
            continue;
        }
        points.push([labels.len() as f64, stats.mean]);
        labels.push(val.to_string());
    }

    Plot::new("thickness_age_line")
        .height(240.0)
        .y_axis_label("Thickness [cm]")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(category_ticks(labels))
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).color(Color32::LIGHT_BLUE).width(2.0));
        });
}

// ---------------------------------------------------------------------------
// 4. λ by construction method – box plot
// ---------------------------------------------------------------------------

fn conductivity_box_plot(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let groups = numeric_groups(table, indices, CONSTRUCTION_COL, LAMBDA_COL);

    let mut labels = Vec::new();
    let mut elems = Vec::new();
    for (val, values) in &groups {
        let Some(s) = five_number_summary(values) else {
            continue; // only missing λ cells in this group
        };
        let x = labels.len() as f64;
        elems.push(
            BoxElem::new(x, BoxSpread::new(s.min, s.q1, s.median, s.q3, s.max))
                .name(val.to_string()),
        );
        labels.push(val.to_string());
    }

    Plot::new("lambda_box_plot")
        .height(240.0)
        .y_axis_label("λ-Wert [W/(mK)]")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(category_ticks(labels))
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(elems));
        });
}

// ---------------------------------------------------------------------------
// 5. Component distribution – count bar
// ---------------------------------------------------------------------------

fn component_count_bar(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let counts = group_counts(table, indices, COMPONENT_COL);

    let labels: Vec<String> = counts.keys().map(|v| v.to_string()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (val, &count))| {
            Bar::new(i as f64, count as f64)
                .name(val.to_string())
                .fill(Color32::LIGHT_GREEN)
        })
        .collect();

    Plot::new("component_count_bar")
        .height(240.0)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(category_ticks(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// 6. Mean λ over material × component – heatmap
// ---------------------------------------------------------------------------

/// Painter-drawn grid: materials as rows, components as columns, cell
/// colour from the cold-to-hot scale over the mean λ of that combination.
fn conductivity_heatmap(ui: &mut Ui, table: &MaterialTable, indices: &[usize]) {
    let means = group_means2(table, indices, MATERIAL_COL, COMPONENT_COL, LAMBDA_COL);

    let mut materials: BTreeSet<CellValue> = BTreeSet::new();
    let mut components: BTreeSet<CellValue> = BTreeSet::new();
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for ((mat, comp), stats) in &means {
        if stats.count == 0 {
            continue;
        }
        materials.insert(mat.clone());
        components.insert(comp.clone());
        lo = lo.min(stats.mean);
        hi = hi.max(stats.mean);
    }
    if materials.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }
    let materials: Vec<CellValue> = materials.into_iter().collect();
    let components: Vec<CellValue> = components.into_iter().collect();
    let span = (hi - lo).max(f64::EPSILON);

    const LABEL_W: f32 = 130.0;
    const HEADER_H: f32 = 20.0;
    let cell = vec2(90.0, 26.0);

    let size = vec2(
        LABEL_W + cell.x * components.len() as f32,
        HEADER_H + cell.y * materials.len() as f32,
    );
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();

    for (ci, comp) in components.iter().enumerate() {
        let pos = rect.min + vec2(LABEL_W + cell.x * (ci as f32 + 0.5), HEADER_H * 0.5);
        painter.text(
            pos,
            Align2::CENTER_CENTER,
            comp.to_string(),
            FontId::proportional(12.0),
            text_color,
        );
    }

    for (mi, mat) in materials.iter().enumerate() {
        let y = HEADER_H + cell.y * mi as f32;
        painter.text(
            rect.min + vec2(LABEL_W - 8.0, y + cell.y * 0.5),
            Align2::RIGHT_CENTER,
            mat.to_string(),
            FontId::proportional(12.0),
            text_color,
        );
        for (ci, comp) in components.iter().enumerate() {
            let cell_rect =
                Rect::from_min_size(rect.min + vec2(LABEL_W + cell.x * ci as f32, y), cell)
                    .shrink(1.0);
            match means.get(&(mat.clone(), comp.clone())) {
                Some(stats) if stats.count > 0 => {
                    let t = ((stats.mean - lo) / span) as f32;
                    painter.rect_filled(cell_rect, 2.0, heat_color(t));
                    painter.text(
                        cell_rect.center(),
                        Align2::CENTER_CENTER,
                        format!("{:.3}", stats.mean),
                        FontId::proportional(11.0),
                        Color32::WHITE,
                    );
                }
                _ => {
                    // combination absent from the filtered subset
                    painter.rect_filled(cell_rect, 2.0, ui.visuals().faint_bg_color);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// 7. Thickness vs. λ – scatter, colored by the color-by column
// ---------------------------------------------------------------------------

fn thickness_scatter(ui: &mut Ui, state: &AppState, table: &MaterialTable, indices: &[usize]) {
    let color_col = state.color_column.as_deref();

    // Bucket (thickness, λ) pairs by the color-by value so each bucket
    // becomes one legend entry.
    let mut groups: BTreeMap<CellValue, Vec<[f64; 2]>> = BTreeMap::new();
    for &i in indices {
        let rec = &table.records[i];
        let (Some(th), Some(la)) = (rec.numeric(THICKNESS_COL), rec.numeric(LAMBDA_COL)) else {
            continue;
        };
        let key = color_col
            .map(|col| rec.get(col).clone())
            .unwrap_or(CellValue::Missing);
        groups.entry(key).or_default().push([th, la]);
    }

    Plot::new("thickness_lambda_scatter")
        .height(280.0)
        .legend(Legend::default())
        .x_axis_label("Thickness [cm]")
        .y_axis_label("λ-Wert [W/(mK)]")
        .show(ui, |plot_ui| {
            for (val, points) in &groups {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(val))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(points.clone())
                        .name(val.to_string())
                        .color(color)
                        .radius(2.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Shared tick formatter for category-axis charts
// ---------------------------------------------------------------------------

/// Category charts place group i at x = i; only (near-)integer grid marks
/// inside the label range get a tick text.
fn category_ticks(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let rounded = mark.value.round();
        if rounded >= 0.0
            && (mark.value - rounded).abs() < 0.3
            && (rounded as usize) < labels.len()
        {
            labels[rounded as usize].clone()
        } else {
            String::new()
        }
    }
}
