use std::collections::BTreeSet;

use crate::calc::thickness::OccupancyClass;
use crate::color::ColorMap;
use crate::data::filter::{FilterState, filtered_indices, init_filter_state};
use crate::data::model::MaterialTable;

// ---------------------------------------------------------------------------
// View selection
// ---------------------------------------------------------------------------

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Calculator,
}

// ---------------------------------------------------------------------------
// Calculator inputs
// ---------------------------------------------------------------------------

/// Inputs of the thickness calculator: one residential base thickness plus
/// one usage-intensity value per occupancy class.
#[derive(Debug, Clone)]
pub struct CalculatorState {
    /// Residential base thickness (t) in cm.
    pub base_thickness_cm: f64,
    /// Q value per occupancy class, parallel to [`OccupancyClass::ALL`].
    pub intensities: Vec<(OccupancyClass, u32)>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            base_thickness_cm: 15.0,
            intensities: OccupancyClass::ALL.iter().map(|&c| (c, 4)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until user loads a file).
    pub table: Option<MaterialTable>,

    /// Per-column filter selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Which categorical column drives scatter colouring.
    pub color_column: Option<String>,

    /// Active colour map.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Active central view.
    pub view: View,

    /// Thickness-calculator inputs.
    pub calculator: CalculatorState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            color_column: None,
            color_map: None,
            status_message: None,
            view: View::Dashboard,
            calculator: CalculatorState::default(),
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table, initialise filters and colour.
    pub fn set_table(&mut self, table: MaterialTable) {
        self.filters = init_filter_state(&table);
        self.visible_indices = (0..table.len()).collect();

        // Default colour column: first categorical column (if any).
        self.color_column = table.column_names.first().cloned();
        self.rebuild_color_map(&table);

        self.table = Some(table);
        self.status_message = None;
    }

    /// Rebuild the colour map from the current `color_column`.
    fn rebuild_color_map(&mut self, table: &MaterialTable) {
        self.color_map = self.color_column.as_ref().and_then(|col| {
            table
                .unique_values
                .get(col)
                .map(|vals| ColorMap::new(col, vals))
        });
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.filters);
        }
    }

    /// Set colour column and rebuild the map.
    pub fn set_color_column(&mut self, col: String) {
        self.color_column = Some(col.clone());
        self.color_map = self.table.as_ref().and_then(|table| {
            table
                .unique_values
                .get(&col)
                .map(|vals| ColorMap::new(&col, vals))
        });
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = &self.table {
            if let Some(all_vals) = table.unique_values.get(column) {
                self.filters.insert(column.to_string(), all_vals.clone());
                self.refilter();
            }
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Record};

    fn table() -> MaterialTable {
        let records = ["Nord", "Nord", "Süd"]
            .iter()
            .map(|region| Record {
                fields: [(
                    "Region".to_string(),
                    CellValue::String(region.to_string()),
                )]
                .into(),
            })
            .collect();
        MaterialTable::from_records(records)
    }

    #[test]
    fn set_table_selects_everything_by_default() {
        let mut state = AppState::default();
        state.set_table(table());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.color_column.as_deref(), Some("Region"));
        assert!(state.color_map.is_some());
    }

    #[test]
    fn select_none_then_all_round_trips() {
        let mut state = AppState::default();
        state.set_table(table());

        state.select_none("Region");
        assert!(state.visible_indices.is_empty());

        state.select_all("Region");
        assert_eq!(state.visible_indices.len(), 3);
    }
}
