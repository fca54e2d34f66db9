//! Client-side view state: sorting, column filters and column visibility.
//!
//! All of it applies to the rows of the currently loaded page only. The
//! server decides which page is loaded, so none of this is persisted or
//! sent anywhere.

use super::column::ColumnSpec;
use crate::core::{FieldValue, Record};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableViewState {
    pub sorting: Vec<SortKey>,
    pub column_filters: Vec<ColumnFilter>,
    pub column_visibility: HashMap<String, bool>,
}

impl TableViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns are visible unless explicitly hidden.
    pub fn is_visible(&self, column: &str) -> bool {
        self.column_visibility.get(column).copied().unwrap_or(true)
    }

    pub fn set_visibility(&mut self, column: &str, visible: bool) {
        self.column_visibility.insert(column.to_string(), visible);
    }

    pub fn toggle_visibility(&mut self, column: &str) {
        let visible = self.is_visible(column);
        self.set_visibility(column, !visible);
    }

    /// An empty value removes the filter.
    pub fn set_filter(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        self.column_filters.retain(|f| f.column != column);
        if !value.is_empty() {
            self.column_filters.push(ColumnFilter {
                column: column.to_string(),
                value,
            });
        }
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.column_filters.retain(|f| f.column != column);
    }

    pub fn filter_value(&self, column: &str) -> Option<&str> {
        self.column_filters
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.value.as_str())
    }

    /// Cycles a column through ascending, descending and unsorted. Sorting
    /// by a new column replaces the previous sort.
    pub fn toggle_sort(&mut self, column: &str) {
        let current = self
            .sorting
            .iter()
            .find(|s| s.column == column)
            .map(|s| s.descending);
        self.sorting.clear();
        match current {
            None => self.sorting.push(SortKey {
                column: column.to_string(),
                descending: false,
            }),
            Some(false) => self.sorting.push(SortKey {
                column: column.to_string(),
                descending: true,
            }),
            Some(true) => {}
        }
    }

    pub fn reset(&mut self) {
        self.sorting.clear();
        self.column_filters.clear();
        self.column_visibility.clear();
    }

    /// Filters and sorts the loaded rows.
    pub fn row_model<'a, R: Record>(
        &self,
        data: &'a [R],
        columns: &[ColumnSpec<R>],
    ) -> Vec<&'a R> {
        let filters: Vec<(&ColumnSpec<R>, &str)> = self
            .column_filters
            .iter()
            .filter_map(|f| {
                columns
                    .iter()
                    .find(|c| c.id == f.column && c.can_filter)
                    .map(|c| (c, f.value.as_str()))
            })
            .collect();

        let rows = data.iter().filter(|row| {
            filters
                .iter()
                .all(|(column, needle)| column.value(row).contains(needle))
        });

        let sorters: Vec<(&ColumnSpec<R>, bool)> = self
            .sorting
            .iter()
            .filter_map(|s| {
                columns
                    .iter()
                    .find(|c| c.id == s.column && c.can_sort)
                    .map(|c| (c, s.descending))
            })
            .collect();

        if sorters.is_empty() {
            return rows.collect();
        }

        // Sort keys are read once per row, not once per comparison.
        let mut keyed: Vec<(&R, Vec<FieldValue>)> = rows
            .map(|row| (row, sorters.iter().map(|(c, _)| c.value(row)).collect()))
            .collect();
        keyed.sort_by(|(_, a), (_, b)| {
            for (i, (_, descending)) in sorters.iter().enumerate() {
                let ord = a[i].sort_cmp(&b[i]);
                let ord = if *descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });
        keyed.into_iter().map(|(row, _)| row).collect()
    }
}
