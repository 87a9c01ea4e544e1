// File: crates/pulse-core/src/payload.rs
// Summary: Host categorical payload (columns grouped by role) as delivered by the data-binding layer.

use serde::Deserialize;

/// Declared type of the category column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum ColumnKind {
    /// Values are epoch milliseconds.
    DateTime,
    Numeric,
    Text,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryColumn {
    pub kind: ColumnKind,
    pub values: Vec<Option<f64>>,
}

/// One row-aligned payload: a category column, grouped measure values and
/// optional event columns, all indexed by row.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoricalPayload {
    pub category: Option<CategoryColumn>,
    pub value_groups: Vec<Vec<Option<f64>>>,
    pub titles: Option<Vec<Option<String>>>,
    pub descriptions: Option<Vec<Option<String>>>,
    pub sizes: Option<Vec<Option<f64>>>,
}

impl CategoricalPayload {
    /// Timestamp-keyed payload with one value group.
    pub fn temporal(timestamps_ms: Vec<Option<f64>>, values: Vec<Option<f64>>) -> Self {
        Self {
            category: Some(CategoryColumn { kind: ColumnKind::DateTime, values: timestamps_ms }),
            value_groups: vec![values],
            ..Default::default()
        }
    }

    /// Scalar-keyed payload with one value group.
    pub fn scalar(categories: Vec<Option<f64>>, values: Vec<Option<f64>>) -> Self {
        Self {
            category: Some(CategoryColumn { kind: ColumnKind::Numeric, values: categories }),
            value_groups: vec![values],
            ..Default::default()
        }
    }

    pub fn with_value_group(mut self, values: Vec<Option<f64>>) -> Self {
        self.value_groups.push(values);
        self
    }

    pub fn with_titles(mut self, titles: Vec<Option<String>>) -> Self {
        self.titles = Some(titles);
        self
    }

    pub fn with_descriptions(mut self, descriptions: Vec<Option<String>>) -> Self {
        self.descriptions = Some(descriptions);
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<Option<f64>>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn row_count(&self) -> usize {
        self.category.as_ref().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn category_at(&self, i: usize) -> Option<f64> {
        self.category
            .as_ref()
            .and_then(|c| c.values.get(i).copied().flatten())
            .filter(|v| v.is_finite())
    }

    /// Value at row `i` and the group it came from. Group 0 wins; group 1 is
    /// consulted only when group 0 has no value at this row.
    pub fn value_at(&self, i: usize) -> Option<(f64, usize)> {
        let at = |g: usize| {
            self.value_groups
                .get(g)
                .and_then(|vals| vals.get(i).copied().flatten())
                .filter(|v| v.is_finite())
        };
        at(0).map(|v| (v, 0)).or_else(|| at(1).map(|v| (v, 1)))
    }

    pub fn title_at(&self, i: usize) -> Option<&str> {
        text_at(self.titles.as_deref(), i)
    }

    pub fn description_at(&self, i: usize) -> Option<&str> {
        text_at(self.descriptions.as_deref(), i)
    }

    pub fn size_at(&self, i: usize) -> Option<f64> {
        self.sizes
            .as_ref()
            .and_then(|s| s.get(i).copied().flatten())
            .filter(|v| v.is_finite())
    }
}

fn text_at(column: Option<&[Option<String>]>, i: usize) -> Option<&str> {
    column
        .and_then(|c| c.get(i))
        .and_then(|s| s.as_deref())
        .filter(|s| !s.trim().is_empty())
}
