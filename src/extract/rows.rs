//! Label/value row collection
//!
//! Catalog pages present specifications as repeated rows, each holding a
//! label node and a value node. [`RowLocator`] turns such rows into a
//! [`Fields`] mapping keyed by the label's alias.

use super::{ExtractError, Query};
use crate::alias::alias;
use crate::catalog::Fields;
use scraper::ElementRef;

/// What to do with rows whose label aliases to the empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyLabels {
    /// Store the value under the `""` key
    Keep,
    /// Ignore the row
    Skip,
}

/// Locates label/value rows inside a container
#[derive(Debug)]
pub struct RowLocator {
    rows: Query,
    label: Query,
    value: Query,
}

impl RowLocator {
    /// Compiles the row, label and value selectors
    pub fn new(
        rows: &'static str,
        label: &'static str,
        value: &'static str,
    ) -> Result<Self, ExtractError> {
        Ok(Self {
            rows: Query::new(rows)?,
            label: Query::new(label)?,
            value: Query::new(value)?,
        })
    }

    /// Adds every row under `scope` to `fields`; later rows overwrite earlier ones
    pub fn collect_into(&self, scope: ElementRef<'_>, fields: &mut Fields, empty: EmptyLabels) {
        for row in self.rows.all(scope) {
            let key = alias(&self.label.text(row));
            if key.is_empty() && empty == EmptyLabels::Skip {
                continue;
            }
            fields.insert(key, self.value.text(row));
        }
    }

    /// Collects the rows under `scope` into a fresh mapping
    pub fn collect(&self, scope: ElementRef<'_>, empty: EmptyLabels) -> Fields {
        let mut fields = Fields::new();
        self.collect_into(scope, &mut fields, empty);
        fields
    }
}
