// crates/cnpost-core/src/loader/tsv.rs

//! Tab-separated tables with a header row.
//!
//! Columns are located by header name (case-insensitive), never by position.
//! Each line is split on hard tabs; a leading BOM is dropped from any line and
//! short rows are padded with empty fields.

use crate::error::{CnPostError, Result};
use crate::model::{AdminCodeEntry, SplitDivisionEntry, StandardPostcodeEntry};
use std::collections::HashMap;
use std::io::BufRead;

/// A field of a [`TsvRow`]: the header spellings it accepts and whether the
/// table is unusable without it.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub names: &'static [&'static str],
    pub required: bool,
}

impl Column {
    pub const fn required(names: &'static [&'static str]) -> Self {
        Self { names, required: true }
    }

    pub const fn optional(names: &'static [&'static str]) -> Self {
        Self { names, required: false }
    }
}

/// A row type that can be built from a header-addressed TSV table.
pub trait TsvRow: Sized {
    /// Fields in the order `from_fields` expects them.
    const COLUMNS: &'static [Column];

    fn from_fields(fields: Vec<String>) -> Self;
}

/// A parsed TSV file: lowercased header names and raw rows.
#[derive(Debug, Clone, Default)]
pub struct TsvTable {
    header: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

fn split_line(line: &str) -> Vec<String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = line.strip_prefix('\u{FEFF}').unwrap_or(line);
    line.split('\t').map(str::to_string).collect()
}

/// Reads a whole table. An empty input yields an empty table.
pub fn read_table<R: BufRead>(reader: R) -> Result<TsvTable> {
    let mut lines = reader.lines();
    let mut table = TsvTable::default();

    let Some(header) = lines.next().transpose()? else {
        return Ok(table);
    };
    for (i, name) in split_line(&header).into_iter().enumerate() {
        let key = name.trim().to_lowercase();
        // A repeated header name points at its last column.
        if !key.is_empty() {
            table.header.insert(key, i);
        }
    }

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        table.rows.push(split_line(&line));
    }
    Ok(table)
}

impl TsvTable {
    /// Position of the first header matching any of `names`.
    pub fn position(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|n| self.header.get(&n.to_lowercase()).copied())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts every row into `T`, reporting missing required columns
    /// against the table name `what`.
    pub fn rows_as<T: TsvRow>(&self, what: &str) -> Result<Vec<T>> {
        let mut positions = Vec::with_capacity(T::COLUMNS.len());
        for col in T::COLUMNS {
            let pos = self.position(col.names);
            if pos.is_none() && col.required && !self.header.is_empty() {
                return Err(CnPostError::InvalidData(format!(
                    "{what}: missing required column '{}'",
                    col.names[0]
                )));
            }
            positions.push(pos);
        }

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let fields = positions
                    .iter()
                    .map(|pos| {
                        pos.and_then(|i| row.get(i))
                            .cloned()
                            .unwrap_or_default()
                    })
                    .collect();
                T::from_fields(fields)
            })
            .collect())
    }
}

/// Pops fields off the front in declaration order.
pub(crate) fn take(fields: &mut std::vec::IntoIter<String>) -> String {
    fields.next().unwrap_or_default()
}

impl TsvRow for SplitDivisionEntry {
    const COLUMNS: &'static [Column] = &[
        Column::required(&["province"]),
        Column::required(&["city"]),
        Column::optional(&["area", "district"]),
        Column::optional(&["area_postcode", "areapostcode"]),
        Column::optional(&["city_postcode", "citypostcode"]),
    ];

    fn from_fields(fields: Vec<String>) -> Self {
        let mut f = fields.into_iter();
        Self {
            province: take(&mut f),
            city: take(&mut f),
            area: take(&mut f),
            area_postcode: take(&mut f),
            city_postcode: take(&mut f),
        }
    }
}

impl TsvRow for StandardPostcodeEntry {
    const COLUMNS: &'static [Column] = &[
        Column::required(&["postcode"]),
        Column::required(&["province"]),
        Column::optional(&["city"]),
        Column::optional(&["district", "area"]),
        Column::optional(&["address"]),
    ];

    fn from_fields(fields: Vec<String>) -> Self {
        let mut f = fields.into_iter();
        Self {
            postcode: take(&mut f),
            province: take(&mut f),
            city: take(&mut f),
            district: take(&mut f),
            address: take(&mut f),
        }
    }
}

impl TsvRow for AdminCodeEntry {
    const COLUMNS: &'static [Column] = &[
        Column::required(&["province"]),
        Column::optional(&["city"]),
        Column::optional(&["area", "district"]),
        Column::required(&["province_code"]),
        Column::optional(&["city_code"]),
        Column::optional(&["area_code", "district_code"]),
    ];

    fn from_fields(fields: Vec<String>) -> Self {
        let mut f = fields.into_iter();
        Self {
            province: take(&mut f),
            city: take(&mut f),
            area: take(&mut f),
            province_code: take(&mut f),
            city_code: take(&mut f),
            area_code: take(&mut f),
        }
    }
}
