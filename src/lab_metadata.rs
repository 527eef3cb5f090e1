// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Read the lab's sequencing metadata spreadsheet and answer the
//! per-sample questions the sheet builders need: what is this
//! sample's short id, does its patient have a normal, and which
//! normal shares its cell line.
//!
//! The spreadsheet layout is owned by the lab and changes over time,
//! so the column headers are configurable through [`ColumnNames`].

use crate::error::SheetError;
use anyhow::{Context, Error};
use calamine::{open_workbook_auto, Data, Reader};
use itertools::Itertools;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `Sample Type` value marking a normal (non-tumor) sample.
pub const NORMAL_SAMPLE_TYPE: &str = "NRM";

lazy_static! {
    static ref XENOGRAFT_REGEX: Regex = Regex::new(r"XG?\d+").unwrap();
}

/// The spreadsheet columns we read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    WesId,
    ShortId,
    SampleType,
    Line,
    HasNormal,
}

/// Enough to map WES ids to short ids.
pub const ID_COLUMNS: &[Column] = &[Column::WesId, Column::ShortId];

/// Everything tumor/normal pairing needs.
pub const PAIRING_COLUMNS: &[Column] = &[
    Column::WesId,
    Column::ShortId,
    Column::SampleType,
    Column::Line,
    Column::HasNormal,
];

/// Header names of the spreadsheet columns we read.
#[derive(Deserialize, Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(default)]
pub struct ColumnNames {
    pub wes_id: String,
    pub short_id: String,
    pub sample_type: String,
    pub line: String,
    pub has_normal: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            wes_id: "WES ID".to_string(),
            short_id: "Short ID".to_string(),
            sample_type: "Sample Type".to_string(),
            line: "Line".to_string(),
            has_normal: "DOES PT HAVE NRM?".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn header(&self, col: Column) -> &str {
        match col {
            Column::WesId => &self.wes_id,
            Column::ShortId => &self.short_id,
            Column::SampleType => &self.sample_type,
            Column::Line => &self.line,
            Column::HasNormal => &self.has_normal,
        }
    }

    /// Load overrides from a JSON object, e.g. `{"wes_id": "TCGB ID"}`.
    /// Keys that are left out keep their default header.
    pub fn from_json(path: impl AsRef<Path>) -> Result<ColumnNames, Error> {
        let f = std::fs::File::open(path.as_ref())
            .with_context(|| format!("opening column config {:?}", path.as_ref()))?;
        let cols = serde_json::from_reader(std::io::BufReader::new(f))
            .with_context(|| format!("parsing column config {:?}", path.as_ref()))?;
        Ok(cols)
    }

    /// Defaults, or the overrides in `path` when one is given.
    pub fn load(path: Option<&Path>) -> Result<ColumnNames, Error> {
        match path {
            Some(p) => Self::from_json(p),
            None => Ok(ColumnNames::default()),
        }
    }
}

/// One sample's row from the metadata spreadsheet.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct MetadataRecord {
    pub wes_id: String,
    pub short_id: String,
    pub sample_type: String,
    pub line: String,
    pub has_normal: String,
}

impl MetadataRecord {
    pub fn has_normal(&self) -> bool {
        self.has_normal.trim() == "Y"
    }

    pub fn is_normal(&self) -> bool {
        self.sample_type == NORMAL_SAMPLE_TYPE
    }

    /// Xenograft-derived samples carry an `X` + digits tag in their
    /// short id (`GBX1406`, `SDXG12`). Their reads need mouse
    /// decontamination downstream.
    pub fn is_xenograft(&self) -> bool {
        is_xenograft_id(&self.short_id)
    }
}

pub fn is_xenograft_id(short_id: &str) -> bool {
    XENOGRAFT_REGEX.is_match(short_id)
}

/// The subset of the metadata spreadsheet used by the sheet builders.
#[derive(Clone, Debug, Default)]
pub struct LabMetadata {
    records: Vec<MetadataRecord>,
}

impl LabMetadata {
    pub fn from_records(records: Vec<MetadataRecord>) -> LabMetadata {
        LabMetadata { records }
    }

    /// Read the first worksheet of an Excel/ODS workbook, or a CSV/TSV
    /// export of it. The first row must hold the column headers.
    ///
    /// Columns in `required` must be present; any other column that is
    /// missing reads as empty in every record.
    pub fn from_path(
        path: impl AsRef<Path>,
        cols: &ColumnNames,
        required: &[Column],
    ) -> Result<LabMetadata, Error> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let rows = match ext.as_str() {
            "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => read_workbook(path)?,
            "csv" => read_delimited(path, b',')?,
            "tsv" | "txt" => read_delimited(path, b'\t')?,
            _ => return Err(SheetError::UnsupportedFormat(path.into()).into()),
        };

        let md = Self::from_rows(rows, path, cols, required)?;
        debug!("read {} metadata rows from {:?}", md.records.len(), path);
        Ok(md)
    }

    fn from_rows(
        rows: Vec<Vec<String>>,
        path: &Path,
        cols: &ColumnNames,
        required: &[Column],
    ) -> Result<LabMetadata, Error> {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or_else(|| SheetError::EmptySheet(path.into()))?;

        let find = |col: Column| -> Result<Option<usize>, SheetError> {
            let name = cols.header(col);
            match header.iter().position(|h| h.trim() == name) {
                Some(i) => Ok(Some(i)),
                None if required.contains(&col) => Err(SheetError::MissingColumn {
                    column: name.to_string(),
                    path: path.into(),
                    available: header.iter().map(|h| format!("'{}'", h)).join(", "),
                }),
                None => {
                    debug!("column '{}' not in {:?}; reading as empty", name, path);
                    Ok(None)
                }
            }
        };

        let wes_id = find(Column::WesId)?;
        let short_id = find(Column::ShortId)?;
        let sample_type = find(Column::SampleType)?;
        let line = find(Column::Line)?;
        let has_normal = find(Column::HasNormal)?;

        let records = rows
            .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
            .map(|row| {
                let cell = |i: Option<usize>| {
                    i.and_then(|i| row.get(i))
                        .map(|c| c.trim().to_string())
                        .unwrap_or_default()
                };
                MetadataRecord {
                    wes_id: cell(wes_id),
                    short_id: cell(short_id),
                    sample_type: cell(sample_type),
                    line: cell(line),
                    has_normal: cell(has_normal),
                }
            })
            .collect();

        Ok(LabMetadata { records })
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Find the row for `sample_id`, matched exactly against the WES id
    /// column and then against the short id column.
    pub fn lookup(&self, sample_id: &str) -> Option<&MetadataRecord> {
        self.records
            .iter()
            .find(|r| r.wes_id == sample_id)
            .or_else(|| self.records.iter().find(|r| r.short_id == sample_id))
    }

    /// Short id of the sample with WES id `wes_id`.
    pub fn lookup_short_id(&self, wes_id: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.wes_id == wes_id)
            .map(|r| r.short_id.as_str())
    }

    pub fn normals(&self) -> impl Iterator<Item = &MetadataRecord> {
        self.records.iter().filter(|r| r.is_normal())
    }

    /// The normal sample derived from cell line `line`. If the sheet
    /// lists several, the first one wins. A blank line matches nothing.
    pub fn normal_for_line(&self, line: &str) -> Option<&MetadataRecord> {
        if line.trim().is_empty() {
            return None;
        }
        let matches: Vec<_> = self.normals().filter(|r| r.line == line).collect();
        if matches.len() > 1 {
            warn!(
                "{} normals share cell line {}: {}. Using {}",
                matches.len(),
                line,
                matches.iter().map(|r| &r.short_id).join(", "),
                matches[0].short_id
            );
        }
        matches.first().copied()
    }
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<String>>, Error> {
    let mut workbook =
        open_workbook_auto(path).with_context(|| format!("opening spreadsheet {:?}", path))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetError::NoWorksheet(path.into()))?
        .with_context(|| format!("reading first worksheet of {:?}", path))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Excel stores numeric ids like cell line `406` as floats.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening metadata {:?}", path))?;

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("reading metadata {:?}", path))?;
        rows.push(rec.iter().map(|c| c.to_string()).collect());
    }
    Ok(rows)
}
