// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Errors raised while reading lab metadata and reference sheets.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("column '{column}' not found in {path:?}. Available columns: {available}")]
    MissingColumn {
        column: String,
        path: PathBuf,
        available: String,
    },

    #[error("spreadsheet {0:?} has no worksheets")]
    NoWorksheet(PathBuf),

    #[error("spreadsheet {0:?} has no header row")]
    EmptySheet(PathBuf),

    #[error(
        "unsupported metadata format for {0:?}; \
         expected .xls, .xlsx, .xlsm, .xlsb, .ods, .csv or .tsv"
    )]
    UnsupportedFormat(PathBuf),
}
