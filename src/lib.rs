// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Bookkeeping for a whole-exome-sequencing pipeline.
//!
//! Each module backs one batch tool under `src/bin/`:
//!
//! * [`metadata_sheet`]: FASTQ directory to per-lane sample sheet
//! * [`mc_metasheet`]: tumor BAMs paired with their matched normals
//! * [`bed`]: capture-target BED file from a CNVkit reference
//! * [`scatter`]: CNVkit scatter plots for each segment file
//!
//! Filename conventions live in [`filenames`]; the lab's sample
//! spreadsheet is read by [`lab_metadata`].

pub mod bed;
pub mod error;
pub mod filenames;
pub mod glob_files;
pub mod lab_metadata;
pub mod mc_metasheet;
pub mod metadata_sheet;
pub mod scatter;
pub mod utils;

pub use error::SheetError;
pub use glob_files::NO_FILE;
