// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Utilities for finding FASTQ, BAM and CNVkit segment files on disk,
//! and for recovering sample identifiers from their filenames.
//!
//! Two identifier schemes show up in filenames:
//! * the sequencing-centre id, e.g. `23-028` or `23B-036`, always at the
//!   start of the name
//! * the lab short id, e.g. `GBX1406` or `PT406`, anywhere in the name

pub mod bam;
pub mod cns;
pub mod fastq;

use anyhow::{Context, Error};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

pub use bam::{find_tumor_bams, TumorBamFile};
pub use cns::{find_cns_files, CnsFile, CnsNaming};
pub use fastq::{find_wes_fastqs, WesFastqFile};

lazy_static! {
    static ref SEQ_ID_REGEX: Regex = Regex::new(r"^\d+\w*-\d+").unwrap();
    static ref SHORT_ID_REGEX: Regex = Regex::new(r"\w+\d+").unwrap();
}

/// Sequencing-centre id at the start of `filename`, e.g.
/// `23-028_S1_L003_R1_001.fastq.gz` -> `23-028`.
pub fn sample_id_from_filename(filename: &str) -> Option<String> {
    SEQ_ID_REGEX.find(filename).map(|m| m.as_str().to_string())
}

/// First lab-style short id in `filename`, e.g.
/// `GBX1406.BQSR.bam` -> `GBX1406`.
pub fn short_id_from_filename(filename: &str) -> Option<String> {
    SHORT_ID_REGEX.find(filename).map(|m| m.as_str().to_string())
}

/// Sample id of a BAM file: the sequencing-centre id if the name
/// starts with one, otherwise the first short id.
pub fn bam_sample_id(filename: &str) -> Option<String> {
    sample_id_from_filename(filename).or_else(|| short_id_from_filename(filename))
}

/// All regular files directly inside `dir`, sorted.
fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, Error> {
    let mut res = Vec::new();
    let entries =
        std::fs::read_dir(dir.as_ref()).with_context(|| format!("reading {:?}", dir.as_ref()))?;

    for f in entries {
        let path = f?.path();
        if path.is_file() {
            res.push(path);
        }
    }

    res.sort();
    Ok(res)
}
