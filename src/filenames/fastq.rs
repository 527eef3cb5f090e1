// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

use super::{list_files, sample_id_from_filename};
use crate::utils::file_name_string;
use anyhow::Error;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref LANE_REGEX: Regex = Regex::new(r"L\d+").unwrap();
}

const R1_SUFFIX: &str = "R1_001.fastq.gz";

/// A parsed R1 FASTQ file from a WES run, along with the name of
/// its R2 mate. We expect a filename of the form
/// `<path>/23-028_S1_L003_R1_001.fastq.gz`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct WesFastqFile {
    pub sample: String,
    pub lane: String,
    pub r1: String,
    pub r2: String,
    pub path: PathBuf,
}

impl WesFastqFile {
    /// Attempt to parse `path` as an R1 FASTQ file.
    pub fn new(path: impl AsRef<Path>) -> Option<WesFastqFile> {
        let r1 = file_name_string(&path)?;
        if !r1.ends_with(R1_SUFFIX) {
            return None;
        }

        let sample = sample_id_from_filename(&r1)?;
        let lane = LANE_REGEX.find(&r1)?.as_str().to_string();
        let r2 = r1.replace("_R1_", "_R2_");

        Some(WesFastqFile {
            sample,
            lane,
            r1,
            r2,
            path: path.as_ref().into(),
        })
    }
}

/// Find all R1 FASTQ files directly inside `path`. R1 files whose
/// names don't carry a sample id and lane are logged and skipped.
pub fn find_wes_fastqs(path: impl AsRef<Path>) -> Result<Vec<WesFastqFile>, Error> {
    let mut res = Vec::new();

    for f in list_files(path)? {
        let is_r1 = file_name_string(&f).map_or(false, |n| n.ends_with(R1_SUFFIX));
        if !is_r1 {
            continue;
        }

        match WesFastqFile::new(&f) {
            Some(parsed) => res.push(parsed),
            None => warn!("skipping {:?}: no sample id or lane in filename", f),
        }
    }

    res.sort_by(|a, b| a.r1.cmp(&b.r1));
    Ok(res)
}
