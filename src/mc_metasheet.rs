// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Build the mutation-calling sheet: each analysis-ready tumor BAM
//! with its indices, joined to the BAM of the normal sample derived
//! from the same cell line.
//!
//! ```text
//! Sample_ID  Tumor_ID  Tumor_BAM        Tumor_BAI            Tumor_SBI            Normal_ID  Normal_BAM                 Normal_BAI
//! 23-028     GBX1406   23-028.BQSR.bam  23-028.BQSR.bam.bai  23-028.BQSR.bam.sbi  PT406.BLD  normals/PT406.BLD.bam      normals/PT406.BLD.bam.bai
//! ```
//!
//! Normals live in `<bam_dir>/normals/`, named either by the normal's
//! short id or by its WES id. Anything that cannot be resolved is
//! written as `NO_FILE`.

use crate::filenames::{find_tumor_bams, TumorBamFile};
use crate::glob_files::{
    first_match_of, first_or_sentinel, prefix_pattern, FileGlob, FsGlob, NO_FILE,
};
use crate::lab_metadata::{ColumnNames, LabMetadata, PAIRING_COLUMNS};
use crate::utils::tsv_writer;
use anyhow::{Context, Error};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

const NORMALS_SUBDIR: &str = "normals";

/// Column order of the sheet; matches the field order of [`McMetasheetRow`].
pub const HEADER: [&str; 8] = [
    "Sample_ID",
    "Tumor_ID",
    "Tumor_BAM",
    "Tumor_BAI",
    "Tumor_SBI",
    "Normal_ID",
    "Normal_BAM",
    "Normal_BAI",
];

/// The normal matched to one tumor sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalInfo {
    pub tumor_id: String,
    pub normal_id: String,
    pub normal_bam: String,
    pub normal_bai: String,
}

impl NormalInfo {
    fn unmatched(tumor_id: &str) -> NormalInfo {
        NormalInfo {
            tumor_id: tumor_id.to_string(),
            normal_id: NO_FILE.to_string(),
            normal_bam: NO_FILE.to_string(),
            normal_bai: NO_FILE.to_string(),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct McMetasheetRow {
    #[serde(rename = "Sample_ID")]
    pub sample_id: String,
    #[serde(rename = "Tumor_ID")]
    pub tumor_id: String,
    #[serde(rename = "Tumor_BAM")]
    pub tumor_bam: String,
    #[serde(rename = "Tumor_BAI")]
    pub tumor_bai: String,
    #[serde(rename = "Tumor_SBI")]
    pub tumor_sbi: String,
    #[serde(rename = "Normal_ID")]
    pub normal_id: String,
    #[serde(rename = "Normal_BAM")]
    pub normal_bam: String,
    #[serde(rename = "Normal_BAI")]
    pub normal_bai: String,
}

impl McMetasheetRow {
    /// A tumor paired with itself, by id or by its id appearing in
    /// the normal BAM path. Indicates a metadata error.
    pub fn is_self_matched(&self) -> bool {
        self.normal_bam.contains(&self.tumor_id) || self.tumor_id == self.normal_id
    }
}

/// Inputs for one run of the mutation-calling sheet builder.
#[derive(Clone, Debug)]
pub struct McMetasheetConfig {
    pub bam_dir: PathBuf,
    pub batch_name: String,
    pub output_dir: PathBuf,
    pub metadata: PathBuf,
    pub columns: ColumnNames,
}

pub fn output_path(output_dir: impl AsRef<Path>, batch_name: &str) -> PathBuf {
    output_dir
        .as_ref()
        .join(format!("{}_mc_metasheet.tsv", batch_name))
}

/// Look up the matched normal for tumor `sample_id`.
///
/// * sample missing from the metadata: every field is `NO_FILE`
/// * patient has no normal, the cell line is blank, or no normal shares
///   the cell line: only `tumor_id` is filled in
/// * otherwise the normal's BAM and BAI are located under
///   `<bam_dir>/normals/`, trying the short id before the WES id
pub fn find_normal_info<G: FileGlob + ?Sized>(
    sample_id: &str,
    metadata: &LabMetadata,
    bam_dir: &str,
    globber: &G,
) -> Result<NormalInfo, Error> {
    let tumor = match metadata.lookup(sample_id) {
        Some(t) => t,
        None => {
            warn!("sample {} not found in metadata", sample_id);
            return Ok(NormalInfo::unmatched(NO_FILE));
        }
    };

    if !tumor.has_normal() {
        debug!("{} ({}) has no normal", sample_id, tumor.short_id);
        return Ok(NormalInfo::unmatched(&tumor.short_id));
    }

    let normal = match metadata.normal_for_line(&tumor.line) {
        Some(n) => n,
        None => {
            warn!(
                "{} ({}) is marked as having a normal but no normal with cell line {} is listed",
                sample_id, tumor.short_id, tumor.line
            );
            return Ok(NormalInfo::unmatched(&tumor.short_id));
        }
    };

    let normals_dir = format!("{}/{}", bam_dir.trim_end_matches('/'), NORMALS_SUBDIR);
    let candidates = |suffix: &str| {
        vec![
            prefix_pattern(&normals_dir, &normal.short_id, suffix),
            prefix_pattern(&normals_dir, &normal.wes_id, suffix),
        ]
    };

    let normal_bam = first_or_sentinel(first_match_of(globber, &candidates("*.bam"))?);
    let normal_bai = first_or_sentinel(first_match_of(globber, &candidates("*.bai"))?);
    if normal_bam == NO_FILE {
        warn!(
            "no BAM found for normal {} ({}) in {}",
            normal.short_id, normal.wes_id, normals_dir
        );
    }

    Ok(NormalInfo {
        tumor_id: tumor.short_id.clone(),
        normal_id: normal.short_id.clone(),
        normal_bam,
        normal_bai,
    })
}

/// One row per tumor BAM, before the self-match filter.
pub fn build_rows<G: FileGlob + ?Sized>(
    bams: &[TumorBamFile],
    metadata: &LabMetadata,
    bam_dir: &str,
    globber: &G,
) -> Result<Vec<McMetasheetRow>, Error> {
    let mut rows = Vec::with_capacity(bams.len());

    for bam in bams {
        let sample = &bam.sample;
        let tumor_bai = prefix_pattern(bam_dir, sample, "*bai");
        let tumor_bai = first_or_sentinel(globber.glob(&tumor_bai)?);
        let tumor_sbi = prefix_pattern(bam_dir, sample, "*sbi");
        let tumor_sbi = first_or_sentinel(globber.glob(&tumor_sbi)?);

        let normal = find_normal_info(sample, metadata, bam_dir, globber)?;

        rows.push(McMetasheetRow {
            sample_id: sample.clone(),
            tumor_id: normal.tumor_id,
            tumor_bam: bam.path_string(),
            tumor_bai,
            tumor_sbi,
            normal_id: normal.normal_id,
            normal_bam: normal.normal_bam,
            normal_bai: normal.normal_bai,
        });
    }

    Ok(rows)
}

/// Drop rows where the tumor was resolved as its own normal.
pub fn filter_self_matches(rows: Vec<McMetasheetRow>) -> Vec<McMetasheetRow> {
    rows.into_iter()
        .filter(|row| {
            if row.is_self_matched() {
                warn!(
                    "dropping {}: tumor {} resolved to normal {} ({})",
                    row.sample_id, row.tumor_id, row.normal_id, row.normal_bam
                );
                false
            } else {
                true
            }
        })
        .collect()
}

pub fn write_rows(path: impl AsRef<Path>, rows: &[McMetasheetRow]) -> Result<(), Error> {
    let mut wtr = tsv_writer(&path, &HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .with_context(|| format!("writing {:?}", path.as_ref()))?;
    Ok(())
}

/// Scan the BAM directory, pair tumors with normals, and write the
/// sheet. Returns the path written.
pub fn run(cfg: &McMetasheetConfig) -> Result<PathBuf, Error> {
    run_with_glob(cfg, &FsGlob)
}

pub fn run_with_glob<G: FileGlob + ?Sized>(
    cfg: &McMetasheetConfig,
    globber: &G,
) -> Result<PathBuf, Error> {
    let bams = find_tumor_bams(&cfg.bam_dir)?;
    info!("found {} tumor BAMs in {:?}", bams.len(), cfg.bam_dir);

    let metadata = LabMetadata::from_path(&cfg.metadata, &cfg.columns, PAIRING_COLUMNS)?;
    let bam_dir = cfg.bam_dir.to_string_lossy();

    let rows = build_rows(&bams, &metadata, &bam_dir, globber)?;
    let n_built = rows.len();
    let rows = filter_self_matches(rows);
    info!("kept {} of {} rows", rows.len(), n_built);

    let out = output_path(&cfg.output_dir, &cfg.batch_name);
    write_rows(&out, &rows)?;
    info!("Writing metadata sheet to: {}", out.display());
    Ok(out)
}
