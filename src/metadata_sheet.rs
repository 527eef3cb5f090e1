// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Build the per-lane sample sheet that feeds the preprocessing half of
//! the WES pipeline. One row per R1 FASTQ:
//!
//! ```text
//! Sample_ID  Lane  FASTQ_R1                        FASTQ_R2                        Platform                Sequencing_Center  Mouse_Flag
//! 23-028     L003  23-028_S1_L003_R1_001.fastq.gz  23-028_S1_L003_R2_001.fastq.gz  Illumina_NovaSeqXPlus   TCGB               False
//! ```
//!
//! `Mouse_Flag` marks xenograft samples whose reads must be split from
//! mouse contamination before alignment.

use crate::filenames::{find_wes_fastqs, WesFastqFile};
use crate::lab_metadata::{is_xenograft_id, ColumnNames, LabMetadata, ID_COLUMNS};
use crate::utils::tsv_writer;
use anyhow::{Context, Error};
use log::{info, warn};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

pub const DEFAULT_PLATFORM: &str = "Illumina_NovaSeqXPlus";
pub const DEFAULT_SEQUENCING_CENTER: &str = "TCGB";

/// Column order of the sheet; matches the field order of [`MetadataSheetRow`].
pub const HEADER: [&str; 7] = [
    "Sample_ID",
    "Lane",
    "FASTQ_R1",
    "FASTQ_R2",
    "Platform",
    "Sequencing_Center",
    "Mouse_Flag",
];

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct MetadataSheetRow {
    #[serde(rename = "Sample_ID")]
    pub sample_id: String,
    #[serde(rename = "Lane")]
    pub lane: String,
    #[serde(rename = "FASTQ_R1")]
    pub fastq_r1: String,
    #[serde(rename = "FASTQ_R2")]
    pub fastq_r2: String,
    #[serde(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Sequencing_Center")]
    pub sequencing_center: String,
    #[serde(rename = "Mouse_Flag", serialize_with = "title_case_bool")]
    pub mouse_flag: bool,
}

/// The pipeline parses `True`/`False`.
fn title_case_bool<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *v { "True" } else { "False" })
}

/// Inputs for one run of the metadata sheet builder.
#[derive(Clone, Debug)]
pub struct MetadataSheetConfig {
    pub fastq_dir: PathBuf,
    pub batch_number: u32,
    pub platform: String,
    pub sequencing_center: String,
    pub metadata: PathBuf,
    pub output_dir: PathBuf,
    pub columns: ColumnNames,
}

pub fn output_path(output_dir: impl AsRef<Path>, batch_number: u32) -> PathBuf {
    output_dir
        .as_ref()
        .join(format!("batch{}_metadata.tsv", batch_number))
}

/// One row per FASTQ pair, flagging xenograft samples by their short id.
pub fn build_rows(
    fastqs: &[WesFastqFile],
    platform: &str,
    sequencing_center: &str,
    metadata: &LabMetadata,
) -> Vec<MetadataSheetRow> {
    fastqs
        .iter()
        .map(|fq| {
            let mouse_flag = match metadata.lookup_short_id(&fq.sample) {
                Some(short_id) => is_xenograft_id(short_id),
                None => {
                    warn!(
                        "sample {} not found in metadata; Mouse_Flag set to False",
                        fq.sample
                    );
                    false
                }
            };

            MetadataSheetRow {
                sample_id: fq.sample.clone(),
                lane: fq.lane.clone(),
                fastq_r1: fq.r1.clone(),
                fastq_r2: fq.r2.clone(),
                platform: platform.to_string(),
                sequencing_center: sequencing_center.to_string(),
                mouse_flag,
            }
        })
        .collect()
}

pub fn write_rows(path: impl AsRef<Path>, rows: &[MetadataSheetRow]) -> Result<(), Error> {
    let mut wtr = tsv_writer(&path, &HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .with_context(|| format!("writing {:?}", path.as_ref()))?;
    Ok(())
}

/// Scan, join against the lab metadata, and write the sheet. Returns
/// the path written.
pub fn run(cfg: &MetadataSheetConfig) -> Result<PathBuf, Error> {
    let fastqs = find_wes_fastqs(&cfg.fastq_dir)?;
    info!("found {} R1 FASTQs in {:?}", fastqs.len(), cfg.fastq_dir);

    let metadata = LabMetadata::from_path(&cfg.metadata, &cfg.columns, ID_COLUMNS)?;
    let rows = build_rows(&fastqs, &cfg.platform, &cfg.sequencing_center, &metadata);

    let out = output_path(&cfg.output_dir, cfg.batch_number);
    write_rows(&out, &rows)?;
    info!("Writing metadata sheet to: {}", out.display());
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lab_metadata::test::sample_metadata;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_rows() {
        let fastqs: Vec<_> = [
            "23-028_S1_L003_R1_001.fastq.gz",
            "22-001_S4_L003_R1_001.fastq.gz",
            "24-100_S9_L003_R1_001.fastq.gz",
        ]
        .iter()
        .filter_map(WesFastqFile::new)
        .collect();

        let rows = build_rows(&fastqs, "Illumina_NovaSeq6000", "TCGB", &sample_metadata());
        let flags: Vec<_> = rows
            .iter()
            .map(|r| (r.sample_id.as_str(), r.mouse_flag))
            .collect();
        assert_eq!(
            flags,
            vec![("23-028", true), ("22-001", false), ("24-100", false)]
        );
        assert_eq!(rows[0].fastq_r2, "23-028_S1_L003_R2_001.fastq.gz");
        assert_eq!(rows[0].platform, "Illumina_NovaSeq6000");
    }

    #[test]
    fn test_write_rows() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let out = output_path(dir.path(), 7);
        assert!(out.ends_with("batch7_metadata.tsv"));

        let fastqs: Vec<_> = WesFastqFile::new("23-028_S1_L003_R1_001.fastq.gz")
            .into_iter()
            .collect();
        let md = sample_metadata();
        let rows = build_rows(&fastqs, DEFAULT_PLATFORM, DEFAULT_SEQUENCING_CENTER, &md);
        write_rows(&out, &rows)?;

        let text = std::fs::read_to_string(&out)?;
        assert_eq!(
            text,
            "Sample_ID\tLane\tFASTQ_R1\tFASTQ_R2\tPlatform\tSequencing_Center\tMouse_Flag\n\
             23-028\tL003\t23-028_S1_L003_R1_001.fastq.gz\t23-028_S1_L003_R2_001.fastq.gz\t\
             Illumina_NovaSeqXPlus\tTCGB\tTrue\n"
        );
        Ok(())
    }

    #[test]
    fn test_write_no_rows() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let out = output_path(dir.path(), 8);
        write_rows(&out, &[])?;
        assert_eq!(std::fs::read_to_string(&out)?, format!("{}\n", HEADER.join("\t")));
        Ok(())
    }

    #[test]
    fn test_empty_short_id() {
        let mut md = sample_metadata().records().to_vec();
        md[0].short_id.clear();
        let md = LabMetadata::from_records(md);

        let fastqs: Vec<_> = WesFastqFile::new("23-028_S1_L003_R1_001.fastq.gz")
            .into_iter()
            .collect();
        let rows = build_rows(&fastqs, DEFAULT_PLATFORM, DEFAULT_SEQUENCING_CENTER, &md);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].mouse_flag);
    }
}
