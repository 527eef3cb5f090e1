// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Derive a BED file of exome capture targets from a CNVkit target
//! reference (`.cnn`), for coverage and saturation statistics.

use crate::utils::open_with_gz;
use anyhow::{Context, Error};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

/// Gene label CNVkit gives to off-target bins.
pub const ANTITARGET: &str = "Antitarget";

pub const DEFAULT_BED_OUTPUT: &str = "exome_targets.bed";

/// The columns of a `.cnn` row that we need. Any other columns
/// (log2, depth, gc, ...) are ignored.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CnnRecord {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub gene: String,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BedRecord {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
}

impl From<CnnRecord> for BedRecord {
    fn from(r: CnnRecord) -> BedRecord {
        BedRecord {
            chromosome: r.chromosome,
            start: r.start,
            end: r.end,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BedSummary {
    pub targets: usize,
    pub antitargets: usize,
}

/// Copy the target rows of the `.cnn` in `reader` to `writer` as
/// headerless `chromosome start end` lines, in input order.
pub fn write_targets<R: BufRead, W: Write>(reader: R, writer: W) -> Result<BedSummary, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    let mut summary = BedSummary::default();
    for (i, rec) in rdr.deserialize::<CnnRecord>().enumerate() {
        let rec = rec.with_context(|| format!("parsing reference row {}", i + 1))?;
        if rec.gene == ANTITARGET {
            summary.antitargets += 1;
            continue;
        }
        wtr.serialize(BedRecord::from(rec))?;
        summary.targets += 1;
    }
    wtr.flush()?;
    Ok(summary)
}

/// Read the reference at `reference` (optionally gzipped) and write the
/// BED file to `output`.
pub fn make_bed(
    reference: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<BedSummary, Error> {
    let reader = open_with_gz(&reference)?;
    let f = File::create(output.as_ref())
        .with_context(|| format!("creating {:?}", output.as_ref()))?;

    let summary = write_targets(reader, BufWriter::new(f))
        .with_context(|| format!("converting {:?}", reference.as_ref()))?;
    info!(
        "wrote {} targets to {:?} ({} antitarget rows dropped)",
        summary.targets,
        output.as_ref(),
        summary.antitargets
    );
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const CNN: &str = "chromosome\tstart\tend\tgene\tlog2\tdepth\n\
                       chr1\t65508\t65749\tOR4F5\t0\t0\n\
                       chr1\t150000\t250000\tAntitarget\t0\t0\n\
                       chr1\t69090\t70008\tOR4F5\t0\t0\n\
                       chr2\t10000\t10500\t-\t0\t0\n";

    #[test]
    fn test_write_targets() -> Result<(), Error> {
        let mut out = Vec::new();
        let summary = write_targets(CNN.as_bytes(), &mut out)?;

        assert_eq!(
            summary,
            BedSummary {
                targets: 3,
                antitargets: 1
            }
        );
        assert_eq!(
            String::from_utf8(out)?,
            "chr1\t65508\t65749\nchr1\t69090\t70008\nchr2\t10000\t10500\n"
        );
        Ok(())
    }

    #[test]
    fn test_bad_coordinate() {
        let cnn = "chromosome\tstart\tend\tgene\nchr1\tabc\t100\tOR4F5\n";
        assert!(write_targets(cnn.as_bytes(), Vec::new()).is_err());
    }

    #[test]
    fn test_make_bed() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let reference = dir.path().join("targets.reference.cnn");
        let output = dir.path().join(DEFAULT_BED_OUTPUT);
        std::fs::write(&reference, CNN)?;

        make_bed(&reference, &output)?;
        let bed = std::fs::read_to_string(&output)?;
        assert_eq!(bed.lines().count(), 3);
        assert!(!bed.contains("Antitarget"));
        assert!(bed.starts_with("chr1\t65508\t65749\n"));
        Ok(())
    }
}
