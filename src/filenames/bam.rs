// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

use super::{bam_sample_id, list_files};
use crate::utils::file_name_string;
use anyhow::Error;
use log::warn;
use std::path::{Path, PathBuf};

/// An analysis-ready tumor BAM and the sample id recovered from its name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TumorBamFile {
    pub sample: String,
    pub path: PathBuf,
}

impl TumorBamFile {
    /// Attempt to parse `path` as a `.bam` with a recognisable sample id.
    pub fn new(path: impl AsRef<Path>) -> Option<TumorBamFile> {
        let name = file_name_string(&path)?;
        if !name.ends_with(".bam") {
            return None;
        }
        let sample = bam_sample_id(&name)?;
        Some(TumorBamFile {
            sample,
            path: path.as_ref().into(),
        })
    }

    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Find the `*.bam` files directly inside `path`. Matched normals live
/// in the `normals/` subdirectory and are not returned.
pub fn find_tumor_bams(path: impl AsRef<Path>) -> Result<Vec<TumorBamFile>, Error> {
    let mut res = Vec::new();

    for f in list_files(path)? {
        if f.extension().map_or(true, |e| e != "bam") {
            continue;
        }
        match TumorBamFile::new(&f) {
            Some(bam) => res.push(bam),
            None => warn!("skipping {:?}: no sample id in filename", f),
        }
    }

    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_tumor_bams() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("normals"))?;
        for f in [
            "23-028.BQSR.bam",
            "23-028.BQSR.bam.bai",
            "GBX1407.BQSR.bam",
            "normals/PT406.BLD.bam",
            "___.bam",
        ] {
            std::fs::write(dir.path().join(f), b"")?;
        }

        let bams = find_tumor_bams(dir.path())?;
        let expected = vec![
            TumorBamFile {
                sample: "23-028".to_string(),
                path: dir.path().join("23-028.BQSR.bam"),
            },
            TumorBamFile {
                sample: "GBX1407".to_string(),
                path: dir.path().join("GBX1407.BQSR.bam"),
            },
        ];
        assert_eq!(bams, expected);
        Ok(())
    }
}
