// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

use super::list_files;
use crate::utils::file_name_string;
use anyhow::Error;
use lazy_static::lazy_static;
use log::warn;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref CNS_SAMPLE_REGEX: Regex = Regex::new(r"\d+\w?-\d+").unwrap();
}

/// How segment (`.cns`) files are named relative to their bin-level
/// copy ratio (`.cnr`) companions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CnsNaming {
    pub cns_suffix: String,
    pub cnr_suffix: String,
}

impl Default for CnsNaming {
    fn default() -> Self {
        CnsNaming {
            cns_suffix: "_noDrop_t0005.cns".to_string(),
            cnr_suffix: ".BQSR.cnr".to_string(),
        }
    }
}

impl CnsNaming {
    /// Companion `.cnr` filename for a `.cns` filename. Names without
    /// the expected suffix just swap the extension.
    pub fn cnr_name(&self, cns_name: &str) -> String {
        match cns_name.strip_suffix(&self.cns_suffix) {
            Some(stem) => format!("{}{}", stem, self.cnr_suffix),
            None => match cns_name.strip_suffix(".cns") {
                Some(stem) => format!("{}.cnr", stem),
                None => format!("{}.cnr", cns_name),
            },
        }
    }
}

/// A CNVkit segment file, its sample id and its `.cnr` companion.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct CnsFile {
    pub sample: String,
    pub cns: PathBuf,
    pub cnr: PathBuf,
}

impl CnsFile {
    pub fn new(path: impl AsRef<Path>, naming: &CnsNaming) -> Option<CnsFile> {
        let name = file_name_string(&path)?;
        let sample = CNS_SAMPLE_REGEX.find(&name)?.as_str().to_string();
        let cnr = path.as_ref().with_file_name(naming.cnr_name(&name));
        Some(CnsFile {
            sample,
            cns: path.as_ref().into(),
            cnr,
        })
    }
}

/// Find the `*.cns` files directly inside `path`.
pub fn find_cns_files(path: impl AsRef<Path>, naming: &CnsNaming) -> Result<Vec<CnsFile>, Error> {
    let mut res = Vec::new();

    for f in list_files(path)? {
        if f.extension().map_or(true, |e| e != "cns") {
            continue;
        }
        match CnsFile::new(&f, naming) {
            Some(cns) => res.push(cns),
            None => warn!("skipping {:?}: no sample id in filename", f),
        }
    }

    Ok(res)
}
