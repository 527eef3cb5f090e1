// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Shell-style file lookup used to locate BAM indices and matched normals.

use anyhow::{Context, Error};
use glob::Pattern;
use log::debug;

/// Placeholder written wherever a file or a match could not be resolved.
pub const NO_FILE: &str = "NO_FILE";

/// A method to expand a glob pattern into a list of paths.
/// Implemented over the filesystem by `FsGlob`; tests supply
/// canned responses instead.
pub trait FileGlob {
    fn glob(&self, pattern: &str) -> Result<Vec<String>, Error>;
}

/// Expand patterns against the local filesystem. Matches come
/// back in sorted order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsGlob;

impl FileGlob for FsGlob {
    fn glob(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let mut res = Vec::new();
        let entries =
            glob::glob(pattern).with_context(|| format!("bad glob pattern {pattern}"))?;
        for entry in entries {
            match entry {
                Ok(path) => res.push(path.to_string_lossy().into_owned()),
                Err(e) => debug!("skipping unreadable path while globbing {}: {}", pattern, e),
            }
        }
        res.sort();
        Ok(res)
    }
}

/// Build a pattern `{dir}/{prefix}{suffix}`, escaping any glob
/// metacharacters in `dir` and `prefix`.
pub fn prefix_pattern(dir: &str, prefix: &str, suffix: &str) -> String {
    format!(
        "{}/{}{}",
        Pattern::escape(dir.trim_end_matches('/')),
        Pattern::escape(prefix),
        suffix
    )
}

/// Try each pattern in turn and return the matches of the first
/// pattern that matches anything.
pub fn first_match_of<G: FileGlob + ?Sized>(
    globber: &G,
    patterns: &[String],
) -> Result<Vec<String>, Error> {
    for p in patterns {
        let hits = globber.glob(p)?;
        if !hits.is_empty() {
            return Ok(hits);
        }
    }
    Ok(Vec::new())
}

/// The first match, or `NO_FILE`.
pub fn first_or_sentinel(matches: Vec<String>) -> String {
    matches
        .into_iter()
        .next()
        .unwrap_or_else(|| NO_FILE.to_string())
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// Canned glob responses keyed by exact pattern text.
    #[derive(Default)]
    pub(crate) struct MockGlob {
        pub responses: HashMap<String, Vec<String>>,
    }

    impl MockGlob {
        pub fn with(mut self, pattern: &str, hits: &[&str]) -> Self {
            self.responses.insert(
                pattern.to_string(),
                hits.iter().map(|s| s.to_string()).collect(),
            );
            self
        }
    }

    impl FileGlob for MockGlob {
        fn glob(&self, pattern: &str) -> Result<Vec<String>, Error> {
            Ok(self.responses.get(pattern).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_prefix_pattern() {
        assert_eq!(
            prefix_pattern("/data/bams/", "23-028", "*bai"),
            "/data/bams/23-028*bai"
        );
        assert_eq!(
            prefix_pattern("/data/[batch]", "PT406.BLD", "*.bam"),
            "/data/[[]batch[]]/PT406.BLD*.bam"
        );
    }

    #[test]
    fn test_first_match_of_falls_back() -> Result<(), Error> {
        let g = MockGlob::default()
            .with("a*", &[])
            .with("b*", &["b1", "b2"])
            .with("c*", &["c1"]);

        let pats = vec!["a*".to_string(), "b*".to_string(), "c*".to_string()];
        assert_eq!(first_match_of(&g, &pats)?, vec!["b1", "b2"]);
        assert_eq!(first_or_sentinel(first_match_of(&g, &pats)?), "b1");

        let none = vec!["a*".to_string(), "z*".to_string()];
        assert_eq!(first_or_sentinel(first_match_of(&g, &none)?), NO_FILE);
        Ok(())
    }

    #[test]
    fn test_fs_glob_sorted() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        for f in ["23-028.BQSR.bam.sbi", "23-028.BQSR.bam.bai", "23-028.BQSR.bai"] {
            std::fs::write(dir.path().join(f), b"")?;
        }
        let d = dir.path().to_string_lossy().into_owned();

        let hits = FsGlob.glob(&prefix_pattern(&d, "23-028", "*bai"))?;
        assert_eq!(
            hits,
            vec![
                format!("{}/23-028.BQSR.bai", d),
                format!("{}/23-028.BQSR.bam.bai", d)
            ]
        );
        Ok(())
    }
}
