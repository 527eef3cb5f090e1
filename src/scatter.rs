// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Draw a CNVkit scatter plot for every segment file in a directory,
//! zoomed to one gene of interest.

use crate::filenames::{find_cns_files, CnsFile, CnsNaming};
use anyhow::{Context, Error};
use itertools::Itertools;
use log::{info, warn};
use std::path::PathBuf;
use std::process::Command;

pub const DEFAULT_CNVKIT: &str = "cnvkit.py";
pub const DEFAULT_GENE: &str = "CDKN2A";

#[derive(Clone, Debug)]
pub struct ScatterConfig {
    pub cns_dir: PathBuf,
    pub output_dir: PathBuf,
    pub gene: String,
    /// Suffix of the plot title after the sample id. Defaults to the gene.
    pub title_label: Option<String>,
    pub cnvkit: String,
    pub naming: CnsNaming,
    pub dry_run: bool,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        ScatterConfig {
            cns_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            gene: DEFAULT_GENE.to_string(),
            title_label: None,
            cnvkit: DEFAULT_CNVKIT.to_string(),
            naming: CnsNaming::default(),
            dry_run: false,
        }
    }
}

/// A fully rendered `cnvkit.py scatter` invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScatterCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ScatterCommand {
    pub fn new(cns: &CnsFile, cfg: &ScatterConfig) -> ScatterCommand {
        let label = cfg.title_label.as_deref().unwrap_or(&cfg.gene);
        let pdf = cfg
            .output_dir
            .join(format!("{}.{}.pdf", cns.sample, cfg.gene));

        let args = vec![
            "scatter".to_string(),
            "-s".to_string(),
            cns.cns.to_string_lossy().into_owned(),
            "-g".to_string(),
            cfg.gene.clone(),
            "-o".to_string(),
            pdf.to_string_lossy().into_owned(),
            "--title".to_string(),
            format!("{}_{}", cns.sample, label),
            cns.cnr.to_string_lossy().into_owned(),
        ];

        ScatterCommand {
            program: cfg.cnvkit.clone(),
            args,
        }
    }

    pub fn command_line(&self) -> String {
        std::iter::once(&self.program).chain(&self.args).join(" ")
    }
}

/// Executes rendered commands. Returns whether the command succeeded.
pub trait RunCommand {
    fn run(&mut self, cmd: &ScatterCommand) -> Result<bool, Error>;
}

/// Run commands as child processes, waiting for each to finish.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

impl RunCommand for ProcessRunner {
    fn run(&mut self, cmd: &ScatterCommand) -> Result<bool, Error> {
        let status = Command::new(&cmd.program)
            .args(&cmd.args)
            .status()
            .with_context(|| format!("launching {}", cmd.program))?;
        Ok(status.success())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScatterSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Plot every segment file under `cfg.cns_dir`. Failures are logged and
/// counted; the remaining files are still plotted.
pub fn run_with<R: RunCommand>(
    cfg: &ScatterConfig,
    runner: &mut R,
) -> Result<ScatterSummary, Error> {
    let files = find_cns_files(&cfg.cns_dir, &cfg.naming)?;
    info!("found {} segment files in {:?}", files.len(), cfg.cns_dir);

    let mut summary = ScatterSummary::default();
    for cns in &files {
        if !cns.cnr.exists() {
            warn!("{:?} has no companion {:?}", cns.cns, cns.cnr);
        }

        let cmd = ScatterCommand::new(cns, cfg);
        info!("{}", cmd.command_line());
        if cfg.dry_run {
            continue;
        }

        match runner.run(&cmd) {
            Ok(true) => summary.succeeded += 1,
            Ok(false) => {
                warn!("scatter plot failed for {}", cns.sample);
                summary.failed += 1;
            }
            Err(e) => {
                warn!("scatter plot failed for {}: {:#}", cns.sample, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

pub fn run(cfg: &ScatterConfig) -> Result<ScatterSummary, Error> {
    run_with(cfg, &mut ProcessRunner)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    /// Records commands; fails for any sample listed in `fail`.
    #[derive(Default)]
    struct Recorder {
        seen: Vec<ScatterCommand>,
        fail: Vec<&'static str>,
    }

    /// The value passed after `flag`.
    fn arg_after<'a>(cmd: &'a ScatterCommand, flag: &str) -> Option<&'a str> {
        cmd.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| cmd.args.get(i + 1))
            .map(String::as_str)
    }

    impl RunCommand for Recorder {
        fn run(&mut self, cmd: &ScatterCommand) -> Result<bool, Error> {
            self.seen.push(cmd.clone());
            let cns = arg_after(cmd, "-s").unwrap_or_default();
            Ok(!self.fail.iter().any(|s| cns.contains(s)))
        }
    }

    #[test]
    fn test_command() {
        let cfg = ScatterConfig::default();
        let cns = CnsFile::new("23-028_noDrop_t0005.cns", &cfg.naming).unwrap();
        let cmd = ScatterCommand::new(&cns, &cfg);
        assert_eq!(
            cmd.command_line(),
            "cnvkit.py scatter -s 23-028_noDrop_t0005.cns -g CDKN2A -o ./23-028.CDKN2A.pdf \
             --title 23-028_CDKN2A 23-028.BQSR.cnr"
        );

        let cfg = ScatterConfig {
            gene: "EGFR".to_string(),
            title_label: Some("chr7".to_string()),
            output_dir: PathBuf::from("plots"),
            ..ScatterConfig::default()
        };
        let cmd = ScatterCommand::new(&cns, &cfg);
        assert_eq!(arg_after(&cmd, "-o"), Some("plots/23-028.EGFR.pdf"));
        assert_eq!(arg_after(&cmd, "--title"), Some("23-028_chr7"));
    }

    fn cns_dir() -> Result<tempfile::TempDir, Error> {
        let dir = tempfile::tempdir()?;
        for f in [
            "23-028_noDrop_t0005.cns",
            "23-028.BQSR.cnr",
            "23-029_noDrop_t0005.cns",
            "23-029.BQSR.cnr",
            "reference.cns",
        ] {
            std::fs::write(dir.path().join(f), b"")?;
        }
        Ok(dir)
    }

    fn config(dir: &Path) -> ScatterConfig {
        ScatterConfig {
            cns_dir: dir.to_path_buf(),
            ..ScatterConfig::default()
        }
    }

    #[test]
    fn test_run_continues_after_failure() -> Result<(), Error> {
        let dir = cns_dir()?;
        let mut rec = Recorder {
            fail: vec!["23-028"],
            ..Recorder::default()
        };

        let summary = run_with(&config(dir.path()), &mut rec)?;
        assert_eq!(
            summary,
            ScatterSummary {
                succeeded: 1,
                failed: 1
            }
        );
        assert_eq!(rec.seen.len(), 2);
        Ok(())
    }

    #[test]
    fn test_dry_run() -> Result<(), Error> {
        let dir = cns_dir()?;
        let mut rec = Recorder::default();
        let cfg = ScatterConfig {
            dry_run: true,
            ..config(dir.path())
        };

        let summary = run_with(&cfg, &mut rec)?;
        assert_eq!(summary, ScatterSummary::default());
        assert!(rec.seen.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_program_is_counted() -> Result<(), Error> {
        let dir = cns_dir()?;
        let cfg = ScatterConfig {
            cnvkit: "no-such-cnvkit-binary".to_string(),
            ..config(dir.path())
        };
        let summary = run(&cfg)?;
        assert_eq!(summary.failed, 2);
        Ok(())
    }
}
