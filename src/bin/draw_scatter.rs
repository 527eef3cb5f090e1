// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Run `cnvkit.py scatter` for every segment file in a directory.

use anyhow::{bail, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use wes_sheets::filenames::CnsNaming;
use wes_sheets::scatter::{self, ScatterConfig, DEFAULT_CNVKIT, DEFAULT_GENE};
use wes_sheets::utils::init_logging;

#[derive(Parser, Debug)]
#[clap(about = "Draw CNVkit scatter plots for each .cns segment file")]
struct Args {
    /// Directory holding the .cns/.cnr files
    #[clap(short = 'd', long, default_value = ".", value_name = "PATH")]
    cns_dir: PathBuf,

    /// Directory for the PDF plots
    #[clap(short = 'o', long, default_value = ".", value_name = "PATH")]
    output_dir: PathBuf,

    /// Gene to zoom the plot to
    #[clap(short = 'g', long, default_value = DEFAULT_GENE)]
    gene: String,

    /// Plot title suffix after the sample id [default: the gene]
    #[clap(long)]
    title_label: Option<String>,

    /// CNVkit executable
    #[clap(long, default_value = DEFAULT_CNVKIT)]
    cnvkit: String,

    /// Filename suffix of the segment files
    #[clap(long)]
    cns_suffix: Option<String>,

    /// Suffix that replaces --cns-suffix to name the matching .cnr file
    #[clap(long)]
    cnr_suffix: Option<String>,

    /// Log the commands without running them
    #[clap(long)]
    dry_run: bool,
}

fn run(args: Args) -> Result<()> {
    let mut naming = CnsNaming::default();
    if let Some(s) = args.cns_suffix {
        naming.cns_suffix = s;
    }
    if let Some(s) = args.cnr_suffix {
        naming.cnr_suffix = s;
    }

    let cfg = ScatterConfig {
        cns_dir: args.cns_dir,
        output_dir: args.output_dir,
        gene: args.gene,
        title_label: args.title_label,
        cnvkit: args.cnvkit,
        naming,
        dry_run: args.dry_run,
    };

    let summary = scatter::run(&cfg)?;
    info!("{} plots drawn, {} failed", summary.succeeded, summary.failed);
    if summary.failed > 0 && summary.succeeded == 0 {
        bail!("every scatter plot failed");
    }
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run(Args::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
