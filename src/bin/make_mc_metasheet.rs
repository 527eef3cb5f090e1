// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Metadata sheet generator for the mutation calling portion of the WES
//! pipeline: pairs each tumor BAM with its matched normal.

use anyhow::Result;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use wes_sheets::lab_metadata::ColumnNames;
use wes_sheets::mc_metasheet::{self, McMetasheetConfig};
use wes_sheets::utils::init_logging;

#[derive(Parser, Debug)]
#[clap(
    about = "Simple metadata sheet generator for the mutation calling portion of the WES pipeline"
)]
struct Args {
    /// Directory where the analysis ready BAM files are. Matched normals
    /// are expected under <BAM_DIR>/normals/
    #[clap(short = 'd', long, value_name = "PATH")]
    bam_dir: PathBuf,

    /// Batch name for the WES data being analyzed
    #[clap(short = 'b', long)]
    batch_name: String,

    /// Directory to publish the output metadata tsv sheet
    #[clap(short = 'o', long, default_value = "./", value_name = "PATH")]
    output_dir: PathBuf,

    /// Path to the sequencing metadata sheet (.xls/.xlsx/.csv/.tsv)
    #[clap(short = 'm', long, value_name = "PATH")]
    metadata: PathBuf,

    /// JSON file overriding the metadata sheet's column headers
    #[clap(long, value_name = "JSON")]
    columns: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let cfg = McMetasheetConfig {
        bam_dir: args.bam_dir,
        batch_name: args.batch_name,
        output_dir: args.output_dir,
        metadata: args.metadata,
        columns: ColumnNames::load(args.columns.as_deref())?,
    };
    mc_metasheet::run(&cfg)?;
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run(Args::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
