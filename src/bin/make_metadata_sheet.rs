// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Simple metadata sheet generator for the WES pipeline.

use anyhow::Result;
use clap::Parser;
use log::error;
use std::path::PathBuf;
use wes_sheets::lab_metadata::ColumnNames;
use wes_sheets::metadata_sheet::{
    self, MetadataSheetConfig, DEFAULT_PLATFORM, DEFAULT_SEQUENCING_CENTER,
};
use wes_sheets::utils::init_logging;

#[derive(Parser, Debug)]
#[clap(about = "Simple metadata sheet generator for WES pipeline")]
struct Args {
    /// Directory where the FASTQ data is
    #[clap(short = 'f', long, value_name = "PATH")]
    fastq_directory: PathBuf,

    /// Batch number for the WES data being analyzed
    #[clap(short = 'b', long)]
    batch_number: u32,

    /// Sequencing platform used to generate the WES data
    #[clap(short = 'p', long, default_value = DEFAULT_PLATFORM)]
    platform: String,

    /// Sequencing center where the WES data was generated
    #[clap(short = 's', long, default_value = DEFAULT_SEQUENCING_CENTER)]
    sequencing_center: String,

    /// Path to the sequencing metadata sheet (.xls/.xlsx/.csv/.tsv)
    #[clap(short = 'm', long, value_name = "PATH")]
    metadata: PathBuf,

    /// Where to write the metadata sheet
    #[clap(short = 'o', long, default_value = "./", value_name = "PATH")]
    output_dir: PathBuf,

    /// JSON file overriding the metadata sheet's column headers
    #[clap(long, value_name = "JSON")]
    columns: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let cfg = MetadataSheetConfig {
        fastq_dir: args.fastq_directory,
        batch_number: args.batch_number,
        platform: args.platform,
        sequencing_center: args.sequencing_center,
        metadata: args.metadata,
        output_dir: args.output_dir,
        columns: ColumnNames::load(args.columns.as_deref())?,
    };
    metadata_sheet::run(&cfg)?;
    Ok(())
}

fn main() {
    init_logging();
    if let Err(err) = run(Args::parse()) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
