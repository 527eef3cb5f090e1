// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Convert a CNVkit capture-target reference into a BED file of targets.

use clap::Parser;
use log::error;
use std::path::PathBuf;
use wes_sheets::bed::{make_bed, DEFAULT_BED_OUTPUT};
use wes_sheets::utils::init_logging;

#[derive(Parser, Debug)]
#[clap(about = "Generate a BED file of exome capture targets from a CNVkit reference")]
struct Args {
    /// CNVkit target reference (.cnn, optionally gzipped)
    #[clap(short = 'r', long, value_name = "PATH")]
    reference: PathBuf,

    /// Output BED file
    #[clap(short = 'o', long, default_value = DEFAULT_BED_OUTPUT, value_name = "PATH")]
    output: PathBuf,
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = make_bed(&args.reference, &args.output) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}
