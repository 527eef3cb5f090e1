// Copyright (c) 2018 10x Genomics, Inc. All rights reserved.

//! Utility methods.

use std::boxed::Box;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Error};
use env_logger::Env;
use flate2::read::MultiGzDecoder;

const GZ_BUF_SIZE: usize = 1 << 22;

/// Open a (possibly gzipped) file into a BufReader.
pub fn open_with_gz<P: AsRef<Path>>(p: P) -> Result<Box<dyn BufRead>, Error> {
    let r = File::open(p.as_ref()).with_context(|| format!("opening {:?}", p.as_ref()))?;

    if p.as_ref().extension().map_or(false, |ext| ext == "gz") {
        let gz = MultiGzDecoder::new(r);
        let buf_reader = BufReader::with_capacity(GZ_BUF_SIZE, gz);
        Ok(Box::new(buf_reader))
    } else {
        let buf_reader = BufReader::with_capacity(32 * 1024, r);
        Ok(Box::new(buf_reader))
    }
}

/// Create a tab-separated writer at `p` and write the `header` row, so
/// the file has its header even when no rows follow.
pub fn tsv_writer<P: AsRef<Path>>(
    p: P,
    header: &[&str],
) -> Result<csv::Writer<BufWriter<File>>, Error> {
    let f = File::create(p.as_ref()).with_context(|| format!("creating {:?}", p.as_ref()))?;
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(BufWriter::new(f));
    wtr.write_record(header)
        .with_context(|| format!("writing header to {:?}", p.as_ref()))?;
    Ok(wtr)
}

/// The final path component as an owned string, lossily converted.
pub fn file_name_string(p: impl AsRef<Path>) -> Option<String> {
    p.as_ref()
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
