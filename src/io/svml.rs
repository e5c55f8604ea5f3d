//! Sparse features in SVM light format and class labels.
//!
//! Each example gives a line `<class> <fid>:<value> ... #<example index>`.

use anyhow::anyhow;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::kernel::features::FeatureVector;

fn create_file(path: &Path) -> anyhow::Result<BufWriter<std::fs::File>> {
    match OpenOptions::new().write(true).create(true).truncate(true).open(path) {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(e) => {
            log::error!("could not open file {} : {}", path.display(), e);
            Err(anyhow!("could not open file : {}", path.display()))
        }
    }
}

pub fn write_svml<W: Write>(features: &[FeatureVector], labels: &[i32], writer: &mut W) -> anyhow::Result<()> {
    if features.len() != labels.len() {
        return Err(anyhow!("{} feature vectors for {} labels", features.len(), labels.len()));
    }
    for (i, (f, l)) in features.iter().zip(labels.iter()).enumerate() {
        write!(writer, "{}", l)?;
        for (fid, v) in f {
            write!(writer, " {}:{}", fid, v)?;
        }
        writeln!(writer, " #{}", i)?;
    }
    Ok(())
}

/// feature vectors of examples with their class
pub fn write_sparse_svml(path: &Path, features: &[FeatureVector], labels: &[i32]) -> anyhow::Result<()> {
    log::info!("writing {} feature vectors in {}", features.len(), path.display());
    let mut bufwriter = create_file(path)?;
    write_svml(features, labels, &mut bufwriter)?;
    bufwriter.flush()?;
    Ok(())
}

/// one class label per line
pub fn write_labels(path: &Path, labels: &[i32]) -> anyhow::Result<()> {
    let mut bufwriter = create_file(path)?;
    for l in labels {
        writeln!(bufwriter, "{}", l)?;
    }
    bufwriter.flush()?;
    let nb_pos = labels.iter().filter(|l| **l > 0).count();
    log::info!("labels written in {}, positives : {}, negatives : {}", path.display(), nb_pos, labels.len() - nb_pos);
    Ok(())
}
