//! bson dump and reload of a kernel matrix
//!
//! The file is a sequence of bson documents (a document must stay below 16Mb):
//! 1. A header document with key "header", see [KernelBsonHeader]:
//!    - a version index
//!    - the type name of values (f32)
//!    - the kernel type name
//!    - the number of rows
//! 2. One document per row of the lower triangle, the key being the row index,
//!    row i holding the i+1 values of columns 0..=i.

use anyhow::anyhow;

use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use bson::{bson, Bson, Document};
use num::cast::FromPrimitive;
use serde::{Deserialize, Serialize};

use crate::kernel::matrix::KernelMatrix;
use crate::kernel::params::KernelType;

/// This structure defines the header of the bson document
#[derive(Debug, Serialize, Deserialize)]
pub struct KernelBsonHeader {
    /// version of dump format
    pub version: i64,
    /// type of values, f32
    pub type_name: String,
    /// name of the kernel computed
    pub kernel: String,
    /// number of rows
    pub nbdata: i64,
} // end of KernelBsonHeader

/// dump a kernel matrix in bson format in file path
pub fn bson_dump(matrix: &KernelMatrix, kernel_type: KernelType, path: &Path) -> anyhow::Result<()> {
    log::info!("entering bson_dump, file : {}", path.display());
    let fileres = OpenOptions::new().write(true).create(true).truncate(true).open(path);
    let file = match fileres {
        Ok(file) => file,
        Err(_) => return Err(anyhow!("could not open file : {}", path.display())),
    };
    let mut bufwriter = BufWriter::new(file);
    let mut doc = Document::new();
    //
    let nbdata: i64 = FromPrimitive::from_usize(matrix.get_size()).ok_or_else(|| anyhow!("matrix too large"))?;
    let bson_header = bson!({
        "version": 1_i64,
        "type_name": "f32",
        "kernel": kernel_type.get_name(),
        "nbdata": nbdata
    });
    doc.insert("header", bson_header);
    if let Err(e) = doc.to_writer(&mut bufwriter) {
        log::error!("dump header bson in {} failed", path.display());
        return Err(anyhow!("dump of bson failed: {}", e));
    }
    // now loop on rows
    for i in 0..matrix.get_size() {
        let mut doc = Document::new();
        let data: Vec<Bson> = matrix.get_row(i).iter().map(|x| Bson::Double(*x as f64)).collect();
        doc.insert(i.to_string(), data);
        if let Err(e) = doc.to_writer(&mut bufwriter) {
            log::error!("bson dump error in row {i}");
            return Err(anyhow!("bson dump error for row {i} {}", e));
        }
    }
    bufwriter.flush()?;
    log::info!("bson dump in file {} finished", path.display());
    Ok(())
} // end of bson_dump

/// header and matrix reloaded from a dump
pub fn bson_load(path: &Path) -> anyhow::Result<(KernelBsonHeader, KernelMatrix)> {
    log::info!("entering bson_load, file name : {:?}", path);
    let fileres = OpenOptions::new().read(true).open(path);
    let file = match fileres {
        Ok(file) => file,
        Err(e) => {
            log::error!("reload of bson dump failed");
            return Err(anyhow!("reload failed: {}", e));
        }
    };
    let mut bufreader = BufReader::new(file);
    // load header
    let doc = Document::from_reader(&mut bufreader).map_err(|e| {
        log::error!("could not load document from file {}", path.display());
        anyhow!(e)
    })?;
    let bson_header = match doc.get("header") {
        Some(h) => h.clone(),
        None => {
            log::error!("could not load header from file {}", path.display());
            return Err(anyhow!("could not find header in document"));
        }
    };
    let header: KernelBsonHeader = bson::from_bson(bson_header)?;
    log::info!("header : {:?}", header);
    if header.version != 1 {
        log::error!("header format version : {}", header.version);
        return Err(anyhow!("format version error, inconsistent with header"));
    }
    let nb_data: usize = FromPrimitive::from_i64(header.nbdata).ok_or_else(|| anyhow!("bad number of rows {}", header.nbdata))?;
    let mut rows = Vec::<Vec<f32>>::with_capacity(nb_data);
    for i in 0..nb_data {
        let doc = Document::from_reader(&mut bufreader).map_err(|e| {
            log::error!("could not load row {} from file {}", i, path.display());
            anyhow!(e)
        })?;
        let array = doc.get_array(i.to_string())?;
        let row = array
            .iter()
            .map(|b| b.as_f64().map(|v| v as f32).ok_or_else(|| anyhow!("row {} : not a double {:?}", i, b)))
            .collect::<anyhow::Result<Vec<f32>>>()?;
        rows.push(row);
    }
    log::info!("bson_load : {} rows reloaded", nb_data);
    Ok((header, KernelMatrix::from_rows(rows)?))
} // end of bson_load
