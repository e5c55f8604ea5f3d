//! To describe dump of a kernel matrix
//!
//! - Binary : number of rows as u32, then the lower triangle row by row as f32, all little endian.
//! - Triangular : text, lower triangle, each value followed by a tab, one row per line.
//! - Square : text, full symmetric matrix, values separated by tabs.
//! - Bson : see [bson](super::bson).

use anyhow::anyhow;
use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use super::bson::bson_dump;
use crate::kernel::matrix::KernelMatrix;
use crate::kernel::params::KernelType;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixFormat {
    Binary,
    Triangular,
    Square,
    Bson,
}

impl FromStr for MatrixFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" => Ok(MatrixFormat::Binary),
            "triangular" | "tri" => Ok(MatrixFormat::Triangular),
            "square" => Ok(MatrixFormat::Square),
            "bson" => Ok(MatrixFormat::Bson),
            _ => Err(anyhow!("unknown matrix format {}, expecting binary, triangular, square or bson", s)),
        }
    }
}

pub struct Output {
    /// describe output format
    fmt: MatrixFormat,
    /// name of output file
    output_name: String,
}

impl Output {
    /// if output_name is None, default output_name will be "kernel" with an extension depending on format
    pub fn new(fmt: MatrixFormat, output_name: &Option<String>) -> Self {
        let output_name = match output_name {
            Some(name) => name.clone(),
            None => match fmt {
                MatrixFormat::Binary => String::from("kernel.bin"),
                MatrixFormat::Bson => String::from("kernel.bson"),
                _ => String::from("kernel.txt"),
            },
        };
        Output { fmt, output_name }
    }

    /// get ouput format
    pub fn get_fmt(&self) -> MatrixFormat {
        self.fmt
    }

    /// get output_name
    pub fn get_output_name(&self) -> &String {
        &self.output_name
    }
} // end of Output

impl Default for Output {
    fn default() -> Self {
        Output { fmt: MatrixFormat::Binary, output_name: String::from("kernel.bin") }
    }
}

fn create_file(path: &Path) -> anyhow::Result<BufWriter<std::fs::File>> {
    let fileres = OpenOptions::new().write(true).create(true).truncate(true).open(path);
    match fileres {
        Ok(file) => Ok(BufWriter::new(file)),
        Err(e) => {
            log::error!("could not open file {} : {}", path.display(), e);
            Err(anyhow!("could not open file : {}", path.display()))
        }
    }
}

/// size as u32 then lower triangle as f32, little endian
pub fn write_binary<W: Write>(matrix: &KernelMatrix, writer: &mut W) -> anyhow::Result<()> {
    let size = u32::try_from(matrix.get_size())?;
    writer.write_all(&size.to_le_bytes())?;
    for v in matrix.get_values() {
        writer.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// reload of the binary format
pub fn read_binary<R: Read>(reader: &mut R) -> anyhow::Result<KernelMatrix> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    let size = u32::from_le_bytes(buf) as usize;
    let mut rows = Vec::<Vec<f32>>::with_capacity(size);
    for i in 0..size {
        let mut row = Vec::<f32>::with_capacity(i + 1);
        for _ in 0..=i {
            reader.read_exact(&mut buf)?;
            row.push(f32::from_le_bytes(buf));
        }
        rows.push(row);
    }
    KernelMatrix::from_rows(rows)
}

/// lower triangle, a tab after each value
pub fn write_triangular<W: Write>(matrix: &KernelMatrix, writer: &mut W) -> anyhow::Result<()> {
    for i in 0..matrix.get_size() {
        for v in matrix.get_row(i) {
            write!(writer, "{}\t", v)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// full matrix, tab separated
pub fn write_square<W: Write>(matrix: &KernelMatrix, writer: &mut W) -> anyhow::Result<()> {
    let size = matrix.get_size();
    for i in 0..size {
        let row: Vec<String> = (0..size).map(|j| matrix.get(i, j).to_string()).collect();
        writeln!(writer, "{}", row.join("\t"))?;
    }
    Ok(())
}

/// dumps matrix in the file and format described by output
pub fn dump_kernel_matrix(matrix: &KernelMatrix, kernel_type: KernelType, output: &Output) -> anyhow::Result<()> {
    let path = Path::new(output.get_output_name());
    log::info!("dumping kernel matrix of size {} in {} as {:?}", matrix.get_size(), path.display(), output.get_fmt());
    if output.get_fmt() == MatrixFormat::Bson {
        return bson_dump(matrix, kernel_type, path);
    }
    let mut bufwriter = create_file(path)?;
    match output.get_fmt() {
        MatrixFormat::Binary => write_binary(matrix, &mut bufwriter)?,
        MatrixFormat::Triangular => write_triangular(matrix, &mut bufwriter)?,
        _ => write_square(matrix, &mut bufwriter)?,
    }
    bufwriter.flush()?;
    log::info!("kernel matrix dump in file {} finished", path.display());
    Ok(())
}

/// reloads a binary dump
pub fn load_binary(path: &Path) -> anyhow::Result<KernelMatrix> {
    let file = OpenOptions::new().read(true).open(path).map_err(|e| {
        log::error!("could not open file {} : {}", path.display(), e);
        anyhow!("could not open file : {}", path.display())
    })?;
    read_binary(&mut BufReader::new(file))
}
