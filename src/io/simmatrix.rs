//! Reading of a label similarity matrix.
//!
//! The first line gives the column labels, either as a single word (one label per character)
//! or as tab separated tokens. Each following line is `row_label<TAB>v1<TAB>v2 ...`,
//! vi being the similarity of (row_label, column i).

use anyhow::anyhow;
use std::fs::OpenOptions;
use std::path::Path;

use csv::ReaderBuilder;

use crate::graphlet::key::Label;
use crate::mismatch::similarity::SimilarityTable;

pub fn read_similarity_matrix(path: &Path, threshold: f32) -> anyhow::Result<SimilarityTable> {
    log::info!("reading similarity matrix {:?}", path.as_os_str());
    let file = OpenOptions::new().read(true).open(path).map_err(|e| {
        log::error!("could not open similarity matrix {:?} : {}", path.as_os_str(), e);
        anyhow!("could not open similarity matrix {:?} : {}", path.as_os_str(), e)
    })?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .from_reader(file);
    let mut records = rdr.records();
    let header = match records.next() {
        Some(record) => record?,
        None => {
            log::error!("similarity matrix {:?} is empty", path.as_os_str());
            return Err(anyhow!("similarity matrix {:?} is empty", path.as_os_str()));
        }
    };
    let fields: Vec<&str> = header.iter().map(|f| f.trim()).filter(|f| !f.is_empty()).collect();
    let columns: Vec<Label> = if fields.len() == 1 {
        fields[0].bytes().collect()
    } else {
        fields.iter().filter_map(|f| f.bytes().next()).collect()
    };
    //
    let mut table = SimilarityTable::new(threshold);
    for (nb_line, result) in records.enumerate() {
        let record = result?;
        let row = match record.get(0).and_then(|f| f.trim().bytes().next()) {
            Some(r) => r,
            None => continue,
        };
        if record.len() < columns.len() + 1 {
            log::error!("similarity matrix {:?}, line {} : {} values for {} columns", path.as_os_str(), nb_line + 2, record.len() - 1, columns.len());
            return Err(anyhow!("similarity matrix {:?}, line {} : missing values", path.as_os_str(), nb_line + 2));
        }
        for (i, &col) in columns.iter().enumerate() {
            let field = record.get(i + 1).unwrap_or("").trim();
            let v = field.parse::<f32>().map_err(|e| {
                log::error!("similarity matrix {:?}, line {} : cannot parse {:?} : {}", path.as_os_str(), nb_line + 2, field, e);
                anyhow!("similarity matrix {:?}, line {} : cannot parse {:?}", path.as_os_str(), nb_line + 2, field)
            })?;
            table.insert(row, col, v);
        }
    }
    log::info!("similarity matrix : {} columns, {} pairs", columns.len(), table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn read_both_header_styles() {
        log_init_test();
        let path = std::env::temp_dir().join("simmatrix_word.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"ABc\na\t1\t0.6\t0.1\nB\t0.7\t1\t0.2\nA\t0\t0\t0\n").unwrap();
        drop(f);
        let table = read_similarity_matrix(&path, 0.5).unwrap();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(b'A', b'B'), Some(0.6));
        assert_eq!(table.get(b'b', b'a'), Some(0.7));
        // first occurrence wins
        assert_eq!(table.get(b'A', b'A'), Some(1.));
        assert_eq!(table.get(b'A', b'C'), Some(0.1));
        assert_eq!(table.get(b'C', b'A'), None);
        //
        let path = std::env::temp_dir().join("simmatrix_tabs.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"\tA\tB\nA\t1\t0.3\nB\t0.3\t1\n").unwrap();
        drop(f);
        let table = read_similarity_matrix(&path, 0.5).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(b'B', b'A'), Some(0.3));
        assert!(!table.accepts(table.get(b'B', b'A').unwrap()));
        //
        let path = std::env::temp_dir().join("simmatrix_short.tsv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"AB\nA\t1\n").unwrap();
        drop(f);
        assert!(read_similarity_matrix(&path, 0.5).is_err());
    }
}
