//! Loaders for the labeled graph and the examples.
//!
//! - labels file : the first line gives one character label per vertex.
//! - graph file : each line `i<TAB>j<TAB>k ...` lists the neighbours j, k ... of vertex i.
//!   Spaces are accepted around indices.
//! - examples files : the first tab separated token of each line is a vertex index.
//!   Vertices of the positive file get class +1, those of the negative file -1.

use anyhow::anyhow;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::ReaderBuilder;

use crate::graph::SimpleGraph;
use crate::graphlet::key::Label;

fn open_file(path: &Path) -> anyhow::Result<std::fs::File> {
    let fileres = OpenOptions::new().read(true).open(path);
    match fileres {
        Ok(file) => Ok(file),
        Err(e) => {
            log::error!("could not open file {:?} : {}", path.as_os_str(), e);
            Err(anyhow!("could not open file {:?} : {}", path.as_os_str(), e))
        }
    }
}

/// labels of vertices, first line of the file, trailing whitespace ignored
pub fn read_labels(path: &Path) -> anyhow::Result<Vec<Label>> {
    let file = open_file(path)?;
    let mut line = String::new();
    BufReader::new(file).read_line(&mut line)?;
    let labels: Vec<Label> = line.trim_end().bytes().collect();
    log::info!("read_labels : {} labels in {:?}", labels.len(), path.as_os_str());
    Ok(labels)
}

/// Neighbour lists of a graph with nb_nodes vertices. Indices must be below nb_nodes.
/// The result is neither symmetrized nor deduplicated, see [SimpleGraph::from_adjacency].
pub fn read_adjacency(path: &Path, nb_nodes: usize) -> anyhow::Result<Vec<Vec<usize>>> {
    let file = open_file(path)?;
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(false)
        .from_reader(file);
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nb_nodes];
    let mut nb_record = 0;
    for result in rdr.records() {
        let record = result?;
        nb_record += 1;
        let mut indices = Vec::<usize>::with_capacity(record.len());
        for field in record.iter() {
            for token in field.split_whitespace() {
                let idx = token.parse::<usize>().map_err(|e| {
                    log::error!("file {:?}, line {} : cannot parse {:?} : {}", path.as_os_str(), nb_record, token, e);
                    anyhow!("file {:?}, line {} : cannot parse {:?}", path.as_os_str(), nb_record, token)
                })?;
                if idx >= nb_nodes {
                    log::error!("file {:?}, line {} : vertex {} >= number of labels {}", path.as_os_str(), nb_record, idx, nb_nodes);
                    return Err(anyhow!(
                        "file {:?}, line {} : vertex {} >= number of labels {}",
                        path.as_os_str(),
                        nb_record,
                        idx,
                        nb_nodes
                    ));
                }
                indices.push(idx);
            }
        }
        if let Some((&i, neighbours)) = indices.split_first() {
            adjacency[i].extend_from_slice(neighbours);
        }
    }
    log::info!("read_adjacency : {} lines read in {:?}", nb_record, path.as_os_str());
    Ok(adjacency)
}

impl SimpleGraph {
    /// graph from a labels file and an adjacency file
    pub fn read_graph(labels_path: &Path, graph_path: &Path) -> anyhow::Result<SimpleGraph> {
        let labels = read_labels(labels_path)?;
        let adjacency = read_adjacency(graph_path, labels.len())?;
        let graph = SimpleGraph::from_adjacency(labels, adjacency)?;
        log::info!("graph loaded, nb nodes : {}, nb edges : {}", graph.nb_nodes(), graph.nb_edges());
        Ok(graph)
    }
} // end of impl SimpleGraph

/// Roots of the kernel and their class.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Examples {
    vertices: Vec<usize>,
    labels: Vec<i32>,
}

impl Examples {
    pub fn new() -> Self {
        Examples::default()
    }

    pub fn push(&mut self, vertex: usize, label: i32) {
        self.vertices.push(vertex);
        self.labels.push(label);
    }

    pub fn get_vertices(&self) -> &[usize] {
        &self.vertices
    }

    pub fn get_labels(&self) -> &[i32] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
} // end of impl Examples

// vertex ids of an examples file, None if the file cannot be opened
fn read_example_file(path: &Path, nb_nodes: usize) -> anyhow::Result<Option<Vec<usize>>> {
    let file = match OpenOptions::new().read(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("could not open examples file {:?} : {}", path.as_os_str(), e);
            return Ok(None);
        }
    };
    let mut vertices = Vec::<usize>::new();
    for (nb_line, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let token = match line.split('\t').next().map(|t| t.trim()) {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };
        let v = token.parse::<usize>().map_err(|e| {
            log::error!("examples file {:?}, line {} : cannot parse {:?} : {}", path.as_os_str(), nb_line + 1, token, e);
            anyhow!("examples file {:?}, line {} : cannot parse {:?}", path.as_os_str(), nb_line + 1, token)
        })?;
        if v >= nb_nodes {
            log::error!("examples file {:?} : vertex {} >= graph size {}", path.as_os_str(), v, nb_nodes);
            return Err(anyhow!("examples file {:?} : vertex {} >= graph size {}", path.as_os_str(), v, nb_nodes));
        }
        vertices.push(v);
    }
    Ok(Some(vertices))
}

/// Positive examples first, then negative ones. A missing file only gives a warning
/// but at least one example is required.
pub fn read_examples(positives: Option<&Path>, negatives: Option<&Path>, nb_nodes: usize) -> anyhow::Result<Examples> {
    let mut examples = Examples::new();
    for (path, label) in [(positives, 1), (negatives, -1)] {
        if let Some(path) = path {
            if let Some(vertices) = read_example_file(path, nb_nodes)? {
                log::info!("read {} examples with class {} in {:?}", vertices.len(), label, path.as_os_str());
                vertices.into_iter().for_each(|v| examples.push(v, label));
            }
        }
    }
    if examples.is_empty() {
        log::error!("no examples read");
        return Err(anyhow!("no examples read"));
    }
    Ok(examples)
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::io::Write;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn write_tmp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_graph() {
        log_init_test();
        let labels = write_tmp("graphio_labels.txt", "ABCA \nignored\n");
        let graph = write_tmp("graphio_graph.txt", "0\t1\t2\n1 \t2\t2\n3\t3\t0\n");
        let g = SimpleGraph::read_graph(&labels, &graph).unwrap();
        assert_eq!(g.nb_nodes(), 4);
        assert_eq!(g.get_labels(), b"ABCA");
        // self loop dropped, duplicates removed, symmetrized
        assert_eq!(g.nb_edges(), 4);
        assert_eq!(g.get_neighbours(0), &[1, 2, 3]);
        assert_eq!(g.get_neighbours(3), &[0]);
        assert!(g.has_edge(2, 1));
        //
        let bad = write_tmp("graphio_bad.txt", "0\t4\n");
        assert!(SimpleGraph::read_graph(&labels, &bad).is_err());
        assert!(read_labels(Path::new("/nonexistent/labels")).is_err());
    }

    #[test]
    fn load_examples() {
        log_init_test();
        let pos = write_tmp("graphio_pos.txt", "0\tfoo\n2\n\n");
        let neg = write_tmp("graphio_neg.txt", "1\tbar\n");
        let examples = read_examples(Some(&pos), Some(&neg), 4).unwrap();
        assert_eq!(examples.get_vertices(), &[0, 2, 1]);
        assert_eq!(examples.get_labels(), &[1, 1, -1]);
        // missing negatives is only a warning
        let missing = Path::new("/nonexistent/neg.txt");
        assert_eq!(read_examples(Some(&pos), Some(missing), 4).unwrap().len(), 2);
        assert!(read_examples(None, Some(missing), 4).is_err());
        assert!(read_examples(Some(&pos), None, 2).is_err());
    }
}
