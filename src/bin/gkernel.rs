//! an executable computing a kernel matrix or sparse features between vertices of a labeled graph.
//! example usage:
//! gkernel -t 2 -g graph.txt -l labels.txt -p pos.txt -n neg.txt -k kernel.bin
//! gkernel -t 3 -g graph.txt -l labels.txt -p pos.txt -n neg.txt -S blosum.tsv -M 0.4 -A ACDEFGHIKLMNPQRSTVWY -k kernel.txt --format triangular
//! gkernel -t 5 -g graph.txt -l labels.txt -p pos.txt -n neg.txt -M 0.4 -E 2 -s features.svml -c classes.txt
//!
//! kernel types : 0 cumulative random walk, 1 random walk, 2 graphlet, 3 label substitutions,
//! 4 edge indels, 5 edit distance.

use anyhow::anyhow;
use clap::{arg, Arg, ArgMatches, Command};
use std::path::Path;
use std::str::FromStr;

use graphlet_kernel::io::dot::write_dot_neighbourhood;
use graphlet_kernel::prelude::*;

// value of an optional argument, default if absent
fn parse_value<T: FromStr>(matches: &ArgMatches, name: &str, default: T) -> anyhow::Result<T> {
    match matches.value_of(name) {
        Some(str) => match str.parse::<T>() {
            Ok(val) => Ok(val),
            _ => {
                log::error!("could not parse argument {} : {}", name, str);
                Err(anyhow!("could not parse argument {} : {}", name, str))
            }
        },
        None => Ok(default),
    }
} // end of parse_value

fn parse_sizes(matches: &ArgMatches) -> anyhow::Result<GraphletSizes> {
    match matches.value_of("sizes") {
        Some(str) => {
            let sizes = str
                .split(',')
                .map(|s| s.trim().parse::<usize>().map_err(|_| anyhow!("could not parse graphlet sizes {}", str)))
                .collect::<anyhow::Result<Vec<usize>>>()?;
            GraphletSizes::new(&sizes)
        }
        None => Ok(GraphletSizes::default()),
    }
} // end of parse_sizes

fn parse_params(matches: &ArgMatches) -> anyhow::Result<KernelParams> {
    log::debug!("in parse_params");
    let kernel_type = KernelType::try_from(parse_value::<usize>(matches, "type", 2)?)?;
    let normalize = matches.is_present("normalize");
    let label_fraction = parse_value::<f32>(matches, "mismatches", 0.)?;
    let edge_mismatches = parse_value::<usize>(matches, "edges", 0)?;
    let mut params = KernelParams::new(kernel_type, normalize, label_fraction, edge_mismatches)?;
    //
    let steps = parse_value::<usize>(matches, "steps", DEFAULT_STEPS)?;
    let restart = parse_value::<f64>(matches, "restart", DEFAULT_RESTART)?;
    let seed = parse_value::<u64>(matches, "seed", 0)?;
    params.set_random_walk(steps, restart, seed)?;
    params.set_similarity_threshold(parse_value::<f32>(matches, "threshold", params.get_similarity_threshold())?);
    params.set_graphlet_sizes(parse_sizes(matches)?);
    Ok(params)
} // end of parse_params

fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let params = parse_params(matches)?;
    log::info!("kernel parameters : {:?}", params);
    // graph
    let labels_file = matches.value_of("labels").ok_or_else(|| anyhow!("labels file required"))?;
    let graph_file = matches.value_of("graph").ok_or_else(|| anyhow!("graph file required"))?;
    let graph = SimpleGraph::read_graph(Path::new(labels_file), Path::new(graph_file))?;
    //
    if let Some(str) = matches.value_of("dot") {
        let root = str.parse::<usize>().map_err(|_| anyhow!("could not parse dot root {}", str))?;
        let bound = params.get_graphlet_sizes().max_size();
        write_dot_neighbourhood(&graph, root, bound, &mut std::io::stdout())?;
    }
    // examples
    let examples = read_examples(
        matches.value_of("positives").map(Path::new),
        matches.value_of("negatives").map(Path::new),
        graph.nb_nodes(),
    )?;
    log::info!("nb examples : {}", examples.len());
    if let Some(classes) = matches.value_of("classes") {
        write_labels(Path::new(classes), examples.get_labels())?;
    }
    //
    let kernel_output = matches.value_of("kernel");
    let sparse_output = matches.value_of("sparse");
    if kernel_output.is_none() && sparse_output.is_none() {
        log::error!("output file name not specified, use -k or -s");
        return Err(anyhow!("output file name not specified, use -k or -s"));
    }
    // alphabets and similarity
    let alphabet = match matches.value_of("alphabet") {
        Some(a) => LabelAlphabet::new(a, matches.value_of("root_alphabet").unwrap_or(a))?,
        None => LabelAlphabet::default(),
    };
    let similarity = match matches.value_of("similarity") {
        Some(f) => Some(read_similarity_matrix(Path::new(f), params.get_similarity_threshold())?),
        None => None,
    };
    let kernel_type = params.get_kernel_type();
    let kernel = GraphKernel::new(&graph, params, alphabet, similarity)?;
    //
    if let Some(sparse) = sparse_output {
        let features = kernel.feature_vectors(examples.get_vertices())?;
        write_sparse_svml(Path::new(sparse), &features, examples.get_labels())?;
    }
    if let Some(name) = kernel_output {
        let fmt = parse_value::<MatrixFormat>(matches, "format", MatrixFormat::Binary)?;
        let matrix = kernel.compute_matrix(examples.get_vertices())?;
        let output = Output::new(fmt, &Some(name.to_string()));
        dump_kernel_matrix(&matrix, kernel_type, &output)?;
    }
    Ok(())
} // end of run

pub fn main() {
    //
    let matches = Command::new("gkernel")
        .arg_required_else_help(true)
        .arg(Arg::new("type").short('t').long("type").takes_value(true).help(
            "kernel type : 0 cumulative random walk, 1 random walk, 2 graphlet, 3 label substitutions, 4 edge indels, 5 edit distance",
        ))
        .arg(Arg::new("graph").short('g').long("graph").takes_value(true).required(true).help("graph file, one adjacency list per line"))
        .arg(Arg::new("labels").short('l').long("labels").takes_value(true).required(true).help("labels file, one character per vertex"))
        .arg(Arg::new("positives").short('p').long("positives").takes_value(true).help("positive examples file"))
        .arg(Arg::new("negatives").short('n').long("negatives").takes_value(true).help("negative examples file"))
        .arg(Arg::new("normalize").short('N').long("normalize").help("normalize graphlet counts"))
        .arg(Arg::new("kernel").short('k').long("kernel").takes_value(true).help("kernel matrix output file"))
        .arg(Arg::new("sparse").short('s').long("sparse").takes_value(true).help("sparse features output file"))
        .arg(Arg::new("classes").short('c').long("classes").takes_value(true).help("class labels output file"))
        .arg(Arg::new("steps").short('I').long("steps").takes_value(true).help("random walk steps, default 100000"))
        .arg(Arg::new("restart").short('R').long("restart").takes_value(true).help("random walk restart probability, default 0.3"))
        .arg(Arg::new("similarity").short('S').long("similarity").takes_value(true).help("label similarity matrix"))
        .arg(Arg::new("mismatches").short('M').long("mismatches").takes_value(true).help("fraction of graphlet vertices with a substituted label"))
        .arg(Arg::new("edges").short('E').long("edges").takes_value(true).help("number of edge indels, 0, 1 or 2"))
        .arg(Arg::new("alphabet").short('A').long("alphabet").takes_value(true).help("substitutable labels, default amino acids"))
        .args(&[
            arg!(--root_alphabet <root_alphabet> "substitutable root labels, default is alphabet").required(false),
            arg!(--format <format> "kernel matrix format : binary, triangular, square or bson").required(false),
            arg!(--threshold <threshold> "minimal similarity of a substitution, default 0.5").required(false),
            arg!(--seed <seed> "random walk seed").required(false),
            arg!(--sizes <sizes> "comma separated graphlet sizes, default 2,3,4,5").required(false),
            arg!(--dot <root> "writes the neighbourhood of root in GraphViz format on stdout").required(false),
        ])
        .arg(Arg::new("verbose").short('v').long("verbose").help("verbose mode"))
        .get_matches();
    //
    let default_level = if matches.is_present("verbose") { "info" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).try_init();
    log::info!("logger initialized");
    //
    if let Err(e) = run(&matches) {
        log::error!("gkernel failed : {:?}", e);
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
} // end of main
