use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::str::FromStr;

use serde::Serialize;

/// header of the benchmark CSV file
pub const CSV_HEADER:&str = "algorithm,graph_name,vertices,edges,colors_used,known_optimal,runtime_ms";

/** coloring algorithms available in the benchmark runner */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Welsh-Powell greedy
    WelshPowell,
    /// greedy DSATUR
    Dsatur,
    /// backtracking DSATUR (optimal)
    ExactSolver,
    /// TabuCol
    Tabu,
    /// simulated annealing
    SimulatedAnnealing,
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s:&str) -> Result<Self, Self::Err> {
        match s {
            "welsh_powell" => Ok(Algorithm::WelshPowell),
            "dsatur" => Ok(Algorithm::Dsatur),
            "exact_solver" => Ok(Algorithm::ExactSolver),
            "tabu" => Ok(Algorithm::Tabu),
            "simulated_annealing" => Ok(Algorithm::SimulatedAnnealing),
            _ => Err(format!("unknown algorithm: {}", s)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f:&mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::WelshPowell => "welsh_powell",
            Algorithm::Dsatur => "dsatur",
            Algorithm::ExactSolver => "exact_solver",
            Algorithm::Tabu => "tabu",
            Algorithm::SimulatedAnnealing => "simulated_annealing",
        };
        write!(f, "{}", name)
    }
}


/** one benchmark run */
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    /// algorithm name
    pub algorithm: String,
    /// graph identifier (file name by default)
    pub graph_name: String,
    /// number of vertices
    pub vertices: usize,
    /// number of edges
    pub edges: usize,
    /// number of colors of the returned coloring
    pub colors_used: usize,
    /// chromatic number, if known
    pub known_optimal: Option<usize>,
    /// running time of the algorithm (milliseconds)
    pub runtime_ms: f64,
}

/// CSV record of a result (runtime rounded to 3 decimals)
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    algorithm: &'a str,
    graph_name: &'a str,
    vertices: usize,
    edges: usize,
    colors_used: usize,
    known_optimal: Option<usize>,
    runtime_ms: String,
}

impl<'a> From<&'a BenchmarkResult> for CsvRow<'a> {
    fn from(result:&'a BenchmarkResult) -> Self {
        Self {
            algorithm: &result.algorithm,
            graph_name: &result.graph_name,
            vertices: result.vertices,
            edges: result.edges,
            colors_used: result.colors_used,
            known_optimal: result.known_optimal,
            runtime_ms: format!("{:.3}", result.runtime_ms),
        }
    }
}

/// appends a result to a CSV file (writes the header if the file is new or empty)
pub fn append_result_csv(filename:&str, result:&BenchmarkResult) -> io::Result<()> {
    let write_header = fs::metadata(filename).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(filename)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    wtr.serialize(CsvRow::from(result))?;
    wtr.flush()
}

/// exports a result as JSON
pub fn export_perf(filename:&str, result:&BenchmarkResult) -> io::Result<()> {
    let content = serde_json::to_string(result)?;
    fs::write(filename, content)
}
