//! Benchmark runner: colors a DIMACS graph and records the results

#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unsafe_code)]
#![warn(unused_extern_crates)]
#![warn(variant_size_differences)]

#[macro_use]
extern crate clap;
use clap::{App, ArgMatches};

use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use dogs_chromatic::color::{ColoringInstance, CheckerResult, Coloring, Graph, checker, to_partition};
use dogs_chromatic::dimacs;
use dogs_chromatic::report::{ConsoleProgress, NoSnapshot, SnapshotSink, SnapshotWriter};
use dogs_chromatic::search::dsatur_backtrack::{ExactConfig, exact_coloring_with};
use dogs_chromatic::search::greedy_dsatur::greedy_dsatur_with_snapshots;
use dogs_chromatic::search::simulated_annealing::{AnnealingConfig, AnnealingMode, simulated_annealing_with_snapshots};
use dogs_chromatic::search::tabucol::{TabuColConfig, tabucol_with_snapshots};
use dogs_chromatic::search::welsh_powell::welsh_powell_with_snapshots;
use dogs_chromatic::util::{Algorithm, BenchmarkResult, append_result_csv, export_perf};


/// parses an optional argument
fn parse_arg<T:FromStr>(main_args:&ArgMatches, name:&str) -> Result<Option<T>, String>
where T::Err: Display {
    match main_args.value_of(name) {
        None => Ok(None),
        Some(s) => s.parse::<T>()
            .map(Some)
            .map_err(|e| format!("invalid value for --{}: {} ({})", name, s, e)),
    }
}

/// algorithm parameters read from the command line
#[derive(Debug)]
enum Parameters {
    Greedy,
    Exact(ExactConfig),
    Tabu(TabuColConfig),
    Annealing(AnnealingConfig),
}

fn read_parameters(main_args:&ArgMatches, algorithm:Algorithm, inst:&Graph) -> Result<Parameters, String> {
    Ok(match algorithm {
        Algorithm::WelshPowell | Algorithm::Dsatur => Parameters::Greedy,
        Algorithm::ExactSolver => {
            let mut config = ExactConfig::default();
            if let Some(t) = parse_arg::<f64>(main_args, "progress-interval")? {
                config = config.with_progress_interval(t);
            }
            Parameters::Exact(config)
        },
        Algorithm::Tabu => {
            let mut config = TabuColConfig::for_instance(inst.nb_vertices());
            if let Some(nb) = parse_arg::<usize>(main_args, "tabu-iterations")? {
                config = config.with_max_iterations(nb);
            }
            if let Some(tenure) = parse_arg::<usize>(main_args, "tabu-tenure")? {
                config = config.with_tabu_tenure(tenure);
            }
            Parameters::Tabu(config)
        },
        Algorithm::SimulatedAnnealing => {
            let mode = parse_arg::<AnnealingMode>(main_args, "sa-mode")?
                .unwrap_or(AnnealingMode::Default);
            let mut config = AnnealingConfig::from_mode(mode);
            if let Some(mult) = parse_arg::<usize>(main_args, "sa-iter-mult")? {
                config = config.with_iteration_multiplier(mult);
            }
            if let Some(t) = parse_arg::<f64>(main_args, "sa-initial-temp")? {
                config = config.with_initial_temperature(t);
            }
            Parameters::Annealing(config)
        },
    })
}

fn solve(
    algorithm:Algorithm,
    params:&Parameters,
    inst:&Graph,
    rng:&mut StdRng,
    snapshots:&mut dyn SnapshotSink,
) -> Coloring {
    match params {
        Parameters::Greedy => match algorithm {
            Algorithm::WelshPowell => welsh_powell_with_snapshots(inst, snapshots),
            _ => greedy_dsatur_with_snapshots(inst, snapshots),
        },
        Parameters::Exact(config) => exact_coloring_with(inst, config, &mut ConsoleProgress, snapshots),
        Parameters::Tabu(config) => tabucol_with_snapshots(inst, config, rng, snapshots),
        Parameters::Annealing(config) => simulated_annealing_with_snapshots(inst, config, rng, snapshots),
    }
}

fn run(main_args:&ArgMatches) -> Result<(), Box<dyn Error>> {
    println!("=========================================================");
    let algorithm = parse_arg::<Algorithm>(main_args, "algorithm")?
        .ok_or("missing algorithm")?;
    let inst_filename = main_args.value_of("input").ok_or("missing input file")?;
    let graph_name = match main_args.value_of("graph-name") {
        Some(name) => name.to_string(),
        None => Path::new(inst_filename).file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| inst_filename.to_string()),
    };
    let known_optimal = parse_arg::<usize>(main_args, "known-optimal")?;
    let mut rng = match parse_arg::<u64>(main_args, "seed")? {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    println!("reading instance: {}...", inst_filename);
    let inst = dimacs::read_from_file(inst_filename)?;
    inst.display_statistics();
    let params = read_parameters(main_args, algorithm, &inst)?;
    println!("algorithm: {} ({:?})", algorithm, params);
    println!("=======================");

    // snapshots
    let mut snapshot_writer = match main_args.value_of("snapshots") {
        None => None,
        Some(filename) => {
            println!("\t printing snapshots in: {}", filename);
            Some(SnapshotWriter::new(BufWriter::new(File::create(filename)?)))
        }
    };
    let mut no_snapshot = NoSnapshot;
    let snapshots:&mut dyn SnapshotSink = match snapshot_writer.as_mut() {
        Some(writer) => writer,
        None => &mut no_snapshot,
    };

    // solve it
    let start = Instant::now();
    let coloring = solve(algorithm, &params, &inst, &mut rng, snapshots);
    let runtime_ms = start.elapsed().as_secs_f64() * 1000.;
    if let Some(writer) = snapshot_writer {
        writer.finish()?;
    }

    // check it
    let colors_used = match checker(&inst, &coloring) {
        CheckerResult::Ok(k) => k,
        CheckerResult::WrongLength { expected, found } => {
            return Err(format!("coloring of length {} for {} vertices", found, expected).into());
        },
        CheckerResult::Conflict(u, v) => {
            return Err(format!("invalid coloring: vertices {} and {} share color {}", u, v, coloring[u]).into());
        },
    };
    println!("{} took {:.3} seconds. Nb colors: {}", algorithm, runtime_ms / 1000., colors_used);
    if let Some(k) = known_optimal {
        println!("known optimal: {} (gap: {})", k, colors_used as i64 - k as i64);
    }

    // export results
    if let Some(filename) = main_args.value_of("output") {
        println!("\t printing solution in: {}", filename);
        dimacs::write_solution(filename, &to_partition(&coloring))?;
    }
    let result = BenchmarkResult {
        algorithm: algorithm.to_string(),
        graph_name,
        vertices: inst.nb_vertices(),
        edges: inst.nb_edges(),
        colors_used,
        known_optimal,
        runtime_ms,
    };
    if let Some(filename) = main_args.value_of("results") {
        println!("\t appending results to: {}", filename);
        append_result_csv(filename, &result)?;
    }
    if let Some(filename) = main_args.value_of("perf") {
        println!("\t printing perfs in: {}", filename);
        export_perf(filename, &result)?;
    }
    Ok(())
}


/**
reads a DIMACS instance, colors it with the algorithm given as a parameter, checks the coloring
and exports the results. Exits with status 1 on failure.
*/
pub fn main() {
    // parse arguments
    let yaml = load_yaml!("main_args.yml");
    let main_args = App::from_yaml(yaml).get_matches();
    if let Err(e) = run(&main_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
