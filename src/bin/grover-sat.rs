//! Command-line front end: reads a DIMACS file, runs the search and prints
//! the decoded assignment.

use clap::Parser;
use grover_sat::decoder::LabelMap;
use grover_sat::{decode, dimacs, IterationPolicy, SearchConfig, Searcher};
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "grover-sat", about = "Grover search for a satisfying CNF assignment")]
struct Args {
    /// DIMACS CNF file
    input: PathBuf,

    /// Number of independent samples
    #[arg(short, long, default_value_t = 2048)]
    shots: usize,

    /// Sampling seed
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with a `SearchConfig`; command-line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Largest register the simulator may allocate
    #[arg(long)]
    max_qubits: Option<usize>,

    /// Fixed amplification round count instead of the estimated one
    #[arg(long)]
    iterations: Option<usize>,

    /// Variable labels, e.g. `1=Supplier_A,2=Supplier_B`
    #[arg(long, value_delimiter = ',')]
    labels: Vec<String>,

    /// Print the compiled oracle and diffuser
    #[arg(long)]
    draw: bool,

    /// Print the parsed formula back in DIMACS form
    #[arg(long)]
    emit_dimacs: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_labels(raw: &[String]) -> Result<LabelMap, Box<dyn std::error::Error>> {
    let mut labels = LabelMap::new();
    for entry in raw {
        let (var, label) = entry
            .split_once('=')
            .ok_or_else(|| format!("label `{}` must look like <index>=<name>", entry))?;
        labels.insert(var.trim().parse()?, label.trim().to_string());
    }
    Ok(labels)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config: SearchConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(max_qubits) = args.max_qubits {
        config.max_qubits = max_qubits;
    }
    if let Some(r) = args.iterations {
        config.iterations = IterationPolicy::Fixed(r);
    }

    let formula = dimacs::parse(&std::fs::read_to_string(&args.input)?)?;
    let labels = parse_labels(&args.labels)?;
    info!("loaded {} from {}", formula, args.input.display());

    if args.emit_dimacs {
        print!("{}", dimacs::write(&formula));
    }

    let searcher = Searcher::new(config);
    if args.draw {
        let compiled = searcher.compile(&formula)?;
        println!("Oracle:\n{}", compiled.oracle);
        println!("Diffuser:\n{}", compiled.diffuser);
    }

    let counts = searcher.search(&formula, args.shots)?;
    let report = decode(&counts, &formula, Some(&labels))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", counts);
        print!("{}", report);
    }
    Ok(())
}
