use clap::{Parser, ValueEnum};
use log::info;

use pomset_rs::memory::label::{
    acquire_load_label, none_load_label, none_store_label, release_store_label, Address,
};
use pomset_rs::memory::{if_then, DataRaceDetector, SymbolicProgram};
use pomset_rs::order::{OrderModel, PartialOrderModel, TotalOrderModel};
use pomset_rs::refinement::{PartialStringChecker, Refinement};
use pomset_rs::smt::bdd::BddSolver;
use pomset_rs::smt::z3::{SolverConfig, Z3Solver};
use pomset_rs::smt::Solver;
use pomset_rs::PartialString;

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Backend {
    /// External z3 process.
    Z3,
    /// Boolean abstraction, answers "unknown" whenever arithmetic matters.
    Bdd,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Solver backend.
    #[arg(long, value_enum, default_value = "z3")]
    backend: Backend,

    /// Path to the z3 binary (default: auto-detect).
    #[arg(long, value_name = "PATH")]
    z3: Option<std::path::PathBuf>,

    /// Solver timeout in milliseconds (0 = none).
    #[arg(long, value_name = "INT", default_value = "0")]
    timeout: u64,

    /// Order real-valued timestamps instead of an uninterpreted relation.
    #[arg(long)]
    total_order: bool,
}

const A: Address = 0;
const B: Address = 1;

fn init() -> SymbolicProgram {
    let a = SymbolicProgram::from(release_store_label(A, 0));
    let b = SymbolicProgram::from(release_store_label(B, 0));
    &a | &b
}

/// `[a]_none := 1; [b]_release := 1`
fn producer() -> SymbolicProgram {
    SymbolicProgram::from(none_store_label(A, 1)).sequential(&SymbolicProgram::from(release_store_label(B, 1)))
}

fn scenarios() -> Vec<(&'static str, SymbolicProgram)> {
    let load_a = SymbolicProgram::from(none_load_label(A));

    // r0 := [b]_acquire; r1 := [a]_none
    let consumer = SymbolicProgram::from(acquire_load_label(B)).sequential(&load_a);
    // r0 := [b]_acquire; if (r0 == 1) then r1 := [a]_none
    let branch = if_then(B, 1, &load_a);
    // r0 := [b]_acquire; if (r0 == 0) then r1 := [a]_none
    let flipped = if_then(B, 0, &load_a);

    vec![
        ("message passing", init().sequential(&(&producer() | &consumer))),
        ("message passing without init", &producer() | &consumer),
        ("message passing with branch", init().sequential(&(&producer() | &branch))),
        ("message passing with flipped branch", init().sequential(&(&producer() | &flipped))),
    ]
}

fn run<S: Solver, M: OrderModel>(mut drd: DataRaceDetector<S, M>, mut refinement: Refinement<S>) {
    for (name, program) in scenarios() {
        match drd.is_racy(&program) {
            Ok(racy) => info!("{}: {}", name, if racy { "racy" } else { "race-free" }),
            Err(e) => info!("{}: {}", name, e),
        }
    }

    let x = PartialString::from(u32::from(b'x'));
    let y = PartialString::from(u32::from(b'y'));
    let p = x.sequential(&y);
    let q = &x | &y;
    for (lhs, rhs) in [(&p, &q), (&q, &p)] {
        match refinement.check(lhs, rhs) {
            Ok(refines) => info!("{} <= {}: {}", lhs, rhs, refines),
            Err(e) => info!("{} <= {}: {}", lhs, rhs, e),
        }
    }
    info!("refinement stats: {:?}", refinement.stats());
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    info!("args = {:?}", args);

    match args.backend {
        Backend::Z3 => {
            let config = match &args.z3 {
                Some(path) => SolverConfig::new(path),
                None => SolverConfig::auto_detect()?,
            }
            .with_timeout_ms(args.timeout);
            info!("using {}", config.z3_path.display());

            let refinement = Refinement::new(Z3Solver::new(config.clone()));
            if args.total_order {
                run(DataRaceDetector::new(Z3Solver::new(config)), refinement);
            } else {
                let drd = DataRaceDetector::with_model(Z3Solver::new(config), PartialOrderModel::default());
                run(drd, refinement);
            }
        }
        Backend::Bdd => {
            let refinement = Refinement::new(BddSolver::new());
            if args.total_order {
                let drd = DataRaceDetector::with_model(BddSolver::new(), TotalOrderModel::default());
                run(drd, refinement);
            } else {
                let drd = DataRaceDetector::with_model(BddSolver::new(), PartialOrderModel::default());
                run(drd, refinement);
            }
        }
    }

    Ok(())
}
