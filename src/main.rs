use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use enumsynth::ir::BoundsPolicy;
use enumsynth::search::{
    EnumerativeSearch, OperatorRegistry, OrderingSource, Priors, SearchAlgorithm, SearchConfig,
    cutoff_from_arg,
};
use enumsynth::validation::IoSet;

// --- Command Line Arguments ---

#[derive(Parser)]
#[command(name = "enumsynth")]
#[command(about = "enumsynth - Enumerative program synthesis from input/output examples")]
#[command(version)]
#[command(subcommand_required = true)]
#[command(arg_required_else_help = true)]
struct Args {
    /// Enable verbose output (debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Registry and ordering options shared by every subcommand
#[derive(clap::Args, Clone)]
struct RegistryArgs {
    /// Operator ordering: none, prior, predictions, random:<n>, shuffle:<seed>
    #[arg(long, default_value = "prior")]
    ordering: OrderingSource,
    /// Keep only the top N ranked operators (-1 keeps all)
    #[arg(
        long,
        default_value_t = -1,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..)
    )]
    cutoff: i64,
    /// Out-of-range `access` yields -1000000 instead of failing
    #[arg(long)]
    access_sentinel: bool,
    /// Include the scalar Int -> Int operations
    #[arg(long)]
    with_int_ops: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for programs solving problems from a data directory
    Search {
        /// Directory holding input/output tables and prior files
        data_dir: PathBuf,
        /// Index of the first problem to solve (0-based)
        #[arg(long, default_value_t = 0)]
        problem: usize,
        /// Number of consecutive problems to solve
        #[arg(long, default_value_t = 1)]
        num_problems: usize,
        /// Examples per problem
        #[arg(long, default_value_t = 5)]
        examples: usize,
        /// Maximum program length
        #[arg(long, default_value_t = 5)]
        max_length: usize,
        /// Stop a problem after this many explored nodes
        #[arg(long)]
        node_limit: Option<u64>,
        /// Timeout in seconds per problem
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// List the ranked operator registry
    Ops {
        /// Directory holding prior files (required unless ordering is none or shuffle)
        data_dir: Option<PathBuf>,
        /// Problem index, used by the predictions ordering
        #[arg(long, default_value_t = 0)]
        problem: usize,

        #[command(flatten)]
        registry: RegistryArgs,
    },
}

// --- Registry Construction ---

/// Build the ranked registry for one problem, returning the prior used if any
fn build_registry(
    args: &RegistryArgs,
    data_dir: Option<&Path>,
    problem_idx: usize,
) -> Result<(OperatorRegistry, Option<Priors>)> {
    let mut registry = if args.with_int_ops {
        OperatorRegistry::full()
    } else {
        OperatorRegistry::standard()
    };
    if args.access_sentinel {
        registry = registry.with_bounds_policy(BoundsPolicy::Sentinel);
    }
    let cutoff = cutoff_from_arg(args.cutoff);

    if let OrderingSource::Shuffle(seed) = args.ordering {
        return Ok((registry.shuffled(seed).truncated(cutoff), None));
    }

    let Some(dir) = data_dir else {
        if args.ordering == OrderingSource::None {
            return Ok((registry.truncated(cutoff), None));
        }
        bail!("ordering '{}' needs a data directory", args.ordering);
    };

    match args.ordering.prior_path(dir, problem_idx) {
        Some(path) => {
            let priors = Priors::load(&path)
                .with_context(|| format!("Failed to load prior '{}'", path.display()))?;
            Ok((registry.rank_by_prior(&priors, cutoff), Some(priors)))
        }
        None => Ok((registry.truncated(cutoff), None)),
    }
}

// --- Subcommands ---

struct SearchOptions {
    problem: usize,
    num_problems: usize,
    examples: usize,
    config: SearchConfig,
    verbose: bool,
}

fn run_search(data_dir: &Path, options: &SearchOptions, registry_args: &RegistryArgs) -> Result<()> {
    let mut solved = 0usize;
    let mut total_nodes = 0u64;
    let mut total_time = Duration::ZERO;
    let Some(last) = options.problem.checked_add(options.num_problems) else {
        bail!(
            "--problem {} plus --num-problems {} is out of range",
            options.problem,
            options.num_problems
        );
    };

    for problem_idx in options.problem..last {
        if options.num_problems > 1 {
            println!("Problem {}:", problem_idx);
        }

        let mut io = IoSet::load(data_dir, problem_idx, options.examples).with_context(|| {
            format!(
                "Failed to load problem {} from {}",
                problem_idx,
                data_dir.display()
            )
        })?;
        let (registry, _) = build_registry(registry_args, Some(data_dir), problem_idx)?;

        if options.verbose {
            print!("{}", io);
            println!("Operators: {}", registry.len());
        }

        let mut searcher = EnumerativeSearch::new();
        let result = searcher
            .search(&mut io, &registry, &options.config)
            .with_context(|| {
                let hint = if registry_args.access_sentinel {
                    ""
                } else {
                    " (use --access-sentinel to tolerate out-of-range access)"
                };
                format!("Search failed on problem {}{}", problem_idx, hint)
            })?;

        print!("{}", result);
        if options.verbose {
            print!("{}", result.statistics.format_summary());
        }

        if result.is_solved() {
            solved += 1;
        }
        total_nodes += result.nodes_explored();
        total_time += result.statistics.elapsed_time;
    }

    if options.num_problems > 1 {
        println!();
        println!("Summary:");
        println!("  Solved: {}/{}", solved, options.num_problems);
        println!("  Nodes explored: {}", total_nodes);
        println!("  Time: {:.2?}", total_time);
    }
    Ok(())
}

fn list_operators(data_dir: Option<&Path>, problem_idx: usize, registry_args: &RegistryArgs) -> Result<()> {
    let (registry, priors) = build_registry(registry_args, data_dir, problem_idx)?;
    let priors = priors.unwrap_or_default();

    println!(
        "Operators ({}, ordering {}):",
        registry.len(),
        registry_args.ordering
    );
    for (rank, (op, score)) in registry.scored(&priors).enumerate() {
        println!(
            "  {:>3}  {:<20} {:<22} {:.4}",
            rank,
            op.name(),
            op.signature().to_string(),
            score
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match args.command {
        Commands::Search {
            data_dir,
            problem,
            num_problems,
            examples,
            max_length,
            node_limit,
            timeout,
            registry,
        } => {
            if examples == 0 {
                bail!("--examples must be at least 1");
            }
            let options = SearchOptions {
                problem,
                num_problems,
                examples,
                config: SearchConfig::default()
                    .with_max_program_length(max_length)
                    .with_node_limit_option(node_limit)
                    .with_timeout_option(timeout.map(Duration::from_secs)),
                verbose: args.verbose,
            };
            run_search(&data_dir, &options, &registry)
        }
        Commands::Ops {
            data_dir,
            problem,
            registry,
        } => list_operators(data_dir.as_deref(), problem, &registry),
    }
}
