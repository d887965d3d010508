use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tm_halting::experiment::{execute, ExperimentConfig, ExperimentRegistry, ExperimentRun};
use tm_halting::{Outcome, ProbabilisticMachine, Symbol};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "tm-halting",
    about = "Sweep transition probability and watch random Turing machines halt or loop"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a named experiment across the probability sweep.
    Run {
        /// Experiment to run (see `list`).
        #[arg(long, default_value = "halt_frequency")]
        experiment: String,
        /// JSON configuration file; command-line flags override it.
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: ConfigOverrides,
    },
    /// List registered experiments.
    List,
    /// Build one machine, run it and print its transition table and outcome.
    Simulate {
        /// Random input length is 2^tape_bits (ignored with --input).
        #[arg(long, default_value_t = 2)]
        tape_bits: u32,
        /// Head bound is 2^head_bits - 1.
        #[arg(long, default_value_t = 2)]
        head_bits: u32,
        /// The machine has 2^state_bits states.
        #[arg(long, default_value_t = 1)]
        state_bits: u32,
        /// Chance that a (state, symbol) pair has a transition.
        #[arg(long, default_value_t = 0.5)]
        probability: f64,
        /// Explicit binary input, e.g. 0101.
        #[arg(long)]
        input: Option<String>,
        /// Seed for a reproducible machine.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args, Debug, Default)]
struct ConfigOverrides {
    /// Trials per transition probability.
    #[arg(long)]
    num_experiments: Option<usize>,
    /// First probability of the sweep.
    #[arg(long)]
    min_prob: Option<f64>,
    /// Last probability of the sweep.
    #[arg(long)]
    max_prob: Option<f64>,
    /// Number of probabilities in the sweep.
    #[arg(long)]
    num_probs: Option<usize>,
    /// Random input length is 2^tape_bits.
    #[arg(long)]
    tape_bits: Option<u32>,
    /// Head bound is 2^head_bits - 1.
    #[arg(long)]
    head_bits: Option<u32>,
    /// Machines have 2^state_bits states.
    #[arg(long)]
    state_bits: Option<u32>,
    /// Base seed for a reproducible sweep.
    #[arg(long)]
    seed: Option<u64>,
    /// Write a log file and JSON result data.
    #[arg(long)]
    log: bool,
    /// Render an SVG plot (needs the `plot` feature).
    #[arg(long)]
    plot: bool,
    /// Run trials on a single thread.
    #[arg(long)]
    sequential: bool,
    /// Directory for log files.
    #[arg(long)]
    logs_path: Option<PathBuf>,
    /// Directory for result data and plots.
    #[arg(long)]
    data_path: Option<PathBuf>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut ExperimentConfig) {
        if let Some(value) = self.num_experiments {
            config.num_experiments = value;
        }
        if let Some(value) = self.min_prob {
            config.min_prob = value;
        }
        if let Some(value) = self.max_prob {
            config.max_prob = value;
        }
        if let Some(value) = self.num_probs {
            config.num_probs = value;
        }
        if let Some(value) = self.tape_bits {
            config.tape_bits = value;
        }
        if let Some(value) = self.head_bits {
            config.head_bits = value;
        }
        if let Some(value) = self.state_bits {
            config.state_bits = value;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(value) = self.logs_path {
            config.logs_path = value;
        }
        if let Some(value) = self.data_path {
            config.data_path = value;
        }
        config.should_log |= self.log;
        config.should_plot |= self.plot;
        config.parallel &= !self.sequential;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            experiment,
            config,
            overrides,
        } => run_experiment(&experiment, config, overrides)?,
        Commands::List => {
            init_tracing(None)?;
            list_experiments();
        }
        Commands::Simulate {
            tape_bits,
            head_bits,
            state_bits,
            probability,
            input,
            seed,
        } => {
            init_tracing(None)?;
            simulate(tape_bits, head_bits, state_bits, probability, input, seed)?;
        }
    }

    Ok(())
}

fn run_experiment(
    name: &str,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> Result<()> {
    let registry = ExperimentRegistry::with_builtin();
    let experiment = registry.resolve(name)?;

    let mut config = match &config_path {
        Some(path) => ExperimentConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ExperimentConfig::default(),
    };
    overrides.apply(&mut config);
    config.validate().context("invalid experiment configuration")?;

    let log_file = config
        .should_log
        .then(|| config.logs_path.join(format!("{}.log", experiment.name())));
    init_tracing(log_file)?;

    let run = execute(experiment, &config)
        .with_context(|| format!("experiment '{}' failed", experiment.name()))?;
    print_run(experiment.y_label(), &run);
    Ok(())
}

fn init_tracing(log_file: Option<PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory {}", parent.display())
                })?;
            }
            let file = File::create(&path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(())
}

fn list_experiments() {
    for info in ExperimentRegistry::with_builtin().list() {
        println!("{:<16}{}", info.name, info.description);
    }
}

fn print_run(y_label: &str, run: &ExperimentRun) {
    let report = &run.report;
    println!(
        "experiment={}\tseed={}\ttrials={}\ttape_bits={}\thead_bits={}\tstate_bits={}",
        report.experiment,
        report.base_seed,
        report.num_experiments,
        report.tape_bits,
        report.head_bits,
        report.state_bits
    );
    println!("p\thalt\tloop\tlimit\tmean_steps");
    for point in &report.points {
        println!(
            "{:.3}\t{}\t{}\t{}\t{:.2}",
            point.probability,
            point.tally.halted,
            point.tally.looped,
            point.tally.step_limited,
            point.mean_steps
        );
    }

    for series in &run.series {
        println!("\n{} ({})", series.label, y_label);
        for (probability, value) in &series.points {
            println!("  p={:.3}\t{:.4}", probability, value);
        }
    }

    if let Some(path) = &run.data_file {
        println!("\ndata: {}", path.display());
    }
    if let Some(path) = &run.plot_file {
        println!("plot: {}", path.display());
    }
}

fn simulate(
    tape_bits: u32,
    head_bits: u32,
    state_bits: u32,
    probability: f64,
    input: Option<String>,
    seed: Option<u64>,
) -> Result<()> {
    let mut builder = ProbabilisticMachine::builder()
        .tape_bits(tape_bits)
        .head_bits(head_bits)
        .state_bits(state_bits)
        .probability(probability);
    if let Some(text) = input {
        builder = builder.input(parse_input(&text)?);
    }
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }
    let mut machine = builder.build().context("failed to build machine")?;

    println!("transitions: {}", machine.transitions());
    println!("start:       {}", machine.configuration());

    let outcome = match machine.run() {
        Ok(outcome) => outcome,
        Err(err) if machine.outcome() == Outcome::StepLimit => {
            eprintln!("warning: {err}");
            Outcome::StepLimit
        }
        Err(err) => return Err(err.into()),
    };

    println!("end:         {}", machine.configuration());
    println!(
        "outcome={}\tsteps={}\tdistinct_configs={}\tconfig_space={}",
        outcome,
        machine.steps(),
        machine.config_history().len(),
        machine.configuration_space()
    );
    Ok(())
}

fn parse_input(text: &str) -> Result<Vec<Symbol>> {
    text.chars()
        .enumerate()
        .map(|(idx, c)| match c {
            '0' => Ok(0),
            '1' => Ok(1),
            other => bail!("invalid input symbol '{}' at position {}", other, idx),
        })
        .collect()
}
