use clap::{Args, Parser, Subcommand, ValueHint};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use templin::dataset::{get_splits, MnistDir, MnistSplits, DEFAULT_DATA_DIR};
use templin::pipeline::{run_pipeline, sweep_eta, EvalConfig};
use templin::tensor::ITensor;
use templin_examples::util::{init_logging, parse_bias, print_report};

type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(author, version, about = "Scores hand-drawn digit templates as MNIST classifiers")]
struct Cli {
    /// Directory holding the MNIST idx files, created and populated on first use
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR, value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Fail instead of downloading missing dataset files
    #[arg(long, global = true)]
    no_download: bool,

    /// Print machine readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate one template at a single inversion factor
    Evaluate(EvaluateArgs),

    /// Evaluate one template at several inversion factors with the same bias
    Sweep(SweepArgs),

    /// Print the sizes of the train/validation/test splits
    Splits(SplitsArgs),
}

#[derive(Args)]
struct ScoringArgs {
    /// Template image with ten digit tiles stacked vertically
    #[arg(value_hint = ValueHint::FilePath)]
    template: PathBuf,

    /// Test samples per batch
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Seed of the random bias
    #[arg(long)]
    seed: Option<u64>,

    /// `random`, `zero` or ten comma separated values
    #[arg(long, default_value = "random")]
    bias: String,
}

impl ScoringArgs {
    fn config(&self) -> Result<EvalConfig> {
        Ok(EvalConfig::default()
            .with_batch_size(self.batch_size)
            .with_bias(parse_bias(&self.bias, self.seed)?))
    }
}

#[derive(Args)]
struct EvaluateArgs {
    #[command(flatten)]
    scoring: ScoringArgs,

    /// Inversion factor in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    eta: f32,

    /// Write the extracted weights as a grayscale PNG
    #[arg(long, value_hint = ValueHint::FilePath)]
    save_weights: Option<PathBuf>,
}

#[derive(Args)]
struct SweepArgs {
    #[command(flatten)]
    scoring: ScoringArgs,

    /// Inversion factors to evaluate
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.25, 0.5, 0.75, 1.0])]
    etas: Vec<f32>,
}

#[derive(Args)]
struct SplitsArgs {
    #[arg(long, default_value_t = MnistSplits::DEFAULT_TRAIN)]
    train: usize,

    #[arg(long, default_value_t = MnistSplits::DEFAULT_VAL)]
    val: usize,

    #[arg(long, default_value_t = MnistSplits::DEFAULT_TEST)]
    test: usize,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let source = MnistDir::new(cli.data_dir.clone()).with_download(!cli.no_download);
    match cli.command {
        Command::Evaluate(args) => {
            let config = args.scoring.config()?.with_eta(args.eta);
            info!("Evaluating with {config:?}");
            let output = run_pipeline(&args.scoring.template, &config, &source)?;
            if let Some(path) = &args.save_weights {
                output.weights.save_png(path)?;
                info!("Saved weights to {}", path.display());
            }
            if cli.json {
                let json = serde_json::json!({
                    "template": args.scoring.template,
                    "config": config,
                    "bias": output.bias.values(),
                    "report": output.report,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                print_report(&output.report);
            }
        }
        Command::Sweep(args) => {
            let config = args.scoring.config()?;
            let results = sweep_eta(&args.scoring.template, &args.etas, &config, &source)?;
            if cli.json {
                let json: Vec<_> = results
                    .iter()
                    .map(|&(eta, accuracy)| serde_json::json!({ "eta": eta, "accuracy": accuracy }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                for (eta, accuracy) in results {
                    println!("eta = {eta:.2}: {accuracy:.2}%");
                }
            }
        }
        Command::Splits(args) => {
            let splits = get_splits(&source, args.train, args.val, args.test)?;
            let sizes = [
                ("train", splits.y_train.len()),
                ("val", splits.y_val.len()),
                ("test", splits.y_test.len()),
            ];
            if cli.json {
                let json: serde_json::Map<String, serde_json::Value> =
                    sizes.iter().map(|&(name, len)| (name.to_string(), len.into())).collect();
                println!("{}", serde_json::to_string_pretty(&json)?);
            } else {
                for (name, len) in sizes {
                    println!("{name}: {len} samples");
                }
            }
        }
    }
    Ok(())
}
