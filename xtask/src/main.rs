use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the SNS FIFO load test workspace",
    long_about = "A unified CLI for running the load test, benchmarks,\n\
                  and CI checks in the SNS FIFO load test workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the load test against SNS_TOPIC_ARN
    Run {
        /// Number of messages to publish (defaults to NUM_MESSAGES or 50 000)
        #[arg(long)]
        num_messages: Option<usize>,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
    /// Run load tests (ignored tests in fifo_load_core)
    LoadTest,
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn ensure_topic_configured() {
    let configured = std::env::var("SNS_TOPIC_ARN")
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false);
    if !configured {
        eprintln!("SNS_TOPIC_ARN must be set before running the load test");
        exit(1);
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test fifo_load_core");
    run_cargo(&["test", "-p", "fifo_load_core"]);

    step("Test fifo_load_sns");
    run_cargo(&["test", "-p", "fifo_load_sns"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "fifo_load_core", "--bench", "sharding"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { num_messages } => {
            ensure_topic_configured();
            let count = num_messages.map(|value| value.to_string());
            let mut args = vec![
                "run",
                "-p",
                "fifo_load_sns",
                "--bin",
                "sns_load_test",
                "--release",
            ];
            if let Some(count) = count.as_deref() {
                args.extend(["--", "--num-messages", count]);
            }
            run_cargo(&args);
        }
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
        Commands::LoadTest => {
            run_cargo(&[
                "test",
                "-p",
                "fifo_load_core",
                "--test",
                "load_tests",
                "--",
                "--ignored",
            ]);
        }
    }
}
