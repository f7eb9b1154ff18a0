use std::io;
use std::process;

use anyhow::{Context, Result};
use benchwrap::{BenchError, Benchstat, CompareOptions, GitRepo, GoTest, RunConfig};
use clap::Parser;

/// Run Go benchmarks for one or more git revisions and compare them with benchstat.
///
/// Each revision must be a valid git commit or reference (hash, tag or
/// branch). The working tree is checked out per revision, benchmarks run
/// N times, and the original checkout is restored at the end.
#[derive(Parser, Debug)]
#[command(name = "benchwrap", version, about)]
struct Args {
    /// Git revisions to benchmark, oldest first
    #[arg(value_name = "REV", required_unless_present = "h_vs_h1")]
    revisions: Vec<String>,

    /// Regexp denoting benchmarks to run (go test -bench)
    #[arg(long, value_name = "REGEXP", default_value = ".")]
    bench: String,

    /// Number of go test invocations per git revision
    #[arg(
        short = 'n',
        long = "count",
        value_name = "NUMBER",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    count: u32,

    /// Use HEAD~1 as the old revision and HEAD as the new one
    #[arg(long = "h-vs-h1")]
    h_vs_h1: bool,

    /// Packages to test (go test [packages])
    #[arg(long, value_name = "PKGS", default_value = ".")]
    pkgs: String,

    /// Quoted string of flags forwarded to go test
    #[arg(long = "gt-flags", value_name = "STRING", allow_hyphen_values = true)]
    gt_flags: Option<String>,

    /// Forward TEST to benchstat's -delta-test flag
    #[arg(long = "delta-test", value_name = "TEST")]
    delta_test: Option<String>,

    /// Invoke benchstat with -html
    #[arg(long)]
    html: bool,

    /// Print commands and raw benchmark output to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<RunConfig> {
        let mut config = RunConfig {
            bench: self.bench,
            count: self.count as usize,
            packages: self.pkgs,
            compare: CompareOptions {
                html: self.html,
                delta_test: self.delta_test.filter(|t| !t.is_empty()),
            },
            revisions: self.revisions,
            previous_vs_current: self.h_vs_h1,
            verbose: self.verbose,
            ..Default::default()
        };
        if let Some(flags) = self.gt_flags {
            config.set_test_flags(&flags)?;
        }
        config.apply_env();
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "benchwrap=debug"
    } else {
        "benchwrap=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("benchwrap: {e:#}");
        if let Some(hint) = e.downcast_ref::<BenchError>().and_then(BenchError::hint) {
            eprintln!("{hint}");
        }
        process::exit(2);
    }
}

fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    let cwd = std::env::current_dir().context("cannot determine working directory")?;

    let git = GitRepo::new(&cwd);
    let go = GoTest::new(config.go_program.clone(), &cwd);
    let benchstat = Benchstat::new(config.benchstat_program.clone(), config.compare.clone(), &cwd);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    benchwrap::run(&config, &git, &go, &benchstat, &mut out)?;
    Ok(())
}
