use crate::strcon::GapVotePolicy;
use crate::utils::Result;
use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="strcon",
          version=&**FULL_VERSION,
          about="Consensus allele sequences for short tandem repeat loci",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Build allele consensus sequences and reference edit scripts")]
    Consensus(ConsensusArgs),
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("consensus")))]
#[command(arg_required_else_help(true))]
pub struct ConsensusArgs {
    #[clap(required = true)]
    #[clap(short = 'l')]
    #[clap(long = "loci")]
    #[clap(help = "Tab-separated locus table (optionally gzipped)")]
    #[clap(value_name = "LOCI")]
    #[arg(value_parser = check_file_exists)]
    pub loci_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-prefix")]
    #[clap(help = "Prefix for output files")]
    #[clap(value_name = "OUTPUT_PREFIX")]
    #[arg(value_parser = check_prefix_path)]
    pub output_prefix: String,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Engine"))]
    #[clap(long = "clustalw")]
    #[clap(value_name = "PATH")]
    #[clap(help = "Multiple alignment executable")]
    #[clap(default_value = "clustalw2")]
    pub clustalw_path: PathBuf,

    #[clap(help_heading("Engine"))]
    #[clap(long = "engine-timeout")]
    #[clap(value_name = "SECONDS")]
    #[clap(help = "Seconds before a multiple alignment call is abandoned")]
    #[clap(default_value = "300")]
    #[arg(value_parser = timeout_in_range)]
    pub engine_timeout: u64,

    #[clap(help_heading("Engine"))]
    #[clap(long = "work-dir")]
    #[clap(value_name = "DIR")]
    #[clap(help = "Directory for temporary alignment files [default: system temp dir]")]
    #[arg(value_parser = check_dir_exists)]
    pub work_dir: Option<PathBuf>,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "min-similarity")]
    #[clap(value_name = "FRAC")]
    #[clap(help = "Minimum average similarity for an unlabeled read to join an allele")]
    #[clap(default_value = "0.85")]
    #[arg(value_parser = ensure_unit_float)]
    pub min_similarity: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-distance")]
    #[clap(value_name = "FRAC")]
    #[clap(help = "Cluster separation above which reads of one length form two alleles")]
    #[clap(default_value = "0.05")]
    #[arg(value_parser = ensure_unit_float)]
    pub max_distance: f64,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "flank-padding")]
    #[clap(value_name = "BASES")]
    #[clap(help = "Reference bases padding each side of the locus")]
    #[clap(default_value = "15")]
    pub flank_padding: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "gap-vote")]
    #[clap(value_name = "POLICY")]
    #[clap(help = "Whether gaps vote in consensus columns (exclude or count)")]
    #[clap(default_value = "exclude")]
    pub gap_vote: GapVotePolicy,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<String> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    Ok(s.to_string())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn timeout_in_range(s: &str) -> Result<u64> {
    let seconds: u64 = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number of seconds", s))?;
    if seconds >= 1 {
        Ok(seconds)
    } else {
        Err("Engine timeout must be at least 1 second".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_dir_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.is_dir() {
        Err(format!("Directory does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn ensure_unit_float(s: &str) -> Result<f64> {
    let value = s
        .parse::<f64>()
        .map_err(|e| format!("Could not parse float: {}", e))?;
    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "The value must be between 0.0 and 1.0, got: {}",
            value
        ))
    } else {
        Ok(value)
    }
}
