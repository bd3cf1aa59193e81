use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hwfilter", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the fixed-function path for a frame job and print the outcome.
    Probe(JobArgs),
    /// Plan and execute a frame job, printing the packets that would be submitted.
    Plan(JobArgs),
}

#[derive(Parser, Debug)]
struct JobArgs {
    /// Input frame job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Platform configuration JSON (defaults apply when omitted).
    #[arg(long)]
    platform: Option<PathBuf>,

    /// Scaler limits JSON used as the engine capability table.
    #[arg(long)]
    limits: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn open(path: &Path) -> anyhow::Result<BufReader<File>> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    Ok(BufReader::new(f))
}

struct Loaded {
    job: hwfilter::FrameJob,
    platform: hwfilter::PlatformConfig,
    limits: hwfilter::SfcLimits,
}

fn load(args: &JobArgs) -> anyhow::Result<Loaded> {
    let job: hwfilter::FrameJob =
        serde_json::from_reader(open(&args.in_path)?).with_context(|| "parse frame job JSON")?;

    let platform = match &args.platform {
        Some(p) => hwfilter::PlatformConfig::from_json_reader(open(p)?)
            .with_context(|| format!("load platform '{}'", p.display()))?,
        None => hwfilter::PlatformConfig::default(),
    };

    let limits = match &args.limits {
        Some(p) => hwfilter::SfcLimits::from_json_reader(open(p)?)
            .with_context(|| format!("load limits '{}'", p.display()))?,
        None => hwfilter::SfcLimits::default(),
    };

    Ok(Loaded {
        job,
        platform,
        limits,
    })
}

fn cmd_probe(args: JobArgs) -> anyhow::Result<()> {
    let Loaded {
        job,
        platform,
        limits,
    } = load(&args)?;

    let mut state = hwfilter::SfcJpegState::new(platform);
    let outcome = state.check_and_initialize(&job.destination, &job.request, &limits)?;
    let input = if outcome.usable {
        Some(state.update_input_info()?)
    } else {
        None
    };

    let out = serde_json::json!({
        "usable": outcome.usable,
        "input_surface": outcome.input_surface,
        "sfc_input": input,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn cmd_plan(args: JobArgs) -> anyhow::Result<()> {
    let Loaded {
        job,
        platform,
        limits,
    } = load(&args)?;

    let mut pipe = hwfilter::HwFilterPipe::new(platform)?;
    let mut ctor = hwfilter::DefaultParameterConstructor;
    let mut log = hwfilter::PacketLog::new();
    let stats = pipe.execute_frame(&job, &limits, &mut ctor, &mut log)?;

    let out = serde_json::json!({
        "stats": stats,
        "packets": log.packets(),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
