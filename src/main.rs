//! Eddy - ocean current feature collections from netCDF.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use eddy::data::parse_datetime;
use eddy::{BoundingBox, Dataset, FeatureCollection, QueryEngine, QueryRequest, VariableNames};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "eddy", version)]
#[command(about = "Ocean current feature collections from netCDF", long_about = None)]
struct Cli {
    /// Write debug logs to the specified file instead of stderr
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// Path to the NetCDF current dataset
    file: PathBuf,

    /// Eastward velocity variable
    #[arg(long, default_value = "u")]
    u_var: String,

    /// Northward velocity variable
    #[arg(long, default_value = "v")]
    v_var: String,

    /// Time axis variable
    #[arg(long, default_value = "time")]
    time_var: String,

    /// Latitude variable
    #[arg(long, default_value = "latitude")]
    lat_var: String,

    /// Longitude variable
    #[arg(long, default_value = "longitude")]
    lon_var: String,
}

impl DatasetArgs {
    fn names(&self) -> VariableNames {
        VariableNames {
            u: self.u_var.clone(),
            v: self.v_var.clone(),
            time: self.time_var.clone(),
            latitude: self.lat_var.clone(),
            longitude: self.lon_var.clone(),
        }
    }

    fn open(&self) -> Result<Dataset> {
        Dataset::open(&self.file, &self.names())
            .with_context(|| format!("Failed to load dataset {}", self.file.display()))
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a dataset
    Info {
        #[command(flatten)]
        dataset: DatasetArgs,
    },

    /// Print the feature collection for one time and bounding box
    Query {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Time in axis units
        #[arg(long, allow_negative_numbers = true, required_unless_present = "at", conflicts_with = "at")]
        time: Option<f64>,

        /// Calendar datetime, converted with the time axis units
        #[arg(long)]
        at: Option<String>,

        /// Bounding box (defaults to the whole globe)
        #[arg(
            long,
            num_args = 4,
            allow_negative_numbers = true,
            value_names = ["MIN_LAT", "MAX_LAT", "MIN_LON", "MAX_LON"]
        )]
        bbox: Option<Vec<f64>>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Answer one query per input line: `time [min_lat max_lat min_lon max_lon]`
    Batch {
        #[command(flatten)]
        dataset: DatasetArgs,

        /// Query file (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    match cli.command {
        Command::Info { dataset } => {
            let dataset = dataset.open()?;
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &dataset.summary())?;
            writeln!(out)?;
        }
        Command::Query {
            dataset,
            time,
            at,
            bbox,
            pretty,
        } => {
            let engine = QueryEngine::new(dataset.open()?);
            let time = match (time, at) {
                (Some(t), _) => t,
                (None, Some(at)) => engine.dataset().time_axis().value_at(parse_datetime(&at)?)?,
                (None, None) => bail!("either --time or --at is required"),
            };
            let bbox = match bbox.as_deref() {
                Some([min_lat, max_lat, min_lon, max_lon]) => {
                    BoundingBox::new(*min_lat, *max_lat, *min_lon, *max_lon)
                }
                _ => BoundingBox::world(),
            };

            tracing::debug!(time, index = engine.resolve(time), ?bbox, "Running query");
            write_collection(&engine.query(time, &bbox), pretty)?;
        }
        Command::Batch { dataset, input } => {
            let engine = QueryEngine::new(dataset.open()?);
            let requests = match input {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    read_requests(BufReader::new(file))?
                }
                None => read_requests(io::stdin().lock())?,
            };

            tracing::info!(queries = requests.len(), "Running batch");
            for fc in engine.query_batch(&requests) {
                write_collection(&fc, false)?;
            }
        }
    }

    Ok(())
}

fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    if let Some(log_path) = log {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Eddy");
    } else {
        // stdout carries JSON, so logs go to stderr
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn read_requests(reader: impl BufRead) -> Result<Vec<QueryRequest>> {
    let mut requests = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let request = line
            .parse::<QueryRequest>()
            .map_err(|e| anyhow!("line {}: {}", lineno + 1, e))?;
        requests.push(request);
    }
    Ok(requests)
}

fn write_collection(fc: &FeatureCollection, pretty: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, fc)?;
    } else {
        serde_json::to_writer(&mut out, fc)?;
    }
    writeln!(out)?;
    Ok(())
}
