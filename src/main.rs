//! Geographic hotspot clustering tool
//!
//! Reads incident points from a CSV file, clusters them with one of the
//! library strategies, and writes one summary row per cluster.

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use geo_hotspot::{
    Cluster, ClusterError, DEFAULT_CELL_SIZE_DEG, DEFAULT_EPSILON_M, DEFAULT_MIN_CLUSTER_SIZE,
    DEFAULT_MIN_POINTS, KMeansParams, Point, PointList, dbscan, grid_bin, k_means,
    k_means_seeded, multi_resolution_cluster, region_aggregate,
};


#[derive(Parser)]
#[command(name = "geo_hotspot")]
#[command(about = "Geographic incident hotspot clustering tool", long_about = None)]
struct Args {
    /// Input CSV file with latitude,longitude columns
    #[arg(short, long, default_value = "points.csv", global = true)]
    input: PathBuf,

    /// Output CSV file with one row per cluster (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    strategy: Strategy,
}

#[derive(Subcommand, Debug, Clone)]
enum Strategy {
    /// Density-based clustering, noise points are dropped
    Dbscan {
        /// Clustering radius in meters
        #[arg(short, long, default_value_t = DEFAULT_EPSILON_M)]
        eps: f64,

        /// Minimum points in eps-neighbourhood
        #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_POINTS)]
        min_points: usize,
    },
    /// Centroid-based partitioning with k-means++ seeding
    Kmeans {
        /// Number of clusters (clamped to the number of points)
        #[arg(short, long, default_value_t = KMeansParams::default().k)]
        k: usize,

        /// Maximum refinement iterations
        #[arg(long, default_value_t = KMeansParams::default().max_iterations)]
        max_iterations: usize,

        /// Seed for k-means++ (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Fixed-size lat/lon grid cells
    Grid {
        /// Cell size in degrees
        #[arg(short, long, default_value_t = DEFAULT_CELL_SIZE_DEG)]
        cell_size: f64,
    },
    /// Group by the value of a CSV column (e.g. a district id)
    Region {
        /// Zero-based index of the column holding the region key
        #[arg(short, long)]
        column: usize,
    },
    /// DBSCAN at several radii with hotspot de-duplication
    Multi {
        /// Minimum cluster size, used as minPoints for every pass
        #[arg(short = 'm', long, default_value_t = DEFAULT_MIN_CLUSTER_SIZE)]
        min_cluster_size: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose)?;

    // Read points and CSV records from file (read once, reuse for region keys)
    let (points, csv_records) = read_points_and_csv(&args.input)
        .with_context(|| format!("reading points from {:?}", args.input))?;

    if points.is_empty() {
        bail!("no points found in {:?}", args.input);
    }
    info!(points = points.len(), input = ?args.input, strategy = ?args.strategy, "clustering");

    let clusters = run_strategy(&args.strategy, &points, &csv_records)?;
    info!(clusters = clusters.len(), "clustering finished");

    // Write cluster summary to output (stdout or file)
    match &args.output {
        None => write_clusters(io::stdout().lock(), &clusters).context("writing to stdout")?,
        Some(output_file) => {
            let file = File::create(output_file)
                .with_context(|| format!("creating {:?}", output_file))?;
            write_clusters(file, &clusters)
                .with_context(|| format!("writing clusters to {:?}", output_file))?;
            info!(output = ?output_file, "clusters written");
        }
    }

    Ok(())
}

fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")
}

/// CSV data rows (header excluded); a point's payload indexes into this
type CsvRecords = Vec<Vec<String>>;

/// Reads points and CSV records from a file in a single pass
///
/// Expected format: `latitude,longitude[,extra...]` (header row is optional)
///
/// # Returns
///
/// A tuple `(points, records)` where:
/// - `points` are parsed points, payload is the row index into `records`
/// - `records` are the raw data rows, used for region keys
fn read_points_and_csv(filename: &Path) -> anyhow::Result<(PointList<usize>, CsvRecords)> {
    let file = File::open(filename)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = CsvRecords::new();
    for result in reader.records() {
        let record = result?;
        records.push(record.iter().map(|s| s.to_string()).collect());
    }

    // Determine if first row is header
    if records
        .first()
        .is_some_and(|first| first.first().is_some_and(|f| f.trim().parse::<f64>().is_err()))
    {
        records.remove(0);
    }

    let mut points = PointList::new();
    for (row, record) in records.iter().enumerate() {
        if record.len() < 2 {
            warn!(row, "skipping row with fewer than two fields");
            continue;
        }

        let lat = record[0].trim().parse::<f64>();
        let lon = record[1].trim().parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) => points.push(Point::new(lat, lon, row)),
            _ => warn!(row, "skipping row with unparsable coordinates"),
        }
    }

    Ok((points, records))
}

/// Runs the selected strategy over the loaded points
fn run_strategy<'a>(
    strategy: &Strategy,
    points: &'a [Point<usize>],
    records: &[Vec<String>],
) -> Result<Vec<Cluster<'a, usize>>, ClusterError> {
    match *strategy {
        Strategy::Dbscan { eps, min_points } => dbscan(points, eps, min_points),
        Strategy::Kmeans {
            k,
            max_iterations,
            seed: Some(seed),
        } => k_means_seeded(points, k, max_iterations, seed),
        Strategy::Kmeans {
            k,
            max_iterations,
            seed: None,
        } => k_means(points, k, max_iterations, &mut rand::thread_rng()),
        Strategy::Grid { cell_size } => grid_bin(points, cell_size),
        Strategy::Region { column } => region_aggregate(points, |pt| {
            region_key(&records[pt.payload], pt.payload, column)
        }),
        Strategy::Multi { min_cluster_size } => multi_resolution_cluster(points, min_cluster_size),
    }
}

/// Region key of a data row; rows without the column share the empty key
fn region_key(record: &[String], row: usize, column: usize) -> String {
    match record.get(column) {
        Some(key) => key.clone(),
        None => {
            warn!(row, column, "row has no region column, grouping under empty key");
            String::new()
        }
    }
}

/// Writes one summary row per cluster
///
/// Format: `cluster_id,center_latitude,center_longitude,count,min_latitude,min_longitude,max_latitude,max_longitude`
fn write_clusters<W: Write, P>(writer: W, clusters: &[Cluster<'_, P>]) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record([
        "cluster_id",
        "center_latitude",
        "center_longitude",
        "count",
        "min_latitude",
        "min_longitude",
        "max_latitude",
        "max_longitude",
    ])?;

    for cluster in clusters {
        let Some((min, max)) = cluster.bounds() else {
            continue;
        };
        writer.write_record([
            cluster.id.to_string(),
            cluster.center.latitude.to_string(),
            cluster.center.longitude.to_string(),
            cluster.count.to_string(),
            min.latitude.to_string(),
            min.longitude.to_string(),
            max.latitude.to_string(),
            max.longitude.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
