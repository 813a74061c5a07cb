use descriptor_tracker::{default_num_threads, DescriptorTracker, TrackerSettings};
use log::*;
use pdtrack::GraphExport;
use std::path::PathBuf;
use structopt::StructOpt;
use track_core::PointSource;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "pdtrack",
    about = "A tool to link points across frames by matching their local neighborhoods"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `descriptor_tracker::TrackerSettings`. Missing fields and a
    /// missing file fall back to the defaults.
    #[structopt(short, long, parse(from_os_str))]
    settings: Option<PathBuf>,
    /// The number of threads to link with.
    ///
    /// Defaults to the number of available cores.
    #[structopt(short, long)]
    threads: Option<usize>,
    /// Output all links instead of only links between consecutive observations.
    #[structopt(long)]
    no_prune: bool,
    /// The output path to write the graph to as JSON.
    ///
    /// If this is not provided, then the output goes to stdout.
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
    /// A JSON list of points, each with a `frame`, `x`, `y` and optionally `z` and `quality`.
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();

    let settings = opt
        .settings
        .as_ref()
        .and_then(|path| std::fs::File::open(path).ok())
        .and_then(|file| serde_json::from_reader(file).ok());
    if settings.is_some() {
        info!("loaded settings");
    } else {
        info!("used default settings");
    }
    let mut settings: TrackerSettings = settings.unwrap_or_default();
    if opt.no_prune {
        settings.prune_graph = false;
    }

    let file = std::fs::File::open(&opt.input).expect("failed to open input file");
    let sequence = pdtrack::read_sequence(std::io::BufReader::new(file))
        .expect("failed to parse input points");
    info!(
        "read {} points on {} frames",
        sequence.num_points_total(),
        sequence.num_frames()
    );

    let mut tracker = DescriptorTracker::new(&sequence, settings)
        .num_threads(opt.threads.unwrap_or_else(default_num_threads));
    let result = tracker.process();
    if let Err(e) = &result {
        error!("tracking failed: {}", e);
    }
    info!(
        "{} links in {} tracks after {:?}",
        tracker.result().edge_count(),
        tracker.result().tracks().len(),
        tracker.processing_time()
    );

    let export = GraphExport::new(tracker.result());
    if let Some(path) = opt.output {
        let file = std::fs::File::create(path).expect("failed to create output file");
        export.write(file).expect("failed to write graph");
    } else {
        let stdout = std::io::stdout();
        export
            .write(stdout.lock())
            .expect("failed to write graph to stdout");
    }

    if result.is_err() {
        std::process::exit(1);
    }
}
