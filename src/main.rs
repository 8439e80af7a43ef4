use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tweetmap::render::{NoopPacer, Pacer, ThreadPacer};
use tweetmap::{Config, FrameFormat, FrameSink, Player, SqliteStore, TextSink, aggregate_store};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON or TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database holding the tweets
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the tweet database tables
    InitDb,

    /// Validate newline-delimited tweet JSON and record the accepted ones
    Ingest {
        /// Input file, `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: String,
    },

    /// Write every stored coordinate as a `lat lon` line
    ExportCoords {
        #[arg(short, long, default_value = "coords")]
        output: PathBuf,
    },

    /// Aggregate stored tweets into time windows and play them frame by frame
    Play {
        #[arg(long)]
        width_secs: Option<i64>,

        #[arg(long)]
        interval_ms: Option<u64>,

        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Emit frames without waiting between them
        #[arg(long)]
        no_wait: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    #[cfg(feature = "geojson")]
    Geojson,
}

impl From<Format> for FrameFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => FrameFormat::Text,
            #[cfg(feature = "geojson")]
            Format::Geojson => FrameFormat::GeoJson,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(db) = &args.db {
        config = config.with_storage_path(db);
    }

    let db_path = config.storage.path.clone();
    info!("Using tweet database at {}", db_path.display());

    match args.command {
        Command::InitDb => {
            let store = SqliteStore::open(&db_path)?;
            store.create_schema()?;
            info!("Schema ready");
        }
        Command::Ingest { input } => {
            let mut store = SqliteStore::open(&db_path)?;
            store.create_schema()?;

            let stats = if input == "-" {
                tweetmap::ingest::ingest_lines(io::stdin().lock(), &mut store)?
            } else {
                let file = File::open(&input).with_context(|| format!("Failed to open {}", input))?;
                tweetmap::ingest::ingest_lines(BufReader::new(file), &mut store)?
            };

            println!(
                "accepted {} rejected {} duplicates {}",
                stats.accepted, stats.rejected, stats.duplicates
            );
        }
        Command::ExportCoords { output } => {
            let store = SqliteStore::open(&db_path)?;
            let written = tweetmap::export::export_coordinates(&store, &output)?;
            println!("wrote {} coordinates to {}", written, output.display());
        }
        Command::Play {
            width_secs,
            interval_ms,
            format,
            no_wait,
        } => {
            if let Some(secs) = width_secs {
                config = config.with_window_width_secs(secs);
            }
            if let Some(ms) = interval_ms {
                config = config.with_frame_interval_ms(ms);
            }
            if let Some(format) = format {
                config = config.with_format(format.into());
            }
            config
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            let width = config
                .window
                .width()
                .ok_or_else(|| anyhow::anyhow!("Invalid configuration: window width out of range"))?;

            let store = SqliteStore::open(&db_path)?;
            let timeline = aggregate_store(&store, width)?;

            let interval = config.playback.frame_interval();
            if no_wait {
                play(Player::with_pacer(interval, NoopPacer), &timeline, config.playback.format)?;
            } else {
                play(Player::with_pacer(interval, ThreadPacer), &timeline, config.playback.format)?;
            }
        }
    }

    Ok(())
}

fn play<P: Pacer>(
    mut player: Player<P>,
    timeline: &tweetmap::Timeline,
    format: FrameFormat,
) -> anyhow::Result<()> {
    let stdout = io::stdout().lock();
    let mut sink: Box<dyn FrameSink> = match format {
        FrameFormat::Text => Box::new(TextSink::new(stdout)),
        #[cfg(feature = "geojson")]
        FrameFormat::GeoJson => Box::new(tweetmap::GeoJsonSink::new(stdout)),
    };

    player.play(timeline, sink.as_mut())?;
    Ok(())
}
