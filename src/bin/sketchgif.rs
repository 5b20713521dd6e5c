use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sketchgif::encode::metadata::AnimationMetadata;
use sketchgif::schedule::CancelToken;
use sketchgif::{Frame, Session, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sketchgif", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` overrides).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a session's strokes into an animated GIF.
    Synth(SynthArgs),
    /// Print a summary of a session without rendering.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct SynthArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output GIF path.
    #[arg(long)]
    out: PathBuf,

    /// Also write a ZIP bundle with the GIF and its metadata.
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Also write every frame as `frame_NNNN.png` into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input session JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    overrides: Overrides,
}

/// Settings overrides applied on top of the session file.
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Stroke points revealed per frame.
    #[arg(long)]
    points_per_frame: Option<usize>,

    /// Pause between strokes, in milliseconds.
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Hold on the finished drawing, in milliseconds.
    #[arg(long)]
    hold_ms: Option<u64>,

    /// Per-frame delay, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// GIF quantizer quality (1 best ..= 30 fastest).
    #[arg(long)]
    quality: Option<u8>,
}

impl Overrides {
    fn apply(&self, s: &mut Settings) {
        if let Some(v) = self.points_per_frame {
            s.points_per_frame = v;
        }
        if let Some(v) = self.pause_ms {
            s.inter_stroke_pause_ms = v;
        }
        if let Some(v) = self.hold_ms {
            s.final_hold_ms = v;
        }
        if let Some(v) = self.delay_ms {
            s.frame_delay_ms = v;
        }
        if let Some(v) = self.quality {
            s.gif_quality = v;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Synth(args) => cmd_synth(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_session(path: &Path, overrides: &Overrides) -> anyhow::Result<Session> {
    let mut session = Session::read_path(path)?;
    overrides.apply(&mut session.settings);
    session
        .validate()
        .with_context(|| format!("session '{}'", path.display()))?;
    Ok(session)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_synth(args: SynthArgs) -> anyhow::Result<()> {
    let session = load_session(&args.in_path, &args.overrides)?;
    let settings = &session.settings;
    let canvas = settings.canvas()?;
    let params = settings.synth_params();
    let strokes = session.stroke_book()?;

    let frames = sketchgif::synthesize(canvas, strokes.as_slice(), &params)?;
    tracing::info!(frames = frames.len(), strokes = strokes.len(), "synthesized");

    if let Some(dir) = &args.frames_dir {
        write_frames(dir, &frames)?;
        eprintln!("wrote {} frames to {}", frames.len(), dir.display());
    }

    let gif = sketchgif::encode_gif(
        &frames,
        canvas,
        &settings.gif_options(),
        &CancelToken::new(),
        |p| tracing::debug!(progress = p, "encoding"),
    )?;
    create_parent(&args.out)?;
    std::fs::write(&args.out, &gif)
        .with_context(|| format!("write gif '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(bundle_path) = &args.bundle {
        let metadata = AnimationMetadata::build(
            &settings.character,
            canvas,
            strokes.as_slice(),
            &params,
            frames.len(),
            chrono::Utc::now(),
        );
        let zip = sketchgif::package_bundle(Some(gif.as_slice()), &metadata, &settings.character)?;
        create_parent(bundle_path)?;
        std::fs::write(bundle_path, zip)
            .with_context(|| format!("write bundle '{}'", bundle_path.display()))?;
        eprintln!("wrote {}", bundle_path.display());
    }
    Ok(())
}

fn write_frames(dir: &Path, frames: &[Frame]) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create frames dir '{}'", dir.display()))?;
    for (i, frame) in frames.iter().enumerate() {
        let path = dir.join(format!("frame_{i:04}.png"));
        std::fs::write(&path, frame.png())
            .with_context(|| format!("write png '{}'", path.display()))?;
    }
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let session = load_session(&args.in_path, &args.overrides)?;
    let settings = &session.settings;
    let params = settings.synth_params();
    let frames = sketchgif::synth::predicted_frame_count(&session.strokes, &params);
    let points: usize = session.strokes.iter().map(|s| s.points.len()).sum();

    println!("canvas: {}x{}", settings.canvas_width, settings.canvas_height);
    println!("strokes: {} ({points} points)", session.strokes.len());
    println!(
        "frames: {frames} at {} ms ({:.2} s)",
        params.frame_interval_ms,
        frames.saturating_mul(params.frame_interval_ms) as f64 / 1000.0
    );

    let metadata = AnimationMetadata::build(
        &settings.character,
        settings.canvas()?,
        &session.strokes,
        &params,
        usize::try_from(frames).context("frame count overflows usize")?,
        chrono::Utc::now(),
    );
    println!("{}", metadata.to_json_pretty()?);
    Ok(())
}
