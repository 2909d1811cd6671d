use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;
use avatar_editor::{
    AvatarEditor, CompressionOpts, DisplaySize, EditorConfig, ImageSource, SaveOutcome, Transform,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "avatar-editor", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` still overrides).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place an overlay on a background and write the composite PNG.
    Compose(ComposeArgs),
    /// Validate, downscale and re-encode a photo for upload.
    Compress(CompressArgs),
    /// Check that a file is an acceptable upload.
    Validate(ValidateArgs),
    /// Poll a generation job until it finishes (requires the `http` feature).
    Poll(PollArgs),
}

/// `WIDTHxHEIGHT` in display pixels.
#[derive(Clone, Copy, Debug)]
struct ContainerArg(DisplaySize);

impl FromStr for ContainerArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let w: f64 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
        let h: f64 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
        let size = DisplaySize::new(w, h);
        if !size.is_measured() {
            return Err(format!("container must be positive, got '{s}'"));
        }
        Ok(Self(size))
    }
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background photo (path or http(s) URL).
    #[arg(long)]
    background: String,

    /// Overlay image (path or http(s) URL).
    #[arg(long)]
    overlay: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Editor container size the transform is expressed in.
    #[arg(long, default_value = "600x600")]
    container: ContainerArg,

    /// Editor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Transform as JSON, e.g. '{"translateX":10,"scaleX":0.5,"scaleY":0.5,"rotate":15}'.
    #[arg(long, conflicts_with = "matrix")]
    transform: Option<String>,

    /// Transform as a CSS matrix, e.g. 'matrix(0.5, 0, 0, 0.5, 10, 0)'.
    #[arg(long)]
    matrix: Option<String>,

    /// Comma-separated key presses applied after the transform, e.g. 'ArrowRight,ArrowRight,+'.
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,

    /// Job id used only in the reported file name.
    #[arg(long)]
    job_id: Option<String>,

    /// Write the on-screen preview at container resolution instead of the native composite.
    #[arg(long, default_value_t = false)]
    preview: bool,
}

#[derive(Parser, Debug)]
struct CompressArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,

    /// Maximum output width.
    #[arg(long, default_value_t = 2048)]
    max_width: u32,

    /// Maximum output height.
    #[arg(long, default_value_t = 2048)]
    max_height: u32,

    /// JPEG inputs at or below this size (MB) pass through untouched.
    #[arg(long, default_value_t = 5.0)]
    max_size_mb: f64,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = 85)]
    quality: u8,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// File to check.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PollArgs {
    /// Job to poll.
    #[arg(long)]
    job_id: String,

    /// Service base URL.
    #[arg(long, default_value = avatar_editor::DEFAULT_BASE_URL)]
    base_url: String,

    /// Bearer token; falls back to `AVATAR_EDITOR_TOKEN`.
    #[arg(long)]
    token: Option<String>,

    /// Milliseconds between polls.
    #[arg(long, default_value_t = 2000)]
    interval_ms: u64,

    /// Polls before giving up.
    #[arg(long, default_value_t = 60)]
    max_attempts: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Compress(args) => cmd_compress(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Poll(args) => cmd_poll(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => EditorConfig::from_path(path)?,
        None => EditorConfig::default(),
    };

    let mut editor = AvatarEditor::new(
        ImageSource::parse(&args.background),
        ImageSource::parse(&args.overlay),
        config,
    )?;
    if let Some(id) = &args.job_id {
        editor = editor.with_job_id(id.clone());
    }
    editor.measure_container(args.container.0);
    // Sizes the overlay from its real aspect ratio before any handle math runs.
    editor.load()?;

    let controller = editor.controller_mut();
    if let Some(json) = &args.transform {
        let t: Transform = serde_json::from_str(json).context("parse --transform JSON")?;
        controller.set_transform(t);
    }
    if let Some(css) = &args.matrix {
        controller.apply_css_matrix(css)?;
    }
    for key in args.keys.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        if controller.key_down(key).is_none() {
            anyhow::bail!("key '{key}' is not bound");
        }
        controller.key_up(key);
    }
    let t = controller.transform();
    tracing::info!(
        tx = t.translate_x,
        ty = t.translate_y,
        sx = t.scale_x,
        sy = t.scale_y,
        rotate = t.rotate_deg,
        "final transform"
    );

    ensure_parent(&args.out)?;
    if args.preview {
        let img = editor
            .preview()?
            .context("container is not measured")?;
        avatar_editor::write_png(&img, &args.out)?;
        eprintln!("wrote {}", args.out.display());
        return Ok(());
    }

    let mut written = None;
    let outcome = editor.save(|blob| written = Some(blob))?;
    let blob = match (outcome, written) {
        (SaveOutcome::Saved, Some(blob)) => blob,
        _ => anyhow::bail!("composite was not produced"),
    };
    std::fs::write(&args.out, &blob.bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{}, suggested name {})",
        args.out.display(),
        blob.width,
        blob.height,
        blob.file_name
    );
    Ok(())
}

fn cmd_compress(args: CompressArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let opts = CompressionOpts {
        max_width: args.max_width,
        max_height: args.max_height,
        max_size_mb: args.max_size_mb,
        quality: args.quality,
    };
    let out = avatar_editor::compress_upload(&bytes, opts)?;
    ensure_parent(&args.out)?;
    std::fs::write(&args.out, &out.bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{}{})",
        args.out.display(),
        out.width,
        out.height,
        if out.passthrough { ", unchanged" } else { "" }
    );
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read '{}'", args.in_path.display()))?;
    let format = avatar_editor::validate_upload(&bytes)?;
    println!("{}: ok ({format:?}, {} bytes)", args.in_path.display(), bytes.len());
    Ok(())
}

fn cmd_poll(args: PollArgs) -> anyhow::Result<()> {
    let token = args
        .token
        .or_else(|| std::env::var("AVATAR_EDITOR_TOKEN").ok());
    let tokens = std::sync::Arc::new(avatar_editor::StaticToken(token));
    let client = avatar_editor::HttpServiceClient::new(args.base_url, tokens)?;
    poll_with(&client, &args.job_id, args.interval_ms, args.max_attempts)
}

#[cfg(feature = "http")]
fn poll_with(
    client: &avatar_editor::HttpServiceClient,
    job_id: &str,
    interval_ms: u64,
    max_attempts: u32,
) -> anyhow::Result<()> {
    let opts = avatar_editor::PollOpts {
        interval: std::time::Duration::from_millis(interval_ms),
        max_attempts,
    };
    let job = avatar_editor::poll_job(client, job_id, opts, |j| {
        eprintln!("{}: {:?}", j.job_id, j.status);
    })?;
    println!("{}", serde_json::to_string_pretty(&job)?);
    Ok(())
}

#[cfg(not(feature = "http"))]
fn poll_with(
    _client: &avatar_editor::HttpServiceClient,
    _job_id: &str,
    _interval_ms: u64,
    _max_attempts: u32,
) -> anyhow::Result<()> {
    anyhow::bail!("polling requires the 'http' feature")
}
