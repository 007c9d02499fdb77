//! `sc-replay` — replay a recorded drawing session through the canvas pipeline.
//!
//! ```text
//! sc-replay <session.json> [--config <config.json>] [--transpose]
//!           [--out <name>] [--tensor]
//! ```
//!
//! Renders the session onto a fresh surface, optionally writes it as
//! `<name>.jpg`, and prints either a one-line summary or the normalized
//! `[1, 28, 28, 1]` model input as a JSON array of rows.

use sc_core::config::CanvasConfig;
use sc_core::normalize::Tensor;
use sc_core::session::DrawingSession;
use sc_editor::canvas::DrawingCanvas;
use sc_render::export::{DEFAULT_JPEG_QUALITY, encode_jpeg, export_filename};

#[derive(Debug, Default, PartialEq)]
struct Options {
    session: String,
    config: Option<String>,
    transpose: bool,
    out: Option<String>,
    tensor: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut session = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                opts.config = Some(iter.next().ok_or("--config needs a path")?.clone());
            }
            "--out" => {
                opts.out = Some(iter.next().ok_or("--out needs a file name")?.clone());
            }
            "--transpose" => opts.transpose = true,
            "--tensor" => opts.tensor = true,
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
            path => {
                if session.replace(path.to_string()).is_some() {
                    return Err("only one session file may be given".to_string());
                }
            }
        }
    }
    opts.session = session.ok_or("missing <session.json>")?;
    Ok(opts)
}

fn read(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))
}

fn tensor_rows(tensor: &Tensor) -> serde_json::Value {
    let [_, height, width, _] = tensor.shape();
    let rows: Vec<Vec<f32>> = (0..height)
        .map(|r| (0..width).map(|c| tensor.at(r, c)).collect())
        .collect();
    serde_json::json!(rows)
}

fn run(opts: &Options) -> Result<(), String> {
    let mut config = match &opts.config {
        Some(path) => CanvasConfig::from_json(&read(path)?)?,
        None => CanvasConfig::default(),
    };
    config.transpose |= opts.transpose;

    let session = DrawingSession::from_json(&read(&opts.session)?)?;
    let mut canvas = DrawingCanvas::new(config)?;
    canvas.load_session(session);
    log::info!(
        "replayed {} strokes ({} points) from {}",
        canvas.session().len(),
        canvas.session().point_count(),
        opts.session
    );

    if let Some(name) = &opts.out {
        let bytes = encode_jpeg(canvas.surface(), DEFAULT_JPEG_QUALITY)?;
        let file = export_filename(name);
        std::fs::write(&file, &bytes).map_err(|e| format!("cannot write {file}: {e}"))?;
        log::info!("wrote {file} ({} bytes)", bytes.len());
    }

    let tensor = canvas.normalized()?;
    if opts.tensor {
        println!("{}", tensor_rows(&tensor));
    } else {
        let ink: f32 = tensor.data().iter().sum();
        let coverage = ink / tensor.data().len() as f32;
        println!(
            "strokes={} points={} coverage={coverage:.4}",
            canvas.session().len(),
            canvas.session().point_count()
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("sc-replay: {e}");
            eprintln!(
                "usage: sc-replay <session.json> [--config <config.json>] [--transpose] [--out <name>] [--tensor]"
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&opts) {
        log::error!("{e}");
        eprintln!("sc-replay error: {e}");
        std::process::exit(1);
    }
}
