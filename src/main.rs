//! CLI entry point for orchard

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use orchard::{
    CancellationToken, DiagramConfig, RawInputs, RunSummary, generate, print_json, print_summary,
    print_warnings, scan,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Determine whether to use color output based on mode and environment.
fn should_use_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            // Respect NO_COLOR environment variable (https://no-color.org/)
            if std::env::var_os("NO_COLOR").is_some() {
                return false;
            }
            // Respect FORCE_COLOR environment variable
            if std::env::var_os("FORCE_COLOR").is_some() {
                return true;
            }
            // Respect TERM=dumb
            if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
                return false;
            }
            // The summary goes to stderr
            std::io::stderr().is_terminal()
        }
    }
}

const DEFAULT_EXCLUDES: &str = "node_modules,bower_components,dist,out,build,eject,.next,.netlify,.yarn,.git,.vscode,package-lock.json,yarn.lock";

#[derive(Parser, Debug)]
#[command(name = "orchard")]
#[command(about = "Draw a directory tree as a standalone SVG diagram of structure, size and file type")]
#[command(version)]
struct Args {
    /// Directory to draw
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Output file ("-" for stdout)
    #[arg(short, long, default_value = "diagram.svg")]
    output: PathBuf,

    /// Comma-separated names or path fragments to leave out
    #[arg(long = "exclude", value_name = "LIST", default_value = DEFAULT_EXCLUDES)]
    exclude: String,

    /// Semicolon-separated globs to leave out (e.g. "**/*.test.js;*.{png,jpg}")
    #[arg(long = "exclude-globs", value_name = "LIST", default_value = "")]
    exclude_globs: String,

    /// Deepest nesting level to draw (0 or less draws only the root)
    #[arg(
        short = 'L',
        long = "max-depth",
        value_name = "N",
        default_value = "9",
        allow_hyphen_values = true
    )]
    max_depth: String,

    /// How files are colored: type, extension, none
    #[arg(long = "color-encoding", value_name = "MODE", default_value = "type")]
    color_encoding: String,

    /// JSON object of extension to color, e.g. '{"ts": "#3178c6"}'
    #[arg(long = "file-colors", value_name = "JSON")]
    file_colors: Option<String>,

    /// Canvas width
    #[arg(long, default_value = "1000")]
    width: f64,

    /// Canvas height
    #[arg(long, default_value = "1000")]
    height: f64,

    /// Heading above the diagram (default: root name and total size)
    #[arg(long)]
    title: Option<String>,

    /// Do not draw text labels
    #[arg(long = "no-labels")]
    no_labels: bool,

    /// Number of parallel workers for scanning
    /// (0 = auto-detect, 1 = sequential, N = use N workers)
    #[arg(short = 'j', long = "jobs", default_value = "0")]
    jobs: usize,

    /// Print the scanned tree as JSON instead of drawing it
    #[arg(long = "json")]
    json: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("orchard={}", log_level)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let inputs = RawInputs {
        root_path: Some(args.path.to_string_lossy().to_string()),
        excluded_paths: Some(args.exclude.clone()),
        excluded_globs: Some(args.exclude_globs.clone()),
        max_depth: Some(args.max_depth.clone()),
        color_encoding: Some(args.color_encoding.clone()),
        file_colors: args.file_colors.clone(),
    };
    let mut config = DiagramConfig::from_inputs(&inputs).unwrap_or_else(|e| {
        eprintln!("orchard: {}", e);
        process::exit(1);
    });
    // An explicitly empty --exclude means "exclude nothing".
    if args.exclude.trim().is_empty() {
        config.walker.excluded_paths.clear();
    }
    config.walker.parallel_workers = args.jobs;
    config.width = args.width;
    config.height = args.height;
    config.output.title = args.title.clone();
    config.output.labels = !args.no_labels;

    let cancel = CancellationToken::new();

    if args.json {
        let (tree, warnings, _) = scan(&config, &cancel).unwrap_or_else(|e| {
            eprintln!("orchard: {}", e);
            process::exit(1);
        });
        if let Err(e) = print_json(&tree) {
            eprintln!("orchard: error writing output: {}", e);
            process::exit(1);
        }
        if let Err(e) = print_warnings(&warnings, should_use_color(args.color)) {
            eprintln!("orchard: error writing summary: {}", e);
            process::exit(1);
        }
        return;
    }

    let diagram = generate(&config, &cancel).unwrap_or_else(|e| {
        eprintln!("orchard: {}", e);
        process::exit(1);
    });

    let to_stdout = args.output.as_os_str() == "-";
    let written = if to_stdout {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(diagram.svg.as_bytes())
            .and_then(|_| stdout.flush())
    } else {
        fs::write(&args.output, &diagram.svg)
    };
    if let Err(e) = written {
        eprintln!("orchard: error writing output: {}", e);
        process::exit(1);
    }

    let destination = if to_stdout {
        "stdout".to_string()
    } else {
        args.output.display().to_string()
    };
    let summary = RunSummary {
        destination: &destination,
        nodes: diagram.tree.count(),
        total_bytes: diagram.tree.size_bytes,
        hidden: diagram.hidden,
        warnings: &diagram.warnings,
    };
    if let Err(e) = print_summary(&summary, should_use_color(args.color)) {
        eprintln!("orchard: error writing summary: {}", e);
        process::exit(1);
    }
}
