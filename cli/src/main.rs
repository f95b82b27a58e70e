//! pdfmd CLI - convert PDF documents to Markdown

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmd::{
    ConvertOptions, ConverterRegistry, ExtractionStats, HeaderSeparator, OutputFormat,
    PageSelection, ParseOptions, RenderOptions,
};

#[derive(Parser)]
#[command(name = "pdfmd")]
#[command(version)]
#[command(about = "Convert PDF documents to Markdown", long_about = None)]
struct Cli {
    /// Input files
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Output file or directory
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,

    /// Group elements into one line when their baselines differ by less
    /// than this fraction of the font size
    #[arg(long, value_name = "RATIO")]
    tolerance: Option<f64>,

    /// Where to write the `| --- |` row under table headers
    #[arg(long, value_enum, default_value = "first-line")]
    table_headers: TableHeaders,

    /// Print extraction statistics
    #[arg(long)]
    stats: bool,

    /// Write the classified layout as JSON instead of Markdown
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableHeaders {
    /// Only when a table opens the page
    FirstLine,
    /// After the first row of every table
    Each,
}

impl From<TableHeaders> for HeaderSeparator {
    fn from(mode: TableHeaders) -> Self {
        match mode {
            TableHeaders::FirstLine => HeaderSeparator::FirstPageLine,
            TableHeaders::Each => HeaderSeparator::EachTable,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(cli)?;
    let registry = ConverterRegistry::with_defaults();
    let extension = if cli.json { "json" } else { "md" };

    let pb = if cli.files.len() > 1 && !cli.verbose {
        let pb = ProgressBar::new(cli.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut total = ExtractionStats::new();
    for input in &cli.files {
        if let Some(ref pb) = pb {
            pb.set_message(input.display().to_string());
        }
        log::info!("Processing: {}", input.display());

        let output = output_path(input, cli.output.as_deref(), extension);
        let stats = convert_file(&registry, input, &output, &options)
            .map_err(|e| format!("failed to convert {}: {}", input.display(), e))?;
        if let Some(stats) = stats {
            total.merge(&stats);
        }

        log::info!("Output: {}", output.display());
        match pb {
            Some(ref pb) => pb.inc(1),
            None => println!("{} {}", "Saved to".green(), output.display()),
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done!");
    }

    if cli.stats {
        println!();
        println!("{}", "Extraction Statistics".cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
        println!("{}", serde_json::to_string_pretty(&total)?);
    }

    Ok(())
}

fn build_options(cli: &Cli) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
    let page_selection = if let Some(ref p) = cli.pages {
        PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?
    } else {
        PageSelection::All
    };

    let mut parse = ParseOptions::new().with_pages(page_selection);
    if let Some(ratio) = cli.tolerance {
        if !ratio.is_finite() || ratio < 0.0 {
            return Err(format!("Invalid tolerance: {}", ratio).into());
        }
        parse = parse.with_tolerance(ratio);
    }

    let render = RenderOptions::new().with_header_separator(cli.table_headers.into());
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Markdown
    };

    Ok(ConvertOptions::new()
        .with_parse_options(parse)
        .with_render_options(render)
        .with_stats(cli.stats)
        .with_format(format))
}

fn convert_file(
    registry: &ConverterRegistry,
    input: &Path,
    output: &Path,
    options: &ConvertOptions,
) -> Result<Option<ExtractionStats>, Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("input file does not exist: {}", input.display()).into());
    }

    let converter = registry.converter_for(input)?;
    log::debug!("Detected file type: {}", converter.name());

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let result = registry.convert(input, options)?;
    fs::write(output, &result.content)?;
    Ok(result.stats)
}

/// Where the converted file for `input` is written.
///
/// Without `-o` the file lands in the current directory; an existing
/// directory receives `<stem>.<extension>`; anything else is used verbatim.
fn output_path(input: &Path, output: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = PathBuf::from(format!("{}.{}", stem, extension));

    match output {
        None => file_name,
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_defaults_to_current_dir() {
        let path = output_path(Path::new("docs/report.pdf"), None, "md");
        assert_eq!(path, PathBuf::from("report.md"));
    }

    #[test]
    fn test_output_path_into_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = output_path(Path::new("in/report.v2.pdf"), Some(dir.path()), "md");
        assert_eq!(path, dir.path().join("report.v2.md"));
    }

    #[test]
    fn test_output_path_literal_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("custom.markdown");
        let path = output_path(Path::new("report.pdf"), Some(&target), "md");
        assert_eq!(path, target);
    }

    #[test]
    fn test_output_path_json_extension() {
        let path = output_path(Path::new("report.pdf"), None, "json");
        assert_eq!(path, PathBuf::from("report.json"));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.pdf");
        let output = dir.path().join("missing.md");
        let err = convert_file(
            &ConverterRegistry::with_defaults(),
            &input,
            &output,
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(!output.exists());
    }

    #[test]
    fn test_unsupported_extension_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        fs::write(&input, "hello").unwrap();
        let err = convert_file(
            &ConverterRegistry::with_defaults(),
            &input,
            &dir.path().join("notes.md"),
            &ConvertOptions::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Unsupported file type: txt"));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "pdfmd",
            "a.pdf",
            "b.pdf",
            "-o",
            "out",
            "-v",
            "--pages",
            "1-3",
            "--table-headers",
            "each",
        ])
        .unwrap();
        assert_eq!(cli.files.len(), 2);
        assert!(cli.verbose);
        assert!(cli.table_headers == TableHeaders::Each);

        let options = build_options(&cli).unwrap();
        assert_eq!(options.render.header_separator, HeaderSeparator::EachTable);
        assert!(options.parse.pages.includes(3));
        assert!(!options.parse.pages.includes(4));
    }

    #[test]
    fn test_cli_requires_files() {
        assert!(Cli::try_parse_from(["pdfmd"]).is_err());
    }
}
