//! unhwp CLI - HWP content extraction tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use unhwp::{DecodeOptions, Hwp, JsonFormat};

#[derive(Parser)]
#[command(name = "unhwp")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract text, structure, and images from HWP documents", long_about = None)]
struct Cli {
    /// Input HWP file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Give up decoding after this many seconds
    #[arg(long, global = true, env = "UNHWP_TIMEOUT")]
    timeout: Option<u64>,

    /// NFC-normalise extracted text
    #[arg(long, global = true)]
    normalize: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert HWP to text, JSON, and extracted images
    Convert {
        /// Input HWP file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Extract plain text
    Text {
        /// Input HWP file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the decoded document as JSON
    Json {
        /// Input HWP file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information and decode issues
    Info {
        /// Input HWP file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract images from BinData
    Extract {
        /// Input HWP file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let options = decode_options(cli.timeout, cli.normalize);

    let result = match cli.command {
        Some(Commands::Convert { input, output }) => cmd_convert(&input, output.as_deref(), options),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref(), options),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact, options),
        Some(Commands::Info { input }) => cmd_info(&input, options),
        Some(Commands::Extract { input, output }) => cmd_extract(&input, output.as_deref(), options),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), options)
            } else {
                println!("{}", "Usage: unhwp <FILE> [OUTPUT]".yellow());
                println!("       unhwp --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn decode_options(timeout: Option<u64>, normalize: bool) -> DecodeOptions {
    let mut options = DecodeOptions::new().with_normalized_text(normalize);
    if let Some(secs) = timeout {
        options = options.with_timeout(Duration::from_secs(secs));
    }
    options
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn report_issues(hwp: &Hwp) {
    for issue in hwp.issues() {
        eprintln!("{}: {}", "warning".yellow(), issue);
    }
}

fn cmd_convert(input: &Path, output: Option<&Path>, options: DecodeOptions) -> CliResult {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Decoding HWP...");
    let hwp = Hwp::open_with_options(input, options)?;
    pb.inc(1);

    pb.set_message("Extracting images...");
    let images_dir = output_dir.join("images");
    let count = save_images(&hwp, &images_dir)?;
    pb.inc(1);

    pb.set_message("Writing text and JSON...");
    fs::write(output_dir.join("extract.txt"), hwp.text())?;
    fs::write(
        output_dir.join("content.json"),
        hwp.to_json(JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.finish_with_message("Done!");
    report_issues(&hwp);

    println!("\n{}", "Output files:".green().bold());
    println!("  {} extract.txt", "├─".dimmed());
    println!("  {} content.json", "├─".dimmed());
    println!("  {} images/ ({} files)", "└─".dimmed(), count);

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>, options: DecodeOptions) -> CliResult {
    let hwp = Hwp::open_with_options(input, options)?;
    report_issues(&hwp);
    write_or_print(output, &hwp.text())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: DecodeOptions,
) -> CliResult {
    let hwp = Hwp::open_with_options(input, options)?;
    report_issues(&hwp);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_or_print(output, &hwp.to_json(format)?)
}

fn cmd_info(input: &Path, options: DecodeOptions) -> CliResult {
    let hwp = Hwp::open_with_options(input, options)?;
    let doc = hwp.document();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    match hwp.header() {
        Some(header) => {
            println!("{}: HWP {}", "Format".bold(), header.version);
            let compressed = match header.compressed {
                Some(true) => "Yes",
                Some(false) => "No",
                None => "Unknown",
            };
            println!("{}: {}", "Compressed".bold(), compressed);
            println!(
                "{}: {}",
                "Encrypted".bold(),
                if header.encrypted { "Yes" } else { "No" }
            );
            println!(
                "{}: {}",
                "Distribution".bold(),
                if header.distributable { "Yes" } else { "No" }
            );
        }
        None => println!("{}: unknown (no FileHeader)", "Format".bold()),
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let text = hwp.text();
    println!("{}: {}", "Sections".bold(), doc.section_count);
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Tables".bold(), doc.table_count());
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());
    println!("{}: {}", "Characters".bold(), text.chars().count());
    println!("{}: {}", "Attachments".bold(), hwp.attachment_count());
    println!("{}: {}", "Images".bold(), hwp.images().len());

    let styles = hwp.styles();
    println!();
    println!("{}", "Style Catalog".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Fonts".bold(), styles.face_names.len());
    println!("{}: {}", "Character shapes".bold(), styles.char_shapes.len());
    println!("{}: {}", "Paragraph shapes".bold(), styles.para_shapes.len());
    println!("{}: {}", "Border fills".bold(), styles.border_fills.len());
    println!("{}: {}", "Named styles".bold(), styles.styles.len());

    if !hwp.issues().is_empty() {
        println!();
        println!("{}", "Issues".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for issue in hwp.issues() {
            println!("  {} {}", "•".dimmed(), issue);
        }
    }

    Ok(())
}

fn cmd_extract(input: &Path, output: Option<&Path>, options: DecodeOptions) -> CliResult {
    let hwp = Hwp::open_with_options(input, options)?;

    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let count = save_images(&hwp, &output_dir)?;

    println!("\n{} {} images extracted", "Done!".green().bold(), count);
    Ok(())
}

fn save_images(hwp: &Hwp, dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let mut count = 0;
    for index in 0..hwp.images().len() {
        let Some(image) = hwp.image(index) else {
            continue;
        };
        fs::write(dir.join(&image.name), &image.data)?;
        log::info!("Extracted {} ({} bytes)", image.name, image.size());
        count += 1;
    }
    Ok(count)
}

fn cmd_version() {
    println!("{} {}", "unhwp".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("HWP content extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unhwp".dimmed());
    println!("License: MIT");
}
