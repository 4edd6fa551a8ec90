mod logger;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use logger::StderrLogger;
use pdf_recompose::{MergeOptions, PageSpec, Session, SplitMode, SplitOptions};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdfr", about = "Merge, reorder, rotate and split PDF pages", version)]
struct Cli {
    /// More log output (repeat for debug and trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge pages of one or more PDFs into a single file
    Merge {
        /// Input PDF file(s) - can specify multiple
        #[arg(short, long, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long, required_unless_present = "check")]
        output: Option<PathBuf>,

        /// Page layout, e.g. "1:1,2:3@90" (FILE:PAGE[@DEGREES], 1-based)
        #[arg(long, value_delimiter = ',')]
        pages: Vec<PageSpec>,

        /// Load inputs and layout from a JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective inputs and layout to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Show the page list and advisories only, don't write a PDF
        #[arg(long)]
        check: bool,
    },

    /// Split one PDF into several files
    Split {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        mode: SplitArgs,
    },

    /// Show page counts, page sizes and advisories
    Info {
        /// Input PDF file(s)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct SplitArgs {
    /// Comma-separated page ranges, e.g. "1-2,3-5"; one file per range
    #[arg(long)]
    ranges: Option<String>,

    /// One file per page
    #[arg(long)]
    individual: bool,

    /// Pages to extract into a single file, e.g. "1,3"
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<usize>>,
}

impl From<SplitArgs> for SplitMode {
    fn from(args: SplitArgs) -> Self {
        if let Some(ranges) = args.ranges {
            SplitMode::Ranges(ranges)
        } else if let Some(pages) = args.select {
            SplitMode::Selection(pages)
        } else {
            SplitMode::Individual
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    StderrLogger::new(StderrLogger::level_for(cli.verbose, cli.quiet)).init()?;

    match cli.command {
        Commands::Merge {
            input,
            output,
            pages,
            config,
            save_config,
            check,
        } => {
            let mut options = match config {
                Some(path) => MergeOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => MergeOptions::default(),
            };
            if !input.is_empty() {
                options.input_files = input;
            }
            if !pages.is_empty() {
                options.pages = pages;
            }
            options.validate()?;

            if let Some(path) = save_config {
                options.save(&path).await?;
                println!("Saved layout → {}", path.display());
            }

            let session = Session::from_merge_options(&options).await?;
            println!("Pages: {}", session.catalog().len());
            for advisory in session.advisories() {
                println!("  Note: {}", advisory);
            }

            if check {
                for (position, page) in session.list_pages().iter().enumerate() {
                    println!(
                        "  {:>4}  {} p.{} ({}°)",
                        position + 1,
                        page.source_label,
                        page.preview.page_index + 1,
                        page.rotation.degrees()
                    );
                }
                return Ok(());
            }

            let Some(output) = output else {
                bail!("No output file given");
            };
            let bytes = session.assemble().await?;
            pdf_recompose::save_pdf_bytes(&bytes, &output).await?;
            println!("Merged → {}", output.display());
        }

        Commands::Split {
            input,
            output,
            mode,
        } => {
            let options = SplitOptions {
                input_file: input,
                mode: mode.into(),
            };
            let outputs = Session::split(&options).await?;

            tokio::fs::create_dir_all(&output).await?;
            let stem = file_stem(&options.input_file);
            let mut failed = 0;
            for (n, result) in outputs.into_iter().enumerate() {
                let path = output.join(format!("{}-part-{}.pdf", stem, n + 1));
                match result {
                    Ok(bytes) => {
                        pdf_recompose::save_pdf_bytes(&bytes, &path).await?;
                        println!("Wrote {}", path.display());
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("Part {} failed: {}", n + 1, e);
                    }
                }
            }
            if failed > 0 {
                bail!("{} part(s) could not be written", failed);
            }
        }

        Commands::Info { input } => {
            let mut session = Session::new();
            for path in &input {
                let bytes = pdf_recompose::load_pdf_bytes(path).await?;
                let id = session
                    .add_source(bytes, pdf_recompose::display_name(path))
                    .await?;
                let source = session.registry().resolve(id).await?;

                println!("{}: {} pages", source.name(), source.page_count());
                for index in 0..source.page_count() {
                    let (width, height) = source.page_geometry(index)?.rounded();
                    let rotate = source.page_rotation(index)?;
                    println!("  {:>4}  {} x {} pt, rotate {}", index + 1, width, height, rotate);
                }
            }
            for advisory in session.advisories() {
                println!("Note: {}", advisory);
            }
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}
