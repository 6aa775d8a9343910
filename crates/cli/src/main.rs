//! CLI tool for generating slide decks from a topic.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use slides_core::{
    GenerateRequest, GenerationReport, Generator, ImagePlacement, ImageSearch, LayoutConfig,
    Orientation, ScriptSource,
};
use slides_pptx::{open_deck, PackageSummary, PptxParser, PptxWriter};
use slides_services::{
    openai, unsplash, HttpImageFetcher, OpenAiConfig, OpenAiScriptSource, UnsplashConfig,
    UnsplashImageSearch,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Generate PowerPoint decks from a topic with a language model and stock photos.
#[derive(Parser, Debug)]
#[command(name = "autoslides")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// PPTX template whose slide size new decks inherit
    #[arg(long, global = true, env = "SLIDE_TEMPLATE")]
    template: Option<PathBuf>,

    /// Directory decks are written to
    #[arg(long, global = true, env = "SLIDES_OUT_DIR", default_value = "slides")]
    out_dir: PathBuf,

    /// Share of the slide width given to the bullet column
    #[arg(long, global = true, default_value_t = 0.55)]
    left_ratio: f64,

    /// OpenAI API key
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// OpenAI API base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL", default_value = openai::DEFAULT_BASE_URL, hide = true)]
    openai_base_url: String,

    /// Unsplash access key
    #[arg(long, global = true, env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    unsplash_key: Option<String>,

    /// Unsplash API base URL
    #[arg(long, global = true, env = "UNSPLASH_BASE_URL", default_value = unsplash::DEFAULT_BASE_URL, hide = true)]
    unsplash_base_url: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a script, find images and export a deck
    Generate {
        /// What the deck is about
        topic: String,

        /// Number of slides (1-20)
        #[arg(short, long, default_value_t = 6)]
        slides: usize,

        /// Tone of the text (neutral, informal, inspiring...)
        #[arg(short, long, default_value = "neutral")]
        tone: String,

        /// Images per slide (0-4)
        #[arg(short, long, default_value_t = 1)]
        images_per_slide: usize,

        /// Image orientation: landscape, portrait or squarish
        #[arg(long)]
        orientation: Option<Orientation>,

        /// Output file name (default: the topic slug)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the script for a topic as JSON
    Script {
        /// What the deck is about
        topic: String,

        /// Number of slides (1-20)
        #[arg(short, long, default_value_t = 6)]
        slides: usize,

        /// Tone of the text
        #[arg(short, long, default_value = "neutral")]
        tone: String,
    },

    /// Print image URLs for a query
    Images {
        /// Search terms
        query: String,

        /// Number of URLs (1-50)
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Image orientation: landscape, portrait or squarish
        #[arg(long)]
        orientation: Option<Orientation>,
    },

    /// Show what a .pptx file contains
    Inspect {
        /// PowerPoint file to read
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Used when a deck has no images, so no search key is needed.
struct NoImageSearch;

impl ImageSearch for NoImageSearch {
    fn search_images(
        &self,
        _query: &str,
        _count: usize,
        _orientation: Option<Orientation>,
    ) -> slides_core::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Generate {
            topic,
            slides,
            tone,
            images_per_slide,
            orientation,
            output,
        } => {
            let request = GenerateRequest::new(topic.as_str())
                .with_slides(*slides)
                .with_tone(tone.as_str())
                .with_images_per_slide(*images_per_slide)
                .with_orientation(*orientation);
            let report = generate(&args, &request, output.as_deref())?;
            print_report(&report);
        }
        Command::Script {
            topic,
            slides,
            tone,
        } => {
            let script = script_source(&args)?
                .generate_script(topic, *slides, tone)
                .with_context(|| format!("Failed to write a script about '{}'", topic))?;
            println!("{}", serde_json::to_string_pretty(&script)?);
        }
        Command::Images {
            query,
            count,
            orientation,
        } => {
            let urls = image_search(&args)?
                .search_images(query, *count, *orientation)
                .with_context(|| format!("Image search for '{}' failed", query))?;
            for url in urls {
                println!("{}", url);
            }
        }
        Command::Inspect { input, json } => {
            let summary = inspect(input)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(input, &summary);
            }
        }
    }

    Ok(())
}

/// Run the full pipeline for `request`.
fn generate(args: &Args, request: &GenerateRequest, output: Option<&str>) -> Result<GenerationReport> {
    let layout = LayoutConfig::default().with_left_column_ratio(args.left_ratio);
    request.validate()?;
    layout.validate().context("Invalid --left-ratio")?;

    let deck = open_deck(args.template.as_deref()).context("Failed to open template")?;
    let scripts = script_source(args)?;
    let fetcher = HttpImageFetcher::new()?;
    let writer = PptxWriter::new().with_layout(layout);

    let unsplash_search;
    let search: &dyn ImageSearch = if request.images_per_slide > 0 {
        unsplash_search = image_search(args)?;
        &unsplash_search
    } else {
        &NoImageSearch
    };

    let mut generator = Generator::new(&scripts, search, &fetcher, &writer)
        .with_layout(layout)
        .with_out_dir(&args.out_dir);
    if let Some(output) = output {
        generator = generator.with_filename(output);
    }

    if args.verbose {
        eprintln!("Generating {} slides about '{}'", request.slides, request.topic);
    }

    generator
        .generate(request, deck)
        .with_context(|| format!("Failed to generate a deck about '{}'", request.topic))
}

fn script_source(args: &Args) -> Result<OpenAiScriptSource> {
    let key = args
        .openai_key
        .clone()
        .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set; get a key at https://platform.openai.com/"))?;
    let config = OpenAiConfig::new(key).with_base_url(args.openai_base_url.as_str());
    Ok(OpenAiScriptSource::new(config)?)
}

fn image_search(args: &Args) -> Result<UnsplashImageSearch> {
    let key = args.unsplash_key.clone().ok_or_else(|| {
        anyhow!("UNSPLASH_ACCESS_KEY is not set; create an app at https://unsplash.com/developers")
    })?;
    let config = UnsplashConfig::new(key).with_base_url(args.unsplash_base_url.as_str());
    Ok(UnsplashImageSearch::new(config)?)
}

/// Read a .pptx file back.
fn inspect(input_path: &Path) -> Result<PackageSummary> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    PptxParser::new()
        .parse(BufReader::new(file))
        .with_context(|| format!("Failed to read {}", input_path.display()))
}

fn print_report(report: &GenerationReport) {
    println!("{}", report.path.display());
    for (idx, slide) in report.slides.iter().enumerate() {
        let placed = slide.placements.iter().filter(|p| p.is_placed()).count();
        println!(
            "  {:>2}. {} ({}/{} images)",
            idx + 1,
            slide.title,
            placed,
            slide.placements.len()
        );
        for placement in &slide.placements {
            if let ImagePlacement::Skipped { url, reason, .. } = placement {
                println!("      skipped {}: {}", url, reason);
            }
        }
    }
}

fn print_summary(input_path: &Path, summary: &PackageSummary) {
    println!(
        "{}: {} slides, {} x {}",
        input_path.display(),
        summary.slides.len(),
        summary.canvas.width,
        summary.canvas.height
    );
    for (idx, slide) in summary.slides.iter().enumerate() {
        println!("{:>3}. {}", idx + 1, slide.title.replace('\n', " / "));
        for bullet in &slide.bullets {
            println!("     - {}", bullet.replace('\n', " / "));
        }
        if !slide.pictures.is_empty() {
            println!("     [{} pictures]", slide.pictures.len());
        }
        if let Some(notes) = &slide.notes {
            println!("     notes: {}", notes.replace('\n', " / "));
        }
    }
}
