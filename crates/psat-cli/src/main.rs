//! PSAT CLI
//!
//! Inspect a tab state exported from the extension's cookie store: list its
//! frames, print a frame's filter catalog, and run filter selections against
//! it the same way the DevTools panel does.

mod tab;

use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use ts_rs::TS;

use psat_core::overlay::IframeCandidate;
use psat_core::{psl, FilterManagementStore, FilterState, HoverMessage, OverlayPlan, PsApiKey, TabState};

#[derive(Parser)]
#[command(name = "psat-cli")]
#[command(about = "Privacy Sandbox Analysis Tool cookie filtering tools")]
struct Cli {
    /// Public suffix list used for first/third-party classification
    #[arg(long, global = true)]
    psl: Option<String>,

    /// Log recomputation and selection changes
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List frames with the number of cookies each one sees
    Frames {
        /// Exported tab state (JSON)
        #[arg(short, long)]
        input: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the filter catalog of a frame
    Filters {
        /// Exported tab state (JSON)
        #[arg(short, long)]
        input: String,

        /// Frame key (defaults to the exported selected frame)
        #[arg(short, long)]
        frame: Option<String>,
    },

    /// List the cookies of a frame passing a filter selection
    Cookies {
        /// Exported tab state (JSON)
        #[arg(short, long)]
        input: String,

        /// Frame key (defaults to the exported selected frame)
        #[arg(short, long)]
        frame: Option<String>,

        /// Selected value as `key=value`; repeat to select more
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Case-insensitive cookie name search
        #[arg(short, long, default_value = "")]
        search: String,

        /// Print the full panel state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write TypeScript definitions for the panel's data types
    ExportTypes {
        /// Output directory
        #[arg(short, long, default_value = "bindings")]
        out: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = init_suffix_list(cli.psl.as_deref()).and_then(|()| match cli.command {
        Commands::Frames { input, json } => cmd_frames(&input, json),
        Commands::Filters { input, frame } => cmd_filters(&input, frame),
        Commands::Cookies {
            input,
            frame,
            filters,
            search,
            json,
        } => cmd_cookies(&input, frame, &filters, &search, json),
        Commands::ExportTypes { out } => cmd_export_types(&out),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn init_suffix_list(path: Option<&str>) -> Result<(), String> {
    let Some(path) = path else {
        return Ok(());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path, e))?;
    psl::init_psl(&text).map_err(|e| e.to_string())
}

fn cmd_frames(input: &str, json: bool) -> Result<(), String> {
    let tab = tab::load_tab(input)?;
    let frames = tab::frame_summaries(&tab);

    if json {
        let text = serde_json::to_string_pretty(&frames).map_err(|e| e.to_string())?;
        println!("{text}");
    } else {
        print!("{}", tab::format_frames(&frames));
    }
    Ok(())
}

fn cmd_filters(input: &str, frame: Option<String>) -> Result<(), String> {
    let tab = tab::with_frame(tab::load_tab(input)?, frame);
    let store = FilterManagementStore::with_tab_state(tab);

    let Some(frame) = store.selected_frame() else {
        return Err("No frame selected; pass --frame".to_string());
    };
    println!("Frame: {frame}");
    println!("  Cookies: {}", store.scoped_cookies().len());
    println!();
    print!("{}", tab::format_catalog(&store.filters()));
    Ok(())
}

fn cmd_cookies(
    input: &str,
    frame: Option<String>,
    filters: &[String],
    search: &str,
    json: bool,
) -> Result<(), String> {
    let selected = tab::parse_filters(filters)?;
    let tab = tab::with_frame(tab::load_tab(input)?, frame);
    let mut store = FilterManagementStore::with_tab_state(tab);
    if store.selected_frame().is_none() {
        return Err("No frame selected; pass --frame".to_string());
    }
    store.set_selected_filters(|_| selected);
    store.set_search_term(search);

    if json {
        let text = serde_json::to_string_pretty(&store.state()).map_err(|e| e.to_string())?;
        println!("{text}");
        return Ok(());
    }

    let cookies = store.filtered_cookies();
    print!("{}", tab::format_cookies(&cookies, &store.site()));
    println!();
    println!("{} of {} cookies", cookies.len(), store.scoped_cookies().len());
    Ok(())
}

fn cmd_export_types(out: &str) -> Result<(), String> {
    let dir = Path::new(out);
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create '{}': {}", out, e))?;

    let export = |result: Result<(), ts_rs::ExportError>| result.map_err(|e| e.to_string());
    export(FilterState::export_all_to(dir))?;
    export(TabState::export_all_to(dir))?;
    export(HoverMessage::export_all_to(dir))?;
    export(IframeCandidate::export_all_to(dir))?;
    export(OverlayPlan::export_all_to(dir))?;
    export(PsApiKey::export_all_to(dir))?;

    println!("Wrote TypeScript bindings to '{}'", out);
    Ok(())
}
