//! gantty CLI: Command-line interface for the timeline chart builder

use clap::{Parser, Subcommand};
use gantty_core::{
    build_options, build_series, parse_document, serialize_document, ChartOptions, DataStore,
    FileStore, MonthYear, TimelineRow,
};
use std::path::{Path, PathBuf};

/// Timeline range-bar chart builder with TUI
#[derive(Parser)]
#[command(name = "gantty")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding stored rows and settings
    #[arg(long, global = true, default_value = ".gantty")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the TUI editor (default when no command specified)
    Tui,

    /// Print stored settings and rows
    Show {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Append a row to the stored list
    Add {
        /// Row name (the bar label)
        #[arg(long)]
        name: String,

        /// Comment shown with the bar
        #[arg(long)]
        comment: Option<String>,

        /// Start month as MM.YYYY
        #[arg(long)]
        start: Option<String>,

        /// End month as MM.YYYY
        #[arg(long)]
        end: Option<String>,
    },

    /// Remove a stored row
    Remove {
        /// 1-based row number (default: the last row)
        #[arg(long)]
        index: Option<usize>,
    },

    /// Update stored chart settings
    Set {
        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Chart height in pixels
        #[arg(long)]
        height: Option<String>,

        /// Chart width in pixels
        #[arg(long)]
        width: Option<String>,
    },

    /// Replace stored rows and settings from an exchange file
    Import {
        /// File in the title,height,width / name,comment,start,end format
        file: PathBuf,
    },

    /// Write stored rows and settings as exchange text
    Export {
        /// Output file (default: stdout)
        file: Option<PathBuf>,
    },

    /// Print the chart configuration as JSON
    Render {
        /// Color palette (palette1 through palette10)
        #[arg(long)]
        palette: Option<String>,

        /// Show value labels on the bars
        #[arg(long)]
        labels: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Delete stored data
    Clear {
        /// Clear only the stored rows
        #[arg(long)]
        rows: bool,

        /// Clear only the stored settings
        #[arg(long)]
        settings: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // The TUI owns the terminal; only line commands log to stderr.
    if !matches!(cli.command, None | Some(Commands::Tui)) {
        init_logging();
    }

    match cli.command {
        None | Some(Commands::Tui) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            if let Err(e) = rt.block_on(gantty_tui::run_tui(&cli.data_dir)) {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Show { json }) => {
            cmd_show(&cli.data_dir, json);
        }
        Some(Commands::Add {
            name,
            comment,
            start,
            end,
        }) => {
            cmd_add(&cli.data_dir, name, comment, start, end);
        }
        Some(Commands::Remove { index }) => {
            cmd_remove(&cli.data_dir, index);
        }
        Some(Commands::Set {
            title,
            height,
            width,
        }) => {
            cmd_set(&cli.data_dir, title, height, width);
        }
        Some(Commands::Import { file }) => {
            cmd_import(&cli.data_dir, &file);
        }
        Some(Commands::Export { file }) => {
            cmd_export(&cli.data_dir, file.as_deref());
        }
        Some(Commands::Render {
            palette,
            labels,
            pretty,
        }) => {
            cmd_render(&cli.data_dir, palette, labels, pretty);
        }
        Some(Commands::Clear { rows, settings }) => {
            cmd_clear(&cli.data_dir, rows, settings);
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(data_dir: &Path) -> DataStore<FileStore> {
    match FileStore::new(data_dir) {
        Ok(kv) => DataStore::new(kv),
        Err(e) => {
            eprintln!("Failed to open {}: {e}", data_dir.display());
            std::process::exit(1);
        }
    }
}

fn cmd_show(data_dir: &Path, json: bool) {
    let store = open_store(data_dir);

    let settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    let rows = match store.load_rows() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Failed to load rows: {e}");
            std::process::exit(1);
        }
    };

    if json {
        let output = serde_json::json!({
            "settings": {
                "title": settings.title,
                "height": settings.height,
                "width": settings.width,
            },
            "rows": rows,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("failed to serialize")
        );
        return;
    }

    println!(
        "{} ({} x {} px)\n",
        settings.title, settings.width, settings.height
    );

    match rows {
        Some(rows) if !rows.is_empty() => {
            for (index, row) in rows.iter().enumerate() {
                let mut line = format!(
                    "  {:>3}  {:<24} {:>7} - {:<7}",
                    index + 1,
                    row.name,
                    row.start_time,
                    row.end_time
                );
                if !row.comment.is_empty() {
                    line.push_str("  ");
                    line.push_str(&row.comment);
                }
                println!("{}", line.trim_end());
            }
            println!("\n{} row(s) stored", rows.len());
        }
        _ => println!("No stored rows"),
    }
}

fn cmd_add(
    data_dir: &Path,
    name: String,
    comment: Option<String>,
    start: Option<String>,
    end: Option<String>,
) {
    let start = normalize_date_arg("start", start);
    let end = normalize_date_arg("end", end);

    let mut store = open_store(data_dir);
    let mut rows = match store.load_rows() {
        Ok(rows) => rows.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to load rows: {e}");
            std::process::exit(1);
        }
    };

    rows.push(TimelineRow::new(
        name,
        comment.unwrap_or_default(),
        start,
        end,
    ));

    if let Err(e) = store.save_rows(&rows) {
        eprintln!("Failed to save rows: {e}");
        std::process::exit(1);
    }
    println!("Added row {}", rows.len());
}

/// Absent or empty dates pass through; anything else must be a valid
/// `MM.YYYY` month and comes back zero-padded.
fn normalize_date_arg(which: &str, value: Option<String>) -> String {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        return String::new();
    }
    match MonthYear::parse(&value) {
        Ok(my) => my.to_string(),
        Err(_) => {
            eprintln!("Error: {which} date must be MM.YYYY, got: {value}");
            std::process::exit(1);
        }
    }
}

fn cmd_remove(data_dir: &Path, index: Option<usize>) {
    let mut store = open_store(data_dir);
    let mut rows = match store.load_rows() {
        Ok(Some(rows)) if !rows.is_empty() => rows,
        Ok(_) => {
            eprintln!("No stored rows");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to load rows: {e}");
            std::process::exit(1);
        }
    };

    // The row list never drops below one entry.
    if rows.len() == 1 {
        eprintln!("The last remaining row cannot be removed");
        std::process::exit(1);
    }

    let removed = match index {
        Some(0) => {
            eprintln!("Error: row numbers start at 1");
            std::process::exit(1);
        }
        Some(n) if n > rows.len() => {
            eprintln!("Error: no row {n}, the list has {} rows", rows.len());
            std::process::exit(1);
        }
        Some(n) => rows.remove(n - 1),
        None => rows.remove(rows.len() - 1),
    };

    if let Err(e) = store.save_rows(&rows) {
        eprintln!("Failed to save rows: {e}");
        std::process::exit(1);
    }

    if removed.name.is_empty() {
        println!("Removed 1 row ({} remain)", rows.len());
    } else {
        println!("Removed {} ({} remain)", removed.name, rows.len());
    }
}

fn cmd_set(
    data_dir: &Path,
    title: Option<String>,
    height: Option<String>,
    width: Option<String>,
) {
    if title.is_none() && height.is_none() && width.is_none() {
        eprintln!("Nothing to set; pass --title, --height or --width");
        std::process::exit(1);
    }

    let mut store = open_store(data_dir);
    let mut settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };

    if let Some(title) = title {
        settings.title = title;
    }
    if let Some(height) = height {
        settings.height = height;
    }
    if let Some(width) = width {
        settings.width = width;
    }

    if let Err(e) = settings.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    if let Err(e) = store.save_settings(&settings) {
        eprintln!("Failed to save settings: {e}");
        std::process::exit(1);
    }
    println!(
        "Saved settings: {}, {} x {} px",
        settings.title, settings.width, settings.height
    );
}

fn cmd_import(data_dir: &Path, file: &Path) {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", file.display());
            std::process::exit(1);
        }
    };

    let doc = match parse_document(&text) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Import failed: {e}");
            std::process::exit(1);
        }
    };

    let mut store = open_store(data_dir);
    let mut settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    doc.apply_to_settings(&mut settings);

    if let Err(e) = store.save_settings(&settings) {
        eprintln!("Failed to save settings: {e}");
        std::process::exit(1);
    }
    if let Err(e) = store.save_rows(&doc.rows) {
        eprintln!("Failed to save rows: {e}");
        std::process::exit(1);
    }
    println!("Imported {} rows from {}", doc.rows.len(), file.display());
}

fn cmd_export(data_dir: &Path, file: Option<&Path>) {
    let store = open_store(data_dir);

    let settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    let rows = match store.load_rows() {
        Ok(rows) => rows.unwrap_or_default(),
        Err(e) => {
            eprintln!("Failed to load rows: {e}");
            std::process::exit(1);
        }
    };

    let text = match serialize_document(&settings, &rows) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Export failed: {e}");
            std::process::exit(1);
        }
    };

    match file {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &text) {
                eprintln!("Failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
            println!("Exported {} rows to {}", rows.len(), path.display());
        }
        None => println!("{text}"),
    }
}

fn cmd_render(data_dir: &Path, palette: Option<String>, labels: bool, pretty: bool) {
    let store = open_store(data_dir);

    let mut settings = match store.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e}");
            std::process::exit(1);
        }
    };
    if let Some(palette) = palette {
        settings.palette = palette;
    }
    if labels {
        settings.show_labels = true;
    }
    if let Err(e) = settings.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let rows = match store.load_rows() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Failed to load rows: {e}");
            std::process::exit(1);
        }
    };

    let mut options = ChartOptions::default();
    options.apply_patch(&build_options(&settings));
    // A store that never saved rows keeps the placeholder series.
    if let Some(rows) = rows {
        options.replace_series_data(build_series(&rows));
    }

    let json = if pretty {
        serde_json::to_string_pretty(&options)
    } else {
        serde_json::to_string(&options)
    };
    println!("{}", json.expect("failed to serialize"));
}

fn cmd_clear(data_dir: &Path, rows: bool, settings: bool) {
    let mut store = open_store(data_dir);

    let result = if rows && !settings {
        store.clear_rows().map(|()| "Cleared stored rows")
    } else if settings && !rows {
        store.clear_settings().map(|()| "Cleared stored settings")
    } else {
        store.clear_all().map(|()| "Cleared all stored data")
    };

    match result {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Failed to clear: {e}");
            std::process::exit(1);
        }
    }
}
