use std::path::PathBuf;

use clap::Args;
use countdown_core::{Config, EventStore, Exporter, StylePicker, Theme, Typeface};

#[derive(Args)]
pub struct ExportArgs {
    /// Event id
    pub id: String,
    /// Color theme: indigo, slate, rose, emerald, white
    #[arg(long)]
    pub theme: Option<Theme>,
    /// Typeface: modern, classic, tech
    #[arg(long)]
    pub typeface: Option<Typeface>,
    /// Output directory (defaults to export.output_dir, then the current directory)
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = EventStore::open()?;
    let event = store
        .get(&args.id)
        .ok_or_else(|| format!("no event with id '{}'", args.id))?;

    let mut picker = StylePicker::new(config.export.theme, config.export.typeface);
    picker.toggle();
    if let Some(theme) = args.theme {
        picker.select_theme(theme);
    }
    if let Some(typeface) = args.typeface {
        picker.select_typeface(typeface);
    }
    let (theme, typeface) = picker.take_selection();

    let dir = match args.out {
        Some(dir) => dir,
        None if !config.export.output_dir.is_empty() => PathBuf::from(&config.export.output_dir),
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&dir)?;

    let mut exporter = Exporter::new(&config.export, &config.display);
    let path = exporter.export_to_dir(event, theme, typeface, &dir)?;
    println!("{}", path.display());
    Ok(())
}
