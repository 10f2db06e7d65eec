//! Interactive terminal session for the logistics dashboard.
//!
//! Loads the configured sheet once, prints the dashboard, then lets the user
//! change any of the four filters from a menu. Every change reruns the whole
//! filter → aggregate → render pass against the cached table.

use logidash::analysis::filter::FilterOptions;
use logidash::cache::SourceCache;
use logidash::config::DashboardConfig;
use logidash::logging::{self, LogLevel, LogSource};
use logidash::model::{
    COL_CARRIER, COL_LOADING_SITE, COL_PERIOD, COL_TRANSPORT_TYPE, Choice, FilterSelection,
    SENTINEL_ALL, SENTINEL_ALL_PERIODS, ShipmentTable,
};
use logidash::report::{self, DashboardView};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Filter dimensions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Dimension {
    LoadingSite,
    Carrier,
    Period,
    TransportType,
}

impl Dimension {
    fn label(self) -> &'static str {
        match self {
            Dimension::LoadingSite => COL_LOADING_SITE,
            Dimension::Carrier => COL_CARRIER,
            Dimension::Period => COL_PERIOD,
            Dimension::TransportType => COL_TRANSPORT_TYPE,
        }
    }

    fn sentinel(self) -> &'static str {
        match self {
            Dimension::Period => SENTINEL_ALL_PERIODS,
            _ => SENTINEL_ALL,
        }
    }

    fn options(self, options: &FilterOptions) -> &[String] {
        match self {
            Dimension::LoadingSite => &options.loading_sites,
            Dimension::Carrier => &options.carriers,
            Dimension::Period => &options.periods,
            Dimension::TransportType => &options.transport_types,
        }
    }

    fn slot(self, selection: &mut FilterSelection) -> &mut Choice {
        match self {
            Dimension::LoadingSite => &mut selection.loading_site,
            Dimension::Carrier => &mut selection.carrier,
            Dimension::Period => &mut selection.period,
            Dimension::TransportType => &mut selection.transport_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Session {
    config: DashboardConfig,
    cache: SourceCache,
    selection: FilterSelection,
}

impl Session {
    fn source_path(&self) -> PathBuf {
        PathBuf::from(&self.config.source.path)
    }

    fn load(&mut self) -> Result<Arc<ShipmentTable>, logidash::model::DashboardError> {
        let path = self.source_path();
        self.cache.get_or_load(&path, &self.config.source)
    }

    fn render(&self, table: &ShipmentTable) {
        let view = DashboardView::build(table, &self.selection);
        logging::info(LogSource::Report, None, &report::describe_view(&view));
        println!("{}", report::render_text(&view, &self.config.display));
    }

    fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let mut table = self.load()?;
        self.render(&table);

        let stdin = io::stdin();
        let mut input = stdin.lock();

        loop {
            print_menu(&self.selection);
            let Some(choice) = read_line(&mut input)? else {
                break;
            };

            match choice.as_str() {
                "1" => self.pick(&mut input, &table, Dimension::LoadingSite)?,
                "2" => self.pick(&mut input, &table, Dimension::Carrier)?,
                "3" => self.pick(&mut input, &table, Dimension::Period)?,
                "4" => self.pick(&mut input, &table, Dimension::TransportType)?,
                "5" => self.selection = FilterSelection::all(),
                "6" => {
                    let view = DashboardView::build(&table, &self.selection);
                    println!("{}", report::to_json(&view)?);
                    continue;
                }
                "7" => {
                    let path = self.source_path();
                    self.cache.invalidate(&path);
                    table = self.load()?;
                }
                "0" | "q" | "Q" => break,
                _ => {
                    println!("Choix invalide.\n");
                    continue;
                }
            }
            self.render(&table);
        }

        println!("Au revoir.");
        Ok(())
    }

    /// Lists the options of one dimension and applies the user's pick.
    /// An invalid number leaves the selection unchanged.
    fn pick(
        &mut self,
        input: &mut impl BufRead,
        table: &ShipmentTable,
        dimension: Dimension,
    ) -> io::Result<()> {
        let options = FilterOptions::from_table(table);
        let labels = dimension.options(&options);

        println!("\n{} :", dimension.label());
        for (i, label) in labels.iter().enumerate() {
            println!("  [{}] {}", i, label);
        }

        let Some(answer) = read_line(input)? else {
            return Ok(());
        };
        match answer.parse::<usize>().ok().and_then(|i| labels.get(i)) {
            Some(label) => {
                *dimension.slot(&mut self.selection) = Choice::from_label(label, dimension.sentinel());
            }
            None => println!("Choix invalide, filtre inchangé."),
        }
        Ok(())
    }
}

fn print_menu(selection: &FilterSelection) {
    let current = |dimension: Dimension, choice: &Choice| {
        format!("{} = {}", dimension.label(), choice.label(dimension.sentinel()))
    };
    println!("Filtres :");
    println!("  [1] {}", current(Dimension::LoadingSite, &selection.loading_site));
    println!("  [2] {}", current(Dimension::Carrier, &selection.carrier));
    println!("  [3] {}", current(Dimension::Period, &selection.period));
    println!("  [4] {}", current(Dimension::TransportType, &selection.transport_type));
    println!("  [5] Réinitialiser les filtres");
    println!("  [6] Exporter la vue en JSON");
    println!("  [7] Recharger le fichier source");
    println!("  [0] Quitter");
}

/// Prompts and reads one trimmed line. `None` on end of input.
fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    print!("Votre choix : ");
    io::stdout().flush()?;

    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

fn main() -> ExitCode {
    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Erreur : {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = config.logging.min_level().unwrap_or(LogLevel::Info);
    logging::init_logger(level, config.logging.file.as_deref(), config.logging.timestamps);
    logging::debug(
        LogSource::System,
        None,
        &format!("source: {}", config.source.path),
    );

    let mut session = Session {
        config,
        cache: SourceCache::new(),
        selection: FilterSelection::all(),
    };

    match session.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::log_fatal(LogSource::System, None, e.as_ref());
            eprintln!("Erreur : {}", e);
            ExitCode::FAILURE
        }
    }
}
