use std::{fs::File, io::Read};

use clap::Parser;
use tracing::info;

use agent_ledger::{
    Book, Simulation, config::Config, dlq::LogDLQ, ingestion, plot::FileChartWriter,
    report::write_report,
};

#[tokio::main] // using Tokio runtime for async
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    config.init_tracing();

    let rows = ingestion::read_agents(File::open(&config.agents)?)?;
    let book = Book::from_rows(rows);

    let events: Box<dyn Read + Send> = match &config.events {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(std::io::empty()),
    };
    let ingestion = ingestion::CsvReader::new(events);

    let mut simulation = Simulation::new(ingestion, book, LogDLQ::default());
    simulation.process().await?;
    let ticks = simulation.finish(config.ticks);
    let book = simulation.into_book();

    write_report(&book, config.format, config.show_currency, std::io::stdout().lock())?;

    if let Some(dir) = &config.chart_dir {
        let y_max = config.y_max.unwrap_or_else(|| match book.max_snapshot() {
            m if m > 0.0 => m * 1.1,
            _ => 1.0,
        });
        let mut writer = FileChartWriter::new(dir, config.chart_format)?;
        for sheet in book.sheets() {
            // One point per snapshot: the initial balance plus one per tick.
            sheet.plot(ticks as usize + 1, y_max, &mut writer)?;
        }
        info!(charts = writer.written().len(), "charts written");
    }

    Ok(())
}
