use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use serde::Deserialize;

use crate::domain::traits::EventStream;
use crate::domain::{Error, Event, EventKind};

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(csv_reader(reader)),
        }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    tick: u32,
    account: String,
    #[serde(rename = "type")]
    kind: String,
    amount: f64,
}

impl TryFrom<CsvRow> for Event {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let amount = row.amount;
        let kind = match row.kind.trim().to_ascii_lowercase().as_str() {
            "deposit" => EventKind::Deposit { amount },
            "withdrawal" | "withdraw" => EventKind::Withdrawal { amount },
            other => {
                return Err(Error::Ingestion(format!("Invalid event type: {}", other)));
            }
        };

        Ok(Event {
            tick: row.tick,
            account: row.account,
            kind,
        })
    }
}

impl<R: Read + Send + 'static> EventStream for CsvReader<R> {
    type EvStream = Pin<Box<dyn Stream<Item = Result<Event, Error>> + Send>>;

    fn stream(&mut self) -> Self::EvStream {
        let Some(reader) = self.reader.take() else {
            // Already consumed.
            return Box::pin(stream::iter(Vec::<Result<Event, Error>>::new()));
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => Event::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}

/// Which ledger of an agent's balance sheet an account belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[serde(alias = "assets")]
    Asset,
    #[serde(alias = "liabilities")]
    Liability,
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::Asset => write!(f, "asset"),
            Side::Liability => write!(f, "liability"),
        }
    }
}

/// One account placed on one agent's balance sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AgentRow {
    pub agent: String,
    pub side: Side,
    pub account: String,
    pub balance: f64,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl AgentRow {
    pub fn tag_set(&self) -> impl Iterator<Item = &str> {
        self.tags
            .split(';')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Reads every agent definition; the first malformed row aborts the load.
pub fn read_agents<R: Read>(reader: R) -> Result<Vec<AgentRow>, Error> {
    csv_reader(reader)
        .into_deserialize::<AgentRow>()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| Error::Ingestion(format!("agent row {}: {}", i + 1, e)))
        })
        .collect()
}
