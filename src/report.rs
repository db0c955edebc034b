use std::io::Write;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::book::Book;
use crate::domain::{Error, Ledger};
use crate::ingestion::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    /// One pair of tables per agent
    #[default]
    Table,
    /// Flat `agent,side,account,code,balance` rows
    Csv,
}

/// Two decimals with thousands separators, e.g. `-12,345.68`.
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = match Decimal::from_f64(value) {
        Some(dec) => format!(
            "{:.2}",
            dec.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        // beyond Decimal's range
        None => format!("{:.2}", value),
    };

    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Renders rows as a plain table: the first row is the header, underlined
/// with dashes, no vertical rules, and every column after the first is
/// right-aligned.
pub fn simple_table(rows: Vec<Vec<String>>) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut builder = Builder::default();
    for (i, row) in rows.into_iter().enumerate() {
        builder.push_record(row);
        if i == 0 {
            builder.push_record(widths.iter().map(|&w| "-".repeat(w)));
        }
    }
    let mut table = builder.build();
    table
        .with(Style::blank())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

#[derive(Debug, Serialize)]
struct CsvLine<'a> {
    agent: &'a str,
    side: String,
    account: String,
    code: String,
    balance: f64,
}

pub fn write_report<W: Write>(
    book: &Book,
    format: ReportFormat,
    show_currency: bool,
    mut out: W,
) -> Result<(), Error> {
    match format {
        ReportFormat::Table => {
            for sheet in book.sheets() {
                out.write_all(sheet.summary().as_bytes())?;
                out.write_all(sheet.render(show_currency).as_bytes())?;
            }
            out.flush()?;
        }
        ReportFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for sheet in book.sheets() {
                let sides = [
                    (Side::Asset, sheet.assets()),
                    (Side::Liability, sheet.liabilities()),
                ];
                for (side, ledger) in sides {
                    write_ledger_rows(&mut writer, sheet.name(), side, ledger)?;
                }
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn write_ledger_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    agent: &str,
    side: Side,
    ledger: &Ledger,
) -> Result<(), Error> {
    for handle in ledger.accounts() {
        let acc = handle.borrow();
        writer
            .serialize(CsvLine {
                agent,
                side: side.to_string(),
                account: acc.name().to_string(),
                code: acc.code().to_string(),
                balance: acc.balance(),
            })
            .map_err(|e| Error::IO(e.into()))?;
    }
    Ok(())
}
