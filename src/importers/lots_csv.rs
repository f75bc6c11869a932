use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::TaxError;
use crate::tax::RawLot;
use crate::utils::{parse_decimal_it, parse_decimal_it_strict};

/// Parse a purchase-lot CSV file.
///
/// Columns are found by header name, in Italian or English (`Data`/`date`,
/// `Quantità`/`quantity`, `Prezzo di acquisto`/`unit_cost`,
/// `Commissione acquisto`/`commission`). Both `;` and `,` delimiters work.
pub fn parse_lots_csv<P: AsRef<Path>>(file_path: P) -> Result<Vec<RawLot>> {
    let path = file_path.as_ref();
    info!("Parsing lots CSV file: {:?}", path);

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open CSV file {:?}", path))?;
    let lots = parse_lots_reader(content.as_bytes(), detect_delimiter(&content))?;

    info!("Successfully parsed {} lots from CSV", lots.len());
    Ok(lots)
}

/// Italian spreadsheets export with `;` because `,` is the decimal separator
fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.contains(';') {
        b';'
    } else {
        b','
    }
}

/// How the numeric cells of a file are written
type NumberParser = fn(&str) -> Option<Decimal>;

/// `;` files come from Italian spreadsheets, where `.` only groups thousands
fn number_parser(delimiter: u8) -> NumberParser {
    if delimiter == b';' {
        parse_decimal_it_strict
    } else {
        parse_decimal_it
    }
}

fn parse_lots_reader<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawLot>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .clone();
    debug!("CSV headers: {:?}", headers);

    let mapping = find_columns(&headers)?;
    debug!("Column mapping: {:?}", mapping);

    let parse_number = number_parser(delimiter);
    let mut lots = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record =
            result.map_err(|e| TaxError::ParseError(format!("line {}: {}", idx + 2, e)))?;
        let line = record.position().map_or(idx as u64 + 2, |pos| pos.line());

        // An unreadable lot row stops the import
        let lot = parse_row(&record, &mapping, parse_number)
            .map_err(|e| TaxError::ParseError(format!("line {}: {}", line, e)))?;
        match lot {
            Some(lot) => lots.push(lot),
            None => debug!("Skipping blank line {}", line),
        }
    }

    Ok(lots)
}

#[derive(Debug)]
struct LotColumnMapping {
    date: Option<usize>,
    quantity: usize,
    unit_cost: usize,
    commission: Option<usize>,
}

fn find_columns(headers: &csv::StringRecord) -> Result<LotColumnMapping> {
    let mut date_idx = None;
    let mut quantity_idx = None;
    let mut cost_idx = None;
    let mut commission_idx = None;

    for (idx, header) in headers.iter().enumerate() {
        let text = header.to_lowercase();

        if text.contains("commission") {
            commission_idx = Some(idx);
        } else if text.contains("data") || text.contains("date") {
            date_idx = Some(idx);
        } else if text.contains("quantit") || text.contains("qty") || text.contains("qtà") {
            quantity_idx = Some(idx);
        } else if text.contains("prezzo")
            || text.contains("price")
            || text.contains("cost")
            || text.contains("pmc")
        {
            cost_idx = Some(idx);
        }
    }

    Ok(LotColumnMapping {
        date: date_idx,
        quantity: quantity_idx.ok_or_else(|| anyhow!("Quantity column not found"))?,
        unit_cost: cost_idx.ok_or_else(|| anyhow!("Unit cost column not found"))?,
        commission: commission_idx,
    })
}

fn parse_row(
    record: &csv::StringRecord,
    mapping: &LotColumnMapping,
    parse_number: NumberParser,
) -> Result<Option<RawLot>, String> {
    // Fully blank rows are leftovers from spreadsheet exports
    if record.iter().all(|field| field.trim().is_empty()) {
        return Ok(None);
    }

    let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
    let amount = |idx: Option<usize>, name: &str| parse_amount(field(idx), name, parse_number);

    let quantity = amount(Some(mapping.quantity), "quantity")?;
    let quantity = parse_quantity(quantity, field(Some(mapping.quantity)))?;
    let unit_cost = amount(Some(mapping.unit_cost), "unit cost")?;
    let commission = amount(mapping.commission, "commission")?;
    let date = Some(field(mapping.date).to_string()).filter(|d| !d.is_empty());

    Ok(Some(RawLot {
        date,
        quantity,
        unit_cost,
        commission,
    }))
}

/// Blank cells count as zero
fn parse_amount(text: &str, name: &str, parse_number: NumberParser) -> Result<Decimal, String> {
    if text.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    parse_number(text).ok_or_else(|| format!("invalid {} '{}'", name, text))
}

fn parse_quantity(value: Decimal, text: &str) -> Result<i64, String> {
    if !value.fract().is_zero() {
        return Err(format!("quantity must be a whole number, got '{}'", text));
    }
    value
        .to_i64()
        .ok_or_else(|| format!("quantity out of range '{}'", text))
}
