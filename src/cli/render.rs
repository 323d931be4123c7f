use std::collections::BTreeMap;

use tabled::Table;

use crate::{
    enrichment::EnrichmentReport,
    types::{Condition, FailureTableRow, PriceTableRow, Record, TrackTableRow},
    utils,
};

pub fn print_records(records: &[Record]) {
    let rows: Vec<_> = records.iter().map(utils::record_table_row).collect();
    println!("{}", Table::new(rows));
}

pub fn print_totals(totals: &BTreeMap<String, f64>) {
    if totals.is_empty() {
        return;
    }

    let rows: Vec<PriceTableRow> = utils::ordered_totals(totals)
        .into_iter()
        .map(|(condition, total)| PriceTableRow {
            condition,
            price: utils::format_amount(total),
        })
        .collect();
    println!("{}", Table::new(rows));
}

/// Full view of a single looked-up record.
pub fn print_record(record: &Record) {
    println!("------------------ {} ------------------", record.key);

    if let Some(release) = &record.release {
        println!("{}", release.title.as_deref().unwrap_or("(untitled)"));

        let details: Vec<String> = [
            release.year.as_ref().map(|y| y.to_string()),
            release.country.clone(),
            Some(release.label.join(", ")).filter(|s| !s.is_empty()),
            Some(release.genre.join(", ")).filter(|s| !s.is_empty()),
            Some(release.format.join(", ")).filter(|s| !s.is_empty()),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            println!("{}", details.join(" | "));
        }
    }

    if let Some(tracklist) = record.tracklist.as_ref().filter(|t| !t.is_empty()) {
        let rows: Vec<TrackTableRow> = tracklist
            .iter()
            .map(|t| TrackTableRow {
                position: t.position.clone(),
                title: t.title.clone(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    if let Some(table) = record.price_table.as_ref().filter(|t| !t.is_empty()) {
        let mut rows: Vec<PriceTableRow> = Condition::ALL
            .iter()
            .filter_map(|c| table.get(c.label()).map(|p| (c.label(), p)))
            .map(|(condition, price)| PriceTableRow {
                condition: condition.to_string(),
                price: format_price(&price.value.to_string(), &price.currency),
            })
            .collect();
        rows.extend(
            table
                .iter()
                .filter(|(grade, _)| Condition::from_label(grade).is_none())
                .map(|(grade, price)| PriceTableRow {
                    condition: grade.clone(),
                    price: format_price(&price.value.to_string(), &price.currency),
                }),
        );
        println!("{}", Table::new(rows));
    }
}

pub fn print_failures(report: &EnrichmentReport) {
    if report.failures.is_empty() {
        return;
    }

    let rows: Vec<FailureTableRow> = report
        .failures
        .iter()
        .map(|f| FailureTableRow {
            key: f.key.clone(),
            reason: f.reason.clone(),
        })
        .collect();
    println!("{}", Table::new(rows));
}

fn format_price(value: &str, currency: &str) -> String {
    if currency.is_empty() {
        value.to_string()
    } else {
        format!("{} {}", value, currency)
    }
}
