//! `.xlsx` interchange of transactions, with the Chinese column headers the
//! exported files have always used (日期/类型/分类/金额/备注).

use bookkeeper_repo::transaction_repo::{NewTransaction, Transaction, TransactionType};
use calamine::{Data, DataType, Reader, Xlsx};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;
use thiserror::Error;

use crate::categories::DEFAULT_CATEGORY;

pub const SHEET_NAME: &str = "收支明细";

const HEADER_DATE: &str = "日期";
const HEADER_TYPE: &str = "类型";
const HEADER_CATEGORY: &str = "分类";
const HEADER_AMOUNT: &str = "金额";
const HEADER_DESCRIPTION: &str = "备注";

const HEADERS: [&str; 5] = [
    HEADER_DATE,
    HEADER_TYPE,
    HEADER_CATEGORY,
    HEADER_AMOUNT,
    HEADER_DESCRIPTION,
];

const TYPE_INCOME: &str = "收入";
const TYPE_EXPENSE: &str = "支出";

#[derive(Error, Debug)]
pub enum ExcelError {
    #[error("Unable to read workbook: {0}")]
    Read(#[from] calamine::XlsxError),
    #[error("Unable to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
    #[error("Workbook has no sheets")]
    NoSheet,
}

pub fn write_workbook(transactions: &[Transaction]) -> Result<Vec<u8>, ExcelError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (row, transaction) in transactions.iter().enumerate() {
        let row = (row + 1) as u32;
        let type_label = match transaction.transaction_type {
            TransactionType::Income => TYPE_INCOME,
            TransactionType::Expense => TYPE_EXPENSE,
        };
        worksheet.write_string(row, 0, transaction.date.to_string())?;
        worksheet.write_string(row, 1, type_label)?;
        worksheet.write_string(row, 2, &transaction.category)?;
        worksheet.write_number(row, 3, transaction.amount.to_f64().unwrap_or(0.0))?;
        worksheet.write_string(row, 4, &transaction.description)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Parses the first sheet of a workbook. Rows without a parseable date or
/// amount are skipped, matching how hand-edited spreadsheets tend to look.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<NewTransaction>, ExcelError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(ExcelError::NoSheet)??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns: HashMap<&str, usize> = header_row
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| match cell {
            Data::String(header) => Some((header.trim(), i)),
            _ => None,
        })
        .collect();

    let mut transactions = Vec::new();
    for row in rows {
        let cell = |header: &str| columns.get(header).and_then(|&i| row.get(i));

        let Some(date) = cell(HEADER_DATE).and_then(cell_date) else {
            continue;
        };
        let Some(amount) = cell(HEADER_AMOUNT).and_then(cell_decimal) else {
            continue;
        };

        let transaction_type = match cell(HEADER_TYPE).and_then(cell_string).as_deref() {
            Some(TYPE_INCOME) | Some("INCOME") => TransactionType::Income,
            _ => TransactionType::Expense,
        };
        let category = cell(HEADER_CATEGORY)
            .and_then(cell_string)
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned());
        let description = cell(HEADER_DESCRIPTION)
            .and_then(cell_string)
            .unwrap_or_default();

        transactions.push(NewTransaction::new(
            transaction_type,
            category,
            description,
            date,
            amount.abs(),
        ));
    }
    Ok(transactions)
}

fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => NaiveDate::from_str(s.trim()).ok(),
        _ => cell.as_date(),
    }
}

fn cell_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) => Decimal::from_f64_retain(*f),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.trim().to_owned()),
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}
