//! Conversion between customer records and polars frames.
//!
//! Extracts and the metadata report both work on a `DataFrame` with the
//! eight customer columns in fixed order: seven string columns and a
//! `signup_date` date column.

use crate::constants::CUSTOMER_COLUMNS;
use crate::models::CustomerRecord;
use chrono::NaiveDate;
use polars::prelude::*;

/// Build a frame holding the records in order
pub fn records_to_frame(records: &[CustomerRecord]) -> PolarsResult<DataFrame> {
    let signup_dates: Vec<NaiveDate> = records.iter().map(|r| r.signup_date).collect();

    let columns = vec![
        text_column(records, CUSTOMER_COLUMNS[0], |r| r.name.as_str()),
        text_column(records, CUSTOMER_COLUMNS[1], |r| r.gender.as_str()),
        text_column(records, CUSTOMER_COLUMNS[2], |r| r.email.as_str()),
        text_column(records, CUSTOMER_COLUMNS[3], |r| r.address.as_str()),
        text_column(records, CUSTOMER_COLUMNS[4], |r| r.country.as_str()),
        text_column(records, CUSTOMER_COLUMNS[5], |r| r.department.as_str()),
        text_column(records, CUSTOMER_COLUMNS[6], |r| r.designation.as_str()),
        Column::new(CUSTOMER_COLUMNS[7].into(), signup_dates),
    ];

    DataFrame::new(columns)
}

fn text_column(
    records: &[CustomerRecord],
    name: &str,
    value: fn(&CustomerRecord) -> &str,
) -> Column {
    let values: Vec<&str> = records.iter().map(value).collect();
    Column::new(name.into(), values)
}
