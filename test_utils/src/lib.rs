use std::{collections::HashMap, str};

pub const INSTALLMENT_HEADER: [&str; 8] = [
    "installment",
    "purchase",
    "number",
    "due_date",
    "due_amount",
    "paid_amount",
    "payment_date",
    "status",
];

pub const REPORT_HEADER: [&str; 13] = [
    "customer_id",
    "customer_username",
    "customer_name",
    "customer_email",
    "total_purchases",
    "total_items",
    "total_paid",
    "total_due",
    "purchase_id",
    "installment_number",
    "paid_amount",
    "due_amount",
    "status",
];

pub const SUMMARY_HEADER: [&str; 6] = [
    "customer_id",
    "customer_username",
    "total_purchases",
    "total_items",
    "total_paid",
    "total_due",
];

pub const TREND_HEADER: [&str; 4] = ["month", "total_purchases", "total_paid", "total_due"];

// Only used during testing so no need to return result
pub fn create_csv<const N: usize>(header: [&str; N], rows: Vec<[&str; N]>) -> String {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(header).unwrap();
    for r in rows {
        wtr.write_record(r).unwrap();
    }
    wtr.flush().unwrap();
    String::from_utf8(wtr.into_inner().unwrap()).unwrap()
}

fn split_to_dict(csv: &str, key_columns: usize) -> HashMap<String, String> {
    csv.lines()
        .skip(1) // ignore row titles
        .filter(|line| !line.is_empty())
        .map(|line| {
            let key = line
                .split(',')
                .take(key_columns)
                .collect::<Vec<_>>()
                .join(",");
            (key, line.to_string())
        })
        .collect()
}

// Row order is not part of every report's contract. Rows are matched by their first
// `key_columns` columns so tests do not depend on it.
pub fn assert_unsorted_eq(s1: &str, s2: &str, key_columns: usize) {
    assert_eq!(s1.lines().next(), s2.lines().next(), "headers differ");
    let sut1 = split_to_dict(s1, key_columns);
    let sut2 = split_to_dict(s2, key_columns);
    if sut1.len() != sut2.len() {
        panic!("csvs do not contain the same number of rows");
    }

    sut1.iter().for_each(|(k, v)| match sut2.get(k) {
        Some(row) => assert_eq!(row, v),
        None => panic!("row {} not found in both csvs", k),
    })
}
