//! CSV order intake, read ahead of geocoding.

use crate::error::PlanError;
use serde::Deserialize;

/// Raw row as read from the orders CSV, before geocoding.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

pub fn read_orders(path: &str) -> Result<Vec<OrderRecord>, PlanError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| PlanError::InputError(format!("could not open orders CSV {path}: {e}")))?;

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: OrderRecord = result
            .map_err(|e| PlanError::InputError(format!("malformed row in {path}: {e}")))?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(PlanError::InputError(format!("{path} contains no orders")));
    }

    Ok(records)
}
