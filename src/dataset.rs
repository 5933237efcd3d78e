//! Loading a CSV file into typed records.

use std::{collections::BTreeMap, fs::File, path::Path};

use polars::prelude::*;
use tracing::info;

use crate::{
  Range,
  error::{DomainError, LoadError},
};

/// One row: a label and the values of the declared numeric fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
  pub label: String,
  values:    BTreeMap<String, f64>,
}

impl Record {
  pub fn new(label: impl Into<String>, values: impl IntoIterator<Item = (String, f64)>) -> Self {
    Record { label: label.into(), values: values.into_iter().collect() }
  }

  pub fn get(&self, field: &str) -> Option<f64> { self.values.get(field).copied() }
}

/// Records in file order. Never mutated after loading.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
  fields:  Vec<String>,
  records: Vec<Record>,
}

pub struct DatasetLoader {
  label_field:    String,
  numeric_fields: Vec<String>,
}

impl DatasetLoader {
  pub fn new(label_field: &str, numeric_fields: &[&str]) -> Self {
    DatasetLoader {
      label_field:    label_field.to_string(),
      numeric_fields: numeric_fields.iter().map(|f| f.to_string()).collect(),
    }
  }

  pub fn load(&self, path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file =
      File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let df = CsvReader::new(file).finish()?;

    let fields = self.numeric_fields.iter().map(String::as_str).collect::<Vec<_>>();
    let dataset = Dataset::from_frame(&df, &self.label_field, &fields)?;
    info!(path = %path.display(), records = dataset.len(), "loaded dataset");
    Ok(dataset)
  }
}

impl Dataset {
  /// Builds records from `df`, coercing every field in `numeric_fields` to
  /// `f64`. A cell that doesn't coerce (or is missing) fails the load.
  pub fn from_frame(
    df: &DataFrame,
    label_field: &str,
    numeric_fields: &[&str],
  ) -> Result<Dataset, LoadError> {
    let column = |name: &str| {
      df.column(name).map_err(|_| LoadError::MissingField(name.to_string()))
    };

    let labels = column(label_field)?.cast(&DataType::String)?;
    let mut records = labels
      .str()?
      .into_iter()
      .map(|label| Record::new(label.unwrap_or_default(), []))
      .collect::<Vec<_>>();

    for &field in numeric_fields {
      let values = column(field)?.cast(&DataType::Float64)?;
      for (row, value) in values.f64()?.into_iter().enumerate() {
        let value =
          value.ok_or_else(|| LoadError::NotNumeric { field: field.to_string(), row })?;
        records[row].values.insert(field.to_string(), value);
      }
    }

    Ok(Dataset { fields: numeric_fields.iter().map(|f| f.to_string()).collect(), records })
  }

  pub fn len(&self) -> usize { self.records.len() }
  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn records(&self) -> &[Record] { &self.records }
  pub fn get(&self, index: usize) -> Option<&Record> { self.records.get(index) }

  pub fn has_field(&self, field: &str) -> bool { self.fields.iter().any(|f| f == field) }

  pub fn values(&self, field: &str) -> Result<Vec<f64>, DomainError> {
    if !self.has_field(field) {
      return Err(DomainError::UnknownField(field.to_string()));
    }
    Ok(self.records.iter().filter_map(|r| r.get(field)).collect())
  }

  pub fn extent(&self, field: &str) -> Result<Range, DomainError> {
    Range::extent(self.values(field)?).ok_or_else(|| DomainError::Empty(field.to_string()))
  }
}
