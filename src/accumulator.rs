use std::{collections::HashMap, path::Path};

use derive_new::new;
use tracing::{debug, info};

use crate::{
    config::AbsentSide,
    error::Result,
    record::{aggregate_file, PairedRecord},
    utils::file_label,
};

/// One file's (DAS, DGE) score pair for a GO term
#[derive(Debug, Clone, PartialEq, new)]
pub struct Observation {
    /// Name of the file the scores were read from
    pub file: String,
    pub das: f64,
    pub dge: f64,
}

/// All observations of one GO term across the input files
#[derive(Debug, Clone)]
pub struct TermObservations {
    go_id: String,
    go_label: String,
    observations: Vec<Observation>,
}

impl TermObservations {
    pub fn go_id(&self) -> &str {
        &self.go_id
    }

    pub fn go_label(&self) -> &str {
        &self.go_label
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn das_scores(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.das).collect()
    }

    pub fn dge_scores(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.dge).collect()
    }
}

/// Per-GO-term score pairs collected over every input file
///
/// GO terms are kept in the order they were first recorded. Each file adds at
/// most one [`Observation`] per GO term, so DAS and DGE scores stay paired.
#[derive(Debug, Clone, Default)]
pub struct Accumulation {
    index: HashMap<String, usize>,
    terms: Vec<TermObservations>,
}

impl Accumulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every file in order and accumulates its records
    pub fn from_files<P: AsRef<Path>>(files: &[P], absent_side: AbsentSide) -> Result<Self> {
        let mut accumulation = Self::new();
        for path in files {
            let path = path.as_ref();
            let records = aggregate_file(path)?;
            accumulation.add_file(&file_label(path), &records, absent_side);
        }
        info!(
            "Accumulated {} GO terms from {} files",
            accumulation.len(),
            files.len()
        );
        Ok(accumulation)
    }

    /// Records the score pair of one GO term from one file
    ///
    /// The label is overwritten by the most recent file.
    pub fn record_file_result(
        &mut self,
        file: &str,
        go_id: &str,
        go_label: &str,
        das_score: f64,
        dge_score: f64,
    ) {
        let observation = Observation::new(file.to_string(), das_score, dge_score);
        match self.index.get(go_id) {
            Some(&i) => {
                let term = &mut self.terms[i];
                if term.go_label != go_label {
                    debug!(
                        go_id,
                        "Label `{}` replaced by `{}` from {}", term.go_label, go_label, file
                    );
                    term.go_label = go_label.to_string();
                }
                term.observations.push(observation);
            }
            None => {
                self.index.insert(go_id.to_string(), self.terms.len());
                self.terms.push(TermObservations {
                    go_id: go_id.to_string(),
                    go_label: go_label.to_string(),
                    observations: vec![observation],
                });
            }
        }
    }

    /// Records the merged records of one file
    ///
    /// Returns the number of observations recorded.
    pub fn add_file(
        &mut self,
        file: &str,
        records: &[PairedRecord],
        absent_side: AbsentSide,
    ) -> usize {
        let mut recorded = 0;
        for record in records {
            match absent_side.resolve(record) {
                Some((das, dge)) => {
                    self.record_file_result(file, record.go_id(), record.go_label(), das, dge);
                    recorded += 1;
                }
                None => debug!(go_id = record.go_id(), "Excluding one-sided record from {}", file),
            }
        }
        recorded
    }

    /// Number of distinct GO terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, go_id: &str) -> Option<&TermObservations> {
        self.index.get(go_id).map(|&i| &self.terms[i])
    }

    pub fn label(&self, go_id: &str) -> Option<&str> {
        self.get(go_id).map(TermObservations::go_label)
    }

    pub fn das_scores(&self, go_id: &str) -> Option<Vec<f64>> {
        self.get(go_id).map(TermObservations::das_scores)
    }

    pub fn dge_scores(&self, go_id: &str) -> Option<Vec<f64>> {
        self.get(go_id).map(TermObservations::dge_scores)
    }

    /// Iterates over GO terms in first-seen order
    pub fn terms(&self) -> impl Iterator<Item = &TermObservations> {
        self.terms.iter()
    }
}
