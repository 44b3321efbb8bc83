use std::{cmp::Ordering, str::FromStr};

use crate::{record::PairedRecord, results::TermResult};

/// How a GO term seen in a file on only one side (DAS or DGE) is recorded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AbsentSide {
    /// Record the missing side with a score of 0.0
    #[default]
    ZeroFill,
    /// Drop the file's observation for that GO term altogether
    Exclude,
}

impl AbsentSide {
    /// Returns the (DAS, DGE) score pair to record for a record, if any
    pub fn resolve(&self, record: &PairedRecord) -> Option<(f64, f64)> {
        match self {
            AbsentSide::ZeroFill => Some((record.das_score(), record.dge_score())),
            AbsentSide::Exclude if record.is_complete() => {
                Some((record.das_score(), record.dge_score()))
            }
            AbsentSide::Exclude => None,
        }
    }
}

impl FromStr for AbsentSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero-fill" => Ok(AbsentSide::ZeroFill),
            "exclude" => Ok(AbsentSide::Exclude),
            other => Err(format!(
                "unknown absent side policy `{other}` (expected zero-fill or exclude)"
            )),
        }
    }
}

/// The order in which significant GO terms are reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderConfig {
    /// Order in which GO terms were first seen across the input files
    #[default]
    Discovery,
    /// Ascending corrected p-value
    Significance,
}

impl OrderConfig {
    pub fn arrange(&self, results: &mut [TermResult]) {
        match self {
            OrderConfig::Discovery => {}
            OrderConfig::Significance => results.sort_by(|a, b| {
                a.pvalue
                    .partial_cmp(&b.pvalue)
                    .unwrap_or(Ordering::Equal)
            }),
        }
    }
}

impl FromStr for OrderConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discovery" => Ok(OrderConfig::Discovery),
            "significance" => Ok(OrderConfig::Significance),
            other => Err(format!(
                "unknown order `{other}` (expected discovery or significance)"
            )),
        }
    }
}
