use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    parse::{
        parse_fraction_percentage, parse_line, parse_pvalue, Category, EnrichmentLine, FracPerc,
    },
};

/// Converts an adjusted p-value into a significance score, `-log10(p)`
///
/// A missing p-value counts as 1.0, i.e. a score of 0.0.
pub fn significance_score(adj_pvalue: Option<f64>) -> f64 {
    // adding 0.0 turns -0.0 into 0.0
    -adj_pvalue.unwrap_or(1.0).log10() + 0.0
}

/// The DAS or DGE half of a [`PairedRecord`]
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    study: FracPerc,
    population: FracPerc,
    pvalue: Option<f64>,
    adj_pvalue: Option<f64>,
    score: f64,
}

impl Side {
    fn from_line(line: &EnrichmentLine) -> Result<Self> {
        let study = parse_fraction_percentage(line.study).ok_or_else(|| {
            Error::MalformedLine(format!("invalid study count `{}`", line.study))
        })?;
        let population = parse_fraction_percentage(line.population).ok_or_else(|| {
            Error::MalformedLine(format!("invalid population count `{}`", line.population))
        })?;
        let pvalue = parse_pvalue(line.pvalue)?;
        let adj_pvalue = parse_pvalue(line.adj_pvalue)?;
        if adj_pvalue == Some(0.0) {
            return Err(Error::MalformedLine(
                "adjusted p-value of 0 has no finite score".to_string(),
            ));
        }
        Ok(Self {
            study,
            population,
            pvalue,
            adj_pvalue,
            score: significance_score(adj_pvalue),
        })
    }

    pub fn study(&self) -> FracPerc {
        self.study
    }

    pub fn population(&self) -> FracPerc {
        self.population
    }

    pub fn pvalue(&self) -> Option<f64> {
        self.pvalue
    }

    pub fn adj_pvalue(&self) -> Option<f64> {
        self.adj_pvalue
    }

    /// `-log10` of the adjusted p-value
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// The DAS and DGE enrichment of one GO term within one sample file
///
/// Each side is filled at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedRecord {
    go_id: String,
    go_label: String,
    das: Option<Side>,
    dge: Option<Side>,
}

impl PairedRecord {
    /// Creates a record with the side named by the line's category filled in
    pub fn create(line: &EnrichmentLine) -> Result<Self> {
        let mut record = Self {
            go_id: line.go_id.to_string(),
            go_label: line.go_label.to_string(),
            das: None,
            dge: None,
        };
        record.add_line(line)?;
        Ok(record)
    }

    /// Fills in the side named by the line's category
    ///
    /// # Errors
    ///
    /// * [`Error::DuplicateCategory`] if that side is already filled
    /// * [`Error::MalformedLine`] if the line belongs to another GO term
    pub fn add_line(&mut self, line: &EnrichmentLine) -> Result<()> {
        if self.go_id != line.go_id {
            return Err(Error::MalformedLine(format!(
                "line for {} merged into record for {}",
                line.go_id, self.go_id
            )));
        }
        let slot = match line.category {
            Category::Das => &mut self.das,
            Category::Dge => &mut self.dge,
        };
        if slot.is_some() {
            return Err(Error::DuplicateCategory {
                category: line.category,
                go_id: self.go_id.clone(),
            });
        }
        *slot = Some(Side::from_line(line)?);
        if self.go_label != line.go_label {
            debug!(
                go_id = %self.go_id,
                "Relabelling `{}` as `{}`", self.go_label, line.go_label
            );
            self.go_label = line.go_label.to_string();
        }
        Ok(())
    }

    pub fn go_id(&self) -> &str {
        &self.go_id
    }

    pub fn go_label(&self) -> &str {
        &self.go_label
    }

    pub fn das(&self) -> Option<&Side> {
        self.das.as_ref()
    }

    pub fn dge(&self) -> Option<&Side> {
        self.dge.as_ref()
    }

    /// The DAS score, or 0.0 if no DAS line was seen
    pub fn das_score(&self) -> f64 {
        self.das.as_ref().map_or(0.0, Side::score)
    }

    /// The DGE score, or 0.0 if no DGE line was seen
    pub fn dge_score(&self) -> f64 {
        self.dge.as_ref().map_or(0.0, Side::score)
    }

    /// True when both a DAS and a DGE line were seen
    pub fn is_complete(&self) -> bool {
        self.das.is_some() && self.dge.is_some()
    }
}

/// Merges the lines of one enrichment table into paired records
///
/// Records are returned in the order their GO id was first seen. Blank lines
/// are skipped; any other error is reported with its 1-based line number.
pub fn aggregate_reader<R: BufRead>(reader: R) -> Result<Vec<PairedRecord>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut records: Vec<PairedRecord> = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        merge_line(&line, &mut index, &mut records).map_err(|source| Error::AtLine {
            line: idx + 1,
            source: Box::new(source),
        })?;
    }
    Ok(records)
}

fn merge_line(
    line: &str,
    index: &mut HashMap<String, usize>,
    records: &mut Vec<PairedRecord>,
) -> Result<()> {
    let line = parse_line(line)?;
    match index.get(line.go_id) {
        Some(&i) => records[i].add_line(&line),
        None => {
            index.insert(line.go_id.to_string(), records.len());
            records.push(PairedRecord::create(&line)?);
            Ok(())
        }
    }
}

/// Reads and merges one enrichment table from disk
pub fn aggregate_file(path: &Path) -> Result<Vec<PairedRecord>> {
    let file = File::open(path).map_err(|e| Error::in_file(path, e.into()))?;
    let records =
        aggregate_reader(BufReader::new(file)).map_err(|e| Error::in_file(path, e))?;
    debug!("Read {} GO terms from {}", records.len(), path.display());
    Ok(records)
}
