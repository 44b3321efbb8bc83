use std::{
    fmt,
    io::{self, Write},
};

use bon::Builder;

/// A GO term whose DAS and DGE scores differ after correction
#[derive(Debug, Clone, Builder)]
pub struct TermResult {
    pub go_id: String,
    pub go_label: String,
    /// Signed-rank statistic, `min(R+, R-)`
    pub statistic: f64,
    /// Uncorrected two-sided p-value
    pub pvalue: f64,
    /// Bonferroni adjusted p-value, `min(p * N, 1)`
    pub adj_pvalue: f64,
    /// Number of GO terms the p-value is corrected for
    pub n_tests: usize,
    /// Number of paired observations tested
    pub n_obs: usize,
    pub mean_das: f64,
    pub mean_dge: f64,
}
impl fmt::Display for TermResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): T={:?}; p={:?} (Bonferroni); mean DAS: {:?}; mean DGE: {:?}",
            self.go_label, self.go_id, self.statistic, self.pvalue, self.mean_das, self.mean_dge
        )
    }
}

pub struct DasDgeResults {
    pub terms: Vec<TermResult>,
    /// Number of GO terms considered for correction
    pub n_tests: usize,
    /// GO terms skipped because all their paired differences were zero
    pub n_degenerate: usize,
}
impl DasDgeResults {
    pub fn new(terms: Vec<TermResult>, n_tests: usize, n_degenerate: usize) -> Self {
        Self {
            terms,
            n_tests,
            n_degenerate,
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for term in &self.terms {
            writeln!(writer, "{term}")?;
        }
        Ok(())
    }

    pub fn pprint(&self) -> io::Result<()> {
        self.write(io::stdout().lock())
    }
}
