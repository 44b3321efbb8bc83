use adjustp::{adjust, Procedure};
use bon::Builder;
use tracing::{debug, warn};

use crate::{
    accumulator::{Accumulation, TermObservations},
    config::OrderConfig,
    error::Error,
    math::{arithmetic_mean, wilcoxon_signed_rank, SignedRank},
    results::{DasDgeResults, TermResult},
};

/// Family-wise significance threshold applied after correction
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Paired comparison of DAS and DGE enrichment per GO term
///
/// Every GO term in an [`Accumulation`] is tested with a two-sided Wilcoxon
/// signed-rank test of its DAS scores against its DGE scores. The p-values are
/// Bonferroni adjusted over the number of GO terms and compared to `alpha`.
#[derive(Debug, Clone, Builder)]
pub struct DasDge {
    #[builder(default = DEFAULT_ALPHA)]
    alpha: f64,
    #[builder(default)]
    order: OrderConfig,
}
impl Default for DasDge {
    fn default() -> Self {
        Self::builder().build()
    }
}
impl DasDge {
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// True if an adjusted p-value passes the threshold
    pub fn is_significant(&self, adj_pvalue: f64) -> bool {
        adj_pvalue < self.alpha
    }

    /// Run the comparison
    ///
    /// Terms whose test cannot be run enter the correction with a p-value of
    /// 1.0, so the correction always counts every GO term in the accumulation.
    pub fn run(&self, accumulation: &Accumulation) -> DasDgeResults {
        let n_tests = accumulation.len();
        if accumulation.is_empty() {
            return DasDgeResults::new(Vec::new(), 0, 0);
        }

        let tests = accumulation
            .terms()
            .map(|term| self.test_term(term))
            .collect::<Vec<_>>();
        let n_degenerate = tests
            .iter()
            .filter(|test| matches!(test, Err(Error::DegenerateTest)))
            .count();

        // Bonferroni adjustment over all GO terms
        let pvalues = tests
            .iter()
            .map(|test| test.as_ref().map_or(1.0, |t| t.pvalue))
            .collect::<Vec<_>>();
        let adjusted = adjust(&pvalues, Procedure::Bonferroni);

        let mut terms = accumulation
            .terms()
            .zip(tests)
            .zip(adjusted)
            .filter(|(_, adj_pvalue)| self.is_significant(*adj_pvalue))
            .filter_map(|((term, test), adj_pvalue)| {
                let test = test.ok()?;
                Some(self.build_result(term, &test, adj_pvalue, n_tests))
            })
            .collect::<Vec<_>>();

        self.order.arrange(&mut terms);
        DasDgeResults::new(terms, n_tests, n_degenerate)
    }

    /// Test a single GO term, logging why it is skipped on failure
    fn test_term(&self, term: &TermObservations) -> Result<SignedRank, Error> {
        let test = wilcoxon_signed_rank(&term.das_scores(), &term.dge_scores());
        match &test {
            Ok(test) => debug!(
                go_id = term.go_id(),
                n = test.n,
                statistic = test.statistic,
                pvalue = test.pvalue,
                "Signed-rank test ({:?})",
                test.method
            ),
            Err(Error::DegenerateTest) => warn!(
                go_id = term.go_id(),
                "Skipping {}: DAS and DGE scores are identical in every file",
                term.go_label()
            ),
            Err(e) => warn!(go_id = term.go_id(), "Skipping {}: {}", term.go_label(), e),
        }
        test
    }

    fn build_result(
        &self,
        term: &TermObservations,
        test: &SignedRank,
        adj_pvalue: f64,
        n_tests: usize,
    ) -> TermResult {
        TermResult::builder()
            .go_id(term.go_id().to_string())
            .go_label(term.go_label().to_string())
            .statistic(test.statistic)
            .pvalue(test.pvalue)
            .adj_pvalue(adj_pvalue)
            .n_tests(n_tests)
            .n_obs(test.n)
            .mean_das(arithmetic_mean(&term.das_scores()))
            .mean_dge(arithmetic_mean(&term.dge_scores()))
            .build()
    }
}
