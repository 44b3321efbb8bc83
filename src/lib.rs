//! dasdge: paired comparison of DAS and DGE Gene Ontology enrichment
//!
//! Each input table holds the GO enrichment of one sample, with lines for
//! differential alternative splicing (`DAS`) and differential gene expression
//! (`DGE`). This library pairs the two analyses per GO term and sample, collects
//! the pairs over all samples, and tests each GO term with a two-sided Wilcoxon
//! signed-rank test, Bonferroni-corrected over the number of GO terms.
//!
//! The main components of this library are:
//! - `parse`: Parsing of table lines and `7/29(24.1%)` count fields
//! - `PairedRecord`: The DAS and DGE enrichment of one GO term in one table
//! - `Accumulation`: Score pairs per GO term across all tables
//! - `DasDge`: The test runner
//! - `DasDgeResults`: Structure to hold and display the results

mod accumulator;
mod config;
mod dasdge;
mod error;
mod math;
pub mod parse;
mod record;
mod results;
mod utils;

pub use accumulator::{Accumulation, Observation, TermObservations};
pub use config::{AbsentSide, OrderConfig};
pub use dasdge::{DasDge, DEFAULT_ALPHA};
pub use error::{Error, Result};
pub use math::{arithmetic_mean, wilcoxon_signed_rank, PValueMethod, SignedRank};
pub use record::{aggregate_file, aggregate_reader, significance_score, PairedRecord, Side};
pub use results::{DasDgeResults, TermResult};
pub use utils::{file_label, list_tsv_files};
