use std::{fmt, str::FromStr, sync::OnceLock};

use regex::Regex;

use crate::error::{Error, Result};

/// Number of tab-separated columns read from each enrichment line
pub const NUM_FIELDS: usize = 7;

/// The analysis an enrichment line belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Differential alternative splicing
    Das,
    /// Differential gene expression
    Dge,
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DAS" => Ok(Category::Das),
            "DGE" => Ok(Category::Dge),
            other => Err(Error::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Das => f.write_str("DAS"),
            Category::Dge => f.write_str("DGE"),
        }
    }
}

/// A count written as `numerator/denominator(percent%)`, e.g. `7/29(24.1%)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FracPerc {
    pub numerator: u64,
    pub denominator: u64,
    pub percent: f64,
}

fn frac_perc_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)/(\d+)\(([\d.]+)%\)").expect("fraction pattern is a valid regex")
    })
}

/// Parses a `7/29(24.1%)` style field
///
/// Only the start of the text is matched. Anything that does not follow the
/// pattern (or overflows) yields `None` instead of an error.
pub fn parse_fraction_percentage(text: &str) -> Option<FracPerc> {
    let captures = frac_perc_pattern().captures(text)?;
    Some(FracPerc {
        numerator: captures[1].parse().ok()?,
        denominator: captures[2].parse().ok()?,
        percent: captures[3].parse().ok()?,
    })
}

/// Parses a p-value column
///
/// An empty field or `NA` is treated as missing.
pub fn parse_pvalue(text: &str) -> Result<Option<f64>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("NA") {
        return Ok(None);
    }
    let pvalue: f64 = text
        .parse()
        .map_err(|_| Error::MalformedLine(format!("invalid p-value `{text}`")))?;
    if !(0.0..=1.0).contains(&pvalue) {
        return Err(Error::MalformedLine(format!(
            "p-value `{text}` outside of [0, 1]"
        )));
    }
    Ok(Some(pvalue))
}

/// One line of an enrichment table, split into its positional columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentLine<'a> {
    pub category: Category,
    pub go_label: &'a str,
    pub go_id: &'a str,
    pub study: &'a str,
    pub population: &'a str,
    pub pvalue: &'a str,
    pub adj_pvalue: &'a str,
}

/// Splits a tab-separated line into its first seven columns
///
/// Columns past the seventh are ignored.
pub fn parse_line(line: &str) -> Result<EnrichmentLine<'_>> {
    let fields: Vec<&str> = line
        .trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(str::trim)
        .collect();
    if fields.len() < NUM_FIELDS {
        return Err(Error::MalformedLine(format!(
            "expected {NUM_FIELDS} tab-separated fields, found {}",
            fields.len()
        )));
    }
    Ok(EnrichmentLine {
        category: fields[0].parse()?,
        go_label: fields[1],
        go_id: fields[2],
        study: fields[3],
        population: fields[4],
        pvalue: fields[5],
        adj_pvalue: fields[6],
    })
}
