use std::{fs, path::Path};

use approx::assert_relative_eq;
use dasdge::{list_tsv_files, AbsentSide, Accumulation, DasDge, Error};

fn line(category: &str, go_label: &str, go_id: &str, adj_pvalue: f64) -> String {
    format!("{category}\t{go_label}\t{go_id}\t7/29(24.1%)\t120/4000(3.0%)\t0.001\t{adj_pvalue}\n")
}

fn write_table(dir: &Path, name: &str, lines: &[String]) {
    fs::write(dir.join(name), lines.concat()).unwrap();
}

fn accumulate(dir: &Path, absent_side: AbsentSide) -> dasdge::Result<Accumulation> {
    let files = list_tsv_files(dir)?;
    Accumulation::from_files(&files, absent_side)
}

fn report(dir: &Path) -> String {
    let acc = accumulate(dir, AbsentSide::ZeroFill).unwrap();
    let mut buffer = Vec::new();
    DasDge::default().run(&acc).write(&mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

#[test]
fn two_files_build_paired_sequences() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "sample1.tsv",
        &[
            line("DAS", "splicing", "GO:0001", 0.01),
            line("DGE", "splicing", "GO:0001", 0.5),
        ],
    );
    write_table(
        dir.path(),
        "sample2.tsv",
        &[
            line("DGE", "splicing", "GO:0001", 0.6),
            line("DAS", "splicing", "GO:0001", 0.02),
        ],
    );

    let acc = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap();
    let das = acc.das_scores("GO:0001").unwrap();
    let dge = acc.dge_scores("GO:0001").unwrap();
    assert_eq!(das.len(), 2);
    assert_relative_eq!(das[0], 2.0);
    assert_relative_eq!(das[1], 1.699, epsilon = 1e-3);
    assert_relative_eq!(dge[0], 0.301, epsilon = 1e-3);
    assert_relative_eq!(dge[1], 0.222, epsilon = 1e-3);

    let files: Vec<&str> = acc
        .get("GO:0001")
        .unwrap()
        .observations()
        .iter()
        .map(|o| o.file.as_str())
        .collect();
    assert_eq!(files, vec!["sample1.tsv", "sample2.tsv"]);

    // two pairs can never reach p < 0.05
    let test = dasdge::wilcoxon_signed_rank(&das, &dge).unwrap();
    assert_relative_eq!(test.pvalue, 0.5);
    assert!(DasDge::default().run(&acc).is_empty());
}

fn significant_fixture(dir: &Path) {
    for i in 0..7 {
        let das = 0.01 / (i + 1) as f64;
        let mut lines = vec![
            line("DAS", "mRNA splicing", "GO:0000398", das),
            line("DGE", "mRNA splicing", "GO:0000398", 0.5),
            line("DAS", "transport", "GO:0006810", 0.2),
            line("DGE", "transport", "GO:0006810", 0.2),
        ];
        if i == 3 {
            lines.push(line("DAS", "translation", "GO:0006412", 0.3));
        }
        write_table(dir, &format!("sample{i}.tsv"), &lines);
    }
    fs::write(
        dir.join("README.txt"),
        line("DAS", "ignored", "GO:9999999", 0.0001),
    )
    .unwrap();
}

#[test]
fn reports_significant_terms() {
    let dir = tempfile::tempdir().unwrap();
    significant_fixture(dir.path());

    let acc = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap();
    assert_eq!(acc.len(), 3);
    assert!(acc.get("GO:9999999").is_none());

    let results = DasDge::default().run(&acc);
    assert_eq!(results.n_tests, 3);
    assert_eq!(results.n_degenerate, 1);
    assert_eq!(results.len(), 1);
    let term = &results.terms[0];
    assert_eq!(term.go_id, "GO:0000398");
    assert_eq!(term.statistic, 0.0);
    assert_relative_eq!(term.pvalue, 0.015625);
    assert_eq!(term.n_obs, 7);

    let text = report(dir.path());
    assert!(text.starts_with("mRNA splicing (GO:0000398): T=0.0; p=0.015625 (Bonferroni); "));
    assert_eq!(text.lines().count(), 1);
    assert!(!text.contains("GO:9999999"));
}

#[test]
fn absent_side_policy_changes_term_count() {
    let dir = tempfile::tempdir().unwrap();
    significant_fixture(dir.path());

    // GO:0006412 has a DAS line in one table only
    let zero_filled = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap();
    let das = zero_filled.das_scores("GO:0006412").unwrap();
    let dge = zero_filled.dge_scores("GO:0006412").unwrap();
    assert_eq!(das.len(), 1);
    assert_eq!(dge, vec![0.0]);

    let excluded = accumulate(dir.path(), AbsentSide::Exclude).unwrap();
    assert_eq!(excluded.len(), 2);
    assert!(excluded.get("GO:0006412").is_none());

    // with only two GO terms the correction is milder
    let results = DasDge::default().run(&excluded);
    assert_eq!(results.n_tests, 2);
    assert_eq!(results.len(), 1);
}

#[test]
fn output_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    significant_fixture(dir.path());
    assert_eq!(report(dir.path()), report(dir.path()));
}

#[test]
fn duplicate_category_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "broken.tsv",
        &[
            line("DAS", "splicing", "GO:0001", 0.01),
            line("DGE", "splicing", "GO:0001", 0.5),
            line("DAS", "splicing", "GO:0001", 0.02),
        ],
    );
    let err = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap_err();
    assert!(matches!(err.root(), Error::DuplicateCategory { .. }));
    let message = err.to_string();
    assert!(message.contains("broken.tsv"));
    assert!(message.contains("line 3"));
}

#[test]
fn unknown_category_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_table(
        dir.path(),
        "sample.tsv",
        &[line("DTU", "splicing", "GO:0001", 0.01)],
    );
    let err = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap_err();
    assert!(matches!(err.root(), Error::UnknownCategory(_)));
}

#[test]
fn zero_adjusted_pvalue_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..3 {
        write_table(
            dir.path(),
            &format!("sample{i}.tsv"),
            &[
                line("DAS", "splicing", "GO:0001", 0.0),
                line("DGE", "splicing", "GO:0001", 0.0),
            ],
        );
    }
    let err = accumulate(dir.path(), AbsentSide::ZeroFill).unwrap_err();
    assert!(matches!(err.root(), Error::MalformedLine(_)));
    assert!(err.to_string().contains("sample0.tsv: line 1"));
}
