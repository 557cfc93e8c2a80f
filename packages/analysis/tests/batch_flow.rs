//! End-to-end batch flow: orchestration, merging, and facet derivation
//! over mock pipelines, with no network or real PDFs involved.

use analysis::batch::{BatchProcessor, DocumentPipeline};
use analysis::facets::{derive_facets, filter_grantees, merge_grantees, FilterOptions};
use analysis::testing::{sample_foundation, MockAi, MockPipeline};
use analysis::types::{DocumentInput, DocumentStatus};
use analysis::{pipeline, AnalysisError};

fn doc(name: &str) -> DocumentInput {
    DocumentInput::new(name, name.as_bytes().to_vec())
}

#[tokio::test]
async fn two_files_one_failure_yields_one_foundation() {
    let pipeline = MockPipeline::new()
        .with_success("first.pdf", sample_foundation("First Foundation"))
        .with_text_failure("second.pdf", "unreadable xref table");

    let processor = BatchProcessor::new(pipeline);
    let report = processor
        .process_all(vec![doc("first.pdf"), doc("second.pdf")], |_| {})
        .await
        .unwrap();

    assert_eq!(report.processed_files, 2);
    assert_eq!(report.total_files, 2);
    assert_eq!(report.foundations().len(), 1);
    assert_eq!(report.error_count(), 1);
    assert!(matches!(
        report.outcomes[1].result,
        Err(AnalysisError::Pdf(_))
    ));
}

#[tokio::test]
async fn merged_grantees_drive_facets_and_filters() {
    let mut second = sample_foundation("Second Foundation");
    second.grantees.truncate(2); // 75k Madison/WI + 50k Milwaukee/WI
    for grantee in &mut second.grantees {
        grantee.year = 2022;
    }

    let pipeline = MockPipeline::new()
        .with_success("a.pdf", sample_foundation("First Foundation"))
        .with_success("b.pdf", second);

    let report = BatchProcessor::new(pipeline)
        .process_all(vec![doc("a.pdf"), doc("b.pdf")], |_| {})
        .await
        .unwrap();

    let merged = merge_grantees(report.foundations());
    assert_eq!(merged.len(), 7);
    assert!(merged
        .iter()
        .all(|grantee| grantee.foundation.is_some()));

    let facets = derive_facets(&merged);
    assert_eq!(facets.years, vec![2023, 2022]);
    assert_eq!(facets.states, vec!["IL", "MN", "WI"]);
    assert_eq!(facets.amount_range, [35_000.0, 100_000.0]);

    // Selecting 2022 keeps only the second foundation's grants.
    let mut filters = FilterOptions::unconstrained(facets.amount_range);
    filters.years = vec![2022];
    let kept = filter_grantees(&merged, &filters);
    assert_eq!(kept.len(), 2);
    assert!(kept
        .iter()
        .all(|grantee| grantee.foundation.as_deref() == Some("Second Foundation")));
}

#[tokio::test]
async fn progress_callback_sees_monotonic_processed_counts() {
    let pipeline = MockPipeline::new()
        .with_success("a.pdf", sample_foundation("A"))
        .with_analyze_failure("b.pdf", "model returned prose")
        .with_success("c.pdf", sample_foundation("C"));

    let mut counts = Vec::new();
    let report = BatchProcessor::new(pipeline)
        .process_all(vec![doc("a.pdf"), doc("b.pdf"), doc("c.pdf")], |update| {
            counts.push((update.status, update.processed_files));
        })
        .await
        .unwrap();

    assert_eq!(
        counts,
        vec![
            (DocumentStatus::Processing, 0),
            (DocumentStatus::Success, 1),
            (DocumentStatus::Processing, 1),
            (DocumentStatus::Error, 2),
            (DocumentStatus::Processing, 2),
            (DocumentStatus::Success, 3),
        ]
    );
    assert_eq!(report.foundations().len(), 2);
}

#[tokio::test]
async fn mock_ai_flows_through_structured_extraction() {
    let ai = MockAi::returning(
        r#"{
            "name": "Wire Foundation",
            "ein": "98-7654321",
            "totalAssets": 5000000,
            "totalGiving": 400000,
            "contactInfo": {"phone": "(555) 000-1111", "address": null, "website": null},
            "keyPersonnel": [{"name": "Ada", "role": "Treasurer"}],
            "grantees": [
                {"name": "Org A", "year": 2024, "location": {"city": "Rome", "state": "NY"}, "amount": 10000, "purpose": "Education"},
                {"name": "Org B", "year": 2024, "location": {"city": "Troy", "state": "NY"}, "amount": 30000, "purpose": "Health"}
            ]
        }"#,
    );

    let foundation = pipeline::analyze_text(&ai, "extracted 990 text").await.unwrap();
    assert_eq!(foundation.name, "Wire Foundation");
    assert_eq!(foundation.average_grant_amount, 20_000.0);
    // sorted[1] of [10000, 30000], no interpolation.
    assert_eq!(foundation.median_grant_amount, 30_000.0);
    assert_eq!(ai.call_count(), 1);
}
