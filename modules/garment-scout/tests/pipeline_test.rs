//! End-to-end runs of the four-step pipeline against mock collaborators.
//!
//! No network: the vision model, text model and search backend are the
//! mocks from `garment_scout::testing`.

use std::sync::Arc;

use serde_json::json;

use garment_scout::testing::{organic, write_test_image, MockSearch, MockText, MockVision};
use garment_scout::{Pipeline, PipelineState, Step, StepError};

fn pipeline(vision: &Arc<MockVision>, text: &Arc<MockText>, search: &Arc<MockSearch>) -> Pipeline {
    Pipeline::new(vision.clone(), text.clone(), search.clone())
}

#[tokio::test]
async fn full_run_yields_top_five_links() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_test_image(dir.path(), "red_skirt.jpg");

    let vision = Arc::new(MockVision::replying(
        "A red pleated midi skirt with a high elastic waistband.",
    ));
    let text = Arc::new(MockText::replying("\"red pleated skirt\""));
    let search = Arc::new(MockSearch::returning(organic(&[
        "https://shop-a.example/skirt",
        "https://shop-b.example/midi",
        "https://shop-c.example/red",
        "https://shop-d.example/pleats",
        "https://shop-e.example/skirts",
        "https://shop-f.example/sale",
    ])));

    let report = pipeline(&vision, &text, &search).run(&image).await;

    assert!(report.is_clean());
    assert_eq!(
        report.steps.iter().map(|s| s.step).collect::<Vec<_>>(),
        Step::ALL
    );
    assert_eq!(report.state.image_path, image);
    assert_eq!(
        report.state.image_description,
        "A red pleated midi skirt with a high elastic waistband."
    );
    assert_eq!(report.state.search_query, "red pleated skirt");
    assert_eq!(search.queries(), vec!["red pleated skirt".to_string()]);
    assert_eq!(
        report.recommendations(),
        [
            "https://shop-a.example/skirt",
            "https://shop-b.example/midi",
            "https://shop-c.example/red",
            "https://shop-d.example/pleats",
            "https://shop-e.example/skirts",
        ]
    );
}

#[tokio::test]
async fn unreadable_image_degrades_every_later_step() {
    let dir = tempfile::tempdir().unwrap();

    let vision = Arc::new(MockVision::replying("unused"));
    let text = Arc::new(MockText::replying("unused"));
    let search = Arc::new(MockSearch::returning(organic(&["https://unused.example"])));

    let report = pipeline(&vision, &text, &search)
        .run(dir.path().join("missing.jpg"))
        .await;

    let degraded: Vec<Step> = report.degraded_steps().map(|s| s.step).collect();
    assert_eq!(
        degraded,
        [Step::ProcessImage, Step::GenerateQuery, Step::SearchInternet]
    );
    assert!(matches!(
        report.steps[1].outcome.error(),
        Some(StepError::MissingDescription)
    ));
    assert!(report.state.image_description.is_empty());
    assert!(report.state.search_query.is_empty());
    assert_eq!(report.state.search_results, json!({"organic": []}));
    assert!(report.recommendations().is_empty());

    assert!(vision.calls().is_empty());
    assert!(text.prompts().is_empty());
    assert!(search.queries().is_empty());
}

#[tokio::test]
async fn search_outage_still_completes() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_test_image(dir.path(), "jacket.png");

    let vision = Arc::new(MockVision::replying("A light-wash blue denim jacket."));
    let text = Arc::new(MockText::replying("blue denim jacket"));
    let search = Arc::new(MockSearch::failing(503, "Service Unavailable"));

    let report = pipeline(&vision, &text, &search).run(&image).await;

    let degraded: Vec<Step> = report.degraded_steps().map(|s| s.step).collect();
    assert_eq!(degraded, [Step::SearchInternet]);
    assert_eq!(report.state.search_query, "blue denim jacket");
    assert_eq!(report.state.search_results, json!({"organic": []}));
    assert!(report.recommendations().is_empty());
    assert!(report.steps[3].outcome.is_applied());
}

#[tokio::test]
async fn text_model_failure_keeps_description() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_test_image(dir.path(), "scarf.webp");

    let vision = Arc::new(MockVision::replying("A green wool scarf with fringe."));
    let text = Arc::new(MockText::failing("model 'qwen2.5' not found"));
    let search = Arc::new(MockSearch::returning(organic(&["https://unused.example"])));

    let report = pipeline(&vision, &text, &search).run(&image).await;

    assert_eq!(report.state.image_description, "A green wool scarf with fringe.");
    assert!(report.state.search_query.is_empty());
    assert!(matches!(
        report.steps[1].outcome.error(),
        Some(StepError::Model(_))
    ));
    assert!(search.queries().is_empty());
    assert_eq!(vision.calls()[0].mime_type, "image/webp");
}

#[tokio::test]
async fn run_state_resumes_from_given_record() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_test_image(dir.path(), "boots.jpg");

    let vision = Arc::new(MockVision::failing("vision offline"));
    let text = Arc::new(MockText::replying("black leather boots"));
    let search = Arc::new(MockSearch::returning(json!({
        "organic": [{"link": "https://boots.example"}, {"title": "no link"}]
    })));

    // A description carried over from an earlier run survives a failed describe step.
    let state = PipelineState {
        image_description: "Black leather ankle boots.".to_string(),
        ..PipelineState::new(&image)
    };
    let report = pipeline(&vision, &text, &search).run_state(state).await;

    assert_eq!(report.state.image_description, "Black leather ankle boots.");
    assert_eq!(report.state.search_query, "black leather boots");
    assert_eq!(report.recommendations(), ["https://boots.example", ""]);
}
