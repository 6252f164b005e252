use std::cell::RefCell;
use std::time::Duration;

use api::{ApiError, ApiResult, GifExportRequest, PersonScoreRecord, ScoreMap, ScorePayload, ScoreSource, StructuredScores};
use tokio::time::Instant;
use ui::batch::{BatchController, BatchOptions, BatchStatus, BatchTarget};
use ui::core::{ChartConfig, ChartError, ChartResult, Margin};
use ui::export::{DownloadSink, ExportArtifact};

fn scores(axes: &[(&str, f64)]) -> ScoreMap {
    axes.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn person(name: &str, axis_count: usize) -> PersonScoreRecord {
    let names = ["Ownership", "Communication", "Craft", "Teamwork", "Growth"];
    let individual: Vec<(&str, f64)> = names[..axis_count]
        .iter()
        .enumerate()
        .map(|(i, n)| (*n, 1.0 + i as f64 * 0.7))
        .collect();
    PersonScoreRecord {
        person_name: name.to_string(),
        scores: ScorePayload::Structured(StructuredScores {
            individual_scores: scores(&individual),
            team_averages: Some(scores(&individual[..axis_count.saturating_sub(1)])),
        }),
    }
}

struct FakeSource {
    persons: Vec<PersonScoreRecord>,
    fail_list: bool,
    list_delay: Duration,
    gif_requests: RefCell<Vec<GifExportRequest>>,
}

impl FakeSource {
    fn new(persons: Vec<PersonScoreRecord>) -> Self {
        Self {
            persons,
            fail_list: false,
            list_delay: Duration::ZERO,
            gif_requests: RefCell::new(Vec::new()),
        }
    }
}

impl ScoreSource for FakeSource {
    async fn all_persons(&self) -> ApiResult<Vec<PersonScoreRecord>> {
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        if self.fail_list {
            return Err(ApiError::Rejected("No data uploaded".into()));
        }
        Ok(self.persons.clone())
    }

    async fn export_gif(&self, request: &GifExportRequest) -> ApiResult<()> {
        self.gif_requests.borrow_mut().push(request.clone());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingSink {
    delivered: Vec<(String, Instant)>,
}

impl DownloadSink for RecordingSink {
    async fn deliver(&mut self, artifact: &ExportArtifact) -> ChartResult<Option<String>> {
        assert_eq!(artifact.mime, "image/png");
        assert_eq!(&artifact.bytes[..4], b"\x89PNG");
        self.delivered.push((artifact.filename.clone(), Instant::now()));
        Ok(None)
    }
}

/// Small charts keep the PNG encoding quick.
fn small_png_options() -> BatchOptions {
    BatchOptions {
        config: ChartConfig {
            margin: Margin::new(10.0, 20.0, 10.0, 20.0),
            ..ChartConfig::interactive(120.0)
        },
        ..BatchOptions::default()
    }
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn one_bad_person_does_not_stop_the_batch() {
    let source = FakeSource::new(vec![
        person("Ada Lovelace", 5),
        person("Grace Hopper", 4),
        person("Broken Record", 2),
        person("Alan Turing", 3),
    ]);
    let controller = BatchController::new(small_png_options());
    let mut sink = RecordingSink::default();
    let mut steps = Vec::new();

    let summary = controller
        .run(&source, &mut sink, |step| steps.push((step.current, step.total)))
        .await
        .expect("batch runs")
        .expect("not already running");

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].name, "Broken Record");
    assert!(matches!(summary.failed[0].error, ChartError::Config(_)));

    assert_eq!(steps, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);
    let names: Vec<&str> = sink.delivered.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names.len(), 3);
    assert!(names[0].ends_with("_ada_lovelace.png"));
    assert!(names[1].ends_with("_grace_hopper.png"));
    assert!(names[2].ends_with("_alan_turing.png"));
    assert_eq!(controller.status(), BatchStatus::Completed(summary));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn downloads_are_spaced_apart() {
    let source = FakeSource::new(vec![person("A", 3), person("B", 3), person("C", 3)]);
    let controller = BatchController::new(small_png_options());
    let mut sink = RecordingSink::default();

    controller
        .run(&source, &mut sink, |_| {})
        .await
        .expect("batch runs");

    let times: Vec<Instant> = sink.delivered.iter().map(|(_, at)| *at).collect();
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(200));
    }
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn failing_person_list_aborts_and_resets() {
    let mut source = FakeSource::new(vec![person("A", 3)]);
    source.fail_list = true;
    let controller = BatchController::new(small_png_options());
    let mut sink = RecordingSink::default();

    let err = controller.run(&source, &mut sink, |_| {}).await.unwrap_err();
    assert_eq!(err, ChartError::Network("No data uploaded".into()));
    assert_eq!(controller.status(), BatchStatus::Idle);
    assert!(sink.delivered.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn second_start_while_running_is_ignored() {
    let mut source = FakeSource::new(vec![person("A", 3)]);
    source.list_delay = Duration::from_millis(50);
    let controller = BatchController::new(small_png_options());
    let other_handle = controller.clone();
    let mut first_sink = RecordingSink::default();
    let mut second_sink = RecordingSink::default();

    let (first, second) = tokio::join!(
        controller.run(&source, &mut first_sink, |_| {}),
        other_handle.run(&source, &mut second_sink, |_| {}),
    );

    assert!(first.expect("first run").is_some());
    assert_eq!(second.expect("second run"), None);
    assert_eq!(first_sink.delivered.len(), 1);
    assert!(second_sink.delivered.is_empty());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn controller_can_run_again_after_completion() {
    let source = FakeSource::new(vec![person("A", 3)]);
    let controller = BatchController::new(small_png_options());
    let mut sink = RecordingSink::default();

    controller.run(&source, &mut sink, |_| {}).await.expect("first");
    let again = controller.run(&source, &mut sink, |_| {}).await.expect("second");
    assert!(again.is_some());
    assert_eq!(sink.delivered.len(), 2);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn server_gif_target_posts_svg_markup() {
    let source = FakeSource::new(vec![person("Ada Lovelace", 4), person("Grace Hopper", 4)]);
    let controller = BatchController::new(BatchOptions {
        target: BatchTarget::ServerGif {
            export_path: "/srv/exports".into(),
        },
        ..small_png_options()
    });
    let mut sink = RecordingSink::default();

    let summary = controller
        .run(&source, &mut sink, |_| {})
        .await
        .expect("batch runs")
        .expect("started");

    assert_eq!(summary.succeeded, 2);
    assert!(sink.delivered.is_empty());
    let requests = source.gif_requests.borrow();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].person_name, "Ada Lovelace");
    assert_eq!(requests[0].export_path, "/srv/exports");
    assert!(requests[0].svg_data.starts_with("<?xml"));
    assert!(requests[0].svg_data.contains("radar-area-1"));
}
