use std::{
  io::Write,
  time::{Duration, Instant},
};

use kurbo::Point;
use polars::df;
use scatterswitch::{
  Chart, ChartConfig, ChartError, Dataset, DatasetLoader, LinearScale, Padding, ScaleFactory,
  error::DomainError,
};

fn two_states() -> Dataset {
  let df = df! {
    "abbr" => &["A", "B"],
    "poverty" => &[10.0, 50.0],
    "healthcare" => &[20.0, 60.0],
    "age" => &[30.0, 70.0],
  }
  .unwrap();
  let config = ChartConfig::default();
  Dataset::from_frame(&df, &config.label_field, &config.numeric_fields()).unwrap()
}

fn x_scale(dataset: &Dataset, field: &str) -> LinearScale {
  let config = ChartConfig::default();
  ScaleFactory::make_scale(dataset, field, config.plot_area().x, config.x_padding).unwrap()
}

fn label_position(chart: &Chart, field: &str, now: Instant) -> Point {
  chart.frame(now).labels.iter().find(|l| l.field == field).unwrap().position
}

#[test]
fn clicking_a_label_animates_to_the_new_field() {
  let dataset = two_states();
  let poverty = x_scale(&dataset, "poverty");
  let age = x_scale(&dataset, "age");
  let y = ScaleFactory::make_scale(
    &dataset,
    "healthcare",
    ChartConfig::default().plot_area().y,
    Padding::new(0.0, 1.0),
  )
  .unwrap();

  let mut chart = Chart::from_dataset(ChartConfig::default(), dataset).unwrap();
  let start = Instant::now();

  let frame = chart.frame(start);
  let centers = frame.points.iter().map(|p| p.center).collect::<Vec<_>>();
  assert_eq!(
    centers,
    vec![Point::new(poverty.apply(10.0), y.apply(20.0)), Point::new(poverty.apply(50.0), y.apply(60.0))]
  );
  assert_eq!(frame.active_label().unwrap().field, "poverty");

  assert!(chart.hover(centers[0], start));
  let tooltip = chart.frame(start).tooltip.unwrap();
  assert_eq!(tooltip.title, "A");
  assert_eq!(tooltip.body, "% in Poverty: 10");

  let click = label_position(&chart, "age", start) - kurbo::Vec2::new(0.0, 4.0);
  assert!(chart.click(click, start));
  assert!(chart.is_animating(start + Duration::from_millis(500)));

  let halfway = chart.frame(start + Duration::from_millis(500));
  let expected = (poverty.apply(10.0) + age.apply(30.0)) / 2.0;
  assert!((halfway.point(0).unwrap().center.x - expected).abs() < 1e-9);

  let done = start + Duration::from_secs(1);
  assert!(!chart.is_animating(done));
  let frame = chart.frame(done);
  assert_eq!(frame.point(0).unwrap().center.x, age.apply(30.0));
  assert_eq!(frame.point(1).unwrap().center.x, age.apply(70.0));
  assert_eq!(frame.point(1).unwrap().center.y, y.apply(60.0));
  assert_eq!(frame.active_label().unwrap().field, "age");
  assert_eq!(frame.tooltip.unwrap().body, "Age: 30");
}

#[test]
fn clicking_the_active_label_is_a_noop() {
  let mut chart = Chart::from_dataset(ChartConfig::default(), two_states()).unwrap();
  let now = Instant::now();
  let before = *chart.controller().unwrap().x_scale();

  let click = label_position(&chart, "poverty", now) - kurbo::Vec2::new(0.0, 4.0);
  assert!(!chart.click(click, now));
  assert!(!chart.is_animating(now));
  assert_eq!(*chart.controller().unwrap().x_scale(), before);
}

#[test]
fn instant_transition_shows_the_new_field_at_once() {
  let dataset = two_states();
  let age = x_scale(&dataset, "age");
  let config = ChartConfig { transition: 0, ..ChartConfig::default() };
  let mut chart = Chart::from_dataset(config, dataset).unwrap();
  let now = Instant::now();

  let click = label_position(&chart, "age", now) - kurbo::Vec2::new(0.0, 4.0);
  assert!(chart.click(click, now));
  assert!(!chart.is_animating(now));

  let frame = chart.frame(now);
  assert_eq!(frame.point(0).unwrap().center.x, age.apply(30.0));
  assert_eq!(frame.active_label().unwrap().field, "age");
}

#[test]
fn leaving_the_surface_hides_the_tooltip() {
  let mut chart = Chart::from_dataset(ChartConfig::default(), two_states()).unwrap();
  let now = Instant::now();
  let center = chart.frame(now).point(1).unwrap().center;

  assert!(chart.hover(center, now));
  assert_eq!(chart.frame(now).tooltip.unwrap().title, "B");

  assert!(chart.leave());
  let frame = chart.frame(now);
  assert!(frame.tooltip.is_none());
  assert!(frame.points.iter().all(|p| !p.hovered));
  assert!(!chart.leave());
}

#[test]
fn single_record_sits_mid_axis() {
  let df = df! {
    "abbr" => &["A"],
    "poverty" => &[10.0],
    "healthcare" => &[20.0],
    "age" => &[30.0],
  }
  .unwrap();
  let config = ChartConfig { x_padding: Padding::NONE, ..ChartConfig::default() };
  let dataset = Dataset::from_frame(&df, &config.label_field, &config.numeric_fields()).unwrap();
  let plot = config.plot_area();

  let chart = Chart::from_dataset(config, dataset).unwrap();
  let frame = chart.frame(Instant::now());
  assert_eq!(frame.points[0].center.x, plot.x.mid());
}

#[test]
fn missing_dataset_leaves_the_chart_empty() {
  let config = ChartConfig { data: "no/such/data.csv".into(), ..ChartConfig::default() };
  let mut chart = Chart::load(config);
  let now = Instant::now();

  assert!(chart.controller().is_none());
  let frame = chart.frame(now);
  assert!(frame.points.is_empty());
  assert!(frame.x_axis.is_none());
  assert!(!chart.click(Point::new(510.0, 456.0), now));
}

#[test]
fn non_numeric_dataset_leaves_the_chart_empty() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "abbr,poverty,age,healthcare").unwrap();
  writeln!(file, "AL,19.3,old,13.9").unwrap();

  let config = ChartConfig { data: file.path().to_path_buf(), ..ChartConfig::default() };
  let chart = Chart::load(config);
  assert!(chart.controller().is_none());
}

#[test]
fn empty_dataset_leaves_the_chart_empty() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "abbr,poverty,age,healthcare").unwrap();

  let config = ChartConfig { data: file.path().to_path_buf(), ..ChartConfig::default() };
  let loader = DatasetLoader::new(&config.label_field, &config.numeric_fields());
  let dataset = loader.load(file.path()).unwrap();
  assert!(dataset.is_empty());
  let err = Chart::from_dataset(config.clone(), dataset).err().unwrap();
  assert!(matches!(err, ChartError::Domain(DomainError::Empty(ref f)) if f == "healthcare"));

  let mut chart = Chart::load(config);
  let now = Instant::now();
  assert!(chart.controller().is_none());
  assert!(chart.frame(now).points.is_empty());
  assert!(!chart.hover(Point::new(500.0, 250.0), now));
}

#[test]
fn loads_the_bundled_dataset() {
  let chart = Chart::load(ChartConfig::default());
  let controller = chart.controller().unwrap();
  assert_eq!(controller.dataset().len(), 10);
  assert_eq!(chart.frame(Instant::now()).points.len(), 10);
}
