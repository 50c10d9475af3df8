use std::ops::Range;
use std::panic;
use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use liftlog::{ReportParams, WorkoutLog};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};

use crate::glyphs::GlyphTextBackend;

const X_TICKS: usize = 10;
const Y_LABELS: usize = 8;
/// Pixels between the x axis and the top of a date label.
const TICK_LABEL_GAP: i32 = 10;

const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

#[derive(Clone, Copy, Debug)]
pub enum ChartKind {
    Png,
    Svg,
}

#[derive(Clone, Debug)]
struct ChartSeries {
    label: String,
    points: Vec<(NaiveDateTime, f64)>,
    color: RGBColor,
}

/// Axis extents plus where the date ticks go. Ticks always fall on whole,
/// distinct days.
#[derive(Clone, Debug, PartialEq)]
struct AxisLayout {
    x_range: Range<NaiveDateTime>,
    x_ticks: Vec<NaiveDateTime>,
    y_range: Range<f64>,
    y_precision: usize,
}

/// Render the progress chart, turning backend panics into errors.
pub fn render_chart_guard(
    log: &WorkoutLog,
    path: &Path,
    kind: ChartKind,
    params: &ReportParams,
) -> Result<()> {
    let render = || render_chart(log, path, kind, params);
    panic::catch_unwind(panic::AssertUnwindSafe(render))
        .map_err(|_| anyhow!("plotting backend panicked"))?
}

fn render_chart(
    log: &WorkoutLog,
    path: &Path,
    kind: ChartKind,
    params: &ReportParams,
) -> Result<()> {
    let series = build_series(log);
    let Some(layout) = axis_layout(&series) else {
        return Ok(());
    };
    let size = (params.width, params.height);

    match kind {
        ChartKind::Png => {
            let backend = BitMapBackend::new(path, size);
            let root = GlyphTextBackend::new(backend).into_drawing_area();
            draw_chart(root, &series, &layout, &params.title)?;
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(root, &series, &layout, &params.title)?;
        }
    }
    Ok(())
}

fn build_series(log: &WorkoutLog) -> Vec<ChartSeries> {
    log.exercises
        .iter()
        .enumerate()
        .map(|(idx, name)| ChartSeries {
            label: liftlog::display_name(name),
            points: log.records_for(name).map(|r| (r.date, r.weight)).collect(),
            color: SERIES_COLORS[idx % SERIES_COLORS.len()],
        })
        .collect()
}

fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn date_label(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Whole-day ticks from `start` through at most `end`, evenly stepped so
/// there are never more than `max_ticks`.
fn date_ticks(start: NaiveDate, end: NaiveDate, max_ticks: usize) -> Vec<NaiveDate> {
    let days = (end - start).num_days().max(0);
    let gaps = max_ticks.max(2) as i64 - 1;
    let step = ((days + gaps - 1) / gaps).max(1);
    (0..=days / step)
        .map(|i| start + Duration::days(i * step))
        .collect()
}

/// Decimal places that keep neighbouring y labels apart.
fn label_precision(range: &Range<f64>, labels: usize) -> usize {
    let step = (range.end - range.start) / labels.max(1) as f64;
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        0
    } else {
        (-step.log10()).ceil() as usize
    }
}

fn y_label(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// Pads a day either side of the logged dates and 10% around the weights;
/// a single date or a flat weight still gets a usable span.
fn axis_layout(series: &[ChartSeries]) -> Option<AxisLayout> {
    let mut points = series.iter().flat_map(|s| s.points.iter());
    let &(first_x, first_y) = points.next()?;
    let (mut x_min, mut x_max) = (first_x, first_x);
    let (mut y_min, mut y_max) = (first_y, first_y);
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    let start = x_min.date() - Duration::days(1);
    let end = x_max.date() + Duration::days(1);
    let y_pad = ((y_max - y_min) * 0.1).max(1.0);
    let y_range = (y_min - y_pad).max(0.0)..y_max + y_pad;

    Some(AxisLayout {
        x_range: midnight(start)..midnight(end),
        x_ticks: date_ticks(start, end, X_TICKS)
            .into_iter()
            .map(midnight)
            .collect(),
        y_precision: label_precision(&y_range, Y_LABELS),
        y_range,
    })
}

fn draw_chart<DB>(
    root: DrawingArea<DB, plotters::coord::Shift>,
    series: &[ChartSeries],
    layout: &AxisLayout,
    title: &str,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root;
    area.fill(&WHITE)?;

    let x_axis =
        RangedDateTime::from(layout.x_range.clone()).with_key_points(layout.x_ticks.clone());
    let mut chart = ChartBuilder::on(&area)
        .margin(20)
        .caption(
            title,
            FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal),
        )
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 150)
        .build_cartesian_2d(x_axis, layout.y_range.clone())?;

    let axis_font = FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal);
    let precision = layout.y_precision;

    // date labels are drawn below, rotated so they hang from the axis
    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Weight")
        .y_labels(Y_LABELS)
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|v| y_label(*v, precision))
        .y_label_style(axis_font.clone())
        .axis_desc_style(FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Normal))
        .light_line_style(&BLACK.mix(0.05))
        .bold_line_style(&BLACK.mix(0.15))
        .draw()?;

    let tick_style = axis_font
        .color(&BLACK)
        .transform(FontTransform::Rotate90)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for tick in &layout.x_ticks {
        let (x, y) = chart.backend_coord(&(*tick, layout.y_range.start));
        area.draw(&Text::new(
            date_label(tick),
            (x, y + TICK_LABEL_GAP),
            tick_style.clone(),
        ))?;
    }

    for s in series {
        let color = s.color;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 24, y)], color.stroke_width(2))
            });
        chart.draw_series(
            s.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK.mix(0.3))
        .label_font(
            FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Normal).color(&BLACK),
        )
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    area.present()?;
    Ok(())
}
