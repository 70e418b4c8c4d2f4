use crate::ml::FeatureImportance;
use crate::ui::services::{ChartBounds, ChartData, LineSeries};
use chrono::NaiveDate;
use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke};

const CHART_HEIGHT: f32 = 260.0;
const MARGIN_LEFT: f32 = 64.0;
const MARGIN_BOTTOM: f32 = 20.0;
const MARGIN: f32 = 8.0;

const BULL: Color32 = Color32::from_rgb(38, 166, 154);
const BEAR: Color32 = Color32::from_rgb(239, 83, 80);
const SHORT_MA: Color32 = Color32::from_rgb(255, 167, 38);
const LONG_MA: Color32 = Color32::from_rgb(66, 165, 245);
const ACTUAL: Color32 = Color32::from_rgb(100, 149, 237);
const PREDICTED: Color32 = Color32::from_rgb(255, 99, 71);
const FORECAST: Color32 = Color32::from_rgb(50, 205, 50);
const GRID: Color32 = Color32::from_gray(60);
const LABEL: Color32 = Color32::from_gray(170);

/// Hand-painted charts for a finished run
pub struct Charts;

impl Charts {
    /// Candlesticks with both moving averages
    pub fn price(ui: &mut egui::Ui, data: &ChartData) {
        let points = data
            .candles
            .iter()
            .flat_map(|c| [(c.date, c.low), (c.date, c.high)])
            .chain(data.ma_short.points.iter().copied())
            .chain(data.ma_long.points.iter().copied());
        let Some(bounds) = ChartBounds::from_points(points) else {
            ui.label("No price data");
            return;
        };

        let (rect, painter) = Self::frame(ui);
        Self::axes(&painter, rect, &bounds);

        let slot = rect.width() / data.candles.len().max(1) as f32;
        let body_width = (slot * 0.6).clamp(1.0, 12.0);

        for candle in &data.candles {
            let color = if candle.is_bullish() { BULL } else { BEAR };
            let high = Self::to_screen(rect, &bounds, candle.date, candle.high);
            let low = Self::to_screen(rect, &bounds, candle.date, candle.low);
            painter.line_segment([high, low], Stroke::new(1.0, color));

            let open = Self::to_screen(rect, &bounds, candle.date, candle.open);
            let close = Self::to_screen(rect, &bounds, candle.date, candle.close);
            let body = Rect::from_min_max(
                Pos2::new(open.x - body_width / 2.0, open.y.min(close.y)),
                Pos2::new(open.x + body_width / 2.0, open.y.max(close.y).max(open.y.min(close.y) + 1.0)),
            );
            painter.rect_filled(body, egui::CornerRadius::ZERO, color);
        }

        Self::polyline(&painter, rect, &bounds, &data.ma_short, SHORT_MA);
        Self::polyline(&painter, rect, &bounds, &data.ma_long, LONG_MA);
        Self::legend(&painter, rect, &[(&data.ma_short.name, SHORT_MA), (&data.ma_long.name, LONG_MA)]);
    }

    /// Held-out closes against model output
    pub fn actual_vs_predicted(ui: &mut egui::Ui, data: &ChartData) {
        let points = data
            .actual
            .points
            .iter()
            .chain(data.predicted.points.iter())
            .copied();
        let Some(bounds) = ChartBounds::from_points(points) else {
            ui.label("No test predictions");
            return;
        };

        let (rect, painter) = Self::frame(ui);
        Self::axes(&painter, rect, &bounds);

        // Random splits leave gaps between test dates, so mark each point too
        for (series, color) in [(&data.actual, ACTUAL), (&data.predicted, PREDICTED)] {
            Self::polyline(&painter, rect, &bounds, series, color);
            for &(date, value) in &series.points {
                painter.circle_filled(Self::to_screen(rect, &bounds, date, value), 2.0, color);
            }
        }

        Self::legend(&painter, rect, &[(&data.actual.name, ACTUAL), (&data.predicted.name, PREDICTED)]);
    }

    /// Recent closes continued by the dashed forecast
    pub fn forecast(ui: &mut egui::Ui, data: &ChartData) {
        let points = data
            .history
            .points
            .iter()
            .chain(data.forecast.points.iter())
            .copied();
        let Some(bounds) = ChartBounds::from_points(points) else {
            ui.label("No forecast");
            return;
        };

        let (rect, painter) = Self::frame(ui);
        Self::axes(&painter, rect, &bounds);
        Self::polyline(&painter, rect, &bounds, &data.history, ACTUAL);

        let mut dashed: Vec<Pos2> = data
            .history
            .points
            .last()
            .map(|&(date, value)| Self::to_screen(rect, &bounds, date, value))
            .into_iter()
            .collect();
        dashed.extend(
            data.forecast
                .points
                .iter()
                .map(|&(date, value)| Self::to_screen(rect, &bounds, date, value)),
        );
        painter.extend(Shape::dashed_line(&dashed, Stroke::new(2.0, FORECAST), 6.0, 4.0));
        for point in dashed.iter().skip(1) {
            painter.circle_filled(*point, 3.0, FORECAST);
        }

        Self::legend(&painter, rect, &[(&data.history.name, ACTUAL), (&data.forecast.name, FORECAST)]);
    }

    /// Horizontal bars of |coefficient|, largest first
    pub fn importance(ui: &mut egui::Ui, importances: &[FeatureImportance]) {
        let max = importances.iter().map(|f| f.importance).fold(0.0f64, f64::max);
        if importances.is_empty() {
            ui.label("No coefficients");
            return;
        }

        let row_height = 22.0;
        let label_width = 100.0;
        let height = row_height * importances.len() as f32 + MARGIN * 2.0;
        let (response, painter) =
            ui.allocate_painter(egui::vec2(ui.available_width(), height), egui::Sense::hover());
        let rect = response.rect.shrink(MARGIN);
        let bar_span = (rect.width() - label_width).max(10.0);

        for (i, feature) in importances.iter().enumerate() {
            let top = rect.top() + i as f32 * row_height;
            painter.text(
                Pos2::new(rect.left(), top + row_height / 2.0),
                Align2::LEFT_CENTER,
                &feature.feature,
                FontId::proportional(12.0),
                LABEL,
            );

            let fraction = if max > 0.0 { (feature.importance / max) as f32 } else { 0.0 };
            let color = if feature.coefficient >= 0.0 { BULL } else { BEAR };
            let bar = Rect::from_min_size(
                Pos2::new(rect.left() + label_width, top + 3.0),
                egui::vec2((bar_span * fraction).max(1.0), row_height - 6.0),
            );
            painter.rect_filled(bar, egui::CornerRadius::ZERO, color);

            let response = ui.interact(bar, ui.id().with(("importance", i)), egui::Sense::hover());
            response.on_hover_text(format!("coefficient {:.6}", feature.coefficient));
        }
    }

    fn frame(ui: &mut egui::Ui) -> (Rect, egui::Painter) {
        let (response, painter) = ui.allocate_painter(
            egui::vec2(ui.available_width(), CHART_HEIGHT),
            egui::Sense::hover(),
        );
        painter.rect_filled(response.rect, egui::CornerRadius::same(4), Color32::from_gray(24));

        let plot = Rect::from_min_max(
            Pos2::new(response.rect.left() + MARGIN_LEFT, response.rect.top() + MARGIN),
            Pos2::new(response.rect.right() - MARGIN, response.rect.bottom() - MARGIN_BOTTOM),
        );
        (plot, painter)
    }

    fn to_screen(rect: Rect, bounds: &ChartBounds, date: NaiveDate, value: f64) -> Pos2 {
        Pos2::new(
            rect.left() + rect.width() * bounds.x_fraction(date),
            rect.bottom() - rect.height() * bounds.y_fraction(value),
        )
    }

    fn axes(painter: &egui::Painter, rect: Rect, bounds: &ChartBounds) {
        for step in 0..=4 {
            let fraction = step as f32 / 4.0;
            let y = rect.bottom() - rect.height() * fraction;
            painter.line_segment(
                [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                Stroke::new(0.5, GRID),
            );

            let value = bounds.min + (bounds.max - bounds.min) * fraction as f64;
            painter.text(
                Pos2::new(rect.left() - 4.0, y),
                Align2::RIGHT_CENTER,
                format!("{:.0}", value),
                FontId::monospace(10.0),
                LABEL,
            );
        }

        painter.text(
            Pos2::new(rect.left(), rect.bottom() + 4.0),
            Align2::LEFT_TOP,
            bounds.start.to_string(),
            FontId::monospace(10.0),
            LABEL,
        );
        painter.text(
            Pos2::new(rect.right(), rect.bottom() + 4.0),
            Align2::RIGHT_TOP,
            bounds.end.to_string(),
            FontId::monospace(10.0),
            LABEL,
        );
    }

    fn polyline(
        painter: &egui::Painter,
        rect: Rect,
        bounds: &ChartBounds,
        series: &LineSeries,
        color: Color32,
    ) {
        if series.len() < 2 {
            return;
        }
        let points = series
            .points
            .iter()
            .map(|&(date, value)| Self::to_screen(rect, bounds, date, value))
            .collect();
        painter.add(Shape::line(points, Stroke::new(1.5, color)));
    }

    fn legend(painter: &egui::Painter, rect: Rect, entries: &[(&String, Color32)]) {
        for (i, (name, color)) in entries.iter().enumerate() {
            let y = rect.top() + 4.0 + i as f32 * 14.0;
            let x = rect.left() + 8.0;
            painter.line_segment(
                [Pos2::new(x, y + 6.0), Pos2::new(x + 14.0, y + 6.0)],
                Stroke::new(2.0, *color),
            );
            painter.text(
                Pos2::new(x + 18.0, y),
                Align2::LEFT_TOP,
                name.as_str(),
                FontId::proportional(11.0),
                *color,
            );
        }
    }
}
