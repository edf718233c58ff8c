use std::io::{self, Write};

use crate::core::services::Buckets;

const DEFAULT_WIDTH: u16 = 80;
const MIN_BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
}

/// A labelled series plus the text needed to present it.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub series: Buckets,
}

impl Chart {
    pub fn pie(title: impl Into<String>, series: Buckets) -> Self {
        Self {
            kind: ChartKind::Pie,
            title: title.into(),
            x_label: None,
            y_label: None,
            series,
        }
    }

    pub fn bar(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        series: Buckets,
    ) -> Self {
        Self {
            kind: ChartKind::Bar,
            title: title.into(),
            x_label: Some(x_label.into()),
            y_label: Some(y_label.into()),
            series,
        }
    }
}

/// Presents a chart. The shell only cares whether rendering succeeded.
pub trait ChartRenderer {
    fn render(&mut self, chart: &Chart) -> io::Result<()>;
}

/// Draws charts as text: pie slices become percentage share bars, bar charts
/// become horizontal bars scaled to the available width.
pub struct ConsoleChartRenderer<W> {
    out: W,
    width: Option<u16>,
    currency_label: String,
    plain: bool,
}

impl<W: Write> ConsoleChartRenderer<W> {
    pub fn new(out: W, currency_label: impl Into<String>) -> Self {
        Self {
            out,
            width: None,
            currency_label: currency_label.into(),
            plain: false,
        }
    }

    /// Fixes the width instead of asking the terminal.
    pub fn with_width(mut self, width: Option<u16>) -> Self {
        self.width = width;
        self
    }

    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn total_width(&self) -> usize {
        let width = self.width.unwrap_or_else(|| {
            crossterm::terminal::size()
                .map(|(columns, _)| columns)
                .unwrap_or(DEFAULT_WIDTH)
        });
        usize::from(width)
    }

    fn glyphs(&self) -> (char, char) {
        if self.plain {
            ('#', '.')
        } else {
            ('█', '░')
        }
    }

    fn render_pie(&mut self, chart: &Chart, label_width: usize, bar_width: usize) -> io::Result<()> {
        let total = chart.series.total();
        let (fill, empty) = self.glyphs();
        for (label, value) in chart.series.iter() {
            let share = if total > 0.0 { value / total } else { 0.0 };
            let filled = scaled(share, 1.0, bar_width);
            writeln!(
                self.out,
                "{:<label_width$}  {}{}  {:>5.1}%  {}{:.2}",
                label,
                fill.to_string().repeat(filled),
                empty.to_string().repeat(bar_width - filled),
                share * 100.0,
                self.currency_label,
                value,
            )?;
        }
        Ok(())
    }

    fn render_bar(&mut self, chart: &Chart, label_width: usize, bar_width: usize) -> io::Result<()> {
        let max = chart.series.max_value();
        let (fill, _) = self.glyphs();
        if let Some(y_label) = &chart.y_label {
            writeln!(self.out, "{:<label_width$}  {}", "", y_label)?;
        }
        for (label, value) in chart.series.iter() {
            let filled = scaled(value, max, bar_width);
            writeln!(
                self.out,
                "{:<label_width$}  {:<bar_width$}  {}{:.2}",
                label,
                fill.to_string().repeat(filled),
                self.currency_label,
                value,
            )?;
        }
        if let Some(x_label) = &chart.x_label {
            writeln!(self.out, "{:<label_width$}", x_label)?;
        }
        Ok(())
    }
}

impl<W: Write> ChartRenderer for ConsoleChartRenderer<W> {
    fn render(&mut self, chart: &Chart) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", chart.title)?;
        writeln!(self.out, "{}", "=".repeat(chart.title.chars().count()))?;

        let label_width = chart
            .series
            .iter()
            .map(|(label, _)| label.chars().count())
            .chain(chart.x_label.iter().map(|label| label.chars().count()))
            .max()
            .unwrap_or(0);
        let widest_value = chart
            .series
            .iter()
            .map(|(_, value)| format!("{}{:.2}", self.currency_label, value).chars().count())
            .max()
            .unwrap_or(0);
        // label, two gaps, share column for pies, value column
        let reserved = label_width + 4 + 9 + widest_value;
        let bar_width = self
            .total_width()
            .saturating_sub(reserved)
            .max(MIN_BAR_WIDTH);

        match chart.kind {
            ChartKind::Pie => self.render_pie(chart, label_width, bar_width)?,
            ChartKind::Bar => self.render_bar(chart, label_width, bar_width)?,
        }
        self.out.flush()
    }
}

fn scaled(value: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    let cells = (value / max * width as f64).round() as usize;
    cells.min(width)
}
