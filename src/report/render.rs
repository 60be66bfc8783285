//! Console rendering: the ranked cost table with totals footer and the
//! narrative signal sections.

use colored::Colorize;

use crate::calendar::MonthWindow;
use crate::config::Config;

use super::analysis::{Analysis, ServiceBreakdown};
use super::TOP_SERVICES;

/// Describes how a column aligns its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Configuration for a single rendered column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableColumn {
    pub header: String,
    pub min_width: usize,
    pub alignment: Alignment,
}

impl TableColumn {
    pub fn right(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            alignment: Alignment::Right,
        }
    }

    pub fn left(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            min_width: 0,
            alignment: Alignment::Left,
        }
    }
}

/// A table with column metadata, data rows, and an optional footer row
/// separated from the body by a rule.
pub struct Table {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<Vec<String>>,
    pub footer: Option<Vec<String>>,
    pub padding: usize,
}

impl Table {
    /// Content width per column from headers, rows, and the footer.
    pub fn compute_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let mut width = column.header.chars().count().max(column.min_width);
                for row in self.rows.iter().chain(self.footer.iter()) {
                    if let Some(cell) = row.get(idx) {
                        width = width.max(cell.chars().count());
                    }
                }
                width
            })
            .collect()
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let rendered: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                render_cell(cell, widths[idx], column.alignment, self.padding)
            })
            .collect();
        rendered.join(" ").trim_end().to_string()
    }

    /// Renders header, rule, body rows, and the footer behind its own rule.
    pub fn render(&self) -> String {
        let widths = self.compute_widths();
        let header: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();

        let mut lines = Vec::new();
        lines.push(self.render_row(&header, &widths));
        lines.push(horizontal_rule(&widths, self.padding));
        for row in &self.rows {
            lines.push(self.render_row(row, &widths));
        }
        if let Some(footer) = &self.footer {
            lines.push(horizontal_rule(&widths, self.padding));
            lines.push(self.render_row(footer, &widths));
        }
        lines.join("\n")
    }
}

fn render_cell(text: &str, width: usize, alignment: Alignment, padding: usize) -> String {
    let remaining = width.saturating_sub(text.chars().count());
    let (left, right) = match alignment {
        Alignment::Left => (0, remaining),
        Alignment::Right => (remaining, 0),
    };
    format!(
        "{pad}{}{}{}{pad}",
        " ".repeat(left),
        text,
        " ".repeat(right),
        pad = " ".repeat(padding)
    )
}

fn horizontal_rule(widths: &[usize], padding: usize) -> String {
    let total: usize =
        widths.iter().map(|w| w + padding * 2).sum::<usize>() + widths.len().saturating_sub(1);
    "-".repeat(total)
}

/// Formats an amount with thousands grouping and two decimals.
pub fn format_amount(value: f64) -> String {
    let body = format!("{:.2}", value.abs());
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), "00"));
    let grouped = group_digits(int_part);
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Formats a percentage with the same grouping rules and a `%` suffix.
pub fn format_pct(value: f64) -> String {
    format!("{}%", format_amount(value))
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::new();
    let mut count = 0;
    for ch in digits.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    grouped
}

/// Renders the analyzed report to a string; the caller prints it.
pub struct ReportRenderer {
    use_color: bool,
}

impl ReportRenderer {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn render(
        &self,
        windows: &[MonthWindow],
        config: &Config,
        analysis: &Analysis,
        breakdowns: &[ServiceBreakdown],
    ) -> String {
        let mut out = self.render_table(windows, config, analysis);

        if !analysis.increases.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.heading(&format!(
                "Top {TOP_SERVICES} service cost increases last month:"
            )));
            out.push('\n');
            for (signal, breakdown) in analysis.increases.iter().zip(breakdowns) {
                out.push_str(&format!(
                    "{:>12}  {:<20}\n",
                    signal.account_id,
                    config.display_name(&signal.account_id)
                ));
                for service in &breakdown.services {
                    out.push_str(&format!(
                        "{} (Amount: +${})\n",
                        service.service,
                        format_amount(service.amount)
                    ));
                }
                out.push('\n');
            }
        }

        if !analysis.trends.is_empty() {
            out.push('\n');
            out.push_str(&self.heading(
                "Longer-term (5 months) upwards trend detected for the following account(s):",
            ));
            out.push('\n');
            for signal in &analysis.trends {
                out.push_str(&format!(
                    "{:>12}  {:<20} {:>10} {:>8}\n",
                    signal.account_id,
                    config.display_name(&signal.account_id),
                    format_amount(signal.amount),
                    format!("{:.2}", signal.slope)
                ));
            }
        }

        out
    }

    fn render_table(
        &self,
        windows: &[MonthWindow],
        config: &Config,
        analysis: &Analysis,
    ) -> String {
        let mut columns = vec![
            TableColumn::right("Account ID"),
            TableColumn::left("Account Name"),
        ];
        for window in windows {
            columns.push(TableColumn::right(window.label()));
        }
        columns.push(TableColumn::right("Last month sav./inc."));

        let rows: Vec<Vec<String>> = analysis
            .ranked
            .iter()
            .map(|row| {
                let mut cells = vec![
                    row.account_id.clone(),
                    config.display_name(&row.account_id).to_string(),
                ];
                cells.extend(row.series.values().iter().map(|cost| format_amount(*cost)));
                cells.push(format!(
                    "{} ({})",
                    format_amount(row.change),
                    format_pct(row.pct)
                ));
                cells
            })
            .collect();

        let mut footer = vec!["Total".to_string(), String::new()];
        footer.extend(analysis.totals.months.iter().map(|sum| format_amount(*sum)));
        footer.push(format!(
            "{} ({})",
            format_amount(analysis.totals.change),
            format_pct(analysis.totals.pct)
        ));

        Table {
            columns,
            rows,
            footer: Some(footer),
            padding: 1,
        }
        .render()
    }
}
