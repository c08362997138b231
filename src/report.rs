use std::io::Write;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use serde::{Deserialize, Serialize};

use crate::advice::Advice;
use crate::error::ReportError;
use crate::model::DerivedMetrics;

pub const REPORT_MIME: &str = "application/pdf";
pub const DEFAULT_DOWNLOAD_NAME: &str = "business_report.pdf";

const PT_TO_MM: f32 = 25.4 / 72.0;
// Helvetica-Bold has no metrics table here; average glyph width in em
const APPROX_BOLD_CHAR_WIDTH_EM: f32 = 0.55;

/// Geometry of the exported document, in millimetres and points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub left_margin_mm: f32,
    pub top_margin_mm: f32,
    /// A new page starts when the next line would cross this margin.
    pub bottom_margin_mm: f32,
    pub cell_width_mm: f32,
    pub line_height_mm: f32,
    pub title_gap_mm: f32,
    pub title_size_pt: f32,
    pub body_size_pt: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            left_margin_mm: 10.0,
            top_margin_mm: 10.0,
            bottom_margin_mm: 15.0,
            cell_width_mm: 200.0,
            line_height_mm: 10.0,
            title_gap_mm: 10.0,
            title_size_pt: 16.0,
            body_size_pt: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    Title,
    Body,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: LineStyle,
    pub x_mm: f32,
    /// Baseline, measured from the top edge of the page.
    pub baseline_mm: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Report {
    pub fn build(
        business_name: &str,
        total_revenue: f64,
        metrics: &DerivedMetrics,
        advice: &[Advice],
    ) -> Self {
        let mut lines = vec![
            format!("Total Revenue: {}", format_currency(total_revenue)),
            format!("Gross Profit: {}", format_currency(metrics.gross_profit)),
            format!("Net Profit: {}", format_currency(metrics.net_profit)),
            format!("Cash Flow: {}", format_currency(metrics.cash_flow)),
            format!("ROI: {}", format_percent(metrics.roi)),
            format!("Predicted Revenue: {}", format_currency(metrics.projected_revenue)),
        ];
        lines.iter_mut().for_each(|l| *l = clean_text(l));

        lines.push("Recommendations:".to_string());
        lines.extend(advice.iter().map(|a| clean_text(&format!("- {}", a.message()))));

        Report {
            title: clean_text(&format!("{business_name} - Business Report")),
            lines,
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = self.title.clone();
        out.push('\n');
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }

    /// Lays the report out top to bottom, breaking pages at the bottom margin.
    pub fn paginate(&self, layout: &PageLayout) -> Vec<Page> {
        let limit = layout.page_height_mm - layout.bottom_margin_mm;
        let mut pages = vec![Page::default()];
        let mut y = layout.top_margin_mm;

        let title_mm = layout.title_size_pt * PT_TO_MM;
        let title_width = self.title.chars().count() as f32 * title_mm * APPROX_BOLD_CHAR_WIDTH_EM;
        let title_x = layout.left_margin_mm + ((layout.cell_width_mm - title_width) / 2.0).max(0.0);

        pages[0].lines.push(PlacedLine {
            text: self.title.clone(),
            style: LineStyle::Title,
            x_mm: title_x,
            baseline_mm: baseline(y, layout.line_height_mm, layout.title_size_pt),
        });
        y += layout.line_height_mm + layout.title_gap_mm;

        for text in &self.lines {
            if y + layout.line_height_mm > limit && y > layout.top_margin_mm {
                pages.push(Page::default());
                y = layout.top_margin_mm;
            }
            if let Some(page) = pages.last_mut() {
                page.lines.push(PlacedLine {
                    text: text.clone(),
                    style: LineStyle::Body,
                    x_mm: layout.left_margin_mm,
                    baseline_mm: baseline(y, layout.line_height_mm, layout.body_size_pt),
                });
            }
            y += layout.line_height_mm;
        }

        pages
    }
}

// Vertically centres the text inside a cell starting at `top`
fn baseline(top: f32, cell_height: f32, size_pt: f32) -> f32 {
    top + cell_height / 2.0 + 0.3 * size_pt * PT_TO_MM
}

/// Drops every character the built-in PDF fonts cannot show.
pub fn clean_text(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii()).collect()
}

/// `$1,234.50`; negatives keep the sign after the dollar: `$-200.00`.
pub fn format_currency(value: f64) -> String {
    format!("${}", group_thousands(value))
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn group_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{value:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac_part}")
}

pub fn render_pdf(report: &Report, layout: &PageLayout) -> Result<Vec<u8>, ReportError> {
    let width = Mm(layout.page_width_mm);
    let height = Mm(layout.page_height_mm);
    let (doc, first_page, first_layer) = PdfDocument::new(report.title.as_str(), width, height, "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    for (i, page) in report.paginate(layout).iter().enumerate() {
        let (page_idx, layer_idx) = if i == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_idx).get_layer(layer_idx);

        for line in &page.lines {
            let (font, size): (&IndirectFontRef, f32) = match line.style {
                LineStyle::Title => (&bold, layout.title_size_pt),
                LineStyle::Body => (&regular, layout.body_size_pt),
            };
            layer.use_text(
                line.text.as_str(),
                size,
                Mm(line.x_mm),
                Mm(layout.page_height_mm - line.baseline_mm),
                font,
            );
        }
    }

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}

/// Renders the report into a uniquely named PDF in the temp directory.
/// The file is kept after return; nothing here removes it.
pub fn export_to_temp(report: &Report, layout: &PageLayout) -> Result<PathBuf, ReportError> {
    tracing::debug!(contents = %report.to_text(), "rendering business report");
    let bytes = render_pdf(report, layout)?;

    let mut file = tempfile::Builder::new()
        .prefix("business_report_")
        .suffix(".pdf")
        .tempfile()?;
    file.write_all(&bytes)?;
    file.flush()?;
    let (_, path) = file.keep()?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), mime = REPORT_MIME, "business report exported");
    Ok(path)
}

/// Copies an exported report to where the user asked for it.
pub fn save_download(exported: &Path, dest: &Path) -> Result<u64, ReportError> {
    let copied = std::fs::copy(exported, dest)?;
    tracing::info!(dest = %dest.display(), bytes = copied, "business report saved");
    Ok(copied)
}
