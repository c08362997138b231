use std::path::PathBuf;

use crate::advice::{recommend, Advice};
use crate::metrics::{chart_rows, compute};
use crate::model::{BusinessInputs, ChartRow};
use crate::report::{self, format_currency, format_percent, Report};
use crate::settings::Settings;
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Bar, BarChart, Legend, Plot};

// Dashboard accent green, shared by headings, bars and hovered widgets
const ACCENT: Color32 = Color32::from_rgb(76, 175, 80);
const MUTED: Color32 = Color32::from_rgb(136, 136, 136);
const CARD_FILL: Color32 = Color32::from_rgb(28, 34, 30);
const GOOD: Color32 = Color32::from_rgb(120, 220, 130);
const WARN: Color32 = Color32::from_rgb(255, 170, 90);
const BAD: Color32 = Color32::from_rgb(255, 100, 100);

const BAR_COLORS: [Color32; 3] = [
    Color32::from_rgb(76, 175, 80),
    Color32::from_rgb(66, 165, 245),
    Color32::from_rgb(255, 167, 38),
];

pub fn set_custom_style(ctx: &Context) {
    // Near-black panels with a faint green cast so the metric cards stand out
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(18, 20, 19);
    visuals.window_fill = Color32::from_rgb(24, 27, 25);
    visuals.extreme_bg_color = Color32::from_rgb(32, 38, 34); // form inputs
    visuals.faint_bg_color = Color32::from_rgb(26, 30, 28); // table stripes

    // Form widgets: muted outline at rest, accent green once touched
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(38, 44, 40);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(60, 80, 62));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(48, 62, 50);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, ACCENT);

    visuals.widgets.active.bg_fill = Color32::from_rgb(56, 80, 58);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(130, 220, 135));

    // Text selection inside the business-name and save-as fields
    visuals.selection.bg_fill = Color32::from_rgb(50, 100, 54);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(150, 230, 155));

    ctx.set_visuals(visuals);

    // Roomier spacing for the input grid, larger headings for section titles
    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);

    for (text_style, size) in [
        (egui::TextStyle::Body, 15.0),
        (egui::TextStyle::Heading, 22.0),
        (egui::TextStyle::Button, 15.0),
    ] {
        style
            .text_styles
            .insert(text_style, FontId::new(size, FontFamily::Proportional));
    }

    ctx.set_style(style);
}

enum Status {
    Done(String),
    Failed(String),
}

pub struct DashboardApp {
    inputs: BusinessInputs,
    settings: Settings,

    // Inputs the current figures were last logged for
    seen_inputs: Option<BusinessInputs>,

    // Export state; cleared whenever the inputs change
    exported: Option<PathBuf>,
    save_path: String,
    status: Option<Status>,
}

impl DashboardApp {
    pub fn new(inputs: BusinessInputs, settings: Settings) -> Self {
        let save_path = settings.download_name.clone();
        Self {
            inputs,
            settings,
            seen_inputs: None,
            exported: None,
            save_path,
            status: None,
        }
    }

    fn note_input_change(&mut self) {
        if self.seen_inputs.as_ref() == Some(&self.inputs) {
            return;
        }
        tracing::debug!(
            business = %self.inputs.business_name,
            revenue = self.inputs.total_revenue,
            visitors = self.inputs.visitors,
            "inputs changed; figures recomputed"
        );
        if self.exported.take().is_some() {
            self.status = None;
        }
        self.seen_inputs = Some(self.inputs.clone());
    }

    fn export(&mut self, summary: &Report) -> Option<PathBuf> {
        match report::export_to_temp(summary, &self.settings.layout) {
            Ok(path) => {
                self.status = Some(Status::Done(format!("Report written to {}", path.display())));
                self.exported = Some(path.clone());
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "report export failed");
                self.status = Some(Status::Failed(format!("Export failed: {e}")));
                None
            }
        }
    }

    fn save(&mut self, summary: &Report) {
        let source = match self.exported.clone() {
            Some(path) => path,
            None => match self.export(summary) {
                Some(path) => path,
                None => return,
            },
        };

        let dest = PathBuf::from(self.save_path.trim());
        self.status = Some(match report::save_download(&source, &dest) {
            Ok(_) => Status::Done(format!("Saved to {}", dest.display())),
            Err(e) => {
                tracing::error!(error = %e, dest = %dest.display(), "saving report failed");
                Status::Failed(format!("Save failed: {e}"))
            }
        });
    }

    fn input_form(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Enter Your Business Name (Ex: ABC Retail)");
            ui.add(
                egui::TextEdit::singleline(&mut self.inputs.business_name)
                    .hint_text("My Business")
                    .desired_width(260.0),
            );
        });

        ui.add_space(8.0);
        ui.label(RichText::new("📋 Enter Business Data").heading().color(ACCENT));
        ui.add_space(4.0);

        let f = &mut self.inputs;
        egui::Grid::new("business_inputs")
            .num_columns(6)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                money_field(ui, "Total Revenue ($)", &mut f.total_revenue);
                money_field(ui, "Marketing Spend ($)", &mut f.marketing_spend);
                money_field(ui, "Cost of Goods Sold ($)", &mut f.cost_of_goods_sold);
                ui.end_row();

                money_field(ui, "Operating Expenses ($)", &mut f.operating_expenses);
                money_field(
                    ui,
                    "Customer Acquisition Cost ($)",
                    &mut f.customer_acquisition_cost,
                );
                ui.label("Conversion Rate (%)");
                ui.add(
                    egui::DragValue::new(&mut f.conversion_rate)
                        .range(0.0..=100.0)
                        .speed(0.1)
                        .fixed_decimals(2)
                        .suffix(" %"),
                );
                ui.end_row();

                ui.label("New Customers");
                ui.add(egui::DragValue::new(&mut f.new_customers).speed(1.0));
                ui.label("Total Visitors");
                ui.add(egui::DragValue::new(&mut f.visitors).speed(1.0));
                money_field(ui, "Initial Investment ($)", &mut f.initial_investment);
                ui.end_row();
            });
    }
}

fn money_field(ui: &mut egui::Ui, label: &str, value: &mut f64) {
    ui.label(label);
    ui.add(
        egui::DragValue::new(value)
            .range(0.0..=f64::MAX)
            .speed(10.0)
            .fixed_decimals(2)
            .prefix("$"),
    );
}

fn metric_card(ui: &mut egui::Ui, label: &str, value: String, negative: bool) {
    egui::Frame::new()
        .fill(CARD_FILL)
        .stroke(Stroke::new(1.0, Color32::from_rgb(60, 80, 62)))
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.set_min_width(190.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(label).color(MUTED));
                ui.label(
                    RichText::new(value)
                        .size(24.0)
                        .strong()
                        .color(if negative { BAD } else { Color32::WHITE }),
                );
            });
        });
}

fn overview_chart(ui: &mut egui::Ui, rows: &[ChartRow; 3]) {
    ui.label(RichText::new("Revenue and Marketing Overview").strong());

    Plot::new("revenue_overview")
        .legend(Legend::default())
        .height(260.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (row, color)) in rows.iter().zip(BAR_COLORS).enumerate() {
                let bar = Bar::new(i as f64, row.value).width(0.6).name(row.category);
                plot_ui.bar_chart(BarChart::new(row.category, vec![bar]).color(color));
            }
        });

    ui.add_space(6.0);

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::exact(240.0))
        .column(Column::exact(160.0))
        .header(24.0, |mut header| {
            header.col(|ui| {
                ui.strong("Category");
            });
            header.col(|ui| {
                ui.strong("Value");
            });
        })
        .body(|body| {
            body.rows(22.0, rows.len(), |mut row| {
                let r = rows[row.index()];
                row.col(|ui| {
                    ui.label(r.category);
                });
                row.col(|ui| {
                    ui.label(format_currency(r.value));
                });
            });
        });
}

fn advice_color(advice: Advice) -> Color32 {
    if advice.is_affirmation() {
        GOOD
    } else if advice == Advice::EnterMoreData {
        MUTED
    } else {
        WARN
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                ui.heading(
                    RichText::new("📊 A tool to visualize and analyze business metrics.")
                        .color(ACCENT)
                        .strong()
                        .size(26.0),
                );
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.input_form(ui);
                self.note_input_change();

                let inputs = &self.inputs;
                let metrics = compute(inputs);
                let advice = recommend(inputs, &metrics, &self.settings.thresholds);
                let summary = Report::build(
                    &inputs.business_name,
                    inputs.total_revenue,
                    &metrics,
                    &advice,
                );

                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("📊 Business Metrics Overview").heading().color(ACCENT));
                ui.add_space(4.0);

                let cards = [
                    ("Total Revenue", format_currency(inputs.total_revenue), false),
                    (
                        "Gross Profit",
                        format_currency(metrics.gross_profit),
                        metrics.gross_profit < 0.0,
                    ),
                    ("Net Profit", format_currency(metrics.net_profit), metrics.net_profit < 0.0),
                    ("Cash Flow", format_currency(metrics.cash_flow), metrics.cash_flow < 0.0),
                    ("Return on Investment (ROI)", format_percent(metrics.roi), metrics.roi < 0.0),
                    (
                        "Predicted Revenue (Next Quarter)",
                        format_currency(metrics.projected_revenue),
                        false,
                    ),
                ];
                ui.horizontal_wrapped(|ui| {
                    for (label, value, negative) in cards {
                        metric_card(ui, label, value, negative);
                    }
                });
                let caption = format!(
                    "🔍 Predicted based on new customer growth rate of {:.2}%, \
                     assuming similar trends continue.",
                    metrics.growth_rate
                );
                ui.label(RichText::new(caption).small().color(MUTED));

                ui.add_space(12.0);
                ui.separator();
                ui.label(
                    RichText::new("📈 Revenue Breakdown & Marketing Efficiency")
                        .heading()
                        .color(ACCENT),
                );
                overview_chart(ui, &chart_rows(inputs));

                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("📌 Business Recommendations").heading().color(ACCENT));
                for a in &advice {
                    ui.label(RichText::new(format!("- {}", a.message())).color(advice_color(*a)));
                }

                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("📄 Download Business Report").heading().color(ACCENT));
                ui.add_space(4.0);

                ui.horizontal(|ui| {
                    if ui
                        .add_sized(
                            Vec2::new(180.0, 32.0),
                            egui::Button::new(RichText::new("Generate PDF Report").strong()),
                        )
                        .clicked()
                    {
                        self.export(&summary);
                    }

                    ui.separator();

                    ui.label("Save as:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.save_path)
                            .hint_text(report::DEFAULT_DOWNLOAD_NAME)
                            .desired_width(280.0),
                    );
                    let can_save = !self.save_path.trim().is_empty();
                    if ui
                        .add_enabled(can_save, egui::Button::new("Download PDF Report"))
                        .clicked()
                    {
                        self.save(&summary);
                    }
                });

                match &self.status {
                    Some(Status::Done(msg)) => {
                        ui.label(RichText::new(msg).color(GOOD));
                    }
                    Some(Status::Failed(msg)) => {
                        ui.label(RichText::new(msg).color(BAD));
                    }
                    None => {}
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_inputs_drops_stale_export() {
        let mut app = DashboardApp::new(BusinessInputs::default(), Settings::default());
        app.note_input_change();

        app.exported = Some(PathBuf::from("/tmp/old.pdf"));
        app.status = Some(Status::Done("Report written".into()));
        app.note_input_change();
        assert!(app.exported.is_some(), "unchanged inputs keep the export");

        app.inputs.total_revenue = 500.0;
        app.note_input_change();
        assert!(app.exported.is_none());
        assert!(app.status.is_none());
    }

    #[test]
    fn save_path_starts_from_download_name() {
        let settings = Settings { download_name: "q3.pdf".into(), ..Settings::default() };
        let app = DashboardApp::new(BusinessInputs::default(), settings);

        assert_eq!(app.save_path, "q3.pdf");
    }

    #[test]
    fn save_exports_first_when_needed() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("business_report.pdf");
        let mut app = DashboardApp::new(BusinessInputs::default(), Settings::default());
        app.save_path = dest.display().to_string();

        let metrics = compute(&app.inputs);
        let summary = Report::build("My Business", 0.0, &metrics, &[Advice::EnterMoreData]);
        app.save(&summary);

        assert!(matches!(app.status, Some(Status::Done(_))));
        assert!(dest.exists());
        if let Some(tmp) = app.exported.take() {
            std::fs::remove_file(tmp).unwrap();
        }
    }

    #[test]
    fn advice_colors_by_kind() {
        assert_eq!(advice_color(Advice::PerformingWell), GOOD);
        assert_eq!(advice_color(Advice::EnterMoreData), MUTED);
        assert_eq!(advice_color(Advice::LowConversion), WARN);
    }
}
