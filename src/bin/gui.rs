#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use aircon_cost_simulator::{
    app, config,
    energy_spec::{Series, SpecTable},
    features,
    i18n::{self, keys},
    logging, money,
    projection::{ProjectionInput, UsageInputs, HORIZON_CHOICES},
    report::CostReport,
    scenario,
};
use clap::Parser;
use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{
    fs,
    path::{Path, PathBuf},
};

const CHEAPEST_COLOR: egui::Color32 = egui::Color32::from_rgb(0x10, 0xb9, 0x81);
const BAR_COLOR: egui::Color32 = egui::Color32::from_rgb(0x3b, 0x82, 0xf6);
/// 그래프 세로축 최소 상한 [円]
const CHART_AXIS_MIN: f64 = 2_000_000.0;
const CHART_AXIS_STEP: f64 = 500_000.0;
const CHART_GRID_LINES: usize = 4;

/// 프로젝트 폴더와 OS별 일본어 폰트 후보.
const FONT_CANDIDATES: &[&str] = &[
    "assets/fonts/NotoSansJP-Regular.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
];
const WINDOWS_FONTS: &[&str] = &["meiryo.ttc", "YuGothM.ttc", "msgothic.ttc"];

/// 에어컨 총비용 비교 데스크톱 앱.
#[derive(Parser, Debug)]
#[command(name = "aircon_cost_simulator", version, about)]
struct GuiArgs {
    /// 언어 (auto/ja/en)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
}

fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    logging::init("warn");

    let icon_data = load_app_icon();
    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size([980.0, 860.0])
        .with_transparent(true);
    if let Some(icon) = icon_data {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config load failed, using defaults");
        config::Config::default()
    });
    if args.lang != "auto" {
        app_cfg.language = i18n::resolve_language(&args.lang, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Aircon Cost Simulator",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx, app_cfg.font_path.as_deref()) {
                tracing::warn!(error = %e, "font setup failed");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록한다. 기본 라틴 폰트 뒤에 붙여 폴백으로 쓴다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(font_name.clone());
    }
    ctx.set_fonts(fonts);
}

/// 일본어 표시용 폰트를 찾는다.
/// 1) 설정의 font_path
/// 2) assets/fonts 및 macOS/Linux 시스템 폰트
/// 3) Windows 시스템 폰트(メイリオ/游ゴシック/ＭＳ ゴシック)
fn setup_fonts(ctx: &egui::Context, user_font: Option<&str>) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(p) = user_font.filter(|p| !p.trim().is_empty()) {
        candidates.push(PathBuf::from(p));
    }
    candidates.extend(FONT_CANDIDATES.iter().map(|p| PathBuf::from(*p)));
    if let Some(windir) = std::env::var_os("WINDIR") {
        let dir = Path::new(&windir).join("Fonts");
        candidates.extend(WINDOWS_FONTS.iter().map(|f| dir.join(f)));
    }

    if let Some(path) = candidates.iter().find(|p| p.exists()) {
        let bytes = fs::read(path)
            .map_err(|e| format!("Failed to read font file ({}): {e}", path.display()))?;
        apply_font_bytes(ctx, bytes, "japanese_font");
        tracing::info!(path = %path.display(), "font loaded");
        return Ok(());
    }
    Err("Japanese font not found. Set font_path in config.toml.".into())
}

/// 세로축 상한. 최대 총비용을 50万円 단위로 올리고 200万円 아래로는 내리지 않는다.
fn chart_axis_max(max_total: f64) -> f64 {
    ((max_total / CHART_AXIS_STEP).ceil() * CHART_AXIS_STEP).max(CHART_AXIS_MIN)
}

fn price_field(price: u64) -> String {
    if price == 0 {
        String::new()
    } else {
        money::group_thousands(price)
    }
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    table: SpecTable,
    input: ProjectionInput,
    // 입력 위젯 상태
    price_text: [String; 3],
    hours: u32,
    cool_ratio: u32,
    // 설정 창
    lang_input: String,
    window_alpha: f32,
    price_per_kwh_input: f64,
    escalation_pct_input: f64,
    settings_status: Option<String>,
    show_settings_modal: bool,
    show_features_modal: bool,
    status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang, config.language_pack_dir.as_deref());
        let mut status = None;
        let table = app::load_spec_table(&config).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to built-in energy table");
            status = Some(tr.tf("gui.result.spec_fallback", &[("error", e.to_string())]));
            SpecTable::rated_power()
        });
        let input = app::initial_input(&config);
        Self {
            price_text: Series::ALL.map(|s| price_field(input.unit_prices.get(s))),
            hours: input.usage.daily_hours.round() as u32,
            cool_ratio: input.usage.cool_ratio.round() as u32,
            lang_input: config.language.clone(),
            window_alpha: config.window_alpha,
            price_per_kwh_input: config.price_per_kwh,
            escalation_pct_input: config.escalation_rate * 100.0,
            settings_status: None,
            show_settings_modal: false,
            show_features_modal: false,
            status,
            config,
            tr,
            table,
            input,
        }
    }

    /// 위젯 상태를 계산 입력으로 옮긴다.
    fn sync_input(&mut self) {
        for series in Series::ALL {
            let price = money::parse_price(&self.price_text[series.index()]);
            self.input.unit_prices.set(series, price);
        }
        self.input.usage = UsageInputs {
            daily_hours: self.hours as f64,
            cool_ratio: self.cool_ratio as f64,
        }
        .clamped();
        self.input.price_per_kwh = self.price_per_kwh_input;
        self.input.escalation_rate = self.escalation_pct_input / 100.0;
    }

    fn apply_scenario(&mut self, id: &str) {
        match app::apply_scenario(&mut self.input, id) {
            Ok(()) => {
                self.hours = self.input.usage.daily_hours.round() as u32;
                self.cool_ratio = self.input.usage.cool_ratio.round() as u32;
            }
            Err(e) => tracing::warn!(error = %e, "scenario not applied"),
        }
    }

    fn apply_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.config.window_alpha = self.window_alpha;
        self.config.price_per_kwh = self.price_per_kwh_input;
        self.config.escalation_rate = self.escalation_pct_input / 100.0;
        // 즉시 번역기 반영
        let resolved = i18n::resolve_language("auto", Some(self.config.language.as_str()));
        self.tr =
            i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
        self.settings_status = Some(match self.config.save() {
            Ok(()) => self.tr.t("gui.settings.saved"),
            Err(e) => {
                tracing::warn!(error = %e, "config save failed");
                self.tr
                    .tf("gui.settings.save_failed", &[("error", e.to_string())])
            }
        });
    }

    fn export_report(&mut self) {
        self.sync_input();
        let report = match app::calculate(&self.table, &self.input) {
            Ok(report) => report,
            Err(e) => {
                self.status = Some(self.tr.tf("gui.export.failed", &[("error", e.to_string())]));
                return;
            }
        };
        let Some(path) = FileDialog::new()
            .add_filter("Markdown", &["md"])
            .add_filter("CSV", &["csv"])
            .add_filter("Text", &["txt"])
            .set_file_name("aircon_cost_report.md")
            .save_file()
        else {
            return;
        };
        self.status = Some(match report.save(&path, &self.tr) {
            Ok(format) => {
                tracing::info!(path = %path.display(), ?format, "report exported");
                self.tr
                    .tf(keys::RESULT_EXPORTED, &[("path", path.display().to_string())])
            }
            Err(e) => {
                tracing::warn!(error = %e, "report export failed");
                self.tr.tf("gui.export.failed", &[("error", e.to_string())])
            }
        });
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        let mut picked_scenario = None;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.heading(tr.t("gui.inputs.heading"));
            ui.label(egui::RichText::new(tr.t("gui.inputs.subheading")).weak());
            ui.separator();
            egui::Grid::new("input_grid")
                .num_columns(2)
                .spacing([24.0, 10.0])
                .show(ui, |ui| {
                    ui.label(tr.t("gui.room.label"));
                    egui::ComboBox::from_id_source("room_choice")
                        .selected_text(tr.tatami(self.input.room.tatami()))
                        .show_ui(ui, |ui| {
                            for room in self.table.rooms() {
                                ui.selectable_value(
                                    &mut self.input.room,
                                    room,
                                    tr.tatami(room.tatami()),
                                );
                            }
                        });
                    ui.end_row();

                    ui.label(tr.t("gui.price.label"));
                    ui.horizontal(|ui| {
                        for series in Series::ALL {
                            ui.label(egui::RichText::new(series.as_str()).strong());
                            let text = &mut self.price_text[series.index()];
                            let resp = ui.add(
                                egui::TextEdit::singleline(text)
                                    .hint_text(tr.t("gui.price.hint"))
                                    .desired_width(110.0),
                            );
                            if resp.changed() {
                                *text = money::format_price_input(text);
                            }
                        }
                    });
                    ui.end_row();

                    ui.label(tr.tf("gui.hours.label", &[("hours", self.hours.to_string())]));
                    ui.add(egui::Slider::new(&mut self.hours, 1..=24).show_value(false));
                    ui.end_row();

                    ui.label(tr.tf(
                        "gui.ratio.label",
                        &[
                            ("cool", self.cool_ratio.to_string()),
                            ("heat", (100 - self.cool_ratio.min(100)).to_string()),
                        ],
                    ));
                    ui.horizontal(|ui| {
                        ui.small(tr.t("gui.ratio.heat_only"));
                        ui.add(
                            egui::Slider::new(&mut self.cool_ratio, 0..=100)
                                .step_by(10.0)
                                .show_value(false),
                        );
                        ui.small(tr.t("gui.ratio.cool_only"));
                    });
                    ui.end_row();

                    ui.label(tr.t("gui.horizon.label"));
                    ui.horizontal(|ui| {
                        for years in HORIZON_CHOICES {
                            ui.selectable_value(
                                &mut self.input.years,
                                years,
                                tr.tf("gui.horizon.years", &[("years", years.to_string())]),
                            );
                        }
                    });
                    ui.end_row();

                    ui.label(tr.t(keys::SCENARIOS_HEADING));
                    ui.horizontal_wrapped(|ui| {
                        for s in scenario::scenarios() {
                            let label = format!("{} {}", tr.t(&s.desc_key()), tr.t(&s.label_key()));
                            let tip = format!(
                                "{}h / {}%",
                                money::format_plain(s.daily_hours),
                                money::format_plain(s.cool_ratio)
                            );
                            if ui.button(label).on_hover_text(tip).clicked() {
                                picked_scenario = Some(s.id);
                            }
                        }
                    });
                    ui.end_row();
                });
        });
        if let Some(id) = picked_scenario {
            self.apply_scenario(id);
        }
    }

    fn ui_results(&self, ui: &mut egui::Ui, report: &CostReport) {
        let tr = &self.tr;
        if !report.has_priced_rows() {
            ui.label(egui::RichText::new(tr.t(keys::RESULT_NO_PRICES)).weak());
            return;
        }
        let years = [("years", report.input.years.to_string())];
        ui.heading(tr.tf(keys::RESULT_HEADING, &years));
        ui.label(egui::RichText::new(tr.tf(keys::RESULT_SUBHEADING, &years)).weak());
        if let Some(best) = report.priced().find(|r| Some(r.series) == report.cheapest) {
            ui.label(
                egui::RichText::new(tr.tf(
                    keys::RESULT_CHEAPEST,
                    &[
                        ("series", best.series.to_string()),
                        ("total", money::format_yen(best.total_cost)),
                    ],
                ))
                .strong()
                .color(CHEAPEST_COLOR),
            );
        }
        ui.add_space(6.0);

        egui::Grid::new("cost_table")
            .striped(true)
            .num_columns(7)
            .spacing([18.0, 6.0])
            .show(ui, |ui| {
                for h in report.header(tr) {
                    ui.strong(h);
                }
                ui.end_row();
                for (row, result) in report.rows().into_iter().zip(report.priced()) {
                    let is_best = Some(result.series) == report.cheapest;
                    for (i, cell) in row.into_iter().enumerate() {
                        let mut text = egui::RichText::new(cell);
                        if is_best {
                            text = text.color(CHEAPEST_COLOR);
                        }
                        // 총비용 열
                        if i == 3 {
                            text = text.strong();
                        }
                        ui.label(text);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(14.0);
        ui.heading(tr.tf(keys::CHART_HEADING, &years));
        draw_cost_chart(ui, report);

        ui.add_space(8.0);
        for line in report.formula_lines(tr) {
            ui.label(egui::RichText::new(line).small().weak());
        }
    }

    fn ui_settings_window(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let mut open = self.show_settings_modal;
        let mut save_clicked = false;
        egui::Window::new(tr.t("gui.settings.title"))
            .collapsible(false)
            .resizable(true)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(tr.t("gui.settings.lang"));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(
                            &mut self.lang_input,
                            "auto".to_string(),
                            tr.t("gui.settings.lang_auto"),
                        );
                        ui.selectable_value(&mut self.lang_input, "ja-jp".to_string(), "日本語");
                        ui.selectable_value(&mut self.lang_input, "en-us".to_string(), "English");
                    });
                ui.separator();
                ui.label(tr.t("gui.settings.alpha"));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label(tr.t("gui.settings.price_per_kwh"));
                    ui.add(
                        egui::DragValue::new(&mut self.price_per_kwh_input)
                            .speed(0.1)
                            .clamp_range(1.0..=200.0),
                    );
                });
                ui.horizontal(|ui| {
                    ui.label(tr.t("gui.settings.escalation"));
                    ui.add(
                        egui::DragValue::new(&mut self.escalation_pct_input)
                            .speed(0.1)
                            .clamp_range(0.0..=20.0)
                            .suffix(" %"),
                    );
                });
                ui.separator();
                if ui.button(tr.t("gui.settings.save")).clicked() {
                    save_clicked = true;
                }
                if let Some(msg) = &self.settings_status {
                    ui.label(msg);
                }
            });
        self.show_settings_modal = open;
        if save_clicked {
            self.apply_settings();
        }
    }

    fn ui_features_window(&mut self, ctx: &egui::Context) {
        let lang = self.tr.language();
        egui::Window::new(self.tr.t(keys::FEATURES_HEADING))
            .collapsible(false)
            .resizable(true)
            .open(&mut self.show_features_modal)
            .show(ctx, |ui| {
                egui::Grid::new("feature_table")
                    .striped(true)
                    .num_columns(1 + Series::ALL.len())
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for series in Series::ALL {
                            ui.strong(series.as_str());
                        }
                        ui.end_row();
                        for row in features::feature_rows() {
                            ui.label(row.label.text(lang));
                            for series in Series::ALL {
                                ui.label(row.value(series).text(lang));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// 총비용 세로 막대그래프. 최저가 시리즈는 녹색, 나머지는 파란색.
fn draw_cost_chart(ui: &mut egui::Ui, report: &CostReport) {
    let rows: Vec<_> = report.priced().collect();
    if rows.is_empty() {
        return;
    }
    let max_total = rows.iter().map(|r| r.total_cost).fold(0.0_f64, f64::max);
    let axis_max = chart_axis_max(max_total);

    let width = ui.available_width().min(720.0);
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 280.0), egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let grid_color = ui.visuals().weak_text_color().linear_multiply(0.4);
    let font = egui::FontId::proportional(12.0);

    let left = rect.left() + 70.0;
    let top = rect.top() + 24.0;
    let bottom = rect.bottom() - 26.0;
    let plot_height = bottom - top;

    for i in 0..=CHART_GRID_LINES {
        let frac = i as f32 / CHART_GRID_LINES as f32;
        let y = bottom - plot_height * frac;
        painter.line_segment(
            [egui::pos2(left, y), egui::pos2(rect.right(), y)],
            egui::Stroke::new(1.0, grid_color),
        );
        painter.text(
            egui::pos2(left - 8.0, y),
            egui::Align2::RIGHT_CENTER,
            money::format_man_yen(axis_max * frac as f64),
            font.clone(),
            text_color,
        );
    }

    let slot = (rect.right() - left) / rows.len() as f32;
    let bar_width = (slot * 0.5).min(120.0);
    for (i, r) in rows.iter().enumerate() {
        let center = left + slot * (i as f32 + 0.5);
        let height = (r.total_cost / axis_max) as f32 * plot_height;
        let bar = egui::Rect::from_min_max(
            egui::pos2(center - bar_width / 2.0, bottom - height),
            egui::pos2(center + bar_width / 2.0, bottom),
        );
        let color = if Some(r.series) == report.cheapest {
            CHEAPEST_COLOR
        } else {
            BAR_COLOR
        };
        painter.rect_filled(bar, egui::Rounding::same(4.0), color);
        painter.text(
            egui::pos2(center, bar.top() - 4.0),
            egui::Align2::CENTER_BOTTOM,
            money::format_yen(r.total_cost),
            font.clone(),
            text_color,
        );
        painter.text(
            egui::pos2(center, bottom + 6.0),
            egui::Align2::CENTER_TOP,
            r.series.as_str(),
            egui::FontId::proportional(14.0),
            text_color,
        );
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 투명도 적용 + 라벨 복사 방지 스타일
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        self.sync_input();
        let tr = self.tr.clone();
        let can_export = self.input.unit_prices.any_entered();
        let mut export_requested = false;

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!("❄️ {}", tr.t(keys::APP_TITLE)));
                ui.separator();
                if ui.button(tr.t("gui.features.button")).clicked() {
                    self.show_features_modal = true;
                }
                if ui.button(tr.t("gui.settings.title")).clicked() {
                    self.show_settings_modal = true;
                }
                if ui
                    .add_enabled(can_export, egui::Button::new(tr.t("gui.export.button")))
                    .clicked()
                {
                    export_requested = true;
                }
            });
        });
        if export_requested {
            self.export_report();
        }

        if let Some(msg) = &self.status {
            egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                ui.label(egui::RichText::new(msg).small());
            });
        }

        if self.show_settings_modal {
            self.ui_settings_window(ctx);
        }
        if self.show_features_modal {
            self.ui_features_window(ctx);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.ui_inputs(ui);
                    self.sync_input();
                    ui.add_space(16.0);
                    match app::calculate(&self.table, &self.input) {
                        Ok(report) => self.ui_results(ui, &report),
                        Err(e) => {
                            ui.colored_label(
                                ui.visuals().error_fg_color,
                                tr.tf("gui.result.error", &[("error", e.to_string())]),
                            );
                        }
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> GuiApp {
        GuiApp::new(config::Config::default())
    }

    #[test]
    fn formatted_price_text_feeds_projection() {
        let mut gui = app();
        gui.price_text[Series::XS.index()] = money::format_price_input("198000");
        gui.price_text[Series::J.index()] = "abc".into();
        gui.sync_input();
        assert_eq!(gui.price_text[Series::XS.index()], "198,000");
        assert_eq!(gui.input.unit_prices.get(Series::XS), 198_000);
        assert_eq!(gui.input.unit_prices.get(Series::J), 0);
    }

    #[test]
    fn scenario_moves_sliders() {
        let mut gui = app();
        gui.apply_scenario("pet");
        assert_eq!((gui.hours, gui.cool_ratio), (24, 60));
        gui.sync_input();
        assert_eq!(gui.input.usage.daily_hours, 24.0);
        assert_eq!(gui.input.usage.cool_ratio, 60.0);
    }

    #[test]
    fn chart_axis_rounds_up_in_half_million_steps() {
        assert_eq!(chart_axis_max(0.0), CHART_AXIS_MIN);
        assert_eq!(chart_axis_max(1_200_000.0), CHART_AXIS_MIN);
        assert_eq!(chart_axis_max(2_100_000.0), 2_500_000.0);
        assert_eq!(chart_axis_max(3_000_000.0), 3_000_000.0);
    }

    #[test]
    fn empty_price_shows_blank_field() {
        assert_eq!(price_field(0), "");
        assert_eq!(price_field(1_234_567), "1,234,567");
    }
}
