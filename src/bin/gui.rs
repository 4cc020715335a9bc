#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::time::Instant;
use std::{env, fs, path::Path};
use solar_economics_toolbox::{
    app, config,
    economics::{bill_sweep, format_one_decimal, InputPolicy, Report, SolarConstants, Verdict},
    i18n, logging,
    session::CalculatorSession,
};

fn main() -> Result<(), eframe::Error> {
    logging::init();
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko-kr/de-de)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(1100.0, 760.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unavailable, using defaults");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Solar Economics Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("font setup: {e}");
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

/// 바이너리 폰트 바이트를 egui 기본 글꼴 앞에 등록한다.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다.
/// 1) assets/fonts/malgun.ttf
/// 2) Windows 시스템 폰트
/// 3) 실패 시 기본 폰트 유지
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let asset_path = Path::new("assets/fonts/malgun.ttf");
    if asset_path.exists() {
        let bytes = fs::read(asset_path).map_err(|e| format!("Failed to read font file: {e}"))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        return Ok(());
    }
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc", "batang.ttc"] {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "korean_font");
                return Ok(());
            }
        }
    }
    Err("Korean font not found; using egui default fonts.".into())
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: &str) -> egui::Response {
    ui.label(text).on_hover_text(tip)
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    session: CalculatorSession,
    // 슬라이더 값(세션과 별도로 보관해 드래그 중에도 표시)
    bill: f64,
    sun_hours: f64,
    // 비교표
    show_sweep: bool,
    sweep_step: f64,
    // 설정
    show_settings_modal: bool,
    show_help_modal: bool,
    lang_input: String,
    policy_input: InputPolicy,
    constants_input: SolarConstants,
    report_delay_input: u64,
    window_alpha: f32,
    save_status: Option<String>,
    export_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::info!(lang = %lang_code, "GUI language resolved");
        let session = app::session_from_config(&config);
        let input = session.input();
        Self {
            tr,
            bill: input.monthly_bill_amount,
            sun_hours: input.daily_sun_hours,
            show_sweep: false,
            sweep_step: 50.0,
            show_settings_modal: false,
            show_help_modal: false,
            lang_input: config.language.clone(),
            policy_input: config.input_policy,
            constants_input: config.constants.clone(),
            report_delay_input: config.report_delay_ms,
            window_alpha: config.window_alpha.clamp(0.3, 1.0),
            save_status: None,
            export_status: None,
            session,
            config,
        }
    }

    /// 설정 모달에서 편집한 값을 세션과 설정에 반영한다.
    fn apply_settings(&mut self) {
        self.config.language = self.lang_input.clone();
        self.config.input_policy = self.policy_input;
        self.config.constants = self.constants_input.clone();
        self.config.report_delay_ms = self.report_delay_input;
        self.config.window_alpha = self.window_alpha;
        let resolved = i18n::resolve_language(&self.config.language, None);
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
        self.session.set_policy(self.config.input_policy);
        self.session.set_constants(self.config.constants.clone());
        self.session.set_report_delay(self.config.report_delay());
    }

    /// 결과 카드와 같은 일사 시간. Clamp 정책이면 보정된 값이다.
    fn sweep_sun_hours(&self) -> f64 {
        self.session.effective_input().daily_sun_hours
    }

    fn txt(&self, key: &str, default: &str) -> String {
        self.tr.lookup(key).unwrap_or_else(|| default.to_string())
    }

    fn ui_inputs(&mut self, ui: &mut egui::Ui) {
        let bounds = *self.session.bounds();
        let currency = self.session.constants().currency_symbol.clone();
        ui.heading(self.txt("gui.calc.inputs", "Your consumption"));
        ui.add_space(6.0);
        label_with_tip(
            ui,
            &self.txt("gui.calc.bill", "Monthly electricity bill"),
            &self.txt("gui.calc.bill_tip", "Average amount on your monthly electricity bill"),
        );
        let bill_slider = egui::Slider::new(&mut self.bill, bounds.bill_min..=bounds.bill_max)
            .step_by(bounds.bill_step)
            .suffix(currency);
        if ui.add(bill_slider).changed() {
            self.session.set_monthly_bill(self.bill);
        }
        ui.add_space(8.0);
        label_with_tip(
            ui,
            &self.txt("gui.calc.sun_hours", "Daily sun hours"),
            &self.txt("gui.calc.sun_hours_tip", "Average hours of full sun per day at your location"),
        );
        let sun_slider = egui::Slider::new(&mut self.sun_hours, bounds.sun_min..=bounds.sun_max)
            .step_by(bounds.sun_step)
            .suffix(" h");
        if ui.add(sun_slider).changed() {
            self.session.set_sun_hours(self.sun_hours);
        }
        ui.add_space(8.0);
        ui.small(self.txt(
            "gui.calc.disclaimer",
            "Estimates based on regional averages; a site survey gives exact figures.",
        ));
    }

    fn ui_results(&mut self, ui: &mut egui::Ui) {
        let currency = self.session.constants().currency_symbol.clone();
        let horizon = self.session.constants().evaluation_horizon_years;
        let result = match self.session.result() {
            Ok(r) => r.clone(),
            Err(e) => {
                ui.colored_label(egui::Color32::LIGHT_RED, format!("{}: {e}", self.tr.t(i18n::keys::ERROR_PREFIX)));
                return;
            }
        };
        ui.heading(self.txt("gui.calc.results", "Financial projection"));
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("result_grid")
                .num_columns(2)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    let rows = [
                        (
                            self.txt("gui.result.system", "Recommended system"),
                            format!(
                                "{} × {:.0} W = {} kWp",
                                result.panel_count,
                                self.session.constants().panel_rated_wattage,
                                format_one_decimal(result.system_size_kw)
                            ),
                        ),
                        (
                            self.txt("gui.result.cost", "Total system cost"),
                            format!("{:.0}{currency}", result.total_system_cost),
                        ),
                        (
                            self.txt("gui.result.loan", "Financing installment"),
                            format!("{:.0}{currency}/mo", result.monthly_loan_payment),
                        ),
                        (
                            self.txt("gui.result.savings", "Estimated savings"),
                            format!("{:.0}{currency}/mo", result.initial_monthly_savings),
                        ),
                        (
                            self.txt("gui.result.net", "Net monthly cash flow"),
                            format!("{:+.0}{currency}/mo", result.net_monthly_cash_flow),
                        ),
                        (
                            self.txt("gui.result.payback", "Payback"),
                            format!("{} y", format_one_decimal(result.payback_years)),
                        ),
                        (
                            format!("{} ({horizon} y)", self.txt("gui.result.roi", "ROI")),
                            format!("{:.0} %", result.roi_percent),
                        ),
                        (
                            self.txt("gui.result.co2", "CO₂ saved per year"),
                            format!("{} t", format_one_decimal(result.annual_co2_saved_kg / 1000.0)),
                        ),
                        (
                            self.txt("gui.result.trees", "Tree equivalent"),
                            format!("{:.0}", result.annual_trees_equivalent),
                        ),
                    ];
                    for (label, value) in rows {
                        ui.label(label);
                        ui.strong(value);
                        ui.end_row();
                    }
                });
        });
    }

    fn ui_report(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let now = Instant::now();
        if self.session.poll(now, &self.tr) {
            self.export_status = None;
        }
        if let Some(left) = self.session.remaining(now) {
            ctx.request_repaint_after(left);
        }

        ui.heading(self.txt("gui.report.title", "Solar analysis report"));
        ui.label(self.txt(
            "gui.report.desc",
            "Get a short verdict on whether solar pays off for your inputs.",
        ));
        let generate_label = self.txt("gui.report.generate", "Generate report");
        ui.horizontal(|ui| {
            let button = egui::Button::new(generate_label);
            if ui.add_enabled(self.session.can_request_report(), button).clicked() {
                self.session.request_report(Instant::now());
                ctx.request_repaint();
            }
            if self.session.is_pending() {
                ui.spinner();
                ui.label(self.tr.t(i18n::keys::REPORT_ANALYZING));
            }
        });

        let Some(report) = self.session.report().cloned() else {
            return;
        };
        let mut export_clicked = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            let color = match report.verdict {
                Verdict::Excellent => egui::Color32::from_rgb(52, 211, 153),
                Verdict::VeryGood | Verdict::Good => egui::Color32::from_rgb(96, 165, 250),
            };
            ui.horizontal(|ui| {
                ui.strong(format!("{}:", self.tr.t(i18n::keys::REPORT_VERDICT_LABEL)));
                ui.colored_label(color, report.verdict_label.as_str());
            });
            ui.add_space(4.0);
            ui.label(report.summary.as_str());
            ui.add_space(4.0);
            for detail in &report.details {
                ui.label(format!("• {detail}"));
            }
            ui.add_space(6.0);
            if ui.button(self.txt("gui.report.export", "Export report…")).clicked() {
                export_clicked = true;
            }
            if let Some(msg) = &self.export_status {
                ui.small(msg.as_str());
            }
        });
        if export_clicked {
            self.export_status = Some(self.export_report(&report));
        }
    }

    fn export_report(&self, report: &Report) -> String {
        let Some(path) = FileDialog::new()
            .add_filter("Text", &["txt"])
            .set_file_name("solar_report.txt")
            .save_file()
        else {
            return self.txt("gui.report.export_cancelled", "Export cancelled.");
        };
        match fs::write(&path, report.to_text(&self.tr)) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "report exported");
                format!("{} {}", self.txt("gui.report.exported", "Saved to"), path.display())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "report export failed");
                format!("{}: {e}", self.tr.t(i18n::keys::ERROR_PREFIX))
            }
        }
    }

    fn ui_sweep(&mut self, ui: &mut egui::Ui) {
        let title = self.txt("gui.sweep.title", "Bill comparison table");
        ui.checkbox(&mut self.show_sweep, title);
        if !self.show_sweep {
            return;
        }
        let step_label = self.txt("gui.sweep.step", "Step");
        ui.horizontal(|ui| {
            ui.label(step_label);
            ui.add(egui::DragValue::new(&mut self.sweep_step).clamp_range(1.0..=600.0).speed(5.0));
        });
        let sweep_sun_hours = self.sweep_sun_hours();
        let rows = match bill_sweep(
            sweep_sun_hours,
            self.session.bounds(),
            self.sweep_step,
            self.session.constants(),
        ) {
            Ok(rows) => rows,
            Err(e) => {
                ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
                return;
            }
        };
        let currency = self.session.constants().currency_symbol.clone();
        egui::Grid::new("sweep_grid")
            .num_columns(6)
            .striped(true)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                for head in self.tr.t(i18n::keys::SWEEP_COLUMNS).split('|') {
                    ui.strong(head.trim());
                }
                ui.end_row();
                for row in &rows {
                    let r = &row.result;
                    ui.label(format!("{:.0}{currency}", row.monthly_bill_amount));
                    ui.label(r.panel_count.to_string());
                    ui.label(format!("{:.2}", r.system_size_kw));
                    ui.label(format!("{:.0}{currency}", r.total_system_cost));
                    ui.label(format_one_decimal(r.payback_years));
                    ui.label(format!("{:.0}", r.roi_percent));
                    ui.end_row();
                }
            });
    }

    fn ui_settings_modal(&mut self, ctx: &egui::Context) {
        let tr = self.tr.clone();
        let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
        let mut apply = false;
        let mut save = false;
        let mut reset_constants = false;
        egui::Window::new(txt("gui.settings.title", "Program Settings"))
            .collapsible(false)
            .resizable(true)
            .open(&mut self.show_settings_modal)
            .show(ctx, |ui| {
                ui.heading(txt("gui.settings.general", "General"));
                ui.separator();
                ui.label(txt("gui.settings.lang", "Language"));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(self.lang_input.clone())
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.lang_input, "auto".into(), txt("gui.settings.lang.auto", "System"));
                        ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                        ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        ui.selectable_value(&mut self.lang_input, "de-de".into(), "Deutsch");
                    });
                ui.label(txt("gui.settings.policy", "Invalid input handling"));
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.policy_input, InputPolicy::Reject, txt("gui.settings.policy.reject", "Reject"));
                    ui.selectable_value(&mut self.policy_input, InputPolicy::Clamp, txt("gui.settings.policy.clamp", "Clamp to minimum"));
                });
                ui.label(txt("gui.settings.delay", "Report delay [ms]"));
                ui.add(egui::DragValue::new(&mut self.report_delay_input).clamp_range(0..=10_000).speed(50.0));
                ui.label(txt("gui.settings.alpha", "Window transparency"));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));

                ui.separator();
                ui.heading(txt("gui.settings.constants", "Regional constants"));
                let c = &mut self.constants_input;
                egui::Grid::new("constants_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(txt("gui.constants.price", "Electricity price [/kWh]"));
                        ui.add(egui::DragValue::new(&mut c.electricity_unit_price).speed(0.01).max_decimals(3));
                        ui.end_row();
                        ui.label(txt("gui.constants.wattage", "Panel rating [W]"));
                        ui.add(egui::DragValue::new(&mut c.panel_rated_wattage).speed(5.0));
                        ui.end_row();
                        ui.label(txt("gui.constants.cost", "Installed cost [/kWp]"));
                        ui.add(egui::DragValue::new(&mut c.installed_cost_per_kw).speed(10.0));
                        ui.end_row();
                        ui.label(txt("gui.constants.co2", "CO₂ factor [kg/kWh]"));
                        ui.add(egui::DragValue::new(&mut c.co2_per_kwh).speed(0.01).max_decimals(3));
                        ui.end_row();
                        ui.label(txt("gui.constants.trees", "Trees per tonne CO₂"));
                        ui.add(egui::DragValue::new(&mut c.trees_per_ton_co2).speed(1.0));
                        ui.end_row();
                        ui.label(txt("gui.constants.rate", "Financing rate"));
                        ui.add(egui::DragValue::new(&mut c.annual_financing_rate).speed(0.001).max_decimals(4));
                        ui.end_row();
                        ui.label(txt("gui.constants.term", "Financing term [y]"));
                        ui.add(egui::DragValue::new(&mut c.financing_term_years).clamp_range(1..=40));
                        ui.end_row();
                        ui.label(txt("gui.constants.derating", "Derating factor"));
                        ui.add(egui::DragValue::new(&mut c.system_derating_factor).speed(0.01).clamp_range(0.01..=1.0));
                        ui.end_row();
                        ui.label(txt("gui.constants.horizon", "ROI horizon [y]"));
                        ui.add(egui::DragValue::new(&mut c.evaluation_horizon_years).clamp_range(1..=50));
                        ui.end_row();
                        ui.label(txt("gui.constants.currency", "Currency symbol"));
                        ui.text_edit_singleline(&mut c.currency_symbol);
                        ui.end_row();
                    });
                if let Err(e) = self.constants_input.validate() {
                    ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
                }
                ui.horizontal(|ui| {
                    if ui.button(txt("gui.settings.reset", "Reset to Spain preset")).clicked() {
                        reset_constants = true;
                    }
                    if ui.button(txt("gui.settings.apply", "Apply")).clicked() {
                        apply = true;
                    }
                    if ui.button(txt("gui.settings.save", "Save settings")).clicked() {
                        apply = true;
                        save = true;
                    }
                });
                if let Some(msg) = &self.save_status {
                    ui.label(msg.as_str());
                }
            });
        if reset_constants {
            self.constants_input = SolarConstants::spain();
        }
        if apply {
            self.apply_settings();
        }
        if save {
            self.save_status = Some(match self.config.save() {
                Ok(()) => self.txt("gui.settings.saved", "Saved."),
                Err(e) => format!("Save error: {e}"),
            });
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        let title = self.txt("gui.nav.app_title", "Solar Economics Toolbox");
        let settings_label = self.txt("gui.settings.title", "Settings");
        let help_label = self.txt("gui.about.title", "Help / About");
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(title);
                ui.separator();
                if ui.button(settings_label).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(help_label).clicked() {
                    self.show_help_modal = true;
                }
            });
        });

        if self.show_settings_modal {
            self.ui_settings_modal(ctx);
        }

        if self.show_help_modal {
            let tr = self.tr.clone();
            let txt = move |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
            egui::Window::new(txt("gui.about.title", "Help / About"))
                .collapsible(false)
                .resizable(true)
                .open(&mut self.show_help_modal)
                .show(ctx, |ui| {
                    ui.heading(txt("gui.about.app", "Offline solar PV sizing and payback calculator"));
                    ui.separator();
                    ui.label(txt("gui.about.sizing", "Sizing: kWp = annual kWh / (sun hours × 365 × derating), rounded up to whole panels."));
                    ui.label(txt("gui.about.loan", "Loan: P·r·(1+r)^n / ((1+r)^n − 1), r = rate/12, n = years × 12."));
                    ui.label(txt("gui.about.payback", "Payback and ROI use year-1 savings without degradation."));
                    ui.label(txt("gui.about.verdict", "Verdict: payback < 5 y excellent, < 8 y very good, otherwise good."));
                });
        }

        egui::SidePanel::left("inputs")
            .resizable(true)
            .min_width(240.0)
            .default_width(300.0)
            .show(ctx, |ui| {
                self.ui_inputs(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.ui_results(ui);
                    ui.add_space(12.0);
                    self.ui_report(ui, ctx);
                    ui.add_space(12.0);
                    self.ui_sweep(ui);
                });
        });
    }
}
