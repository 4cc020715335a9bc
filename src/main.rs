use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use solar_economics_toolbox::{app, config, i18n, logging, ui_cli};

/// 태양광 경제성 계산기 CLI.
#[derive(Debug, Parser)]
#[command(name = "solar_economics_toolbox_cli", version, about)]
struct Cli {
    /// 월 전기요금. 지정하면 대화형 메뉴 없이 한 번 계산하고 종료한다.
    #[arg(long)]
    bill: Option<f64>,
    /// 일평균 일사 시간 [h]
    #[arg(long = "sun-hours")]
    sun_hours: Option<f64>,
    /// 분석 리포트도 출력한다.
    #[arg(long)]
    report: bool,
    /// 요금별 비교표를 지정 간격으로 출력한다.
    #[arg(long, value_name = "STEP")]
    sweep: Option<f64>,
    /// 언어(auto/ko/en/de)
    #[arg(long, short = 'L', default_value = "auto")]
    lang: String,
    /// 설정 파일 경로(기본 config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// 0 이하 입력을 슬라이더 하한으로 보정한다.
    #[arg(long)]
    clamp: bool,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => config::load_or_create(path),
        None => config::load_or_default(),
    }
    .unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unavailable, using defaults");
        config::Config::default()
    });
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    if let Err(err) = try_run(&cli, &mut cfg, &tr) {
        eprintln!("{}: {err}", tr.t(i18n::keys::ERROR_PREFIX));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn try_run(cli: &Cli, cfg: &mut config::Config, tr: &i18n::Translator) -> Result<(), app::AppError> {
    if cli.clamp {
        cfg.input_policy = solar_economics_toolbox::economics::InputPolicy::Clamp;
    }
    if cli.bill.is_none() && cli.sun_hours.is_none() && cli.sweep.is_none() {
        return app::run(cfg, tr);
    }

    let mut session = app::session_from_config(cfg);
    if let Some(bill) = cli.bill {
        session.set_monthly_bill(bill);
    }
    if let Some(sun) = cli.sun_hours {
        session.set_sun_hours(sun);
    }
    let result = session.result().map_err(|e| e.clone())?;
    ui_cli::print_result(tr, result, session.constants());

    if let Some(step) = cli.sweep {
        let sun = session.effective_input().daily_sun_hours;
        let rows = solar_economics_toolbox::economics::bill_sweep(
            sun,
            session.bounds(),
            step,
            session.constants(),
        )?;
        ui_cli::print_sweep(tr, sun, &rows, &session.constants().currency_symbol);
    }

    if cli.report && session.request_report(Instant::now()) {
        println!("{}", tr.t(i18n::keys::REPORT_ANALYZING));
        ui_cli::wait_for_report(tr, &mut session);
        if let Some(report) = session.report() {
            println!("{}", tr.t(i18n::keys::REPORT_HEADING));
            print!("{}", report.to_text(tr));
        }
    }
    Ok(())
}
