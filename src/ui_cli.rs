use std::io::{self, Write};
use std::time::Instant;

use crate::app::AppError;
use crate::config::Config;
use crate::economics::{
    bill_sweep, total_interest, EconomicsResult, InputPolicy, SolarConstants, SweepRow,
};
use crate::i18n::{keys, Translator};
use crate::session::CalculatorSession;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Report,
    Sweep,
    Constants,
    Settings,
    Exit,
}

/// 비교표 기본 간격 [통화]
pub const DEFAULT_SWEEP_STEP: f64 = 50.0;

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_CALCULATE,
        keys::MAIN_MENU_REPORT,
        keys::MAIN_MENU_SWEEP,
        keys::MAIN_MENU_CONSTANTS,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        match sel.trim() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Report),
            "3" => return Ok(MenuChoice::Sweep),
            "4" => return Ok(MenuChoice::Constants),
            "5" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 경제성 계산 메뉴를 처리한다.
pub fn handle_calculate(tr: &Translator, session: &mut CalculatorSession) -> Result<(), AppError> {
    println!("{}", tr.t(keys::HELP_CALCULATE));
    let bill = read_f64(tr, &tr.t(keys::PROMPT_BILL))?;
    let sun = read_f64(tr, &tr.t(keys::PROMPT_SUN_HOURS))?;
    session.set_monthly_bill(bill);
    session.set_sun_hours(sun);
    match session.result() {
        Ok(result) => print_result(tr, result, session.constants()),
        Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
    }
    Ok(())
}

/// 현재 결과로 리포트를 만든다. 연출용 지연 동안 대기 문구를 띄운다.
pub fn handle_report(tr: &Translator, session: &mut CalculatorSession) -> Result<(), AppError> {
    if session.result().is_err() {
        println!("{}", tr.t(keys::RESULT_NO_CALCULATION));
        return Ok(());
    }
    if session.report().is_none() && session.request_report(Instant::now()) {
        println!("{}", tr.t(keys::REPORT_ANALYZING));
        wait_for_report(tr, session);
    }
    if let Some(report) = session.report() {
        println!("{}", tr.t(keys::REPORT_HEADING));
        print!("{}", report.to_text(tr));
    }
    Ok(())
}

/// 대기 중인 리포트가 준비될 때까지 블로킹으로 기다린다.
pub fn wait_for_report(tr: &Translator, session: &mut CalculatorSession) {
    while session.is_pending() {
        let now = Instant::now();
        if session.poll(now, tr) {
            break;
        }
        if let Some(left) = session.remaining(now) {
            std::thread::sleep(left);
        }
    }
}

/// 현재 일사 시간으로 요금별 비교표를 출력한다.
pub fn handle_sweep(tr: &Translator, session: &CalculatorSession) -> Result<(), AppError> {
    let sun = session.effective_input().daily_sun_hours;
    let rows = bill_sweep(sun, session.bounds(), DEFAULT_SWEEP_STEP, session.constants())?;
    print_sweep(tr, sun, &rows, &session.constants().currency_symbol);
    Ok(())
}

/// 설정 메뉴를 처리한다.
pub fn handle_settings(tr: &Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!("{}", tr.t(keys::HELP_SETTINGS));
    println!("{} {:?}", tr.t(keys::SETTINGS_CURRENT_POLICY), cfg.input_policy);
    println!("{}", tr.t(keys::SETTINGS_POLICY_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    cfg.input_policy = match sel.trim() {
        "1" => InputPolicy::Reject,
        "2" => InputPolicy::Clamp,
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            cfg.input_policy
        }
    };
    println!("{} {:?}", tr.t(keys::SETTINGS_SAVED), cfg.input_policy);
    Ok(())
}

/// 계산 결과를 출력한다.
pub fn print_result(tr: &Translator, r: &EconomicsResult, c: &SolarConstants) {
    let cur = || ("currency", c.currency_symbol.clone());
    println!("{}", tr.t(keys::RESULT_HEADING));
    println!(
        "{}",
        tr.fill(
            keys::RESULT_SYSTEM,
            &[
                ("panels", r.panel_count.to_string()),
                ("size", format!("{:.2}", r.system_size_kw)),
            ],
        )
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_COST,
            &[("cost", format!("{:.2}", r.total_system_cost)), cur()]
        )
    );
    println!(
        "{} (+{:.2}{})",
        tr.fill(
            keys::RESULT_LOAN,
            &[("loan", format!("{:.2}", r.monthly_loan_payment)), cur()]
        ),
        total_interest(
            r.total_system_cost,
            c.annual_financing_rate,
            c.financing_term_years
        ),
        c.currency_symbol
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_SAVINGS,
            &[("savings", format!("{:.2}", r.initial_monthly_savings)), cur()],
        )
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_NET_CASH_FLOW,
            &[("net", format!("{:+.2}", r.net_monthly_cash_flow)), cur()],
        )
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_PAYBACK,
            &[("years", format!("{:.2}", r.payback_years))]
        )
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_ROI,
            &[
                ("horizon", c.evaluation_horizon_years.to_string()),
                ("roi", format!("{:.1}", r.roi_percent)),
            ],
        )
    );
    println!(
        "{}",
        tr.fill(
            keys::RESULT_ENVIRONMENT,
            &[
                ("co2", format!("{:.1}", r.annual_co2_saved_kg / 1000.0)),
                ("trees", format!("{:.0}", r.annual_trees_equivalent)),
            ],
        )
    );
}

/// 요금별 비교표를 출력한다.
pub fn print_sweep(tr: &Translator, sun_hours: f64, rows: &[SweepRow], currency: &str) {
    println!(
        "{}",
        tr.fill(keys::SWEEP_HEADING, &[("sun_hours", sun_hours.to_string())])
    );
    println!("{}", tr.t(keys::SWEEP_COLUMNS));
    for row in rows {
        let r = &row.result;
        println!(
            "{:>6.0}{currency} | {:>3} | {:>5.2} | {:>9.0}{currency} | {:>5.1} | {:>6.0}",
            row.monthly_bill_amount,
            r.panel_count,
            r.system_size_kw,
            r.total_system_cost,
            r.payback_years,
            r.roi_percent
        );
    }
}

/// 상수 테이블을 출력한다.
pub fn print_constants(tr: &Translator, c: &SolarConstants) {
    println!("{}", tr.t(keys::CONSTANTS_HEADING));
    match toml::to_string_pretty(c) {
        Ok(text) => print!("{text}"),
        Err(e) => println!("{}: {e}", tr.t(keys::ERROR_PREFIX)),
    }
    println!("preset = {:?}", c.preset());
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}
