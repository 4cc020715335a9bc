use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::economics::EconomicsError;
use crate::i18n::{self, Translator};
use crate::session::CalculatorSession;
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// 경제성 계산 오류
    #[error("calculation error: {0}")]
    Economics(#[from] EconomicsError),
}

/// 설정값으로 계산 세션을 만든다.
pub fn session_from_config(config: &Config) -> CalculatorSession {
    CalculatorSession::new(
        config.default_input,
        config.input_policy,
        config.bounds,
        config.constants.clone(),
        config.report_delay(),
    )
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &Translator) -> Result<(), AppError> {
    let mut session = session_from_config(config);
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Calculate => ui_cli::handle_calculate(tr, &mut session)?,
            MenuChoice::Report => ui_cli::handle_report(tr, &mut session)?,
            MenuChoice::Sweep => ui_cli::handle_sweep(tr, &session)?,
            MenuChoice::Constants => ui_cli::print_constants(tr, session.constants()),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                session.set_policy(config.input_policy);
                config.save()?;
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
