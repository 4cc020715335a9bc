use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::economics::{InputBounds, InputPolicy, SolarConstants, SolarInput};

/// 기본 설정 파일 경로.
pub const CONFIG_PATH: &str = "config.toml";

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드(auto/ko-kr/en-us/de-de)
    pub language: String,
    /// 외부 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    /// 0 이하/비유한 입력 처리 정책
    pub input_policy: InputPolicy,
    /// 리포트 표시 전 연출 지연 [ms]
    pub report_delay_ms: u64,
    /// 창 투명도(0.3~1.0)
    pub window_alpha: f32,
    /// 슬라이더 범위
    pub bounds: InputBounds,
    /// 시작 시 입력값
    pub default_input: SolarInput,
    /// 지역 상수 테이블
    pub constants: SolarConstants,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            language_pack_dir: None,
            input_policy: InputPolicy::default(),
            report_delay_ms: 2000,
            window_alpha: 1.0,
            bounds: InputBounds::default(),
            default_input: SolarInput::default(),
            constants: SolarConstants::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("config parse error: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_create(Path::new(CONFIG_PATH))
}

/// 지정한 경로의 설정을 로드하고, 파일이 없으면 기본값으로 만들어 저장한다.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let cfg = load_from(path)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        tracing::info!(path = %path.display(), "default config created");
        Ok(cfg)
    }
}

/// 지정한 경로의 설정을 읽는다. 빠진 항목은 기본값으로 채운다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&content)?;
    if let Err(e) = cfg.constants.validate() {
        tracing::warn!(path = %path.display(), error = %e, "config carries invalid constants");
    }
    Ok(cfg)
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_PATH))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    pub fn report_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.report_delay_ms)
    }
}
