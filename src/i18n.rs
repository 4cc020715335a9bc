use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_REPORT: &str = "main_menu.report";
    pub const MAIN_MENU_SWEEP: &str = "main_menu.sweep";
    pub const MAIN_MENU_CONSTANTS: &str = "main_menu.constants";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";

    pub const PROMPT_BILL: &str = "prompt.bill";
    pub const PROMPT_SUN_HOURS: &str = "prompt.sun_hours";
    pub const PROMPT_SELECT: &str = "prompt.select";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_SYSTEM: &str = "result.system";
    pub const RESULT_COST: &str = "result.cost";
    pub const RESULT_LOAN: &str = "result.loan";
    pub const RESULT_SAVINGS: &str = "result.savings";
    pub const RESULT_NET_CASH_FLOW: &str = "result.net_cash_flow";
    pub const RESULT_PAYBACK: &str = "result.payback";
    pub const RESULT_ROI: &str = "result.roi";
    pub const RESULT_ENVIRONMENT: &str = "result.environment";
    pub const RESULT_NO_CALCULATION: &str = "result.no_calculation";

    pub const REPORT_HEADING: &str = "report.heading";
    pub const REPORT_ANALYZING: &str = "report.analyzing";
    pub const REPORT_VERDICT_LABEL: &str = "report.verdict_label";
    pub const REPORT_VERDICT_EXCELLENT: &str = "report.verdict.excellent";
    pub const REPORT_VERDICT_VERY_GOOD: &str = "report.verdict.very_good";
    pub const REPORT_VERDICT_GOOD: &str = "report.verdict.good";
    pub const REPORT_SUMMARY_BASE: &str = "report.summary_base";
    pub const REPORT_SUMMARY_ROI: &str = "report.summary_roi";
    pub const REPORT_DETAIL_CASH_FLOW: &str = "report.detail_cash_flow";
    pub const REPORT_DETAIL_ENV: &str = "report.detail_env";
    pub const REPORT_DETAIL_PAYBACK: &str = "report.detail_payback";

    pub const SWEEP_HEADING: &str = "sweep.heading";
    pub const SWEEP_COLUMNS: &str = "sweep.columns";

    pub const CONSTANTS_HEADING: &str = "constants.heading";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_POLICY: &str = "settings.current_policy";
    pub const SETTINGS_POLICY_OPTIONS: &str = "settings.policy_options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const HELP_CALCULATE: &str = "help.calculate";
    pub const HELP_SETTINGS: &str = "help.settings";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
    De,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("en") {
            Language::En
        } else if c.starts_with("de") {
            Language::De
        } else {
            Language::Ko
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::De => "de",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드(ko/en/de)에 따라 번역기를 생성한다. 내장 문자열만 사용한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 빌드 시 포함된 언어팩을 쓴다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang_code));
        tracing::debug!(
            lang = lang_code,
            pack_loaded = overrides.is_some(),
            "translator initialised"
        );
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 영어 → 키 순으로 폴백한다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let builtin = match self.lang {
            Language::Ko => ko(key),
            Language::En | Language::De => None,
        };
        builtin
            .or_else(|| en(key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    /// `{name}` 자리표시자를 채운 번역 문자열.
    pub fn fill(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }
}

/// `{name}` 형태의 자리표시자를 값으로 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        "de" | "de-de" => Some("de-de".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        other if other.starts_with("de") => Some("de-de".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        "de" => Some("de-de".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|val| normalize_locale_string(&val))
}

/// TOML 기반 언어팩을 로드한다. 중첩 테이블은 점으로 이어 붙인 키가 된다.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., en-us)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., en)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" | "ko" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        "de-de" | "de" => parse_toml_to_map(include_str!("../locales/de-de.toml")),
        _ => None,
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== Solar Economics Toolbox ===",
        MAIN_MENU_CALCULATE => "1) 경제성 계산",
        MAIN_MENU_REPORT => "2) 분석 리포트",
        MAIN_MENU_SWEEP => "3) 요금별 비교표",
        MAIN_MENU_CONSTANTS => "4) 상수 테이블 보기",
        MAIN_MENU_SETTINGS => "5) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        PROMPT_BILL => "월 전기요금: ",
        PROMPT_SUN_HOURS => "일평균 일사 시간 [h]: ",
        PROMPT_SELECT => "선택: ",
        RESULT_HEADING => "\n-- 계산 결과 --",
        RESULT_SYSTEM => "추천 설비: 패널 {panels}장, {size} kWp",
        RESULT_COST => "총 설치비: {cost}{currency}",
        RESULT_LOAN => "월 대출 상환액: {loan}{currency}",
        RESULT_SAVINGS => "월 예상 절감액: {savings}{currency}",
        RESULT_NET_CASH_FLOW => "월 순현금흐름: {net}{currency}",
        RESULT_PAYBACK => "회수기간: {years}년",
        RESULT_ROI => "{horizon}년 ROI: {roi}%",
        RESULT_ENVIRONMENT => "연간 CO₂ 감축: {co2} t, 나무 {trees}그루 상당",
        RESULT_NO_CALCULATION => "먼저 경제성 계산을 실행하세요.",
        REPORT_HEADING => "\n-- 분석 리포트 --",
        REPORT_ANALYZING => "분석 중...",
        REPORT_VERDICT_LABEL => "판정",
        REPORT_VERDICT_EXCELLENT => "매우 우수한 투자",
        REPORT_VERDICT_VERY_GOOD => "우수한 투자",
        REPORT_VERDICT_GOOD => "양호한 투자",
        REPORT_SUMMARY_BASE => {
            "월 {bill}{currency}의 전기요금과 하루 {sun_hours}시간의 일사량 기준으로 {size} kWp 설비를 추천합니다."
        }
        REPORT_SUMMARY_ROI => "평가 기간 ROI는 약 {roi}%입니다.",
        REPORT_DETAIL_CASH_FLOW => {
            "월 대출 상환액 {loan}{currency} 대비 월 절감액 {savings}{currency}."
        }
        REPORT_DETAIL_ENV => "연간 약 {co2}t의 CO₂를 줄이며 나무 {trees}그루를 심는 효과입니다.",
        REPORT_DETAIL_PAYBACK => "투자금은 약 {years}년 후 회수됩니다.",
        SWEEP_HEADING => "\n-- 요금별 비교표 (일사 {sun_hours}h) --",
        SWEEP_COLUMNS => "요금 | 패널 | kWp | 설치비 | 회수(년) | ROI(%)",
        CONSTANTS_HEADING => "\n-- 상수 테이블 --",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_POLICY => "현재 입력 정책:",
        SETTINGS_POLICY_OPTIONS => "1) 거부(Reject)  2) 하한 보정(Clamp)",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "입력 정책이 변경되었습니다:",
        HELP_CALCULATE => "도움말: 월 전기요금(통화)과 일평균 일사 시간(h)을 입력하면 설비 규모와 금융 지표를 계산합니다.",
        HELP_SETTINGS => "도움말: Reject는 0 이하/비정상 입력을 오류로, Clamp는 슬라이더 하한으로 보정합니다.",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Solar Economics Toolbox ===",
        MAIN_MENU_CALCULATE => "1) Economics calculation",
        MAIN_MENU_REPORT => "2) Analysis report",
        MAIN_MENU_SWEEP => "3) Bill comparison table",
        MAIN_MENU_CONSTANTS => "4) Show constants table",
        MAIN_MENU_SETTINGS => "5) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please try again.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        PROMPT_BILL => "Monthly electricity bill: ",
        PROMPT_SUN_HOURS => "Average daily sun hours [h]: ",
        PROMPT_SELECT => "Select: ",
        RESULT_HEADING => "\n-- Result --",
        RESULT_SYSTEM => "Recommended system: {panels} panels, {size} kWp",
        RESULT_COST => "Total system cost: {cost}{currency}",
        RESULT_LOAN => "Monthly loan payment: {loan}{currency}",
        RESULT_SAVINGS => "Estimated monthly savings: {savings}{currency}",
        RESULT_NET_CASH_FLOW => "Net monthly cash flow: {net}{currency}",
        RESULT_PAYBACK => "Payback: {years} years",
        RESULT_ROI => "{horizon}-year ROI: {roi}%",
        RESULT_ENVIRONMENT => "Annual CO₂ saved: {co2} t, equivalent to {trees} trees",
        RESULT_NO_CALCULATION => "Run an economics calculation first.",
        REPORT_HEADING => "\n-- Analysis report --",
        REPORT_ANALYZING => "Analyzing...",
        REPORT_VERDICT_LABEL => "Verdict",
        REPORT_VERDICT_EXCELLENT => "Excellent investment",
        REPORT_VERDICT_VERY_GOOD => "Very good investment",
        REPORT_VERDICT_GOOD => "Good investment",
        REPORT_SUMMARY_BASE => {
            "With a monthly bill of {bill}{currency} and {sun_hours} hours of daily sun, we recommend a {size} kWp system."
        }
        REPORT_SUMMARY_ROI => "The projected return on investment is about {roi}%.",
        REPORT_DETAIL_CASH_FLOW => {
            "Loan installment of {loan}{currency}/month against estimated savings of {savings}{currency}/month."
        }
        REPORT_DETAIL_ENV => "Avoids about {co2} t of CO₂ per year, as much as {trees} trees absorb.",
        REPORT_DETAIL_PAYBACK => "The investment pays for itself in about {years} years.",
        SWEEP_HEADING => "\n-- Bill comparison (sun {sun_hours} h) --",
        SWEEP_COLUMNS => "Bill | Panels | kWp | Cost | Payback(y) | ROI(%)",
        CONSTANTS_HEADING => "\n-- Constants table --",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_POLICY => "Current input policy:",
        SETTINGS_POLICY_OPTIONS => "1) Reject  2) Clamp to slider minimum",
        SETTINGS_PROMPT_CHANGE => "Enter number to change (enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; policy unchanged.",
        SETTINGS_SAVED => "Input policy changed to:",
        HELP_CALCULATE => "Help: enter the monthly bill (currency) and the average daily sun hours (h) to size the system and its financing.",
        HELP_SETTINGS => "Help: Reject turns zero/negative/non-finite input into an error, Clamp lifts it to the slider minimum.",
        _ => return None,
    })
}
