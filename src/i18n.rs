use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";
    pub const APP_TITLE: &str = "general.app_title";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_CALCULATE: &str = "main_menu.calculate";
    pub const MAIN_MENU_SCENARIOS: &str = "main_menu.scenarios";
    pub const MAIN_MENU_FEATURES: &str = "main_menu.features";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";

    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const PROMPT_SELECT: &str = "prompt.select";
    pub const PROMPT_ROOM: &str = "prompt.room";
    pub const PROMPT_PRICE: &str = "prompt.price";
    pub const PROMPT_DAILY_HOURS: &str = "prompt.daily_hours";
    pub const PROMPT_COOL_RATIO: &str = "prompt.cool_ratio";
    pub const PROMPT_YEARS: &str = "prompt.years";
    pub const PROMPT_EXPORT_PATH: &str = "prompt.export_path";
    pub const PROMPT_KEEP_CURRENT: &str = "prompt.keep_current";

    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";
    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
    pub const ERROR_UNSUPPORTED_ROOM: &str = "error.unsupported_room";
    pub const ERROR_UNSUPPORTED_HORIZON: &str = "error.unsupported_horizon";

    pub const RESULT_HEADING: &str = "result.heading";
    pub const RESULT_SUBHEADING: &str = "result.subheading";
    pub const RESULT_NO_PRICES: &str = "result.no_prices";
    pub const RESULT_CHEAPEST: &str = "result.cheapest";
    pub const RESULT_EXPORTED: &str = "result.exported";

    pub const TABLE_SERIES: &str = "table.series";
    pub const TABLE_UNIT_PRICE: &str = "table.unit_price";
    pub const TABLE_ANNUAL_COST: &str = "table.annual_cost";
    pub const TABLE_TOTAL_COST: &str = "table.total_cost";
    pub const TABLE_MONTHLY: &str = "table.monthly";
    pub const TABLE_DAILY: &str = "table.daily";
    pub const TABLE_GAP: &str = "table.gap";

    pub const CHART_HEADING: &str = "chart.heading";

    pub const FORMULA_POWER: &str = "formula.power";
    pub const FORMULA_ANNUAL_KWH: &str = "formula.annual_kwh";
    pub const FORMULA_TOTAL: &str = "formula.total";

    pub const REPORT_TITLE: &str = "report.title";
    pub const REPORT_CONDITIONS: &str = "report.conditions";
    pub const REPORT_ROOM: &str = "report.room";
    pub const REPORT_USAGE: &str = "report.usage";
    pub const REPORT_PRICE_PER_KWH: &str = "report.price_per_kwh";
    pub const REPORT_ESCALATION: &str = "report.escalation";
    pub const REPORT_TABLE_NAME: &str = "report.table_name";

    pub const FEATURES_HEADING: &str = "features.heading";
    pub const SCENARIOS_HEADING: &str = "scenarios.heading";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT: &str = "settings.current";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_PRICE: &str = "settings.prompt_price";
    pub const SETTINGS_PROMPT_RATE: &str = "settings.prompt_rate";
    pub const SETTINGS_PROMPT_YEARS: &str = "settings.prompt_years";
    pub const SETTINGS_PROMPT_LANG: &str = "settings.prompt_lang";
    pub const SETTINGS_SAVED: &str = "settings.saved";
    pub const SETTINGS_INVALID: &str = "settings.invalid";

    pub const UNIT_TATAMI: &str = "unit.tatami";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ja,
    En,
}

impl Language {
    fn from_code(code: &str) -> Self {
        if code.to_lowercase().starts_with("en") {
            Language::En
        } else {
            Language::Ja
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    strings: HashMap<String, String>,
}

impl Translator {
    /// 내장 언어팩만 사용하는 번역기. 알 수 없는 코드는 ja로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self::new_with_pack(lang_code, None)
    }

    /// 내장 언어팩 위에 언어팩 디렉터리(locales/ 등)의 파일을 덮어쓴다.
    /// 일본어 팩을 바닥에 깔아 두므로 번역이 빠진 키는 일본어로 표시된다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let lang = Language::from_code(lang_code);
        let mut strings = built_in_pack("ja").unwrap_or_default();
        if lang != Language::Ja {
            strings.extend(built_in_pack(lang_code).unwrap_or_default());
        }
        if let Some(map) = pack_dir.and_then(|dir| load_overrides(dir, lang_code)) {
            strings.extend(map);
        }
        Self { lang, strings }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.strings.get(key).cloned()
    }

    /// 번역을 가져온다. 어디에도 없으면 키 자체를 돌려준다.
    pub fn t(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| {
            tracing::warn!(key, "missing translation");
            key.to_string()
        })
    }

    /// `{name}` 자리표시자를 채운 번역을 반환한다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }

    /// 다다미 수 표시 (`6畳`, `6 tatami`).
    pub fn tatami(&self, tatami: u32) -> String {
        self.tf(keys::UNIT_TATAMI, &[("n", tatami.to_string())])
    }
}

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
        .unwrap_or_else(|| "ja-jp".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ja" | "ja-jp" | "jp" => Some("ja-jp".into()),
        "en" | "en-us" | "en-uk" | "en-gb" => Some("en-us".into()),
        "auto" | "" => None,
        other if other.starts_with("ja") => Some("ja-jp".into()),
        other if other.starts_with("en") => Some("en-us".into()),
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
        "ja" => Some("ja-jp".into()),
        "en" => Some("en-us".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(loc) = get_locale() {
        if let Some(lang) = normalize_locale_string(&loc) {
            return Some(lang);
        }
    }
    for var in ["LC_ALL", "LANG"] {
        if let Ok(lang) = std::env::var(var) {
            if let Some(code) = normalize_locale_string(&lang) {
                return Some(code);
            }
        }
    }
    None
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 (중첩 가능) 맵.
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
    tracing::warn!(dir, lang, "language pack not found, using built-in strings");
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
        "ja-jp" | "ja" => parse_toml_to_map(include_str!("../locales/ja-jp.toml")),
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_packs_cover_the_same_keys() {
        let ja = built_in_pack("ja").unwrap();
        let en = built_in_pack("en").unwrap();
        let mut missing: Vec<_> = ja.keys().filter(|k| !en.contains_key(*k)).collect();
        missing.sort();
        assert!(missing.is_empty(), "en pack missing keys: {missing:?}");
    }

    #[test]
    fn template_fill_and_fallback() {
        let tr = Translator::new("en-us");
        assert_eq!(tr.language(), Language::En);
        assert_eq!(tr.tatami(6), "6 tatami");
        let ja = Translator::new("ja-jp");
        assert_eq!(ja.tatami(14), "14畳");
        assert_eq!(ja.t("no.such.key"), "no.such.key");
        assert_eq!(
            fill_template("{a}+{b}={a}{b}", &[("a", "1".into()), ("b", "2".into())]),
            "1+2=12"
        );
    }

    #[test]
    fn language_normalization() {
        assert_eq!(normalize_lang("EN"), Some("en-us".into()));
        assert_eq!(normalize_lang("ja_JP"), Some("ja-jp".into()));
        assert_eq!(normalize_lang("auto"), None);
        assert_eq!(normalize_lang("fr"), None);
        assert_eq!(resolve_language("en", Some("ja")), "en-us");
        assert_eq!(resolve_language("auto", Some("ja")), "ja-jp");
        assert_eq!(normalize_locale_string("ja_JP.UTF-8"), Some("ja-jp".into()));
    }

    #[test]
    fn nested_toml_flattens_to_dotted_keys() {
        let map = parse_toml_to_map("[a]\nb = \"x\"\n[a.c]\nd = \"y\"\n").unwrap();
        assert_eq!(map.get("a.b").map(String::as_str), Some("x"));
        assert_eq!(map.get("a.c.d").map(String::as_str), Some("y"));
        assert!(parse_toml_to_map("n = 1").is_none());
    }
}
