use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::app::{self, AppError};
use crate::config::Config;
use crate::energy_spec::{RoomSize, Series};
use crate::i18n::{keys, Translator};
use crate::money::{format_plain, group_thousands, parse_price};
use crate::projection::{ProjectionInput, UsageInputs, HORIZON_CHOICES};
use crate::report;
use crate::scenario;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Calculate,
    Scenarios,
    Features,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    main_menu_from(tr, &mut io::stdin().lock())
}

/// `main_menu`와 같지만 임의의 입력에서 읽는다. 입력이 끝나면 `Exit`.
pub fn main_menu_from<R: BufRead>(
    tr: &Translator,
    reader: &mut R,
) -> Result<MenuChoice, AppError> {
    println!("{}", tr.t(keys::MAIN_MENU_TITLE));
    for key in [
        keys::MAIN_MENU_CALCULATE,
        keys::MAIN_MENU_SCENARIOS,
        keys::MAIN_MENU_FEATURES,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = match read_line_from(reader, &tr.t(keys::PROMPT_MENU_SELECT)) {
            Ok(sel) => sel,
            Err(AppError::EndOfInput) => return Ok(MenuChoice::Exit),
            Err(e) => return Err(e),
        };
        match sel.trim() {
            "1" => return Ok(MenuChoice::Calculate),
            "2" => return Ok(MenuChoice::Scenarios),
            "3" => return Ok(MenuChoice::Features),
            "4" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 방 크기·가격·사용 패턴·기간을 차례로 묻는다. 엔터는 현재값 유지.
pub fn collect_inputs(tr: &Translator, input: &mut ProjectionInput) -> Result<(), AppError> {
    input.room = read_room(tr, input.room)?;
    for series in Series::ALL {
        let current = input.unit_prices.get(series);
        let prompt = with_current(
            tr,
            tr.tf(keys::PROMPT_PRICE, &[("series", series.to_string())]),
            group_thousands(current),
        );
        let raw = read_line(&prompt)?;
        if !raw.trim().is_empty() {
            input.unit_prices.set(series, parse_price(&raw));
        }
    }
    let hours = read_f64_or(
        tr,
        &tr.t(keys::PROMPT_DAILY_HOURS),
        input.usage.daily_hours,
    )?;
    let ratio = read_f64_or(tr, &tr.t(keys::PROMPT_COOL_RATIO), input.usage.cool_ratio)?;
    input.usage = UsageInputs {
        daily_hours: hours,
        cool_ratio: ratio,
    }
    .clamped();
    input.years = read_years(tr, keys::PROMPT_YEARS, input.years)?;
    Ok(())
}

/// 리포트 저장 경로를 묻는다. 빈 입력이면 None.
pub fn ask_export_path(tr: &Translator) -> Result<Option<PathBuf>, AppError> {
    let raw = read_line(&tr.t(keys::PROMPT_EXPORT_PATH))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(trimmed)))
    }
}

/// 사용 패턴 프리셋 메뉴를 처리한다.
pub fn handle_scenarios(tr: &Translator, input: &mut ProjectionInput) -> Result<(), AppError> {
    println!("\n-- {} --", tr.t(keys::SCENARIOS_HEADING));
    let presets = scenario::scenarios();
    for (i, s) in presets.iter().enumerate() {
        println!(
            "{}) {} {} ({}h, {}%)",
            i + 1,
            tr.t(&s.desc_key()),
            tr.t(&s.label_key()),
            format_plain(s.daily_hours),
            format_plain(s.cool_ratio)
        );
    }
    let sel = read_line(&tr.t(keys::PROMPT_SELECT))?;
    match sel.trim().parse::<usize>() {
        Ok(n) if (1..=presets.len()).contains(&n) => {
            app::apply_scenario(input, presets[n - 1].id)?;
        }
        _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
    }
    Ok(())
}

pub fn handle_features(tr: &Translator) {
    println!("\n{}", report::features_text(tr));
}

/// 설정 메뉴를 처리한다. 변경값은 현재 입력에도 바로 반영한다.
pub fn handle_settings(
    tr: &Translator,
    cfg: &mut Config,
    input: &mut ProjectionInput,
) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{}",
        tr.tf(
            keys::SETTINGS_CURRENT,
            &[
                ("price", format_plain(cfg.price_per_kwh)),
                ("rate", format_plain(cfg.escalation_rate * 100.0)),
                ("years", cfg.horizon_years.to_string()),
                ("lang", cfg.language.clone()),
            ],
        )
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::PROMPT_SELECT))?;
    match sel.trim() {
        "1" => {
            let v = read_f64(tr, &tr.t(keys::SETTINGS_PROMPT_PRICE))?;
            match app::validate_price_per_kwh(v) {
                Ok(price) => {
                    cfg.price_per_kwh = price;
                    input.price_per_kwh = price;
                }
                Err(_) => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        "2" => {
            let v = read_f64(tr, &tr.t(keys::SETTINGS_PROMPT_RATE))?;
            match app::escalation_from_percent(v) {
                Ok(rate) => {
                    cfg.escalation_rate = rate;
                    input.escalation_rate = rate;
                }
                Err(_) => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        "3" => {
            let years = read_years(tr, keys::SETTINGS_PROMPT_YEARS, cfg.horizon_years)?;
            cfg.horizon_years = years;
            input.years = years;
        }
        "4" => {
            let lang = read_line(&tr.t(keys::SETTINGS_PROMPT_LANG))?;
            match lang.trim().to_lowercase().as_str() {
                "auto" => cfg.language = "auto".into(),
                "ja" | "ja-jp" => cfg.language = "ja-jp".into(),
                "en" | "en-us" => cfg.language = "en-us".into(),
                _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
            }
        }
        _ => println!("{}", tr.t(keys::SETTINGS_INVALID)),
    }
    Ok(())
}

fn with_current(tr: &Translator, prompt: String, current: String) -> String {
    format!(
        "{prompt}{}",
        tr.tf(keys::PROMPT_KEEP_CURRENT, &[("value", current)])
    )
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    read_line_from(&mut io::stdin().lock(), prompt)
}

/// 0바이트를 읽으면 입력이 닫힌 것이므로 `EndOfInput`.
fn read_line_from<R: BufRead>(reader: &mut R, prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if reader.read_line(&mut buf)? == 0 {
        return Err(AppError::EndOfInput);
    }
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_f64_or(tr: &Translator, prompt: &str, current: f64) -> Result<f64, AppError> {
    let prompt = with_current(tr, prompt.to_string(), format_plain(current));
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(current);
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

fn read_room(tr: &Translator, current: RoomSize) -> Result<RoomSize, AppError> {
    let prompt = with_current(tr, tr.t(keys::PROMPT_ROOM), current.to_string());
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(current);
        }
        match s.parse::<u32>().ok().map(app::room_from_tatami) {
            Some(Ok(room)) => return Ok(room),
            _ => println!(
                "{}",
                tr.tf(keys::ERROR_UNSUPPORTED_ROOM, &[("value", s.to_string())])
            ),
        }
    }
}

fn read_years(tr: &Translator, prompt_key: &str, current: u32) -> Result<u32, AppError> {
    let choices = HORIZON_CHOICES.map(|y| y.to_string()).join("/");
    let prompt = with_current(
        tr,
        tr.tf(prompt_key, &[("choices", choices.clone())]),
        current.to_string(),
    );
    loop {
        let s = read_line(&prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(current);
        }
        match s.parse::<u32>().ok().map(app::validate_horizon) {
            Some(Ok(years)) => return Ok(years),
            _ => println!(
                "{}",
                tr.tf(
                    keys::ERROR_UNSUPPORTED_HORIZON,
                    &[("choices", choices.clone()), ("value", s.to_string())],
                )
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_leaves_the_menu() {
        let tr = Translator::new("en-us");
        let mut empty = Cursor::new(Vec::<u8>::new());
        assert_eq!(main_menu_from(&tr, &mut empty).unwrap(), MenuChoice::Exit);

        // 잘못된 입력 뒤 EOF도 재시도 루프에 갇히지 않는다
        let mut junk = Cursor::new(b"9\nabc\n".to_vec());
        assert_eq!(main_menu_from(&tr, &mut junk).unwrap(), MenuChoice::Exit);
    }

    #[test]
    fn menu_reads_choice_from_input() {
        let tr = Translator::new("en-us");
        let mut input = Cursor::new(b"x\n3\n".to_vec());
        assert_eq!(main_menu_from(&tr, &mut input).unwrap(), MenuChoice::Features);
    }

    #[test]
    fn read_line_reports_end_of_input() {
        let mut empty = Cursor::new(Vec::<u8>::new());
        assert!(matches!(
            read_line_from(&mut empty, "> "),
            Err(AppError::EndOfInput)
        ));
        let mut one = Cursor::new(b"0".to_vec());
        assert_eq!(read_line_from(&mut one, "> ").unwrap(), "0");
    }
}
