use std::path::Path;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::energy_spec::{RoomSize, SpecTable, SpecTableError};
use crate::i18n::{self, keys, Translator};
use crate::projection::{compute_result_set, ProjectionError, ProjectionInput, HORIZON_CHOICES};
use crate::report::{CostReport, ReportError};
use crate::scenario;
use crate::ui_cli::{self, MenuChoice};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    #[error("사양 테이블 오류: {0}")]
    SpecTable(#[from] SpecTableError),
    #[error("계산 오류: {0}")]
    Projection(#[from] ProjectionError),
    #[error("{0}")]
    Report(#[from] ReportError),
    #[error("지원하지 않는 다다미 수: {0}")]
    UnsupportedRoom(u32),
    #[error("지원하지 않는 분석 기간: {0}년")]
    UnsupportedHorizon(u32),
    #[error("알 수 없는 사용 패턴: {0}")]
    UnknownScenario(String),
    #[error("전력량 단가는 0보다 커야 합니다: {0}")]
    InvalidPricePerKwh(f64),
    #[error("요금 상승률은 0% 이상이어야 합니다: {0}")]
    InvalidEscalation(f64),
    #[error("입력이 끝났습니다")]
    EndOfInput,
}

/// 설정의 경로가 있으면 그 테이블을, 없으면 내장 프리셋을 쓴다.
pub fn load_spec_table(cfg: &Config) -> Result<SpecTable, AppError> {
    match cfg.spec_table_path.as_deref() {
        Some(path) if !path.trim().is_empty() => Ok(SpecTable::load(Path::new(path))?),
        _ => Ok(SpecTable::rated_power()),
    }
}

pub fn room_from_tatami(tatami: u32) -> Result<RoomSize, AppError> {
    RoomSize::from_tatami(tatami).ok_or(AppError::UnsupportedRoom(tatami))
}

pub fn validate_horizon(years: u32) -> Result<u32, AppError> {
    if HORIZON_CHOICES.contains(&years) {
        Ok(years)
    } else {
        Err(AppError::UnsupportedHorizon(years))
    }
}

/// 전력량 단가 [円/kWh]. 유한한 양수만 받는다.
pub fn validate_price_per_kwh(price: f64) -> Result<f64, AppError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(AppError::InvalidPricePerKwh(price))
    }
}

/// 상승률 [%]을 비율로 바꾼다. 음수와 NaN/무한대는 거부한다.
pub fn escalation_from_percent(percent: f64) -> Result<f64, AppError> {
    if percent.is_finite() && percent >= 0.0 {
        Ok(percent / 100.0)
    } else {
        Err(AppError::InvalidEscalation(percent))
    }
}

/// 설정값으로 초기 입력 스냅샷을 만든다. 설정의 기간이 선택지에 없으면 기본값을 쓴다.
pub fn initial_input(cfg: &Config) -> ProjectionInput {
    let defaults = ProjectionInput::default();
    let years = validate_horizon(cfg.horizon_years).unwrap_or_else(|_| {
        tracing::warn!(
            years = cfg.horizon_years,
            "unsupported horizon in config, using default"
        );
        defaults.years
    });
    ProjectionInput {
        room: cfg.default_room,
        years,
        escalation_rate: cfg.escalation_rate,
        price_per_kwh: cfg.price_per_kwh,
        ..defaults
    }
}

/// 사용 패턴 프리셋을 입력에 적용한다.
pub fn apply_scenario(input: &mut ProjectionInput, id: &str) -> Result<(), AppError> {
    let preset =
        scenario::find_scenario(id).ok_or_else(|| AppError::UnknownScenario(id.to_string()))?;
    input.usage = preset.usage();
    Ok(())
}

pub fn calculate(table: &SpecTable, input: &ProjectionInput) -> Result<CostReport, AppError> {
    let results = compute_result_set(table, input)?;
    Ok(CostReport::new(table, input, results))
}

/// 한 번 계산해 출력하고, 경로가 있으면 리포트를 저장한다.
pub fn run_once(
    table: &SpecTable,
    input: &ProjectionInput,
    tr: &Translator,
    export: Option<&Path>,
) -> Result<CostReport, AppError> {
    let report = calculate(table, input)?;
    println!("{}", report.to_text(tr));
    if let Some(path) = export {
        report.save(path, tr)?;
        println!(
            "{}",
            tr.tf(keys::RESULT_EXPORTED, &[("path", path.display().to_string())])
        );
    }
    Ok(report)
}

/// CLI 애플리케이션의 메인 루프를 실행한다. 표준 입력이 닫히면 종료한다.
pub fn run(
    config: &mut Config,
    table: &SpecTable,
    input: &mut ProjectionInput,
    tr: &mut Translator,
) -> Result<(), AppError> {
    match menu_loop(config, table, input, tr) {
        Err(AppError::EndOfInput) => {
            tracing::info!("stdin closed, leaving menu");
            println!("\n{}", tr.t(keys::APP_EXIT));
            Ok(())
        }
        other => other,
    }
}

fn menu_loop(
    config: &mut Config,
    table: &SpecTable,
    input: &mut ProjectionInput,
    tr: &mut Translator,
) -> Result<(), AppError> {
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Calculate => {
                ui_cli::collect_inputs(tr, input)?;
                run_once(table, input, tr, None)?;
                if let Some(path) = ui_cli::ask_export_path(tr)? {
                    export_report(table, input, tr, &path)?;
                }
            }
            MenuChoice::Scenarios => ui_cli::handle_scenarios(tr, input)?,
            MenuChoice::Features => ui_cli::handle_features(tr),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config, input)?;
                let lang = i18n::resolve_language("auto", Some(config.language.as_str()));
                *tr = Translator::new_with_pack(&lang, config.language_pack_dir.as_deref());
                config.save()?;
                println!("{}", tr.t(keys::SETTINGS_SAVED));
            }
            MenuChoice::Exit => {
                println!("{}", tr.t(keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}

fn export_report(
    table: &SpecTable,
    input: &ProjectionInput,
    tr: &Translator,
    path: &Path,
) -> Result<(), AppError> {
    let report = calculate(table, input)?;
    report.save(path, tr)?;
    println!(
        "{}",
        tr.tf(keys::RESULT_EXPORTED, &[("path", path.display().to_string())])
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_input_follows_config() {
        let cfg = Config {
            price_per_kwh: 27.0,
            escalation_rate: 0.0,
            horizon_years: 15,
            default_room: RoomSize::Tatami10,
            ..Config::default()
        };
        let input = initial_input(&cfg);
        assert_eq!(input.room, RoomSize::Tatami10);
        assert_eq!(input.years, 15);
        assert_eq!(input.price_per_kwh, 27.0);
        assert_eq!(input.escalation_rate, 0.0);
        assert!(!input.unit_prices.any_entered());
    }

    #[test]
    fn unsupported_horizon_falls_back() {
        let cfg = Config {
            horizon_years: 7,
            ..Config::default()
        };
        assert_eq!(initial_input(&cfg).years, 10);
        assert!(matches!(
            validate_horizon(7),
            Err(AppError::UnsupportedHorizon(7))
        ));
    }

    #[test]
    fn scenario_updates_usage_only() {
        let mut input = ProjectionInput::default();
        apply_scenario(&mut input, "telework").unwrap();
        assert_eq!(input.usage.daily_hours, 12.0);
        assert_eq!(input.usage.cool_ratio, 50.0);
        assert_eq!(input.years, 10);
        assert!(matches!(
            apply_scenario(&mut input, "office"),
            Err(AppError::UnknownScenario(_))
        ));
    }

    #[test]
    fn rate_and_price_checks() {
        assert_eq!(validate_price_per_kwh(27.5).unwrap(), 27.5);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_price_per_kwh(bad),
                Err(AppError::InvalidPricePerKwh(_))
            ));
        }
        assert_eq!(escalation_from_percent(0.0).unwrap(), 0.0);
        assert_eq!(escalation_from_percent(3.0).unwrap(), 0.03);
        for bad in [-5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                escalation_from_percent(bad),
                Err(AppError::InvalidEscalation(_))
            ));
        }
    }

    #[test]
    fn missing_table_file_is_an_error() {
        let cfg = Config {
            spec_table_path: Some("/nonexistent/aircon/table.toml".into()),
            ..Config::default()
        };
        assert!(matches!(load_spec_table(&cfg), Err(AppError::SpecTable(_))));
        assert_eq!(
            load_spec_table(&Config::default()).unwrap(),
            SpecTable::rated_power()
        );
    }
}
