use std::path::PathBuf;
use std::process::ExitCode;

use aircon_cost_simulator::app::{self, AppError};
use aircon_cost_simulator::energy_spec::Series;
use aircon_cost_simulator::i18n::{self, keys, Translator};
use aircon_cost_simulator::projection::ProjectionInput;
use aircon_cost_simulator::{config, logging, money};
use clap::Parser;

/// 에어컨 시리즈별 총비용(본체 가격 + 기간 전기요금)을 비교하는 CLI.
#[derive(Parser, Debug)]
#[command(name = "aircon_cost_simulator_cli", version, about)]
struct Cli {
    /// 언어 (auto/ja/en)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,

    /// 방 크기 [다다미]: 6/8/10/14/18
    #[arg(short, long)]
    room: Option<u32>,

    /// XS 본체 가격 [円] (쉼표 허용)
    #[arg(long)]
    price_xs: Option<String>,

    /// EX 본체 가격 [円]
    #[arg(long)]
    price_ex: Option<String>,

    /// J 본체 가격 [円]
    #[arg(long)]
    price_j: Option<String>,

    /// 사용 패턴 프리셋 (bedroom/living/telework/pet/eco)
    #[arg(short, long)]
    scenario: Option<String>,

    /// 하루 운전시간 [h]
    #[arg(long)]
    hours: Option<f64>,

    /// 냉방 비율 [%]
    #[arg(long)]
    cool_ratio: Option<f64>,

    /// 분석 기간 [년]: 10/15
    #[arg(short, long)]
    years: Option<u32>,

    /// 전력량 단가 [円/kWh]
    #[arg(long)]
    price_per_kwh: Option<f64>,

    /// 연간 요금 상승률 [%]
    #[arg(long)]
    escalation: Option<f64>,

    /// 사양 테이블 TOML 파일
    #[arg(long)]
    spec_table: Option<PathBuf>,

    /// 리포트 저장 경로 (.md/.csv/기타는 텍스트)
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// 대화형 메뉴 실행
    #[arg(short, long)]
    interactive: bool,

    /// 상세 로그 출력
    #[arg(short, long)]
    verbose: bool,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "info" } else { "warn" });
    let lang = i18n::resolve_language(&cli.lang, None);
    let tr = Translator::new(&lang);
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
            ExitCode::FAILURE
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default()?;
    apply_config_flags(&cli, &mut cfg)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let mut tr = Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());
    let table = app::load_spec_table(&cfg)?;

    let mut input = app::initial_input(&cfg);
    if let Some(tatami) = cli.room {
        input.room = app::room_from_tatami(tatami)?;
    }
    if let Some(years) = cli.years {
        input.years = app::validate_horizon(years)?;
    }
    if let Some(id) = &cli.scenario {
        app::apply_scenario(&mut input, id)?;
    }
    if let Some(hours) = cli.hours {
        input.usage.daily_hours = hours;
    }
    if let Some(ratio) = cli.cool_ratio {
        input.usage.cool_ratio = ratio;
    }
    input.usage = input.usage.clamped();
    for (series, raw) in [
        (Series::XS, &cli.price_xs),
        (Series::EX, &cli.price_ex),
        (Series::J, &cli.price_j),
    ] {
        if let Some(raw) = raw {
            input.unit_prices.set(series, money::parse_price(raw));
        }
    }

    if wants_menu(&cli, &input) {
        app::run(&mut cfg, &table, &mut input, &mut tr)
    } else {
        app::run_once(&table, &input, &tr, cli.export.as_deref()).map(|_| ())
    }
}

/// 설정 파일 값을 덮어쓰는 플래그. 대화형 설정 메뉴와 같은 범위 검사를 한다.
fn apply_config_flags(cli: &Cli, cfg: &mut config::Config) -> Result<(), AppError> {
    if let Some(path) = &cli.spec_table {
        cfg.spec_table_path = Some(path.display().to_string());
    }
    if let Some(v) = cli.price_per_kwh {
        cfg.price_per_kwh = app::validate_price_per_kwh(v)?;
    }
    if let Some(v) = cli.escalation {
        cfg.escalation_rate = app::escalation_from_percent(v)?;
    }
    Ok(())
}

/// `--interactive`이거나, 가격도 저장 경로도 없으면 메뉴로 들어간다.
/// `--export`가 있으면 가격이 없어도 리포트(입력 안내 포함)를 한 번 저장한다.
fn wants_menu(cli: &Cli, input: &ProjectionInput) -> bool {
    cli.interactive || (cli.export.is_none() && !input.unit_prices.any_entered())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aircon_cost_simulator::projection::PriceSet;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aircon_cost_simulator_cli").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn export_without_prices_stays_non_interactive() {
        let input = ProjectionInput::default();
        assert!(!wants_menu(&parse(&["--export", "out.md"]), &input));
        assert!(wants_menu(&parse(&[]), &input));
        assert!(wants_menu(&parse(&["-i", "--export", "out.md"]), &input));

        let priced = ProjectionInput {
            unit_prices: PriceSet::new(100_000, 0, 0),
            ..ProjectionInput::default()
        };
        assert!(!wants_menu(&parse(&[]), &priced));
    }

    #[test]
    fn out_of_range_rate_flags_are_rejected() {
        let mut cfg = config::Config::default();
        let before = cfg.clone();
        assert!(matches!(
            apply_config_flags(&parse(&["--escalation=-5"]), &mut cfg),
            Err(AppError::InvalidEscalation(_))
        ));
        assert!(matches!(
            apply_config_flags(&parse(&["--price-per-kwh", "NaN"]), &mut cfg),
            Err(AppError::InvalidPricePerKwh(_))
        ));
        assert!(matches!(
            apply_config_flags(&parse(&["--price-per-kwh", "0"]), &mut cfg),
            Err(AppError::InvalidPricePerKwh(_))
        ));
        assert_eq!(cfg.price_per_kwh, before.price_per_kwh);
        assert_eq!(cfg.escalation_rate, before.escalation_rate);

        apply_config_flags(&parse(&["--price-per-kwh", "27", "--escalation", "0"]), &mut cfg)
            .unwrap();
        assert_eq!(cfg.price_per_kwh, 27.0);
        assert_eq!(cfg.escalation_rate, 0.0);
    }
}
