use aircon_cost_simulator::{
    app,
    config::Config,
    energy_spec::{RoomSize, Series, SpecTable, SpecTableError, UnitConvention},
};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("aircon_spec_test_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    dir.join(name)
}

fn full_table_toml(unit: &str, skip: Option<(u32, &str)>) -> String {
    let mut src = format!("name = \"catalog-2024\"\nunit = \"{unit}\"\n");
    for room in RoomSize::ALL {
        for series in Series::ALL {
            if skip == Some((room.tatami(), series.as_str())) {
                continue;
            }
            src.push_str(&format!(
                "\n[[entry]]\nroom = {}\nseries = \"{}\"\ncool = {}.0\nheat = {}.0\nmodel = \"AC-{}{}\"\n",
                room.tatami(),
                series,
                100 + room.tatami() * 10,
                200 + room.tatami() * 10,
                series,
                room.tatami()
            ));
        }
    }
    src
}

#[test]
fn annual_kwh_table_loads_with_default_baseline() {
    let table = SpecTable::from_toml_str(&full_table_toml("annual-kwh", None)).expect("table");
    assert_eq!(table.unit, UnitConvention::AnnualKwh);
    assert_eq!(table.baseline_hours, 8.0);
    let spec = table.lookup(RoomSize::Tatami14, Series::J).expect("14/J");
    assert_eq!(spec.cool, 240.0);
    assert_eq!(spec.heat, 340.0);
    assert_eq!(spec.model.as_deref(), Some("AC-J14"));
}

#[test]
fn incomplete_file_is_rejected() {
    let src = full_table_toml("power-watts", Some((8, "EX")));
    match SpecTable::from_toml_str(&src) {
        Err(SpecTableError::Incomplete { room, series }) => {
            assert_eq!(room, RoomSize::Tatami8);
            assert_eq!(series, Series::EX);
        }
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn unknown_room_or_unit_fails_to_parse() {
    let bad_room = full_table_toml("power-watts", None).replace("room = 18", "room = 12");
    assert!(matches!(
        SpecTable::from_toml_str(&bad_room),
        Err(SpecTableError::Parse(_))
    ));
    let bad_unit = full_table_toml("hourly-kwh", None);
    assert!(matches!(
        SpecTable::from_toml_str(&bad_unit),
        Err(SpecTableError::Parse(_))
    ));
}

#[test]
fn zero_baseline_hours_is_rejected() {
    let src = full_table_toml("annual-kwh", None)
        .replacen("unit = \"annual-kwh\"\n", "unit = \"annual-kwh\"\nbaseline_hours = 0.0\n", 1);
    assert!(matches!(
        SpecTable::from_toml_str(&src),
        Err(SpecTableError::InvalidBaselineHours(h)) if h == 0.0
    ));
}

#[test]
fn built_in_preset_survives_file_round_trip() {
    let path = temp_file("rated_power.toml");
    let table = SpecTable::rated_power();
    fs::write(&path, table.to_toml_string().expect("serialize")).expect("write");
    let loaded = SpecTable::load(&path).expect("load");
    assert_eq!(loaded, table);
    let _ = fs::remove_file(&path);
}

#[test]
fn config_points_at_custom_table() {
    let path = temp_file("custom.toml");
    fs::write(&path, full_table_toml("annual-kwh", None)).expect("write");
    let cfg = Config {
        spec_table_path: Some(path.display().to_string()),
        ..Config::default()
    };
    let table = app::load_spec_table(&cfg).expect("custom table");
    assert_eq!(table.name, "catalog-2024");
    assert_eq!(table.unit, UnitConvention::AnnualKwh);
    let _ = fs::remove_file(&path);

    let blank = Config {
        spec_table_path: Some("  ".into()),
        ..Config::default()
    };
    assert_eq!(app::load_spec_table(&blank).expect("preset"), SpecTable::rated_power());
}
