//! 방 크기(다다미 수)·시리즈별 소비 에너지 사양 테이블.
//!
//! 테이블 하나는 하나의 단위 규약(`power-watts` 또는 `annual-kwh`)만 가진다.
//! 두 규약의 데이터셋은 서로 환산하지 않고 독립된 프리셋으로 다룬다.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// 방 크기 구분(다다미 수).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RoomSize {
    Tatami6,
    Tatami8,
    Tatami10,
    Tatami14,
    Tatami18,
}

impl RoomSize {
    pub const ALL: [RoomSize; 5] = [
        RoomSize::Tatami6,
        RoomSize::Tatami8,
        RoomSize::Tatami10,
        RoomSize::Tatami14,
        RoomSize::Tatami18,
    ];

    /// 다다미 수를 반환한다.
    pub fn tatami(self) -> u32 {
        match self {
            RoomSize::Tatami6 => 6,
            RoomSize::Tatami8 => 8,
            RoomSize::Tatami10 => 10,
            RoomSize::Tatami14 => 14,
            RoomSize::Tatami18 => 18,
        }
    }

    /// 다다미 수로 구분을 찾는다. 목록에 없는 값은 None.
    pub fn from_tatami(tatami: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.tatami() == tatami)
    }
}

impl TryFrom<u32> for RoomSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RoomSize::from_tatami(value).ok_or_else(|| format!("지원하지 않는 다다미 수: {value}"))
    }
}

impl From<RoomSize> for u32 {
    fn from(value: RoomSize) -> Self {
        value.tatami()
    }
}

impl fmt::Display for RoomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tatami())
    }
}

/// 비교 대상 제품 시리즈. 선언 순서가 표시 순서다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Series {
    XS,
    EX,
    J,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::XS, Series::EX, Series::J];

    pub fn as_str(self) -> &'static str {
        match self {
            Series::XS => "XS",
            Series::EX => "EX",
            Series::J => "J",
        }
    }

    /// `Series::ALL` 안에서의 위치.
    pub fn index(self) -> usize {
        match self {
            Series::XS => 0,
            Series::EX => 1,
            Series::J => 2,
        }
    }
}

impl FromStr for Series {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Series::ALL
            .into_iter()
            .find(|series| series.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("알 수 없는 시리즈: {s}"))
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 테이블 값의 단위 규약.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitConvention {
    /// 순간 소비전력 [W]
    PowerWatts,
    /// 기준 운전시간에서의 연간 소비전력량 [kWh/년]
    AnnualKwh,
}

impl fmt::Display for UnitConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitConvention::PowerWatts => f.write_str("power-watts"),
            UnitConvention::AnnualKwh => f.write_str("annual-kwh"),
        }
    }
}

/// (방 크기, 시리즈) 한 쌍의 소비 에너지 사양.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySpec {
    pub room: RoomSize,
    pub series: Series,
    /// 냉방 에너지 (단위는 테이블 규약을 따른다)
    pub cool: f64,
    /// 난방 에너지 (단위는 테이블 규약을 따른다)
    pub heat: f64,
    /// 형식 번호
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// 사양 테이블 로드/검증 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum SpecTableError {
    #[error("사양 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("사양 파일 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("사양 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("사양 누락: {room}畳 / {series}")]
    Incomplete { room: RoomSize, series: Series },
    #[error("사양 중복: {room}畳 / {series}")]
    Duplicate { room: RoomSize, series: Series },
    #[error("잘못된 사양 값: {room}畳 / {series} ({field}={value})")]
    InvalidValue {
        room: RoomSize,
        series: Series,
        field: &'static str,
        value: f64,
    },
    #[error("기준 운전시간은 0보다 커야 한다: {0}")]
    InvalidBaselineHours(f64),
}

pub const DEFAULT_BASELINE_HOURS: f64 = 8.0;

fn default_baseline_hours() -> f64 {
    DEFAULT_BASELINE_HOURS
}

/// 방 크기 × 시리즈 사양 테이블.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecTable {
    /// 표시용 이름
    #[serde(default)]
    pub name: String,
    pub unit: UnitConvention,
    /// `annual-kwh` 값이 가정하는 하루 운전시간 [h]
    #[serde(default = "default_baseline_hours")]
    pub baseline_hours: f64,
    #[serde(rename = "entry", default)]
    pub entries: Vec<EnergySpec>,
}

/// 정격 소비전력 [W]: (다다미, 시리즈, 냉방, 난방)
const RATED_POWER_W: &[(RoomSize, Series, f64, f64)] = &[
    (RoomSize::Tatami6, Series::XS, 425.0, 440.0),
    (RoomSize::Tatami6, Series::EX, 520.0, 450.0),
    (RoomSize::Tatami6, Series::J, 635.0, 470.0),
    (RoomSize::Tatami8, Series::XS, 500.0, 515.0),
    (RoomSize::Tatami8, Series::EX, 640.0, 620.0),
    (RoomSize::Tatami8, Series::J, 680.0, 630.0),
    (RoomSize::Tatami10, Series::XS, 515.0, 690.0),
    (RoomSize::Tatami10, Series::EX, 770.0, 870.0),
    (RoomSize::Tatami10, Series::J, 770.0, 870.0),
    (RoomSize::Tatami14, Series::XS, 960.0, 1160.0),
    (RoomSize::Tatami14, Series::EX, 1340.0, 1340.0),
    (RoomSize::Tatami14, Series::J, 1380.0, 1400.0),
    (RoomSize::Tatami18, Series::XS, 1580.0, 1500.0),
    (RoomSize::Tatami18, Series::EX, 2280.0, 2150.0),
    (RoomSize::Tatami18, Series::J, 2280.0, 2030.0),
];

impl SpecTable {
    /// 내장 정격 소비전력 프리셋.
    pub fn rated_power() -> Self {
        Self {
            name: "rated-power".into(),
            unit: UnitConvention::PowerWatts,
            baseline_hours: DEFAULT_BASELINE_HOURS,
            entries: RATED_POWER_W
                .iter()
                .map(|&(room, series, cool, heat)| EnergySpec {
                    room,
                    series,
                    cool,
                    heat,
                    model: None,
                })
                .collect(),
        }
    }

    pub fn lookup(&self, room: RoomSize, series: Series) -> Option<&EnergySpec> {
        self.entries
            .iter()
            .find(|e| e.room == room && e.series == series)
    }

    /// 테이블에 한 개 이상 항목이 있는 방 크기를 선언 순서대로 반환한다.
    pub fn rooms(&self) -> Vec<RoomSize> {
        RoomSize::ALL
            .into_iter()
            .filter(|r| self.entries.iter().any(|e| e.room == *r))
            .collect()
    }

    /// 모든 방 크기 × 시리즈 조합이 정확히 한 번씩 있고 값이 유효한지 확인한다.
    pub fn validate(&self) -> Result<(), SpecTableError> {
        if !(self.baseline_hours.is_finite() && self.baseline_hours > 0.0) {
            return Err(SpecTableError::InvalidBaselineHours(self.baseline_hours));
        }
        for room in RoomSize::ALL {
            for series in Series::ALL {
                let count = self
                    .entries
                    .iter()
                    .filter(|e| e.room == room && e.series == series)
                    .count();
                match count {
                    0 => return Err(SpecTableError::Incomplete { room, series }),
                    1 => {}
                    _ => return Err(SpecTableError::Duplicate { room, series }),
                }
            }
        }
        for e in &self.entries {
            for (field, value) in [("cool", e.cool), ("heat", e.heat)] {
                if !(value.is_finite() && value >= 0.0) {
                    return Err(SpecTableError::InvalidValue {
                        room: e.room,
                        series: e.series,
                        field,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// TOML 문자열에서 테이블을 읽고 검증한다.
    pub fn from_toml_str(src: &str) -> Result<Self, SpecTableError> {
        let table: SpecTable = toml::from_str(src)?;
        table.validate()?;
        Ok(table)
    }

    /// TOML 파일에서 테이블을 읽고 검증한다.
    pub fn load(path: &Path) -> Result<Self, SpecTableError> {
        let content = fs::read_to_string(path)?;
        let table = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            unit = %table.unit,
            entries = table.entries.len(),
            "spec table loaded"
        );
        Ok(table)
    }

    pub fn to_toml_string(&self) -> Result<String, SpecTableError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for SpecTable {
    fn default() -> Self {
        Self::rated_power()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rated_power_preset_is_total() {
        let table = SpecTable::rated_power();
        table.validate().expect("built-in preset must be complete");
        assert_eq!(table.entries.len(), RoomSize::ALL.len() * Series::ALL.len());
        assert_eq!(table.rooms(), RoomSize::ALL.to_vec());
    }

    #[test]
    fn lookup_returns_rated_values() {
        let table = SpecTable::rated_power();
        let spec = table.lookup(RoomSize::Tatami6, Series::EX).unwrap();
        assert_eq!(spec.cool, 520.0);
        assert_eq!(spec.heat, 450.0);
        let spec = table.lookup(RoomSize::Tatami18, Series::J).unwrap();
        assert_eq!(spec.cool, 2280.0);
        assert_eq!(spec.heat, 2030.0);
    }

    #[test]
    fn missing_entry_fails_validation() {
        let mut table = SpecTable::rated_power();
        table
            .entries
            .retain(|e| !(e.room == RoomSize::Tatami10 && e.series == Series::J));
        assert!(table.lookup(RoomSize::Tatami10, Series::J).is_none());
        match table.validate() {
            Err(SpecTableError::Incomplete { room, series }) => {
                assert_eq!(room, RoomSize::Tatami10);
                assert_eq!(series, Series::J);
            }
            other => panic!("expected Incomplete, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_and_negative_entries_are_rejected() {
        let mut table = SpecTable::rated_power();
        let dup = table.entries[0].clone();
        table.entries.push(dup);
        assert!(matches!(
            table.validate(),
            Err(SpecTableError::Duplicate { .. })
        ));

        let mut table = SpecTable::rated_power();
        table.entries[4].heat = -1.0;
        assert!(matches!(
            table.validate(),
            Err(SpecTableError::InvalidValue { field: "heat", .. })
        ));
    }

    #[test]
    fn room_and_series_parse() {
        assert_eq!(RoomSize::from_tatami(14), Some(RoomSize::Tatami14));
        assert_eq!(RoomSize::from_tatami(12), None);
        assert_eq!("ex".parse::<Series>().unwrap(), Series::EX);
        assert!("XL".parse::<Series>().is_err());
        for (i, s) in Series::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }
}
