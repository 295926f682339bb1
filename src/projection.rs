//! 전기요금·총소유비용 계산 엔진.
//!
//! 모든 함수는 입력 스냅샷만으로 결과가 정해지는 순수 함수다. 반올림은 표시 단계에서만 한다.

use thiserror::Error;

use crate::energy_spec::{EnergySpec, RoomSize, Series, SpecTable, UnitConvention};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const MONTHS_PER_YEAR: f64 = 12.0;
/// 세금 포함 전력량 단가 [円/kWh]
pub const DEFAULT_PRICE_PER_KWH: f64 = 31.0;
/// 연간 전기요금 상승률
pub const DEFAULT_ESCALATION_RATE: f64 = 0.03;
/// 선택 가능한 분석 기간 [년]
pub const HORIZON_CHOICES: [u32; 2] = [10, 15];
pub const DEFAULT_HORIZON_YEARS: u32 = 10;
pub const MIN_DAILY_HOURS: f64 = 1.0;
pub const MAX_DAILY_HOURS: f64 = 24.0;

/// 계산 중 발생 가능한 오류.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// 사양 테이블 누락. 데이터 테이블 버그이므로 사용자 입력으로 복구하지 않는다.
    #[error("사양 테이블에 {room}畳 / {series} 항목이 없습니다")]
    MissingSpec { room: RoomSize, series: Series },
    #[error("분석 기간은 1년 이상이어야 합니다")]
    InvalidHorizon,
}

/// 시리즈별 본체 가격 [円]. 0은 미입력.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSet {
    prices: [u64; 3],
}

impl PriceSet {
    pub fn new(xs: u64, ex: u64, j: u64) -> Self {
        Self {
            prices: [xs, ex, j],
        }
    }

    pub fn get(&self, series: Series) -> u64 {
        self.prices[series.index()]
    }

    pub fn set(&mut self, series: Series, price: u64) {
        self.prices[series.index()] = price;
    }

    /// 하나라도 가격이 입력되었는지.
    pub fn any_entered(&self) -> bool {
        self.prices.iter().any(|&p| p > 0)
    }
}

/// 사용 패턴.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageInputs {
    /// 하루 운전시간 [h], 1~24
    pub daily_hours: f64,
    /// 냉방 비율 [%], 0~100 (나머지는 난방)
    pub cool_ratio: f64,
}

impl Default for UsageInputs {
    fn default() -> Self {
        Self {
            daily_hours: 8.0,
            cool_ratio: 50.0,
        }
    }
}

impl UsageInputs {
    /// 범위를 벗어난 값을 경계값으로 자른다. 잘린 경우 경고 로그를 남긴다.
    pub fn clamped(self) -> Self {
        let daily_hours = clamp_or_min(self.daily_hours, MIN_DAILY_HOURS, MAX_DAILY_HOURS);
        let cool_ratio = clamp_or_min(self.cool_ratio, 0.0, 100.0);
        if daily_hours != self.daily_hours || cool_ratio != self.cool_ratio {
            tracing::warn!(
                daily_hours = self.daily_hours,
                cool_ratio = self.cool_ratio,
                clamped_hours = daily_hours,
                clamped_ratio = cool_ratio,
                "usage inputs out of range, clamped"
            );
        }
        Self {
            daily_hours,
            cool_ratio,
        }
    }
}

fn clamp_or_min(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

/// 연간 전기요금 계산 입력.
#[derive(Debug, Clone, Copy)]
pub struct AnnualEnergyCostInput {
    /// 냉방 에너지 [W] 또는 [kWh/년]
    pub cool: f64,
    /// 난방 에너지 [W] 또는 [kWh/년]
    pub heat: f64,
    /// 냉방 비율 [%]
    pub cool_ratio: f64,
    /// 하루 운전시간 [h]
    pub daily_hours: f64,
    /// 전력량 단가 [円/kWh]
    pub price_per_kwh: f64,
    /// `AnnualKwh` 값이 가정하는 하루 운전시간 [h]
    pub baseline_hours: f64,
    pub unit: UnitConvention,
}

impl AnnualEnergyCostInput {
    /// 사양 한 줄과 사용 패턴으로 입력을 구성한다.
    pub fn from_spec(
        spec: &EnergySpec,
        table: &SpecTable,
        usage: UsageInputs,
        price_per_kwh: f64,
    ) -> Self {
        Self {
            cool: spec.cool,
            heat: spec.heat,
            cool_ratio: usage.cool_ratio,
            daily_hours: usage.daily_hours,
            price_per_kwh,
            baseline_hours: table.baseline_hours,
            unit: table.unit,
        }
    }
}

/// 냉난방 비율로 가중한 연간 소비전력량 [kWh/년].
pub fn annual_energy_kwh(input: &AnnualEnergyCostInput) -> f64 {
    let usage = UsageInputs {
        daily_hours: input.daily_hours,
        cool_ratio: input.cool_ratio,
    }
    .clamped();
    let ratio = usage.cool_ratio / 100.0;
    let cool = input.cool.max(0.0);
    let heat = input.heat.max(0.0);
    match input.unit {
        UnitConvention::PowerWatts => {
            let weighted_kw = cool / 1000.0 * ratio + heat / 1000.0 * (1.0 - ratio);
            weighted_kw * usage.daily_hours * DAYS_PER_YEAR
        }
        UnitConvention::AnnualKwh => {
            let weighted_kwh = cool * ratio + heat * (1.0 - ratio);
            if input.baseline_hours > 0.0 {
                weighted_kwh * (usage.daily_hours / input.baseline_hours)
            } else {
                0.0
            }
        }
    }
}

/// 연간 전기요금 [円/년]을 계산한다.
pub fn annual_energy_cost(input: AnnualEnergyCostInput) -> f64 {
    annual_energy_kwh(&input) * input.price_per_kwh.max(0.0)
}

/// 요금 상승률을 복리로 반영한 기간 합계 전기요금.
///
/// 1년차는 상승 없이 `base`, y년차는 `base × (1+rate)^(y-1)`.
pub fn escalated_total(base_annual_cost: f64, years: u32, escalation_rate: f64) -> f64 {
    let growth = 1.0 + escalation_rate.max(0.0);
    (0..years)
        .map(|y| base_annual_cost * growth.powi(y as i32))
        .sum()
}

/// 결과 집합 계산에 필요한 전체 입력 스냅샷.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionInput {
    pub room: RoomSize,
    pub unit_prices: PriceSet,
    pub usage: UsageInputs,
    /// 분석 기간 [년]
    pub years: u32,
    /// 연간 요금 상승률 (0.03 = 3%)
    pub escalation_rate: f64,
    /// 전력량 단가 [円/kWh]
    pub price_per_kwh: f64,
}

impl Default for ProjectionInput {
    fn default() -> Self {
        Self {
            room: RoomSize::Tatami6,
            unit_prices: PriceSet::default(),
            usage: UsageInputs::default(),
            years: DEFAULT_HORIZON_YEARS,
            escalation_rate: DEFAULT_ESCALATION_RATE,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
        }
    }
}

/// 시리즈 한 개의 비용 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostResult {
    pub series: Series,
    /// 본체 가격 [円]
    pub unit_price: u64,
    /// 1년차 전기요금 [円]
    pub annual_energy_cost: f64,
    /// 기간 합계 전기요금(상승률 반영) [円]
    pub escalated_energy_cost: f64,
    /// 본체 가격 + 기간 전기요금 [円]
    pub total_cost: f64,
    /// 월 환산 [円/월]
    pub monthly_cost: f64,
    /// 일 환산 [円/일]
    pub daily_cost: f64,
}

impl CostResult {
    /// 가격이 입력되어 비교 대상인지.
    pub fn is_priced(&self) -> bool {
        self.unit_price > 0
    }
}

/// 테이블에서 사양을 찾는다. 없으면 설정 오류로 실패한다.
pub fn spec_for(
    table: &SpecTable,
    room: RoomSize,
    series: Series,
) -> Result<&EnergySpec, ProjectionError> {
    table
        .lookup(room, series)
        .ok_or(ProjectionError::MissingSpec { room, series })
}

/// 모든 시리즈의 결과를 `Series::ALL` 순서로 계산한다. 가격 0인 행도 포함한다.
pub fn compute_result_set(
    table: &SpecTable,
    input: &ProjectionInput,
) -> Result<Vec<CostResult>, ProjectionError> {
    if input.years == 0 {
        return Err(ProjectionError::InvalidHorizon);
    }
    let usage = input.usage.clamped();
    let years = f64::from(input.years);
    let mut results = Vec::with_capacity(Series::ALL.len());
    for series in Series::ALL {
        let spec = spec_for(table, input.room, series)?;
        let annual = annual_energy_cost(AnnualEnergyCostInput::from_spec(
            spec,
            table,
            usage,
            input.price_per_kwh,
        ));
        let escalated = escalated_total(annual, input.years, input.escalation_rate);
        let unit_price = input.unit_prices.get(series);
        let total_cost = unit_price as f64 + escalated;
        results.push(CostResult {
            series,
            unit_price,
            annual_energy_cost: annual,
            escalated_energy_cost: escalated,
            total_cost,
            monthly_cost: total_cost / (years * MONTHS_PER_YEAR),
            daily_cost: total_cost / (years * DAYS_PER_YEAR),
        });
    }
    tracing::debug!(
        room = %input.room,
        years = input.years,
        hours = usage.daily_hours,
        cool_ratio = usage.cool_ratio,
        ?results,
        "result set computed"
    );
    Ok(results)
}

/// 가격이 입력된 행 중 총비용이 가장 낮은 시리즈. 동률이면 먼저 나온 쪽.
pub fn select_cheapest(results: &[CostResult]) -> Option<Series> {
    let mut best: Option<&CostResult> = None;
    for r in results.iter().filter(|r| r.is_priced()) {
        match best {
            Some(b) if r.total_cost >= b.total_cost => {}
            _ => best = Some(r),
        }
    }
    best.map(|r| r.series)
}

/// 가격이 입력된 각 행의 최저가 대비 총비용 차액 [円]. 입력 순서를 유지한다.
pub fn gap_to_cheapest(results: &[CostResult]) -> Vec<(Series, f64)> {
    let Some(cheapest) = select_cheapest(results) else {
        return Vec::new();
    };
    let base = results
        .iter()
        .find(|r| r.series == cheapest)
        .map(|r| r.total_cost)
        .unwrap_or(0.0);
    results
        .iter()
        .filter(|r| r.is_priced())
        .map(|r| (r.series, r.total_cost - base))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(series: Series, total: f64, price: u64) -> CostResult {
        CostResult {
            series,
            unit_price: price,
            annual_energy_cost: 0.0,
            escalated_energy_cost: 0.0,
            total_cost: total,
            monthly_cost: 0.0,
            daily_cost: 0.0,
        }
    }

    #[test]
    fn usage_clamping() {
        let u = UsageInputs {
            daily_hours: 30.0,
            cool_ratio: -5.0,
        }
        .clamped();
        assert_eq!(u.daily_hours, 24.0);
        assert_eq!(u.cool_ratio, 0.0);
        let u = UsageInputs {
            daily_hours: f64::NAN,
            cool_ratio: 120.0,
        }
        .clamped();
        assert_eq!(u.daily_hours, 1.0);
        assert_eq!(u.cool_ratio, 100.0);
    }

    #[test]
    fn cheapest_ignores_unpriced_rows() {
        let rows = [
            row(Series::XS, 10.0, 0),
            row(Series::EX, 300.0, 1),
            row(Series::J, 200.0, 1),
        ];
        assert_eq!(select_cheapest(&rows), Some(Series::J));
    }

    #[test]
    fn gap_is_relative_to_cheapest() {
        let rows = [
            row(Series::XS, 150.0, 1),
            row(Series::EX, 100.0, 1),
            row(Series::J, 999.0, 0),
        ];
        let gaps = gap_to_cheapest(&rows);
        assert_eq!(gaps, vec![(Series::XS, 50.0), (Series::EX, 0.0)]);
        assert!(gap_to_cheapest(&[row(Series::XS, 1.0, 0)]).is_empty());
    }

    #[test]
    fn price_set_accessors() {
        let mut p = PriceSet::default();
        assert!(!p.any_entered());
        p.set(Series::J, 98_000);
        assert_eq!(p.get(Series::J), 98_000);
        assert_eq!(p.get(Series::XS), 0);
        assert!(p.any_entered());
    }
}
