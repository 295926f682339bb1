//! 대표 사용 패턴 프리셋.

use crate::projection::UsageInputs;

/// 사용 패턴 프리셋 한 개. 표시 문자열은 `scenario.<id>.label` / `.desc` 키로 번역한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub id: &'static str,
    /// 하루 운전시간 [h]
    pub daily_hours: f64,
    /// 냉방 비율 [%]
    pub cool_ratio: f64,
}

impl Scenario {
    pub fn usage(&self) -> UsageInputs {
        UsageInputs {
            daily_hours: self.daily_hours,
            cool_ratio: self.cool_ratio,
        }
    }

    pub fn label_key(&self) -> String {
        format!("scenario.{}.label", self.id)
    }

    pub fn desc_key(&self) -> String {
        format!("scenario.{}.desc", self.id)
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        id: "bedroom",
        daily_hours: 8.0,
        cool_ratio: 70.0,
    },
    Scenario {
        id: "living",
        daily_hours: 10.0,
        cool_ratio: 40.0,
    },
    Scenario {
        id: "telework",
        daily_hours: 12.0,
        cool_ratio: 50.0,
    },
    Scenario {
        id: "pet",
        daily_hours: 24.0,
        cool_ratio: 60.0,
    },
    Scenario {
        id: "eco",
        daily_hours: 4.0,
        cool_ratio: 30.0,
    },
];

pub fn scenarios() -> &'static [Scenario] {
    SCENARIOS
}

pub fn find_scenario(id: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id.eq_ignore_ascii_case(id.trim()))
}
