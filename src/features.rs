//! 시리즈별 기능 비교표. 값은 카탈로그 기준 참고용이다.

use crate::energy_spec::Series;
use crate::i18n::Language;

/// 일본어/영어 문자열 한 쌍.
#[derive(Debug, Clone, Copy)]
pub struct Localized {
    pub ja: &'static str,
    pub en: &'static str,
}

impl Localized {
    const fn new(ja: &'static str, en: &'static str) -> Self {
        Self { ja, en }
    }

    pub fn text(&self, lang: Language) -> &'static str {
        match lang {
            Language::Ja => self.ja,
            Language::En => self.en,
        }
    }
}

const NONE: Localized = Localized::new("―", "-");

#[derive(Debug)]
pub struct FeatureRow {
    pub label: Localized,
    /// `Series::ALL` 순서
    pub values: [Localized; 3],
}

impl FeatureRow {
    pub fn value(&self, series: Series) -> Localized {
        self.values[series.index()]
    }
}

const FEATURES: &[FeatureRow] = &[
    FeatureRow {
        label: Localized::new("省エネ指標（APF）", "Energy efficiency (APF)"),
        values: [
            Localized::new("7.1", "7.1"),
            Localized::new("5.5", "5.5"),
            Localized::new("4.9", "4.9"),
        ],
    },
    FeatureRow {
        label: Localized::new("エネチャージ快湿制御", "Energy-charge humidity control"),
        values: [Localized::new("標準搭載", "Standard"), NONE, NONE],
    },
    FeatureRow {
        label: Localized::new("新エコロータリーコンプレッサー", "New eco rotary compressor"),
        values: [Localized::new("低摩耗・低電力", "Low wear, low power"), NONE, NONE],
    },
    FeatureRow {
        label: Localized::new("ナノイー X", "nanoe X"),
        values: [
            Localized::new("48 兆粒子", "48 trillion particles"),
            Localized::new("48 兆粒子", "48 trillion particles"),
            Localized::new("9.6 兆粒子", "9.6 trillion particles"),
        ],
    },
    FeatureRow {
        label: Localized::new("フィルター掃除方式", "Filter cleaning"),
        values: [
            Localized::new("ゴミ自動排出おそうじロボ", "Self-emptying cleaning robot"),
            Localized::new("ゴミ自動排出おそうじロボ", "Self-emptying cleaning robot"),
            Localized::new("抗菌フィルター（手動）", "Antibacterial filter (manual)"),
        ],
    },
    FeatureRow {
        label: Localized::new("AIセンサー数／種類", "AI sensors"),
        values: [
            Localized::new(
                "4 センサー（人・温度・湿度・日射）",
                "4 sensors (people, temperature, humidity, sunlight)",
            ),
            Localized::new(
                "3 センサー（人・日射・床温度）",
                "3 sensors (people, sunlight, floor temperature)",
            ),
            Localized::new("温度センサーのみ", "Temperature sensor only"),
        ],
    },
    FeatureRow {
        label: Localized::new("耐塩害設計", "Salt-damage protection"),
        values: [
            Localized::new("ブルーフィン＋全面メッシュガード", "Blue fin + full mesh guard"),
            Localized::new("ブルーフィンのみ", "Blue fin only"),
            Localized::new("標準アルミ", "Standard aluminium"),
        ],
    },
    FeatureRow {
        label: Localized::new("足元 43 ℃暖房", "43 °C floor-level heating"),
        values: [Localized::new("対応", "Supported"), NONE, NONE],
    },
];

pub fn feature_rows() -> &'static [FeatureRow] {
    FEATURES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apf_row_is_ordered_by_series() {
        let apf = &feature_rows()[0];
        assert_eq!(apf.value(Series::XS).text(Language::En), "7.1");
        assert_eq!(apf.value(Series::J).text(Language::Ja), "4.9");
    }
}
