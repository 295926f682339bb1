//! 계산 결과 리포트: 터미널 표/막대그래프, Markdown·CSV 내보내기.
//!
//! 값은 엔진 결과를 그대로 쓰고 표시할 때만 반올림한다.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::energy_spec::{Series, SpecTable, UnitConvention};
use crate::features::feature_rows;
use crate::i18n::{keys, Translator};
use crate::money::{format_plain, format_yen, format_yen_delta};
use crate::projection::{gap_to_cheapest, select_cheapest, CostResult, ProjectionInput};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("리포트 저장 오류: {0}")]
    Io(#[from] std::io::Error),
}

/// 저장 형식. 확장자로 결정한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Csv,
    Text,
}

impl ReportFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => ReportFormat::Csv,
            Some("md") | Some("markdown") => ReportFormat::Markdown,
            _ => ReportFormat::Text,
        }
    }
}

/// 한 번의 계산 결과와 그 조건.
#[derive(Debug, Clone)]
pub struct CostReport {
    pub input: ProjectionInput,
    pub table_name: String,
    pub unit: UnitConvention,
    pub baseline_hours: f64,
    /// `Series::ALL` 순서의 전체 결과 (미입력 행 포함)
    pub results: Vec<CostResult>,
    pub cheapest: Option<Series>,
}

const CHART_BAR: char = '█';

impl CostReport {
    pub fn new(table: &SpecTable, input: &ProjectionInput, results: Vec<CostResult>) -> Self {
        let cheapest = select_cheapest(&results);
        Self {
            input: input.clone(),
            table_name: table.name.clone(),
            unit: table.unit,
            baseline_hours: table.baseline_hours,
            results,
            cheapest,
        }
    }

    /// 표시 대상(가격 입력된) 행.
    pub fn priced(&self) -> impl Iterator<Item = &CostResult> {
        self.results.iter().filter(|r| r.is_priced())
    }

    pub fn has_priced_rows(&self) -> bool {
        self.priced().next().is_some()
    }

    fn years_var(&self) -> (&'static str, String) {
        ("years", self.input.years.to_string())
    }

    /// 비교표 머리글 7칸.
    pub fn header(&self, tr: &Translator) -> [String; 7] {
        [
            tr.t(keys::TABLE_SERIES),
            tr.t(keys::TABLE_UNIT_PRICE),
            tr.t(keys::TABLE_ANNUAL_COST),
            tr.tf(keys::TABLE_TOTAL_COST, &[self.years_var()]),
            tr.t(keys::TABLE_MONTHLY),
            tr.t(keys::TABLE_DAILY),
            tr.t(keys::TABLE_GAP),
        ]
    }

    /// 가격이 입력된 행만, 표시용 문자열로.
    pub fn rows(&self) -> Vec<[String; 7]> {
        let gaps = gap_to_cheapest(&self.results);
        self.priced()
            .map(|r| {
                let gap = gaps
                    .iter()
                    .find(|(s, _)| *s == r.series)
                    .map(|(_, g)| format_yen_delta(*g))
                    .unwrap_or_default();
                let mark = if Some(r.series) == self.cheapest {
                    " ★"
                } else {
                    ""
                };
                [
                    format!("{}{mark}", r.series),
                    format_yen(r.unit_price as f64),
                    format_yen(r.annual_energy_cost),
                    format_yen(r.total_cost),
                    format_yen(r.monthly_cost),
                    format_yen(r.daily_cost),
                    gap,
                ]
            })
            .collect()
    }

    /// 터미널용 정렬 표.
    pub fn render_table(&self, tr: &Translator) -> String {
        if !self.has_priced_rows() {
            return tr.t(keys::RESULT_NO_PRICES);
        }
        let header = self.header(tr);
        let rows = self.rows();
        let mut widths = header.clone().map(|h| display_width(&h));
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(display_width(cell));
            }
        }
        let mut out = String::new();
        let line = |cells: &[String; 7], out: &mut String| {
            let mut parts = Vec::with_capacity(cells.len());
            for (i, cell) in cells.iter().enumerate() {
                if i == 0 {
                    parts.push(pad_right(cell, widths[i]));
                } else {
                    parts.push(pad_left(cell, widths[i]));
                }
            }
            let _ = writeln!(out, "{}", parts.join(" | ").trim_end());
        };
        line(&header, &mut out);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(out, "{}", rule.join("-+-"));
        for row in &rows {
            line(row, &mut out);
        }
        out
    }

    /// 총비용 가로 막대그래프. 최저가 시리즈에 ★ 표시.
    pub fn render_bar_chart(&self, width: usize) -> String {
        let max = self
            .priced()
            .map(|r| r.total_cost)
            .fold(0.0_f64, f64::max);
        let mut out = String::new();
        for r in self.priced() {
            let len = if max > 0.0 {
                ((r.total_cost / max) * width as f64).round() as usize
            } else {
                0
            };
            let mark = if Some(r.series) == self.cheapest {
                " ★"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "{:<3}|{} {}{mark}",
                r.series.as_str(),
                CHART_BAR.to_string().repeat(len),
                format_yen(r.total_cost)
            );
        }
        out
    }

    /// 계산식 설명 두 줄.
    pub fn formula_lines(&self, tr: &Translator) -> [String; 2] {
        let usage = self.input.usage.clamped();
        let vars = [
            ("cool", format_plain(usage.cool_ratio)),
            ("heat", format_plain(100.0 - usage.cool_ratio)),
            ("hours", format_plain(usage.daily_hours)),
            ("price", format_plain(self.input.price_per_kwh)),
            ("baseline", format_plain(self.baseline_hours)),
        ];
        let energy_key = match self.unit {
            UnitConvention::PowerWatts => keys::FORMULA_POWER,
            UnitConvention::AnnualKwh => keys::FORMULA_ANNUAL_KWH,
        };
        [
            tr.tf(energy_key, &vars),
            tr.tf(
                keys::FORMULA_TOTAL,
                &[
                    self.years_var(),
                    ("rate", self.rate_percent()),
                ],
            ),
        ]
    }

    /// 계산에 실제로 쓰인 상승률 [%]. 음수는 0으로 본다.
    fn rate_percent(&self) -> String {
        format_plain(self.input.escalation_rate.max(0.0) * 100.0)
    }

    fn cheapest_line(&self, tr: &Translator) -> Option<String> {
        let series = self.cheapest?;
        let total = self.results.iter().find(|r| r.series == series)?.total_cost;
        Some(tr.tf(
            keys::RESULT_CHEAPEST,
            &[("series", series.to_string()), ("total", format_yen(total))],
        ))
    }

    fn condition_lines(&self, tr: &Translator) -> Vec<String> {
        let usage = self.input.usage.clamped();
        vec![
            tr.tf(keys::REPORT_ROOM, &[("room", tr.tatami(self.input.room.tatami()))]),
            tr.tf(
                keys::REPORT_USAGE,
                &[
                    ("hours", format_plain(usage.daily_hours)),
                    ("cool", format_plain(usage.cool_ratio)),
                    ("heat", format_plain(100.0 - usage.cool_ratio)),
                ],
            ),
            tr.tf(
                keys::REPORT_PRICE_PER_KWH,
                &[("price", format_plain(self.input.price_per_kwh))],
            ),
            tr.tf(
                keys::REPORT_ESCALATION,
                &[("rate", self.rate_percent())],
            ),
            tr.tf(
                keys::REPORT_TABLE_NAME,
                &[("name", self.table_name.clone()), ("unit", self.unit.to_string())],
            ),
        ]
    }

    /// 터미널 출력용 전체 텍스트 (제목, 표, 그래프, 계산식).
    pub fn to_text(&self, tr: &Translator) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", tr.tf(keys::RESULT_HEADING, &[self.years_var()]));
        let _ = writeln!(out, "{}\n", tr.tf(keys::RESULT_SUBHEADING, &[self.years_var()]));
        out.push_str(&self.render_table(tr));
        if self.has_priced_rows() {
            let _ = writeln!(out, "\n{}", tr.tf(keys::CHART_HEADING, &[self.years_var()]));
            out.push_str(&self.render_bar_chart(40));
            if let Some(line) = self.cheapest_line(tr) {
                let _ = writeln!(out, "\n{line}");
            }
        }
        let _ = writeln!(out);
        for line in self.formula_lines(tr) {
            let _ = writeln!(out, "{line}");
        }
        out
    }

    pub fn to_markdown(&self, tr: &Translator) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", tr.tf(keys::REPORT_TITLE, &[self.years_var()]));
        let _ = writeln!(out, "## {}\n", tr.t(keys::REPORT_CONDITIONS));
        for line in self.condition_lines(tr) {
            let _ = writeln!(out, "- {line}");
        }
        let _ = writeln!(out, "\n## {}\n", tr.tf(keys::RESULT_HEADING, &[self.years_var()]));
        if self.has_priced_rows() {
            let header = self.header(tr);
            let _ = writeln!(out, "| {} |", header.join(" | "));
            let _ = writeln!(out, "|---|{}", "---:|".repeat(header.len() - 1));
            for row in self.rows() {
                let _ = writeln!(out, "| {} |", row.join(" | "));
            }
            if let Some(line) = self.cheapest_line(tr) {
                let _ = writeln!(out, "\n**{line}**");
            }
            let _ = writeln!(out, "\n## {}\n", tr.tf(keys::CHART_HEADING, &[self.years_var()]));
            let _ = writeln!(out, "```text\n{}```", self.render_bar_chart(40));
        } else {
            let _ = writeln!(out, "{}", tr.t(keys::RESULT_NO_PRICES));
        }
        let _ = writeln!(out);
        for line in self.formula_lines(tr) {
            let _ = writeln!(out, "> {line}  ");
        }
        out.push_str(&features_markdown(tr));
        out
    }

    /// 기계 처리용 CSV. 반올림하지 않은 값을 그대로 쓴다.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "series,unit_price,annual_energy_cost,escalated_energy_cost,total_cost,monthly_cost,daily_cost,cheapest\n",
        );
        for r in self.priced() {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                r.series,
                r.unit_price,
                r.annual_energy_cost,
                r.escalated_energy_cost,
                r.total_cost,
                r.monthly_cost,
                r.daily_cost,
                Some(r.series) == self.cheapest
            );
        }
        out
    }

    pub fn render(&self, format: ReportFormat, tr: &Translator) -> String {
        match format {
            ReportFormat::Markdown => self.to_markdown(tr),
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Text => self.to_text(tr),
        }
    }

    /// 확장자에 맞는 형식으로 저장하고 사용한 형식을 돌려준다.
    pub fn save(&self, path: &Path, tr: &Translator) -> Result<ReportFormat, ReportError> {
        let format = ReportFormat::from_path(path);
        fs::write(path, self.render(format, tr))?;
        tracing::info!(path = %path.display(), ?format, "report saved");
        Ok(format)
    }
}

/// 기능 비교표 (Markdown).
pub fn features_markdown(tr: &Translator) -> String {
    let lang = tr.language();
    let mut out = String::new();
    let _ = writeln!(out, "\n## {}\n", tr.t(keys::FEATURES_HEADING));
    let names: Vec<&str> = Series::ALL.iter().map(|s| s.as_str()).collect();
    let _ = writeln!(out, "| | {} |", names.join(" | "));
    let _ = writeln!(out, "|---|---|---|---|");
    for row in feature_rows() {
        let values: Vec<&str> = Series::ALL
            .iter()
            .map(|s| row.value(*s).text(lang))
            .collect();
        let _ = writeln!(out, "| {} | {} |", row.label.text(lang), values.join(" | "));
    }
    out
}

/// 기능 비교표 (터미널).
pub fn features_text(tr: &Translator) -> String {
    let lang = tr.language();
    let mut out = String::new();
    let _ = writeln!(out, "{}", tr.t(keys::FEATURES_HEADING));
    for row in feature_rows() {
        let _ = writeln!(out, "\n[{}]", row.label.text(lang));
        for series in Series::ALL {
            let _ = writeln!(out, "  {:<3} {}", series.as_str(), row.value(series).text(lang));
        }
    }
    out
}

/// 동아시아 전각 문자를 2칸으로 센 표시 폭.
pub fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(
        u32::from(c),
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x1F300..=0x1FAFF
    )
}

fn pad_left(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{}{s}", " ".repeat(pad))
}

fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(s));
    format!("{s}{}", " ".repeat(pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ReportFormat::from_path(Path::new("a.CSV")), ReportFormat::Csv);
        assert_eq!(ReportFormat::from_path(Path::new("a.md")), ReportFormat::Markdown);
        assert_eq!(ReportFormat::from_path(Path::new("report")), ReportFormat::Text);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(display_width("XS"), 2);
        assert_eq!(display_width("本体価格"), 8);
        assert_eq!(pad_left("円", 4), "  円");
        assert_eq!(pad_right("ab", 4), "ab  ");
    }
}
