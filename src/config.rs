use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::energy_spec::RoomSize;
use crate::projection::{DEFAULT_ESCALATION_RATE, DEFAULT_HORIZON_YEARS, DEFAULT_PRICE_PER_KWH};

pub const CONFIG_FILE: &str = "config.toml";

/// 애플리케이션 설정을 표현한다. 빠진 항목은 기본값으로 채운다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 언어 코드 (auto/ja-jp/en-us)
    pub language: String,
    /// 외부 언어팩 디렉터리
    pub language_pack_dir: Option<String>,
    /// 전력량 단가 [円/kWh]
    pub price_per_kwh: f64,
    /// 연간 요금 상승률 (0.03 = 3%)
    pub escalation_rate: f64,
    /// 분석 기간 [년]
    pub horizon_years: u32,
    /// 시작 시 선택되는 방 크기
    pub default_room: RoomSize,
    /// 사양 테이블 TOML 경로. 없으면 내장 정격 소비전력 프리셋
    pub spec_table_path: Option<String>,
    /// 일본어 표시용 사용자 폰트 경로 (GUI)
    pub font_path: Option<String>,
    /// 창 투명도 (GUI)
    pub window_alpha: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            language_pack_dir: None,
            price_per_kwh: DEFAULT_PRICE_PER_KWH,
            escalation_rate: DEFAULT_ESCALATION_RATE,
            horizon_years: DEFAULT_HORIZON_YEARS,
            default_room: RoomSize::Tatami6,
            spec_table_path: None,
            font_path: None,
            window_alpha: 1.0,
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_or_create(Path::new(CONFIG_FILE))
}

/// 지정 경로의 설정을 로드한다. 파일이 없으면 기본값을 저장한 뒤 반환한다.
pub fn load_or_create(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        tracing::info!(path = %path.display(), "default config created");
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
