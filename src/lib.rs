//! 계산 엔진을 라이브러리로 분리하여 CLI와 GUI가 같은 결과를 쓰도록 한다.

pub mod app;
pub mod config;
pub mod energy_spec;
pub mod features;
pub mod i18n;
pub mod logging;
pub mod money;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod ui_cli;
