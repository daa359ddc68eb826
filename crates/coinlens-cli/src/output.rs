//! 분석 결과 출력 (표 / JSON).

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::ValueEnum;
use coinlens_analytics::{FibonacciLevel, MarketAnalysis, SupportResistanceLevels, ValueArea};
use coinlens_core::{AnalysisResult, Timeframe};
use serde::Serialize;

/// 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 출력용 분석 보고서.
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub symbol: &'a str,
    pub timeframe: Timeframe,
    pub provider: &'a str,
    pub candles: usize,
    /// 마지막 캔들 시간 (epoch 밀리초)
    pub last_time: Option<i64>,
    pub last_close: Option<f64>,
    #[serde(flatten)]
    pub result: &'a AnalysisResult,
    pub support_resistance: &'a SupportResistanceLevels,
    pub value_area: Option<ValueArea>,
    pub fibonacci: &'a [FibonacciLevel],
}

impl<'a> AnalysisReport<'a> {
    pub fn new(
        symbol: &'a str,
        timeframe: Timeframe,
        provider: &'a str,
        analysis: &'a MarketAnalysis,
    ) -> Self {
        let latest = analysis.series.latest();
        Self {
            symbol,
            timeframe,
            provider,
            candles: analysis.series.len(),
            last_time: latest.map(|c| c.time()),
            last_close: latest.map(|c| c.close()),
            result: &analysis.result,
            support_resistance: analysis.series.support_resistance(),
            value_area: analysis.series.value_area(),
            fibonacci: analysis.series.fibonacci_levels(),
        }
    }
}

/// 보고서를 지정한 형식의 문자열로 변환.
pub fn render(report: &AnalysisReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(report)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize to JSON")
        }
    }
}

fn format_time(millis: i64) -> String {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn format_levels(levels: &[f64]) -> String {
    if levels.is_empty() {
        return "-".to_string();
    }
    levels
        .iter()
        .map(|p| format!("{:.2}", p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 테이블 형식 출력.
fn format_table(report: &AnalysisReport<'_>) -> String {
    let result = report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "{} {} ({}, {} candles)\n",
        report.symbol.to_uppercase(),
        report.timeframe,
        report.provider,
        report.candles
    ));
    if let (Some(time), Some(close)) = (report.last_time, report.last_close) {
        output.push_str(&format!("Last close: {:.2} @ {}\n", close, format_time(time)));
    }
    output.push_str(&"-".repeat(72));
    output.push('\n');

    output.push_str(&format!(
        "{:<16} {}\n",
        "Sentiment",
        result.sentiment().to_string().to_uppercase()
    ));
    output.push_str(&format!("{:<16} {}\n", "", result.sentiment_description()));
    output.push_str(&format!(
        "{:<16} {:.0}/100\n",
        "Strength",
        result.signal_strength()
    ));
    output.push_str(&format!("{:<16} {}\n", "", result.signal_description()));
    output.push_str(&format!(
        "{:<16} {:+.2}%\n",
        "Potential ROI",
        result.potential_roi()
    ));

    if !result.reasons().is_empty() {
        output.push_str("\nReasons:\n");
        for reason in result.reasons() {
            output.push_str(&format!("  - {}\n", reason));
        }
    }

    output.push_str("\nLevels:\n");
    output.push_str(&format!(
        "  {:<12} {}\n",
        "Support",
        format_levels(&report.support_resistance.support)
    ));
    output.push_str(&format!(
        "  {:<12} {}\n",
        "Resistance",
        format_levels(&report.support_resistance.resistance)
    ));
    if let Some(va) = report.value_area {
        output.push_str(&format!(
            "  {:<12} POC {:.2}, VAL {:.2}, VAH {:.2}\n",
            "Value Area", va.poc, va.low, va.high
        ));
    }

    output.push('\n');
    if result.signals().is_empty() {
        output.push_str("Signals: none\n");
    } else {
        output.push_str(&format!(
            "{:<6} {:<16} {:>12} {:>12} {:>12} {:>8} {:>6}\n",
            "TYPE", "INDICATOR", "PRICE", "TARGET", "STOP", "ROI%", "STR"
        ));
        output.push_str(&"-".repeat(78));
        output.push('\n');
        for signal in result.signals() {
            output.push_str(&format!(
                "{:<6} {:<16} {:>12.2} {:>12.2} {:>12.2} {:>8.2} {:>6.0}\n",
                signal.signal_type().to_string(),
                signal.indicator_name(),
                signal.price(),
                signal.target_price(),
                signal.stop_loss(),
                signal.potential_roi(),
                signal.strength()
            ));
            output.push_str(&format!("       {}\n", signal.description()));
        }
    }

    output
}
