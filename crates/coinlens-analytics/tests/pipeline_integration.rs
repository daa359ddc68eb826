//! 분석 파이프라인 통합 테스트
//!
//! 캔들 입력부터 AnalysisResult까지 전체 흐름을 검증합니다.

use coinlens_analytics::{
    analyze, AnalysisError, AnalyzerConfig, IndicatorEngine, MarketAnalyzer, SmaParams,
};
use coinlens_core::{Candle, DataError, Sentiment, SignalSource, SignalType};

/// 종가 목록으로 캔들 생성 (시가 = 직전 종가).
fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle::new(
                1_700_000_000_000 + i as i64 * 3_600_000,
                open,
                open.max(close) + 0.5,
                open.min(close) - 0.5,
                close,
                100.0 + i as f64,
            )
        })
        .collect()
}

/// 100에서 200까지 엄격하게 증가하는 종가 100개.
fn rising_closes() -> Vec<f64> {
    (0..100).map(|i| 100.0 + i as f64 * 100.0 / 99.0).collect()
}

#[test]
fn test_flat_series() {
    let candles: Vec<Candle> = (0..60)
        .map(|i| Candle::new(i * 60_000, 100.0, 100.0, 100.0, 100.0, 10.0))
        .collect();

    let analyzer = MarketAnalyzer::new(AnalyzerConfig::default()).unwrap();
    let analysis = analyzer.analyze_candles(candles).unwrap();
    let latest = analysis.series.latest().unwrap();

    assert_eq!(latest.bb_upper, Some(100.0));
    assert_eq!(latest.bb_middle, Some(100.0));
    assert_eq!(latest.bb_lower, Some(100.0));
    assert_eq!(latest.macd, Some(0.0));
    assert_eq!(latest.macd_histogram, Some(0.0));
    assert_eq!(latest.rsi, Some(50.0));
    assert_eq!(latest.stoch_k, Some(50.0));
    assert_eq!(latest.trend_strength, Some(10.0));

    // 거래 범위가 없으면 Value Area 없음
    assert!(analysis.series.value_area().is_none());

    let result = &analysis.result;
    assert_eq!(result.sentiment(), Sentiment::Neutral);
    assert!(result.signals().is_empty());
    assert_eq!(result.potential_roi(), 0.0);
}

#[test]
fn test_rising_series_is_bullish() {
    let closes = rising_closes();
    let analyzer = MarketAnalyzer::default();
    let analysis = analyzer
        .analyze_candles(candles_from_closes(&closes))
        .unwrap();

    let latest = analysis.series.latest().unwrap();
    assert!(latest.rsi.unwrap() > 99.0);
    assert!(latest.ema_fast.unwrap() > latest.ema_slow.unwrap());

    let result = &analysis.result;
    assert_eq!(result.sentiment(), Sentiment::Bullish);
    assert!(result.sentiment_description().contains("bullish"));
    assert!(result.potential_roi() >= 2.0);
    assert!(result.potential_roi() <= 5.0);
    assert!(result.reasons().iter().any(|r| r.contains("RSI overbought")));
}

#[test]
fn test_falling_series_is_bearish() {
    let closes: Vec<f64> = rising_closes().into_iter().rev().collect();
    let result = analyze(&candles_from_closes(&closes)).unwrap();

    assert_eq!(result.sentiment(), Sentiment::Bearish);
    assert!(result.potential_roi() <= -2.0);
    assert!(result.potential_roi() >= -5.0);
}

#[test]
fn test_empty_input_fails_fast() {
    let err = analyze(&[]).unwrap_err();
    assert!(matches!(err, AnalysisError::Data(DataError::EmptyInput)));
}

#[test]
fn test_malformed_input_is_rejected() {
    let mut candles = candles_from_closes(&rising_closes());
    candles[10].time = candles[3].time;
    let err = analyze(&candles).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Data(DataError::MalformedInput { index: 10, .. })
    ));

    let mut candles = candles_from_closes(&rising_closes());
    candles[20].close = f64::NAN;
    assert!(analyze(&candles).is_err());
}

#[test]
fn test_short_input_degrades_gracefully() {
    let candles = candles_from_closes(&[100.0, 101.0, 99.0, 102.0, 103.0]);
    let analysis = MarketAnalyzer::default().analyze_candles(candles).unwrap();

    assert_eq!(analysis.series.len(), 5);
    for candle in analysis.series.iter() {
        assert!(candle.rsi.is_none());
        assert!(candle.macd.is_none());
        assert!(candle.senkou_b.is_none());
    }
    // 보충 레벨로 항상 3개씩
    assert_eq!(analysis.series.support_resistance().support.len(), 3);
    assert_eq!(analysis.series.support_resistance().resistance.len(), 3);
    assert_eq!(analysis.result.sentiment(), Sentiment::Neutral);
}

#[test]
fn test_analysis_is_idempotent() {
    let closes: Vec<f64> = (0..120)
        .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.05)
        .collect();
    let candles = candles_from_closes(&closes);
    let analyzer = MarketAnalyzer::default();

    let first = analyzer.analyze_candles(candles.clone()).unwrap();
    let second = analyzer.analyze_candles(candles).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_rsi_reversal_emits_buy_signal() {
    // 60개 하락 후 마지막 캔들 급반등: RSI가 30을 상향 돌파
    let mut closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    closes.push(151.0);

    let result = analyze(&candles_from_closes(&closes)).unwrap();
    let rsi_signal = result
        .signals()
        .iter()
        .find(|s| s.indicator() == SignalSource::Rsi)
        .expect("RSI 신호가 있어야 합니다");

    assert_eq!(rsi_signal.signal_type(), SignalType::Buy);
    assert_eq!(rsi_signal.price(), 151.0);
    assert!((rsi_signal.target_price() - 151.0 * 1.03).abs() < 1e-9);
    assert!((rsi_signal.stop_loss() - 151.0 * 0.98).abs() < 1e-9);
    assert_eq!(rsi_signal.strength(), 75.0);
}

#[test]
fn test_sma_exact_period() {
    let engine = IndicatorEngine::new();
    let prices = [1.0, 2.0, 3.0, 4.0, 5.0];

    let sma = engine.sma(&prices, SmaParams { period: 5 }).unwrap();
    assert_eq!(sma, vec![None, None, None, None, Some(3.0)]);
}

#[test]
fn test_result_serializes_to_json() {
    let result = analyze(&candles_from_closes(&rising_closes())).unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["sentiment"], "bullish");
    assert!(json["signal_strength"].is_number());
    assert!(json["signals"].is_array());
}
