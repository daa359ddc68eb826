//! 지원 타임프레임 목록.

use coinlens_core::Timeframe;

/// 타임프레임 목록을 표 형식 문자열로 반환.
pub fn format_timeframes() -> String {
    let mut output = format!("{:<8} {:>10}\n", "INTERVAL", "MINUTES");
    output.push_str(&"-".repeat(19));
    output.push('\n');
    for tf in Timeframe::ALL {
        output.push_str(&format!("{:<8} {:>10}\n", tf.to_string(), tf.as_minutes()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_all_timeframes() {
        let output = format_timeframes();
        // 헤더 2줄 + 12개
        assert_eq!(output.lines().count(), 14);
        assert!(output.contains("4h"));
        assert!(output.contains("1w"));
    }
}
