//! 时区相关的工具函数
//!
//! 时区统一用偏移字符串表达（"+08:00"、"-05:00"），未指定时取本地时区。
//! 偏移在构造期解析为 `ZoneOffset`，非法偏移立即报配置错误，
//! 之后的格式化与毫秒换算不再可能失败。
//! 日期格式模式沿用 yyyy-MM-dd 风格的记号，内部翻译为 strftime。

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

use crate::error::QuickModelResult;
use crate::model_error;

/// 将时区偏移字符串转换为秒数
///
/// # 参数
/// * `timezone_offset` - 时区偏移，格式 "+08:00", "-05:00"
pub fn parse_timezone_offset_to_seconds(timezone_offset: &str) -> QuickModelResult<i32> {
    if timezone_offset.len() != 6
        || !(timezone_offset.starts_with('+') || timezone_offset.starts_with('-'))
        || timezone_offset.as_bytes()[3] != b':'
    {
        return Err(model_error!(
            config,
            format!(
                "无效的时区偏移格式: '{}', 期望格式: +HH:MM",
                timezone_offset
            )
        ));
    }

    let sign = if timezone_offset.starts_with('+') { 1 } else { -1 };
    let hours: i32 = timezone_offset[1..3].parse().map_err(|_| {
        model_error!(
            config,
            format!("无效的小时格式: '{}'", &timezone_offset[1..3])
        )
    })?;
    let minutes: i32 = timezone_offset[4..6].parse().map_err(|_| {
        model_error!(
            config,
            format!("无效的分钟格式: '{}'", &timezone_offset[4..6])
        )
    })?;

    Ok(sign * (hours * 3600 + minutes * 60))
}

/// 已验证的时区偏移
///
/// 构造即校验：持有原始偏移串与解析后的固定偏移。
#[derive(Clone, PartialEq)]
pub struct ZoneOffset {
    text: String,
    offset: FixedOffset,
}

impl ZoneOffset {
    /// 解析并校验偏移字符串（"+08:00"），非法偏移返回配置错误
    pub fn parse(timezone_offset: &str) -> QuickModelResult<Self> {
        let seconds = parse_timezone_offset_to_seconds(timezone_offset)?;
        let offset = FixedOffset::east_opt(seconds).ok_or_else(|| {
            model_error!(
                config,
                format!("时区偏移超出范围: '{}'", timezone_offset)
            )
        })?;
        Ok(Self {
            text: timezone_offset.to_string(),
            offset,
        })
    }

    /// 本地时区偏移
    pub fn local() -> Self {
        let offset = Local::now().offset().fix();
        let seconds = offset.local_minus_utc();
        let sign = if seconds < 0 { '-' } else { '+' };
        let abs = seconds.abs();
        Self {
            text: format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60),
            offset,
        }
    }

    /// 偏移字符串
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// 偏移秒数
    pub fn seconds(&self) -> i32 {
        self.offset.local_minus_utc()
    }
}

impl std::fmt::Debug for ZoneOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// 将 yyyy-MM-dd 风格的格式模式翻译为 strftime 格式
///
/// 支持的记号：yyyy、MM、dd、HH、mm、ss、SSS，其余字符原样保留。
pub fn pattern_to_strftime(pattern: &str) -> String {
    let mut result = String::with_capacity(pattern.len() + 8);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        match (c, run) {
            ('y', n) if n >= 4 => {
                result.push_str("%Y");
                i += 4;
            }
            ('y', _) => {
                result.push_str("%y");
                i += run;
            }
            ('M', _) => {
                result.push_str("%m");
                i += run.min(2);
            }
            ('d', _) => {
                result.push_str("%d");
                i += run.min(2);
            }
            ('H', _) => {
                result.push_str("%H");
                i += run.min(2);
            }
            ('m', _) => {
                result.push_str("%M");
                i += run.min(2);
            }
            ('s', _) => {
                result.push_str("%S");
                i += run.min(2);
            }
            ('S', n) if n >= 3 => {
                result.push_str("%3f");
                i += 3;
            }
            ('%', _) => {
                result.push_str("%%");
                i += 1;
            }
            _ => {
                result.push(c);
                i += 1;
            }
        }
    }
    result
}

/// 在指定时区按格式模式格式化一个绝对时间点
///
/// # 参数
/// * `instant` - UTC 时间点
/// * `zone` - 已验证的时区偏移
/// * `pattern` - yyyy-MM-dd 风格的格式模式
pub fn format_in_zone(instant: &DateTime<Utc>, zone: &ZoneOffset, pattern: &str) -> String {
    let zoned = instant.with_timezone(&zone.offset);
    zoned.format(&pattern_to_strftime(pattern)).to_string()
}

/// 计算按时区偏移调整后的毫秒时间戳（时间戳字段的外部表示）
pub fn zoned_epoch_millis(instant: &DateTime<Utc>, zone: &ZoneOffset) -> i64 {
    instant.timestamp_millis() + i64::from(zone.seconds()) * 1000
}

/// 将指定时区语义下的 naive 时间解释为 UTC 时间点
pub fn naive_in_zone_to_utc(naive: chrono::NaiveDateTime, zone: &ZoneOffset) -> DateTime<Utc> {
    let utc_naive = naive - chrono::Duration::seconds(i64::from(zone.seconds()));
    DateTime::<Utc>::from_naive_utc_and_offset(utc_naive, Utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone_offset() {
        assert_eq!(parse_timezone_offset_to_seconds("+08:00").unwrap(), 28800);
        assert_eq!(parse_timezone_offset_to_seconds("-05:30").unwrap(), -19800);
        assert_eq!(parse_timezone_offset_to_seconds("+00:00").unwrap(), 0);
        assert!(parse_timezone_offset_to_seconds("0800").is_err());
        assert!(parse_timezone_offset_to_seconds("+8:00").is_err());
    }

    #[test]
    fn test_zone_offset_parse() {
        let zone = ZoneOffset::parse("+08:00").unwrap();
        assert_eq!(zone.seconds(), 28800);
        assert_eq!(zone.as_str(), "+08:00");
        assert!(ZoneOffset::parse("+8:00").is_err());
        // 格式合法但超出固定偏移范围
        assert!(ZoneOffset::parse("+99:00").is_err());
    }

    #[test]
    fn test_pattern_to_strftime() {
        assert_eq!(pattern_to_strftime("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(pattern_to_strftime("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(pattern_to_strftime("HH:mm:ss.SSS"), "%H:%M:%S.%3f");
    }

    #[test]
    fn test_format_in_zone() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 5).unwrap();
        let cst = ZoneOffset::parse("+08:00").unwrap();
        let utc = ZoneOffset::parse("+00:00").unwrap();
        assert_eq!(
            format_in_zone(&dt, &cst, "yyyy-MM-dd HH:mm:ss"),
            "2024-03-02 00:30:05"
        );
        assert_eq!(format_in_zone(&dt, &utc, "yyyy-MM-dd"), "2024-03-01");
    }

    #[test]
    fn test_zoned_epoch_millis() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let base = dt.timestamp_millis();
        let cst = ZoneOffset::parse("+08:00").unwrap();
        let utc = ZoneOffset::parse("+00:00").unwrap();
        assert_eq!(zoned_epoch_millis(&dt, &utc), base);
        assert_eq!(zoned_epoch_millis(&dt, &cst), base + 28_800_000);
    }
}
