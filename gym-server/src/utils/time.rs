//! 时间工具函数 — 业务日期与结算周期
//!
//! 日期一律使用 `YYYY-MM-DD` 字符串（ISO 排序即字典序），
//! repository 层的范围查询只接收预先算好的边界字符串。
//! 结算周期 (period) 使用 `YYYY-MM`。

use chrono::{Datelike, Months, NaiveDate};

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 日期 → 存储字符串
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 当前日期的存储字符串 (UTC)
pub fn today_string() -> String {
    format_date(shared::util::today())
}

/// 日期加 N 个月（月末自动收缩，如 1-31 + 1mo → 2-28/29）
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date + Months::new(months)
}

/// 当前结算周期 (YYYY-MM, UTC)
pub fn current_period() -> String {
    shared::util::today().format("%Y-%m").to_string()
}

/// 解析结算周期 (YYYY-MM) → 半开日期区间 [first, next-first)
///
/// 调用方使用 `expense_date >= first AND expense_date < next` 语义。
pub fn period_range(period: &str) -> AppResult<(String, String)> {
    let first = NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid period format: {period}")))?;
    let next = add_months(first, 1);
    Ok((format_date(first), format_date(next)))
}

/// 月份 (year, month) → 半开日期区间，用于会话统计
pub fn month_range(year: i32, month: u32) -> AppResult<(String, String)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::validation(format!("Invalid month: {year}-{month}")))?;
    let next = add_months(first, 1);
    Ok((format_date(first), format_date(next)))
}

/// 周期首日（生成的工资 expense 统一记在周期第一天）
pub fn period_first_day(period: &str) -> AppResult<String> {
    Ok(period_range(period)?.0)
}

/// 校验业务日期不在未来（如：不能为未来日期记课）
pub fn ensure_not_future(date: NaiveDate, field: &str) -> AppResult<()> {
    if date > shared::util::today() {
        return Err(AppError::validation(format!(
            "{field} must not be in the future: {}",
            format_date(date)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date("2026-08-05").is_ok());
        assert!(parse_date("05/08/2026").is_err());
        assert!(parse_date("2026-13-01").is_err());
    }

    #[test]
    fn period_range_is_half_open() {
        let (from, to) = period_range("2026-08").unwrap();
        assert_eq!(from, "2026-08-01");
        assert_eq!(to, "2026-09-01");
        assert!(period_range("2026/08").is_err());
    }

    #[test]
    fn month_range_handles_december() {
        let (from, to) = month_range(2026, 12).unwrap();
        assert_eq!(from, "2026-12-01");
        assert_eq!(to, "2027-01-01");
    }

    #[test]
    fn add_months_clamps_month_end() {
        let d = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert_eq!(format_date(add_months(d, 1)), "2026-02-28");
    }
}
