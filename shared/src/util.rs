use chrono::NaiveDate;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current calendar date (UTC).
///
/// All business-date comparisons (subscription expiry, session dates)
/// use this one source so handlers and sweeps agree on "today".
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Snowflake-style i64 resource ID.
///
/// 53 bits total so the value survives a round-trip through JavaScript's
/// Number.MAX_SAFE_INTEGER: 41 bits of milliseconds since the custom
/// 2024-01-01 UTC epoch, then 12 random bits (4096 per ms — collision-free
/// at back-office write rates).
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    const EPOCH_MS: i64 = 1_704_067_200_000; // 2024-01-01 00:00:00 UTC
    let ts = (now_millis() - EPOCH_MS) & 0x1FF_FFFF_FFFF;
    let entropy: i64 = rand::thread_rng().gen_range(0..0x1000);
    (ts << 12) | entropy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_are_positive_and_distinct() {
        let a = snowflake_id();
        let b = snowflake_id();
        assert!(a > 0);
        assert!(b > 0);
        // Same millisecond is possible; identical entropy on top of it is
        // one in 4096 — retry once to keep the test deterministic enough.
        if a == b {
            assert_ne!(a, snowflake_id());
        }
    }
}
