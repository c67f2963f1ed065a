// ==========================================
// BREEAM & LEED 认证看板 - 有效期月数计算
// ==========================================
// 职责: 到期日 + 今天 → 带符号剩余月数
// 红线: "今天"必须显式传入,引擎不读取系统时钟
// ==========================================

use crate::domain::types::ExpiryBasis;
use chrono::{Datelike, Months, NaiveDate};

/// LEED 旧版体系标识（有效期 5 年）
pub const LEED_LEGACY_VERSION: &str = "v2009";
/// LEED 旧版体系有效年数
pub const LEED_LEGACY_YEARS: u32 = 5;
/// LEED 其余版本（及缺失/无法识别）有效年数
pub const LEED_DEFAULT_YEARS: u32 = 3;

pub struct HorizonCalculator;

impl HorizonCalculator {
    /// 计算带符号剩余月数
    ///
    /// 规则:
    /// - 基础差 = (年差)*12 + (月差)
    /// - 到期日 ≥ 今天 且 到期日的日 > 今天的日 → +1
    /// - 到期日 < 今天 且 到期日的日 < 今天的日 → -1
    /// - 日相同不修正
    pub fn months_left(expiry: Option<NaiveDate>, today: NaiveDate) -> Option<i32> {
        let d = expiry?;
        let mut months =
            (d.year() - today.year()) * 12 + (d.month() as i32 - today.month() as i32);

        if d >= today && d.day() > today.day() {
            months += 1;
        } else if d < today && d.day() < today.day() {
            months -= 1;
        }
        Some(months)
    }

    /// 由解析日期和计算基准得出到期日
    ///
    /// 加年按日历年计算，2月29日落到非闰年时取2月28日
    pub fn expiry_date(parsed: Option<NaiveDate>, basis: ExpiryBasis) -> Option<NaiveDate> {
        let d = parsed?;
        match basis {
            ExpiryBasis::DirectExpiry => Some(d),
            ExpiryBasis::YearsAfter(years) => d.checked_add_months(Months::new(years * 12)),
        }
    }

    /// LEED 体系版本 → 有效年数
    pub fn years_for_leed_version(version: Option<&str>) -> u32 {
        match version.map(|v| v.trim().to_lowercase()) {
            Some(v) if v == LEED_LEGACY_VERSION => LEED_LEGACY_YEARS,
            _ => LEED_DEFAULT_YEARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_day_is_zero() {
        let t = ymd(2024, 3, 15);
        assert_eq!(HorizonCalculator::months_left(Some(t), t), Some(0));
    }

    #[test]
    fn test_absent_expiry_is_absent() {
        assert_eq!(HorizonCalculator::months_left(None, ymd(2024, 3, 15)), None);
    }

    #[test]
    fn test_future_rounds_up_on_later_day() {
        // 2024-03-15 → 2024-09-20: 基础 6, 日 20 > 15 → 7
        let months = HorizonCalculator::months_left(Some(ymd(2024, 9, 20)), ymd(2024, 3, 15));
        assert_eq!(months, Some(7));
    }

    #[test]
    fn test_past_rounds_down_on_earlier_day() {
        // 2024-03-15 → 2023-03-10: 基础 -12, 日 10 < 15 → -13
        let months = HorizonCalculator::months_left(Some(ymd(2023, 3, 10)), ymd(2024, 3, 15));
        assert_eq!(months, Some(-13));
    }

    #[test]
    fn test_no_correction_on_same_day_of_month() {
        let t = ymd(2024, 3, 15);
        assert_eq!(HorizonCalculator::months_left(Some(ymd(2024, 4, 15)), t), Some(1));
        assert_eq!(HorizonCalculator::months_left(Some(ymd(2024, 2, 15)), t), Some(-1));
    }

    #[test]
    fn test_within_current_month() {
        let t = ymd(2024, 3, 15);
        // 本月稍后 → 1
        assert_eq!(HorizonCalculator::months_left(Some(ymd(2024, 3, 20)), t), Some(1));
        // 本月稍早 → -1
        assert_eq!(HorizonCalculator::months_left(Some(ymd(2024, 3, 10)), t), Some(-1));
        // 下月 1 日 → 1（日较小不修正）
        assert_eq!(HorizonCalculator::months_left(Some(ymd(2024, 4, 1)), t), Some(1));
    }

    #[test]
    fn test_sign_matches_date_order() {
        let today = ymd(2024, 3, 15);
        let mut d = ymd(2021, 1, 1);
        while d < ymd(2027, 12, 31) {
            let m = HorizonCalculator::months_left(Some(d), today).unwrap();
            if d >= today {
                assert!(m >= 0, "{} → {}", d, m);
            } else {
                assert!(m < 0, "{} → {}", d, m);
            }
            d = d.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_expiry_date_basis() {
        let cert = Some(ymd(2020, 2, 29));
        assert_eq!(
            HorizonCalculator::expiry_date(cert, ExpiryBasis::DirectExpiry),
            cert
        );
        assert_eq!(
            HorizonCalculator::expiry_date(cert, ExpiryBasis::YearsAfter(3)),
            Some(ymd(2023, 2, 28))
        );
        assert_eq!(
            HorizonCalculator::expiry_date(cert, ExpiryBasis::YearsAfter(5)),
            Some(ymd(2025, 2, 28))
        );
        assert_eq!(HorizonCalculator::expiry_date(None, ExpiryBasis::YearsAfter(3)), None);
    }

    #[test]
    fn test_years_for_leed_version() {
        assert_eq!(HorizonCalculator::years_for_leed_version(Some("v2009")), 5);
        assert_eq!(HorizonCalculator::years_for_leed_version(Some(" V2009 ")), 5);
        assert_eq!(HorizonCalculator::years_for_leed_version(Some("v4.1")), 3);
        assert_eq!(HorizonCalculator::years_for_leed_version(Some("v4")), 3);
        assert_eq!(HorizonCalculator::years_for_leed_version(Some("2009")), 3);
        assert_eq!(HorizonCalculator::years_for_leed_version(None), 3);
    }
}
