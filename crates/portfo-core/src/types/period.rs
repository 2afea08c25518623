//! 분석 기간 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 분석 기간.
///
/// 1년, 5년, 10년의 세 구간만 지원합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    /// 1년
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    /// 5년
    #[serde(rename = "5y")]
    FiveYears,
    /// 10년
    #[serde(rename = "10y")]
    TenYears,
}

impl Period {
    /// 연 단위 길이.
    pub fn years(&self) -> u32 {
        match self {
            Period::OneYear => 1,
            Period::FiveYears => 5,
            Period::TenYears => 10,
        }
    }

    /// 달력 기준 일수 (365 × 연수).
    pub fn days(&self) -> i64 {
        365 * i64::from(self.years())
    }

    /// 시세 제공자 range 파라미터 문자열.
    pub fn as_range(&self) -> &'static str {
        match self {
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
        }
    }

    /// 연수에서 기간을 찾습니다.
    pub fn from_years(years: u32) -> Option<Self> {
        match years {
            1 => Some(Period::OneYear),
            5 => Some(Period::FiveYears),
            10 => Some(Period::TenYears),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1y" => Ok(Period::OneYear),
            "5y" => Ok(Period::FiveYears),
            "10y" => Ok(Period::TenYears),
            _ => Err(format!("Period must be 1y, 5y, or 10y, but got {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_days() {
        assert_eq!(Period::OneYear.days(), 365);
        assert_eq!(Period::FiveYears.days(), 1825);
        assert_eq!(Period::TenYears.years(), 10);
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("5Y".parse::<Period>().unwrap(), Period::FiveYears);
        assert!("3y".parse::<Period>().is_err());
        assert_eq!(Period::from_years(10), Some(Period::TenYears));
        assert_eq!(Period::from_years(2), None);
    }

    #[test]
    fn test_period_serde() {
        assert_eq!(serde_json::to_string(&Period::TenYears).unwrap(), "\"10y\"");
        let parsed: Period = serde_json::from_str("\"5y\"").unwrap();
        assert_eq!(parsed, Period::FiveYears);
    }
}
