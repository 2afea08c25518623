//! 보고 통화 정의.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 보고 통화.
///
/// 기준 통화(USD)와 대체 통화(CAD) 두 가지만 지원합니다.
/// 자산의 원래 통화는 [`crate::PriceSeries::currency`]에 문자열로 보관되며
/// 이 열거형 밖의 값일 수 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// 미국 달러 (기준 통화)
    #[default]
    Usd,
    /// 캐나다 달러
    Cad,
}

impl Currency {
    /// 지원하는 모든 통화.
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Cad];

    /// ISO 4217 코드.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cad => "CAD",
        }
    }

    /// 통화 코드 문자열이 이 통화를 가리키는지 확인합니다.
    pub fn matches(&self, code: &str) -> bool {
        code.trim().eq_ignore_ascii_case(self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "CAD" => Ok(Currency::Cad),
            _ => Err(format!("Unsupported currency: {} (expected USD or CAD)", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" CAD ".parse::<Currency>().unwrap(), Currency::Cad);
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_currency_serde() {
        assert_eq!(serde_json::to_string(&Currency::Cad).unwrap(), "\"CAD\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
        assert!(serde_json::from_str::<Currency>("\"JPY\"").is_err());
    }

    #[test]
    fn test_currency_matches() {
        assert!(Currency::Usd.matches("usd"));
        assert!(!Currency::Usd.matches("CAD"));
    }
}
