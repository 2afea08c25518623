//! 일별 가격 시계열.
//!
//! [`PriceSeries`]는 생성 시점에 불변식을 검사합니다:
//! - 날짜는 엄격하게 증가
//! - 모든 값은 유한한 양수
//!
//! 시세 제공자는 정렬/중복이 보장되지 않는 원시 데이터를
//! [`PriceSeries::from_observations`]로 정리해서 넘깁니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 시계열 불변식 위반.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SeriesError {
    /// 날짜가 증가하지 않음
    #[error("dates must be strictly increasing ({prev} followed by {next})")]
    NotIncreasing { prev: NaiveDate, next: NaiveDate },

    /// 유효하지 않은 가격
    #[error("invalid price {value} on {date}")]
    InvalidPrice { date: NaiveDate, value: f64 },
}

/// 하루치 관측값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// 거래일
    pub date: NaiveDate,
    /// 가격 (또는 정규화된 값)
    pub value: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// 자산 하나의 일별 가격 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    currency: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// 검증된 시계열을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        currency: impl Into<String>,
        points: Vec<PricePoint>,
    ) -> Result<Self, SeriesError> {
        for point in &points {
            if !point.value.is_finite() || point.value <= 0.0 {
                return Err(SeriesError::InvalidPrice {
                    date: point.date,
                    value: point.value,
                });
            }
        }
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NotIncreasing {
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            currency: currency.into(),
            points,
        })
    }

    /// 원시 관측값에서 시계열을 만듭니다.
    ///
    /// 날짜순으로 정렬하고, 같은 날짜는 마지막 관측값을 유지하며,
    /// 유한한 양수가 아닌 값은 버립니다.
    pub fn from_observations<I>(
        symbol: impl Into<String>,
        currency: impl Into<String>,
        observations: I,
    ) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let by_date: BTreeMap<NaiveDate, f64> = observations
            .into_iter()
            .filter(|(_, value)| value.is_finite() && *value > 0.0)
            .collect();

        Self {
            symbol: symbol.into(),
            currency: currency.into(),
            points: by_date
                .into_iter()
                .map(|(date, value)| PricePoint::new(date, value))
                .collect(),
        }
    }

    /// 자산 식별자 (제공자가 실제로 사용한 심볼).
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 가격 통화 코드.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// 첫 거래일.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.first().map(|p| p.date)
    }

    /// 날짜 목록.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    /// 값 목록.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// 모든 값에 같은 배수를 곱하고 통화 코드를 바꾼 새 시계열.
    ///
    /// 배수가 유한한 양수가 아니면 [`SeriesError::InvalidPrice`]를 반환합니다.
    pub fn scaled(&self, factor: f64, currency: impl Into<String>) -> Result<Self, SeriesError> {
        let points = self
            .points
            .iter()
            .map(|p| PricePoint::new(p.date, p.value * factor))
            .collect();
        Self::new(self.symbol.clone(), currency, points)
    }

    /// 심볼만 바꾼 시계열.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }
}
