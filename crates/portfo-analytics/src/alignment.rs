//! 시계열 정렬 및 정규화.
//!
//! 서로 다른 거래일 달력을 가진 여러 가격 시계열을 하나의 공통 달력 위에 올립니다.
//!
//! # 알고리즘
//!
//! 1. 모든 시계열 날짜의 합집합을 시간순으로 정렬해 공통 달력을 만듭니다.
//! 2. 각 자산을 공통 달력에 재색인합니다.
//!    - 해당 날짜에 관측값이 있으면 그대로 사용
//!    - 없으면 직전 관측값 (forward-fill)
//!    - 첫 관측일 이전 날짜는 가장 이른 관측값 (backward-fill)
//! 3. 관측값이 없는 자산은 프레임에서 제외합니다 (정렬 문제가 아니라 조회 실패).
//!
//! 정렬된 각 열은 [`AlignedFrame::rebased`]로 첫 값이 1.0이 되도록 재기준화합니다.
//!
//! ```text
//! 날짜      A      B            A      B
//! 01-02   100     -     →     100    50   (B: backward-fill)
//! 01-03   110    50     →     110    50
//! 01-04     -    45     →     110    45   (A: forward-fill)
//! ```

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use portfo_core::{PortfoError, PortfoResult, PriceSeries, PricePoint};

/// 공통 달력에 정렬된 자산 열 하나.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedColumn {
    /// 자산 식별자 (조회에 사용된 심볼)
    pub asset: String,
    /// 공통 달력과 같은 길이의 값
    pub values: Vec<f64>,
}

/// 공통 달력을 공유하는 자산 열 모음.
///
/// 모든 열의 길이는 `dates`와 같습니다. 열 순서는 입력 순서를 따릅니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<AlignedColumn>,
}

impl AlignedFrame {
    /// 여러 시계열을 공통 달력에 정렬합니다.
    ///
    /// 비어 있는 시계열과 같은 심볼의 중복 시계열(두 번째 이후)은 제외됩니다.
    /// 공통 달력이 비면 [`PortfoError::NoOverlappingData`]를 반환합니다.
    pub fn align(series: &[PriceSeries]) -> PortfoResult<Self> {
        let mut seen = HashSet::new();
        let usable: Vec<&PriceSeries> = series
            .iter()
            .filter(|s| {
                if s.is_empty() {
                    debug!(asset = s.symbol(), "관측값 없음, 정렬에서 제외");
                    return false;
                }
                seen.insert(s.symbol().to_string())
            })
            .collect();

        let calendar: BTreeSet<NaiveDate> = usable.iter().flat_map(|s| s.dates()).collect();
        if calendar.is_empty() {
            return Err(PortfoError::NoOverlappingData);
        }
        let dates: Vec<NaiveDate> = calendar.into_iter().collect();

        let columns = usable
            .iter()
            .map(|s| AlignedColumn {
                asset: s.symbol().to_string(),
                values: reindex(s.points(), &dates),
            })
            .collect();

        Ok(Self { dates, columns })
    }

    /// 공통 달력.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[AlignedColumn] {
        &self.columns
    }

    /// 자산 식별자 목록 (열 순서).
    pub fn assets(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.asset.clone()).collect()
    }

    /// 자산 하나의 값.
    pub fn column(&self, asset: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.asset == asset)
            .map(|c| c.values.as_slice())
    }

    /// 공통 달력 길이.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// 자산 수.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// 모든 열을 첫 값으로 나눈 프레임 (`value[0] == 1.0`).
    pub fn rebased(&self) -> Self {
        Self {
            dates: self.dates.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| AlignedColumn {
                    asset: c.asset.clone(),
                    values: rebase(&c.values),
                })
                .collect(),
        }
    }

    /// 열 하나를 (날짜, 값) 목록으로 꺼냅니다.
    pub fn points(&self, asset: &str) -> Option<Vec<PricePoint>> {
        self.column(asset).map(|values| zip_points(&self.dates, values))
    }
}

/// 공통 달력에 관측값을 재색인합니다.
///
/// `points`는 날짜가 엄격히 증가하고 비어 있지 않아야 합니다.
fn reindex(points: &[PricePoint], calendar: &[NaiveDate]) -> Vec<f64> {
    let earliest = points.first().map(|p| p.value).unwrap_or(f64::NAN);
    let mut cursor = 0;
    let mut current: Option<f64> = None;

    calendar
        .iter()
        .map(|date| {
            while cursor < points.len() && points[cursor].date <= *date {
                current = Some(points[cursor].value);
                cursor += 1;
            }
            current.unwrap_or(earliest)
        })
        .collect()
}

/// 첫 값이 1.0이 되도록 나눕니다. 빈 입력은 빈 결과.
pub fn rebase(values: &[f64]) -> Vec<f64> {
    match values.first() {
        Some(&base) => values.iter().map(|v| v / base).collect(),
        None => Vec::new(),
    }
}

/// 날짜와 값을 묶습니다.
pub fn zip_points(dates: &[NaiveDate], values: &[f64]) -> Vec<PricePoint> {
    dates
        .iter()
        .zip(values)
        .map(|(date, value)| PricePoint::new(*date, *value))
        .collect()
}
