//! 티커 정규화.
//!
//! - 대문자 변환 + 공백 제거
//! - `^`로 시작하는 지수 심볼은 그대로 사용
//! - 지수 별칭: `SP500`/`GSPC` → `^GSPC`, `NASDAQ`/`IXIC` → `^IXIC`, `DOW`/`DJI` → `^DJI`
//! - `.TO` 접미사가 없는 일반 종목은 조회 결과가 비었을 때 `.TO`를 붙여 한 번 더 시도

/// TSX 거래소 접미사.
pub const TSX_SUFFIX: &str = ".TO";

/// 지수 별칭 테이블 (별칭, Yahoo 심볼).
pub const INDEX_ALIASES: [(&str, &str); 6] = [
    ("SP500", "^GSPC"),
    ("NASDAQ", "^IXIC"),
    ("DOW", "^DJI"),
    ("GSPC", "^GSPC"),
    ("IXIC", "^IXIC"),
    ("DJI", "^DJI"),
];

/// 지수 별칭을 Yahoo 심볼로 바꿉니다. 별칭이 아니면 `None`.
pub fn resolve_index(name: &str) -> Option<&'static str> {
    let key = name.trim().to_uppercase();
    INDEX_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, symbol)| *symbol)
}

/// 조회용 심볼로 정규화합니다.
pub fn normalize_ticker(ticker: &str) -> String {
    let ticker = ticker.trim().to_uppercase();
    if ticker.starts_with('^') {
        return ticker;
    }
    match resolve_index(&ticker) {
        Some(symbol) => symbol.to_string(),
        None => ticker,
    }
}

/// 조회를 시도할 심볼 후보 (순서대로).
///
/// 지수나 이미 `.TO`가 붙은 심볼은 후보가 하나뿐입니다.
pub fn ticker_candidates(ticker: &str) -> Vec<String> {
    let normalized = normalize_ticker(ticker);
    if normalized.is_empty() || normalized.starts_with('^') || normalized.contains(TSX_SUFFIX) {
        return vec![normalized];
    }
    let tsx = format!("{}{}", normalized, TSX_SUFFIX);
    vec![normalized, tsx]
}

/// 심볼에서 통화 코드 추정 (제공자가 통화를 알려주지 않을 때).
pub fn guess_currency(symbol: &str) -> &'static str {
    if symbol.ends_with(TSX_SUFFIX) || symbol.ends_with(".V") {
        "CAD"
    } else if symbol.ends_with(".L") {
        "GBP"
    } else {
        "USD"
    }
}
