use crate::calc::CalcError;
use serde::Serialize;
use std::cmp::Ordering;

const GB: f64 = 1e9;
const TB: f64 = 1e12;
const GIB: f64 = 1_073_741_824.0;
const TIB: f64 = 1_099_511_627_776.0;

#[derive(Debug, Clone, Serialize)]
pub struct DrivePrice {
    pub tb: f64,
    pub price: f64,
    pub price_per_tb: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriveReport {
    pub results: Vec<DrivePrice>,
    pub cheapest: DrivePrice,
}

/// 1行1ドライブの "TB:PRICE" リストからTB単価と最安ドライブを求める
pub fn drive_price_calc(raw: &str) -> Result<DriveReport, CalcError> {
    let mut results = Vec::new();
    for line in raw.trim().lines() {
        let (tb, price) = line.split_once(':').ok_or(CalcError::DriveFormat)?;
        let tb: f64 = tb.trim().parse().map_err(|_| CalcError::DriveFormat)?;
        let price: f64 = price.trim().parse().map_err(|_| CalcError::DriveFormat)?;
        if tb <= 0.0 || price < 0.0 {
            return Err(CalcError::DriveFormat);
        }
        results.push(DrivePrice {
            tb,
            price,
            price_per_tb: price / tb,
        });
    }

    let cheapest = results
        .iter()
        .min_by(|a, b| {
            a.price_per_tb
                .partial_cmp(&b.price_per_tb)
                .unwrap_or(Ordering::Equal)
        })
        .cloned()
        .ok_or(CalcError::DriveFormat)?;

    Ok(DriveReport { results, cheapest })
}

#[derive(Debug, Clone, Serialize)]
pub struct UsableSpace {
    pub total_bytes: f64,
    pub formatted_bytes: f64,
    pub reserved_bytes: f64,
    pub usable_bytes: f64,
    pub usable_decimal_gb: f64,
    pub usable_decimal_tb: f64,
    pub usable_binary_gib: f64,
    pub usable_binary_tib: f64,
    pub binary_capacity_gib: f64,
    pub binary_capacity_tib: f64,
}

/// 公称容量からフォーマットオーバーヘッドと予約領域を引いた実効容量
pub fn usable_space_calc(
    capacity_value: f64,
    capacity_unit: &str,
    overhead_percent: f64,
    reserved_gb: f64,
) -> Result<UsableSpace, CalcError> {
    let unit_bytes = match capacity_unit {
        "GB" => GB,
        "TB" => TB,
        _ => return Err(CalcError::UsableSpaceInput),
    };
    if capacity_value <= 0.0 || overhead_percent < 0.0 || reserved_gb < 0.0 {
        return Err(CalcError::UsableSpaceInput);
    }

    let total_bytes = capacity_value * unit_bytes;
    let formatted_bytes = total_bytes * (1.0 - overhead_percent / 100.0);
    let reserved_bytes = reserved_gb * GB;
    let usable_bytes = (formatted_bytes - reserved_bytes).max(0.0);

    Ok(UsableSpace {
        total_bytes,
        formatted_bytes,
        reserved_bytes,
        usable_bytes,
        usable_decimal_gb: usable_bytes / GB,
        usable_decimal_tb: usable_bytes / TB,
        usable_binary_gib: usable_bytes / GIB,
        usable_binary_tib: usable_bytes / TIB,
        binary_capacity_gib: total_bytes / GIB,
        binary_capacity_tib: total_bytes / TIB,
    })
}
