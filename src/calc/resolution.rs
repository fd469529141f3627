use crate::calc::CalcError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ScaledResolution {
    pub scale: f64,
    pub w: i64,
    pub h: i64,
}

/// カンマ区切りの倍率リストをパースする
pub fn parse_scales(raw: &str) -> Result<Vec<f64>, CalcError> {
    raw.split(',')
        .map(|s| s.trim().parse::<f64>().map_err(|_| CalcError::InvalidScales))
        .collect()
}

/// 解像度を各倍率でスケールする（四捨五入）
pub fn resolution_convert(w: i64, h: i64, scales: &[f64]) -> Vec<ScaledResolution> {
    scales
        .iter()
        .map(|&scale| ScaledResolution {
            scale,
            w: (w as f64 * scale).round() as i64,
            h: (h as f64 * scale).round() as i64,
        })
        .collect()
}
