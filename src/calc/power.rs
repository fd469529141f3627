use crate::calc::CalcError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PowerCost {
    pub kwh_per_day: f64,
    pub kwh_per_month: f64,
    pub kwh_per_year: f64,
    pub cost_per_day: f64,
    pub cost_per_month: f64,
    pub cost_per_year: f64,
}

/// 消費電力と稼働時間から電力量と電気代を求める
/// （月=30日、年=365日。時間計算機と同じ換算）
pub fn power_cost_calc(
    watts: f64,
    hours_per_day: f64,
    price_per_kwh: f64,
) -> Result<PowerCost, CalcError> {
    if watts <= 0.0 || !(0.0..=24.0).contains(&hours_per_day) || price_per_kwh < 0.0 {
        return Err(CalcError::PowerInput);
    }

    let kwh_per_day = watts * hours_per_day / 1000.0;
    let kwh_per_month = kwh_per_day * 30.0;
    let kwh_per_year = kwh_per_day * 365.0;

    Ok(PowerCost {
        kwh_per_day,
        kwh_per_month,
        kwh_per_year,
        cost_per_day: kwh_per_day * price_per_kwh,
        cost_per_month: kwh_per_month * price_per_kwh,
        cost_per_year: kwh_per_year * price_per_kwh,
    })
}
