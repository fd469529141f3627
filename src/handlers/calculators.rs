use crate::calc::{darkmoon, power, resolution, storage, time, CalcError};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn bad_request(error: CalcError) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorBody {
        error: error.to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub struct TimeForm {
    pub value: f64,
    pub unit: String,
}

/// POST /time - 時間単位換算
pub async fn time_calc(form: web::Form<TimeForm>) -> impl Responder {
    match time::time_convert(form.value, &form.unit) {
        Ok(results) => HttpResponse::Ok().json(serde_json::json!({ "results": results })),
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthForm {
    pub start_date: String,
    pub end_date: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// POST /month - 2日付間の経過時間
pub async fn month_calc(form: web::Form<MonthForm>) -> impl Responder {
    let show_start_time = form.start_time.as_deref().is_some_and(|t| !t.is_empty());
    let show_end_time = form.end_time.as_deref().is_some_and(|t| !t.is_empty());

    let start = match time::parse_stamp(&form.start_date, form.start_time.as_deref()) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let end = match time::parse_stamp(&form.end_date, form.end_time.as_deref()) {
        Ok(e) => e,
        Err(e) => return bad_request(e),
    };

    let results = time::elapsed_breakdown(start, end);
    let range_text = time::format_range(start, end, show_start_time, show_end_time);
    HttpResponse::Ok().json(serde_json::json!({
        "results": results,
        "range_text": range_text,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ResolutionForm {
    pub width: i64,
    pub height: i64,
    pub scales: String,
}

/// POST /resolution - 解像度スケール換算
pub async fn resolution_calc(form: web::Form<ResolutionForm>) -> impl Responder {
    match resolution::parse_scales(&form.scales) {
        Ok(scales) => {
            let results = resolution::resolution_convert(form.width, form.height, &scales);
            HttpResponse::Ok().json(serde_json::json!({ "results": results }))
        }
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DrivesForm {
    pub drives: String,
}

/// POST /drives - ドライブTB単価比較
pub async fn drives_calc(form: web::Form<DrivesForm>) -> impl Responder {
    match storage::drive_price_calc(&form.drives) {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct UsableSpaceForm {
    pub capacity_value: f64,
    pub capacity_unit: String,
    pub overhead_percent: f64,
    pub reserved_gb: f64,
}

/// POST /usable-space - 実効容量計算
pub async fn usable_space_calc(form: web::Form<UsableSpaceForm>) -> impl Responder {
    match storage::usable_space_calc(
        form.capacity_value,
        &form.capacity_unit,
        form.overhead_percent,
        form.reserved_gb,
    ) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct PowerForm {
    pub watts: f64,
    pub hours_per_day: f64,
    pub price_per_kwh: f64,
}

/// POST /power - 電気代計算
pub async fn power_calc(form: web::Form<PowerForm>) -> impl Responder {
    match power::power_cost_calc(form.watts, form.hours_per_day, form.price_per_kwh) {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => bad_request(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct DarkmoonForm {
    pub cards: usize,
    pub deck: String,
    pub difficulty: String,
}

/// POST /darkmoon - ダークムーン運勢占い
pub async fn darkmoon_calc(form: web::Form<DarkmoonForm>) -> impl Responder {
    match darkmoon::luck_reading(form.cards, &form.deck, &form.difficulty) {
        Ok(reading) => HttpResponse::Ok().json(reading),
        Err(e) => bad_request(e),
    }
}
