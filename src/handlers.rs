pub mod calculators;
pub mod websocket;

pub use calculators::{
    darkmoon_calc, drives_calc, month_calc, power_calc, resolution_calc, time_calc,
    usable_space_calc,
};
pub use websocket::ws_handler;
