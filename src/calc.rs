pub mod darkmoon;
pub mod power;
pub mod resolution;
pub mod storage;
pub mod time;

use thiserror::Error;

// 計算機の入力検証エラー。HTTP 400として返される
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Unknown time unit: {0}")]
    UnknownUnit(String),
    #[error("Invalid date or time format.")]
    InvalidDate,
    #[error("Enter comma-separated numeric scale factors (e.g. 1.5,2).")]
    InvalidScales,
    #[error("Invalid format. Use one drive per line: TB:PRICE (e.g. 8:160)")]
    DriveFormat,
    #[error("Enter valid positive numbers for capacity, overhead, and reserved space.")]
    UsableSpaceInput,
    #[error("Enter valid numbers for wattage, daily hours, and price per kWh.")]
    PowerInput,
    #[error("Unknown deck: {0}")]
    UnknownDeck(String),
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),
    #[error("Draw at least one card.")]
    NoCards,
}
