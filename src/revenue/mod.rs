pub mod release_engine;
pub mod settlement_book;

pub use release_engine::attendance_rate;
pub use settlement_book::SettlementBook;
