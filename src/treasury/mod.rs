pub mod escrow_book;

pub use escrow_book::{EscrowBook, EventEscrow};
