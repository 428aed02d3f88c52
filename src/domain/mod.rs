pub mod transaction;
pub mod transition;

pub use transaction::{Actor, ParseStatusError, Transaction, TransactionLog, TransactionStatus};
pub use transition::IllegalTransition;
