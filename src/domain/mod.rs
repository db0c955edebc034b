pub mod account;
pub mod balance_sheet;
pub mod chart;
pub mod error;
pub mod event;
pub mod ledger;
pub mod traits;

pub use account::{Account, AccountHandle};
pub use balance_sheet::BalanceSheet;
pub use chart::{Chart, Series};
pub use error::Error;
pub use event::{Event, EventKind};
pub use ledger::{Ledger, Share};
pub use traits::{ChartSurface, DeadLetterQueue, EventStream};
