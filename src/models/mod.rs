pub mod contract;
pub mod dividends;
pub mod gbm;

pub use contract::OptionContract;
pub use dividends::{Dividend, DividendKind, DividendSchedule, ScheduledStep};
pub use gbm::Gbm;
