pub mod clock;
pub mod market;

pub use clock::{Clock, ManualClock, SystemClock};
pub use market::{GoldPriceProvider, MarketError};
