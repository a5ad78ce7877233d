pub mod series;

pub use series::{PriceBar, Series};
