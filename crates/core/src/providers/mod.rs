//! External data providers.
//!
//! The estimation core talks to three provider boundaries, each behind an
//! async trait so tests never touch the network:
//!
//! - [`PriceProviderTrait`] - batch last-traded / previous-close prices
//! - [`FallbackEstimatorTrait`] - a third-party pre-computed NAV estimate
//! - [`DisclosureSourceTrait`] - a fund's latest disclosed holdings
//!
//! Concrete clients live in [`eastmoney`] (prices + disclosures) and
//! [`tiantian`] (fallback estimates).

pub mod eastmoney;
pub mod errors;
pub mod models;
pub mod retry;
pub mod tiantian;
pub mod traits;

pub use eastmoney::EastmoneyClient;
pub use errors::ProviderError;
pub use models::{FallbackEstimate, StockPrice};
pub use retry::with_retry;
pub use tiantian::TiantianClient;
pub use traits::{DisclosureSourceTrait, FallbackEstimatorTrait, PriceProviderTrait};
