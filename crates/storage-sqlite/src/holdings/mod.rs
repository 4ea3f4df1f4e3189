pub mod model;
pub mod repository;

pub use model::{AssetAllocationDB, FundHoldingDB};
pub use repository::HoldingsRepository;
