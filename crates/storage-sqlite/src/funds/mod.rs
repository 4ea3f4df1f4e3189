pub mod model;
pub mod repository;

pub use model::{FundDB, NewFundDB};
pub use repository::FundRepository;
