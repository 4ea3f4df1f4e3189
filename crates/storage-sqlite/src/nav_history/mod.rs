pub mod model;
pub mod repository;

pub use model::NavHistoryDB;
pub use repository::NavHistoryRepository;
