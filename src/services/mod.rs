pub mod income_service;

pub use income_service::IncomeService;
