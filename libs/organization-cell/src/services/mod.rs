pub mod catalog;
pub mod exceptions;
pub mod hours;
pub mod slot_config;

pub use catalog::CatalogService;
pub use exceptions::ExceptionService;
pub use hours::HoursService;
pub use slot_config::SlotConfigService;
