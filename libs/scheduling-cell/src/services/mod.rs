pub mod availability;
pub mod calendar;
pub mod interval;
pub mod scheduling;
pub mod slot_status;
pub mod store;
pub mod time_grid;
pub mod waiting_list;

pub use scheduling::SchedulingService;
pub use store::ScheduleStore;
