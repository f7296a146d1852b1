pub mod store;

pub use store::InspectionSession;
