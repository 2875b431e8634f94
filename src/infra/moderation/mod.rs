pub mod json_warning_store;

pub use json_warning_store::JsonWarningStore;
