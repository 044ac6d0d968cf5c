// # Preference Store Implementations
//
// This module provides implementations of the PreferenceStore trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{FilePreferenceStore, FilePreferenceStoreFactory};
pub use memory::{MemoryPreferenceStore, MemoryPreferenceStoreFactory};
