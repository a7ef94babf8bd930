mod engine;
mod store;
mod types;

pub use engine::compute;
pub use store::{
    InMemoryRecordStore, ProfileUpdate, Record, RecordId, RecordStore, StoreError, UpdateError,
};
pub use types::{Allocation, Category, LongTermGoal, RiskTolerance, ShortTermGoal, UserProfile};
