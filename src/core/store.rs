use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::engine::compute;
use super::types::{Allocation, LongTermGoal, RiskTolerance, ShortTermGoal, UserProfile};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub profile: UserProfile,
    pub allocation: Allocation,
    pub progress: HashMap<String, f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(RecordId),
}

#[derive(Debug, Error, PartialEq)]
pub enum UpdateError {
    #[error("unknown profile field `{0}`")]
    UnknownField(String),
    #[error("`{field}` expects an integer, got `{value}`")]
    InvalidInteger { field: &'static str, value: String },
}

/// Replacement value for a single profile field.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProfileUpdate {
    Age(i64),
    Income(i64),
    Savings(i64),
    RiskTolerance(RiskTolerance),
    ShortTermGoal(ShortTermGoal),
    LongTermGoal(LongTermGoal),
}

impl ProfileUpdate {
    /// Coerces a raw `field`/`value` pair as submitted by the adjustment form.
    pub fn parse(field: &str, value: &str) -> Result<Self, UpdateError> {
        match field {
            "age" => parse_integer("age", value).map(ProfileUpdate::Age),
            "income" => parse_integer("income", value).map(ProfileUpdate::Income),
            "savings" => parse_integer("savings", value).map(ProfileUpdate::Savings),
            "risk_tolerance" => Ok(ProfileUpdate::RiskTolerance(value.into())),
            "short_term_goal" => Ok(ProfileUpdate::ShortTermGoal(value.into())),
            "long_term_goal" => Ok(ProfileUpdate::LongTermGoal(value.into())),
            other => Err(UpdateError::UnknownField(other.to_string())),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            ProfileUpdate::Age(_) => "age",
            ProfileUpdate::Income(_) => "income",
            ProfileUpdate::Savings(_) => "savings",
            ProfileUpdate::RiskTolerance(_) => "risk_tolerance",
            ProfileUpdate::ShortTermGoal(_) => "short_term_goal",
            ProfileUpdate::LongTermGoal(_) => "long_term_goal",
        }
    }

    pub fn apply(self, profile: &mut UserProfile) {
        match self {
            ProfileUpdate::Age(v) => profile.age = v,
            ProfileUpdate::Income(v) => profile.income = v,
            ProfileUpdate::Savings(v) => profile.savings = v,
            ProfileUpdate::RiskTolerance(v) => profile.risk_tolerance = v,
            ProfileUpdate::ShortTermGoal(v) => profile.short_term_goal = v,
            ProfileUpdate::LongTermGoal(v) => profile.long_term_goal = v,
        }
    }
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, UpdateError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| UpdateError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

/// Keeps the last known profile, allocation and goal progress per record.
pub trait RecordStore: Send + Sync {
    fn create(&self, profile: UserProfile) -> Record;

    fn get(&self, id: RecordId) -> Result<Record, StoreError>;

    /// Replaces one profile field and recomputes the allocation from scratch.
    fn update_profile(&self, id: RecordId, update: ProfileUpdate)
    -> Result<Allocation, StoreError>;

    fn record_progress(&self, id: RecordId, goal: &str, percent: f64) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    last_id: u64,
    records: HashMap<RecordId, Record>,
}

/// Process-lifetime store. Identifiers start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: Mutex<Inner>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every mutation below completes before the guard drops, so a poisoned
    // lock still guards a consistent map.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for InMemoryRecordStore {
    fn create(&self, profile: UserProfile) -> Record {
        let allocation = compute(&profile);
        let now = Utc::now();

        let mut inner = self.lock();
        inner.last_id += 1;
        let record = Record {
            id: RecordId(inner.last_id),
            profile,
            allocation,
            progress: HashMap::new(),
            created_at: now,
            updated_at: now,
        };
        inner.records.insert(record.id, record.clone());
        record
    }

    fn get(&self, id: RecordId) -> Result<Record, StoreError> {
        self.lock()
            .records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update_profile(
        &self,
        id: RecordId,
        update: ProfileUpdate,
    ) -> Result<Allocation, StoreError> {
        let mut inner = self.lock();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        update.apply(&mut record.profile);
        record.allocation = compute(&record.profile);
        record.updated_at = Utc::now();
        Ok(record.allocation)
    }

    fn record_progress(&self, id: RecordId, goal: &str, percent: f64) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        record.progress.insert(goal.to_string(), percent);
        record.updated_at = Utc::now();
        Ok(())
    }
}
