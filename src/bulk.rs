//! Bulk operations - response types and per-item orchestration
//!
//! Bulk create/update process every item on its own: a failing item is
//! recorded with its input position and never stops the items after it.
//! Bulk delete only reports how many documents were removed.

use crate::core::AppError;
use crate::dtos::decode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};
use validator::Validate;

/// An input item that could not be processed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkFailure {
    /// Position of the item in the request
    pub index: usize,
    /// The payload as it was received
    pub item: Value,
    pub error: AppError,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkItems<T> {
    pub success: Vec<T>,
    pub fail: Vec<BulkFailure>,
}

/// Per-item outcome of a bulk create or update.
/// `success` is true only when every item succeeded.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BulkItemizedResponse<T> {
    pub success: bool,
    pub items: BulkItems<T>,
}

impl<T> BulkItemizedResponse<T> {
    /// Number of item outcomes, always equal to the number of inputs
    pub fn len(&self) -> usize {
        self.items.success.len() + self.items.fail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregate outcome of a bulk delete
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkCountedResponse {
    pub success: bool,
    pub count: u64,
}

impl BulkCountedResponse {
    pub fn counted(count: u64) -> Self {
        Self {
            success: true,
            count,
        }
    }
}

/// Runs `op` on each item in input order and collects the outcomes.
/// Successes and failures each keep the relative order of their inputs.
pub async fn itemized<I, T, F, Fut>(items: Vec<I>, mut op: F) -> BulkItemizedResponse<T>
where
    I: Serialize,
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let total = items.len();
    let mut success = Vec::with_capacity(total);
    let mut fail = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        let raw = serde_json::to_value(&item).unwrap_or(Value::Null);
        match op(item).await {
            Ok(result) => success.push(result),
            Err(error) => {
                warn!(index, error = %error, "Bulk item failed");
                fail.push(BulkFailure {
                    index,
                    item: raw,
                    error,
                });
            }
        }
    }

    debug!("Bulk operation done: {} ok, {} failed", success.len(), fail.len());
    BulkItemizedResponse {
        success: fail.is_empty(),
        items: BulkItems { success, fail },
    }
}

/// Raw bulk payload split into decoded items and items rejected by decoding.
/// Rejected items are failures at their input position; decoded ones go on
/// to the repository and [`Decoded::finish`] maps its outcome back.
pub struct Decoded<T> {
    pub items: Vec<T>,
    accepted: Vec<(usize, Value)>,
    rejected: Vec<BulkFailure>,
}

impl<T: DeserializeOwned + Validate> Decoded<T> {
    pub fn decode_each(raw: Vec<Value>) -> Self {
        let mut items = Vec::with_capacity(raw.len());
        let mut accepted = Vec::with_capacity(raw.len());
        let mut rejected = Vec::new();

        for (index, item) in raw.into_iter().enumerate() {
            match decode::<T>(item.clone()) {
                Ok(dto) => {
                    items.push(dto);
                    accepted.push((index, item));
                }
                Err(error) => {
                    warn!(index, error = %error, "Bulk item rejected");
                    rejected.push(BulkFailure { index, item, error });
                }
            }
        }

        Self {
            items,
            accepted,
            rejected,
        }
    }
}

impl<T> Decoded<T> {
    /// Merges the outcome for the decoded items with the rejected ones.
    /// Failure indexes and payloads refer to the original request.
    pub fn finish<E>(self, response: BulkItemizedResponse<E>) -> BulkItemizedResponse<E> {
        let BulkItems { success, fail } = response.items;
        let mut accepted = self.accepted;

        let mut fail: Vec<BulkFailure> = fail
            .into_iter()
            .map(|failure| {
                let (index, item) = std::mem::take(&mut accepted[failure.index]);
                BulkFailure {
                    index,
                    item,
                    error: failure.error,
                }
            })
            .chain(self.rejected)
            .collect();
        fail.sort_by_key(|failure| failure.index);

        BulkItemizedResponse {
            success: fail.is_empty(),
            items: BulkItems { success, fail },
        }
    }
}
