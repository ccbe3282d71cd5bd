use serde::{Deserialize, Serialize};

use super::TargetPrice;

/// One pending notification request. The store holds at most one per owner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub owner_id: String,
    pub collection: String,
    pub target_price: TargetPrice,
}

impl Watch {
    pub fn new(
        owner_id: impl Into<String>,
        collection: impl Into<String>,
        target_price: TargetPrice,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            collection: collection.into(),
            target_price,
        }
    }
}
