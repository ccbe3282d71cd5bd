use tracing::info;

use crate::application::{AppError, AppResult, PriceProvider, WatchStore};
use crate::domain::{Decision, TargetPrice, TriggerPolicy, Watch};

#[derive(Clone, Debug, PartialEq)]
pub enum RegistrationOutcome {
    Registered(Watch),
    /// The price is already below target; nothing was stored.
    AlreadySatisfied {
        collection: String,
        current_price: f64,
        target_price: TargetPrice,
    },
}

pub struct RegisterUseCase<'a> {
    pub store: &'a dyn WatchStore,
    pub provider: &'a dyn PriceProvider,
    pub policy: TriggerPolicy,
}

impl<'a> RegisterUseCase<'a> {
    pub async fn execute(
        &self,
        owner_id: &str,
        collection: &str,
        target_price_text: &str,
    ) -> AppResult<RegistrationOutcome> {
        let collection = collection.trim();
        if collection.is_empty() {
            return Err(AppError::InvalidArgument("collection must not be empty".into()));
        }
        let target_price = TargetPrice::parse(target_price_text)?;

        // no speculative registration against an unknown price
        let current_price = self.provider.floor_price(collection).await?;

        if self.policy.decide(current_price, target_price.value()) == Decision::Trigger {
            info!(
                owner_id,
                collection,
                current_price,
                target_price = target_price.value(),
                "registration rejected: already below target"
            );
            return Ok(RegistrationOutcome::AlreadySatisfied {
                collection: collection.to_string(),
                current_price,
                target_price,
            });
        }

        let watch = Watch::new(owner_id, collection, target_price);
        self.store.add(watch.clone()).await?;
        info!(
            owner_id,
            collection,
            current_price,
            target_price = target_price.value(),
            "watch registered"
        );
        Ok(RegistrationOutcome::Registered(watch))
    }
}
