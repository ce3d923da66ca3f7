use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Collection, Database,
};

use crate::{error::StoreError, models::AlertThreshold, services::traits::ThresholdStore};

/// Threshold records kept in a MongoDB collection, one document per
/// creation call.
#[derive(Clone)]
pub struct MongoThresholdStore {
    db: Database,
    collection: String,
}

impl MongoThresholdStore {
    pub fn new(db: Database, collection: impl Into<String>) -> Self {
        Self {
            db,
            collection: collection.into(),
        }
    }

    fn thresholds(&self) -> Collection<AlertThreshold> {
        self.db.collection::<AlertThreshold>(&self.collection)
    }
}

#[async_trait]
impl ThresholdStore for MongoThresholdStore {
    async fn create(&self, threshold: &AlertThreshold) -> Result<String, StoreError> {
        // the store owns id generation and the creation timestamp
        let id = ObjectId::new();
        let record = AlertThreshold {
            id: Some(id),
            created_at: Some(Utc::now().timestamp()),
            ..threshold.clone()
        };

        self.thresholds().insert_one(&record, None).await?;

        tracing::info!(id = %id.to_hex(), symbol = %record.crypto_symbol, "threshold saved");
        Ok(id.to_hex())
    }

    async fn get_all(&self) -> Result<Vec<AlertThreshold>, StoreError> {
        let find_opts = FindOptions::builder()
            .sort(doc! { "crypto_symbol": 1, "email": 1 })
            .build();

        let mut cursor = self.thresholds().find(None, find_opts).await?;

        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        tracing::info!(count = items.len(), "thresholds loaded");
        Ok(items)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
