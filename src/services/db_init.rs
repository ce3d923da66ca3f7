use mongodb::{bson::doc, Database, IndexModel};

use crate::error::StoreError;

pub async fn ensure_indexes(db: &Database, thresholds_collection: &str) -> Result<(), StoreError> {
    // thresholds: full scans sort by (symbol, email). Not unique: a user may
    // register the same pair more than once.
    let col = db.collection::<mongodb::bson::Document>(thresholds_collection);
    let model = IndexModel::builder()
        .keys(doc! { "crypto_symbol": 1, "email": 1 })
        .build();

    col.create_index(model, None).await?;

    Ok(())
}
