use crate::{
    error::{CreateError, ValidationError},
    models::{AlertThreshold, Direction, Period},
    services::traits::ThresholdStore,
};

/// Checks a threshold record; the first violated rule wins.
pub fn validate(threshold: &AlertThreshold) -> Result<(), ValidationError> {
    if threshold.email.trim().is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if threshold.crypto_symbol.trim().is_empty() {
        return Err(ValidationError::MissingSymbol);
    }

    for period in Period::ALL {
        for direction in [Direction::Up, Direction::Down] {
            let bound = threshold.percent_bound(period, direction);
            if !bound.enabled {
                continue;
            }
            let Some(value) = bound.value else {
                return Err(ValidationError::MissingPercent { period, direction });
            };
            if direction == Direction::Down && value >= 0.0 {
                return Err(ValidationError::NonNegativeLowerBound(period));
            }
        }
    }

    for direction in [Direction::Up, Direction::Down] {
        let bound = threshold.target_bound(direction);
        if !bound.enabled {
            continue;
        }
        match bound.value {
            None => return Err(ValidationError::MissingTargetPrice(direction)),
            Some(price) if price <= 0.0 => return Err(ValidationError::NonPositiveTargetPrice(direction)),
            Some(_) => {}
        }
    }

    Ok(())
}

/// Validates and persists a new threshold. Returns the stored id.
pub async fn create_threshold(
    store: &dyn ThresholdStore,
    mut threshold: AlertThreshold,
) -> Result<String, CreateError> {
    validate(&threshold)?;

    threshold.email = threshold.email.trim().to_string();
    threshold.crypto_symbol = threshold.crypto_symbol.trim().to_uppercase();
    threshold.id = None;

    let id = store.create(&threshold).await?;
    Ok(id)
}
