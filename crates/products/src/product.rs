use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopfront_core::{DomainError, DomainResult, Entity, ProductId, ValueObject};

/// Unit price of a product. Always finite and strictly positive.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::validation(format!(
                "price must be greater than 0 (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl ValueObject for Price {}

impl TryFrom<f64> for Price {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for f64 {
    fn from(value: Price) -> Self {
        value.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

fn ensure_name(name: &str) -> DomainResult<()> {
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

/// Fields of a product that does not exist in storage yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    price: Price,
    availability: bool,
}

impl NewProduct {
    /// New products are available unless stated otherwise.
    pub fn new(name: impl Into<String>, price: Price) -> DomainResult<Self> {
        let name = name.into();
        ensure_name(&name)?;
        Ok(Self {
            name,
            price,
            availability: true,
        })
    }

    pub fn with_availability(mut self, availability: bool) -> Self {
        self.availability = availability;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn availability(&self) -> bool {
        self.availability
    }
}

/// Full replacement of a product's mutable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductChanges {
    name: String,
    price: Price,
    availability: bool,
}

impl ProductChanges {
    pub fn new(name: impl Into<String>, price: Price, availability: bool) -> DomainResult<Self> {
        let name = name.into();
        ensure_name(&name)?;
        Ok(Self {
            name,
            price,
            availability,
        })
    }
}

/// Entity: Product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: ProductId,
    name: String,
    price: Price,
    availability: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Materialize a freshly stored product.
    pub fn from_new(id: ProductId, fields: NewProduct, stored_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            price: fields.price,
            availability: fields.availability,
            created_at: stored_at,
            updated_at: stored_at,
        }
    }

    /// Rebuild a product from raw stored columns, re-checking invariants.
    pub fn restore(
        id: ProductId,
        name: String,
        price: f64,
        availability: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_name(&name)?;
        Ok(Self {
            id,
            name,
            price: Price::new(price)?,
            availability,
            created_at,
            updated_at,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn availability(&self) -> bool {
        self.availability
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overwrite name, price and availability in one step.
    pub fn replace(&mut self, changes: ProductChanges) {
        self.name = changes.name;
        self.price = changes.price;
        self.availability = changes.availability;
    }

    pub fn toggle_availability(&mut self) {
        self.availability = !self.availability;
    }

    /// Record a successful save.
    pub fn touch(&mut self, saved_at: DateTime<Utc>) {
        self.updated_at = saved_at;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
