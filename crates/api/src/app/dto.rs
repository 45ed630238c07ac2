use serde::{Deserialize, Serialize};

use shopfront_core::DomainResult;
use shopfront_products::{NewProduct, Price, ProductChanges};

// -------------------------
// Request DTOs
// -------------------------
//
// Bodies reach these types only after the route's rules accepted them, so
// fields are read the same lenient way the rules judged them.

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    /// Honoured when it reads as a boolean; otherwise the product is available.
    #[serde(default, deserialize_with = "lenient::optional_flag")]
    pub availability: Option<bool>,
}

impl CreateProductRequest {
    pub fn into_new_product(self) -> DomainResult<NewProduct> {
        let fields = NewProduct::new(self.name, Price::new(self.price)?)?;
        Ok(match self.availability {
            Some(availability) => fields.with_availability(availability),
            None => fields,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub availability: bool,
}

impl UpdateProductRequest {
    pub fn into_changes(self) -> DomainResult<ProductChanges> {
        ProductChanges::new(self.name, Price::new(self.price)?, self.availability)
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

mod lenient {
    use serde::de::{Deserialize, Deserializer, Error};
    use serde_json::Value;

    use shopfront_products::validation::{as_flag, as_number, as_text};

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(as_text(Some(&value)).into_owned())
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        as_number(Some(&value)).ok_or_else(|| Error::custom(format!("expected a number, got {value}")))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(deserializer)?;
        as_flag(Some(&value)).ok_or_else(|| Error::custom(format!("expected a boolean, got {value}")))
    }

    pub fn optional_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(as_flag(Some(&value)))
    }
}
