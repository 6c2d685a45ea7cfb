//! # Product Records

use serde::{Deserialize, Serialize};

/// One row of the catalog table.
///
/// Field order matches the on-disk column order `id,type,name,price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        product_type: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            product_type: product_type.into(),
            name: name.into(),
            price,
        }
    }
}

/// Fields that may be replaced on an existing product.
///
/// There is no `id` here: an update can never rename a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ProductUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.product_type.is_none() && self.name.is_none() && self.price.is_none()
    }

    /// Merge the supplied fields over `product` in place.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(product_type) = &self.product_type {
            product.product_type = product_type.clone();
        }
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}
