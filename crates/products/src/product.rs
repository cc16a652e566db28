use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};

use crate::contract::{Column, SaleFlag};

/// Editable fields of a product (everything but the id).
///
/// Used as the input of create and update. Update replaces every field, there is no
/// partial patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    /// Price in whole currency units.
    pub price: i64,
    pub sale: SaleFlag,
    pub quantity: i64,
    pub supplier_name: String,
    pub supplier_phone: String,
}

impl ProductFields {
    /// Fields with no sale and no supplier information.
    pub fn new(name: impl Into<String>, price: i64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            sale: SaleFlag::NoSale,
            quantity,
            supplier_name: String::new(),
            supplier_phone: String::new(),
        }
    }

    pub fn with_sale(mut self, sale: SaleFlag) -> Self {
        self.sale = sale;
        self
    }

    pub fn with_supplier(mut self, name: impl Into<String>, phone: impl Into<String>) -> Self {
        self.supplier_name = name.into();
        self.supplier_phone = phone.into();
        self
    }

    /// Check the row invariants. The sale flag is valid by construction.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation(Column::Name.name(), "name cannot be empty"));
        }
        if self.price < 0 {
            return Err(DomainError::validation(
                Column::Price.name(),
                format!("price cannot be negative (got {})", self.price),
            ));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation(
                Column::Quantity.name(),
                format!("quantity cannot be negative (got {})", self.quantity),
            ));
        }
        Ok(())
    }
}

/// A stored product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    #[serde(flatten)]
    fields: ProductFields,
}

impl Product {
    pub fn new(id: ProductId, fields: ProductFields) -> Self {
        Self { id, fields }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn price(&self) -> i64 {
        self.fields.price
    }

    pub fn sale(&self) -> SaleFlag {
        self.fields.sale
    }

    pub fn quantity(&self) -> i64 {
        self.fields.quantity
    }

    pub fn supplier_name(&self) -> &str {
        &self.fields.supplier_name
    }

    pub fn supplier_phone(&self) -> &str {
        &self.fields.supplier_phone
    }

    pub fn fields(&self) -> &ProductFields {
        &self.fields
    }

    pub fn into_fields(self) -> ProductFields {
        self.fields
    }

    /// Whether a sale can be recorded (stock left).
    pub fn in_stock(&self) -> bool {
        self.fields.quantity > 0
    }

    /// Quantity after selling one unit, or `OutOfStock` at the floor.
    pub fn quantity_after_sale(&self) -> DomainResult<i64> {
        if !self.in_stock() {
            return Err(DomainError::out_of_stock(self.id));
        }
        Ok(self.fields.quantity - 1)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Raw column values as handed over by a caller of the content resolver.
///
/// Keys are the column names; every value is optional and the sale flag is still a raw
/// integer. Converting into [`ProductFields`] applies defaults and validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductValues {
    #[serde(rename = "Product", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "Price", skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(rename = "Sale", skip_serializing_if = "Option::is_none")]
    pub sale: Option<i64>,
    #[serde(rename = "Quantity", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(rename = "Supplier", skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(rename = "Supplier_Phone", skip_serializing_if = "Option::is_none")]
    pub supplier_phone: Option<String>,
}

impl From<&ProductFields> for ProductValues {
    fn from(fields: &ProductFields) -> Self {
        Self {
            name: Some(fields.name.clone()),
            price: Some(fields.price),
            sale: Some(fields.sale.as_raw()),
            quantity: Some(fields.quantity),
            supplier_name: Some(fields.supplier_name.clone()),
            supplier_phone: Some(fields.supplier_phone.clone()),
        }
    }
}

impl TryFrom<ProductValues> for ProductFields {
    type Error = DomainError;

    fn try_from(values: ProductValues) -> Result<Self, Self::Error> {
        let missing = |column: Column| DomainError::validation(column.name(), "value is required");

        let fields = ProductFields {
            name: values.name.ok_or_else(|| missing(Column::Name))?,
            price: values.price.ok_or_else(|| missing(Column::Price))?,
            sale: match values.sale {
                Some(raw) => SaleFlag::try_from(raw)?,
                None => SaleFlag::default(),
            },
            quantity: values.quantity.ok_or_else(|| missing(Column::Quantity))?,
            supplier_name: values.supplier_name.unwrap_or_default(),
            supplier_phone: values.supplier_phone.unwrap_or_default(),
        };
        fields.validate()?;
        Ok(fields)
    }
}
