use core::fmt;

/// Short message shown to the user after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Save attempted with name, price, supplier or phone left empty.
    MissingInfo,
    /// A numeric input did not hold a whole number; carries the column name.
    InvalidNumber(&'static str),
    InsertSucceeded,
    InsertFailed,
    UpdateSucceeded,
    UpdateFailed,
    DeleteSucceeded,
    DeleteFailed,
    OutOfStock,
    SaleFailed,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::MissingInfo => "Please insert all product info",
            Notice::InvalidNumber("Price") => "Price must be a whole number",
            Notice::InvalidNumber(_) => "Quantity must be a whole number",
            Notice::InsertSucceeded => "Product saved",
            Notice::InsertFailed => "Error with saving product",
            Notice::UpdateSucceeded => "Product updated",
            Notice::UpdateFailed => "Error with updating product",
            Notice::DeleteSucceeded => "Product deleted",
            Notice::DeleteFailed => "Error with deleting product",
            Notice::OutOfStock => "Product is out of stock",
            Notice::SaleFailed => "Sale could not be recorded",
        }
    }

    /// Failures stay on screen longer.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Notice::MissingInfo
                | Notice::InvalidNumber(_)
                | Notice::InsertFailed
                | Notice::UpdateFailed
                | Notice::DeleteFailed
                | Notice::OutOfStock
                | Notice::SaleFailed
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_number_names_the_input() {
        assert_eq!(Notice::InvalidNumber("Price").to_string(), "Price must be a whole number");
        assert_eq!(
            Notice::InvalidNumber("Quantity").to_string(),
            "Quantity must be a whole number"
        );
    }

    #[test]
    fn successes_are_not_errors() {
        assert!(!Notice::InsertSucceeded.is_error());
        assert!(!Notice::DeleteSucceeded.is_error());
        assert!(Notice::OutOfStock.is_error());
    }
}
