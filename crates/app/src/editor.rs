//! Product editor: add a new product or edit/delete an existing one.
//!
//! Inputs are kept as the raw text the user typed; they are only parsed on save.
//! Writes go through the content resolver with column-keyed values.

use stockroom_core::ProductId;
use stockroom_events::{ChangeEnvelope, EventBus};
use stockroom_infra::{ContentResolver, ProductStore, ProductTable, ProductUri, StoreResult};
use stockroom_products::contract::PATH_PRODUCTS;
use stockroom_products::{Column, Product, ProductChange, ProductValues, SaleFlag};

use crate::notice::Notice;

/// URI scheme of the supplier call action.
pub const TEL_SCHEME: &str = "tel:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    New,
    Edit(ProductId),
}

/// Result of pressing save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing was entered; the editor closes without writing.
    Discarded,
    /// A required input is empty; the editor stays open.
    MissingInfo,
    /// Price or quantity is not a whole number; the editor stays open.
    InvalidNumber(&'static str),
    Inserted(ProductId),
    Updated(ProductId),
    InsertFailed,
    UpdateFailed,
}

impl SaveOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SaveOutcome::Discarded => None,
            SaveOutcome::MissingInfo => Some(Notice::MissingInfo),
            SaveOutcome::InvalidNumber(field) => Some(Notice::InvalidNumber(*field)),
            SaveOutcome::Inserted(_) => Some(Notice::InsertSucceeded),
            SaveOutcome::Updated(_) => Some(Notice::UpdateSucceeded),
            SaveOutcome::InsertFailed => Some(Notice::InsertFailed),
            SaveOutcome::UpdateFailed => Some(Notice::UpdateFailed),
        }
    }

    /// Whether the editor should close after this outcome.
    pub fn closes_editor(&self) -> bool {
        !matches!(self, SaveOutcome::MissingInfo | SaveOutcome::InvalidNumber(_))
    }
}

/// Editor form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorForm {
    mode: EditorMode,
    name: String,
    price: String,
    quantity: String,
    sale: SaleFlag,
    supplier_name: String,
    supplier_phone: String,
    changed: bool,
}

impl Default for EditorForm {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorForm {
    /// Empty form for adding a product.
    pub fn new() -> Self {
        Self {
            mode: EditorMode::New,
            name: String::new(),
            price: String::new(),
            quantity: "0".to_string(),
            sale: SaleFlag::NoSale,
            supplier_name: String::new(),
            supplier_phone: String::new(),
            changed: false,
        }
    }

    /// Form for editing product `id`, filled from the store.
    ///
    /// If the product no longer exists the inputs stay empty.
    pub fn edit<T, B>(store: &ProductStore<T, B>, id: ProductId) -> StoreResult<Self>
    where
        T: ProductTable,
        B: EventBus<ChangeEnvelope<ProductChange>>,
    {
        let mut form = Self::new();
        form.load(store, id)?;
        Ok(form)
    }

    /// Switch to edit mode for `id` and fill the inputs. Returns whether the row exists.
    pub fn load<T, B>(&mut self, store: &ProductStore<T, B>, id: ProductId) -> StoreResult<bool>
    where
        T: ProductTable,
        B: EventBus<ChangeEnvelope<ProductChange>>,
    {
        self.mode = EditorMode::Edit(id);
        let found = match store.read_one(id)? {
            Some(product) => {
                self.fill(&product);
                true
            }
            None => {
                self.clear_inputs();
                false
            }
        };
        self.changed = false;
        Ok(found)
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Window title.
    pub fn title(&self) -> &'static str {
        match self.mode {
            EditorMode::New => "Add a Product",
            EditorMode::Edit(_) => "Edit Product",
        }
    }

    /// Delete is only offered for existing products.
    pub fn can_delete(&self) -> bool {
        matches!(self.mode, EditorMode::Edit(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn sale(&self) -> SaleFlag {
        self.sale
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn supplier_phone(&self) -> &str {
        &self.supplier_phone
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = value.into();
        self.changed = true;
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        self.price = value.into();
        self.changed = true;
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) {
        self.quantity = value.into();
        self.changed = true;
    }

    pub fn set_sale(&mut self, sale: SaleFlag) {
        self.sale = sale;
        self.changed = true;
    }

    pub fn set_supplier_name(&mut self, value: impl Into<String>) {
        self.supplier_name = value.into();
        self.changed = true;
    }

    pub fn set_supplier_phone(&mut self, value: impl Into<String>) {
        self.supplier_phone = value.into();
        self.changed = true;
    }

    /// Record that the user touched an input without changing its text.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.changed
    }

    /// Whether leaving now should ask before discarding input.
    pub fn needs_discard_confirmation(&self) -> bool {
        self.changed || !self.name.trim().is_empty()
    }

    /// Stepper "+": an empty or unreadable quantity counts as 0.
    pub fn increment_quantity(&mut self) {
        let next = self.stepper_value().saturating_add(1);
        self.set_quantity(next.to_string());
    }

    /// Stepper "-": never goes below 0.
    pub fn decrement_quantity(&mut self) {
        let current = self.stepper_value();
        if current > 0 {
            self.set_quantity((current - 1).to_string());
        }
    }

    /// `tel:` URI for calling the supplier, if a phone number is filled in.
    pub fn dial_uri(&self) -> Option<String> {
        let phone = self.supplier_phone.trim();
        (!phone.is_empty()).then(|| format!("{TEL_SCHEME}{phone}"))
    }

    /// Apply the save rules and write through the resolver.
    pub fn save<T, B>(&mut self, store: &ProductStore<T, B>) -> SaveOutcome
    where
        T: ProductTable,
        B: EventBus<ChangeEnvelope<ProductChange>>,
    {
        let name = self.name.trim();
        if !self.changed && name.is_empty() {
            return SaveOutcome::Discarded;
        }
        let price = self.price.trim();
        if [name, price, self.supplier_name.trim(), self.supplier_phone.trim()]
            .iter()
            .any(|v| v.is_empty())
        {
            return SaveOutcome::MissingInfo;
        }

        let values = match self.values() {
            Ok(values) => values,
            Err(outcome) => return outcome,
        };
        let resolver = ContentResolver::new(store);

        let outcome = match self.mode {
            EditorMode::New => match resolver.insert(PATH_PRODUCTS, values) {
                Ok(ProductUri::Item(id)) => SaveOutcome::Inserted(id),
                Ok(ProductUri::Collection) => SaveOutcome::InsertFailed,
                Err(e) => {
                    tracing::warn!(error = %e, "product insert failed");
                    SaveOutcome::InsertFailed
                }
            },
            EditorMode::Edit(id) => {
                let uri = ProductUri::Item(id).to_string();
                match resolver.update(&uri, values) {
                    Ok(0) => SaveOutcome::UpdateFailed,
                    Ok(_) => SaveOutcome::Updated(id),
                    Err(e) => {
                        tracing::warn!(product_id = %id, error = %e, "product update failed");
                        SaveOutcome::UpdateFailed
                    }
                }
            }
        };

        if let SaveOutcome::Inserted(id) = outcome {
            self.mode = EditorMode::Edit(id);
        }
        if outcome.closes_editor() {
            self.changed = false;
        }
        outcome
    }

    /// Delete the product being edited. In new mode there is nothing to delete.
    pub fn delete<T, B>(&self, store: &ProductStore<T, B>) -> Option<Notice>
    where
        T: ProductTable,
        B: EventBus<ChangeEnvelope<ProductChange>>,
    {
        let EditorMode::Edit(id) = self.mode else {
            return None;
        };
        let uri = ProductUri::Item(id).to_string();
        match ContentResolver::new(store).delete(&uri) {
            Ok(0) => Some(Notice::DeleteFailed),
            Ok(_) => Some(Notice::DeleteSucceeded),
            Err(e) => {
                tracing::warn!(product_id = %id, error = %e, "product delete failed");
                Some(Notice::DeleteFailed)
            }
        }
    }

    fn values(&self) -> Result<ProductValues, SaveOutcome> {
        let number = |raw: &str, column: Column| -> Result<i64, SaveOutcome> {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(0);
            }
            raw.parse::<i64>()
                .map_err(|_| SaveOutcome::InvalidNumber(column.name()))
        };

        Ok(ProductValues {
            name: Some(self.name.trim().to_string()),
            price: Some(number(&self.price, Column::Price)?),
            sale: Some(self.sale.as_raw()),
            quantity: Some(number(&self.quantity, Column::Quantity)?),
            supplier_name: Some(self.supplier_name.trim().to_string()),
            supplier_phone: Some(self.supplier_phone.trim().to_string()),
        })
    }

    fn stepper_value(&self) -> i64 {
        self.quantity.trim().parse::<i64>().unwrap_or(0).max(0)
    }

    fn fill(&mut self, product: &Product) {
        self.name = product.name().to_string();
        self.price = product.price().to_string();
        self.quantity = product.quantity().to_string();
        self.sale = product.sale();
        self.supplier_name = product.supplier_name().to_string();
        self.supplier_phone = product.supplier_phone().to_string();
    }

    fn clear_inputs(&mut self) {
        self.name.clear();
        self.price.clear();
        self.quantity.clear();
        self.sale = SaleFlag::NoSale;
        self.supplier_name.clear();
        self.supplier_phone.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_infra::InMemoryProductTable;
    use stockroom_products::ProductFields;

    fn store() -> ProductStore<InMemoryProductTable> {
        ProductStore::with_table(InMemoryProductTable::new())
    }

    fn filled_form() -> EditorForm {
        let mut form = EditorForm::new();
        form.set_name("Widget");
        form.set_price("10");
        form.set_quantity("5");
        form.set_supplier_name("Acme");
        form.set_supplier_phone("555-1234");
        form
    }

    #[test]
    fn untouched_new_form_is_discarded() {
        let store = store();
        let mut form = EditorForm::new();
        assert_eq!(form.save(&store), SaveOutcome::Discarded);
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn missing_supplier_phone_keeps_editor_open() {
        let store = store();
        let mut form = filled_form();
        form.set_supplier_phone("  ");

        let outcome = form.save(&store);
        assert_eq!(outcome, SaveOutcome::MissingInfo);
        assert_eq!(outcome.notice(), Some(Notice::MissingInfo));
        assert!(!outcome.closes_editor());
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn touched_form_with_empty_name_asks_for_info() {
        let store = store();
        let mut form = EditorForm::new();
        form.mark_changed();
        assert_eq!(form.save(&store), SaveOutcome::MissingInfo);
    }

    #[test]
    fn non_numeric_price_is_reported() {
        let store = store();
        let mut form = filled_form();
        form.set_price("ten");
        assert_eq!(form.save(&store), SaveOutcome::InvalidNumber("Price"));
    }

    #[test]
    fn save_in_new_mode_inserts() {
        let store = store();
        let mut form = filled_form();
        form.set_sale(SaleFlag::HasSale);

        let SaveOutcome::Inserted(id) = form.save(&store) else {
            panic!("expected insert");
        };
        let product = store.require(id).unwrap();
        assert_eq!(product.name(), "Widget");
        assert_eq!(product.sale(), SaleFlag::HasSale);
        assert_eq!(product.supplier_phone(), "555-1234");
        assert!(!form.has_unsaved_changes());
        assert_eq!(form.mode(), EditorMode::Edit(id));
    }

    #[test]
    fn negative_price_fails_the_insert() {
        let store = store();
        let mut form = filled_form();
        form.set_price("-3");
        assert_eq!(form.save(&store), SaveOutcome::InsertFailed);
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn edit_mode_loads_and_updates() {
        let store = store();
        let id = store
            .create(&ProductFields::new("Widget", 10, 5).with_supplier("Acme", "555-1234"))
            .unwrap();

        let mut form = EditorForm::edit(&store, id).unwrap();
        assert_eq!(form.title(), "Edit Product");
        assert_eq!(form.price(), "10");
        assert!(!form.has_unsaved_changes());

        form.increment_quantity();
        assert_eq!(form.save(&store), SaveOutcome::Updated(id));
        assert_eq!(store.require(id).unwrap().quantity(), 6);
    }

    #[test]
    fn update_of_deleted_product_fails() {
        let store = store();
        let id = store
            .create(&ProductFields::new("Widget", 10, 5).with_supplier("Acme", "555-1234"))
            .unwrap();
        let mut form = EditorForm::edit(&store, id).unwrap();
        store.delete(id).unwrap();

        form.set_price("12");
        assert_eq!(form.save(&store), SaveOutcome::UpdateFailed);
    }

    #[test]
    fn loading_missing_product_leaves_form_empty() {
        let store = store();
        let mut form = filled_form();
        assert!(!form.load(&store, ProductId::new(3)).unwrap());
        assert_eq!(form.name(), "");
        assert_eq!(form.quantity(), "");
        assert!(!form.has_unsaved_changes());
    }

    #[test]
    fn stepper_floors_at_zero() {
        let mut form = EditorForm::new();
        form.decrement_quantity();
        assert_eq!(form.quantity(), "0");
        form.increment_quantity();
        form.increment_quantity();
        form.decrement_quantity();
        assert_eq!(form.quantity(), "1");

        form.set_quantity("");
        form.increment_quantity();
        assert_eq!(form.quantity(), "1");
    }

    #[test]
    fn delete_only_in_edit_mode() {
        let store = store();
        assert_eq!(EditorForm::new().delete(&store), None);
        assert!(!EditorForm::new().can_delete());

        let id = store.create(&ProductFields::new("Widget", 10, 5)).unwrap();
        let form = EditorForm::edit(&store, id).unwrap();
        assert_eq!(form.delete(&store), Some(Notice::DeleteSucceeded));
        assert_eq!(form.delete(&store), Some(Notice::DeleteFailed));
    }

    #[test]
    fn dial_uri_uses_tel_scheme() {
        let mut form = EditorForm::new();
        assert_eq!(form.dial_uri(), None);
        form.set_supplier_phone(" 555-1234 ");
        assert_eq!(form.dial_uri().as_deref(), Some("tel:555-1234"));
    }

    #[test]
    fn discard_confirmation_follows_changes_or_name() {
        let mut form = EditorForm::new();
        assert!(!form.needs_discard_confirmation());
        form.set_sale(SaleFlag::HasSale);
        assert!(form.needs_discard_confirmation());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: no sequence of stepper presses yields a negative quantity.
            #[test]
            fn stepper_never_negative(presses in proptest::collection::vec(any::<bool>(), 0..64)) {
                let mut form = EditorForm::new();
                let mut expected: i64 = 0;
                for up in presses {
                    if up {
                        form.increment_quantity();
                        expected += 1;
                    } else {
                        form.decrement_quantity();
                        expected = (expected - 1).max(0);
                    }
                }
                prop_assert_eq!(form.quantity(), expected.to_string());
            }
        }
    }
}
