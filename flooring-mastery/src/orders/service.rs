//! Order service
//!
//! Thin layer over [`OrderStorage`]: turns store outcomes into named errors,
//! resolves tax rates and products for new or edited orders, hands out order
//! numbers and reports every operation to the audit sink.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::{NewOrder, Order, OrderEdit, OrderKey, Product, ValidationError};
use thiserror::Error;

use super::storage::{OrderStorage, StorageError};
use crate::audit::{AuditAction, AuditSink};
use crate::catalog::{ProductCatalog, TaxRateProvider};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("There is already an order {0}")]
    DuplicateOrder(OrderKey),

    #[error("There is no order {0} that could be replaced")]
    NoSuchOrder(OrderKey),

    #[error("There is no order {0} to remove")]
    NotFoundForRemoval(OrderKey),

    #[error("Order number {0} is the largest possible, no new number can be assigned")]
    OrderNumbersExhausted(u32),

    #[error("No tax data for state '{0}'")]
    UnknownState(String),

    #[error("Product type '{0}' is not available")]
    UnknownProduct(String),

    #[error("Invalid order: {0}")]
    Validation(#[from] ValidationError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct OrderService {
    storage: OrderStorage,
    taxes: Box<dyn TaxRateProvider>,
    products: Box<dyn ProductCatalog>,
    audit: Box<dyn AuditSink>,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(
        storage: OrderStorage,
        taxes: Box<dyn TaxRateProvider>,
        products: Box<dyn ProductCatalog>,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            storage,
            taxes,
            products,
            audit,
        }
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    // ========== Load / persist ==========

    /// Load every order file; see [`OrderStorage::load`] for partial failures
    pub fn load_all(&mut self) -> ServiceResult<()> {
        self.record(AuditAction::LoadStarted, "Loading orders");
        match self.storage.load() {
            Ok(()) => {
                self.record(
                    AuditAction::LoadSucceeded,
                    &format!("{} orders loaded", self.storage.len()),
                );
                Ok(())
            }
            Err(e) => {
                self.record(AuditAction::LoadFailed, &e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn save_all(&mut self) -> ServiceResult<()> {
        match self.storage.save() {
            Ok(()) => {
                self.record(AuditAction::OrdersSaved, &format!("{} orders", self.storage.len()));
                Ok(())
            }
            Err(e) => {
                self.record(AuditAction::OrdersSaveFailed, &e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn export_all(&self) -> ServiceResult<()> {
        match self.storage.export() {
            Ok(()) => {
                self.record(
                    AuditAction::OrdersExported,
                    &self.storage.export_file().display().to_string(),
                );
                Ok(())
            }
            Err(e) => {
                self.record(AuditAction::OrdersExportFailed, &e.to_string());
                Err(e.into())
            }
        }
    }

    // ========== Queries ==========

    /// Largest order number in use plus one; 1 for an empty store
    pub fn next_order_number(&self) -> ServiceResult<u32> {
        let next = match self.storage.max_order_number() {
            None => 1,
            Some(max) => max
                .checked_add(1)
                .ok_or(ServiceError::OrderNumbersExhausted(max))?,
        };
        self.record(AuditAction::OrderNumberComputed, &next.to_string());
        Ok(next)
    }

    pub fn all_orders(&self) -> Vec<Order> {
        self.record(AuditAction::OrdersQueried, "all dates");
        self.storage.all_orders()
    }

    pub fn orders_on(&self, date: NaiveDate) -> Vec<Order> {
        self.record(AuditAction::OrdersQueried, &date.to_string());
        self.storage.orders_on(date)
    }

    pub fn lookup(&self, date: NaiveDate, number: u32) -> Option<Order> {
        self.record(
            AuditAction::OrderLookedUp,
            &OrderKey::new(date, number).to_string(),
        );
        self.storage.get(date, number)
    }

    pub fn states(&self) -> Vec<String> {
        self.record(AuditAction::StatesQueried, "");
        self.taxes.states()
    }

    pub fn state_name(&self, abbr: &str) -> Option<String> {
        self.taxes.state_name(abbr)
    }

    pub fn products(&self) -> Vec<Product> {
        self.record(AuditAction::ProductsQueried, "");
        self.products.all_types()
    }

    // ========== Order construction ==========

    /// Build a new order from raw input, numbered after the current maximum
    ///
    /// The order is not stored; pass it to [`submit_new_order`](Self::submit_new_order).
    pub fn draft_order(&self, input: NewOrder) -> ServiceResult<Order> {
        let tax_rate = self.tax_rate(&input.state)?;
        let product = self.product(&input.product_type)?;
        let order = Order::new(
            input.order_date,
            self.next_order_number()?,
            input.customer_name,
            input.state,
            tax_rate,
            product,
            input.area,
        )?;
        self.record(AuditAction::OrderDrafted, &order.key().to_string());
        Ok(order)
    }

    /// Build the edited version of an existing order
    ///
    /// A changed state or product type is resolved through the providers
    /// again; unchanged ones keep the rate and product snapshot of the order.
    pub fn draft_edit(&self, date: NaiveDate, number: u32, edit: OrderEdit) -> ServiceResult<Order> {
        let key = OrderKey::new(date, number);
        let current = self
            .storage
            .get(date, number)
            .ok_or(ServiceError::NoSuchOrder(key))?;

        let tax = match edit.state {
            Some(state) if state.trim() != current.state() => {
                let rate = self.tax_rate(&state)?;
                Some((state, rate))
            }
            _ => None,
        };
        let product = match edit.product_type {
            Some(product_type) if product_type.trim() != current.product().product_type() => {
                Some(self.product(&product_type)?)
            }
            _ => None,
        };

        let revised = current.revise(edit.customer_name, tax, product, edit.area)?;
        self.record(AuditAction::OrderDrafted, &key.to_string());
        Ok(revised)
    }

    // ========== Mutations ==========

    pub fn submit_new_order(&mut self, order: Order) -> ServiceResult<()> {
        let key = order.key();
        if self.storage.push(order).is_accepted() {
            self.record(AuditAction::OrderSubmitted, &key.to_string());
            Ok(())
        } else {
            self.record(AuditAction::OrderSubmitRejected, &key.to_string());
            Err(ServiceError::DuplicateOrder(key))
        }
    }

    pub fn submit_replacement(&mut self, order: Order) -> ServiceResult<()> {
        let key = order.key();
        if self.storage.replace(order).is_accepted() {
            self.record(AuditAction::OrderReplaced, &key.to_string());
            Ok(())
        } else {
            self.record(AuditAction::OrderReplaceRejected, &key.to_string());
            Err(ServiceError::NoSuchOrder(key))
        }
    }

    pub fn remove(&mut self, date: NaiveDate, number: u32) -> ServiceResult<Order> {
        let key = OrderKey::new(date, number);
        match self.storage.remove(date, number) {
            Some(order) => {
                self.record(AuditAction::OrderRemoved, &key.to_string());
                Ok(order)
            }
            None => {
                self.record(AuditAction::OrderRemoveNotFound, &key.to_string());
                Err(ServiceError::NotFoundForRemoval(key))
            }
        }
    }

    // ========== Helpers ==========

    fn tax_rate(&self, state: &str) -> ServiceResult<Decimal> {
        let state = state.trim();
        self.taxes
            .rate_for_state(state)
            .ok_or_else(|| ServiceError::UnknownState(state.to_string()))
    }

    fn product(&self, product_type: &str) -> ServiceResult<Product> {
        let product_type = product_type.trim();
        self.products
            .by_type(product_type)
            .ok_or_else(|| ServiceError::UnknownProduct(product_type.to_string()))
    }

    /// Best effort: a failing sink is logged, never propagated
    fn record(&self, action: AuditAction, detail: &str) {
        if let Err(e) = self.audit.record(action, detail) {
            tracing::warn!(%action, error = %e, "Audit entry dropped");
        }
    }
}
