//! Application services: the operations behind each route, wired to the stores
//! and external collaborators.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use menuboard_catalog::{
    CatalogSnapshot, Category, CategoryUpdate, Establishment, EstablishmentUpdate, NewCategory,
    NewEstablishment, NewProduct, Product, ProductUpdate,
};
use menuboard_core::{CategoryId, DomainError, DomainResult, EstablishmentId, OrderId, ProductId};
use menuboard_infra::store::{EstablishmentStore, InMemoryEstablishmentStore, MenuStore};
use menuboard_notifications::{MessageStyle, build_notification_link, contact_handle, format_order_message};
use menuboard_ordering::{CartLine, CustomerContact, Order, OrderUpdate, price_order};
use menuboard_subscriptions::{
    CheckoutProvider, CheckoutRequest, PaymentStatus, Plan, apply_payment_status, is_entitled,
};

/// Customer order as received from the public menu.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub establishment_id: EstablishmentId,
    pub customer: CustomerContact,
    pub items: Vec<CartLine>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub order: Order,
    pub whatsapp_url: String,
}

#[derive(Clone)]
pub struct AppServices {
    establishments: Arc<dyn EstablishmentStore>,
    menu: MenuStore,
    checkout: Arc<dyn CheckoutProvider>,
    message_style: MessageStyle,
    webhook_secret: Option<String>,
}

impl AppServices {
    pub fn new(
        establishments: Arc<dyn EstablishmentStore>,
        menu: MenuStore,
        checkout: Arc<dyn CheckoutProvider>,
        message_style: MessageStyle,
    ) -> Self {
        Self {
            establishments,
            menu,
            checkout,
            message_style,
            webhook_secret: None,
        }
    }

    /// Secret that payment callbacks must be signed with. `None` refuses every callback.
    pub fn with_webhook_secret(mut self, secret: Option<String>) -> Self {
        self.webhook_secret = secret;
        self
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }

    /// In-memory stores, as used by the binary and the black-box tests.
    pub fn in_memory(checkout: Arc<dyn CheckoutProvider>, message_style: MessageStyle) -> Self {
        Self::new(
            Arc::new(InMemoryEstablishmentStore::new()),
            MenuStore::in_memory(),
            checkout,
            message_style,
        )
    }

    /// Shared handle to the establishment store (for the subscription sweeper).
    pub fn establishment_store(&self) -> Arc<dyn EstablishmentStore> {
        self.establishments.clone()
    }

    // Establishments

    pub fn register_establishment(&self, new: NewEstablishment) -> DomainResult<Establishment> {
        let establishment = Establishment::register(EstablishmentId::new(), new, Utc::now())?;
        self.establishments.insert(establishment.clone())?;
        info!(establishment_id = %establishment.id, "establishment registered");
        Ok(establishment)
    }

    pub fn establishment(&self, id: EstablishmentId) -> DomainResult<Establishment> {
        self.establishments
            .get(id)
            .ok_or_else(|| DomainError::not_found("establishment"))
    }

    pub fn update_establishment(
        &self,
        id: EstablishmentId,
        update: EstablishmentUpdate,
    ) -> DomainResult<Establishment> {
        let mut update = Some(update);
        self.establishments.update(id, &mut |est| match update.take() {
            Some(u) => est.apply_update(u),
            None => Ok(()),
        })
    }

    /// Gate check without side effects; denied establishments answer 403 (or 404).
    pub fn entitled_establishment(&self, id: EstablishmentId) -> DomainResult<Establishment> {
        let establishment = self.establishments.get(id);
        is_entitled(establishment.as_ref(), Utc::now()).into_result()?;
        establishment.ok_or_else(|| DomainError::not_found("establishment"))
    }

    // Public menu

    /// Menu landing read: denied while the establishment is not entitled.
    pub fn public_menu(&self, id: EstablishmentId) -> DomainResult<CatalogSnapshot> {
        let establishment = self.entitled_establishment(id)?;
        Ok(self.menu.snapshot(establishment))
    }

    /// Catalog as customers see it, whatever the subscription state.
    pub fn menu_catalog(&self, id: EstablishmentId) -> DomainResult<CatalogSnapshot> {
        let establishment = self.establishment(id)?;
        Ok(self.menu.snapshot(establishment))
    }

    // Categories

    pub fn list_categories(&self, establishment_id: EstablishmentId) -> Vec<Category> {
        self.menu.categories(establishment_id)
    }

    pub fn create_category(&self, establishment_id: EstablishmentId, new: NewCategory) -> DomainResult<Category> {
        let category = Category::new(CategoryId::new(), establishment_id, new)?;
        self.menu.save_category(category.clone())?;
        Ok(category)
    }

    pub fn update_category(
        &self,
        establishment_id: EstablishmentId,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> DomainResult<Category> {
        let mut category = self.menu.category(establishment_id, id)?;
        category.apply_update(update)?;
        self.menu.save_category(category.clone())?;
        Ok(category)
    }

    pub fn delete_category(&self, establishment_id: EstablishmentId, id: CategoryId) -> DomainResult<()> {
        let removed_products = self.menu.delete_category(establishment_id, id)?;
        info!(%establishment_id, category_id = %id, removed_products, "category deleted");
        Ok(())
    }

    // Products

    pub fn list_products(&self, establishment_id: EstablishmentId) -> Vec<Product> {
        self.menu.products(establishment_id)
    }

    pub fn products_in_category(
        &self,
        establishment_id: EstablishmentId,
        category_id: CategoryId,
    ) -> DomainResult<Vec<Product>> {
        self.menu.category(establishment_id, category_id)?;
        Ok(self.menu.products_in_category(establishment_id, category_id))
    }

    pub fn create_product(&self, establishment_id: EstablishmentId, new: NewProduct) -> DomainResult<Product> {
        if let Some(category_id) = new.category_id {
            self.menu.category(establishment_id, category_id)?;
        }
        let product = Product::new(ProductId::new(), establishment_id, new)?;
        self.menu.save_product(product.clone())?;
        Ok(product)
    }

    pub fn update_product(
        &self,
        establishment_id: EstablishmentId,
        id: ProductId,
        update: ProductUpdate,
    ) -> DomainResult<Product> {
        let mut product = self.menu.product(establishment_id, id)?;
        if let Some(category_id) = update.category_id {
            self.menu.category(establishment_id, category_id)?;
        }
        product.apply_update(update)?;
        self.menu.save_product(product.clone())?;
        Ok(product)
    }

    pub fn delete_product(&self, establishment_id: EstablishmentId, id: ProductId) -> DomainResult<()> {
        self.menu.delete_product(establishment_id, id)
    }

    // Orders

    /// Validate the contact channel, price the cart, then persist and render the
    /// notification. Any failure leaves nothing stored.
    pub fn place_order(&self, request: PlaceOrder) -> DomainResult<PlacedOrder> {
        let establishment = self.establishment(request.establishment_id)?;
        contact_handle(&establishment)?;

        let snapshot = self.menu.snapshot(establishment.clone());
        let priced = price_order(request.establishment_id, &snapshot, &request.items)?;
        let order = Order::place(OrderId::new(), priced, request.customer, request.notes, Utc::now())?;

        let message = format_order_message(&establishment, &order, &self.message_style);
        let whatsapp_url = build_notification_link(&establishment, &message)?;

        self.menu.save_order(order.clone())?;
        info!(
            establishment_id = %order.establishment_id,
            order_id = %order.id,
            lines = order.lines.len(),
            total = %order.total,
            "order placed"
        );

        Ok(PlacedOrder { order, whatsapp_url })
    }

    pub fn list_orders(&self, establishment_id: EstablishmentId) -> Vec<Order> {
        self.menu.orders(establishment_id)
    }

    pub fn update_order(
        &self,
        establishment_id: EstablishmentId,
        id: OrderId,
        update: OrderUpdate,
    ) -> DomainResult<Order> {
        let mut order = self.menu.order(establishment_id, id)?;
        order.apply_update(update)?;
        self.menu.save_order(order.clone())?;
        info!(%establishment_id, order_id = %id, status = %order.status, "order updated");
        Ok(order)
    }

    pub fn delete_order(&self, establishment_id: EstablishmentId, id: OrderId) -> DomainResult<()> {
        self.menu.delete_order(establishment_id, id)
    }

    // Subscriptions

    pub async fn create_checkout_link(&self, plan: &str, establishment_id: EstablishmentId) -> DomainResult<String> {
        let plan: Plan = plan.parse()?;
        self.establishment(establishment_id)?;

        let request = CheckoutRequest { plan, establishment_id };
        let url = self.checkout.create_checkout_link(&request).await?;
        info!(%establishment_id, %plan, "checkout link created");
        Ok(url)
    }

    /// Apply a payment-provider callback to the establishment's subscription.
    pub fn apply_payment(
        &self,
        establishment_id: EstablishmentId,
        status: PaymentStatus,
        plan: &str,
    ) -> DomainResult<Establishment> {
        let plan: Plan = plan.parse()?;
        let now = Utc::now();
        let mut changed = false;

        let establishment = self.establishments.update(establishment_id, &mut |est| {
            changed = apply_payment_status(&mut est.subscription, status, plan, now);
            Ok(())
        })?;

        if changed {
            info!(
                %establishment_id,
                ?status,
                active = establishment.subscription.active,
                expires_at = ?establishment.subscription.expires_at,
                "subscription updated from payment"
            );
        }
        Ok(establishment)
    }
}
