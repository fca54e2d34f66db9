//! Dashboard resources: customers, orders, the delivery queue and products.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::{Customer, CustomerUpdate};
pub use order::{Order, OrderStatus, OrderUpdate};
pub use product::{Product, ProductUpdate};

use crate::resource::{ListSource, ResourceList};
use crate::table::PageWindow;
use std::sync::Arc;

/// Orders list, shown in ascending order-number order.
pub fn orders_list(
    source: Arc<dyn ListSource<Order>>,
    window: PageWindow,
    cache_pages: usize,
) -> ResourceList<Order> {
    ResourceList::new(order::RESOURCE, source, window, cache_pages).sort_by(order::by_order_number)
}

/// Orders waiting for delivery. Filtering happens after the fetch, so a
/// page may show fewer rows than its page size.
pub fn delivery_queue(
    source: Arc<dyn ListSource<Order>>,
    window: PageWindow,
    cache_pages: usize,
) -> ResourceList<Order> {
    ResourceList::new(order::RESOURCE, source, window, cache_pages)
        .retain(order::awaiting_delivery)
}

pub fn customers_list(
    source: Arc<dyn ListSource<Customer>>,
    window: PageWindow,
    cache_pages: usize,
) -> ResourceList<Customer> {
    ResourceList::new(customer::RESOURCE, source, window, cache_pages)
}

pub fn products_list(
    source: Arc<dyn ListSource<Product>>,
    window: PageWindow,
    cache_pages: usize,
) -> ResourceList<Product> {
    ResourceList::new(product::RESOURCE, source, window, cache_pages)
}
