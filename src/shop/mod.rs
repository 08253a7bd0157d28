/// Storefront module - Gateway

mod catalog;

pub use catalog::{catalog, products_in, Category, Product};
