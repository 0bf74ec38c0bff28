//! Sample records for seeding the fake backend.

use std::collections::BTreeMap;

use bazaar_core::{
    BillingInfo, Category, CategoryId, LineItem, Order, OrderId, OrderStatus, PaymentInfo,
    Product, ProductId, ProductOption, SubCategory, UserId, UserProfile,
};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::backend::BackendData;

/// Email of the operator the admin console signs in as.
pub const OPERATOR_EMAIL: &str = "ops@example.com";

#[must_use]
pub fn category(id: &str, name: &str, order: i64, subs: &[&str]) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        image: String::new(),
        description: String::new(),
        sub_categories: subs
            .iter()
            .map(|s| SubCategory {
                name: (*s).to_string(),
                image: String::new(),
                description: String::new(),
            })
            .collect(),
        order,
    }
}

/// An order placed on 2024-05-`day` for a single line worth `total`.
#[must_use]
pub fn order(id: &str, name: &str, email: &str, status: OrderStatus, day: u32, total: i64) -> Order {
    Order {
        id: OrderId::new(id),
        billing_info: BillingInfo {
            name: name.to_string(),
            email: email.to_string(),
            phone: "01700000000".to_string(),
            address: "House 1, Road 2, Dhaka".to_string(),
        },
        items: vec![LineItem {
            name: "Cotton Panjabi".to_string(),
            image: String::new(),
            quantity: 1,
            price: Decimal::from(total),
            selected_options: BTreeMap::from([("Size".to_string(), "L".to_string())]),
        }],
        total_amount: Decimal::from(total),
        status,
        payment_info: PaymentInfo::cash_on_delivery(),
        created_at: Utc
            .with_ymd_and_hms(2024, 5, day, 10, 30, 0)
            .single()
            .unwrap_or_default(),
    }
}

#[must_use]
pub fn operator() -> UserProfile {
    UserProfile {
        id: UserId::new("user-ops"),
        name: "Nadia Islam".to_string(),
        email: OPERATOR_EMAIL.to_string(),
        phone: "01711111111".to_string(),
        address: "Gulshan, Dhaka".to_string(),
        date_of_birth: None,
        gender: None,
        bio: String::new(),
        photo: None,
    }
}

/// A product offered in sizes S, M and L.
#[must_use]
pub fn product(
    id: &str,
    name: &str,
    category: &str,
    price: i64,
    discount_price: Option<i64>,
    stock: u32,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} in soft handloom cotton."),
        price: Decimal::from(price),
        discount_price: discount_price.map(Decimal::from),
        images: vec![format!("https://cdn.example.com/{id}.jpg")],
        category: category.to_string(),
        sub_category: None,
        options: vec![ProductOption {
            name: "Size".to_string(),
            values: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        }],
        stock,
        featured: false,
    }
}

/// Three categories, four orders, the operator and a small catalog.
#[must_use]
pub fn sample_data() -> BackendData {
    BackendData {
        categories: vec![
            category("cat-women", "Women", 0, &["Sarees", "Kurtis"]),
            category("cat-men", "Men", 1, &["Panjabis"]),
            category("cat-kids", "Kids", 2, &[]),
        ],
        orders: vec![
            order("ord-a1", "Rahim Uddin", "rahim@example.com", OrderStatus::Pending, 1, 1500),
            order("ord-b2", "Karima Begum", "karima@example.com", OrderStatus::Shipped, 1, 2200),
            order("ord-c3", "Rahman Ali", "ali@shop.test", OrderStatus::Pending, 2, 900),
            order("ord-d4", "Sadia Khan", "sadia@example.com", OrderStatus::Delivered, 3, 3100),
        ],
        users: vec![operator()],
        products: vec![
            product("prod-saree", "Silk Saree", "Women", 1500, Some(1200), 5),
            product("prod-panjabi", "Cotton Panjabi", "Men", 1800, None, 3),
            product("prod-frock", "Party Frock", "Kids", 950, None, 0),
        ],
    }
}
