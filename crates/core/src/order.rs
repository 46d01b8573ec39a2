//! Synthetic order payloads for `POST /api/orders`.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::catalog::PRODUCT_IDS;
use crate::types::{Phone, Price, ProductId};

/// Shipping states the backend maps to a fulfilment region.
pub const SHIPPING_STATES: [&str; 3] = ["Shanghai", "Beijing", "Guangzhou"];

/// Largest quantity ordered per line.
pub const MAX_QUANTITY: u32 = 3;

/// Payment method accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Wechat,
    Alipay,
}

impl PaymentMethod {
    /// Every method, in wire order.
    pub const ALL: [Self; 2] = [Self::Wechat, Self::Alipay];
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub name: String,
    pub phone: Phone,
    pub street: String,
    pub state: String,
    pub zip_code: String,
}

/// Body of an order-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub total_amount: Price,
    pub payment_method: PaymentMethod,
}

impl OrderPayload {
    /// Build a one-line order for a random catalog product.
    ///
    /// Quantity is 1..=3 at [`Price::UNIT`]; the total is always
    /// `unit × quantity`. Shipping name, phone, street and zip are randomized
    /// per call so concurrent users do not submit identical orders.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let product = PRODUCT_IDS.choose(rng).copied().unwrap_or("PROD-001");
        let quantity = rng.random_range(1..=MAX_QUANTITY);

        let shipping_address = ShippingAddress {
            name: format!("Test User {}", rng.random_range(1000..=9999)),
            phone: Phone::random(rng),
            street: format!("Test Street {}", rng.random_range(1..=100)),
            state: SHIPPING_STATES
                .choose(rng)
                .copied()
                .unwrap_or("Shanghai")
                .to_owned(),
            zip_code: rng.random_range(100_000..=999_999).to_string(),
        };
        let payment_method = PaymentMethod::ALL
            .choose(rng)
            .copied()
            .unwrap_or(PaymentMethod::Wechat);

        Self::single_line(ProductId::from(product), quantity, shipping_address, payment_method)
    }

    /// Build a one-line order at [`Price::UNIT`].
    #[must_use]
    pub fn single_line(
        product_id: ProductId,
        quantity: u32,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let price = Price::UNIT;
        Self {
            items: vec![OrderItem {
                product_name: product_id.to_string(),
                product_id,
                quantity,
                price,
            }],
            shipping_address,
            total_amount: price.times(quantity),
            payment_method,
        }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::catalog::product_catalog;

    #[test]
    fn test_total_is_unit_price_times_quantity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let order = OrderPayload::random(&mut rng);
            let item = &order.items[0];
            assert!((1..=MAX_QUANTITY).contains(&item.quantity));
            assert_eq!(item.price, Price::whole(99));
            assert_eq!(order.total_amount, Price::whole(99 * item.quantity));
        }
    }

    #[test]
    fn test_random_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(5);
        let products = product_catalog();
        for _ in 0..200 {
            let order = OrderPayload::random(&mut rng);
            let item = &order.items[0];
            assert!(products.contains(&item.product_id));
            assert_eq!(item.product_name, item.product_id.as_str());

            let address = &order.shipping_address;
            assert!(SHIPPING_STATES.contains(&address.state.as_str()));
            assert_eq!(address.zip_code.len(), 6);
            assert!(address.name.starts_with("Test User "));
            assert!(address.street.starts_with("Test Street "));
            assert!(address.phone.as_str().starts_with("138"));
        }
    }

    #[test]
    fn test_wire_shape() {
        let order = OrderPayload::single_line(
            ProductId::new("PROD-002"),
            2,
            ShippingAddress {
                name: "Test User 1234".to_string(),
                phone: Phone::parse("13812345678").unwrap(),
                street: "Test Street 7".to_string(),
                state: "Beijing".to_string(),
                zip_code: "100001".to_string(),
            },
            PaymentMethod::Alipay,
        );
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["items"][0]["productId"], "PROD-002");
        assert_eq!(json["items"][0]["productName"], "PROD-002");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["price"].as_f64(), Some(99.0));
        assert_eq!(json["shippingAddress"]["zipCode"], "100001");
        assert_eq!(json["shippingAddress"]["phone"], "13812345678");
        assert_eq!(json["totalAmount"].as_f64(), Some(198.0));
        assert_eq!(json["paymentMethod"], "alipay");
        assert_eq!(order.quantity(), 2);
    }
}
