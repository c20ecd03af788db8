//! New-order form
//!
//! Holds the raw text fields an operator edits and turns them into an
//! [`OrderRequest`]. Also offers a sample-data generator for demos.

use rand::Rng;
use swifttrack_client::{ClientError, DeliveryAddress, OrderReceipt, OrderRequest, RestClient};
use tracing::info;

/// Sample delivery locations: (address, latitude, longitude)
pub const SAMPLE_ADDRESSES: [(&str, f64, f64); 5] = [
    ("Marine Drive, Colombo 03", 6.9271, 79.8612),
    ("Galle Road, Mount Lavinia", 6.8344, 79.8644),
    ("Kandy Road, Kegalle", 7.2523, 80.3410),
    ("Matara Road, Galle", 6.0535, 80.2210),
    ("Temple Road, Nugegoda", 6.8649, 79.8997),
];

pub const SAMPLE_PACKAGES: [&str; 5] = ["PKG001", "PKG002", "PKG003", "PKG004", "PKG005"];

/// A fresh `ORD<n>` id with `n` in `0..1000`
pub fn random_order_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("ORD{}", rng.gen_range(0..1000))
}

/// Split a comma-separated item list, dropping blanks
pub fn parse_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub order_id: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    /// Comma-separated package ids
    pub items: String,
}

impl Default for OrderForm {
    fn default() -> Self {
        Self {
            order_id: random_order_id(&mut rand::thread_rng()),
            address: "123 Main Street, Colombo".to_string(),
            latitude: "6.9271".to_string(),
            longitude: "79.8612".to_string(),
            items: "PKG001,PKG002,PKG003".to_string(),
        }
    }
}

impl OrderForm {
    /// A form filled with sample data
    pub fn random() -> Self {
        let mut form = Self::default();
        form.randomize(&mut rand::thread_rng());
        form
    }

    /// Build the request body from the current fields
    pub fn to_request(&self) -> Result<OrderRequest, ClientError> {
        let order_id = self.order_id.trim();
        if order_id.is_empty() {
            return Err(ClientError::Validation("order id must not be empty".to_string()));
        }

        Ok(OrderRequest {
            order_id: order_id.to_string(),
            delivery_address: DeliveryAddress {
                address: self.address.trim().to_string(),
                latitude: parse_coordinate("latitude", &self.latitude)?,
                longitude: parse_coordinate("longitude", &self.longitude)?,
            },
            items: parse_items(&self.items),
        })
    }

    /// Fill the form with a random sample address, one to three packages and a new id
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (address, latitude, longitude) = SAMPLE_ADDRESSES[rng.gen_range(0..SAMPLE_ADDRESSES.len())];
        let package_count = rng.gen_range(1..=3);

        self.address = address.to_string();
        self.latitude = latitude.to_string();
        self.longitude = longitude.to_string();
        self.items = SAMPLE_PACKAGES[..package_count].join(",");
        self.order_id = random_order_id(rng);
    }

    /// Submit the order; on success the form gets a new id for the next one
    pub async fn submit(&mut self, client: &RestClient) -> Result<OrderReceipt, ClientError> {
        let request = self.to_request()?;
        let receipt = client.submit_order(&request).await?;

        info!("Order {} accepted with status {}", receipt.order_id, receipt.status);
        self.order_id = random_order_id(&mut rand::thread_rng());
        Ok(receipt)
    }
}

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, ClientError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ClientError::Validation(format!("{} must be a number, got {:?}", field, raw)))?;

    if !value.is_finite() {
        return Err(ClientError::Validation(format!("{} must be finite", field)));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn form(items: &str) -> OrderForm {
        OrderForm {
            order_id: " ORD42 ".to_string(),
            address: "Temple Road, Nugegoda".to_string(),
            latitude: "6.8649".to_string(),
            longitude: " 79.8997".to_string(),
            items: items.to_string(),
        }
    }

    #[test]
    fn test_items_are_split_and_trimmed() {
        let request = form(" PKG001, ,PKG002 ,,").to_request().unwrap();
        assert_eq!(request.order_id, "ORD42");
        assert_eq!(request.items, ["PKG001", "PKG002"]);
        assert_eq!(request.delivery_address.longitude, 79.8997);
    }

    #[test]
    fn test_empty_items_serialize_as_empty_array() {
        let request = form("").to_request().unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["items"], serde_json::json!([]));
        assert_eq!(body["deliveryAddress"]["latitude"], serde_json::json!(6.8649));
    }

    #[test]
    fn test_bad_coordinates_rejected() {
        let mut bad = form("PKG001");
        bad.latitude = "north".to_string();
        assert!(matches!(bad.to_request(), Err(ClientError::Validation(_))));

        let mut bad = form("PKG001");
        bad.longitude = "NaN".to_string();
        assert!(matches!(bad.to_request(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_empty_order_id_rejected() {
        let mut bad = form("PKG001");
        bad.order_id = "  ".to_string();
        assert!(matches!(bad.to_request(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_randomize_uses_sample_data() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut form = OrderForm::default();

        for _ in 0..20 {
            form.randomize(&mut rng);
            let request = form.to_request().unwrap();

            assert!(SAMPLE_ADDRESSES
                .iter()
                .any(|(address, lat, lng)| *address == request.delivery_address.address
                    && *lat == request.delivery_address.latitude
                    && *lng == request.delivery_address.longitude));
            assert!((1..=3).contains(&request.items.len()));
            assert_eq!(request.items[0], "PKG001");

            let n: u32 = request.order_id.trim_start_matches("ORD").parse().unwrap();
            assert!(n < 1000);
        }
    }
}
