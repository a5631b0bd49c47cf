//! The in-progress checkout order and its sub-objects.

use serde::{Deserialize, Serialize};

/// Buyer identity collected on step 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerData {
    pub name: String,
    pub email: String,
    /// CPF, stored in display format (`###.###.###-##`).
    pub document: String,
    pub phone: String,
}

/// Shipping/billing address collected on step 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    /// Two-letter federative unit code (e.g., "SP").
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    pub street_number: String,
    /// CEP, stored in display format (`#####-###`).
    pub zipcode: String,
    pub complement: Option<String>,
}

impl Default for AddressData {
    fn default() -> Self {
        Self {
            country: "BR".to_string(),
            state: String::new(),
            city: String::new(),
            neighborhood: String::new(),
            street: String::new(),
            street_number: String::new(),
            zipcode: String::new(),
            complement: None,
        }
    }
}

/// Card fields collected on step 3 when paying by credit card.
///
/// Held in memory only for the lifetime of the session; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub holder_name: String,
    /// Card number in display format (groups of 4).
    pub number: String,
    pub expiration_month: String,
    pub expiration_year: String,
    pub cvv: String,
}

/// Supported payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Pix,
    Boleto,
}

impl PaymentMethod {
    /// Wire name used by the payment gateway.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::Pix => "pix",
            Self::Boleto => "boleto",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" => Ok(Self::CreditCard),
            "pix" => Ok(Self::Pix),
            "boleto" => Ok(Self::Boleto),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// A single cart line, priced in minor currency units (centavos).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Unit price in centavos.
    pub price: i64,
    pub quantity: u32,
}

impl CartItem {
    /// Line total in centavos.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// The aggregate mutated field-by-field as the buyer moves through the steps.
///
/// Sub-objects are `None` until the buyer reaches the corresponding step;
/// `card` stays unused for PIX and boleto orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOrder {
    pub buyer: Option<BuyerData>,
    pub address: Option<AddressData>,
    pub card: Option<CardData>,
    pub payment_method: PaymentMethod,
    /// Total in centavos; kept equal to the cart sum when cart-derived.
    pub amount: i64,
    pub description: String,
    pub items: Vec<CartItem>,
}

impl Default for CheckoutOrder {
    fn default() -> Self {
        Self {
            buyer: None,
            address: None,
            card: None,
            payment_method: PaymentMethod::default(),
            amount: 0,
            description: "Carrinho de compras".to_string(),
            items: Vec::new(),
        }
    }
}

impl CheckoutOrder {
    /// Create an empty order with no cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cart, recomputing the total and the description.
    ///
    /// An empty item list leaves the order untouched, matching the behavior
    /// of a visitor arriving without a cart link.
    pub fn seed_cart(&mut self, items: Vec<CartItem>) {
        if items.is_empty() {
            return;
        }
        self.amount = items.iter().map(CartItem::total).sum();
        self.description = format!("Carrinho com {} item(s)", items.len());
        self.items = items;
    }

    /// Sum of `price * quantity` over the cart, in centavos.
    #[must_use]
    pub fn cart_total(&self) -> i64 {
        self.items.iter().map(CartItem::total).sum()
    }
}
