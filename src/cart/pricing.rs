//! Order pricing and the coupon catalog.
//!
//! All amounts are exact decimals; nothing is rounded until it is formatted
//! for display.

use super::models::{CartItem, CartTotals};
use crate::format::format_currency;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

/// Subtotal at which shipping becomes free
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(200);
/// Flat shipping fee below the threshold
pub const FLAT_SHIPPING_FEE: Decimal = dec!(12.99);
/// Sales tax applied to the subtotal, regardless of discounts
pub const TAX_RATE: Decimal = dec!(0.07);

// =============================================================================
// Coupons
// =============================================================================

/// How a coupon reduces the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CouponKind {
    /// `discount_rate` of the subtotal
    Percentage,
    /// Waives the shipping fee
    FreeShipping,
}

/// A named discount rule with an eligibility threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub code: &'static str,
    pub description: &'static str,
    pub discount_rate: Decimal,
    pub minimum_subtotal: Decimal,
    pub kind: CouponKind,
}

/// Coupons accepted by the storefront
pub const AVAILABLE_COUPONS: [Coupon; 3] = [
    Coupon {
        code: "SAVE10",
        description: "Save 10% when you spend $100 or more.",
        discount_rate: dec!(0.10),
        minimum_subtotal: dec!(100),
        kind: CouponKind::Percentage,
    },
    Coupon {
        code: "FREESHIP",
        description: "Free shipping on orders over $75.",
        discount_rate: dec!(0),
        minimum_subtotal: dec!(75),
        kind: CouponKind::FreeShipping,
    },
    Coupon {
        code: "WELCOME15",
        description: "15% off for new customers on $200+ orders.",
        discount_rate: dec!(0.15),
        minimum_subtotal: dec!(200),
        kind: CouponKind::Percentage,
    },
];

impl Coupon {
    pub fn is_eligible(&self, subtotal: Decimal) -> bool {
        subtotal >= self.minimum_subtotal
    }

    /// Discount this coupon grants; never negative.
    ///
    /// A shipping coupon is worth the current fee, so it is worth nothing
    /// once shipping is already free.
    pub fn discount(&self, subtotal: Decimal, shipping: Decimal) -> Decimal {
        if !self.is_eligible(subtotal) {
            return Decimal::ZERO;
        }
        match self.kind {
            CouponKind::FreeShipping if shipping > Decimal::ZERO => shipping,
            CouponKind::FreeShipping => Decimal::ZERO,
            CouponKind::Percentage => subtotal * self.discount_rate,
        }
    }

    pub fn success_message(&self) -> String {
        match self.kind {
            CouponKind::FreeShipping => "Free shipping will be applied to your order.".to_string(),
            CouponKind::Percentage => format!("Coupon {} applied successfully.", self.code),
        }
    }
}

/// Looks a coupon up by its normalized (trimmed, uppercased) code.
pub fn find_coupon(code: &str) -> Option<&'static Coupon> {
    let normalized = code.trim().to_uppercase();
    AVAILABLE_COUPONS.iter().find(|c| c.code == normalized)
}

/// Why a coupon code was not accepted
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponRejection {
    #[error("Please enter a coupon code.")]
    Empty,

    #[error("Coupon not recognized. Try {}.", valid_codes_hint())]
    Unknown(String),

    #[error("Spend {} or more to unlock free shipping.", dollars(.minimum))]
    ShippingBelowMinimum { minimum: Decimal },

    #[error("Spend at least {} to use this coupon.", dollars(.minimum))]
    BelowMinimum { minimum: Decimal },
}

fn dollars(amount: &Decimal) -> String {
    format_currency(*amount)
}

/// "SAVE10, FREESHIP, or WELCOME15"
fn valid_codes_hint() -> String {
    let codes: Vec<&str> = AVAILABLE_COUPONS.iter().map(|c| c.code).collect();
    match codes.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{}, or {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

/// Resolves `code` to a coupon usable at `subtotal`.
pub fn check_coupon(code: &str, subtotal: Decimal) -> Result<&'static Coupon, CouponRejection> {
    let normalized = code.trim();
    if normalized.is_empty() {
        return Err(CouponRejection::Empty);
    }

    let coupon =
        find_coupon(normalized).ok_or_else(|| CouponRejection::Unknown(normalized.to_uppercase()))?;

    if !coupon.is_eligible(subtotal) {
        let minimum = coupon.minimum_subtotal;
        return Err(match coupon.kind {
            CouponKind::FreeShipping => CouponRejection::ShippingBelowMinimum { minimum },
            CouponKind::Percentage => CouponRejection::BelowMinimum { minimum },
        });
    }

    Ok(coupon)
}

/// `{success, message}` reported back to the shopper
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CouponActionResult {
    pub success: bool,
    pub message: String,
}

impl From<Result<&Coupon, CouponRejection>> for CouponActionResult {
    fn from(outcome: Result<&Coupon, CouponRejection>) -> Self {
        match outcome {
            Ok(coupon) => Self {
                success: true,
                message: coupon.success_message(),
            },
            Err(rejection) => Self {
                success: false,
                message: rejection.to_string(),
            },
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

pub fn subtotal(items: &[CartItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.product.price * Decimal::from(item.quantity))
        .sum()
}

/// Free for an empty cart or at/above the threshold, flat fee otherwise.
pub fn shipping_fee(items: &[CartItem], subtotal: Decimal) -> Decimal {
    if items.is_empty() || subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

pub fn compute_totals(items: &[CartItem], coupon: Option<&Coupon>) -> CartTotals {
    let subtotal = subtotal(items);
    let shipping = shipping_fee(items, subtotal);
    let tax = subtotal * TAX_RATE;
    let discount = coupon
        .map(|c| c.discount(subtotal, shipping))
        .unwrap_or(Decimal::ZERO);
    let total = (subtotal + shipping + tax - discount).max(Decimal::ZERO);

    CartTotals {
        subtotal,
        shipping,
        tax,
        discount,
        total,
    }
}
