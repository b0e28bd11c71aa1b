//! Validation utilities for the AgroData platform

use rust_decimal::Decimal;

// ============================================================================
// Quantity and Price Validations
// ============================================================================

/// Validate a sold/harvested quantity (must be strictly positive)
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be greater than 0");
    }
    Ok(())
}

/// Validate a unit price (non-negative, at most two decimal places)
pub fn validate_unit_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    if price.round_dp(2) != price {
        return Err("Unit price must have at most two decimal places");
    }
    Ok(())
}

/// Validate a stock level (zero is allowed, negative is not)
pub fn validate_stock_level(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Stock quantity cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate a phone number: 8 to 15 digits, optional leading +
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 8 || digits.len() > 15 {
        return Err("Phone number must contain 8 to 15 digits");
    }
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ');
    if !allowed {
        return Err("Phone number contains invalid characters");
    }
    Ok(())
}

/// Validate a processing lot code (3-50 chars, uppercase alphanumeric with dashes)
pub fn validate_lot_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Lot code must be at least 3 characters");
    }
    if code.len() > 50 {
        return Err("Lot code must be at most 50 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Lot code must be uppercase alphanumeric with dashes");
    }
    Ok(())
}

/// Validate a product or person name (non-empty, bounded)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.len() > 100 {
        return Err("Name must be at most 100 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec("0.5")).is_ok());
        assert!(validate_quantity(dec("120")).is_ok());
        assert!(validate_quantity(Decimal::ZERO).is_err());
        assert!(validate_quantity(dec("-3")).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(dec("0")).is_ok());
        assert!(validate_unit_price(dec("1500.25")).is_ok());
        assert!(validate_unit_price(dec("-0.01")).is_err());
        assert!(validate_unit_price(dec("1.999")).is_err());
    }

    #[test]
    fn test_validate_stock_level() {
        assert!(validate_stock_level(Decimal::ZERO).is_ok());
        assert!(validate_stock_level(dec("10")).is_ok());
        assert!(validate_stock_level(dec("-1")).is_err());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_phone_valid() {
        assert!(validate_phone("622123456").is_ok());
        assert!(validate_phone("+224 622 12 34 56").is_ok());
        assert!(validate_phone("01-23-45-67-89").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("phone-number").is_err());
    }

    #[test]
    fn test_validate_lot_code() {
        assert!(validate_lot_code("LOT-2025-001").is_ok());
        assert!(validate_lot_code("ABC").is_ok());
        assert!(validate_lot_code("ab").is_err());
        assert!(validate_lot_code("lot-001").is_err());
        assert!(validate_lot_code("LOT 001").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Mangue séchée").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }
}
