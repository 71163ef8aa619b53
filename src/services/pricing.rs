use rust_decimal::Decimal;

use crate::entities::product;

/// Price attribution for one order line, computed at insert time. The
/// recorded values are snapshots: later changes to the product's prices do
/// not flow back into existing lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinePricing {
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub margin: Decimal,
}

/// Contract: given the product being sold and a quantity, produce the
/// customer-facing price and the margin attributed to the line. Invoked
/// synchronously by the order coordinator inside the order transaction,
/// immediately before the line insert.
pub fn price_line(product: &product::Model, quantity: i32) -> LinePricing {
    let quantity = Decimal::from(quantity);
    let unit_price = product.sell_price;

    LinePricing {
        unit_price,
        line_total: unit_price * quantity,
        margin: (product.sell_price - product.cost_price) * quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(sell: Decimal, cost: Decimal) -> product::Model {
        product::Model {
            id: 1,
            category_id: 1,
            name: "86 Diamonds".to_string(),
            sku: Some("ML-86".to_string()),
            cost_price: cost,
            sell_price: sell,
            description: None,
        }
    }

    #[test]
    fn single_unit_line() {
        let pricing = price_line(&product(dec!(25000), dec!(21500)), 1);
        assert_eq!(pricing.unit_price, dec!(25000));
        assert_eq!(pricing.line_total, dec!(25000));
        assert_eq!(pricing.margin, dec!(3500));
    }

    #[test]
    fn quantity_scales_total_and_margin() {
        let pricing = price_line(&product(dec!(10000.50), dec!(9000.25)), 3);
        assert_eq!(pricing.unit_price, dec!(10000.50));
        assert_eq!(pricing.line_total, dec!(30001.50));
        assert_eq!(pricing.margin, dec!(3000.75));
    }
}
