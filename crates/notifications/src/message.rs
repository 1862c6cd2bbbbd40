use menuboard_catalog::Establishment;
use menuboard_core::Money;
use menuboard_ordering::{Order, OrderLineItem};

/// Rendering knobs for the order message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStyle {
    pub currency_symbol: String,
}

impl Default for MessageStyle {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
        }
    }
}

impl MessageStyle {
    fn amount(&self, money: Money) -> String {
        format!("{} {}", self.currency_symbol, money)
    }
}

/// Render an order as a WhatsApp-formatted message.
///
/// Section order is fixed: header, customer block, items, total, general
/// notes, status.
pub fn format_order_message(establishment: &Establishment, order: &Order, style: &MessageStyle) -> String {
    let mut out = format!("*New order - {}*\n\n", establishment.name);

    out.push_str(&format!("*Customer:* {}\n", order.customer.name));
    out.push_str(&format!("*Phone:* {}\n", order.customer.phone));
    if let Some(address) = non_blank(order.customer.address.as_deref()) {
        out.push_str(&format!("*Address:* {address}\n"));
    }

    out.push_str("*Items:*\n");
    for line in &order.lines {
        push_line(&mut out, line, style);
    }

    out.push_str(&format!("\n*Total:* {}", style.amount(order.total)));
    if let Some(notes) = non_blank(order.notes.as_deref()) {
        out.push_str(&format!("\n\n*General notes:* {notes}"));
    }
    out.push_str(&format!("\n\n*Status:* {}", order.status));
    out
}

fn push_line(out: &mut String, line: &OrderLineItem, style: &MessageStyle) {
    out.push_str(&format!(
        "- {}x {} ({})",
        line.quantity,
        line.product_name,
        style.amount(line.unit_price)
    ));

    if !line.selected_options.is_empty() {
        out.push_str("\n  *Options:*");
        for option in &line.selected_options {
            out.push_str(&format!("\n  - {}: {}", option.group_name, option.selection));
            if !option.extra_price.is_zero() {
                out.push_str(&format!(" (+{})", style.amount(option.extra_price)));
            }
        }
    }

    if let Some(notes) = non_blank(line.notes.as_deref()) {
        out.push_str(&format!("\n  *Note:* {notes}"));
    }
    out.push('\n');
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use menuboard_catalog::NewEstablishment;
    use menuboard_core::{EstablishmentId, OrderId, ProductId};
    use menuboard_ordering::{CustomerContact, OrderStatus, SelectedOption};

    fn establishment() -> Establishment {
        Establishment::register(
            EstablishmentId::new(),
            NewEstablishment {
                name: "Pizzaria Napoli".to_string(),
                contact_phone: Some("+55 (11) 99999-0000".to_string()),
                ..Default::default()
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn order(est: &Establishment, address: Option<&str>, notes: Option<&str>) -> Order {
        Order {
            id: OrderId::new(),
            establishment_id: est.id,
            customer: CustomerContact {
                name: "Ana".to_string(),
                phone: "11988887777".to_string(),
                address: address.map(str::to_string),
            },
            notes: notes.map(str::to_string),
            lines: vec![
                OrderLineItem {
                    product_id: ProductId::new(),
                    product_name: "Pizza".to_string(),
                    unit_price: Money::from_cents(2800),
                    quantity: 2,
                    notes: Some("no onions".to_string()),
                    selected_options: vec![
                        SelectedOption {
                            group_name: "Size".to_string(),
                            selection: "Large".to_string(),
                            extra_price: Money::from_cents(500),
                        },
                        SelectedOption {
                            group_name: "Slices".to_string(),
                            selection: "8".to_string(),
                            extra_price: Money::ZERO,
                        },
                    ],
                },
                OrderLineItem {
                    product_id: ProductId::new(),
                    product_name: "Soda".to_string(),
                    unit_price: Money::from_cents(650),
                    quantity: 1,
                    notes: None,
                    selected_options: vec![],
                },
            ],
            total: Money::from_cents(6250),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn renders_every_section_in_order() {
        let est = establishment();
        let msg = format_order_message(
            &est,
            &order(&est, Some("Rua A, 10"), Some("Call on arrival")),
            &MessageStyle::default(),
        );

        let expected = "*New order - Pizzaria Napoli*\n\n\
*Customer:* Ana\n\
*Phone:* 11988887777\n\
*Address:* Rua A, 10\n\
*Items:*\n\
- 2x Pizza (R$ 28.00)\n  *Options:*\n  - Size: Large (+R$ 5.00)\n  - Slices: 8\n  *Note:* no onions\n\
- 1x Soda (R$ 6.50)\n\
\n*Total:* R$ 62.50\
\n\n*General notes:* Call on arrival\
\n\n*Status:* pending";
        assert_eq!(msg, expected);
    }

    #[test]
    fn optional_blocks_are_omitted() {
        let est = establishment();
        let msg = format_order_message(&est, &order(&est, None, Some("  ")), &MessageStyle::default());
        assert!(!msg.contains("*Address:*"));
        assert!(!msg.contains("*General notes:*"));
    }

    #[test]
    fn currency_symbol_is_configurable() {
        let est = establishment();
        let style = MessageStyle {
            currency_symbol: "€".to_string(),
        };
        let msg = format_order_message(&est, &order(&est, None, None), &style);
        assert!(msg.contains("*Total:* € 62.50"));
    }
}
