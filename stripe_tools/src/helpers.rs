use crate::NewCheckoutSession;

/// Flattens a checkout session request into Stripe's form encoding, where nested values are addressed with
/// bracketed paths such as `line_items[0][price_data][currency]`.
pub fn encode_checkout_session(session: &NewCheckoutSession) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), session.success_url.clone()),
        ("cancel_url".to_string(), session.cancel_url.clone()),
    ];
    for (i, item) in session.line_items.iter().enumerate() {
        let prefix = format!("line_items[{i}]");
        let price_data = format!("{prefix}[price_data]");
        params.push((format!("{prefix}[quantity]"), item.quantity.to_string()));
        params.push((format!("{price_data}[currency]"), item.currency.clone()));
        params.push((format!("{price_data}[unit_amount]"), item.unit_amount.value().to_string()));
        params.push((format!("{price_data}[product_data][name]"), item.name.clone()));
        // Stripe rejects empty descriptions
        if !item.description.is_empty() {
            params.push((format!("{price_data}[product_data][description]"), item.description.clone()));
        }
        for (j, image) in item.images.iter().enumerate() {
            params.push((format!("{price_data}[product_data][images][{j}]"), image.clone()));
        }
    }
    params
}
