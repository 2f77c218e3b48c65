pub const INVOICE_EXTRACTION_PROMPT: &str = r#"Analyze this invoice/receipt text and extract the following information in JSON format:

{
    "vendor_name": "Company/business name",
    "vendor_address": "Full address if available",
    "invoice_number": "Invoice/receipt number",
    "invoice_date": "Date in YYYY-MM-DD format",
    "due_date": "Due date in YYYY-MM-DD format if available",
    "subtotal": "Subtotal amount as number",
    "tax": "Tax amount as number",
    "total": "Total amount as number",
    "currency": "Currency code (USD, EUR, etc.)",
    "payment_method": "Credit card, cash, check, etc. if mentioned",
    "line_items": [
        {
            "description": "Item description",
            "quantity": "Quantity as number",
            "unit_price": "Price per unit as number",
            "amount": "Line total as number"
        }
    ],
    "category_suggestion": "Suggested expense category (Office Supplies, Travel, Meals, Software, Professional Services, etc.)",
    "notes": "Any additional relevant information"
}

Be precise with numbers - extract them without currency symbols.
If a field is not found, use null.
For dates, convert to YYYY-MM-DD format.

INVOICE TEXT:
"#;

pub fn build_prompt(invoice_text: &str) -> String {
    let mut prompt = String::with_capacity(INVOICE_EXTRACTION_PROMPT.len() + invoice_text.len());
    prompt.push_str(INVOICE_EXTRACTION_PROMPT);
    prompt.push_str(invoice_text);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_ends_with_invoice_text() {
        let prompt = build_prompt("ACME Corp\nTotal 12.00");
        assert!(prompt.starts_with("Analyze this invoice/receipt text"));
        assert!(prompt.ends_with("INVOICE TEXT:\nACME Corp\nTotal 12.00"));
    }
}
