//! Classifier prompt generation
//!
//! Shared between the CLI providers so every provider sees the same
//! instructions and the same strict output shape.

/// Builds the receipt-classification prompt for one image.
///
/// `categories` is the category universe in form order; the classifier
/// must pick one of them (or "Misc" when unsure).
pub fn build_classify_prompt(image_path: &str, categories: &[String]) -> String {
    let category_list = categories.join(", ");

    format!(
        r#"You are filing a staff monthly expense claim. Read the receipt image at {image_path} and extract the total amount paid.

## Categories
Pick exactly one of: {category_list}
If none fits, use "Misc".

## Output format (strictly this JSON object)
{{
  "amount": 0.00,
  "categorySuggestion": "category name"
}}

## Notes
- "amount" is the final total including tax, as a plain number without currency symbols
- Use 0 when no amount is readable
- Output ONLY the JSON object. No explanations"#
    )
}
