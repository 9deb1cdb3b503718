/// Product family names keyed by the second segment of a SKU code.
const PRODUCT_TYPES: [(&str, &str); 6] = [
    ("FLO", "Flour"),
    ("SEM", "Semolina"),
    ("WHO", "Whole grain"),
    ("SEL", "Select"),
    ("BRA", "Bran"),
    ("PAS", "Pasta"),
];

/// Human-readable product name for a SKU code such as `SKU-FLO-25`.
///
/// The second segment names the product family (unknown codes pass through);
/// a third segment is the pack size in kg. Codes with fewer than two segments
/// are returned unchanged.
pub fn extract_sku_name(sku_id: &str) -> String {
    let mut parts = sku_id.split('-').skip(1);
    let Some(code) = parts.next() else {
        return sku_id.to_string();
    };

    let family = PRODUCT_TYPES
        .iter()
        .find(|(key, _)| *key == code)
        .map_or(code, |(_, name)| *name);

    match parts.next().filter(|size| !size.is_empty()) {
        Some(size) => format!("{family} {size}kg"),
        None => family.to_string(),
    }
}
