//! Record normalizer: header-first delimited text -> ordered [`RawRecord`]s.
//!
//! Fields are coerced eagerly (number, boolean, text) but the raw text is kept,
//! so identifiers that happen to look numeric ("1001") are never lost.
//! Numeric defaults (missing -> 0) are applied by consumers, not here.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

/// Coerced value of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Empty text. Deliberately *not* coerced to 0.
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    /// Coerce raw field text: finite number, then case-insensitive
    /// `true`/`false`, then text.
    pub fn coerce(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return FieldValue::Empty;
        }
        if let Ok(n) = raw.parse::<f64>() {
            if n.is_finite() {
                return FieldValue::Number(n);
            }
        }
        if raw.eq_ignore_ascii_case("true") {
            return FieldValue::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return FieldValue::Bool(false);
        }
        FieldValue::Text(raw.to_string())
    }
}

/// A field: the trimmed source text plus its coerced value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub raw: String,
    pub value: FieldValue,
}

impl Field {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            value: FieldValue::coerce(raw),
        }
    }
}

/// One data row keyed by header name, in header order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    fields: Vec<(String, Field)>,
}

impl RawRecord {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.trim().to_string(), Field::new(v)))
                .collect(),
        }
    }

    /// Field by header name (case-insensitive).
    pub fn get(&self, column: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, field)| field)
    }

    /// Raw text of a column, `""` when absent.
    pub fn text(&self, column: &str) -> &str {
        self.get(column).map(|f| f.raw.as_str()).unwrap_or("")
    }

    /// Numeric value of a column, `None` when absent or not numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.get(column)?.value {
            FieldValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Numeric value with the consumption-time default of 0.
    pub fn number_or_zero(&self, column: &str) -> f64 {
        self.number(column).unwrap_or(0.0)
    }

    /// Boolean value of a column, `None` when absent or not a boolean literal.
    pub fn flag(&self, column: &str) -> Option<bool> {
        match self.get(column)?.value {
            FieldValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parsing knobs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub delimiter: u8,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Normalize comma-separated text. See [`normalize_with`].
pub fn normalize(text: &str, expected_columns: &[&str]) -> Vec<RawRecord> {
    normalize_with(text, expected_columns, NormalizeOptions::default())
}

/// Normalize delimited text with a header row into ordered records.
///
/// Returns an empty vector (and logs a warning) when the header does not carry
/// every `expected_columns` name. Blank lines are skipped; short rows are
/// padded with empty fields; rows the reader cannot decode are skipped.
pub fn normalize_with(
    text: &str,
    expected_columns: &[&str],
    options: NormalizeOptions,
) -> Vec<RawRecord> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|s| s.trim().to_string()).collect(),
        Err(err) => {
            warn!(error = %err, "could not read header row; returning no records");
            return Vec::new();
        }
    };

    if headers.iter().all(|h| h.is_empty()) {
        debug!("input has no header row");
        return Vec::new();
    }

    let missing: Vec<&str> = expected_columns
        .iter()
        .copied()
        .filter(|expected| !headers.iter().any(|h| h.eq_ignore_ascii_case(expected)))
        .collect();
    if !missing.is_empty() {
        warn!(?missing, "header row does not match expected columns; returning no records");
        return Vec::new();
    }

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    loop {
        match reader.read_record(&mut row) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                warn!(line = reader.position().line(), error = %err, "skipping unreadable row");
                continue;
            }
        }

        if row.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), Field::new(row.get(i).unwrap_or(""))))
            .collect();
        records.push(RawRecord { fields });
    }

    debug!(rows = records.len(), "normalized delimited text");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SALES: &str = "sales_id,date,sku_id,quantity_sold,promotion_flag\n\
        1001,2024-03-01,SKU-FLO-25,40,False\n\
        \n\
        1002,2024-03-01,SKU-SEM-10,12.5,TRUE\n";

    #[test]
    fn coerces_numbers_booleans_and_text() {
        assert_eq!(FieldValue::coerce("42"), FieldValue::Number(42.0));
        assert_eq!(FieldValue::coerce(" -3.5 "), FieldValue::Number(-3.5));
        assert_eq!(FieldValue::coerce("1e3"), FieldValue::Number(1000.0));
        assert_eq!(FieldValue::coerce("True"), FieldValue::Bool(true));
        assert_eq!(FieldValue::coerce("FALSE"), FieldValue::Bool(false));
        assert_eq!(FieldValue::coerce("SKU-FLO-25"), FieldValue::Text("SKU-FLO-25".into()));
        assert_eq!(FieldValue::coerce("NaN"), FieldValue::Text("NaN".into()));
        assert_eq!(FieldValue::coerce("inf"), FieldValue::Text("inf".into()));
    }

    #[test]
    fn empty_field_is_not_zero() {
        assert_eq!(FieldValue::coerce(""), FieldValue::Empty);
        let r = RawRecord::from_pairs([("qty", "")]);
        assert_eq!(r.number("qty"), None);
        assert_eq!(r.number_or_zero("qty"), 0.0);
    }

    #[test]
    fn preserves_row_order_and_skips_blank_lines() {
        let rows = normalize(SALES, &["sales_id", "sku_id"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("sales_id"), "1001");
        assert_eq!(rows[0].number("sales_id"), Some(1001.0));
        assert_eq!(rows[0].flag("promotion_flag"), Some(false));
        assert_eq!(rows[1].number("quantity_sold"), Some(12.5));
        assert_eq!(rows[1].flag("promotion_flag"), Some(true));
    }

    #[test]
    fn whitespace_only_lines_are_dropped() {
        let text = "a,b\r\n1,2\r\n   \r\n3,4\r\n";
        let rows = normalize(text, &["a", "b"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].number("b"), Some(4.0));
    }

    #[test]
    fn unmatched_header_yields_no_records() {
        assert!(normalize(SALES, &["sales_id", "region"]).is_empty());
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let rows = normalize("Username,ROLE\nalice,admin\n", &["username", "role"]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("role"), "admin");
    }

    #[test]
    fn header_only_input_yields_no_records() {
        assert!(normalize("a,b,c\n", &["a"]).is_empty());
        assert!(normalize("", &[]).is_empty());
    }

    #[test]
    fn short_rows_are_padded_and_quotes_are_honoured() {
        let text = "name,note,extra\n\"Mill, North\",\"says \"\"hi\"\"\"\nsolo\n";
        let rows = normalize(text, &["name", "note"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("name"), "Mill, North");
        assert_eq!(rows[0].text("note"), "says \"hi\"");
        assert_eq!(rows[1].text("note"), "");
        assert_eq!(rows[1].get("extra").map(|f| &f.value), Some(&FieldValue::Empty));
    }

    #[test]
    fn custom_delimiter() {
        let rows = normalize_with("a;b\n1;x\n", &["a", "b"], NormalizeOptions { delimiter: b';' });
        assert_eq!(rows[0].number("a"), Some(1.0));
        assert_eq!(rows[0].text("b"), "x");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every row exposes every header column and numbers are finite.
        #[test]
        fn rows_are_padded_to_the_header(
            rows in prop::collection::vec(prop::collection::vec("[a-z0-9.e+-]{0,6}", 1..=3), 0..20)
        ) {
            let body: Vec<String> = rows.iter().map(|cells| cells.join(",")).collect();
            let text = format!("a,b,c\n{}\n", body.join("\n"));
            let records = normalize(&text, &["a", "b", "c"]);
            prop_assert!(records.len() <= rows.len());
            for record in &records {
                prop_assert_eq!(record.len(), 3);
                for column in ["a", "b", "c"] {
                    prop_assert!(record.number(column).is_none_or(f64::is_finite));
                }
            }
        }
    }
}
