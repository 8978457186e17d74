//! Cache key derivation.
//!
//! Every catalog key lives under a colon-delimited namespace so one glob
//! delete can sweep all listing variants at once.

use crate::catalog::ProductQueryParams;

/// Namespace shared by every listing key and the facets key.
pub const LISTING_PREFIX: &str = "products";

/// Key of the brand/type facets summary.
pub const FILTERS_KEY: &str = "products:filters";

/// Glob matching every listing variant and the facets key.
pub const LISTING_PATTERN: &str = "products:*";

/// Glob matching every single-product key.
pub const SINGLE_PATTERN: &str = "product:single:*";

/// Search segment written when no term is given.
const NO_SEARCH: &str = "all";

/// Derives the listing key for `params`.
///
/// Pure: the result depends only on the (already canonical) params. User
/// supplied values are escaped so no two distinct params share a key.
pub fn derive_key(params: &ProductQueryParams) -> String {
    let search = match params.search_term() {
        Some(term) => escape_search(term),
        None => NO_SEARCH.to_string(),
    };

    let mut segments = vec![
        LISTING_PREFIX.to_string(),
        format!("search:{}", search),
        format!("order:{}", params.order_by()),
        format!("page:{}", params.page_number()),
        format!("size:{}", params.page_size()),
    ];

    if !params.brands().is_empty() {
        segments.push(format!("brands:{}", join_sorted(params.brands())));
    }
    if !params.types().is_empty() {
        segments.push(format!("types:{}", join_sorted(params.types())));
    }

    segments.join(":")
}

/// Key of a single product lookup.
pub fn product_key(id: i64) -> String {
    format!("product:single:{}", id)
}

fn join_sorted<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    let mut values: Vec<String> = values.into_iter().map(|value| escape(value)).collect();
    values.sort_unstable();
    values.join("-")
}

/// Escapes a search term. The bare word `all` is reserved for "no term".
fn escape_search(term: &str) -> String {
    if term == NO_SEARCH {
        return "%61ll".to_string();
    }
    escape(term)
}

/// Percent-encodes the key delimiters, the glob wildcard and `%` itself.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '%' => escaped.push_str("%25"),
            '*' => escaped.push_str("%2A"),
            '-' => escaped.push_str("%2D"),
            ':' => escaped.push_str("%3A"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
