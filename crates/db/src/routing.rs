//! Country-to-table routing for the price catalog.
//!
//! One logical catalog, N physical table pairs selected by the caller's
//! country. All engine logic is written against the resolved pair; nothing
//! outside this module branches on a country code.

/// The pair of physical tables backing one country's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogTables {
    /// Administrator-maintained price table (read-only to the engine).
    pub global: &'static str,
    /// Per-user override table.
    pub overrides: &'static str,
}

/// Base-country pair, used when the country code is missing or unrecognized.
pub const BASE_TABLES: CatalogTables = CatalogTables {
    global: "global_prices",
    overrides: "user_price_overrides",
};

const MX_TABLES: CatalogTables = CatalogTables {
    global: "global_prices_mx",
    overrides: "user_price_overrides_mx",
};

const CL_TABLES: CatalogTables = CatalogTables {
    global: "global_prices_cl",
    overrides: "user_price_overrides_cl",
};

/// Resolve the table pair for a country code.
///
/// Matching is case-insensitive; anything unrecognized falls back to
/// [`BASE_TABLES`]. Never fails.
pub fn resolve_tables(country_code: &str) -> CatalogTables {
    match country_code.trim().to_ascii_uppercase().as_str() {
        "ES" => BASE_TABLES,
        "MX" => MX_TABLES,
        "CL" => CL_TABLES,
        _ => BASE_TABLES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_resolve_to_their_pair() {
        assert_eq!(resolve_tables("MX").global, "global_prices_mx");
        assert_eq!(resolve_tables("CL").overrides, "user_price_overrides_cl");
        assert_eq!(resolve_tables("ES"), BASE_TABLES);
    }

    #[test]
    fn match_is_case_insensitive_and_trimmed() {
        assert_eq!(resolve_tables("mx"), resolve_tables("MX"));
        assert_eq!(resolve_tables(" cl "), resolve_tables("CL"));
    }

    #[test]
    fn unknown_or_empty_codes_fall_back_to_base() {
        assert_eq!(resolve_tables(""), BASE_TABLES);
        assert_eq!(resolve_tables("FR"), BASE_TABLES);
        assert_eq!(resolve_tables("??"), BASE_TABLES);
    }
}
