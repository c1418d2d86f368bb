use super::types::{FilterOrderInfo, ResourceSpec, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Resolve the requested sort against the resource allow-list.
    ///
    /// The returned column is always one of the `&'static str` entries of
    /// `spec.sortable`, never the caller's text. Matching is case-insensitive so
    /// `sort=name` and `sort=NAME` both select the `NAME` column.
    pub fn resolve(spec: &ResourceSpec, sort: Option<&str>, order: Option<&str>) -> FilterOrderInfo {
        let column = sort
            .map(str::trim)
            .and_then(|requested| {
                spec.sortable
                    .iter()
                    .copied()
                    .find(|allowed| allowed.eq_ignore_ascii_case(requested))
            })
            .unwrap_or(spec.default_sort);

        let sort = order
            .and_then(SortDirection::parse)
            .unwrap_or(spec.default_order);

        FilterOrderInfo { column, sort }
    }

    pub fn generate(info: &FilterOrderInfo) -> String {
        format!("ORDER BY \"{}\" {}", info.column, info.sort.to_sql())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SPEC: ResourceSpec = ResourceSpec {
        table: "hospitals",
        columns: &["HOSPCODE", "NAME"],
        sortable: &["HOSPCODE", "NAME"],
        searchable: &["NAME"],
        default_sort: "HOSPCODE",
        default_order: SortDirection::Asc,
        fixed_filter: None,
    };

    #[test]
    fn unknown_sort_falls_back_to_default() {
        let info = FilterOrder::resolve(&SPEC, Some("NAME; DROP TABLE hospitals"), None);
        assert_eq!(info.column, "HOSPCODE");
        assert_eq!(FilterOrder::generate(&info), "ORDER BY \"HOSPCODE\" ASC");
    }

    #[test]
    fn sort_matches_case_insensitively() {
        let info = FilterOrder::resolve(&SPEC, Some(" name "), Some("DESC"));
        assert_eq!(info.column, "NAME");
        assert_eq!(info.sort, SortDirection::Desc);
    }

    #[test]
    fn unknown_order_uses_default() {
        let info = FilterOrder::resolve(&SPEC, Some("NAME"), Some("sideways"));
        assert_eq!(info.sort, SortDirection::Asc);
    }
}
