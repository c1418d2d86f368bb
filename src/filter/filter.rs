use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{FilterOrderInfo, ListParams, Pagination, ResourceSpec, SqlResult};

/// A bounded count query and a bounded data query over the same predicate.
///
/// The two are executed separately and without a transaction, so `total` may
/// drift from the rows returned if writes land in between.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub count: SqlResult,
    pub data: SqlResult,
    pub pagination: Pagination,
    pub order: FilterOrderInfo,
}

pub struct Filter;

impl Filter {
    /// Build the listing queries for `spec` from raw request parameters.
    ///
    /// Rows with equal sort keys come back in storage-defined order; no
    /// secondary key is added.
    pub fn build(spec: &ResourceSpec, params: &ListParams) -> Result<ListQuery, FilterError> {
        Self::validate_spec(spec)?;

        let pagination = Pagination::from_params(params.page.as_deref(), params.limit.as_deref());
        let order = FilterOrder::resolve(spec, params.sort.as_deref(), params.order.as_deref());
        let (where_clause, where_params) = FilterWhere::generate(spec, params.search.as_deref());

        let where_sql = if where_clause.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_clause)
        };

        let count_query = [
            format!("SELECT COUNT(*) AS count FROM \"{}\"", spec.table),
            where_sql.clone(),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        let data_query = [
            format!("SELECT {}", Self::build_select_clause(spec)),
            format!("FROM \"{}\"", spec.table),
            where_sql,
            FilterOrder::generate(&order),
            format!("LIMIT {} OFFSET {}", pagination.limit, pagination.offset()),
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(ListQuery {
            count: SqlResult { query: count_query, params: where_params.clone() },
            data: SqlResult { query: data_query, params: where_params },
            pagination,
            order,
        })
    }

    /// Every identifier in a spec ends up quoted in SQL text, so each one must be
    /// a plain identifier and every sortable/searchable column must be selectable.
    pub fn validate_spec(spec: &ResourceSpec) -> Result<(), FilterError> {
        if !is_identifier(spec.table) {
            return Err(FilterError::InvalidTableName(spec.table.to_string()));
        }
        let referenced = spec
            .columns
            .iter()
            .chain(spec.sortable)
            .chain(spec.searchable)
            .chain(spec.fixed_filter.iter().map(|f| &f.column));
        for column in referenced {
            if !is_identifier(column) {
                return Err(FilterError::InvalidColumn(column.to_string()));
            }
        }
        if !spec.sortable.contains(&spec.default_sort) {
            return Err(FilterError::InvalidDefaultSort(spec.default_sort.to_string()));
        }
        Ok(())
    }

    fn build_select_clause(spec: &ResourceSpec) -> String {
        if spec.columns.is_empty() {
            "*".to_string()
        } else {
            spec.columns.iter().map(|c| format!("\"{}\"", c)).collect::<Vec<_>>().join(", ")
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::{FixedFilter, SortDirection};

    static HOSPITALS: ResourceSpec = ResourceSpec {
        table: "hospitals",
        columns: &["HOSPCODE", "NAME", "HEADQUARTER"],
        sortable: &["HOSPCODE", "NAME", "HEADQUARTER"],
        searchable: &["HOSPCODE", "NAME", "HEADQUARTER"],
        default_sort: "HOSPCODE",
        default_order: SortDirection::Asc,
        fixed_filter: None,
    };

    static DOCTORS: ResourceSpec = ResourceSpec {
        table: "cm_users",
        columns: &["id", "name", "d_update"],
        sortable: &["name", "d_update"],
        searchable: &["name"],
        default_sort: "d_update",
        default_order: SortDirection::Desc,
        fixed_filter: Some(FixedFilter { column: "user_type", value: "doctor" }),
    };

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "page" => p.page = v,
                "limit" => p.limit = v,
                "sort" => p.sort = v,
                "order" => p.order = v,
                "search" => p.search = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn defaults_without_params() {
        let q = Filter::build(&HOSPITALS, &ListParams::default()).unwrap();
        assert_eq!(q.count.query, "SELECT COUNT(*) AS count FROM \"hospitals\"");
        assert_eq!(
            q.data.query,
            "SELECT \"HOSPCODE\", \"NAME\", \"HEADQUARTER\" FROM \"hospitals\" ORDER BY \"HOSPCODE\" ASC LIMIT 10 OFFSET 0"
        );
        assert!(q.data.params.is_empty());
        assert_eq!(q.pagination, Pagination { page: 1, limit: 10 });
    }

    #[test]
    fn search_sort_and_paging() {
        let q = Filter::build(
            &HOSPITALS,
            &params(&[("search", "bangkok"), ("sort", "NAME"), ("order", "asc"), ("page", "3"), ("limit", "5")]),
        )
        .unwrap();
        let predicate = "WHERE (\"HOSPCODE\" ILIKE $1 OR \"NAME\" ILIKE $1 OR \"HEADQUARTER\" ILIKE $1)";
        assert_eq!(q.count.query, format!("SELECT COUNT(*) AS count FROM \"hospitals\" {}", predicate));
        assert_eq!(
            q.data.query,
            format!(
                "SELECT \"HOSPCODE\", \"NAME\", \"HEADQUARTER\" FROM \"hospitals\" {} ORDER BY \"NAME\" ASC LIMIT 5 OFFSET 10",
                predicate
            )
        );
        assert_eq!(q.count.params, vec!["%bangkok%".to_string()]);
        assert_eq!(q.data.params, q.count.params);
    }

    #[test]
    fn fixed_filter_and_default_order() {
        let q = Filter::build(&DOCTORS, &params(&[("order", "bogus")])).unwrap();
        assert_eq!(
            q.data.query,
            "SELECT \"id\", \"name\", \"d_update\" FROM \"cm_users\" WHERE \"user_type\" = $1 ORDER BY \"d_update\" DESC LIMIT 10 OFFSET 0"
        );
        assert_eq!(q.count.params, vec!["doctor".to_string()]);
    }

    #[test]
    fn injected_sort_never_reaches_sql() {
        let q = Filter::build(&DOCTORS, &params(&[("sort", "name\" DESC; --")])).unwrap();
        assert!(q.data.query.contains("ORDER BY \"d_update\" DESC"));
        assert!(!q.data.query.contains("--"));
    }

    #[test]
    fn limit_and_page_are_clamped() {
        for (page, limit, expected) in [
            ("0", "0", Pagination { page: 1, limit: 1 }),
            ("-4", "500", Pagination { page: 1, limit: 100 }),
            ("abc", "xyz", Pagination { page: 1, limit: 10 }),
            ("7", "100", Pagination { page: 7, limit: 100 }),
        ] {
            let q = Filter::build(&HOSPITALS, &params(&[("page", page), ("limit", limit)])).unwrap();
            assert_eq!(q.pagination, expected, "page={} limit={}", page, limit);
        }
    }

    #[test]
    fn total_pages_is_ceiling() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.meta(0).total_pages, 0);
        assert_eq!(p.meta(1).total_pages, 1);
        assert_eq!(p.meta(10).total_pages, 1);
        assert_eq!(p.meta(11).total_pages, 2);
        assert_eq!(Pagination { page: 2, limit: 3 }.meta(7).total_pages, 3);
    }

    #[test]
    fn rejects_bad_identifiers_in_spec() {
        static BAD: ResourceSpec = ResourceSpec {
            table: "hospitals; DROP",
            columns: &[],
            sortable: &["id"],
            searchable: &[],
            default_sort: "id",
            default_order: SortDirection::Asc,
            fixed_filter: None,
        };
        assert!(matches!(Filter::build(&BAD, &ListParams::default()), Err(FilterError::InvalidTableName(_))));
    }
}
