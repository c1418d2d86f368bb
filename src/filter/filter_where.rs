use super::types::ResourceSpec;

/// Builds the WHERE clause shared by the count and data queries.
///
/// Values are always bound as positional parameters; only allow-listed column
/// names from the `ResourceSpec` are written into the SQL text.
pub struct FilterWhere {
    param_values: Vec<String>,
    conditions: Vec<String>,
}

impl FilterWhere {
    fn new() -> Self {
        Self {
            param_values: vec![],
            conditions: vec![],
        }
    }

    /// Returns `(clause, params)`; the clause is empty when nothing filters.
    pub fn generate(spec: &ResourceSpec, search: Option<&str>) -> (String, Vec<String>) {
        let mut filter_where = Self::new();

        if let Some(fixed) = &spec.fixed_filter {
            let p = filter_where.param(fixed.value.to_string());
            filter_where.conditions.push(format!("\"{}\" = {}", fixed.column, p));
        }

        if let Some(term) = normalize_search(search) {
            if !spec.searchable.is_empty() {
                // One bound pattern, referenced once per searchable column
                let p = filter_where.param(format!("%{}%", escape_like(term)));
                let alternatives: Vec<String> = spec
                    .searchable
                    .iter()
                    .map(|column| format!("\"{}\" ILIKE {}", column, p))
                    .collect();
                filter_where.conditions.push(format!("({})", alternatives.join(" OR ")));
            }
        }

        (filter_where.conditions.join(" AND "), filter_where.param_values)
    }

    fn param(&mut self, value: String) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

/// Empty or whitespace-only search means "no search".
fn normalize_search(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|s| !s.is_empty())
}

/// Escape LIKE metacharacters so user text is matched literally.
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
