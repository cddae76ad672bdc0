// 🔎 Query Builder - base statement + optional category predicate
// Caller values only ever travel as bound parameters, never as SQL text

/// Columns read back for every expense row, in `row_to_expense` order
pub const EXPENSE_COLUMNS: &str = "id, item_name, amount_cents, category, created_at";

/// A parameterized SQL statement ready for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

/// Read-side filter shared by list and total.
///
/// The category is passed through as given: no trimming, no case folding,
/// no check against the fixed category set. An unknown label simply
/// matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseQuery {
    category: Option<String>,
}

impl ExpenseQuery {
    /// Unfiltered query over every expense
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from a raw query-string value; absent or empty means "all"
    pub fn from_filter(category: Option<&str>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Newest first; equal timestamps fall back to the later insert first
    pub fn list_statement(&self) -> Statement {
        self.compose(
            &format!("SELECT {} FROM expenses", EXPENSE_COLUMNS),
            Some("ORDER BY created_at DESC, id DESC"),
        )
    }

    /// Sum in cents; COALESCE keeps an empty set at 0 instead of NULL
    pub fn total_statement(&self) -> Statement {
        self.compose("SELECT COALESCE(SUM(amount_cents), 0) FROM expenses", None)
    }

    fn compose(&self, base: &str, suffix: Option<&str>) -> Statement {
        let mut sql = base.to_string();
        let mut params = Vec::new();

        if let Some(category) = &self.category {
            params.push(category.clone());
            sql.push_str(&format!(" WHERE category = ?{}", params.len()));
        }

        if let Some(suffix) = suffix {
            sql.push(' ');
            sql.push_str(suffix);
        }

        Statement { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_list() {
        let stmt = ExpenseQuery::all().list_statement();

        assert_eq!(
            stmt.sql,
            "SELECT id, item_name, amount_cents, category, created_at FROM expenses \
             ORDER BY created_at DESC, id DESC"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_filtered_list_binds_category() {
        let stmt = ExpenseQuery::from_filter(Some("Food")).list_statement();

        assert!(stmt.sql.contains("WHERE category = ?1 ORDER BY created_at DESC"));
        assert_eq!(stmt.params, vec!["Food".to_string()]);
    }

    #[test]
    fn test_total_statements() {
        let all = ExpenseQuery::all().total_statement();
        assert_eq!(all.sql, "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses");
        assert!(all.params.is_empty());

        let food = ExpenseQuery::from_filter(Some("Food")).total_statement();
        assert_eq!(
            food.sql,
            "SELECT COALESCE(SUM(amount_cents), 0) FROM expenses WHERE category = ?1"
        );
        assert_eq!(food.params, vec!["Food".to_string()]);
    }

    #[test]
    fn test_empty_filter_means_all() {
        assert_eq!(ExpenseQuery::from_filter(Some("")), ExpenseQuery::all());
        assert_eq!(ExpenseQuery::from_filter(None), ExpenseQuery::all());
    }

    #[test]
    fn test_filter_value_never_reaches_sql_text() {
        let hostile = "Food' OR '1'='1";
        let stmt = ExpenseQuery::from_filter(Some(hostile)).list_statement();

        assert!(!stmt.sql.contains(hostile));
        assert_eq!(stmt.params, vec![hostile.to_string()]);
    }

    #[test]
    fn test_filter_is_not_normalized() {
        let query = ExpenseQuery::from_filter(Some("food "));
        assert_eq!(query.category(), Some("food "));
    }
}
