//! Parameterized SQL fragments using `?` positional placeholders.
//!
//! A fragment only grows through methods that write a placeholder and record
//! its value in the same step, so `sql` and `values` never drift apart: the
//! n-th `?` in the text is bound to `values[n]`. Literal SQL pushed through
//! [`SqlFragment::push_sql`] must therefore never contain a `?` of its own.

use tokio_postgres::types::ToSql;

/// A value bound to one placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFragment {
    sql: String,
    values: Vec<SqlValue>,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        debug_assert!(!sql.contains('?'), "literal SQL must not contain placeholders");
        Self { sql, values: Vec::new() }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    pub fn push_sql(&mut self, sql: &str) -> &mut Self {
        debug_assert!(!sql.contains('?'), "literal SQL must not contain placeholders");
        self.sql.push_str(sql);
        self
    }

    pub fn push_value(&mut self, value: impl Into<SqlValue>) -> &mut Self {
        self.sql.push('?');
        self.values.push(value.into());
        self
    }

    /// Writes `?,?,...` with one placeholder per value.
    pub fn push_values_list<V: Into<SqlValue>>(&mut self, values: impl IntoIterator<Item = V>) -> &mut Self {
        for (index, value) in values.into_iter().enumerate() {
            if index > 0 {
                self.sql.push(',');
            }
            self.push_value(value);
        }
        self
    }

    pub fn push_fragment(&mut self, other: &SqlFragment) -> &mut Self {
        self.sql.push_str(&other.sql);
        self.values.extend(other.values.iter().cloned());
        self
    }

    pub fn join(fragments: impl IntoIterator<Item = SqlFragment>, separator: &str) -> SqlFragment {
        let mut joined = SqlFragment::default();
        for (index, fragment) in fragments.into_iter().enumerate() {
            if index > 0 {
                joined.push_sql(separator);
            }
            joined.push_fragment(&fragment);
        }
        joined
    }

    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// Statement text with `?` renumbered to the `$1..$n` form the Postgres driver expects.
    pub fn to_postgres_text(&self) -> String {
        let mut text = String::with_capacity(self.sql.len() + self.values.len() * 2);
        let mut index = 0;
        for c in self.sql.chars() {
            if c == '?' {
                index += 1;
                text.push('$');
                text.push_str(&index.to_string());
            } else {
                text.push(c);
            }
        }
        text
    }

    pub fn to_postgres_params(&self) -> Vec<Box<dyn ToSql + Sync + Send>> {
        self.values
            .iter()
            .map(|value| -> Box<dyn ToSql + Sync + Send> {
                match value {
                    SqlValue::Text(s) => Box::new(s.clone()),
                    SqlValue::Int(i) => Box::new(*i),
                    SqlValue::Float(f) => Box::new(*f),
                    SqlValue::Bool(b) => Box::new(*b),
                }
            })
            .collect()
    }

    /// Statement with values written inline. Only meant for debug logs, never for execution.
    pub fn inline_preview(&self) -> String {
        let mut values = self.values.iter();
        let mut preview = String::with_capacity(self.sql.len());
        for c in self.sql.chars() {
            if c != '?' {
                preview.push(c);
                continue;
            }
            match values.next() {
                Some(SqlValue::Text(s)) => preview.push_str(&format_sql_query::QuotedData(s.as_str()).to_string()),
                Some(SqlValue::Int(i)) => preview.push_str(&i.to_string()),
                Some(SqlValue::Float(f)) => preview.push_str(&f.to_string()),
                Some(SqlValue::Bool(b)) => preview.push_str(if *b { "true" } else { "false" }),
                None => preview.push('?'),
            }
        }
        preview
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_values_list_writes_one_placeholder_per_value() {
        let mut sql = SqlFragment::new("access_code in (");
        sql.push_values_list(["A1", "A2", "A3"]).push_sql(")");
        assert_eq!(sql.sql(), "access_code in (?,?,?)");
        assert_eq!(sql.values(), &[SqlValue::from("A1"), SqlValue::from("A2"), SqlValue::from("A3")]);
    }

    #[test]
    fn join_keeps_values_in_text_order() {
        let mut first = SqlFragment::new("a = ");
        first.push_value(1_i64);
        let mut second = SqlFragment::new("b = ");
        second.push_value("x");
        let joined = SqlFragment::join([first, SqlFragment::new("c"), second], " and ");
        assert_eq!(joined.sql(), "a = ? and c and b = ?");
        assert_eq!(joined.values(), &[SqlValue::Int(1), SqlValue::Text("x".into())]);
    }

    #[test]
    fn postgres_text_numbers_placeholders() {
        let mut sql = SqlFragment::new("select * from t where a = ");
        sql.push_value(1_i64).push_sql(" and b in (").push_values_list([2_i64, 3]).push_sql(")");
        assert_eq!(sql.to_postgres_text(), "select * from t where a = $1 and b in ($2,$3)");
        assert_eq!(sql.to_postgres_params().len(), 3);
    }

    #[test]
    fn inline_preview_quotes_text_values() {
        let mut sql = SqlFragment::new("name ilike ");
        sql.push_value("%o'hara%").push_sql(" and is_fees = ").push_value(true);
        let preview = sql.inline_preview();
        assert!(preview.starts_with("name ilike '%o"));
        assert!(preview.ends_with(" and is_fees = true"));
        assert!(!preview.contains('?'));
    }
}
