//! SQL statement drafts.
//!
//! A [`Statement`] is one of four explicit drafts ([`SelectDraft`],
//! [`InsertDraft`], [`UpdateDraft`], [`DeleteDraft`]) built clause by clause.
//! A finished draft is turned into SQL in one of two ways:
//!
//! - [`Statement::compile`] replaces every value with the dialect's parameter
//!   placeholder and returns the values in placeholder order. This is what
//!   gets executed.
//! - [`Statement::render`] interpolates every value as a quoted literal. This
//!   is what gets printed (dry runs, debug logs).
//!
//! Both share a single code path, so the two forms always agree on clause
//! layout. Identifiers (tables, columns) are emitted as given and are never
//! quoted.
//!
//! Drafts that would be unsafe or pointless to run are no-ops: an INSERT
//! without values, an UPDATE without a key value or without columns to set,
//! and a DELETE without conditions. A no-op renders to `""` and compiles to
//! `None`.

use crate::core::{Dialect, SqlValue};

/// A compiled statement: SQL text with placeholders plus ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// WHERE condition. A condition carrying a value has its first `?`
/// replaced by that value.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    template: String,
    value: Option<SqlValue>,
}

impl Condition {
    /// Condition copied verbatim into the SQL text.
    pub fn raw(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            value: None,
        }
    }

    /// Condition with a single `?` bound to `value`.
    pub fn bound(template: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self {
            template: template.into(),
            value: Some(value.into()),
        }
    }

    fn emit(&self, out: &mut Emitter<'_>) -> String {
        match &self.value {
            Some(value) if self.template.contains('?') => {
                let placeholder = out.value(value);
                self.template.replacen('?', &placeholder, 1)
            }
            _ => self.template.clone(),
        }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Limit {
    limit: u64,
    offset: Option<u64>,
}

/// `SELECT` draft.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectDraft {
    table: String,
    columns: String,
    conditions: Vec<Condition>,
    group_by: Vec<String>,
    order_by: Vec<(String, SortDirection)>,
    limit: Option<Limit>,
}

impl SelectDraft {
    /// Select every column (`*`) from `table`.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            conditions: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// Set the select expression (default `*`).
    pub fn columns(mut self, expr: impl Into<String>) -> Self {
        self.columns = expr.into();
        self
    }

    /// Add a verbatim condition. Conditions are ANDed.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(Condition::raw(condition));
        self
    }

    /// Add a condition whose `?` is bound to `value`.
    pub fn filter_value(mut self, condition: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(Condition::bound(condition, value));
        self
    }

    /// Add a prepared condition.
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by.push((column.into(), direction));
        self
    }

    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Limit the result; the offset is only emitted together with a limit.
    pub fn limit(mut self, limit: u64, offset: Option<u64>) -> Self {
        self.limit = Some(Limit { limit, offset });
        self
    }

    fn build(&self, out: &mut Emitter<'_>) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.columns, self.table);

        if let Some(clause) = where_clause(&self.conditions, out) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }

        // GROUP BY must precede ORDER BY whatever order the builder saw them in
        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.order_by.is_empty() {
            let orders = self
                .order_by
                .iter()
                .map(|(col, dir)| format!("{} {}", col, dir.as_sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders);
        }

        match self.limit {
            Some(Limit {
                limit,
                offset: Some(offset),
            }) => sql.push_str(&format!(" LIMIT {}, {}", offset, limit)),
            Some(Limit { limit, offset: None }) => sql.push_str(&format!(" LIMIT {}", limit)),
            None => {}
        }

        sql
    }
}

/// `INSERT` draft.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertDraft {
    table: String,
    values: Vec<(String, SqlValue)>,
}

impl InsertDraft {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            values: Vec::new(),
        }
    }

    /// Add a column value. Columns are emitted in the order they are added.
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    fn build(&self, out: &mut Emitter<'_>) -> Option<String> {
        if self.values.is_empty() {
            return None;
        }

        let columns = self
            .values
            .iter()
            .map(|(col, _)| col.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let values = self
            .values
            .iter()
            .map(|(_, value)| out.value(value))
            .collect::<Vec<_>>()
            .join(",");

        Some(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table, columns, values
        ))
    }
}

/// `UPDATE` draft keyed on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDraft {
    table: String,
    key: String,
    values: Vec<(String, SqlValue)>,
}

impl UpdateDraft {
    /// Update `table`, matching rows on the `key` column. The key's value is
    /// supplied through [`UpdateDraft::value`] like any other column.
    pub fn new(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key: key.into(),
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    fn key_value(&self) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(col, _)| *col == self.key)
            .map(|(_, value)| value)
    }

    fn has_assignments(&self) -> bool {
        self.values.iter().any(|(col, _)| *col != self.key)
    }

    fn build(&self, out: &mut Emitter<'_>) -> Option<String> {
        if !self.has_assignments() {
            return None;
        }
        let key_value = self.key_value()?;

        let assignments = self
            .values
            .iter()
            .filter(|(col, _)| *col != self.key)
            .map(|(col, value)| format!("{}={}", col, out.value(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Some(format!(
            "UPDATE {} SET {} WHERE {} = {}",
            self.table,
            assignments,
            self.key,
            out.value(key_value)
        ))
    }
}

/// `DELETE` draft. Without conditions it is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteDraft {
    table: String,
    conditions: Vec<Condition>,
}

impl DeleteDraft {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            conditions: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(Condition::raw(condition));
        self
    }

    pub fn filter_value(mut self, condition: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.conditions.push(Condition::bound(condition, value));
        self
    }

    fn build(&self, out: &mut Emitter<'_>) -> Option<String> {
        let clause = where_clause(&self.conditions, out)?;
        Some(format!("DELETE FROM {} WHERE {}", self.table, clause))
    }
}

/// A statement draft of one of the four supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectDraft),
    Insert(InsertDraft),
    Update(UpdateDraft),
    Delete(DeleteDraft),
}

impl Statement {
    /// Statement kind, lowercase.
    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Select(_) => "select",
            Statement::Insert(_) => "insert",
            Statement::Update(_) => "update",
            Statement::Delete(_) => "delete",
        }
    }

    /// Table the statement operates on.
    pub fn table(&self) -> &str {
        match self {
            Statement::Select(d) => &d.table,
            Statement::Insert(d) => &d.table,
            Statement::Update(d) => &d.table,
            Statement::Delete(d) => &d.table,
        }
    }

    /// True when the draft has nothing to execute.
    pub fn is_noop(&self) -> bool {
        match self {
            Statement::Select(_) => false,
            Statement::Insert(d) => d.values.is_empty(),
            Statement::Update(d) => !d.has_assignments() || d.key_value().is_none(),
            Statement::Delete(d) => d.conditions.is_empty(),
        }
    }

    /// Compile to SQL with placeholders and ordered parameters.
    pub fn compile(&self, dialect: &dyn Dialect) -> Option<BoundStatement> {
        let mut out = Emitter::binding(dialect);
        let sql = self.build(&mut out)?;
        Some(BoundStatement {
            sql,
            params: out.params.unwrap_or_default(),
        })
    }

    /// Render to SQL with values quoted inline. No-ops render to `""`.
    pub fn render(&self, dialect: &dyn Dialect) -> String {
        let mut out = Emitter::literal(dialect);
        self.build(&mut out).unwrap_or_default()
    }

    fn build(&self, out: &mut Emitter<'_>) -> Option<String> {
        match self {
            Statement::Select(d) => Some(d.build(out)),
            Statement::Insert(d) => d.build(out),
            Statement::Update(d) => d.build(out),
            Statement::Delete(d) => d.build(out),
        }
    }
}

impl From<SelectDraft> for Statement {
    fn from(d: SelectDraft) -> Self {
        Statement::Select(d)
    }
}

impl From<InsertDraft> for Statement {
    fn from(d: InsertDraft) -> Self {
        Statement::Insert(d)
    }
}

impl From<UpdateDraft> for Statement {
    fn from(d: UpdateDraft) -> Self {
        Statement::Update(d)
    }
}

impl From<DeleteDraft> for Statement {
    fn from(d: DeleteDraft) -> Self {
        Statement::Delete(d)
    }
}

/// Writes values either as literals or as placeholders.
struct Emitter<'d> {
    dialect: &'d dyn Dialect,
    params: Option<Vec<SqlValue>>,
}

impl<'d> Emitter<'d> {
    fn literal(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            params: None,
        }
    }

    fn binding(dialect: &'d dyn Dialect) -> Self {
        Self {
            dialect,
            params: Some(Vec::new()),
        }
    }

    fn value(&mut self, value: &SqlValue) -> String {
        match &mut self.params {
            Some(params) => {
                params.push(value.clone());
                self.dialect.param_placeholder(params.len())
            }
            None => self.dialect.quote_literal(value),
        }
    }
}

fn where_clause(conditions: &[Condition], out: &mut Emitter<'_>) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }
    Some(
        conditions
            .iter()
            .map(|c| c.emit(out))
            .collect::<Vec<_>>()
            .join(" AND "),
    )
}
