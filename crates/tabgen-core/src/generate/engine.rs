use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Result, TabgenError};
use crate::generate::format::{format_value, FormatError};
use crate::generate::plan::{ColumnSpec, GenRule, TableSpec};
use crate::generate::replacements::Replacements;
use crate::registry::TableRegistry;

/// Generates whole columns from a [`GenRule`] and commits them to a
/// [`TableRegistry`].
///
/// In strict mode, templates referencing unregistered `${...}` placeholders
/// and columns whose row count cannot be inferred are errors. Otherwise the
/// former are left verbatim in the output and the latter produce an empty
/// column with a warning.
#[derive(Debug, Clone, Copy)]
pub struct ColumnGenerator<'a> {
    replacements: &'a Replacements,
    strict: bool,
}

/// Part of a value under construction. Expanded text came from a producer and
/// is never searched for placeholders again.
enum Piece {
    Literal(String),
    Expanded(String),
}

impl Piece {
    fn into_string(self) -> String {
        match self {
            Piece::Literal(s) | Piece::Expanded(s) => s,
        }
    }
}

impl<'a> ColumnGenerator<'a> {
    pub fn new(replacements: &'a Replacements) -> Self {
        Self {
            replacements,
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn replacements(&self) -> &'a Replacements {
        self.replacements
    }

    /// Generate one value per row for `column` and append it to `table` in
    /// `registry` as an output column.
    pub fn generate_column<R: Rng>(
        &self,
        table: &TableSpec,
        column: &ColumnSpec,
        rule: &GenRule,
        registry: &mut TableRegistry,
        rng: &mut R,
    ) -> Result<()> {
        if self.strict {
            if let Some(token) = self
                .replacements
                .unknown_placeholders(&rule.value)
                .into_iter()
                .next()
            {
                return Err(TabgenError::UnknownPlaceholder {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    token,
                });
            }
        }

        let row_count = self.resolve_row_count(table, column, registry)?;

        let mut values = Vec::with_capacity(row_count);
        for _ in 0..row_count {
            let value = self
                .render(rule, rng)
                .map_err(|source| TabgenError::Format {
                    table: table.name.clone(),
                    column: column.name.clone(),
                    source,
                })?;
            values.push(value);
        }

        debug!(
            table = %table.name,
            column = %column.name,
            rows = row_count,
            "generated column"
        );
        registry.add_output_column(&table.name, &column.name, values);
        Ok(())
    }

    /// Number of rows to generate for `column`.
    ///
    /// An explicit count always wins. With `count == 0` the count is the
    /// length of the longest column already in the table.
    pub fn resolve_row_count(
        &self,
        table: &TableSpec,
        column: &ColumnSpec,
        registry: &TableRegistry,
    ) -> Result<usize> {
        if table.count > 0 {
            return Ok(table.count);
        }

        let has_columns = registry
            .get(&table.name)
            .is_some_and(|t| !t.lines.is_empty());
        if !has_columns {
            if self.strict {
                return Err(TabgenError::UnresolvableRowCount {
                    table: table.name.clone(),
                    column: column.name.clone(),
                });
            }
            warn!(
                "Table '{}' has count = 0 and no columns yet; column '{}' will be empty",
                table.name, column.name
            );
            return Ok(0);
        }

        Ok(registry.longest_column_len(&table.name))
    }

    /// Produce a single value for `rule`.
    ///
    /// One roll in `[0, 100)` decides whether the value is null (the empty
    /// string). Otherwise every registered token found in the template is
    /// replaced, all occurrences at once, with one formatted producer value.
    /// Each token is visited once, longest first, and text inserted by a
    /// producer is never expanded further.
    pub fn render<R: Rng>(
        &self,
        rule: &GenRule,
        rng: &mut R,
    ) -> std::result::Result<String, FormatError> {
        if rng.random_range(0..100u8) < rule.null_percentage {
            return Ok(String::new());
        }

        let mut pieces = vec![Piece::Literal(rule.value.clone())];
        for (token, producer) in self.replacements.iter() {
            let present = pieces
                .iter()
                .any(|p| matches!(p, Piece::Literal(text) if text.contains(token)));
            if !present {
                continue;
            }

            let text = format_value(&rule.format, &producer(&mut *rng))?;
            pieces = pieces
                .into_iter()
                .flat_map(|piece| split_on_token(piece, token, &text))
                .collect();
        }

        Ok(pieces.into_iter().map(Piece::into_string).collect())
    }
}

fn split_on_token(piece: Piece, token: &str, replacement: &str) -> Vec<Piece> {
    let literal = match piece {
        Piece::Literal(text) if text.contains(token) => text,
        other => return vec![other],
    };

    let mut out = Vec::new();
    for (i, part) in literal.split(token).enumerate() {
        if i > 0 {
            out.push(Piece::Expanded(replacement.to_string()));
        }
        if !part.is_empty() {
            out.push(Piece::Literal(part.to_string()));
        }
    }
    out
}
